mod common;

use common::{hits, ScriptedLLM, TableSearch};
use resq_core::llm::{LLMError, SamplingParams};
use resq_core::research::{QueryDecomposer, QueryStatus, SearchExecutor, SearchQuery};
use resq_core::{ResearchError, ResearchProgress, ResearchRunner, FALLBACK_ANSWER};
use tokio::sync::mpsc;

const CORAL: &str = "What causes coral bleaching?";

fn queries(list: &[&str]) -> Vec<SearchQuery> {
    list.iter().map(|q| q.to_string()).collect()
}

#[tokio::test]
async fn test_end_to_end_coral_bleaching() {
    let llm = ScriptedLLM::new()
        .reply("1. coral bleaching causes\n2. ocean temperature coral\n3. zooxanthellae expulsion")
        .reply("  Rising sea temperatures stress corals [Source 1], which expel algae [Source 6].  ");
    let search = TableSearch::new()
        .results("coral bleaching causes", hits("a", 2))
        .results("ocean temperature coral", hits("b", 2))
        .results("zooxanthellae expulsion", hits("c", 2));

    let runner = ResearchRunner::new(llm, search);
    let report = runner.run(CORAL).await.unwrap();

    assert_eq!(report.question, CORAL);
    assert_eq!(
        report.queries,
        queries(&["coral bleaching causes", "ocean temperature coral", "zooxanthellae expulsion"])
    );
    assert_eq!(report.sources.len(), 6);
    assert!(!report.answer.fallback);
    assert_eq!(
        report.answer.text,
        "Rising sea temperatures stress corals [Source 1], which expel algae [Source 6]."
    );
    assert_eq!(report.answer.citations(), vec![1, 6]);
    assert!(report.answer.invalid_citations(report.sources.len()).is_empty());
}

#[tokio::test]
async fn test_failed_query_contributes_nothing() {
    let llm = ScriptedLLM::new().reply("q1\nq2\nq3").reply("Answer [Source 4].");
    let search = TableSearch::new()
        .results("q1", hits("q1", 3))
        .status("q2", 500)
        .results("q3", hits("q3", 2));

    let runner = ResearchRunner::new(llm, search);
    let report = runner.run("question").await.unwrap();

    let titles: Vec<&str> = report
        .sources
        .as_slice()
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert_eq!(titles, vec!["q1-1", "q1-2", "q3-1", "q3-2"]);

    assert_eq!(
        report.outcomes[0].status,
        QueryStatus::Found { returned: 3, kept: 2 }
    );
    assert!(matches!(report.outcomes[1].status, QueryStatus::Failed { ref reason } if reason.contains("500")));
    assert_eq!(
        report.outcomes[2].status,
        QueryStatus::Found { returned: 2, kept: 2 }
    );
}

#[tokio::test]
async fn test_synthesis_context_numbers_sources_in_order() {
    let llm = ScriptedLLM::new().reply("q1\nq2").reply("ok");
    let search = TableSearch::new()
        .results("q1", hits("q1", 2))
        .results("q2", hits("q2", 2));

    let runner = ResearchRunner::new(&llm, &search);
    runner.run("question").await.unwrap();

    let calls = llm.calls();
    let prompt = &calls[1].prompt;
    let expected = [
        "Source 1: q1-1\nsnippet q1-1\nURL: https://example.com/q1/1",
        "Source 2: q1-2",
        "Source 3: q2-1",
        "Source 4: q2-2\nsnippet q2-2\nURL: https://example.com/q2/2",
    ];
    let mut last = 0;
    for block in expected {
        let at = prompt.find(block).unwrap_or_else(|| panic!("missing {block:?}"));
        assert!(at >= last, "{block:?} out of order");
        last = at;
    }
    assert!(!prompt.contains("Source 5"));
    assert_eq!(search.seen(), vec!["q1", "q2"]);
}

#[tokio::test]
async fn test_decomposition_failure_is_no_queries() {
    let llm = ScriptedLLM::new().fail(LLMError::ApiError {
        status: 401,
        message: "bad key".to_string(),
    });
    let search = TableSearch::new();

    let runner = ResearchRunner::new(llm, search);
    let err = runner.run(CORAL).await.unwrap_err();
    assert!(matches!(err, ResearchError::NoQueries));
    assert_eq!(
        err.to_string(),
        "Could not generate search queries from the research question."
    );
}

#[tokio::test]
async fn test_blank_decomposition_is_no_queries() {
    let llm = ScriptedLLM::new().reply("\n  \n1.\n");
    let runner = ResearchRunner::new(llm, TableSearch::new());
    assert!(matches!(
        runner.run(CORAL).await,
        Err(ResearchError::NoQueries)
    ));
}

#[tokio::test]
async fn test_no_results_anywhere_is_insufficient_information() {
    let llm = ScriptedLLM::new().reply("q1\nq2");
    let search = TableSearch::new().status("q1", 403).transport_error("q2");

    let runner = ResearchRunner::new(llm, search);
    match runner.run(CORAL).await {
        Err(ResearchError::InsufficientInformation { queries: q }) => {
            assert_eq!(q, queries(&["q1", "q2"]));
        }
        other => panic!("expected insufficient information, got {other:?}"),
    }
}

#[tokio::test]
async fn test_synthesis_failure_returns_fallback() {
    let llm = ScriptedLLM::new()
        .reply("q1")
        .fail(LLMError::Network("timed out".to_string()));
    let search = TableSearch::new().results("q1", hits("q1", 2));

    let runner = ResearchRunner::new(llm, search);
    let report = runner.run(CORAL).await.unwrap();
    assert_eq!(report.answer.text, FALLBACK_ANSWER);
    assert_eq!(report.answer.text, "Error synthesizing answer.");
    assert!(report.answer.fallback);
}

#[tokio::test]
async fn test_empty_question_rejected_before_any_call() {
    let runner = ResearchRunner::new(ScriptedLLM::new(), TableSearch::new());
    assert!(matches!(
        runner.run("   ").await,
        Err(ResearchError::EmptyQuestion)
    ));
}

#[tokio::test]
async fn test_progress_events() {
    let llm = ScriptedLLM::new().reply("q1\nq2").reply("Answer [Source 1].");
    let search = TableSearch::new().results("q1", hits("q1", 1)).status("q2", 500);

    let runner = ResearchRunner::new(llm, search);
    let (tx, mut rx) = mpsc::unbounded_channel();
    runner.run_with_progress(CORAL, tx).await.unwrap();

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(
        events,
        vec![
            ResearchProgress::QueriesGenerated(queries(&["q1", "q2"])),
            ResearchProgress::SearchCompleted { query: "q1".to_string(), kept: 1 },
            ResearchProgress::SearchCompleted { query: "q2".to_string(), kept: 0 },
            ResearchProgress::Synthesizing { sources: 1 },
        ]
    );
}

#[tokio::test]
async fn test_results_per_query_is_configurable() {
    let llm = ScriptedLLM::new().reply("q1\nq2").reply("ok");
    let search = TableSearch::new()
        .results("q1", hits("q1", 5))
        .results("q2", hits("q2", 5));

    let runner = ResearchRunner::new(llm, search).with_results_per_query(3);
    let report = runner.run(CORAL).await.unwrap();
    assert_eq!(report.sources.len(), 6);
}

#[tokio::test]
async fn test_decomposer_sends_question_with_sampling() {
    let llm = ScriptedLLM::new().reply("- one\n- two");
    let decomposer = QueryDecomposer::new(&llm, SamplingParams::new(100, 0.5));
    let result = decomposer.decompose(CORAL).await;
    assert_eq!(result, queries(&["one", "two"]));

    let calls = llm.calls();
    let call = &calls[0];
    assert!(call.prompt.contains(CORAL));
    assert_eq!(call.params, SamplingParams::new(100, 0.5));
}

#[tokio::test]
async fn test_runner_uses_distinct_sampling_per_stage() {
    let llm = ScriptedLLM::new().reply("q1").reply("ok");
    let search = TableSearch::new().results("q1", hits("q1", 1));

    let runner = ResearchRunner::new(&llm, search);
    runner.run(CORAL).await.unwrap();

    let calls = llm.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].params, SamplingParams::new(100, 0.5));
    assert_eq!(calls[1].params, SamplingParams::new(500, 0.7));
}

#[tokio::test]
async fn test_single_search_soft_failure() {
    let search = TableSearch::new()
        .status("broken", 503)
        .transport_error("offline")
        .results("fine", hits("f", 4));
    let executor = SearchExecutor::new(&search, 2);

    assert!(executor.search("broken").await.is_empty());
    assert!(executor.search("offline").await.is_empty());
    // The cap belongs to aggregation, not to a single search.
    assert_eq!(executor.search("fine").await.len(), 4);
    assert_eq!(search.seen(), vec!["broken", "offline", "fine"]);
}
