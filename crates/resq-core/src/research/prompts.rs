use super::document::ResultSet;

/// System prompt for query decomposition.
pub const DECOMPOSE_SYSTEM_PROMPT: &str =
    "You are a helpful assistant specialized in generating precise search queries.";

/// System prompt for answer synthesis.
pub const SYNTHESIZE_SYSTEM_PROMPT: &str = "You are a knowledgeable research assistant.";

/// Builds the user prompt asking for 3-5 search queries.
pub fn build_decompose_prompt(question: &str) -> String {
    format!(
        "Break down the following research question into 3-5 effective web search queries:\n\n\
         Question: {question}\n\nSearch Queries:"
    )
}

/// Renders the numbered source blocks the answer cites.
///
/// Each result becomes `Source i: <title>\n<snippet>\nURL: <link>`; blocks are
/// separated by a blank line. Numbering follows the set's order exactly.
pub fn build_source_context(sources: &ResultSet) -> String {
    sources
        .numbered()
        .map(|(n, r)| format!("Source {}: {}\n{}\nURL: {}", n, r.title, r.snippet, r.link))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Builds the user prompt for answer synthesis.
pub fn build_synthesize_prompt(question: &str, sources: &ResultSet) -> String {
    let context = build_source_context(sources);
    format!(
        "Using only the following sources, answer the question: '{question}'\n\n\
         {context}\n\n\
         Answer with citations in the format [Source X]."
    )
}
