use resq_core::llm::{LLMError, OpenAIClient, SamplingParams, LLM};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_chat_completion_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 100,
            "temperature": 0.5,
            "messages": [
                {"role": "system", "content": "Be brief."},
                {"role": "user", "content": "List queries"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("1. one\n2. two")))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAIClient::new(format!("{}/v1/", server.uri()), "sk-test", "gpt-3.5-turbo");
    let text = client
        .complete_with_system("Be brief.", "List queries", SamplingParams::new(100, 0.5))
        .await
        .unwrap();
    assert_eq!(text, "1. one\n2. two");
}

#[tokio::test]
async fn test_api_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let client = OpenAIClient::new(server.uri(), "bad", "gpt-3.5-turbo");
    let err = client
        .complete_with_system("s", "p", SamplingParams::new(10, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::ApiError { status: 401, ref message } if message == "invalid api key"));
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = OpenAIClient::new(server.uri(), "k", "m");
    let err = client
        .complete_with_system("s", "p", SamplingParams::new(10, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::RateLimited));
}

#[tokio::test]
async fn test_no_choices_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = OpenAIClient::new(server.uri(), "k", "m");
    let err = client
        .complete_with_system("s", "p", SamplingParams::new(10, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::EmptyResponse));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = OpenAIClient::new(server.uri(), "k", "m");
    let err = client
        .complete_with_system("s", "p", SamplingParams::new(10, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::ParseError(_)));
}
