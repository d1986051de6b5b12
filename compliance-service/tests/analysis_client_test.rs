//! Tests for OpenAiAnalyzer against a mocked chat-completions endpoint.

use compliance_service::{
    AnalysisError, AnalysisRequest, ComplianceEvaluator, ComplianceReport, EvaluationSettings,
    OpenAiAnalyzer, OpenAiConfig, RuleRow, RuleTable, RulesetGroups, TextAnalyzer,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn analyzer_for(server: &MockServer) -> OpenAiAnalyzer {
    OpenAiAnalyzer::new(OpenAiConfig {
        api_base: format!("{}/v1", server.uri()),
        api_key: "sk-test".to_string(),
        model: "gpt-4".to_string(),
        timeout_seconds: 5,
    })
    .unwrap()
}

fn request() -> AnalysisRequest {
    AnalysisRequest {
        system_prompt: "system".to_string(),
        user_prompt: "user".to_string(),
        max_output_tokens: 2000,
        temperature: 0.5,
    }
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn sends_chat_request_and_returns_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4",
            "max_tokens": 2000,
            "temperature": 0.5,
            "messages": [
                { "role": "system", "content": "system" },
                { "role": "user", "content": "user" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Compliant")))
        .expect(1)
        .mount(&server)
        .await;

    let content = analyzer_for(&server).complete(&request()).await.unwrap();
    assert_eq!(content, "Compliant");
}

#[tokio::test]
async fn error_status_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = analyzer_for(&server).complete(&request()).await.unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Api { status_code: 429, ref message } if message == "rate limited"
    ));
}

#[tokio::test]
async fn missing_choices_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = analyzer_for(&server).complete(&request()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedResponse(_)));
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = analyzer_for(&server).complete(&request()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::MalformedResponse(_)));
}

#[tokio::test]
async fn evaluator_over_http_substitutes_and_isolates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "temperature": 0.5 })))
        .and(wiremock::matchers::body_string_contains("Rules for Tone:"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "Non-Compliant. (1) Rule Name: no slang. Explanation: casual tone.",
        )))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(wiremock::matchers::body_string_contains("Rules for Legal:"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let evaluator = ComplianceEvaluator::new(
        Arc::new(analyzer_for(&server)),
        EvaluationSettings::default(),
    );
    let groups = RulesetGroups::group(&RuleTable::from_rows(vec![
        RuleRow::new("All", "Tone", "no slang", "NoSlang"),
        RuleRow::new("DE", "Legal", "no health claims", "NoHealth"),
    ]));

    let reports = evaluator.evaluate("Hey dude", &groups).await;
    assert_eq!(
        reports,
        vec![
            ComplianceReport::completed(
                "Tone",
                "Non-Compliant. (1) Rule Name: NoSlang. Explanation: casual tone."
            ),
            ComplianceReport::from_outcome(
                "Legal",
                Err(AnalysisError::Api {
                    status_code: 503,
                    message: "overloaded".to_string()
                }
                .into())
            ),
        ]
    );
    assert!(reports[1].is_error());
}

#[tokio::test]
async fn unreachable_service_is_reported_not_raised() {
    let analyzer = OpenAiAnalyzer::new(OpenAiConfig {
        api_base: "http://127.0.0.1:1/v1".to_string(),
        api_key: "sk-test".to_string(),
        model: "gpt-4".to_string(),
        timeout_seconds: 2,
    })
    .unwrap();

    let err = analyzer.complete(&request()).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Http(_)));
    assert!(ComplianceReport::from_outcome("Tone", Err(err.into()))
        .text()
        .starts_with("An error occurred: Analysis service unreachable"));
}
