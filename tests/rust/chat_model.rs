use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use medinfo_qa::core::chat_model::{
    parse_completion_response, ChatModel, ChatPrompt, OpenAiChatClient,
};
use medinfo_qa::core::config::ChatModelConfig;
use medinfo_qa::core::errors::CoreError;

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn client_for(server: &MockServer, token: Option<&str>) -> OpenAiChatClient {
    OpenAiChatClient::new(ChatModelConfig {
        url: format!("{}/v1/chat/completions", server.uri()),
        auth_token: token.map(str::to_string),
        ..ChatModelConfig::default()
    })
    .unwrap()
}

fn prompt() -> ChatPrompt {
    ChatPrompt {
        system: "classify".to_string(),
        user: "Tylenol이 뭐야?".to_string(),
        temperature: 0.0,
    }
}

#[tokio::test]
async fn sends_system_and_user_messages_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [
                { "role": "system", "content": "classify" },
                { "role": "user", "content": "Tylenol이 뭐야?" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"category": "brand_name", "keyword": "Tylenol"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(&server, Some("test-key"))
        .complete(&prompt())
        .await
        .unwrap();

    assert_eq!(text, r#"{"category": "brand_name", "keyword": "Tylenol"}"#);
}

#[tokio::test]
async fn non_success_status_is_a_model_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let result = client_for(&server, None).complete(&prompt()).await;

    match result {
        Err(CoreError::Model(message)) => assert!(message.contains("429")),
        other => panic!("expected model error, got {:?}", other),
    }
}

#[test]
fn completion_without_choices_is_rejected() {
    assert!(parse_completion_response(r#"{"choices": []}"#).is_err());
    assert!(parse_completion_response(r#"{"choices": [{"message": {"content": null}}]}"#).is_err());
    assert!(parse_completion_response(r#"{"choices": [{"message": {"content": "  "}}]}"#).is_err());
    assert!(parse_completion_response("not json").is_err());
}

#[test]
fn completion_content_is_extracted() {
    let body = completion("안녕하세요").to_string();
    assert_eq!(parse_completion_response(&body).unwrap(), "안녕하세요");
}
