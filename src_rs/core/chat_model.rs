// 목적:
// - 언어 모델 호출 경계(프롬프트 입력 -> 텍스트 출력)를 정의한다.
//
// 설명:
// - 파이프라인은 ChatModel 트레이트에만 의존하며 실제 구현은 교체 가능하다.
// - 기본 구현은 OpenAI 호환 chat completions 엔드포인트를 HTTP로 호출한다.
//
// 디자인 패턴:
// - 어댑터(Adapter).
//
// 참조:
// - src_rs/core/classifier.rs
// - src_rs/core/synthesizer.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::core::config::ChatModelConfig;
use crate::core::errors::{CoreError, CoreResult};

/// 고정 시스템 지시문과 요청별 사용자 메시지 한 쌍.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &ChatPrompt) -> CoreResult<String>;
}

#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Client,
    config: ChatModelConfig,
}

impl OpenAiChatClient {
    pub fn new(config: ChatModelConfig) -> CoreResult<Self> {
        if config.url.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "llm.url은 비어 있을 수 없습니다".to_string(),
            ));
        }

        if config.timeout_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "llm.timeout_ms는 1 이상이어야 합니다".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|error| CoreError::Http(format!("HTTP 클라이언트 생성 실패: {}", error)))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ChatModel for OpenAiChatClient {
    #[instrument(skip(self, prompt), fields(model = %self.config.model), level = "debug")]
    async fn complete(&self, prompt: &ChatPrompt) -> CoreResult<String> {
        #[derive(Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct CompletionRequest<'a> {
            model: &'a str,
            messages: Vec<Message<'a>>,
            temperature: f32,
        }

        let request_body = CompletionRequest {
            model: &self.config.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &prompt.system,
                },
                Message {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: prompt.temperature,
        };

        let mut request_builder = self.client.post(self.config.url.as_str()).json(&request_body);
        if let Some(token) = self.config.auth_token.as_ref() {
            request_builder = request_builder.bearer_auth(token);
        }

        let response = request_builder
            .send()
            .await
            .map_err(|error| CoreError::Model(format!("모델 HTTP 요청 실패: {}", error)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| CoreError::Model(format!("모델 HTTP 본문 읽기 실패: {}", error)))?;

        if !status.is_success() {
            return Err(CoreError::Model(format!(
                "모델 HTTP 상태 오류: status={}, body={}",
                status, body
            )));
        }

        parse_completion_response(&body).map_err(CoreError::Model)
    }
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: Option<Value>,
}

/// 첫 번째 choice의 message.content를 꺼낸다.
pub fn parse_completion_response(body: &str) -> Result<String, String> {
    let parsed: CompletionResponse = serde_json::from_str(body.trim())
        .map_err(|error| format!("모델 응답 파싱 실패: {}", error))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .and_then(|content| match content {
            Value::String(text) => Some(text),
            _ => None,
        })
        .ok_or_else(|| "모델 응답에 content가 없습니다".to_string())?;

    if content.trim().is_empty() {
        return Err("모델 응답 content가 비어 있습니다".to_string());
    }

    Ok(content)
}
