// 목적:
// - 자유 형식 질문을 {category, keyword} 분류 결과로 변환한다.
//
// 설명:
// - 카테고리는 brand_name / generic_name / indication 세 가지로 고정된다.
// - 모델 출력은 단일 JSON 객체여야 하며, 해석에 실패하면 추측 없이 실패한다.
//
// 디자인 패턴:
// - 전략(Strategy): 분류 메커니즘은 QuestionClassifier 구현으로 교체 가능하다.
// - 실패 빠르게(Fail Fast).
//
// 참조:
// - src_rs/core/prompts.rs
// - src_rs/core/chat_model.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::core::chat_model::{ChatModel, ChatPrompt};
use crate::core::errors::{CoreError, CoreResult};
use crate::core::prompts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    BrandName,
    GenericName,
    Indication,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::BrandName,
        Category::GenericName,
        Category::Indication,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::BrandName => "brand_name",
            Category::GenericName => "generic_name",
            Category::Indication => "indication",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| {
                CoreError::ClassificationParse(format!("지원하지 않는 category입니다: {}", value))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub keyword: String,
}

#[async_trait]
pub trait QuestionClassifier: Send + Sync {
    async fn classify(&self, question: &str) -> CoreResult<Classification>;
}

/// 언어 모델 기반 분류기.
pub struct LlmClassifier {
    model: Arc<dyn ChatModel>,
    temperature: f32,
}

impl LlmClassifier {
    pub fn new(model: Arc<dyn ChatModel>, temperature: f32) -> Self {
        Self { model, temperature }
    }
}

#[async_trait]
impl QuestionClassifier for LlmClassifier {
    async fn classify(&self, question: &str) -> CoreResult<Classification> {
        if question.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "question은 비어 있을 수 없습니다".to_string(),
            ));
        }

        let prompt = ChatPrompt {
            system: prompts::classifier_system_prompt(),
            user: question.to_string(),
            temperature: self.temperature,
        };

        let raw = self.model.complete(&prompt).await?;
        let classification = parse_classification(&raw)?;
        debug!(
            category = %classification.category,
            keyword = %classification.keyword,
            "질문 분류 완료"
        );
        Ok(classification)
    }
}

/// 모델 출력 텍스트를 Classification으로 해석한다.
///
/// 앞뒤 공백과 ```json 코드 펜스만 허용하고, 그 밖의 주변 텍스트는 거부한다.
pub fn parse_classification(raw: &str) -> CoreResult<Classification> {
    let body = strip_code_fence(raw.trim());

    let value: Value = serde_json::from_str(body).map_err(|error| {
        CoreError::ClassificationParse(format!("JSON 파싱 실패: {}, body={}", error, raw))
    })?;

    let object = value.as_object().ok_or_else(|| {
        CoreError::ClassificationParse(format!("JSON 객체가 아닙니다: {}", raw))
    })?;

    let category = object
        .get("category")
        .and_then(Value::as_str)
        .ok_or_else(|| CoreError::ClassificationParse("category 필드가 없습니다".to_string()))?
        .parse::<Category>()?;

    let keyword = object
        .get("keyword")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .ok_or_else(|| {
            CoreError::ClassificationParse("keyword 필드가 없거나 비어 있습니다".to_string())
        })?;

    Ok(Classification {
        category,
        keyword: keyword.to_string(),
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
