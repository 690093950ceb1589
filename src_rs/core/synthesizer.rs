// 목적:
// - 질문/분류/검색 결과로 최종 한국어 답변을 만든다.
//
// 설명:
// - 경로는 세 가지다.
//   1) Emergency: 질문에 응급 키워드가 있으면 고정 응급 안내문을 반환한다(검색 결과 미사용, 모델 미호출).
//   2) NoGrounding: 검색 결과가 비어 있으면 모든 항목을 "정보 없음"으로 채운 고정 템플릿을 반환한다.
//   3) Grounded: 검색 결과를 컨텍스트로 모델을 호출하고, 누락된 안전 항목과 고지문을 보충한다.
// - 응급 판정은 모델 지시문이 아니라 코드 가드로 먼저 수행한다.
//
// 디자인 패턴:
// - 상태 기반 분기(State Routing) + 후처리 가드(Post-condition Guard).
//
// 참조:
// - src_rs/core/prompts.rs
// - src_rs/core/answer_pipeline.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::chat_model::{ChatModel, ChatPrompt};
use crate::core::errors::{CoreError, CoreResult};
use crate::core::prompts::{
    self, DISCLAIMER, EMERGENCY_SCRIPT, EMERGENCY_TRIGGERS, EMERGENCY_TRIGGER_VARIANTS,
    NOT_FOUND_SENTENCE, SAFETY_SECTIONS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisRoute {
    Emergency,
    NoGrounding,
    Grounded,
}

/// 질문에 응급 키워드가 포함되어 있는지 판정한다.
///
/// 연속 공백만 한 칸으로 줄여 비교하며, 서로 다른 단어를 이어 붙여 매칭하지 않는다.
pub fn is_emergency(question: &str) -> bool {
    let normalized = collapse_whitespace(question);
    EMERGENCY_TRIGGERS
        .iter()
        .chain(EMERGENCY_TRIGGER_VARIANTS.iter())
        .any(|trigger| normalized.contains(*trigger))
}

pub fn select_route(question: &str, results: &[Value]) -> SynthesisRoute {
    if is_emergency(question) {
        SynthesisRoute::Emergency
    } else if results.is_empty() {
        SynthesisRoute::NoGrounding
    } else {
        SynthesisRoute::Grounded
    }
}

pub struct AnswerSynthesizer {
    model: Arc<dyn ChatModel>,
    temperature: f32,
}

impl AnswerSynthesizer {
    pub fn new(model: Arc<dyn ChatModel>, temperature: f32) -> Self {
        Self { model, temperature }
    }

    pub async fn synthesize(
        &self,
        question: &str,
        category: &str,
        keyword: &str,
        results: &[Value],
    ) -> CoreResult<String> {
        match select_route(question, results) {
            SynthesisRoute::Emergency => {
                warn!("응급 키워드 감지, 응급 안내문으로 대체");
                Ok(EMERGENCY_SCRIPT.to_string())
            }
            SynthesisRoute::NoGrounding => {
                debug!(keyword, "검색 결과 없음, 정보 없음 템플릿 사용");
                Ok(render_no_grounding(keyword))
            }
            SynthesisRoute::Grounded => {
                self.generate_grounded(question, category, keyword, results)
                    .await
            }
        }
    }

    async fn generate_grounded(
        &self,
        question: &str,
        category: &str,
        keyword: &str,
        results: &[Value],
    ) -> CoreResult<String> {
        let context = serialize_context(results)?;
        let prompt = ChatPrompt {
            system: prompts::generator_system_prompt(),
            user: prompts::generator_user_prompt(question, category, keyword, &context),
            temperature: self.temperature,
        };

        let generated = self
            .model
            .complete(&prompt)
            .await
            .map_err(|error| CoreError::Synthesis(error.to_string()))?;

        if generated.trim().is_empty() {
            return Err(CoreError::Synthesis("생성된 답변이 비어 있습니다".to_string()));
        }

        Ok(ensure_safety_sections(&generated))
    }
}

/// 검색 결과를 모델 컨텍스트 문자열로 직렬화한다.
pub fn serialize_context(results: &[Value]) -> CoreResult<String> {
    serde_json::to_string_pretty(results).map_err(|error| {
        CoreError::Serialization(format!("검색 컨텍스트 직렬화 실패: {}", error))
    })
}

/// 검색 결과가 없을 때의 고정 템플릿.
pub fn render_no_grounding(keyword: &str) -> String {
    let mut sections = String::new();
    for section in SAFETY_SECTIONS.iter() {
        sections.push_str(&format!("{}\n{}\n\n", section.heading, section.absent));
    }

    format!(
        "\"{keyword}\"에 대한 FDA 의약품 라벨 검색 결과가 없습니다.\n\n\
         ## 약품 정보\n\n\
         **브랜드명**: {nf}\n\
         **주성분**: {nf}\n\
         **효능**: {nf}\n\n\
         ## 용법용량\n\
         {nf}\n\n\
         ## 주의사항\n\n\
         {sections}---\n\
         {disclaimer}",
        keyword = keyword,
        nf = NOT_FOUND_SENTENCE,
        sections = sections,
        disclaimer = DISCLAIMER,
    )
}

/// 누락된 안전 항목을 "정보 없음" 문장과 함께 덧붙이고, 고지문이 없으면 추가한다.
pub fn ensure_safety_sections(answer: &str) -> String {
    let missing = SAFETY_SECTIONS
        .iter()
        .filter(|section| !has_heading(answer, section.heading))
        .collect::<Vec<_>>();

    if missing.is_empty() && answer.contains(DISCLAIMER) {
        return answer.to_string();
    }

    let mut body = answer.trim_end().to_string();
    if !missing.is_empty() {
        if let Some(stripped) = body.strip_suffix(DISCLAIMER) {
            body = stripped.trim_end().trim_end_matches("---").trim_end().to_string();
        }

        if !body.contains("## 주의사항") {
            body.push_str("\n\n## 주의사항");
        }
        for section in missing {
            body.push_str(&format!("\n\n{}\n{}", section.heading, section.absent));
        }
    }

    if !body.contains(DISCLAIMER) {
        body.push_str(&format!("\n\n---\n{}", DISCLAIMER));
    }

    body
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn has_heading(answer: &str, heading: &str) -> bool {
    answer
        .lines()
        .any(|line| line.trim_start().starts_with(heading))
}
