// 목적:
// - 질문 하나에 대한 답변 파이프라인을 실행한다.
//
// 설명:
// - 응급 가드 -> 질문 분류 -> 카테고리별 필드로 라벨 검색 -> 답변 생성 순서로 처리한다.
// - 각 단계는 앞 단계가 끝난 뒤에만 시작하며 재시도/병렬 처리는 없다.
// - 모델 단계(분류/생성)는 stage_timeout_ms로 상한을 둔다.
// - 요청 간 공유 상태는 읽기 전용 설정뿐이므로 인스턴스를 동시에 재사용해도 된다.
//
// 디자인 패턴:
// - 파이프라인(Pipeline).
//
// 참조:
// - src_rs/core/classifier.rs
// - src_rs/index/openfda_client.rs
// - src_rs/core/synthesizer.rs

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::core::chat_model::{ChatModel, OpenAiChatClient};
use crate::core::classifier::{Classification, LlmClassifier, QuestionClassifier};
use crate::core::config::PipelineConfig;
use crate::core::errors::{CoreError, CoreResult};
use crate::core::prompts::EMERGENCY_SCRIPT;
use crate::core::synthesizer::{is_emergency, select_route, AnswerSynthesizer, SynthesisRoute};
use crate::index::openfda_client::{LabelSearch, OpenFdaClient};
use crate::index::query::field_for;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerReport {
    pub answer: String,
    pub route: SynthesisRoute,
    pub classification: Option<Classification>,
    pub search_field: Option<String>,
    pub search_error: Option<String>,
    pub result_count: usize,
    pub elapsed_ms: u128,
}

pub struct MedicationPipeline {
    classifier: Arc<dyn QuestionClassifier>,
    search: Arc<dyn LabelSearch>,
    synthesizer: AnswerSynthesizer,
    search_limit: usize,
    stage_timeout_ms: u64,
}

impl MedicationPipeline {
    pub fn new(
        classifier: Arc<dyn QuestionClassifier>,
        search: Arc<dyn LabelSearch>,
        synthesizer: AnswerSynthesizer,
        search_limit: usize,
        stage_timeout_ms: u64,
    ) -> CoreResult<Self> {
        if search_limit == 0 {
            return Err(CoreError::InvalidConfig(
                "search_limit은 1 이상이어야 합니다".to_string(),
            ));
        }

        if stage_timeout_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "stage_timeout_ms는 1 이상이어야 합니다".to_string(),
            ));
        }

        Ok(Self {
            classifier,
            search,
            synthesizer,
            search_limit,
            stage_timeout_ms,
        })
    }

    /// 설정으로 OpenAI 호환 모델과 openFDA 클라이언트를 연결한 기본 파이프라인을 만든다.
    pub fn from_config(config: &PipelineConfig) -> CoreResult<Self> {
        config.validate()?;

        let model: Arc<dyn ChatModel> = Arc::new(OpenAiChatClient::new(config.llm.clone())?);
        let classifier = Arc::new(LlmClassifier::new(
            model.clone(),
            config.llm.classifier_temperature,
        ));
        let search = Arc::new(OpenFdaClient::new(config.openfda.clone())?);
        let synthesizer = AnswerSynthesizer::new(model, config.llm.generator_temperature);

        Self::new(
            classifier,
            search,
            synthesizer,
            config.openfda.search_limit,
            config.stage_timeout_ms,
        )
    }

    pub async fn answer(&self, question: &str) -> CoreResult<String> {
        self.run(question).await.map(|report| report.answer)
    }

    pub async fn classify(&self, question: &str) -> CoreResult<Classification> {
        validate_question(question)?;
        self.bounded("classification", self.classifier.classify(question))
            .await
    }

    pub async fn run(&self, question: &str) -> CoreResult<AnswerReport> {
        validate_question(question)?;
        let started = Instant::now();

        if is_emergency(question) {
            warn!("응급 키워드 감지, 분류/검색을 건너뜀");
            return Ok(AnswerReport {
                answer: EMERGENCY_SCRIPT.to_string(),
                route: SynthesisRoute::Emergency,
                classification: None,
                search_field: None,
                search_error: None,
                result_count: 0,
                elapsed_ms: started.elapsed().as_millis(),
            });
        }

        let classification = self.classify(question).await?;
        let field = field_for(classification.category);

        let outcome = self
            .search
            .search(field, &classification.keyword, self.search_limit)
            .await;
        let search_error = outcome.error_message();
        info!(
            field,
            keyword = %classification.keyword,
            count = outcome.results.len(),
            error = search_error.as_deref().unwrap_or("-"),
            "라벨 검색 완료"
        );

        let answer = self
            .bounded(
                "synthesis",
                self.synthesizer.synthesize(
                    question,
                    classification.category.as_str(),
                    &classification.keyword,
                    &outcome.results,
                ),
            )
            .await?;

        let elapsed = started.elapsed().as_millis();
        info!(elapsed_ms = elapsed as u64, "답변 파이프라인 완료");

        Ok(AnswerReport {
            answer,
            route: select_route(question, &outcome.results),
            search_field: Some(field.to_string()),
            search_error,
            result_count: outcome.results.len(),
            classification: Some(classification),
            elapsed_ms: elapsed,
        })
    }

    async fn bounded<T>(
        &self,
        stage: &'static str,
        future: impl Future<Output = CoreResult<T>>,
    ) -> CoreResult<T> {
        tokio::time::timeout(Duration::from_millis(self.stage_timeout_ms), future)
            .await
            .map_err(|_| CoreError::Timeout {
                stage,
                timeout_ms: self.stage_timeout_ms,
            })?
    }
}

fn validate_question(question: &str) -> CoreResult<()> {
    if question.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            "question은 비어 있을 수 없습니다".to_string(),
        ));
    }
    Ok(())
}
