// 목적:
// - Python에서 호출 가능한 의약품 질의응답 브릿지 클래스를 제공한다.
//
// 설명:
// - 설정(JSON 또는 환경 변수)으로 파이프라인을 한 번 만들고,
//   질문 문자열을 받아 답변 문자열 또는 결과 JSON을 반환한다.
// - reqwest 연결 풀이 런타임에 묶이므로 Tokio 런타임은 객체 생성 시 하나만 만든다.
//
// 디자인 패턴:
// - 파사드(Facade) + 실패 빠르게(Fail Fast).
//
// 참조:
// - src_rs/core/answer_pipeline.rs
// - src_rs/index/openfda_client.rs

use pyo3::exceptions::PyRuntimeError;
use pyo3::prelude::*;
use tokio::runtime::{Builder, Runtime};
use tracing_subscriber::EnvFilter;

use crate::core::answer_pipeline::MedicationPipeline;
use crate::core::classifier::Category;
use crate::core::config::PipelineConfig;
use crate::index::openfda_client::{LabelSearch, OpenFdaClient};
use crate::index::query::field_for;

/// Python에 노출되는 질의응답 브릿지 클래스다.
#[pyclass(name = "MedicationBridge")]
pub struct PyMedicationBridge {
    runtime: Runtime,
    pipeline: MedicationPipeline,
    search_client: OpenFdaClient,
    search_limit: usize,
}

#[pymethods]
impl PyMedicationBridge {
    /// 브릿지 객체를 생성한다. config_json이 없으면 환경 변수를 읽는다.
    #[new]
    #[pyo3(signature = (config_json=None))]
    pub fn new(config_json: Option<String>) -> PyResult<Self> {
        init_tracing();

        let config = match config_json {
            Some(raw) => PipelineConfig::from_json(&raw),
            None => PipelineConfig::from_env(),
        }
        .map_err(|error| PyRuntimeError::new_err(error.to_string()))?;

        let runtime = create_runtime().map_err(PyRuntimeError::new_err)?;
        let pipeline = MedicationPipeline::from_config(&config)
            .map_err(|error| PyRuntimeError::new_err(error.to_string()))?;
        let search_client = OpenFdaClient::new(config.openfda.clone())
            .map_err(|error| PyRuntimeError::new_err(error.to_string()))?;

        Ok(Self {
            runtime,
            pipeline,
            search_client,
            search_limit: config.openfda.search_limit,
        })
    }

    /// 질문에 대한 최종 한국어 답변을 반환한다.
    pub fn answer(&self, question: String) -> PyResult<String> {
        self.runtime
            .block_on(self.pipeline.answer(&question))
            .map_err(|error| PyRuntimeError::new_err(error.to_string()))
    }

    /// 답변과 분류/검색 정보를 담은 결과 JSON을 반환한다.
    pub fn answer_report(&self, question: String) -> PyResult<String> {
        let report = self
            .runtime
            .block_on(self.pipeline.run(&question))
            .map_err(|error| PyRuntimeError::new_err(error.to_string()))?;

        serde_json::to_string(&report)
            .map_err(|error| PyRuntimeError::new_err(format!("답변 결과 직렬화 실패: {}", error)))
    }

    /// 질문 분류 결과 JSON을 반환한다.
    pub fn classify(&self, question: String) -> PyResult<String> {
        let classification = self
            .runtime
            .block_on(self.pipeline.classify(&question))
            .map_err(|error| PyRuntimeError::new_err(error.to_string()))?;

        serde_json::to_string(&classification)
            .map_err(|error| PyRuntimeError::new_err(format!("분류 결과 직렬화 실패: {}", error)))
    }

    /// 카테고리로 라벨을 검색해 `{error?, results}` JSON을 반환한다.
    #[pyo3(signature = (category, term, limit=None))]
    pub fn search(&self, category: String, term: String, limit: Option<usize>) -> PyResult<String> {
        let category = category
            .parse::<Category>()
            .map_err(|error| PyRuntimeError::new_err(error.to_string()))?;

        let outcome = self.runtime.block_on(self.search_client.search(
            field_for(category),
            &term,
            limit.unwrap_or(self.search_limit),
        ));

        serde_json::to_string(&outcome.to_payload())
            .map_err(|error| PyRuntimeError::new_err(format!("검색 결과 직렬화 실패: {}", error)))
    }
}

fn create_runtime() -> Result<Runtime, String> {
    Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|error| format!("Tokio 런타임 생성 실패: {}", error))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
