// 목적:
// - 의약품 질의응답 Rust 코어의 진입점을 제공한다.
//
// 설명:
// - 질문 분류 -> openFDA 라벨 검색 -> 한국어 답변 생성 파이프라인을 라이브러리로 노출한다.
// - `python` feature를 켜면 같은 파이프라인을 Python 확장 모듈로도 노출한다.
//
// 디자인 패턴:
// - 계층형 모듈 구조(api/core/index).
//
// 참조:
// - src_rs/core/answer_pipeline.rs
// - src_rs/api/answer_bridge.rs

#[cfg(feature = "python")]
pub mod api;
pub mod core;
pub mod index;

pub use crate::core::answer_pipeline::{AnswerReport, MedicationPipeline};
pub use crate::core::config::PipelineConfig;
pub use crate::core::errors::{CoreError, CoreResult};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
#[pyo3(name = "_medinfo_qa")]
fn medinfo_qa_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<api::answer_bridge::PyMedicationBridge>()?;
    Ok(())
}
