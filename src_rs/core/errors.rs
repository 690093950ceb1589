// 목적:
// - Rust 코어 계층의 표준 오류 타입을 정의한다.
//
// 설명:
// - 입력/설정/HTTP/모델/분류/생성 오류를 명시적으로 구분한다.
// - 검색 실패(404, 전송 오류)는 여기에 포함하지 않는다. 검색 결과 값(SearchOutcome)으로 표현된다.
//
// 디자인 패턴:
// - 도메인 오류 열거형(Domain Error Enum).
//
// 참조:
// - src_rs/core/answer_pipeline.rs
// - src_rs/index/openfda_client.rs

use thiserror::Error;

/// 코어 계층에서 공통으로 사용하는 오류 열거형이다.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("입력값이 유효하지 않습니다: {0}")]
    InvalidInput(String),
    #[error("설정값이 유효하지 않습니다: {0}")]
    InvalidConfig(String),
    #[error("HTTP 호출에 실패했습니다: {0}")]
    Http(String),
    #[error("직렬화/역직렬화에 실패했습니다: {0}")]
    Serialization(String),
    #[error("언어 모델 호출에 실패했습니다: {0}")]
    Model(String),
    #[error("질문 분류 결과를 해석할 수 없습니다: {0}")]
    ClassificationParse(String),
    #[error("답변 생성에 실패했습니다: {0}")]
    Synthesis(String),
    #[error("{stage} 단계가 제한 시간({timeout_ms}ms)을 초과했습니다")]
    Timeout { stage: &'static str, timeout_ms: u64 },
}

pub type CoreResult<T> = Result<T, CoreError>;
