// 목적:
// - 핵심 런타임 계층 모듈을 선언한다.
//
// 설명:
// - 분류/생성 단계, 모델 경계, 설정, 오류 모델을 분리하고 파이프라인이 이를 조합한다.
//
// 디자인 패턴:
// - 명시적 오류 모델(Explicit Error Model).
//
// 참조:
// - src_rs/core/errors.rs
// - src_rs/core/answer_pipeline.rs

pub mod answer_pipeline;
pub mod chat_model;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod prompts;
pub mod synthesizer;
