// 목적:
// - Python FFI 경계 모듈을 선언한다.
//
// 설명:
// - `python` feature가 켜진 경우에만 컴파일된다.
//
// 참조:
// - src_rs/api/answer_bridge.rs

pub mod answer_bridge;
