// 목적:
// - openFDA 라벨 검색 계층 모듈을 선언한다.
//
// 설명:
// - 검색식 생성 유틸과 HTTP 클라이언트 구현을 분리해 유지보수성을 확보한다.
//
// 디자인 패턴:
// - 어댑터 패턴(Adapter Pattern).
//
// 참조:
// - src_rs/index/query.rs
// - src_rs/index/openfda_client.rs

pub mod openfda_client;
pub mod query;
