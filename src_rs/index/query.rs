// 목적:
// - openFDA 검색식(search 파라미터) 생성 규칙을 제공한다.
//
// 설명:
// - 검색어에 공백이 있으면 `field:"term with space"`, 없으면 `field:term` 형태로 만든다.
// - 검색어 안의 큰따옴표는 구문 경계를 깨뜨리므로 제거한다.
//
// 디자인 패턴:
// - 가드 함수(Guard Function).
//
// 참조:
// - src_rs/index/openfda_client.rs

use serde::{Deserialize, Serialize};

use crate::core::classifier::Category;
use crate::core::errors::{CoreError, CoreResult};

pub const BRAND_NAME_FIELD: &str = "openfda.brand_name";
pub const GENERIC_NAME_FIELD: &str = "openfda.generic_name";
pub const INDICATION_FIELD: &str = "indications_and_usage";

/// 분류 카테고리에 대응하는 검색 필드를 반환한다.
pub fn field_for(category: Category) -> &'static str {
    match category {
        Category::BrandName => BRAND_NAME_FIELD,
        Category::GenericName => GENERIC_NAME_FIELD,
        Category::Indication => INDICATION_FIELD,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub field: String,
    pub term: String,
}

impl SearchQuery {
    pub fn new(field: &str, term: &str) -> CoreResult<Self> {
        validate_field(field)?;

        let cleaned = term.replace('"', "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return Err(CoreError::InvalidInput(
                "검색어는 비어 있을 수 없습니다".to_string(),
            ));
        }

        Ok(Self {
            field: field.to_string(),
            term: cleaned.to_string(),
        })
    }

    pub fn for_category(category: Category, term: &str) -> CoreResult<Self> {
        Self::new(field_for(category), term)
    }

    /// 직렬화된 검색식을 반환한다.
    pub fn expression(&self) -> String {
        if self.term.chars().any(char::is_whitespace) {
            format!("{}:\"{}\"", self.field, self.term)
        } else {
            format!("{}:{}", self.field, self.term)
        }
    }
}

/// 필드/검색어로 검색식을 바로 만든다.
pub fn build_search_expression(field: &str, term: &str) -> CoreResult<String> {
    SearchQuery::new(field, term).map(|query| query.expression())
}

fn validate_field(field: &str) -> CoreResult<()> {
    if field.trim().is_empty() {
        return Err(CoreError::InvalidInput(
            "검색 필드는 비어 있을 수 없습니다".to_string(),
        ));
    }

    let valid = field
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.');

    if !valid {
        return Err(CoreError::InvalidInput(format!(
            "검색 필드에는 영문/숫자/밑줄/점만 사용할 수 있습니다: {}",
            field
        )));
    }

    Ok(())
}
