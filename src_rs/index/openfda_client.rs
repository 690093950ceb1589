// 목적:
// - openFDA 의약품 라벨 검색 API 호출을 담당한다.
//
// 설명:
// - 검색식과 limit(선택적으로 api_key)을 쿼리 파라미터로 붙여 GET 요청을 보낸다.
// - 404는 "결과 없음", 그 밖의 전송/상태/본문 오류는 "전송 실패"로 정규화한다.
// - 어떤 경우에도 호출자에게는 SearchOutcome이 반환되고 오류가 전파되지 않는다.
//
// 디자인 패턴:
// - 어댑터(Adapter) + 결과 값 정규화(Result Normalization).
//
// 참조:
// - src_rs/index/query.rs
// - src_rs/core/answer_pipeline.rs

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, instrument, warn};

use crate::core::classifier::Category;
use crate::core::config::OpenFdaConfig;
use crate::core::errors::{CoreError, CoreResult};
use crate::index::query::{
    SearchQuery, BRAND_NAME_FIELD, GENERIC_NAME_FIELD, INDICATION_FIELD,
};

pub const NOT_FOUND_MESSAGE: &str = "No results found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFailure {
    NotFound,
    Transport(String),
}

impl fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchFailure::NotFound => write!(f, "{}", NOT_FOUND_MESSAGE),
            SearchFailure::Transport(message) => write!(f, "{}", message),
        }
    }
}

/// 검색 결과. 실패해도 results는 항상 존재한다(빈 목록).
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub results: Vec<Value>,
    pub failure: Option<SearchFailure>,
}

impl SearchOutcome {
    pub fn found(results: Vec<Value>) -> Self {
        Self {
            results,
            failure: None,
        }
    }

    pub fn not_found() -> Self {
        Self {
            results: Vec::new(),
            failure: Some(SearchFailure::NotFound),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            failure: Some(SearchFailure::Transport(message.into())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn error_message(&self) -> Option<String> {
        self.failure.as_ref().map(ToString::to_string)
    }

    pub fn to_payload(&self) -> SearchResultPayload {
        SearchResultPayload {
            error: self.error_message(),
            results: self.results.clone(),
        }
    }
}

/// 외부로 내보내는 `{error?, results}` 형태.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub results: Vec<Value>,
}

/// 라벨 검색 백엔드 경계.
#[async_trait]
pub trait LabelSearch: Send + Sync {
    async fn search(&self, field: &str, term: &str, limit: usize) -> SearchOutcome;
}

#[derive(Clone)]
pub struct OpenFdaClient {
    client: Client,
    config: OpenFdaConfig,
}

impl OpenFdaClient {
    pub fn new(config: OpenFdaConfig) -> CoreResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "openfda.base_url은 비어 있을 수 없습니다".to_string(),
            ));
        }

        if config.timeout_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "openfda.timeout_ms는 1 이상이어야 합니다".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|error| CoreError::Http(format!("HTTP 클라이언트 생성 실패: {}", error)))?;

        Ok(Self { client, config })
    }

    pub fn default_limit(&self) -> usize {
        self.config.search_limit
    }

    pub async fn search_by_brand_name(&self, brand_name: &str) -> SearchOutcome {
        self.search(BRAND_NAME_FIELD, brand_name, self.config.search_limit)
            .await
    }

    pub async fn search_by_generic_name(&self, generic_name: &str) -> SearchOutcome {
        self.search(GENERIC_NAME_FIELD, generic_name, self.config.search_limit)
            .await
    }

    pub async fn search_by_indication(&self, indication: &str) -> SearchOutcome {
        self.search(INDICATION_FIELD, indication, self.config.search_limit)
            .await
    }

    pub async fn search_category(&self, category: Category, term: &str) -> SearchOutcome {
        match category {
            Category::BrandName => self.search_by_brand_name(term).await,
            Category::GenericName => self.search_by_generic_name(term).await,
            Category::Indication => self.search_by_indication(term).await,
        }
    }

    async fn fetch(&self, query: &SearchQuery, limit: usize) -> SearchOutcome {
        let expression = query.expression();
        let limit_param = limit.max(1).to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("search", expression.as_str()),
            ("limit", limit_param.as_str()),
        ];
        if let Some(api_key) = self.config.api_key.as_deref() {
            params.push(("api_key", api_key));
        }

        let response = match self
            .client
            .get(self.config.label_url())
            .query(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => {
                return SearchOutcome::transport(format!("openFDA 요청 실패: {}", error));
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return SearchOutcome::not_found();
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => {
                return SearchOutcome::transport(format!("openFDA 본문 읽기 실패: {}", error));
            }
        };

        if !status.is_success() {
            return SearchOutcome::transport(format!(
                "openFDA 상태 오류: status={}, body={}",
                status, body
            ));
        }

        match parse_label_response(&body) {
            Ok(results) => SearchOutcome::found(results),
            Err(error) => SearchOutcome::transport(format!("openFDA 응답 파싱 실패: {}", error)),
        }
    }
}

#[async_trait]
impl LabelSearch for OpenFdaClient {
    #[instrument(skip(self), level = "debug")]
    async fn search(&self, field: &str, term: &str, limit: usize) -> SearchOutcome {
        let query = match SearchQuery::new(field, term) {
            Ok(query) => query,
            Err(error) => return SearchOutcome::transport(error.to_string()),
        };

        let outcome = self.fetch(&query, limit).await;
        match &outcome.failure {
            None => debug!(count = outcome.results.len(), "openFDA 검색 완료"),
            Some(SearchFailure::NotFound) => debug!(expression = %query.expression(), "openFDA 결과 없음"),
            Some(SearchFailure::Transport(message)) => warn!(error = %message, "openFDA 검색 실패"),
        }
        outcome
    }
}

/// 응답 본문에서 results 배열을 꺼낸다. 키가 없으면 빈 목록이다.
pub fn parse_label_response(body: &str) -> Result<Vec<Value>, String> {
    let value: Value =
        serde_json::from_str(body.trim()).map_err(|error| format!("JSON 파싱 실패: {}", error))?;

    if !value.is_object() {
        return Err("JSON 객체가 아닌 응답".to_string());
    }

    match value.get("results") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(_) => Err("results가 배열이 아닙니다".to_string()),
    }
}
