// 목적:
// - 파이프라인 전역 설정(검색 API, 언어 모델, 단계 제한 시간)을 정의한다.
//
// 설명:
// - 프로세스 시작 시 한 번 생성되고 이후에는 읽기 전용으로 참조만 된다.
// - JSON 페이로드 또는 환경 변수(.env 포함)에서 만들 수 있다.
//
// 참조:
// - src_rs/index/openfda_client.rs
// - src_rs/core/chat_model.rs

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::core::errors::{CoreError, CoreResult};

pub const DEFAULT_OPENFDA_BASE_URL: &str = "https://api.fda.gov";
pub const DEFAULT_LABEL_ENDPOINT: &str = "/drug/label.json";
pub const DEFAULT_SEARCH_LIMIT: usize = 5;
pub const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_LLM_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LLM_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_STAGE_TIMEOUT_MS: u64 = 90_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenFdaConfig {
    pub base_url: String,
    pub label_endpoint: String,
    pub api_key: Option<String>,
    pub search_limit: usize,
    pub timeout_ms: u64,
}

impl Default for OpenFdaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENFDA_BASE_URL.to_string(),
            label_endpoint: DEFAULT_LABEL_ENDPOINT.to_string(),
            api_key: None,
            search_limit: DEFAULT_SEARCH_LIMIT,
            timeout_ms: DEFAULT_SEARCH_TIMEOUT_MS,
        }
    }
}

impl OpenFdaConfig {
    /// base_url과 label_endpoint를 이어 붙인 검색 URL을 반환한다.
    pub fn label_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.label_endpoint
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatModelConfig {
    pub url: String,
    pub model: String,
    pub auth_token: Option<String>,
    pub timeout_ms: u64,
    pub classifier_temperature: f32,
    pub generator_temperature: f32,
}

impl Default for ChatModelConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_LLM_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            auth_token: None,
            timeout_ms: DEFAULT_LLM_TIMEOUT_MS,
            classifier_temperature: 0.0,
            generator_temperature: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub openfda: OpenFdaConfig,
    pub llm: ChatModelConfig,
    pub stage_timeout_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            openfda: OpenFdaConfig::default(),
            llm: ChatModelConfig::default(),
            stage_timeout_ms: DEFAULT_STAGE_TIMEOUT_MS,
        }
    }
}

impl PipelineConfig {
    /// JSON 문자열에서 설정을 읽는다. 누락된 필드는 기본값으로 채운다.
    pub fn from_json(raw: &str) -> CoreResult<Self> {
        let config: PipelineConfig = serde_json::from_str(raw).map_err(|error| {
            CoreError::Serialization(format!("설정 JSON 파싱 실패: {}", error))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 환경 변수에서 설정을 읽는다. 작업 디렉터리에 .env가 있으면 먼저 적재한다.
    pub fn from_env() -> CoreResult<Self> {
        dotenvy::dotenv().ok();

        let mut config = PipelineConfig::default();
        if let Some(base_url) = read_var("OPENFDA_BASE_URL") {
            config.openfda.base_url = base_url;
        }
        config.openfda.api_key = read_var("OPENFDA_API_KEY");
        if let Some(limit) = parse_var::<usize>("OPENFDA_SEARCH_LIMIT")? {
            config.openfda.search_limit = limit;
        }
        if let Some(timeout_ms) = parse_var::<u64>("OPENFDA_TIMEOUT_MS")? {
            config.openfda.timeout_ms = timeout_ms;
        }

        if let Some(url) = read_var("LLM_API_URL") {
            config.llm.url = url;
        }
        if let Some(model) = read_var("LLM_MODEL") {
            config.llm.model = model;
        }
        config.llm.auth_token = read_var("OPENAI_API_KEY");
        if let Some(timeout_ms) = parse_var::<u64>("LLM_TIMEOUT_MS")? {
            config.llm.timeout_ms = timeout_ms;
        }
        if let Some(timeout_ms) = parse_var::<u64>("STAGE_TIMEOUT_MS")? {
            config.stage_timeout_ms = timeout_ms;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.openfda.base_url.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "openfda.base_url은 비어 있을 수 없습니다".to_string(),
            ));
        }

        if self.openfda.search_limit == 0 {
            return Err(CoreError::InvalidConfig(
                "openfda.search_limit은 1 이상이어야 합니다".to_string(),
            ));
        }

        if self.openfda.timeout_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "openfda.timeout_ms는 1 이상이어야 합니다".to_string(),
            ));
        }

        if self.llm.url.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "llm.url은 비어 있을 수 없습니다".to_string(),
            ));
        }

        if self.llm.model.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "llm.model은 비어 있을 수 없습니다".to_string(),
            ));
        }

        if self.llm.timeout_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "llm.timeout_ms는 1 이상이어야 합니다".to_string(),
            ));
        }

        if self.stage_timeout_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "stage_timeout_ms는 1 이상이어야 합니다".to_string(),
            ));
        }

        Ok(())
    }
}

fn read_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: FromStr>(name: &str) -> CoreResult<Option<T>> {
    match read_var(name) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            CoreError::InvalidConfig(format!("{} 값을 해석할 수 없습니다: {}", name, raw))
        }),
    }
}
