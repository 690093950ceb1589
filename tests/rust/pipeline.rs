use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use medinfo_qa::core::answer_pipeline::MedicationPipeline;
use medinfo_qa::core::chat_model::ChatModel;
use medinfo_qa::core::classifier::{Category, LlmClassifier};
use medinfo_qa::core::config::OpenFdaConfig;
use medinfo_qa::core::errors::CoreError;
use medinfo_qa::core::prompts::{EMERGENCY_SCRIPT, SAFETY_SECTIONS};
use medinfo_qa::core::synthesizer::{AnswerSynthesizer, SynthesisRoute};
use medinfo_qa::index::openfda_client::{LabelSearch, OpenFdaClient, SearchOutcome};

use crate::support::{full_answer, tylenol_label, RecordingSearch, ScriptedModel};

fn pipeline_with(
    model: Arc<ScriptedModel>,
    search: Arc<dyn LabelSearch>,
    stage_timeout_ms: u64,
) -> MedicationPipeline {
    let model: Arc<dyn ChatModel> = model;
    MedicationPipeline::new(
        Arc::new(LlmClassifier::new(model.clone(), 0.0)),
        search,
        AnswerSynthesizer::new(model, 0.3),
        5,
        stage_timeout_ms,
    )
    .unwrap()
}

#[tokio::test]
async fn brand_name_question_searches_brand_field() {
    let model = ScriptedModel::replying(&[
        r#"{"category": "brand_name", "keyword": "Tylenol"}"#,
        full_answer("ACETAMINOPHEN").as_str(),
    ]);
    let search = RecordingSearch::new(SearchOutcome::found(vec![tylenol_label()]));
    let pipeline = pipeline_with(model.clone(), search.clone(), 5_000);

    let report = pipeline.run("Tylenol이 뭐야?").await.unwrap();

    assert_eq!(
        search.calls.lock().unwrap().clone(),
        vec![("openfda.brand_name".to_string(), "Tylenol".to_string(), 5)]
    );
    assert_eq!(report.route, SynthesisRoute::Grounded);
    assert_eq!(report.search_field.as_deref(), Some("openfda.brand_name"));
    assert_eq!(report.classification.unwrap().category, Category::BrandName);
    assert_eq!(report.result_count, 1);
    assert!(report.answer.contains("ACETAMINOPHEN"));
    assert_eq!(model.call_count(), 2);
}

#[tokio::test]
async fn symptom_question_hits_indication_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drug/label.json"))
        .and(query_param("search", "indications_and_usage:headache"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "results": [tylenol_label()] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let model = ScriptedModel::replying(&[
        r#"{"category": "indication", "keyword": "headache"}"#,
        full_answer("ACETAMINOPHEN").as_str(),
    ]);
    let search = Arc::new(
        OpenFdaClient::new(OpenFdaConfig {
            base_url: server.uri(),
            ..OpenFdaConfig::default()
        })
        .unwrap(),
    );
    let pipeline = pipeline_with(model, search, 5_000);

    let report = pipeline.run("두통약 추천해줘").await.unwrap();

    assert_eq!(report.search_field.as_deref(), Some("indications_and_usage"));
    assert_eq!(report.search_error, None);
    assert_eq!(report.route, SynthesisRoute::Grounded);
}

#[tokio::test]
async fn not_found_degrades_to_absent_markers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let model = ScriptedModel::replying(&[r#"{"category": "brand_name", "keyword": "Nonexistol"}"#]);
    let search = Arc::new(
        OpenFdaClient::new(OpenFdaConfig {
            base_url: server.uri(),
            ..OpenFdaConfig::default()
        })
        .unwrap(),
    );
    let pipeline = pipeline_with(model.clone(), search, 5_000);

    let report = pipeline.run("Nonexistol 복용법").await.unwrap();

    assert_eq!(report.route, SynthesisRoute::NoGrounding);
    assert_eq!(report.search_error.as_deref(), Some("No results found"));
    assert_eq!(report.result_count, 0);
    for section in SAFETY_SECTIONS.iter() {
        assert!(report.answer.contains(section.absent));
    }
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn transport_failure_is_reported_but_not_fatal() {
    let model = ScriptedModel::replying(&[r#"{"category": "generic_name", "keyword": "ibuprofen"}"#]);
    let search = RecordingSearch::new(SearchOutcome::transport("connection reset"));
    let pipeline = pipeline_with(model, search, 5_000);

    let report = pipeline.run("ibuprofen 정보").await.unwrap();

    assert_eq!(report.route, SynthesisRoute::NoGrounding);
    assert_eq!(report.search_error.as_deref(), Some("connection reset"));
}

#[tokio::test]
async fn emergency_question_short_circuits_every_stage() {
    let model = ScriptedModel::replying(&[]);
    let search = RecordingSearch::new(SearchOutcome::found(vec![tylenol_label()]));
    let pipeline = pipeline_with(model.clone(), search.clone(), 5_000);

    let report = pipeline.run("약 먹고 호흡곤란이 와요").await.unwrap();

    assert_eq!(report.answer, EMERGENCY_SCRIPT);
    assert_eq!(report.route, SynthesisRoute::Emergency);
    assert!(report.classification.is_none());
    assert_eq!(model.call_count(), 0);
    assert_eq!(search.call_count(), 0);
}

#[tokio::test]
async fn classification_failure_is_terminal() {
    let model = ScriptedModel::replying(&["brand name, probably"]);
    let search = RecordingSearch::new(SearchOutcome::found(vec![tylenol_label()]));
    let pipeline = pipeline_with(model, search.clone(), 5_000);

    let result = pipeline.answer("Tylenol이 뭐야?").await;

    assert!(matches!(result, Err(CoreError::ClassificationParse(_))));
    assert_eq!(search.call_count(), 0);
}

#[tokio::test]
async fn synthesis_failure_is_terminal() {
    let model = ScriptedModel::new(vec![
        Ok(r#"{"category": "brand_name", "keyword": "Tylenol"}"#.to_string()),
        Err(CoreError::Model("upstream 500".to_string())),
    ]);
    let search = RecordingSearch::new(SearchOutcome::found(vec![tylenol_label()]));
    let pipeline = pipeline_with(model, search, 5_000);

    let result = pipeline.answer("Tylenol이 뭐야?").await;

    assert!(matches!(result, Err(CoreError::Synthesis(_))));
}

#[tokio::test]
async fn slow_model_stage_times_out() {
    let model = ScriptedModel::slow(
        r#"{"category": "brand_name", "keyword": "Tylenol"}"#,
        Duration::from_millis(500),
    );
    let search = RecordingSearch::new(SearchOutcome::not_found());
    let pipeline = pipeline_with(model, search, 50);

    let result = pipeline.answer("Tylenol이 뭐야?").await;

    assert!(matches!(
        result,
        Err(CoreError::Timeout {
            stage: "classification",
            timeout_ms: 50
        })
    ));
}

#[tokio::test]
async fn blank_question_is_rejected() {
    let model = ScriptedModel::replying(&[]);
    let search = RecordingSearch::new(SearchOutcome::not_found());
    let pipeline = pipeline_with(model, search, 5_000);

    assert!(matches!(
        pipeline.answer(" \n ").await,
        Err(CoreError::InvalidInput(_))
    ));
}

#[test]
fn zero_search_limit_is_rejected() {
    let model: Arc<dyn ChatModel> = ScriptedModel::replying(&[]);
    let result = MedicationPipeline::new(
        Arc::new(LlmClassifier::new(model.clone(), 0.0)),
        RecordingSearch::new(SearchOutcome::not_found()),
        AnswerSynthesizer::new(model, 0.3),
        0,
        5_000,
    );
    assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
}
