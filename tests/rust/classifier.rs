use rstest::rstest;

use medinfo_qa::core::classifier::{parse_classification, Category, LlmClassifier, QuestionClassifier};
use medinfo_qa::core::errors::CoreError;
use medinfo_qa::core::prompts::{classifier_system_prompt, SYMPTOM_TRANSLATIONS};

use crate::support::ScriptedModel;

#[rstest]
#[case(r#"{"category": "brand_name", "keyword": "Tylenol"}"#, Category::BrandName, "Tylenol")]
#[case(r#"{"category": "generic_name", "keyword": "acetaminophen"}"#, Category::GenericName, "acetaminophen")]
#[case(r#"  {"category": "indication", "keyword": " headache "}  "#, Category::Indication, "headache")]
#[case("```json\n{\"category\": \"indication\", \"keyword\": \"pain\"}\n```", Category::Indication, "pain")]
fn parses_well_formed_output(#[case] raw: &str, #[case] category: Category, #[case] keyword: &str) {
    let classification = parse_classification(raw).unwrap();
    assert_eq!(classification.category, category);
    assert_eq!(classification.keyword, keyword);
}

#[rstest]
#[case("brand_name")]
#[case(r#"Sure! {"category": "brand_name", "keyword": "Tylenol"}"#)]
#[case(r#"[{"category": "brand_name", "keyword": "Tylenol"}]"#)]
#[case(r#"{"category": "brand_name"}"#)]
#[case(r#"{"keyword": "Tylenol"}"#)]
#[case(r#"{"category": "brand_name", "keyword": ""}"#)]
#[case(r#"{"category": "symptom", "keyword": "headache"}"#)]
#[case(r#"{"category": "BRAND_NAME", "keyword": "Tylenol"}"#)]
#[case(r#"{"category": "brand_name", "keyword": 42}"#)]
fn rejects_malformed_or_out_of_taxonomy_output(#[case] raw: &str) {
    let result = parse_classification(raw);
    assert!(
        matches!(result, Err(CoreError::ClassificationParse(_))),
        "expected parse error, got {:?}",
        result
    );
}

#[test]
fn system_prompt_contains_taxonomy_and_translation_table() {
    let prompt = classifier_system_prompt();

    for category in Category::ALL {
        assert!(prompt.contains(&format!("\"{}\"", category.as_str())));
    }
    for (korean, english) in SYMPTOM_TRANSLATIONS {
        assert!(prompt.contains(&format!("{} -> {}", korean, english)));
    }
    assert!(prompt.contains("타이레놀이 뭐야?"));
    assert!(prompt.contains("Return ONLY one JSON object"));
}

#[tokio::test]
async fn classifies_brand_name_question() {
    let model = ScriptedModel::replying(&[r#"{"category": "brand_name", "keyword": "Tylenol"}"#]);
    let classifier = LlmClassifier::new(model.clone(), 0.0);

    let classification = classifier.classify("Tylenol이 뭐야?").await.unwrap();

    assert_eq!(classification.category, Category::BrandName);
    assert_eq!(classification.keyword, "Tylenol");

    let prompt = model.prompt_at(0);
    assert_eq!(prompt.user, "Tylenol이 뭐야?");
    assert_eq!(prompt.temperature, 0.0);
    assert_eq!(prompt.system, classifier_system_prompt());
}

#[tokio::test]
async fn unparseable_model_output_fails_classification() {
    let model = ScriptedModel::replying(&["I think this is about headaches."]);
    let classifier = LlmClassifier::new(model, 0.0);

    let result = classifier.classify("두통약 추천해줘").await;

    assert!(matches!(result, Err(CoreError::ClassificationParse(_))));
}

#[tokio::test]
async fn empty_question_is_rejected_before_model_call() {
    let model = ScriptedModel::replying(&[]);
    let classifier = LlmClassifier::new(model.clone(), 0.0);

    let result = classifier.classify("   ").await;

    assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    assert_eq!(model.call_count(), 0);
}
