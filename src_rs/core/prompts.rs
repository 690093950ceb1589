// 목적:
// - 분류(classifier)/생성(generator) 단계의 프롬프트와 답변 템플릿 상수를 정의한다.
//
// 설명:
// - 분류 프롬프트는 3개 카테고리, 카테고리별 한/영 예시, 키워드 추출 규칙을 담는다.
// - 생성 프롬프트는 데이터 무결성, 영문 성분명 유지, 안전 항목 필수 포함, 고정 답변 형식을 지시한다.
// - 안전 항목 제목과 "정보 없음" 문장은 코드 후처리에서도 같은 상수를 사용한다.
//
// 참조:
// - src_rs/core/classifier.rs
// - src_rs/core/synthesizer.rs

/// 한국어 증상 표현 -> 영문 의학 용어.
pub const SYMPTOM_TRANSLATIONS: &[(&str, &str)] = &[
    ("두통", "headache"),
    ("소화불량", "indigestion"),
    ("통증", "pain"),
    ("발열", "fever"),
    ("감기", "cold"),
    ("알레르기", "allergy"),
    ("불면", "insomnia"),
];

pub const NOT_FOUND_SENTENCE: &str = "검색 결과에서 해당 정보를 찾을 수 없습니다.";

pub const DISCLAIMER: &str = "*FDA 데이터 기반 | 정확한 복용은 의사 또는 약사와 상담하세요.*";

/// 주의사항 블록의 필수 안전 항목.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetySection {
    pub heading: &'static str,
    pub absent: &'static str,
}

pub const SAFETY_SECTIONS: [SafetySection; 4] = [
    SafetySection {
        heading: "**병용금기 (Drug Interactions)**:",
        absent: "검색 결과에 병용금기 정보가 없습니다.",
    },
    SafetySection {
        heading: "**금기사항 (Contraindications)**:",
        absent: "검색 결과에 금기사항 정보가 없습니다.",
    },
    SafetySection {
        heading: "**경고 (Warnings)**:",
        absent: "검색 결과에 경고 정보가 없습니다.",
    },
    SafetySection {
        heading: "**임산부/수유부**:",
        absent: "검색 결과에 임산부/수유부 관련 정보가 없습니다. 복용 전 의사와 상담하세요.",
    },
];

pub const EMERGENCY_TRIGGERS: &[&str] = &[
    "과량복용",
    "중독",
    "호흡곤란",
    "의식불명",
    "심한 알레르기",
    "아나필락시스",
    "출혈",
];

/// 여러 단어로 된 트리거의 띄어쓰기/붙여쓰기 표기.
pub const EMERGENCY_TRIGGER_VARIANTS: &[&str] = &[
    "과량 복용",
    "호흡 곤란",
    "의식 불명",
    "심한알레르기",
];

pub const EMERGENCY_SCRIPT: &str = "[응급 상황 안내]
이 상황은 응급 상황일 수 있습니다.
- 즉시 119에 연락하거나 가까운 응급실을 방문하세요.
- 미국: Poison Control 1-800-222-1222";

/// 분류 단계 시스템 지시문.
pub fn classifier_system_prompt() -> String {
    let translations = SYMPTOM_TRANSLATIONS
        .iter()
        .map(|(korean, english)| format!("   - {} -> {}", korean, english))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You classify medication questions for searching the OpenFDA drug label database.
Decide which field the question should be searched by and extract one search keyword.

[Categories]
- "brand_name": the question names a brand/trade name
  Examples: "Tell me about Tylenol", "What is Advil used for?", "Lipitor 부작용", "타이레놀이 뭐야?"
- "generic_name": the question names a generic name or active ingredient
  Examples: "What is acetaminophen?", "ibuprofen 정보", "아세트아미노펜 복용법"
- "indication": the question describes a condition, symptom, or use case
  Examples: "Medications for headache", "두통약 추천", "pain relief options", "소화불량에 좋은 약"

[Keyword Rules]
1. Use the most specific search term in the question.
2. Keep drug names in their exact English spelling.
3. Translate Korean symptom words to English medical terms:
{}
   Any other term: translate it as best you can, or use it as written.
4. When several keywords are possible, return only the single most relevant one.

[Output]
Return ONLY one JSON object and nothing else:
{{"category": "brand_name|generic_name|indication", "keyword": "English search term"}}

Examples:
- "Tylenol이 뭐야?" -> {{"category": "brand_name", "keyword": "Tylenol"}}
- "acetaminophen 병용금기" -> {{"category": "generic_name", "keyword": "acetaminophen"}}
- "두통약 추천해줘" -> {{"category": "indication", "keyword": "headache"}}
- "ibuprofen과 함께 먹으면 안되는 약" -> {{"category": "generic_name", "keyword": "ibuprofen"}}"#,
        translations
    )
}

/// 생성 단계 시스템 지시문.
pub fn generator_system_prompt() -> String {
    format!(
        r#"당신은 FDA 의약품 라벨 정보를 안내하는 전문 어시스턴트입니다.
제공된 검색 결과만 근거로 한국어 답변을 작성합니다.

[원칙]
1. 데이터 무결성: 검색 결과에 있는 정보만 사용하세요.
   - 검색 결과에 없는 내용은 절대 만들어내지 마세요.
   - 정보가 없으면 "{not_found}"라고 적으세요.
2. 표기: 성분명(generic name)과 브랜드명은 영문 원문 그대로 쓰세요.
   - 예: "acetaminophen", "ibuprofen", "Tylenol", "Advil"
3. 안전 항목: 아래 네 항목은 내용이 없어도 절대 생략하지 마세요.
   - 병용금기 (Drug Interactions)
   - 금기사항 (Contraindications)
   - 경고 (Warnings)
   - 임산부/수유부

[답변 형식]
## 약품 정보

**브랜드명**: [Brand Name]
**주성분**: [Generic Name - 영문 유지]
**효능**: [한국어 설명]

## 용법용량
[용법/용량 요약]

## 주의사항

{interactions}
[요약. 없으면 "{interactions_absent}"]

{contraindications}
[요약. 없으면 "{contraindications_absent}"]

{warnings}
[요약. 없으면 "{warnings_absent}"]

{pregnancy}
[요약. 없으면 "{pregnancy_absent}"]

---
{disclaimer}"#,
        not_found = NOT_FOUND_SENTENCE,
        interactions = SAFETY_SECTIONS[0].heading,
        interactions_absent = SAFETY_SECTIONS[0].absent,
        contraindications = SAFETY_SECTIONS[1].heading,
        contraindications_absent = SAFETY_SECTIONS[1].absent,
        warnings = SAFETY_SECTIONS[2].heading,
        warnings_absent = SAFETY_SECTIONS[2].absent,
        pregnancy = SAFETY_SECTIONS[3].heading,
        pregnancy_absent = SAFETY_SECTIONS[3].absent,
        disclaimer = DISCLAIMER,
    )
}

/// 생성 단계 사용자 메시지.
pub fn generator_user_prompt(question: &str, category: &str, keyword: &str, context: &str) -> String {
    format!(
        "질문: {}\n\n검색 방식: {} 검색 -> \"{}\"\n\n검색 결과:\n{}",
        question, category, keyword, context
    )
}
