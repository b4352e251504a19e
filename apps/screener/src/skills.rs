//! LLM-backed skill categorization.
//!
//! Hard contract: `categorize` never surfaces an error to its caller. A failed
//! model call, a response without JSON, or a malformed object all collapse to
//! the all-empty `SkillSet`, logged at warn level. The batch runner relies on
//! this to keep per-resume failures isolated.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::{SKILL_EXTRACTION_PROMPT_TEMPLATE, SKILL_EXTRACTION_SYSTEM};
use crate::llm_client::{LlmClient, LlmError, LlmResponse};

/// Categorized skills extracted from one resume.
///
/// All six categories are always present, even when empty. Values are kept
/// exactly as returned by the model; duplicates within one extraction are
/// preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSet {
    #[serde(default)]
    pub programming_languages: Vec<String>,
    #[serde(default)]
    pub frameworks: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub databases: Vec<String>,
    #[serde(default)]
    pub cloud_platforms: Vec<String>,
    #[serde(default)]
    pub other_technical_skills: Vec<String>,
}

impl SkillSet {
    /// Category key/value pairs in canonical order, for display and aggregation.
    pub fn categories(&self) -> [(&'static str, &[String]); 6] {
        [
            ("programming_languages", &self.programming_languages),
            ("frameworks", &self.frameworks),
            ("tools", &self.tools),
            ("databases", &self.databases),
            ("cloud_platforms", &self.cloud_platforms),
            ("other_technical_skills", &self.other_technical_skills),
        ]
    }

    pub fn total(&self) -> usize {
        self.categories().iter().map(|(_, v)| v.len()).sum()
    }
}

/// Extracts skills from resume text via a single Claude call per resume.
pub struct SkillCategorizer {
    llm: LlmClient,
}

impl SkillCategorizer {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    pub async fn categorize(&self, resume_text: &str) -> SkillSet {
        let prompt = SKILL_EXTRACTION_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
        let result = self.llm.call(&prompt, SKILL_EXTRACTION_SYSTEM).await;
        skills_from_call(result)
    }
}

/// Recovery point for the whole categorization path: any failure shape on the
/// way in produces the empty SkillSet on the way out.
fn skills_from_call(result: Result<LlmResponse, LlmError>) -> SkillSet {
    let response = match result {
        Ok(r) => r,
        Err(e) => {
            warn!("skill extraction call failed: {e}");
            return SkillSet::default();
        }
    };

    match response.text() {
        Some(text) => parse_skills_response(text),
        None => {
            warn!("skill extraction returned no text content");
            SkillSet::default()
        }
    }
}

/// Parses the model's free-form response into a `SkillSet`.
///
/// A category holding anything other than strings fails the decode and is
/// treated like any other malformed response; a missing category is empty.
fn parse_skills_response(raw: &str) -> SkillSet {
    let Some(json) = extract_json_object(raw) else {
        warn!("no JSON object found in model response");
        return SkillSet::default();
    };

    match serde_json::from_str(json) {
        Ok(skills) => skills,
        Err(e) => {
            warn!("could not decode skills JSON: {e}");
            SkillSet::default()
        }
    }
}

/// Returns the substring spanning the first `{` to the last `}` of `raw`.
///
/// The model is instructed to answer with bare JSON but may still wrap the
/// object in commentary; this recovers the object without a full parser.
/// Nested braces inside the object are tolerated. A response containing
/// multiple objects yields a span that fails the decode rather than silently
/// picking one of them.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{ContentBlock, Usage};

    fn text_response(text: &str) -> LlmResponse {
        LlmResponse {
            content: vec![ContentBlock {
                block_type: "text".to_string(),
                text: Some(text.to_string()),
            }],
            usage: Usage {
                input_tokens: 0,
                output_tokens: 0,
            },
        }
    }

    fn assert_all_empty(skills: &SkillSet) {
        assert_eq!(skills.categories().len(), 6);
        for (category, values) in skills.categories() {
            assert!(values.is_empty(), "expected empty {category}");
        }
    }

    #[test]
    fn test_failed_call_yields_empty_skill_set_with_all_categories() {
        let skills = skills_from_call(Err(LlmError::EmptyContent));
        assert_all_empty(&skills);
        assert_eq!(skills.total(), 0);
    }

    #[test]
    fn test_response_without_text_yields_empty_skill_set() {
        let response = LlmResponse {
            content: vec![],
            usage: Usage {
                input_tokens: 0,
                output_tokens: 0,
            },
        };
        assert_all_empty(&skills_from_call(Ok(response)));
    }

    #[test]
    fn test_commentary_wrapped_json_is_recovered() {
        let raw = r#"Sure! Here are the skills: {"programming_languages": ["Go"]} Hope that helps."#;
        let skills = skills_from_call(Ok(text_response(raw)));
        assert_eq!(skills.programming_languages, vec!["Go"]);
        assert!(skills.frameworks.is_empty());
    }

    #[test]
    fn test_missing_categories_default_to_empty() {
        let skills = parse_skills_response(r#"{"tools": ["Git", "Docker"]}"#);
        assert_eq!(skills.tools, vec!["Git", "Docker"]);
        assert!(skills.programming_languages.is_empty());
        assert!(skills.cloud_platforms.is_empty());
    }

    #[test]
    fn test_non_string_category_entries_collapse_to_empty() {
        let skills = parse_skills_response(r#"{"programming_languages": [1, 2, 3]}"#);
        assert_all_empty(&skills);
    }

    #[test]
    fn test_duplicates_within_one_extraction_are_preserved() {
        let skills = parse_skills_response(r#"{"tools": ["Git", "Git"]}"#);
        assert_eq!(skills.tools, vec!["Git", "Git"]);
        assert_eq!(skills.total(), 2);
    }

    #[test]
    fn test_extract_json_object_plain() {
        assert_eq!(extract_json_object(r#"{"a": 1}"#), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_extract_json_object_with_prefix_and_suffix() {
        let raw = r#"prefix {"a": 1} suffix"#;
        assert_eq!(extract_json_object(raw), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_extract_json_object_nested_braces_in_string_literal() {
        let raw = r#"note {"desc": "uses {braces} inside"} done"#;
        assert_eq!(
            extract_json_object(raw),
            Some(r#"{"desc": "uses {braces} inside"}"#)
        );
    }

    #[test]
    fn test_extract_json_object_spans_multiple_objects() {
        // Two objects produce one invalid span; the decode step rejects it.
        let raw = r#"{"a": 1} {"b": 2}"#;
        assert_eq!(extract_json_object(raw), Some(r#"{"a": 1} {"b": 2}"#));
        assert_all_empty(&parse_skills_response(raw));
    }

    #[test]
    fn test_extract_json_object_no_braces() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_all_empty(&parse_skills_response("no json here"));
    }

    #[test]
    fn test_extract_json_object_reversed_braces() {
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_serialized_skill_set_always_has_six_keys() {
        let json = serde_json::to_value(SkillSet::default()).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 6);
        for key in [
            "programming_languages",
            "frameworks",
            "tools",
            "databases",
            "cloud_platforms",
            "other_technical_skills",
        ] {
            assert!(object.contains_key(key), "missing key {key}");
        }
    }
}
