use derive_setters::Setters;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum_macros::Display;

use crate::{AssistantId, ContextValue, ToolName, deserialize_context};

/// Known prior classification of a case
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum PreviousGrade {
    /// The expected tool used to be called
    #[default]
    Ok,
    /// A wrong tool used to be called
    Error,
    /// The backend used to answer in free text
    Reply,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Operator {
    #[default]
    Equal,
    Include,
    IsNull,
}

/// Declarative check on one argument of a tool call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Setters)]
#[setters(into)]
pub struct ValidationRule {
    #[serde(rename = "arg")]
    pub arg_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub operator: Operator,
    #[serde(default, rename = "value")]
    pub expected_value: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub case_sensitive: bool,
}

impl ValidationRule {
    pub fn new(arg_name: impl ToString, operator: Operator) -> Self {
        Self {
            arg_name: arg_name.to_string(),
            operator,
            expected_value: None,
            case_sensitive: false,
        }
    }

    /// Expected value as it appears in result messages
    pub fn expected_text(&self) -> String {
        match &self.expected_value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Setters)]
#[setters(into, strip_option)]
pub struct TestCase {
    #[serde(default, deserialize_with = "null_as_default")]
    pub query: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expected_tool: ToolName,
    #[serde(default)]
    pub assistant_id: Option<AssistantId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub previous_grade: PreviousGrade,
    #[serde(default, deserialize_with = "deserialize_context")]
    pub context: IndexMap<String, ContextValue>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub validation: Vec<ValidationRule>,
    #[serde(default)]
    pub evaluation_id: Option<String>,
}

impl TestCase {
    pub fn new(query: impl ToString, expected_tool: impl Into<ToolName>) -> Self {
        Self { query: query.to_string(), expected_tool: expected_tool.into(), ..Default::default() }
    }

    /// Cases without a query or an expected tool are skipped, never failed
    pub fn is_evaluable(&self) -> bool {
        !self.query.trim().is_empty() && !self.expected_tool.is_empty()
    }
}

/// Reads an explicit `null` the same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Properties attached to every result recorded for a case
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, Setters)]
#[setters(into, strip_option)]
pub struct CaseMetadata {
    pub query: String,
    pub tool_name: ToolName,
    pub assistant_id: Option<AssistantId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_full_case() {
        let fixture = json!({
            "query": "use a darker blue",
            "expected_tool": "update_colors",
            "assistant_id": "color",
            "previous_grade": "ERROR",
            "context": {"selected_block_context": {"block": "core/group"}},
            "validation": [
                {"arg": "custom_colors", "operator": "include", "value": "#00008b"},
                {"arg": "palette", "operator": "is_null"},
                {"arg": "mode", "value": "Dark", "case_sensitive": true}
            ]
        });

        let actual: TestCase = serde_json::from_value(fixture).unwrap();

        let expected = TestCase::new("use a darker blue", "update_colors")
            .assistant_id(AssistantId::new("color"))
            .previous_grade(PreviousGrade::Error)
            .context(IndexMap::from([(
                "selected_block_context".to_string(),
                serde_json::from_value::<ContextValue>(json!({"block": "core/group"})).unwrap(),
            )]))
            .validation(vec![
                ValidationRule::new("custom_colors", Operator::Include)
                    .expected_value(Some(json!("#00008b"))),
                ValidationRule::new("palette", Operator::IsNull),
                ValidationRule::new("mode", Operator::Equal)
                    .expected_value(Some(json!("Dark")))
                    .case_sensitive(true),
            ]);
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_deserialize_minimal_case_defaults() {
        let actual: TestCase =
            serde_json::from_value(json!({"query": "help me", "expected_tool": "help"})).unwrap();
        let expected = TestCase::new("help me", "help");
        assert_eq!(actual, expected);
        assert_eq!(actual.previous_grade, PreviousGrade::Ok);
    }

    #[test]
    fn test_deserialize_null_fields_as_defaults() {
        let fixture = json!({
            "query": null,
            "expected_tool": null,
            "previous_grade": null,
            "context": null,
            "validation": [{"arg": "mode", "operator": null, "value": "dark", "case_sensitive": null}]
        });

        let actual: TestCase = serde_json::from_value(fixture).unwrap();

        let expected = TestCase::default().validation(vec![
            ValidationRule::new("mode", Operator::Equal).expected_value(Some(json!("dark"))),
        ]);
        assert_eq!(actual, expected);
        assert!(!actual.is_evaluable());

        let actual: TestCase = serde_json::from_value(
            json!({"query": "help me", "expected_tool": "help", "validation": null}),
        )
        .unwrap();
        assert_eq!(actual, TestCase::new("help me", "help"));
    }

    #[test]
    fn test_is_evaluable() {
        assert!(TestCase::new("make it blue", "update_colors").is_evaluable());
        assert!(!TestCase::new("", "update_colors").is_evaluable());
        assert!(!TestCase::new("make it blue", "").is_evaluable());
    }

    #[test]
    fn test_expected_text() {
        let fixture = ValidationRule::new("count", Operator::Equal).expected_value(Some(json!(3)));
        assert_eq!(fixture.expected_text(), "3");
        assert_eq!(ValidationRule::new("x", Operator::IsNull).expected_text(), "");
    }
}
