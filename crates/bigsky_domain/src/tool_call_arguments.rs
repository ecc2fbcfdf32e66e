use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON-encoded arguments exactly as the backend produced them
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ToolCallArguments(String);

impl ToolCallArguments {
    pub fn new(value: impl ToString) -> Self {
        ToolCallArguments(value.to_string())
    }

    pub fn from_value(value: Value) -> Self {
        ToolCallArguments(value.to_string())
    }

    pub fn as_value(&self) -> std::result::Result<Value, serde_json::Error> {
        serde_json::from_str(&self.0)
    }

    /// Decodes the arguments into an object. Anything that is not a JSON
    /// object decodes to an empty map, so every rule sees its key as absent.
    pub fn as_object(&self) -> Map<String, Value> {
        match self.as_value() {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(error) => {
                tracing::debug!(%error, arguments = %self.0, "Undecodable tool call arguments");
                Map::new()
            }
        }
    }
}

impl Default for ToolCallArguments {
    fn default() -> Self {
        ToolCallArguments("{}".to_string())
    }
}

impl std::fmt::Display for ToolCallArguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_as_object() {
        let fixture = ToolCallArguments::new(r#"{"toAssistantId":"big-sky-color"}"#);
        let actual = Value::Object(fixture.as_object());
        let expected = json!({"toAssistantId": "big-sky-color"});
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_as_object_from_invalid_json() {
        let fixture = ToolCallArguments::new("{\"toAssistantId\":");
        let actual = fixture.as_object();
        assert!(actual.is_empty());
    }

    #[test]
    fn test_as_object_from_non_object() {
        let fixture = ToolCallArguments::from_value(json!(["red", "blue"]));
        let actual = fixture.as_object();
        assert!(actual.is_empty());
    }
}
