use derive_setters::Setters;
use serde::{Deserialize, Serialize};

use crate::{TARGET_ASSISTANT_ARG, ToolCallArguments, ToolName};

/// The backend's choice to invoke a tool. Only the first call of a response
/// is ever graded.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, Setters)]
#[setters(into)]
pub struct ToolCall {
    pub name: ToolName,
    pub arguments: ToolCallArguments,
}

impl ToolCall {
    pub fn new(name: impl Into<ToolName>) -> Self {
        Self { name: name.into(), arguments: ToolCallArguments::default() }
    }

    /// Target assistant of a hand-over call. Missing or undecodable arguments
    /// yield an empty target.
    pub fn target_assistant(&self) -> String {
        self.arguments
            .as_object()
            .get(TARGET_ASSISTANT_ARG)
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_target_assistant() {
        let fixture = ToolCall::new("change_assistant")
            .arguments(ToolCallArguments::from_value(json!({"toAssistantId": "big-sky-page"})));
        let actual = fixture.target_assistant();
        let expected = "big-sky-page";
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_target_assistant_missing() {
        let fixture = ToolCall::new("change_assistant");
        let actual = fixture.target_assistant();
        let expected = "";
        assert_eq!(actual, expected);
    }
}
