use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Tool used by the router to hand a conversation over to another assistant.
/// Its comparable name carries the target, e.g.
/// `change_assistant:big-sky-color`.
pub const CHANGE_ASSISTANT: &str = "change_assistant";

/// Argument of [`CHANGE_ASSISTANT`] naming the target assistant
pub const TARGET_ASSISTANT_ARG: &str = "toAssistantId";

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolName {
    pub name: String,
}

impl ToolName {
    pub fn new(value: impl ToString) -> Self {
        ToolName { name: value.to_string() }
    }

    /// Comparable name of a hand-over call to `target`
    pub fn change_assistant(target: &str) -> Self {
        ToolName { name: format!("{CHANGE_ASSISTANT}:{target}") }
    }

    pub fn is_change_assistant(&self) -> bool {
        self.name == CHANGE_ASSISTANT
    }

    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty()
    }
}

impl ToolName {
    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl From<String> for ToolName {
    fn from(value: String) -> Self {
        ToolName::new(value)
    }
}

impl From<&str> for ToolName {
    fn from(value: &str) -> Self {
        ToolName::new(value)
    }
}

impl Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
