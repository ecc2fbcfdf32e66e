use std::str::FromStr;

use bigsky_domain::ToolName;

/// Narrows a run to a subset of its cases. `tool:<name>` keeps cases expecting
/// that tool; any other text keeps cases whose message contains it, ignoring
/// case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseFilter {
    Tool(ToolName),
    Text(String),
}

impl FromStr for CaseFilter {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.strip_prefix("tool:") {
            Some(tool) => CaseFilter::Tool(ToolName::new(tool)),
            None => CaseFilter::Text(value.to_lowercase()),
        })
    }
}

impl CaseFilter {
    /// `expected` is the alias-resolved tool the case expects
    pub fn matches(&self, expected: &ToolName, message: &str) -> bool {
        match self {
            CaseFilter::Tool(tool) => tool == expected,
            CaseFilter::Text(needle) => message.to_lowercase().contains(needle),
        }
    }
}
