use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Classified result of comparing the backend's tool choice with the
/// expected one, given the case's previous grade.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Pass,
    /// Pass of a case whose previous grade was `ERROR`
    Improved,
    Regression,
    WrongToolExpectedError,
    UnexpectedReply,
    NoToolCalled,
    MissingPayload,
    TransportError,
}

impl Verdict {
    /// Whether the backend called the expected tool
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass | Verdict::Improved)
    }
}

/// Error taxonomy of recorded failures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    MissingPayload,
    TransportError,
    ToolNotCalled,
    WrongTool,
    MissingValue,
    WrongValue,
    InvalidFixture,
}

/// Result of one recorded check
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Skipped { reason: String },
    Warning { reason: String },
    Failure { kind: FailureKind, detail: String },
}

impl Outcome {
    pub fn skipped(reason: impl ToString) -> Self {
        Outcome::Skipped { reason: reason.to_string() }
    }

    pub fn warning(reason: impl ToString) -> Self {
        Outcome::Warning { reason: reason.to_string() }
    }

    pub fn failure(kind: FailureKind, detail: impl ToString) -> Self {
        Outcome::Failure { kind, detail: detail.to_string() }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }
}
