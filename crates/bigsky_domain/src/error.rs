use crate::{AssistantId, ToolName};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("No payload found for assistant: {0}")]
    MissingPayload(AssistantId),

    #[error("No payloads found")]
    NoPayloads,

    #[error("Completion backend request failed: {0}")]
    Transport(String),

    /// Transport failure worth another attempt (rate limits, gateway errors)
    #[error("Retryable completion backend failure: {0}")]
    Retryable(anyhow::Error),

    #[error("Tool not called")]
    ToolNotCalled,

    #[error("Called wrong tool: expected '{expected}', got '{actual}'")]
    WrongTool { expected: ToolName, actual: ToolName },

    #[error("Missing value for argument '{0}'")]
    MissingValue(String),

    #[error("Wrong value for argument '{0}'")]
    WrongValue(String),

    #[error("Invalid fixture '{name}': {reason}")]
    InvalidFixture { name: String, reason: String },

    #[error("No tests defined for assistant: {0}")]
    UnknownAssistant(String),

    #[error(
        "Alias '{alias}' of assistant '{assistant}' resolves to '{canonical}', which is itself an alias"
    )]
    ChainedAlias {
        assistant: AssistantId,
        alias: ToolName,
        canonical: ToolName,
    },
}

impl Error {
    pub fn invalid_fixture(name: impl ToString, reason: impl ToString) -> Self {
        Error::InvalidFixture { name: name.to_string(), reason: reason.to_string() }
    }
}

pub type Result<A> = std::result::Result<A, Error>;
