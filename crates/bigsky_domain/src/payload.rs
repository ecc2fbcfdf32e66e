use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::Display;

use crate::{ContextValue, Error, Result, inject};

/// Upper bound on how many times a captured payload may be string-encoded
pub const MAX_DECODE_DEPTH: usize = 5;

/// Fields added when a payload is captured for evals. They carry no
/// behavior of the assistant and some are rejected by the backend.
pub const BOOKKEEPING_FIELDS: &[&str] = &[
    "store",
    "metadata",
    "feature",
    "session_id",
    "sessionId",
    "response_format",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    Developer,
    User,
    Assistant,
    Tool,
    Function,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Setters)]
#[setters(into)]
pub struct PayloadMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Value,
    /// Tool calls, names and anything else the message carried
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PayloadMessage {
    pub fn user(content: impl ToString) -> Self {
        Self { role: Role::User, content: Value::String(content.to_string()), extra: Map::new() }
    }

    pub fn system(content: impl ToString) -> Self {
        Self { role: Role::System, content: Value::String(content.to_string()), extra: Map::new() }
    }
}

/// Conversation and assistant configuration sent to the completion backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Setters)]
#[setters(into)]
pub struct Payload {
    #[serde(default)]
    pub messages: Vec<PayloadMessage>,
    /// Tool definitions, model, sampling parameters; passed through untouched
    #[serde(flatten)]
    pub config: Map<String, Value>,
}

impl Payload {
    /// Decodes a captured payload that may have been JSON-encoded several
    /// times, then strips capture bookkeeping and every user turn.
    pub fn from_raw(raw: &str) -> Result<Self> {
        let mut value = Value::String(raw.to_string());
        for _ in 0..MAX_DECODE_DEPTH {
            let Value::String(text) = &value else { break };
            match serde_json::from_str::<Value>(text) {
                Ok(decoded) => value = decoded,
                Err(_) => break,
            }
        }

        let Value::Object(mut object) = value else {
            return Err(Error::invalid_fixture(
                "payload",
                format!("expected a JSON object within {MAX_DECODE_DEPTH} decoding rounds"),
            ));
        };

        for field in BOOKKEEPING_FIELDS {
            object.remove(*field);
        }

        let mut payload: Payload = serde_json::from_value(Value::Object(object))
            .map_err(|error| Error::invalid_fixture("payload", error))?;
        payload.messages.retain(|message| message.role != Role::User);
        Ok(payload)
    }

    /// Rewrites the first `<tag>` region of the first message. Non-text
    /// content is left alone.
    pub fn inject_context(&mut self, tag: &str, context: &ContextValue) {
        if let Some(Value::String(content)) = self.messages.first_mut().map(|m| &mut m.content) {
            *content = inject(content, tag, context);
        }
    }

    pub fn push_user(&mut self, query: impl ToString) {
        self.messages.push(PayloadMessage::user(query));
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.messages.iter().any(|message| message.role == role)
    }
}
