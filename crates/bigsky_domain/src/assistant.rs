use std::str::FromStr;

use derive_more::derive::Display;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter, EnumString};

use crate::{Error, Result};

/// Identifier of a conversational role, e.g. `router` or `color`. Payloads are
/// stored under it and alias tables are scoped by it.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssistantId(String);

impl AssistantId {
    pub fn new(id: impl ToString) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssistantId {
    fn from(value: &str) -> Self {
        AssistantId::new(value)
    }
}

impl From<Suite> for AssistantId {
    fn from(value: Suite) -> Self {
        AssistantId::new(value)
    }
}

/// Assistants that ship a JSON test suite.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    AsRefStr,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Suite {
    Router,
    Color,
    Font,
    Page,
    Pattern,
    Image,
    Layout,
    Help,
}

impl Suite {
    pub fn parse(id: &AssistantId) -> Result<Self> {
        Suite::from_str(id.as_str()).map_err(|_| Error::UnknownAssistant(id.to_string()))
    }

    pub fn assistant_id(&self) -> AssistantId {
        AssistantId::from(*self)
    }

    /// File stem of the suite's JSON fixture
    pub fn fixture_name(&self) -> String {
        format!("{}-assistant", self.as_ref())
    }

    /// Label used to prefix every result of the suite
    pub fn label(&self) -> String {
        format!("{}_assistant", self.as_ref())
    }
}
