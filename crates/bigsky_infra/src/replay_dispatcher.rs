use std::collections::HashMap;
use std::path::Path;

use anyhow::Context as _;
use bigsky_app::Dispatcher;
use bigsky_domain::{ChatCompletion, Error, Payload, Role};

/// Answers from recorded completions keyed by the query of the final user
/// turn. Used for dry runs without a backend.
#[derive(Debug, Default)]
pub struct ReplayDispatcher {
    responses: HashMap<String, ChatCompletion>,
}

impl ReplayDispatcher {
    pub fn new(responses: HashMap<String, ChatCompletion>) -> Self {
        Self { responses }
    }

    /// Reads a JSON object mapping each query to its recorded completion
    pub async fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read replay file: {}", path.display()))?;
        let responses = serde_json::from_str(&content)
            .with_context(|| format!("Invalid replay file: {}", path.display()))?;
        Ok(Self::new(responses))
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

#[async_trait::async_trait]
impl Dispatcher for ReplayDispatcher {
    async fn dispatch(&self, payload: &Payload) -> anyhow::Result<ChatCompletion> {
        let query = payload
            .messages
            .iter()
            .rev()
            .find(|message| message.role == Role::User)
            .and_then(|message| message.content.as_str())
            .unwrap_or_default();

        self.responses
            .get(query)
            .cloned()
            .ok_or_else(|| Error::Transport(format!("No recorded response for '{query}'")).into())
    }
}
