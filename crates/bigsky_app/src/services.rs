use std::sync::Arc;

use bigsky_domain::{CaseMetadata, ChatCompletion, Outcome, Payload, Verdict};
use serde::Serialize;

/// Sends a prepared payload to a chat-completion backend
#[async_trait::async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, payload: &Payload) -> anyhow::Result<ChatCompletion>;
}

/// One line of an evaluation run, as handed to result sinks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecord {
    /// Message prefixed with the current suite
    pub message: String,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    pub dataset: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case: Option<CaseMetadata>,
}

impl CaseRecord {
    pub fn is_success(&self) -> bool {
        !self.outcome.is_failure()
    }
}

/// Receives every recorded line, in evaluation order
pub trait ResultSink: Send + Sync {
    fn record(&self, record: &CaseRecord);
}

#[async_trait::async_trait]
impl<T: Dispatcher + ?Sized> Dispatcher for Arc<T> {
    async fn dispatch(&self, payload: &Payload) -> anyhow::Result<ChatCompletion> {
        self.as_ref().dispatch(payload).await
    }
}

impl<T: ResultSink + ?Sized> ResultSink for Arc<T> {
    fn record(&self, record: &CaseRecord) {
        self.as_ref().record(record)
    }
}

impl<A: ResultSink, B: ResultSink> ResultSink for (A, B) {
    fn record(&self, record: &CaseRecord) {
        self.0.record(record);
        self.1.record(record);
    }
}

/// Discards every record
impl ResultSink for () {
    fn record(&self, _: &CaseRecord) {}
}
