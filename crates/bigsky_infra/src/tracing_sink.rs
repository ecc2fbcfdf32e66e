use bigsky_app::{CaseRecord, ResultSink};
use bigsky_domain::{CaseMetadata, Outcome};
use serde::Serialize;

use crate::VERSION;

/// Structured result event, one per record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEvent {
    pub run_id: String,
    pub version: String,
    pub dataset: String,
    pub suite: Option<String>,
    pub message: String,
    pub success: bool,
    pub properties: Option<CaseMetadata>,
    pub error: Option<String>,
}

/// Emits every record as a `tracing` event on the `bigsky::results` target,
/// tagged with the id of the run
#[derive(Debug, Clone)]
pub struct TracingSink {
    run_id: String,
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(chrono::Utc::now().format("%Y%m%d%H%M%S").to_string())
    }
}

impl TracingSink {
    pub fn new(run_id: impl ToString) -> Self {
        Self { run_id: run_id.to_string() }
    }

    pub fn event(&self, record: &CaseRecord) -> ResultEvent {
        let error = match &record.outcome {
            Outcome::Failure { kind, detail } => Some(format!("{kind}: {detail}")),
            _ => None,
        };
        ResultEvent {
            run_id: self.run_id.clone(),
            version: VERSION.to_string(),
            dataset: record.dataset.clone(),
            suite: record.suite.clone(),
            message: record.message.clone(),
            success: record.is_success(),
            properties: record.case.clone(),
            error,
        }
    }
}

impl ResultSink for TracingSink {
    fn record(&self, record: &CaseRecord) {
        let event = self.event(record);
        let properties = event
            .properties
            .as_ref()
            .and_then(|properties| serde_json::to_string(properties).ok())
            .unwrap_or_default();
        tracing::info!(
            target: "bigsky::results",
            run_id = %event.run_id,
            version = %event.version,
            dataset = %event.dataset,
            suite = event.suite.as_deref().unwrap_or_default(),
            success = event.success,
            properties = %properties,
            error = event.error.as_deref().unwrap_or_default(),
            "{}",
            event.message
        );
    }
}

#[cfg(test)]
mod tests {
    use bigsky_domain::{AssistantId, FailureKind, ToolName, Verdict};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_event_for_failure() {
        let case = CaseMetadata {
            query: "show me a red theme".to_string(),
            tool_name: ToolName::new("change_assistant:big-sky-color"),
            assistant_id: Some(AssistantId::new("router")),
            response_id: Some("chatcmpl-1".to_string()),
            evaluation_id: Some("42".to_string()),
        };
        let record = CaseRecord {
            message: "[site-design-evals.csv:x] 'q' should call 'x', got 'y'".to_string(),
            outcome: Outcome::failure(FailureKind::WrongTool, "Called wrong tool"),
            verdict: Some(Verdict::Regression),
            dataset: "site-design-evals.csv".to_string(),
            suite: Some("site-design-evals.csv:x".to_string()),
            case: Some(case.clone()),
        };
        let fixture = TracingSink::new("20261019120000");

        let actual = fixture.event(&record);

        let expected = ResultEvent {
            run_id: "20261019120000".to_string(),
            version: VERSION.to_string(),
            dataset: "site-design-evals.csv".to_string(),
            suite: Some("site-design-evals.csv:x".to_string()),
            message: record.message.clone(),
            success: false,
            properties: Some(case),
            error: Some("WRONG_TOOL: Called wrong tool".to_string()),
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_warning_counts_as_success() {
        let record = CaseRecord {
            message: "[default] No specific tests defined for this assistant".to_string(),
            outcome: Outcome::warning("No tests defined for assistant: default"),
            verdict: None,
            dataset: "Big_Sky_Evaluator".to_string(),
            suite: None,
            case: None,
        };

        let actual = TracingSink::new("run").event(&record);

        assert!(actual.success);
        assert_eq!(actual.error, None);
    }
}
