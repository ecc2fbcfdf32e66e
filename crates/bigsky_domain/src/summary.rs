use serde::{Deserialize, Serialize};

use crate::{FailureKind, Outcome};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedError {
    pub message: String,
    pub kind: FailureKind,
    pub detail: String,
}

/// Aggregated results of one evaluation run. Errors and warnings keep the
/// order in which cases were evaluated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub errors: Vec<RecordedError>,
    pub warnings: Vec<String>,
    pub passed: usize,
    pub skipped: usize,
    pub current_dataset: String,
    pub current_suite: Option<String>,
}

impl RunSummary {
    pub fn new(dataset: impl ToString) -> Self {
        Self { current_dataset: dataset.to_string(), ..Default::default() }
    }

    /// Prefixes `message` with the current suite, as it is recorded
    pub fn label(&self, message: &str) -> String {
        match &self.current_suite {
            Some(suite) => format!("[{suite}] {message}"),
            None => message.to_string(),
        }
    }

    pub fn record(&mut self, message: &str, outcome: &Outcome) {
        match outcome {
            Outcome::Pass => self.passed += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
            Outcome::Warning { .. } => self.warnings.push(message.to_string()),
            Outcome::Failure { kind, detail } => self.errors.push(RecordedError {
                message: message.to_string(),
                kind: *kind,
                detail: detail.clone(),
            }),
        }
    }

    /// Appends `other` after the results already held
    pub fn merge(&mut self, other: RunSummary) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.passed += other.passed;
        self.skipped += other.skipped;
        self.current_dataset = other.current_dataset;
        self.current_suite = other.current_suite;
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
