use std::path::Path;

use bigsky_config::PathsConfig;
use bigsky_domain::{
    AssistantId, CaseMetadata, Error, FailureKind, NormalizerRegistry, Outcome, Result,
    RunSummary, Suite, TestCase, ToolCall, ToolNameResolver, Verdict,
};
use tracing::{debug, info};

use crate::fixture::{load_csv, load_suite};
use crate::{CaseFilter, CaseRecord, Dispatcher, Expectation, Grader, PayloadStore, ResultSink, validate};

/// Dataset name of runs over JSON suite fixtures
pub const SUITE_DATASET: &str = "Big_Sky_Evaluator";

/// Replays test cases against the completion backend, one case at a time,
/// and records every result to the sink and the returned summary.
pub struct Evaluator<D, S> {
    store: PayloadStore,
    paths: PathsConfig,
    dispatcher: D,
    sink: S,
    resolver: ToolNameResolver,
    normalizers: NormalizerRegistry,
    filter: Option<CaseFilter>,
}

impl<D: Dispatcher, S: ResultSink> Evaluator<D, S> {
    pub fn new(store: PayloadStore, paths: PathsConfig, dispatcher: D, sink: S) -> Self {
        Self {
            store,
            paths,
            dispatcher,
            sink,
            resolver: ToolNameResolver::default(),
            normalizers: NormalizerRegistry::default(),
            filter: None,
        }
    }

    pub fn resolver(mut self, resolver: ToolNameResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn normalizers(mut self, normalizers: NormalizerRegistry) -> Self {
        self.normalizers = normalizers;
        self
    }

    pub fn filter(mut self, filter: Option<CaseFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn store(&self) -> &PayloadStore {
        &self.store
    }

    /// Evaluates every stored assistant in the order payloads were stored
    pub async fn run_all(&self) -> Result<RunSummary> {
        if self.store.is_empty() {
            return Err(Error::NoPayloads);
        }

        let mut summary = RunSummary::new(SUITE_DATASET);
        for assistant in self.store.ids() {
            summary.merge(self.evaluate(assistant).await);
        }
        Ok(summary)
    }

    /// Runs the suite of `assistant`. Assistants without a payload or without
    /// a suite are recorded as warnings.
    pub async fn evaluate(&self, assistant: &AssistantId) -> RunSummary {
        let mut summary = RunSummary::new(SUITE_DATASET);

        if self.store.get(assistant).is_none() {
            self.record(
                &mut summary,
                &format!("[{assistant}] Skipping tests - no payload found"),
                Outcome::warning(Error::MissingPayload(assistant.clone())),
                None,
                None,
            );
            return summary;
        }

        match Suite::parse(assistant) {
            Ok(suite) => {
                let fixture = suite.fixture_name();
                let label = suite.label();
                self.run_fixture_into(&mut summary, &fixture, suite.as_ref(), &label, assistant)
                    .await
            }
            Err(error) => self.record(
                &mut summary,
                &format!("[{assistant}] No specific tests defined for this assistant"),
                Outcome::warning(error),
                None,
                None,
            ),
        }
        summary
    }

    pub async fn run_suite(&self, suite: Suite) -> RunSummary {
        self.evaluate(&suite.assistant_id()).await
    }

    /// Runs an arbitrarily named JSON fixture, e.g. `help-tool`, against
    /// `assistant`
    pub async fn run_fixture(&self, name: &str, assistant: &AssistantId) -> RunSummary {
        let mut summary = RunSummary::new(SUITE_DATASET);
        self.run_fixture_into(&mut summary, name, name, name, assistant).await;
        summary
    }

    /// Runs in-memory cases under `label`
    pub async fn run_cases(
        &self,
        label: &str,
        assistant: &AssistantId,
        cases: &[TestCase],
    ) -> RunSummary {
        let mut summary = RunSummary::new(SUITE_DATASET);
        summary.current_suite = Some(label.to_string());
        self.run_cases_into(&mut summary, assistant, cases).await;
        summary
    }

    /// Runs a CSV eval set. Each row is graded against a baseline of `OK`
    /// and labelled `<file>:<expected tool>`.
    pub async fn run_csv(&self, path: &Path, assistant: &AssistantId) -> RunSummary {
        let dataset = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let mut summary = RunSummary::new(&dataset);

        let cases = match load_csv(path) {
            Ok(cases) => cases,
            Err(error) => {
                self.record(
                    &mut summary,
                    &format!("Failed to load {dataset} test cases"),
                    Outcome::failure(FailureKind::InvalidFixture, error),
                    None,
                    None,
                );
                return summary;
            }
        };

        info!(dataset = %dataset, cases = cases.len(), "Running eval set");
        for case in &cases {
            summary.current_suite = Some(format!("{dataset}:{}", case.expected_tool));
            self.evaluate_case(&mut summary, assistant, case).await;
        }
        summary
    }

    async fn run_fixture_into(
        &self,
        summary: &mut RunSummary,
        fixture: &str,
        display_name: &str,
        label: &str,
        assistant: &AssistantId,
    ) {
        summary.current_suite = Some(label.to_string());

        let cases = match load_suite(&self.paths.fixture(fixture), fixture) {
            Ok(cases) => cases,
            Err(error) => {
                self.record(
                    summary,
                    &format!("Failed to load {display_name} test cases"),
                    Outcome::failure(FailureKind::InvalidFixture, error),
                    None,
                    None,
                );
                return;
            }
        };

        info!(suite = label, cases = cases.len(), "Running suite");
        self.run_cases_into(summary, assistant, &cases).await;
    }

    async fn run_cases_into(
        &self,
        summary: &mut RunSummary,
        assistant: &AssistantId,
        cases: &[TestCase],
    ) {
        for case in cases {
            let Some((tool_call, metadata)) = self.evaluate_case(summary, assistant, case).await else {
                continue;
            };
            if case.validation.is_empty() {
                continue;
            }

            let mut args = tool_call.arguments.as_object();
            self.normalizers.normalize(assistant, &mut args);
            for rule in &case.validation {
                for check in validate(&args, rule) {
                    self.record(summary, &check.message, check.outcome, None, Some(&metadata));
                }
            }
        }
    }

    /// Grades a single case. Returns the tool call when it matched the
    /// expected tool, so its arguments can be validated.
    async fn evaluate_case(
        &self,
        summary: &mut RunSummary,
        default_assistant: &AssistantId,
        case: &TestCase,
    ) -> Option<(ToolCall, CaseMetadata)> {
        let assistant = case.assistant_id.clone().unwrap_or_else(|| default_assistant.clone());
        let expected = self.resolver.resolve(&assistant, &case.expected_tool);
        let message = Expectation::message(&case.query, &expected);
        let mut metadata = CaseMetadata {
            query: case.query.clone(),
            tool_name: expected.clone(),
            assistant_id: Some(assistant.clone()),
            response_id: None,
            evaluation_id: case.evaluation_id.clone(),
        };

        if let Some(filter) = &self.filter
            && !filter.matches(&expected, &message)
        {
            self.record(summary, &message, Outcome::skipped("Filtered out"), None, Some(&metadata));
            return None;
        }

        if !case.is_evaluable() {
            self.record(
                summary,
                &message,
                Outcome::skipped("Missing query or expected tool"),
                None,
                Some(&metadata),
            );
            return None;
        }

        let Some(payload) = self.store.get(&assistant) else {
            self.record(
                summary,
                &message,
                Outcome::failure(FailureKind::MissingPayload, Error::MissingPayload(assistant)),
                Some(Verdict::MissingPayload),
                Some(&metadata),
            );
            return None;
        };

        let mut payload = payload.clone();
        for (tag, context) in &case.context {
            payload.inject_context(tag, context);
        }
        payload.push_user(&case.query);

        debug!(assistant = %assistant, query = %case.query, "Dispatching case");
        let response = match self.dispatcher.dispatch(&payload).await {
            Ok(response) => response,
            Err(error) => {
                self.record(
                    summary,
                    "Error calling completion backend",
                    Outcome::failure(FailureKind::TransportError, format!("{error:#}")),
                    Some(Verdict::TransportError),
                    Some(&metadata),
                );
                return None;
            }
        };
        metadata.response_id = response.id.clone();

        let expectation = Expectation {
            assistant,
            tool: expected,
            previous_grade: case.previous_grade,
            message,
        };
        let grade = Grader::new(&self.resolver).grade(&expectation, &response);
        self.record(summary, &grade.message, grade.outcome, Some(grade.verdict), Some(&metadata));

        if grade.verdict.is_pass() {
            grade.tool_call.map(|tool_call| (tool_call, metadata))
        } else {
            None
        }
    }

    fn record(
        &self,
        summary: &mut RunSummary,
        message: &str,
        outcome: Outcome,
        verdict: Option<Verdict>,
        case: Option<&CaseMetadata>,
    ) {
        let record = CaseRecord {
            message: summary.label(message),
            outcome,
            verdict,
            dataset: summary.current_dataset.clone(),
            suite: summary.current_suite.clone(),
            case: case.cloned(),
        };
        self.sink.record(&record);
        summary.record(&record.message, &record.outcome);
    }
}
