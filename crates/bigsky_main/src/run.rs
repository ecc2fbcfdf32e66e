use std::sync::Arc;

use anyhow::Context as _;
use bigsky_app::{CaseFilter, DEFAULT_PAYLOAD_ASSISTANT, Dispatcher, Evaluator, PayloadStore};
use bigsky_config::{DEFAULT_CSV, EvalConfig};
use bigsky_domain::{AssistantId, RunSummary};
use bigsky_infra::{ConsoleSink, HttpDispatcher, ReplayDispatcher, TracingSink};
use tracing::{info, warn};

use crate::{Cli, Command};

/// Assistant used when a command names none
const DEFAULT_ASSISTANT: &str = "router";

pub async fn run(cli: Cli) -> anyhow::Result<RunSummary> {
    let config = EvalConfig::load(cli.config.as_deref())?;
    run_with_config(&cli, config).await
}

pub async fn run_with_config(cli: &Cli, config: EvalConfig) -> anyhow::Result<RunSummary> {
    let resolver = config.resolver()?;

    let mut store = PayloadStore::new();
    let report = store.load_dir(&config.paths.mocks_dir)?;
    for (path, reason) in &report.rejected {
        warn!(path = %path.display(), reason = %reason, "Rejected payload");
    }
    info!(assistants = report.loaded.len(), "Loaded payloads");

    let dispatcher: Arc<dyn Dispatcher> = match cli.command.replay() {
        Some(path) => Arc::new(ReplayDispatcher::from_file(path).await?),
        None => {
            if config.api.api_key.is_none() {
                warn!("No API key configured, sending unauthenticated requests");
            }
            Arc::new(HttpDispatcher::new(&config.api, config.retry.clone())?)
        }
    };
    let filter = cli.command.filter().map(str::parse::<CaseFilter>).transpose()?;
    let sink = (ConsoleSink::new(cli.verbose), TracingSink::default());

    let evaluator = Evaluator::new(store, config.paths.clone(), dispatcher, sink)
        .resolver(resolver)
        .filter(filter);

    let summary = match &cli.command {
        Command::Run { fixture: Some(fixture), assistant, .. } => {
            let assistant = AssistantId::new(assistant.as_deref().unwrap_or(DEFAULT_ASSISTANT));
            evaluator.run_fixture(fixture, &assistant).await
        }
        Command::Run { assistant: Some(assistant), .. } => {
            evaluator.evaluate(&AssistantId::new(assistant)).await
        }
        Command::Run { .. } => evaluator.run_all().await?,
        Command::Csv { path, assistant, .. } => {
            evaluator.run_csv(&config.paths.csv(path), &AssistantId::new(assistant)).await
        }
        Command::Jobs { .. } => {
            let mut summary = evaluator.run_all().await.context("Failed to run suites")?;
            let csv = config.paths.csv(DEFAULT_CSV);
            let assistant = AssistantId::new(DEFAULT_PAYLOAD_ASSISTANT);
            summary.merge(evaluator.run_csv(&csv, &assistant).await);
            summary
        }
    };

    println!("{}", summary_line(&summary));
    Ok(summary)
}

pub fn summary_line(summary: &RunSummary) -> String {
    format!(
        "{} passed, {} warnings, {} errors, {} skipped",
        summary.passed,
        summary.warnings.len(),
        summary.errors.len(),
        summary.skipped
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bigsky_domain::FailureKind;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn write_site_design(mocks: &std::path::Path) {
        let payload = json!({"messages": [{"role": "system", "content": "You design sites."}]});
        std::fs::write(mocks.join("site-design-payload.json"), payload.to_string()).unwrap();
        std::fs::write(
            mocks.join("site-design-evals.csv"),
            "evaluation_id,query,expected_tool,previous_grade\n7,add a page,add_page,OK\n",
        )
        .unwrap();
    }

    fn config(cases: std::path::PathBuf, mocks: std::path::PathBuf) -> EvalConfig {
        EvalConfig::from_sources(None, Some(HashMap::new()))
            .unwrap()
            .paths(bigsky_config::PathsConfig { test_cases_dir: cases, mocks_dir: mocks })
    }

    fn workspace() -> (tempfile::TempDir, EvalConfig) {
        let dir = tempfile::tempdir().unwrap();
        let cases = dir.path().join("test-cases");
        let mocks = dir.path().join("mocks");
        std::fs::create_dir(&cases).unwrap();
        std::fs::create_dir(&mocks).unwrap();

        let payload = json!({"messages": [{"role": "system", "content": "You route."}]});
        std::fs::write(mocks.join("router-assistant-payload.json"), payload.to_string()).unwrap();
        write_site_design(&mocks);
        std::fs::write(
            cases.join("router-assistant.json"),
            json!({"test_cases": [{"query": "make it blue", "expected_tool": "show_color_picker"}]})
                .to_string(),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("replay.json"),
            json!({
                "make it blue": {"choices": [{"message": {"tool_calls": [{"function": {
                    "name": "change_assistant", "arguments": "{\"toAssistantId\":\"big-sky-color\"}"
                }}]}}]},
                "add a page": {"choices": [{"message": {"content": "Which page?"}}]}
            })
            .to_string(),
        )
        .unwrap();

        (dir, config(cases, mocks))
    }

    #[tokio::test]
    async fn test_jobs_merges_suites_and_default_csv() {
        let (dir, config) = workspace();
        let replay = dir.path().join("replay.json");
        let cli = Cli::parse_from(["bigsky-eval", "jobs", "--replay", replay.to_str().unwrap()]);

        let actual = run_with_config(&cli, config).await.unwrap();

        assert_eq!(actual.passed, 1);
        assert_eq!(actual.warnings, vec!["[default] No specific tests defined for this assistant"]);
        assert_eq!(actual.errors.len(), 1);
        assert_eq!(actual.errors[0].kind, FailureKind::ToolNotCalled);
        assert_eq!(
            actual.errors[0].message,
            "[site-design-evals.csv:add_page] 'add a page' should call 'add_page'"
        );
        assert_eq!(summary_line(&actual), "1 passed, 1 warnings, 1 errors, 0 skipped");
    }

    #[tokio::test]
    async fn test_jobs_runs_default_csv_with_site_design_payload() {
        let dir = tempfile::tempdir().unwrap();
        let cases = dir.path().join("test-cases");
        let mocks = dir.path().join("mocks");
        std::fs::create_dir(&cases).unwrap();
        std::fs::create_dir(&mocks).unwrap();
        write_site_design(&mocks);
        let replay = dir.path().join("replay.json");
        std::fs::write(
            &replay,
            json!({
                "add a page": {"choices": [{"message": {"tool_calls": [{"function": {
                    "name": "add_page", "arguments": "{}"
                }}]}}]}
            })
            .to_string(),
        )
        .unwrap();
        let cli = Cli::parse_from(["bigsky-eval", "jobs", "--replay", replay.to_str().unwrap()]);

        let actual = run_with_config(&cli, config(cases, mocks)).await.unwrap();

        assert!(actual.errors.is_empty());
        assert_eq!(actual.passed, 1);
        assert_eq!(summary_line(&actual), "1 passed, 1 warnings, 0 errors, 0 skipped");
    }

    #[tokio::test]
    async fn test_run_unknown_assistant_is_a_warning() {
        let (dir, config) = workspace();
        let replay = dir.path().join("replay.json");
        let cli = Cli::parse_from([
            "bigsky-eval",
            "run",
            "--assistant",
            "layout",
            "--replay",
            replay.to_str().unwrap(),
        ]);

        let actual = run_with_config(&cli, config).await.unwrap();

        assert_eq!(actual.warnings, vec!["[layout] Skipping tests - no payload found"]);
        assert!(actual.is_success());
    }
}
