use bigsky_app::{CaseRecord, ResultSink};
use bigsky_domain::Outcome;
use colored::Colorize;

/// Prints one colored status line per record to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink {
    /// Also print passing and skipped lines
    verbose: bool,
}

impl ConsoleSink {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn format(record: &CaseRecord) -> String {
        match &record.outcome {
            Outcome::Pass => format!("{} {}", "✓".green().bold(), record.message),
            Outcome::Skipped { reason } => format!(
                "{} {} {}",
                "-".dimmed(),
                record.message.dimmed(),
                format!("({reason})").dimmed()
            ),
            Outcome::Warning { .. } => {
                format!("{} {}", "!".yellow().bold(), record.message.yellow())
            }
            Outcome::Failure { kind, detail } => format!(
                "{} {}\n    {} {}",
                "✗".red().bold(),
                record.message,
                kind.to_string().red(),
                detail.dimmed()
            ),
        }
    }
}

impl ResultSink for ConsoleSink {
    fn record(&self, record: &CaseRecord) {
        let quiet = matches!(record.outcome, Outcome::Pass | Outcome::Skipped { .. });
        if self.verbose || !quiet {
            println!("{}", Self::format(record));
        }
    }
}

#[cfg(test)]
mod tests {
    use bigsky_domain::FailureKind;
    use console::strip_ansi_codes;
    use insta::assert_snapshot;

    use super::*;

    fn record(message: &str, outcome: Outcome) -> CaseRecord {
        CaseRecord {
            message: message.to_string(),
            outcome,
            verdict: None,
            dataset: "Big_Sky_Evaluator".to_string(),
            suite: Some("router_assistant".to_string()),
            case: None,
        }
    }

    #[test]
    fn test_format_lines() {
        let fixture = vec![
            record("[router_assistant] 'make it blue' should call 'update_colors'", Outcome::Pass),
            record(
                "[router_assistant] Expected Error:'x' should call 'y', got 'z'",
                Outcome::warning("w"),
            ),
            record(
                "[router_assistant] 'add a page' should call 'add_page', got 'add_pattern'",
                Outcome::failure(FailureKind::WrongTool, "Called wrong tool"),
            ),
            record(
                "[router_assistant] '' should call 'add_page'",
                Outcome::skipped("Missing query or expected tool"),
            ),
        ];

        let actual = fixture
            .iter()
            .map(|record| strip_ansi_codes(&ConsoleSink::format(record)).to_string())
            .collect::<Vec<_>>()
            .join("\n");

        assert_snapshot!(actual, @r"
        ✓ [router_assistant] 'make it blue' should call 'update_colors'
        ! [router_assistant] Expected Error:'x' should call 'y', got 'z'
        ✗ [router_assistant] 'add a page' should call 'add_page', got 'add_pattern'
            WRONG_TOOL Called wrong tool
        - [router_assistant] '' should call 'add_page' (Missing query or expected tool)
        ");
    }
}
