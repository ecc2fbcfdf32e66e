use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "bigsky-eval", version = bigsky_infra::VERSION)]
/// Replays captured assistant payloads against a chat-completion backend and
/// grades the tools it calls.
pub struct Cli {
    /// Path to a TOML config file. Defaults to `bigsky-eval.toml` in the
    /// working directory when present.
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Print every result and enable debug logging.
    #[arg(long, default_value_t = false, global = true)]
    pub verbose: bool,

    /// Format of log lines written to stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run JSON suite fixtures
    Run {
        /// Only run the suite of this assistant
        #[arg(long, short)]
        assistant: Option<String>,

        /// Run a named fixture, e.g. `help-tool`, against `--assistant`
        /// (default `router`)
        #[arg(long, short)]
        fixture: Option<String>,

        /// `tool:<name>` keeps cases expecting that tool; any other text keeps
        /// cases whose description contains it
        #[arg(long)]
        filter: Option<String>,

        /// Answer from recorded completions instead of calling the backend
        #[arg(long)]
        replay: Option<PathBuf>,
    },

    /// Run a CSV eval set
    Csv {
        /// CSV file, or `default` for the bundled site-design set
        #[arg(default_value = "default")]
        path: String,

        /// Assistant whose payload the rows are sent with
        #[arg(long, short, default_value = "router")]
        assistant: String,

        #[arg(long)]
        filter: Option<String>,

        #[arg(long)]
        replay: Option<PathBuf>,
    },

    /// Run every suite, then the default CSV eval set
    Jobs {
        #[arg(long)]
        replay: Option<PathBuf>,
    },
}

impl Command {
    pub fn replay(&self) -> Option<&PathBuf> {
        match self {
            Command::Run { replay, .. } | Command::Csv { replay, .. } | Command::Jobs { replay } => {
                replay.as_ref()
            }
        }
    }

    pub fn filter(&self) -> Option<&str> {
        match self {
            Command::Run { filter, .. } | Command::Csv { filter, .. } => filter.as_deref(),
            Command::Jobs { .. } => None,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}
