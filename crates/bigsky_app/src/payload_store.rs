use std::path::{Path, PathBuf};

use anyhow::Context as _;
use bigsky_domain::{AssistantId, Payload, Result};
use indexmap::IndexMap;

/// Payload captured from the site-design flow, stored as
/// [`DEFAULT_PAYLOAD_ASSISTANT`]
pub const DEFAULT_PAYLOAD_FILE: &str = "site-design-payload.json";

/// Assistant the site-design capture and its CSV eval set run under
pub const DEFAULT_PAYLOAD_ASSISTANT: &str = "default";

/// Suffix of per-assistant payload captures, e.g. `color-assistant-payload.json`
pub const ASSISTANT_PAYLOAD_SUFFIX: &str = "-assistant-payload.json";

/// Normalized payloads keyed by assistant, in the order they were stored
#[derive(Debug, Clone, Default)]
pub struct PayloadStore {
    payloads: IndexMap<AssistantId, Payload>,
}

/// Outcome of loading a directory of payload captures
#[derive(Debug, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: Vec<AssistantId>,
    pub rejected: Vec<(PathBuf, String)>,
}

impl PayloadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalizes `raw` and stores it under `assistant_id`, replacing any
    /// previous payload of that assistant.
    pub fn set_from_raw(&mut self, assistant_id: AssistantId, raw: &str) -> Result<&Payload> {
        let payload = Payload::from_raw(raw)?;
        Ok(self.insert(assistant_id, payload))
    }

    pub fn insert(&mut self, assistant_id: AssistantId, payload: Payload) -> &Payload {
        let (index, _) = self.payloads.insert_full(assistant_id, payload);
        &self.payloads[index]
    }

    pub fn get(&self, assistant_id: &AssistantId) -> Option<&Payload> {
        self.payloads.get(assistant_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &AssistantId> {
        self.payloads.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    /// Loads `site-design-payload.json` as `default`, then every
    /// `*-assistant-payload.json` in path order. Empty or missing captures are
    /// ignored; unreadable and undecodable ones are reported and skipped.
    pub fn load_dir(&mut self, dir: &Path) -> anyhow::Result<LoadReport> {
        let mut report = LoadReport::default();

        let default = dir.join(DEFAULT_PAYLOAD_FILE);
        if default.is_file() {
            self.load_file(&mut report, AssistantId::new(DEFAULT_PAYLOAD_ASSISTANT), &default);
        } else {
            tracing::debug!(path = %default.display(), "No default payload capture");
        }

        let pattern = format!(
            "{}/*{ASSISTANT_PAYLOAD_SUFFIX}",
            glob::Pattern::escape(&dir.to_string_lossy())
        );
        let mut paths = glob::glob(&pattern)
            .with_context(|| format!("Invalid payload directory: {}", dir.display()))?
            .filter_map(|entry| entry.ok())
            .collect::<Vec<_>>();
        paths.sort();

        for path in paths {
            let Some(assistant_id) = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_suffix(ASSISTANT_PAYLOAD_SUFFIX))
                .filter(|id| !id.is_empty())
                .map(AssistantId::new)
            else {
                continue;
            };
            self.load_file(&mut report, assistant_id, &path);
        }

        Ok(report)
    }

    fn load_file(&mut self, report: &mut LoadReport, assistant_id: AssistantId, path: &Path) {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "Skipping unreadable payload");
                report.rejected.push((path.to_path_buf(), error.to_string()));
                return;
            }
        };
        if raw.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Skipping empty payload");
            return;
        }
        match self.set_from_raw(assistant_id.clone(), &raw) {
            Ok(_) => {
                tracing::debug!(assistant = %assistant_id, path = %path.display(), "Loaded payload");
                report.loaded.push(assistant_id);
            }
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "Skipping invalid payload");
                report.rejected.push((path.to_path_buf(), error.to_string()));
            }
        }
    }
}
