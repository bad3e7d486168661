//! Client state that survives a restart.
//!
//! Only an allow-list is kept: the login session, the search history, the
//! results page UI state and the selected content types. Search results
//! themselves are never persisted.

use std::path::Path;

use anyhow::Context;
use common::search_history::StoredHistoryRecord;
use common::search_results::ResultsUiState;
use serde::{Deserialize, Serialize};

use crate::stores::user::Session;

/// Version 1 files predate typed history records.
pub const STATE_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedState {
    pub version: u32,
    pub session: Option<Session>,
    pub search_history: Vec<StoredHistoryRecord>,
    pub results_ui: ResultsUiState,
    pub content_types: Vec<String>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            session: None,
            search_history: vec![],
            results_ui: ResultsUiState::default(),
            content_types: vec![],
        }
    }
}

/// Read the state file. A missing file yields the default state.
pub async fn load_state(path: &Path) -> anyhow::Result<PersistedState> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no saved state");
            return Ok(PersistedState::default());
        }
        Err(err) => return Err(err).with_context(|| format!("reading {}", path.display())),
    };
    let mut state: PersistedState =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    if state.version < STATE_VERSION {
        tracing::info!(from = state.version, to = STATE_VERSION, "upgrading saved state");
        state.version = STATE_VERSION;
    }
    Ok(state)
}

/// Write the state file through a temporary file so a crash never leaves it
/// half written.
pub async fn save_state(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(state)?;
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, text).await.with_context(|| format!("writing {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path).await.with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}
