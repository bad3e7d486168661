//! The displayed result list and the UI state that goes with it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::search_const::default_year_range;
use crate::search_query::{SortDirection, SortKey};
use crate::search_result::SearchResultRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    records: Vec<SearchResultRecord>,
}

impl SearchResults {
    pub fn records(&self) -> &[SearchResultRecord] {
        &self.records
    }

    pub fn replace(&mut self, records: Vec<SearchResultRecord>) {
        self.records = records;
    }

    pub fn append(&mut self, records: Vec<SearchResultRecord>) {
        self.records.extend(records);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Cursor for the next page: the token of the last held record.
    pub fn last_pagination_token(&self) -> Option<&str> {
        self.records.last().map(|r| r.pagination_token.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// UI-only state of the results page. All of it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResultsUiState {
    pub sort_by: SortKey,
    pub order: SortDirection,
    pub publication_year: [i64; 2],
    pub data_coverage: [i64; 2],
    pub creation_date: [i64; 2],
    pub open_panels: Vec<usize>,
}

impl Default for ResultsUiState {
    fn default() -> Self {
        Self {
            sort_by: SortKey::default(),
            order: SortDirection::default(),
            publication_year: default_year_range(),
            data_coverage: default_year_range(),
            creation_date: default_year_range(),
            open_panels: vec![],
        }
    }
}

/// Shared handle to [`ResultsUiState`]; clones point at the same state.
#[derive(Debug, Clone, Default)]
pub struct ResultsUi {
    inner: Arc<Mutex<ResultsUiState>>,
}

impl ResultsUi {
    pub fn new(state: ResultsUiState) -> Self {
        Self { inner: Arc::new(Mutex::new(state)) }
    }

    pub fn get(&self) -> ResultsUiState {
        self.lock().clone()
    }

    pub fn set(&self, state: ResultsUiState) {
        *self.lock() = state;
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut ResultsUiState) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn toggle_panel(&self, index: usize) {
        self.update(|state| {
            if let Some(pos) = state.open_panels.iter().position(|i| *i == index) {
                state.open_panels.remove(pos);
            } else {
                state.open_panels.push(index);
            }
        });
    }

    fn lock(&self) -> MutexGuard<'_, ResultsUiState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
