//! Search store: issues discovery requests and owns the displayed results.
//!
//! Only one search is current at a time. Starting a search cancels the one in
//! flight and advances the store's generation; any call that resolves after
//! the generation moved on is dropped with [`SearchError::Superseded`]
//! instead of overwriting fresher results.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use common::search_query::{SearchParams, TypeaheadParams};
use common::search_result::SearchResultRecord;
use common::search_results::SearchResults;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::search::{TypeaheadScope, fetch_content_types, search_for_results, typeahead};
use crate::error::SearchError;
use crate::http_utils::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Searching,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub received: usize,
    /// A full page came back. This is a guess: it is also true when the
    /// remaining count was exactly one page.
    pub has_more: bool,
}

impl SearchOutcome {
    fn from_page(received: usize, page_size: u32) -> Self {
        Self { received, has_more: received == page_size as usize }
    }
}

#[derive(Default)]
struct SearchState {
    results: SearchResults,
    status: SearchStatus,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

pub struct Search {
    transport: Arc<dyn Transport>,
    api_base: String,
    state: Mutex<SearchState>,
}

impl Search {
    pub fn new(transport: Arc<dyn Transport>, api_base: impl Into<String>) -> Self {
        Self { transport, api_base: api_base.into(), state: Mutex::new(SearchState::default()) }
    }

    pub fn status(&self) -> SearchStatus {
        self.lock().status
    }

    pub fn results(&self) -> Vec<SearchResultRecord> {
        self.lock().results.records().to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().results.is_empty()
    }

    /// Run a new search, replacing the held results on success.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchOutcome, SearchError> {
        let (generation, token) = {
            let mut state = self.lock();
            if let Some(previous) = state.in_flight.take() {
                previous.cancel();
            }
            state.generation += 1;
            let token = CancellationToken::new();
            state.in_flight = Some(token.clone());
            state.status = SearchStatus::Searching;
            (state.generation, token)
        };
        info!(term = %params.term, generation, "search started");

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(SearchError::Superseded),
            result = search_for_results(self.transport.as_ref(), &self.api_base, params) => result,
        };

        let mut state = self.lock();
        if state.generation != generation {
            debug!(generation, current = state.generation, "search superseded");
            return Err(SearchError::Superseded);
        }
        state.in_flight = None;
        match result {
            Ok(records) => {
                let outcome = SearchOutcome::from_page(records.len(), params.page_size);
                info!(generation, received = outcome.received, has_more = outcome.has_more, "search finished");
                state.results.replace(records);
                state.status = SearchStatus::Succeeded;
                Ok(outcome)
            }
            Err(err) => {
                warn!(generation, error = %err, "search failed");
                state.status = SearchStatus::Failed;
                Err(err)
            }
        }
    }

    /// Fetch the page after the last held record and append it.
    ///
    /// The cursor is read from the current last record when the request is
    /// made, overriding `params.pagination_token`. With nothing held there is
    /// nothing to continue and no request is sent.
    pub async fn fetch_more(&self, params: &SearchParams) -> Result<SearchOutcome, SearchError> {
        let (generation, cursor) = {
            let state = self.lock();
            match state.results.last_pagination_token() {
                Some(cursor) => (state.generation, cursor.to_string()),
                None => return Ok(SearchOutcome { received: 0, has_more: false }),
            }
        };
        let mut params = params.clone();
        params.pagination_token = Some(cursor.clone());

        let result = search_for_results(self.transport.as_ref(), &self.api_base, &params).await;

        let mut state = self.lock();
        if state.generation != generation || state.results.last_pagination_token() != Some(cursor.as_str()) {
            debug!(generation, current = state.generation, "fetch more discarded, results changed");
            return Err(SearchError::Superseded);
        }
        let records = result.inspect_err(|err| warn!(error = %err, "fetch more failed"))?;
        let outcome = SearchOutcome::from_page(records.len(), params.page_size);
        state.results.append(records);
        Ok(outcome)
    }

    pub fn clear_results(&self) {
        let mut state = self.lock();
        if let Some(previous) = state.in_flight.take() {
            previous.cancel();
        }
        state.generation += 1;
        state.results.clear();
        state.status = SearchStatus::Idle;
    }

    pub async fn typeahead(&self, params: &TypeaheadParams) -> Result<Vec<String>, SearchError> {
        typeahead(self.transport.as_ref(), &self.api_base, TypeaheadScope::Term, params).await
    }

    pub async fn typeahead_creator(&self, params: &TypeaheadParams) -> Result<Vec<String>, SearchError> {
        typeahead(self.transport.as_ref(), &self.api_base, TypeaheadScope::Creator, params).await
    }

    pub async fn fetch_content_types(&self) -> Result<Vec<String>, SearchError> {
        fetch_content_types(self.transport.as_ref(), &self.api_base).await
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
