//! Wires the stores together. One `App` is built per process and everything
//! else borrows from it.

use std::sync::Arc;

use common::filter::FilterValue;
use common::route_query::{RouteQuery, apply_route_params};
use common::search_facets::{SearchFacets, route_keys};
use common::search_history::{HistoryType, SearchHistory};
use common::search_results::ResultsUi;

use crate::config::Config;
use crate::error::SearchError;
use crate::http_utils::transport::Transport;
use crate::persistence::{PersistedState, STATE_VERSION};
use crate::stores::search::{Search, SearchOutcome};
use crate::stores::user::{LoginWindow, UserStore};

/// Free-text filters whose values are remembered as typeahead hints.
const HINTED_FILTERS: [(&str, HistoryType); 3] = [
    (route_keys::AUTHOR, HistoryType::Creator),
    (route_keys::SUBJECT, HistoryType::Subject),
    (route_keys::FUNDER, HistoryType::Funder),
];

pub struct App {
    pub config: Config,
    pub search: Search,
    pub user: UserStore,
    pub history: SearchHistory,
    pub results_ui: ResultsUi,
    pub facets: SearchFacets,
}

impl App {
    pub fn new(config: Config, transport: Arc<dyn Transport>, login_window: Arc<dyn LoginWindow>) -> Self {
        let results_ui = ResultsUi::default();
        Self {
            search: Search::new(transport.clone(), config.api_base.clone()),
            user: UserStore::new(transport, login_window, config.app_url.clone()),
            history: SearchHistory::new(),
            facets: SearchFacets::new(results_ui.clone()),
            results_ui,
            config,
        }
    }

    pub fn restore(&mut self, state: PersistedState) {
        if let Some(session) = state.session {
            self.user.restore(session);
        }
        self.history = SearchHistory::from_stored(state.search_history);
        self.results_ui.set(state.results_ui);
        self.facets.select_content_types(state.content_types);
    }

    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            version: STATE_VERSION,
            session: self.user.session(),
            search_history: self.history.to_stored(),
            results_ui: self.results_ui.get(),
            content_types: self.facets.selected_content_types(),
        }
    }

    /// Load the facets from `route`, remember what was searched for and run
    /// the search.
    pub async fn run_search(&mut self, route: &RouteQuery) -> Result<SearchOutcome, SearchError> {
        self.facets.load_from_route(route);
        self.history.log(self.facets.term.clone(), HistoryType::Term);
        for (url_label, kind) in HINTED_FILTERS {
            let Some(filter) = self.facets.filter(url_label).filter(|f| f.is_active()) else {
                continue;
            };
            if let FilterValue::Text(Some(text)) = filter.value() {
                self.history.log(text, kind);
            }
        }
        let params = self.facets.to_search_params(self.config.page_size);
        self.search.search(&params).await
    }

    pub async fn fetch_more(&self) -> Result<SearchOutcome, SearchError> {
        let params = self.facets.to_search_params(self.config.page_size);
        self.search.fetch_more(&params).await
    }

    /// Ask the backend which content types exist and offer them as options.
    pub async fn refresh_content_types(&mut self) -> Result<Vec<String>, SearchError> {
        let content_types = self.search.fetch_content_types().await?;
        self.facets.set_content_types(&content_types);
        Ok(content_types)
    }

    /// The route query matching the current facets.
    pub fn route_query(&self) -> RouteQuery {
        let mut query = RouteQuery::new();
        apply_route_params(&mut query, self.facets.route_params());
        query
    }
}
