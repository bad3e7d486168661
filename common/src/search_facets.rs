//! The search page state: free-text term plus the standard facet filters,
//! mapped to the route query and to [`SearchParams`].

use std::sync::Arc;

use crate::filter::{Filter, FilterOption, FilterValue};
use crate::query_string::QueryParams;
use crate::route_query::{RouteParams, RouteQuery, RouteValue};
use crate::search_const::default_year_range;
use crate::search_query::SearchParams;
use crate::search_results::{ResultsUi, ResultsUiState};

/// Short route keys.
pub mod route_keys {
    pub const TERM: &str = "q";
    pub const AUTHOR: &str = "an";
    pub const OWNER: &str = "on";
    pub const CONTENT_TYPE: &str = "ct";
    pub const FUNDER: &str = "f";
    pub const SUBJECT: &str = "sj";
    pub const AVAILABILITY: &str = "a";
    pub const CREATION_DATE: &str = "cd";
    pub const PUBLICATION_YEAR: &str = "py";
    pub const DATA_COVERAGE: &str = "dc";
}

#[derive(Debug, Clone)]
pub struct SearchFacets {
    pub term: String,
    pub filters: Vec<Filter>,
    ui: ResultsUi,
}

impl SearchFacets {
    pub fn new(ui: ResultsUi) -> Self {
        let filters = default_filters(&ui);
        Self { term: String::new(), filters, ui }
    }

    pub fn filter(&self, url_label: &str) -> Option<&Filter> {
        self.filters.iter().find(|f| f.url_label == url_label)
    }

    pub fn filter_mut(&mut self, url_label: &str) -> Option<&mut Filter> {
        self.filters.iter_mut().find(|f| f.url_label == url_label)
    }

    pub fn active_count(&self) -> usize {
        self.filters.iter().filter(|f| f.is_active()).count()
    }

    /// Replace the content type options with what the backend offers.
    pub fn set_content_types(&mut self, content_types: &[String]) {
        if let Some(filter) = self.filter_mut(route_keys::CONTENT_TYPE) {
            filter.options = content_types.iter().map(|ct| FilterOption::new(ct.clone(), ct.clone())).collect();
        }
    }

    /// Select content types and enable the filter when any are given.
    pub fn select_content_types(&mut self, selected: Vec<String>) {
        if let Some(filter) = self.filter_mut(route_keys::CONTENT_TYPE) {
            if !selected.is_empty() {
                filter.enable();
            }
            filter.set_value(FilterValue::Multiple(selected));
        }
    }

    pub fn selected_content_types(&self) -> Vec<String> {
        self.filter(route_keys::CONTENT_TYPE).map(|f| f.selected()).unwrap_or_default()
    }

    pub fn query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        for filter in &self.filters {
            params.extend(filter.query_params());
        }
        params
    }

    pub fn to_search_params(&self, page_size: u32) -> SearchParams {
        let ui = self.ui.get();
        SearchParams {
            term: self.term.clone(),
            sort_by: ui.sort_by,
            order: ui.order,
            page_size,
            filters: self.query_params(),
            ..Default::default()
        }
    }

    pub fn route_params(&self) -> RouteParams {
        let mut params = RouteParams::new();
        let term = Some(self.term.clone()).filter(|t| !t.is_empty()).map(RouteValue::Single);
        params.insert(route_keys::TERM.to_string(), term);
        for filter in &self.filters {
            params.extend(filter.route_params());
        }
        params
    }

    pub fn load_from_route(&mut self, query: &RouteQuery) {
        self.term = query.get(route_keys::TERM).and_then(|v| v.first()).unwrap_or_default().to_string();
        for filter in self.filters.iter_mut() {
            filter.load_from_route(query);
        }
    }

    pub fn clear_all(&mut self) {
        self.term.clear();
        for filter in self.filters.iter_mut() {
            filter.clear();
        }
    }
}

/// The standard facet set. The year range facets are views over the shared
/// [`ResultsUiState`], so the results page and the filters agree on them.
pub fn default_filters(ui: &ResultsUi) -> Vec<Filter> {
    vec![
        Filter::string("creatorName", route_keys::AUTHOR),
        Filter::string("ownerName", route_keys::OWNER),
        Filter::select_multiple("contentType", route_keys::CONTENT_TYPE),
        Filter::string("fundingFunderName", route_keys::FUNDER),
        Filter::string("subject", route_keys::SUBJECT),
        Filter::select_multiple("availability", route_keys::AVAILABILITY).with_options(vec![
            FilterOption::new("public", "Public").with_hint("Anyone can view and download"),
            FilterOption::new("discoverable", "Discoverable").with_hint("Metadata is public, content on request"),
            FilterOption::new("published", "Published").with_hint("Permanently published with a DOI"),
        ]),
        ui_range_filter(ui, "creationDate", route_keys::CREATION_DATE, |s| &mut s.creation_date),
        ui_range_filter(ui, "publicationYear", route_keys::PUBLICATION_YEAR, |s| &mut s.publication_year),
        ui_range_filter(ui, "dataCoverage", route_keys::DATA_COVERAGE, |s| &mut s.data_coverage),
    ]
}

fn ui_range_filter(
    ui: &ResultsUi,
    name: &str,
    url_label: &str,
    field: fn(&mut ResultsUiState) -> &mut [i64; 2],
) -> Filter {
    let (get_ui, set_ui, clear_ui) = (ui.clone(), ui.clone(), ui.clone());
    Filter::range(name, url_label).delegated(
        Arc::new(move || FilterValue::Range(get_ui.update(|s| *field(s)))),
        Arc::new(move |value: FilterValue| {
            if let FilterValue::Range(range) = value {
                set_ui.update(|s| *field(s) = range);
            }
        }),
        Some(Arc::new(move || clear_ui.update(|s| *field(s) = default_year_range()))),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::query_string::QueryValue;
    use crate::route_query::{apply_route_params, route_query_from_pairs};
    use crate::search_const::max_year;
    use crate::search_query::SortKey;

    #[test]
    fn route_round_trip() {
        let ui = ResultsUi::default();
        let mut facets = SearchFacets::new(ui.clone());
        let route = route_query_from_pairs(vec![("q", "streamflow"), ("ct", "CSV Data"), ("py", "2000"), ("py", "2010"), ("an", "Tarboton")]);
        facets.load_from_route(&route);

        assert_eq!(facets.term, "streamflow");
        assert_eq!(facets.active_count(), 3);
        assert_eq!(ui.get().publication_year, [2000, 2010]);

        let mut rebuilt = RouteQuery::new();
        apply_route_params(&mut rebuilt, facets.route_params());
        let mut expected = route.clone();
        // a single content type comes back as a one-element list
        expected.insert("ct".into(), RouteValue::Many(vec!["CSV Data".into()]));
        assert_eq!(rebuilt, expected);
    }

    #[test]
    fn search_params_collect_active_filters_and_sort() {
        let ui = ResultsUi::default();
        ui.update(|s| s.sort_by = SortKey::Name);
        let mut facets = SearchFacets::new(ui);
        facets.load_from_route(&route_query_from_pairs(vec![("q", "soil"), ("dc", "1990"), ("dc", "2000"), ("sj", "")]));

        let params = facets.to_search_params(50);
        assert_eq!(params.term, "soil");
        assert_eq!(params.page_size, 50);
        assert_eq!(params.sort_by, SortKey::Name);
        assert_eq!(params.filters.get("dataCoverageStart"), Some(&QueryValue::Int(1990)));
        assert_eq!(params.filters.get("dataCoverageEnd"), Some(&QueryValue::Int(2000)));
        assert!(params.filters.get("subject").is_none());
        assert!(params.filters.get("publicationYearStart").is_none());
    }

    #[test]
    fn clear_all_resets_shared_ranges() {
        let ui = ResultsUi::default();
        let mut facets = SearchFacets::new(ui.clone());
        facets.load_from_route(&route_query_from_pairs(vec![("q", "x"), ("cd", "1950"), ("cd", "1960")]));
        assert_eq!(ui.get().creation_date, [1950, 1960]);

        facets.clear_all();
        assert_eq!(facets.term, "");
        assert_eq!(facets.active_count(), 0);
        assert_eq!(ui.get().creation_date, default_year_range());
        assert_eq!(ui.get().creation_date[1], max_year());
        assert!(facets.route_params().values().all(|v| v.is_none()));
    }

    #[test]
    fn content_type_selection() {
        let mut facets = SearchFacets::new(ResultsUi::default());
        facets.set_content_types(&["CSV Data".to_string(), "Geographic Raster".to_string()]);
        assert_eq!(facets.filter(route_keys::CONTENT_TYPE).map(|f| f.options.len()), Some(2));

        facets.select_content_types(vec![]);
        assert!(!facets.filter(route_keys::CONTENT_TYPE).is_some_and(|f| f.is_enabled));
        facets.select_content_types(vec!["CSV Data".into()]);
        assert_eq!(facets.selected_content_types(), vec!["CSV Data".to_string()]);
        assert_eq!(facets.query_params().get("contentType"), Some(&QueryValue::List(vec!["CSV Data".into()])));
    }
}
