//! Shared search query models and helpers.

use serde::{Deserialize, Serialize};

use crate::query_string::{self, QueryParams, QueryValue};
use crate::search_const::PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Relevance,
    Name,
    Creator,
    DateCreated,
    DateModified,
}

impl SortKey {
    /// Relevance is the backend default and is sent as an empty (omitted) value.
    pub fn as_param(&self) -> &'static str {
        match self {
            SortKey::Relevance => "",
            SortKey::Name => "name",
            SortKey::Creator => "creatorName",
            SortKey::DateCreated => "dateCreated",
            SortKey::DateModified => "dateModified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_param(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// What the search endpoint is asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub term: String,
    pub sort_by: SortKey,
    pub order: SortDirection,
    pub page_size: u32,
    pub page_number: u32,
    /// Cursor taken from the last record of the previous page.
    pub pagination_token: Option<String>,
    /// Query parameters contributed by active filters.
    pub filters: QueryParams,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            term: String::new(),
            sort_by: SortKey::default(),
            order: SortDirection::default(),
            page_size: PAGE_SIZE,
            page_number: 0,
            pagination_token: None,
            filters: QueryParams::new(),
        }
    }
}

impl SearchParams {
    pub fn new(term: impl Into<String>) -> Self {
        Self { term: term.into(), ..Default::default() }
    }

    pub fn to_query_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert("term".into(), self.term.clone().into());
        params.insert("sortBy".into(), self.sort_by.as_param().into());
        if self.sort_by != SortKey::Relevance {
            params.insert("order".into(), self.order.as_param().into());
        }
        params.insert("pageSize".into(), self.page_size.into());
        params.insert("pageNumber".into(), self.page_number.into());
        params.insert("paginationToken".into(), self.pagination_token.clone().into());
        for (key, value) in &self.filters {
            params.insert(key.clone(), value.clone());
        }
        params
    }

    pub fn to_query_string(&self) -> String {
        query_string::encode(&self.to_query_params())
    }
}

/// Typeahead request: the partial input typed so far.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeaheadParams {
    pub term: String,
}

impl TypeaheadParams {
    pub fn new(term: impl Into<String>) -> Self {
        Self { term: term.into() }
    }

    pub fn to_query_string(&self) -> String {
        let mut params = QueryParams::new();
        params.insert("term".into(), QueryValue::Str(self.term.clone()));
        query_string::encode(&params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_omitted() {
        let params = SearchParams::new("rain");
        assert_eq!(params.to_query_string(), "term=rain&pageSize=20");
    }

    #[test]
    fn sort_filters_and_token_are_included() {
        let mut params = SearchParams::new("soil");
        params.sort_by = SortKey::DateCreated;
        params.order = SortDirection::Desc;
        params.page_number = 2;
        params.pagination_token = Some("abc==".into());
        params.filters.insert("contentType".into(), QueryValue::List(vec!["CSV Data".into()]));
        params.filters.insert("publicationYearStart".into(), QueryValue::Int(2001));
        assert_eq!(
            params.to_query_string(),
            "term=soil&sortBy=dateCreated&order=desc&pageSize=20&pageNumber=2&paginationToken=abc%3D%3D&publicationYearStart=2001&contentType=CSV%20Data"
        );
    }

    #[test]
    fn typeahead_encodes_term() {
        assert_eq!(TypeaheadParams::new("Tar bo").to_query_string(), "term=Tar%20bo");
        assert_eq!(TypeaheadParams::new("").to_query_string(), "");
    }
}
