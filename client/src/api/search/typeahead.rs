//! Typeahead suggestions.

use common::search_query::TypeaheadParams;

use crate::error::SearchError;
use crate::http_utils::{get_json, string_list, transport::{HttpRequest, Transport}};

/// Which suggestion list to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeaheadScope {
    Term,
    Creator,
}

impl TypeaheadScope {
    fn endpoint(&self) -> &'static str {
        match self {
            TypeaheadScope::Term => "typeahead",
            TypeaheadScope::Creator => "typeahead_creator",
        }
    }
}

pub async fn typeahead(transport: &dyn Transport, api_base: &str, scope: TypeaheadScope, params: &TypeaheadParams) -> Result<Vec<String>, SearchError> {
    let url = format!("{api_base}/discovery/{}?{}", scope.endpoint(), params.to_query_string());
    let body = get_json(transport, HttpRequest::get(url)).await?;
    string_list(&body)
}
