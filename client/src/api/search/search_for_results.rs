//! Search endpoint for result lists.

use common::{search_query::SearchParams, search_result::{SearchResultRecord, parse_search_hits}};

use crate::error::SearchError;
use crate::http_utils::{get_json, transport::{HttpRequest, Transport}};

pub async fn search_for_results(transport: &dyn Transport, api_base: &str, params: &SearchParams) -> Result<Vec<SearchResultRecord>, SearchError> {
    let url = format!("{api_base}/discovery/search?{}", params.to_query_string());
    let body = get_json(transport, HttpRequest::get(url)).await?;
    parse_search_hits(&body).map_err(SearchError::Decode)
}
