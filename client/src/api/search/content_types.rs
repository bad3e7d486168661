use crate::error::SearchError;
use crate::http_utils::{get_json, string_list, transport::{HttpRequest, Transport}};

pub async fn fetch_content_types(transport: &dyn Transport, api_base: &str) -> Result<Vec<String>, SearchError> {
    let body = get_json(transport, HttpRequest::get(format!("{api_base}/discovery/content-types"))).await?;
    string_list(&body)
}
