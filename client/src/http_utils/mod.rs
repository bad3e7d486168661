//! HTTP plumbing shared by the API calls.

pub mod transport;

use serde_json::Value;

use crate::error::SearchError;
use transport::{HttpRequest, Transport};

/// Send a request and parse a successful response body as JSON.
pub async fn get_json(transport: &dyn Transport, request: HttpRequest) -> Result<Value, SearchError> {
    let response = transport.get(request).await?;
    if !response.is_success() {
        return Err(SearchError::Status { status: response.status, body: response.body });
    }
    serde_json::from_str(&response.body).map_err(|e| SearchError::Decode(e.to_string()))
}

/// Parse a JSON array of strings, skipping any non-string entries.
pub fn string_list(body: &Value) -> Result<Vec<String>, SearchError> {
    let Some(items) = body.as_array() else {
        return Err(SearchError::Decode(format!("expected an array of strings, got {body}")));
    };
    Ok(items.iter().filter_map(|v| v.as_str().map(|s| s.to_string())).collect())
}
