//! Session probe and teardown on the application server.

use crate::http_utils::transport::{HttpRequest, Transport, TransportError};

/// `GET {app_url}/api`; true only for a 200 answer.
pub async fn probe_session(transport: &dyn Transport, app_url: &str, cookie: Option<String>) -> Result<bool, TransportError> {
    let response = transport.get(with_cookie(HttpRequest::get(format!("{app_url}/api")), cookie)).await?;
    Ok(response.status == 200)
}

/// `GET {app_url}/api/logout`; returns the response status.
pub async fn end_session(transport: &dyn Transport, app_url: &str, cookie: Option<String>) -> Result<u16, TransportError> {
    let response = transport.get(with_cookie(HttpRequest::get(format!("{app_url}/api/logout")), cookie)).await?;
    Ok(response.status)
}

fn with_cookie(request: HttpRequest, cookie: Option<String>) -> HttpRequest {
    match cookie {
        Some(cookie) => request.header("Cookie", cookie),
        None => request,
    }
}
