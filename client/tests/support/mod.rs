//! In-memory transport for driving the stores in tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use client::http_utils::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use serde_json::{Value, json};
use tokio::sync::oneshot;

type Reply = Result<HttpResponse, TransportError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// Answers requests from a script, in request order. A gated answer is held
/// back until the test releases it.
#[derive(Default)]
pub struct FakeTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: impl Into<String>) {
        self.push(Scripted::Ready(Ok(HttpResponse::new(status, body))));
    }

    pub fn respond_json(&self, body: Value) {
        self.respond(200, body.to_string());
    }

    pub fn fail(&self) {
        self.push(Scripted::Ready(Err(TransportError::Request { url: "scripted".into(), message: "connection refused".into() })));
    }

    pub fn gate(&self) -> Gate {
        let (sender, receiver) = oneshot::channel();
        self.push(Scripted::Gated(receiver));
        Gate(sender)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }

    fn push(&self, scripted: Scripted) {
        self.script.lock().unwrap().push_back(scripted);
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(receiver)) => receiver
                .await
                .unwrap_or_else(|_| Err(TransportError::Request { url, message: "gate dropped".into() })),
            None => panic!("unscripted request to {url}"),
        }
    }
}

pub struct Gate(oneshot::Sender<Reply>);

impl Gate {
    /// Release the held request. Ignored if the caller already gave up on it.
    pub fn release(self, status: u16, body: impl Into<String>) {
        self.0.send(Ok(HttpResponse::new(status, body))).ok();
    }

    pub fn release_json(self, body: Value) {
        self.release(200, body.to_string());
    }
}

/// A search response body with `count` hits named `{prefix}-{i}`, each
/// carrying the pagination token `{prefix}-tok-{i}`.
pub fn hits(prefix: &str, count: usize) -> Value {
    Value::Array(
        (0..count)
            .map(|i| {
                json!({
                    "document": [{
                        "_id": format!("{prefix}-{i}"),
                        "name": format!("{prefix}-{i}"),
                        "url": format!("https://example.org/resource/{prefix}-{i}"),
                        "creator": [{"name": "Tarboton"}],
                    }],
                    "score": 1.0,
                    "paginationToken": format!("{prefix}-tok-{i}"),
                })
            })
            .collect(),
    )
}
