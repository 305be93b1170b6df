//! Recording transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::client::Client;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, TransportError};

pub(crate) const TEST_BASE_URL: &str = "http://localhost:3000";

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub(crate) struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<HttpResponse>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn respond(&self, status: u16, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(HttpResponse::new(status, body));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }

    /// The JSON body of the last request.
    pub(crate) fn last_body(&self) -> serde_json::Value {
        let body = self.last().body.expect("last request had no body");
        serde_json::from_str(&body).unwrap()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| "no response queued".into())
    }
}

pub(crate) fn client_with(transport: &Arc<RecordingTransport>) -> Client {
    Client::builder()
        .base_url(TEST_BASE_URL)
        .api_key("test-key")
        .transport(transport.clone())
        .build()
        .unwrap()
}

pub(crate) fn url(path: &str) -> String {
    format!("{TEST_BASE_URL}/{path}")
}
