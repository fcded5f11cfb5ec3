#![allow(dead_code)]

use async_trait::async_trait;
use esapi::{Client, Request, Response, Transport, TransportError};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Transport that records every request and answers from a queue.
///
/// With an empty queue it answers `200 {"acknowledged": true}`.
#[derive(Default)]
pub struct SpyTransport {
    requests: Mutex<Vec<Request>>,
    replies: Mutex<VecDeque<Result<Response, TransportError>>>,
}

impl SpyTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, reply: Result<Response, TransportError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn reply_status(&self, status: u16, body: Value) {
        self.reply(Ok(Response::new(status, body)));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Request {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for SpyTransport {
    async fn perform_request(&self, request: Request) -> Result<Response, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Response::new(200, json!({"acknowledged": true}))))
    }
}

/// Client over the built-in table, plus the spy behind it
pub fn spy_client() -> (Client, Arc<SpyTransport>) {
    let spy = SpyTransport::new();
    let client = Client::new(spy.clone()).unwrap();
    (client, spy)
}
