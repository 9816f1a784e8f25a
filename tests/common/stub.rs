//! Recording transport shared by the unit and integration tests

#![allow(dead_code)]

use super::{Result, Transport};
use async_trait::async_trait;
use reqwest::{Method, Request, Response, StatusCode, Url, header::HeaderMap};
use std::{collections::VecDeque, sync::Mutex};

/// A request as seen by the stub
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body should be JSON")
    }

    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// Replays canned responses in order and records every request it sees
#[derive(Default)]
pub struct StubTransport {
    responses: Mutex<VecDeque<(StatusCode, String)>>,
    requests: Mutex<Vec<Recorded>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: StatusCode, body: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back((status, body.into()));
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, request: Request) -> Result<Response> {
        self.requests.lock().unwrap().push(Recorded {
            method: request.method().clone(),
            url: request.url().clone(),
            headers: request.headers().clone(),
            body: request
                .body()
                .and_then(|b| b.as_bytes())
                .map(<[u8]>::to_vec)
                .unwrap_or_default(),
        });

        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("no canned response for {}", request.url()));

        let mut response = http::Response::new(body);
        *response.status_mut() = status;

        Ok(Response::from(response))
    }
}
