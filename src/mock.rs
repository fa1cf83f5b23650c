/*
 * SPDX-License-Identifier: MIT
 *
 * Permission is hereby granted, free of charge, to any person obtaining a
 * copy of this software and associated documentation files (the "Software"),
 * to deal in the Software without restriction, including without limitation
 * the rights to use, copy, modify, merge, publish, distribute, sublicense,
 * and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in
 * all copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
 * THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
 * FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
 * DEALINGS IN THE SOFTWARE.
 */
//! Scripted [`Transport`] for unit tests: canned responses per (method, api),
//! and a log of every request that was made.
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

use reqwest::{Method, StatusCode};

use crate::network::{RedfishHttpClient, Transport};
use crate::RedfishError;

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub api: String,
    pub body: Option<serde_json::Value>,
}

#[derive(Default)]
struct Inner {
    routes: HashMap<(Method, String), VecDeque<(StatusCode, String)>>,
    requests: Vec<RecordedRequest>,
}

#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response. Responses for the same route are handed out in order,
    /// the last one repeats. Unknown routes answer 404.
    pub fn on(&self, method: Method, api: &str, status: StatusCode, body: &str) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .routes
            .entry((method, api.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
        self
    }

    pub fn on_json(&self, method: Method, api: &str, body: serde_json::Value) -> &Self {
        self.on(method, api, StatusCode::OK, &body.to_string())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    pub fn requests_with(&self, method: Method) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }

    pub fn client(&self) -> RedfishHttpClient {
        RedfishHttpClient::new(Box::new(self.clone()))
    }
}

impl Transport for MockTransport {
    fn url(&self, api: &str) -> String {
        format!("https://bmc.test/redfish/v1/{api}")
    }

    fn execute(
        &self,
        method: Method,
        api: &str,
        body: Option<String>,
    ) -> Result<(StatusCode, String), RedfishError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(RecordedRequest {
            method: method.clone(),
            api: api.to_string(),
            body: body.map(|b| serde_json::from_str(&b).unwrap()),
        });
        let Some(queue) = inner.routes.get_mut(&(method, api.to_string())) else {
            return Ok((StatusCode::NOT_FOUND, String::new()));
        };
        let response = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        };
        Ok(response)
    }
}
