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
use std::{fmt::Debug, time::Duration};

use reqwest::{
    blocking::Client as HttpClient, blocking::ClientBuilder as HttpClientBuilder,
    header::HeaderValue, header::ACCEPT, header::CONTENT_TYPE, Method, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

pub use crate::RedfishError;
use crate::{BmcVendor, Redfish};

pub const REDFISH_ENDPOINT: &str = "redfish/v1";
pub const DEFAULT_PORT: u16 = 443;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub struct RedfishClientPoolBuilder {
    timeout: Duration,
    accept_invalid_certs: bool,
}

impl RedfishClientPoolBuilder {
    /// Prevents the Redfish Client from accepting self signed certificates
    /// and other invalid certificates.
    ///
    /// By default self signed certificates will be accepted, since BMCs usually
    /// use those.
    pub fn reject_invalid_certs(mut self) -> RedfishClientPoolBuilder {
        self.accept_invalid_certs = false;
        self
    }

    /// Overwrites the timeout that will be applied to every request
    pub fn timeout(mut self, timeout: Duration) -> RedfishClientPoolBuilder {
        self.timeout = timeout;
        self
    }

    /// Builds a Redfish Client Network Configuration
    pub fn build(&self) -> Result<RedfishClientPool, RedfishError> {
        let http_client = HttpClientBuilder::new()
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .timeout(self.timeout)
            .build()
            .map_err(RedfishError::HttpClientBuild)?;
        Ok(RedfishClientPool { http_client })
    }
}

/// The endpoint that the redfish client connects to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Hostname or IP address of BMC
    pub host: String,
    /// BMC port. If absent port 443 will be used, whatever the scheme
    pub port: Option<u16>,
    /// BMC username
    pub user: String,
    /// BMC password
    pub password: String,
    /// Talk https (the default) or plain http to the BMC
    pub use_https: bool,
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint {
            host: "".to_string(),
            port: None,
            user: "".to_string(),
            password: "".to_string(),
            use_https: true,
        }
    }
}

impl Endpoint {
    /// scheme://host:port, without a trailing slash
    pub fn base_url(&self) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        format!(
            "{scheme}://{}:{}",
            self.host,
            self.port.unwrap_or(DEFAULT_PORT)
        )
    }

    /// Host, user and password must all be set. Nothing else is checked here,
    /// a bad host only shows up as a NetworkError on the first call.
    pub fn validate(&self) -> Result<(), RedfishError> {
        if self.host.is_empty() {
            return Err(RedfishError::MissingEndpointValue("host"));
        }
        if self.user.is_empty() {
            return Err(RedfishError::MissingEndpointValue("username"));
        }
        if self.password.is_empty() {
            return Err(RedfishError::MissingEndpointValue("password"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RedfishClientPool {
    http_client: HttpClient,
}

impl RedfishClientPool {
    /// Returns Builder for configuring a Redfish HTTP connection pool
    pub fn builder() -> RedfishClientPoolBuilder {
        RedfishClientPoolBuilder {
            timeout: DEFAULT_TIMEOUT,
            // BMCs often have a self-signed cert, so usually this has to be true
            accept_invalid_certs: true,
        }
    }

    /// Creates a Redfish BMC client of the given vendor for a certain endpoint.
    ///
    /// No HTTP request is made until the first call on the returned client.
    pub fn create_client(
        &self,
        vendor: BmcVendor,
        endpoint: Endpoint,
    ) -> Result<Box<dyn Redfish>, RedfishError> {
        endpoint.validate()?;
        debug!("{vendor} client for {}", endpoint.base_url());
        let transport = HttpTransport::new(self.http_client.clone(), endpoint);
        let client = RedfishHttpClient::new(Box::new(transport));
        Ok(match vendor {
            BmcVendor::Ilo => Box::new(crate::hpe::Bmc::new(client)),
            BmcVendor::Idrac => Box::new(crate::dell::Bmc::new(client)),
        })
    }
}

/// A single authenticated request/response exchange with a BMC.
///
/// `api` is relative to `/redfish/v1/`. A non-2XX status is not an error at this
/// level; only failing to talk to the BMC at all is.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        method: Method,
        api: &str,
        body: Option<String>,
    ) -> Result<(StatusCode, String), RedfishError>;

    /// Full URL for `api`, used in logs and error messages
    fn url(&self, api: &str) -> String;
}

/// Transport over HTTP(S) with basic auth on every request
pub struct HttpTransport {
    endpoint: Endpoint,
    http_client: HttpClient,
}

impl HttpTransport {
    pub fn new(http_client: HttpClient, endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            http_client,
        }
    }
}

impl Transport for HttpTransport {
    fn url(&self, api: &str) -> String {
        format!("{}/{}/{}", self.endpoint.base_url(), REDFISH_ENDPOINT, api)
    }

    fn execute(
        &self,
        method: Method,
        api: &str,
        body: Option<String>,
    ) -> Result<(StatusCode, String), RedfishError> {
        let url = self.url(api);
        let mut req_b = self
            .http_client
            .request(method, &url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .basic_auth(&self.endpoint.user, Some(&self.endpoint.password));
        if let Some(b) = body {
            req_b = req_b.body(b);
        }
        let response = req_b.send().map_err(|e| RedfishError::NetworkError {
            url: url.clone(),
            source: e,
        })?;
        let status_code = response.status();
        // read the body even if not status 2XX, because BMCs give useful error messages as JSON
        let response_body = response
            .text()
            .map_err(|e| RedfishError::NetworkError { url, source: e })?;
        Ok((status_code, response_body))
    }
}

/// JSON on top of a [`Transport`]. All the HTTP requests of a vendor client go through here.
pub struct RedfishHttpClient {
    transport: Box<dyn Transport>,
}

impl RedfishHttpClient {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn url(&self, api: &str) -> String {
        self.transport.url(api)
    }

    /// GET a resource. Anything other than 200 OK is an error.
    pub fn get<T>(&self, api: &str) -> Result<T, RedfishError>
    where
        T: DeserializeOwned + Debug,
    {
        let (status_code, response_body) = self.req::<()>(Method::GET, api, None)?;
        if status_code != StatusCode::OK {
            return Err(RedfishError::HTTPErrorCode {
                url: self.url(api),
                status_code,
                response_body,
            });
        }
        serde_json::from_str(&response_body).map_err(|e| RedfishError::JsonDeserializeError {
            url: self.url(api),
            body: response_body,
            source: e,
        })
    }

    pub fn post<B>(&self, api: &str, data: B) -> Result<(StatusCode, String), RedfishError>
    where
        B: Serialize + Debug,
    {
        self.req(Method::POST, api, Some(data))
    }

    pub fn patch<B>(&self, api: &str, data: B) -> Result<(StatusCode, String), RedfishError>
    where
        B: Serialize + Debug,
    {
        self.req(Method::PATCH, api, Some(data))
    }

    pub fn req<B>(
        &self,
        method: Method,
        api: &str,
        body: Option<B>,
    ) -> Result<(StatusCode, String), RedfishError>
    where
        B: Serialize + Debug,
    {
        let body_enc = match body {
            Some(b) => {
                let body_enc =
                    serde_json::to_string(&b).map_err(|e| RedfishError::JsonSerializeError {
                        url: self.url(api),
                        object_debug: format!("{b:?}"),
                        source: e,
                    })?;
                Some(body_enc)
            }
            None => None,
        };
        debug!(
            "TX {} {} {}",
            method,
            self.url(api),
            body_enc.as_deref().unwrap_or_default()
        );
        let (status_code, response_body) = self.transport.execute(method, api, body_enc)?;
        if response_body.is_empty() {
            debug!("RX {status_code}");
        } else {
            debug!("RX {status_code} {response_body}");
        }
        Ok((status_code, response_body))
    }
}
