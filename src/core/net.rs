// src/core/net.rs
//! HTTP plumbing under the client.
//!
//! The client never touches `reqwest` directly; it talks to a [`Transport`],
//! which owns the cookie-carrying session. Logging out throws the transport
//! away and asks it for a fresh one via [`Transport::renew`].

use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::config::ClientOptions;
use crate::error::{BoxError, Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub query: Vec<(String, String)>,
    /// Sent url-encoded as the body when non-empty.
    pub form: Vec<(String, String)>,
}

#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// Final URL after redirects.
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    /// Perform one request. Non-2xx statuses are returned, not raised.
    fn execute(&mut self, request: &HttpRequest) -> std::result::Result<HttpResponse, BoxError>;

    /// A new session with the same settings and no cookies.
    ///
    /// Never hands back the old session; if the new one can't be set up, its
    /// requests fail instead.
    fn renew(&self) -> Self
    where
        Self: Sized;
}

/// Blocking `reqwest` session with a cookie store.
pub struct HttpTransport {
    /// `Err` holds the setup failure of a renewed session; requests report it.
    client: std::result::Result<Client, String>,
    user_agent: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let user_agent = options.user_agent.clone();
        let timeout = options.timeout;
        let client = build_client(&user_agent, timeout)
            .map_err(|e| Error::Config(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { client: Ok(client), user_agent, timeout })
    }
}

fn build_client(user_agent: &str, timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .cookie_store(true)
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
}

impl Transport for HttpTransport {
    fn execute(&mut self, request: &HttpRequest) -> std::result::Result<HttpResponse, BoxError> {
        let client = self
            .client
            .as_ref()
            .map_err(|e| format!("HTTP session unavailable: {e}"))?;
        let builder = match request.method {
            Method::Get => client.get(request.url.clone()),
            Method::Post => client.post(request.url.clone()),
        };
        let mut builder = builder.query(&request.query);
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }

        let res = builder.send()?;
        let status = res.status().as_u16();
        let url = res.url().to_string();
        let body = res.text()?;
        Ok(HttpResponse { url, status, body })
    }

    fn renew(&self) -> Self {
        let client = build_client(&self.user_agent, self.timeout).map_err(|e| {
            loge!("Cannot start a new HTTP session: {e}");
            e.to_string()
        });
        Self { client, user_agent: self.user_agent.clone(), timeout: self.timeout }
    }
}
