// src/client.rs
//! The client handle and its request gateway.
//!
//! Every page load goes through [`Geocaching::request`]: resolve the target,
//! apply the auth gate, run the transport, decode the body. Session handling
//! lives in `session.rs`, the search streams in `scrape/`.

use scraper::Html;
use serde_json::Value;
use url::Url;

use crate::cache::Cache;
use crate::config::ClientOptions;
use crate::core::net::{HttpRequest, HttpResponse, HttpTransport, Method, Transport};
use crate::credentials::{CredentialSource, CredentialsFile};
use crate::error::{Error, Result};
use crate::session::Session;
use crate::trackable::Trackable;

/// What the caller wants the response body turned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expect {
    Markup,
    Json,
    Raw,
}

/// Whether a request may go out while logged out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Auth {
    Required,
    /// Login page handling only.
    Bypass,
}

pub enum Payload {
    Markup(Html),
    Json(Value),
    Raw(HttpResponse),
}

impl Payload {
    fn kind(&self) -> &'static str {
        match self {
            Payload::Markup(_) => "markup",
            Payload::Json(_) => "json",
            Payload::Raw(_) => "raw",
        }
    }

    pub fn into_markup(self) -> Result<Html> {
        match self {
            Payload::Markup(doc) => Ok(doc),
            other => Err(Error::parse(format!("expected markup, got {}", other.kind()))),
        }
    }

    pub fn into_json(self) -> Result<Value> {
        match self {
            Payload::Json(v) => Ok(v),
            other => Err(Error::parse(format!("expected json, got {}", other.kind()))),
        }
    }

    pub fn into_raw(self) -> Result<HttpResponse> {
        match self {
            Payload::Raw(r) => Ok(r),
            other => Err(Error::parse(format!("expected raw response, got {}", other.kind()))),
        }
    }
}

/// Query string and form body for one request.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((s!(key), value.to_string()));
        self
    }

    pub fn form(fields: Vec<(String, String)>) -> Self {
        Self { query: Vec::new(), form: fields }
    }
}

/// A client for one account on the site.
pub struct Geocaching<T: Transport = HttpTransport> {
    base_url: Url,
    pub(crate) session: Session,
    pub(crate) transport: T,
    pub(crate) credentials: Box<dyn CredentialSource>,
}

impl Geocaching<HttpTransport> {
    pub fn new() -> Result<Self> {
        Self::with_options(ClientOptions::default())
    }

    pub fn with_options(options: ClientOptions) -> Result<Self> {
        let transport = HttpTransport::new(&options)?;
        Self::with_transport(options, transport)
    }
}

impl<T: Transport> Geocaching<T> {
    pub fn with_transport(options: ClientOptions, transport: T) -> Result<Self> {
        let base_url = Url::parse(&options.base_url)
            .map_err(|e| Error::Config(format!("base url {:?}: {e}", options.base_url)))?;
        Ok(Self {
            base_url,
            session: Session::LoggedOut,
            transport,
            credentials: Box::new(CredentialsFile::new(options.credentials_file)),
        })
    }

    /// Replace where `login` gets credentials from when none are passed.
    pub fn with_credentials(mut self, source: impl CredentialSource + 'static) -> Self {
        self.credentials = Box::new(source);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.identity().is_some()
    }

    pub(crate) fn ensure_logged_in(&self) -> Result<()> {
        match self.session {
            Session::LoggedIn { .. } => Ok(()),
            Session::LoggedOut => Err(Error::AuthRequired),
        }
    }

    fn resolve(&self, target: &str) -> Result<Url> {
        match Url::parse(target) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .base_url
                .join(target)
                .map_err(|e| Error::transport(target, e)),
            Err(e) => Err(Error::transport(target, e)),
        }
    }

    /// Load `target` and decode it as `expect` says.
    ///
    /// With [`Auth::Required`] and no session this fails with
    /// [`Error::AuthRequired`] before anything is sent. Connection failures,
    /// non-2xx statuses and undecodable bodies all come back as
    /// [`Error::Transport`] carrying the URL.
    pub fn request(
        &mut self,
        target: &str,
        method: Method,
        expect: Expect,
        auth: Auth,
        opts: RequestOptions,
    ) -> Result<Payload> {
        if auth == Auth::Required {
            self.ensure_logged_in()?;
        }

        let url = self.resolve(target)?;
        let req = HttpRequest { method, url, query: opts.query, form: opts.form };
        let shown = s!(req.url.as_str());

        let res = self
            .transport
            .execute(&req)
            .map_err(|e| Error::transport(shown.clone(), e))?;
        if !res.is_success() {
            return Err(Error::transport(shown, format!("HTTP status {}", res.status)));
        }

        Ok(match expect {
            Expect::Markup => Payload::Markup(Html::parse_document(&res.body)),
            Expect::Json => {
                let json = serde_json::from_str(&res.body).map_err(|e| Error::transport(shown, e))?;
                Payload::Json(json)
            }
            Expect::Raw => Payload::Raw(res),
        })
    }

    /// Authenticated GET decoded as markup.
    pub(crate) fn get_markup(&mut self, target: &str, opts: RequestOptions) -> Result<Html> {
        self.request(target, Method::Get, Expect::Markup, Auth::Required, opts)?
            .into_markup()
    }

    /// Authenticated GET decoded as JSON.
    pub(crate) fn get_json(&mut self, target: &str, opts: RequestOptions) -> Result<Value> {
        self.request(target, Method::Get, Expect::Json, Auth::Required, opts)?
            .into_json()
    }

    /// Handle for a listing; nothing is loaded.
    pub fn get_cache(&self, waypoint: &str) -> Cache {
        Cache::new(waypoint)
    }

    /// Handle for a trackable; nothing is loaded.
    pub fn get_trackable(&self, tid: &str) -> Trackable {
        Trackable::new(tid)
    }
}
