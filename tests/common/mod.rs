// tests/common/mod.rs
//
// Scripted transport: answers requests from a queue and records what was sent.
//
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use gc_scrape::core::net::{HttpRequest, HttpResponse, Method, Transport};
use gc_scrape::credentials::{CredentialSource, Credentials, CredentialsError};
use gc_scrape::error::BoxError;
use gc_scrape::{ClientOptions, Geocaching};

pub const BASE: &str = "http://gc.test/";

#[derive(Clone, Debug)]
pub struct Sent {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
    /// Which transport session sent it; bumps on every renew.
    pub session: usize,
}

impl Sent {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.form.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Result<HttpResponse, String>>,
    sent: Vec<Sent>,
    sessions: usize,
}

#[derive(Clone, Default)]
pub struct Handle(Rc<RefCell<Script>>);

impl Handle {
    pub fn reply(&self, status: u16, body: &str) -> &Self {
        self.0.borrow_mut().replies.push_back(Ok(HttpResponse {
            url: BASE.to_string(),
            status,
            body: body.to_string(),
        }));
        self
    }

    pub fn ok(&self, body: &str) -> &Self {
        self.reply(200, body)
    }

    pub fn fail(&self, msg: &str) -> &Self {
        self.0.borrow_mut().replies.push_back(Err(msg.to_string()));
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.0.borrow().sent.clone()
    }

    pub fn count(&self) -> usize {
        self.0.borrow().sent.len()
    }

    /// Number of times the client threw its session away.
    pub fn renewals(&self) -> usize {
        self.0.borrow().sessions
    }

    pub fn pending(&self) -> usize {
        self.0.borrow().replies.len()
    }
}

pub struct Scripted {
    handle: Handle,
    session: usize,
}

impl Transport for Scripted {
    fn execute(&mut self, request: &HttpRequest) -> Result<HttpResponse, BoxError> {
        let mut script = self.handle.0.borrow_mut();
        script.sent.push(Sent {
            method: request.method,
            url: request.url.to_string(),
            query: request.query.clone(),
            form: request.form.clone(),
            session: self.session,
        });
        match script.replies.pop_front() {
            Some(Ok(res)) => Ok(res),
            Some(Err(msg)) => Err(msg.into()),
            None => Err(format!("no scripted reply for {}", request.url).into()),
        }
    }

    fn renew(&self) -> Self {
        let mut script = self.handle.0.borrow_mut();
        script.sessions += 1;
        Scripted { handle: self.handle.clone(), session: script.sessions }
    }
}

pub struct NoCredentials;

impl CredentialSource for NoCredentials {
    fn load(&self) -> Result<Credentials, CredentialsError> {
        Err(CredentialsError::NotFound)
    }
}

/// Source that always fails the same way.
pub struct Broken(pub fn() -> CredentialsError);

impl CredentialSource for Broken {
    fn load(&self) -> Result<Credentials, CredentialsError> {
        Err((self.0)())
    }
}

pub struct Fixed(pub &'static str, pub &'static str);

impl CredentialSource for Fixed {
    fn load(&self) -> Result<Credentials, CredentialsError> {
        Ok(Credentials::new(self.0, self.1))
    }
}

pub fn client() -> (Geocaching<Scripted>, Handle) {
    let handle = Handle::default();
    let transport = Scripted { handle: handle.clone(), session: 0 };
    let gc = Geocaching::with_transport(ClientOptions::default().with_base_url(BASE), transport)
        .unwrap()
        .with_credentials(NoCredentials);
    (gc, handle)
}

/* ---------------- Page fixtures ---------------- */

pub fn login_page() -> String {
    r#"<html><body>
        <form method="post" action="/login/default.aspx">
          <input type="hidden" name="__VIEWSTATE" value="vs">
          <input type="text" name="ctl00$Username">
          <input type="password" name="ctl00$Password">
          <input type="checkbox" name="ctl00$Remember">
          <input type="submit" name="ctl00$Login" value="Login">
        </form></body></html>"#
        .to_string()
}

pub fn logged_in_page(user: &str) -> String {
    format!(r#"<html><body><div class="LoggedIn">Signed in as <strong>{user}</strong></div></body></html>"#)
}

pub fn row(wp: &str) -> String {
    format!(
        r#"<tr><td><span class="cache-name">Cache {wp}</span>
            <span class="cache-details">Traditional Cache | {wp}</span>
            <span class="owner">by Someone</span></td>
            <td data-column="FavoritePoint">1</td>
            <td data-column="ContainerSize">Regular</td>
            <td data-column="Difficulty">2.5</td>
            <td data-column="Terrain">1</td>
            <td data-column="PlaceDate">2012-06-01</td></tr>"#
    )
}

pub fn pm_row(wp: &str) -> String {
    format!(
        r#"<tr><td><span class="cache-name">Premium {wp}</span>
            <span class="cache-details">Multi-cache | {wp}</span></td>
            <td data-column="FavoritePoint">7</td>
            <td class="pm-upsell">Upgrade</td></tr>"#
    )
}

pub fn first_page(rows: &[String]) -> String {
    format!(
        r#"<html><body><table><tbody id="geocaches">{}</tbody></table></body></html>"#,
        rows.concat()
    )
}

pub fn more_page(rows: &[String]) -> String {
    serde_json::json!({ "HtmlString": rows.concat() }).to_string()
}

pub fn waypoints(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{prefix}{i:03}")).collect()
}

/// Script a successful login as `user` and run it.
pub fn logged_in(user: &'static str) -> (Geocaching<Scripted>, Handle) {
    let (mut gc, h) = client();
    h.ok(&login_page()).ok(&logged_in_page(user));
    gc.login(Some(user), Some("pw")).unwrap();
    (gc, h)
}
