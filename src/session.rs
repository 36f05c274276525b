// src/session.rs
//! Login state machine.
//!
//! `LoggedOut` → `login` → `LoggedIn { identity }`; `logout` always goes back
//! to `LoggedOut` and swaps in a fresh transport so no cookie survives.

use crate::client::{Auth, Expect, Geocaching, RequestOptions};
use crate::config::consts::LOGIN_PAGE;
use crate::core::net::{Method, Transport};
use crate::credentials::{Credentials, CredentialsError};
use crate::error::{Error, Result};
use crate::specs::login::{assemble_form, logged_identity};

use scraper::Html;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn { identity: String },
}

impl Session {
    pub fn identity(&self) -> Option<&str> {
        match self {
            Session::LoggedIn { identity } => Some(identity),
            Session::LoggedOut => None,
        }
    }
}

fn login_failure(e: CredentialsError) -> Error {
    let msg = match e {
        CredentialsError::NotFound => {
            "Credentials file not found and no username and password is given."
        }
        CredentialsError::Malformed(_) => "Wrong format of credentials file.",
        CredentialsError::MissingFields => "Credentials file doesn't contain username and password.",
        CredentialsError::Unreadable(_) => "Credentials file reading error.",
    };
    Error::LoginFailed(s!(msg))
}

impl<T: Transport> Geocaching<T> {
    fn load_login_page(&mut self) -> Result<Html> {
        self.request(LOGIN_PAGE, Method::Get, Expect::Markup, Auth::Bypass, RequestOptions::default())?
            .into_markup()
    }

    /// Name of the user the site currently considers logged in.
    ///
    /// Reads `login_page` when given, otherwise loads the login page (allowed
    /// while logged out). Never changes the session state.
    pub fn get_logged_user(&mut self, login_page: Option<&Html>) -> Result<Option<String>> {
        logd!("Checking for already logged user.");
        match login_page {
            Some(page) => logged_identity(page),
            None => {
                let page = self.load_login_page()?;
                logged_identity(&page)
            }
        }
    }

    /// Log in as `username`, or as whoever the credential source names when
    /// either argument is missing.
    ///
    /// Logging in again as the current user is a no-op. If the site already
    /// shows someone else as logged in, that session is dropped first.
    pub fn login(&mut self, username: Option<&str>, password: Option<&str>) -> Result<()> {
        let credentials = match (username, password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Credentials::new(u, p),
            _ => self.credentials.load().map_err(login_failure)?,
        };

        if self.session.identity() == Some(credentials.username.as_str()) {
            logf!("Already logged as {}.", credentials.username);
            return Ok(());
        }

        logf!("Logging in...");
        let login_page = self.load_login_page()?;

        logd!("Checking for previous login.");
        if let Some(logged) = self.get_logged_user(Some(&login_page))? {
            if logged == credentials.username {
                logf!("Already logged as {logged}.");
                self.session = Session::LoggedIn { identity: logged };
                return Ok(());
            }
            logf!("Already logged as {logged}, but want to log in as {}.", credentials.username);
            self.logout();
        }

        logd!("Assembling POST data.");
        let post = assemble_form(&login_page, &credentials)?;

        logd!("Submitting login form.");
        let after_login = self
            .request(LOGIN_PAGE, Method::Post, Expect::Markup, Auth::Bypass, RequestOptions::form(post))?
            .into_markup()?;

        logd!("Checking the result.");
        match self.get_logged_user(Some(&after_login))? {
            Some(identity) => {
                logf!("Logged in successfully as {identity}.");
                self.session = Session::LoggedIn { identity };
                Ok(())
            }
            None => {
                self.logout();
                loge!("Login as {} rejected.", credentials.username);
                Err(Error::LoginFailed(s!(
                    "Cannot login to the site (probably wrong username or password)."
                )))
            }
        }
    }

    /// Forget the session and start over with a clean transport.
    pub fn logout(&mut self) {
        logf!("Logging out.");
        self.session = Session::LoggedOut;
        self.transport = self.transport.renew();
    }
}
