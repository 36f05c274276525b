// src/credentials.rs
//! Where usernames and passwords come from when the caller doesn't pass them.
//!
//! The file is JSON: `{"username": "...", "password": "..."}`. It is looked up
//! in the working directory first, then in the home directory. Nothing here
//! ever writes it.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("credentials file not found in current nor home directory")]
    NotFound,

    #[error("credentials file is not valid JSON")]
    Malformed(#[source] serde_json::Error),

    #[error("credentials file lacks string fields \"username\" and \"password\"")]
    MissingFields,

    #[error("credentials file could not be read")]
    Unreadable(#[source] io::Error),
}

pub trait CredentialSource {
    fn load(&self) -> Result<Credentials, CredentialsError>;
}

/// JSON credentials file, looked up by name.
#[derive(Clone, Debug)]
pub struct CredentialsFile {
    name: PathBuf,
    cwd: PathBuf,
    home: Option<PathBuf>,
}

impl CredentialsFile {
    pub fn new(name: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            cwd: PathBuf::from("."),
            home: home_dir(),
        }
    }

    /// Search `cwd` and `home` instead of the process defaults.
    pub fn in_dirs(name: impl Into<PathBuf>, cwd: impl Into<PathBuf>, home: Option<PathBuf>) -> Self {
        Self { name: name.into(), cwd: cwd.into(), home }
    }

    fn locate(&self) -> Option<PathBuf> {
        let local = self.cwd.join(&self.name);
        if local.is_file() {
            logf!("Loading credentials file from current directory");
            return Some(local);
        }
        let home = self.home.as_ref()?.join(&self.name);
        if home.is_file() {
            logf!("Loading credentials file from home directory");
            return Some(home);
        }
        None
    }
}

impl CredentialSource for CredentialsFile {
    fn load(&self) -> Result<Credentials, CredentialsError> {
        let path = self.locate().ok_or(CredentialsError::NotFound)?;
        read_file(&path)
    }
}

fn read_file(path: &Path) -> Result<Credentials, CredentialsError> {
    let text = fs::read_to_string(path).map_err(CredentialsError::Unreadable)?;
    parse(&text)
}

fn parse(text: &str) -> Result<Credentials, CredentialsError> {
    let json: Value = serde_json::from_str(text).map_err(CredentialsError::Malformed)?;
    let field = |name: &str| json.get(name).and_then(Value::as_str).map(str::to_owned);
    match (field("username"), field("password")) {
        (Some(username), Some(password)) => Ok(Credentials { username, password }),
        _ => Err(CredentialsError::MissingFields),
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}
