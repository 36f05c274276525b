// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

/// Everything a client needs to know before it talks to the site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientOptions {
    /// Origin that relative targets are resolved against.
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// File name looked up in the working directory, then the home directory.
    pub credentials_file: PathBuf,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: s!(BASE_URL),
            user_agent: s!(USER_AGENT),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            credentials_file: PathBuf::from(CREDENTIALS_FILE),
        }
    }
}

impl ClientOptions {
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = s!(url);
        self
    }

    pub fn with_user_agent(mut self, agent: &str) -> Self {
        self.user_agent = s!(agent);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials_file(mut self, name: impl Into<PathBuf>) -> Self {
        self.credentials_file = name.into();
        self
    }
}
