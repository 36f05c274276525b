// src/lib.rs
//! Client for geocaching.com, which has no public API: log in through the
//! HTML form, then stream search results parsed out of the pages.

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;
pub mod specs;

pub mod cache;
pub mod client;
pub mod credentials;
pub mod csv;
pub mod geo;
pub mod scrape;
pub mod session;
pub mod trackable;

#[cfg(feature = "cli")]
pub mod cli;

pub use cache::{Cache, CacheType, Size};
pub use client::{Auth, Expect, Geocaching, Payload, RequestOptions};
pub use config::ClientOptions;
pub use credentials::{CredentialSource, Credentials, CredentialsError, CredentialsFile};
pub use error::{Error, Result};
pub use geo::{Area, Block, MapTile, Point, Rectangle, Tile, TileRange};
pub use scrape::{QuickSearch, Search};
pub use session::Session;
pub use trackable::Trackable;
