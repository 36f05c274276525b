// src/specs/mod.rs
//! # Page specs
//!
//! Everything that knows what the site's markup looks like lives here, one
//! module per page:
//! - `login` – logged-in marker and login form fields;
//! - `search` – result rows of the search page and its "more results" payload.
//!
//! Specs only read. They don't fetch, don't hold session state and don't
//! decide when to stop paging; `session.rs` and `scrape/` do that. When the
//! site changes its markup, the fix belongs in this module and nowhere else.
//!
//! Missing elements and unparsable values are returned as `Error::Parse`
//! rather than skipped: a row we can't read means the page shape changed.
pub mod login;
pub mod search;
