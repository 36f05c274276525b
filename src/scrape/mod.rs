// src/scrape/mod.rs
//! Lazy result streams. Each `next()` loads at most one page or tile.
mod quick;
mod search;

pub use quick::QuickSearch;
pub use search::Search;
