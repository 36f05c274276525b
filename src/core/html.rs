// src/core/html.rs
//! Small helpers over `scraper` so page specs read like queries.

use scraper::{ElementRef, Html, Selector};

use crate::core::sanitize::normalize_ws;
use crate::error::{Error, Result};

pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::parse(format!("bad selector {css:?}: {e}")))
}

/// First match of `css` anywhere in the document.
pub fn find<'a>(doc: &'a Html, css: &str) -> Result<Option<ElementRef<'a>>> {
    Ok(doc.select(&selector(css)?).next())
}

/// First match of `css` under `el`.
pub fn find_in<'a>(el: ElementRef<'a>, css: &str) -> Result<Option<ElementRef<'a>>> {
    Ok(el.select(&selector(css)?).next())
}

pub fn has(el: ElementRef<'_>, css: &str) -> Result<bool> {
    Ok(find_in(el, css)?.is_some())
}

/// Whitespace-normalized text of an element.
pub fn text(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// Text of the first `css` match under `el`; a missing element is a parse error.
pub fn required_text(el: ElementRef<'_>, css: &str) -> Result<String> {
    find_in(el, css)?
        .map(text)
        .ok_or_else(|| Error::parse(format!("element {css:?} not found")))
}

pub fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}
