// src/specs/login.rs
//! Reading the login page.
//!
//! Two things are read here and nowhere else:
//! - who is logged in (`div.LoggedIn strong`), present on every page of the site;
//! - the login form's fields, assembled into the POST body.
//!
//! The form contract is positional: the text, password and checkbox inputs
//! are taken in document order and paired with username, password and
//! "remember me". If the site ever reorders them, this pairing breaks and
//! the login is rejected; there is no fallback.

use scraper::Html;

use crate::config::consts::REMEMBER_ME;
use crate::core::html::{find, find_in, selector, text};
use crate::credentials::Credentials;
use crate::error::Result;

const LOGIN_INPUT_TYPES: &[&str] = &["text", "password", "checkbox"];
const CARRIED_INPUT_TYPES: &[&str] = &["hidden", "submit"];

/// Name of the logged-in user shown on `page`, if any.
pub fn logged_identity(page: &Html) -> Result<Option<String>> {
    let Some(marker) = find(page, "div.LoggedIn")? else {
        return Ok(None);
    };
    Ok(find_in(marker, "strong")?
        .map(text)
        .filter(|name| !name.is_empty()))
}

/// POST body for the login form on `page`.
pub fn assemble_form(page: &Html, credentials: &Credentials) -> Result<Vec<(String, String)>> {
    let inputs = selector("input")?;
    let input_type = |el: &scraper::ElementRef<'_>| {
        el.value().attr("type").map(str::to_ascii_lowercase).unwrap_or_default()
    };

    let mut post: Vec<(String, String)> = Vec::new();

    let values = [
        credentials.username.as_str(),
        credentials.password.as_str(),
        REMEMBER_ME,
    ];
    let login_fields = page
        .select(&inputs)
        .filter(|el| LOGIN_INPUT_TYPES.contains(&input_type(el).as_str()));
    for (field, value) in login_fields.zip(values) {
        if let Some(name) = field.value().attr("name") {
            set_field(&mut post, name, value);
        }
    }

    let carried = page
        .select(&inputs)
        .filter(|el| CARRIED_INPUT_TYPES.contains(&input_type(el).as_str()));
    for field in carried {
        if let Some(name) = field.value().attr("name") {
            set_field(&mut post, name, field.value().attr("value").unwrap_or_default());
        }
    }

    Ok(post)
}

/// Later fields with the same name overwrite earlier ones.
fn set_field(post: &mut Vec<(String, String)>, name: &str, value: &str) {
    match post.iter_mut().find(|(n, _)| n == name) {
        Some(slot) => slot.1 = s!(value),
        None => post.push((s!(name), s!(value))),
    }
}
