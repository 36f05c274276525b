// src/specs/search.rs
//! Search result pages.
//!
//! First page: full document, rows are `tr` under `#geocaches`.
//! Later pages: JSON whose `HtmlString` holds bare `<tr>` rows.
//!
//! Row shape read here:
//! - `span.cache-details` – `"<type label> | <waypoint>"`
//! - `span.cache-name`, `span.owner` (`"by <author>"`)
//! - `[data-column=FavoritePoint|ContainerSize|Difficulty|Terrain|PlaceDate]`
//! - `tr.disabled`, `td.pm-upsell`, `img[title="Found It!"]`

use std::str::FromStr;

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;

use crate::cache::{Cache, CacheType, Size};
use crate::config::consts::AUTHOR_PREFIX_LEN;
use crate::core::dates::parse_date;
use crate::core::html::{find, has, has_class, required_text, selector};
use crate::core::sanitize::skip_chars;
use crate::error::{Error, Result};

/// One page of search results, kept as parsed markup so rows can be read
/// one at a time.
pub struct ResultsPage {
    doc: Html,
    rows: Selector,
    len: usize,
}

impl ResultsPage {
    fn new(doc: Html, rows: &str) -> Result<Option<Self>> {
        let rows = selector(rows)?;
        let len = doc.select(&rows).count();
        if len == 0 {
            return Ok(None);
        }
        Ok(Some(Self { doc, rows, len }))
    }

    /// Rows of the classic search page; `None` when there is no results table.
    pub fn from_search_document(doc: Html) -> Result<Option<Self>> {
        if find(&doc, "#geocaches")?.is_none() {
            return Ok(None);
        }
        Self::new(doc, "#geocaches tr")
    }

    /// Rows from the "more results" JSON; `None` once the site runs out.
    pub fn from_more_results(json: &Value) -> Result<Option<Self>> {
        let html = json
            .get("HtmlString")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::parse("more-results response without HtmlString"))?;
        Ok(Self::from_rows_html(html))
    }

    /// Bare `<tr>` markup. Wrapped in a table so the parser keeps the rows.
    pub fn from_rows_html(html: &str) -> Option<Self> {
        let html = html.trim();
        if html.is_empty() {
            return None;
        }
        let doc = Html::parse_fragment(&join!("<table>", html, "</table>"));
        Self::new(doc, "tr").ok().flatten()
    }

    /// Number of rows; a page is never built without any.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.len
    }

    fn row(&self, index: usize) -> Option<ElementRef<'_>> {
        self.doc.select(&self.rows).nth(index)
    }

    pub fn parse_row(&self, index: usize) -> Result<Cache> {
        let row = self
            .row(index)
            .ok_or_else(|| Error::parse(format!("no result row {index}")))?;
        parse_row(row)
    }
}

fn number<N: FromStr>(raw: &str, what: &str) -> Result<N> {
    raw.trim()
        .parse()
        .map_err(|_| Error::parse(format!("{what}: not a number {raw:?}")))
}

fn column(row: ElementRef<'_>, name: &str) -> Result<String> {
    required_text(row, &format!(r#"[data-column="{name}"]"#))
}

/// Turn one result row into a cache.
///
/// Premium-only rows stop after the fields every row carries; the rest of
/// their cells are upsell placeholders.
pub fn parse_row(row: ElementRef<'_>) -> Result<Cache> {
    let details = required_text(row, "span.cache-details")?;
    let mut parts = details.split('|');
    let label = parts.next().unwrap_or_default().trim();
    let waypoint = parts
        .next()
        .map(str::trim)
        .filter(|wp| !wp.is_empty())
        .ok_or_else(|| Error::parse(format!("no waypoint in cache details {details:?}")))?;

    let mut cache = Cache::new(waypoint);
    cache.cache_type = Some(CacheType::from_label(label)?);
    cache.name = Some(required_text(row, "span.cache-name")?);
    cache.found = has(row, r#"img[title="Found It!"]"#)?;
    cache.favorites = Some(number(&column(row, "FavoritePoint")?, "favorites")?);
    cache.enabled = !has_class(row, "disabled");
    cache.pm_only = has(row, "td.pm-upsell")?;

    if cache.pm_only {
        return Ok(cache);
    }

    cache.size = Some(Size::from_label(&column(row, "ContainerSize")?)?);
    cache.difficulty = Some(number(&column(row, "Difficulty")?, "difficulty")?);
    cache.terrain = Some(number(&column(row, "Terrain")?, "terrain")?);
    let placed = column(row, "PlaceDate")?;
    cache.hidden = Some(
        parse_date(&placed).ok_or_else(|| Error::parse(format!("hidden date {placed:?}")))?,
    );
    cache.author = Some(skip_chars(&required_text(row, "span.owner")?, AUTHOR_PREFIX_LEN));

    Ok(cache)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    const ROW: &str = r#"<tr class="even">
        <td><img title="Found It!" src="f.png"></td>
        <td><span class="cache-name">Old Mill</span>
            <span class="cache-details">Traditional Cache | GC1ABCD</span>
            <span class="owner">by Mill Keeper</span></td>
        <td data-column="FavoritePoint"> 12 </td>
        <td data-column="ContainerSize">Small</td>
        <td data-column="Difficulty">1.5</td>
        <td data-column="Terrain">2</td>
        <td data-column="PlaceDate">03/15/2014</td>
    </tr>"#;

    const PM_ROW: &str = r#"<tr class="disabled">
        <td><span class="cache-name">Members Only</span>
            <span class="cache-details">Mystery Cache | GC2PM</span></td>
        <td data-column="FavoritePoint">4</td>
        <td class="pm-upsell">Premium</td>
    </tr>"#;

    #[test]
    fn full_row() {
        let page = ResultsPage::from_rows_html(ROW).unwrap();
        let c = page.parse_row(0).unwrap();
        assert_eq!(c.waypoint, "GC1ABCD");
        assert_eq!(c.cache_type, Some(CacheType::Traditional));
        assert_eq!(c.name.as_deref(), Some("Old Mill"));
        assert!(c.found);
        assert_eq!(c.favorites, Some(12));
        assert!(c.enabled);
        assert!(!c.pm_only);
        assert_eq!(c.size, Some(Size::Small));
        assert_eq!(c.difficulty, Some(1.5));
        assert_eq!(c.terrain, Some(2.0));
        assert_eq!(c.hidden, NaiveDate::from_ymd_opt(2014, 3, 15));
        assert_eq!(c.author.as_deref(), Some("Mill Keeper"));
    }

    #[test]
    fn pm_only_row_stops_early() {
        let page = ResultsPage::from_rows_html(PM_ROW).unwrap();
        let c = page.parse_row(0).unwrap();
        assert_eq!(c.waypoint, "GC2PM");
        assert!(c.pm_only);
        assert!(!c.enabled);
        assert!(!c.found);
        assert_eq!(c.favorites, Some(4));
        assert_eq!((c.size, c.difficulty, c.terrain, c.hidden, c.author), (None, None, None, None, None));
    }

    #[test]
    fn broken_rows_are_errors() {
        let no_details = ResultsPage::from_rows_html("<tr><td>nothing</td></tr>").unwrap();
        assert!(matches!(no_details.parse_row(0), Err(Error::Parse(_))));

        let bad_fav = ROW.replace("> 12 <", ">many<");
        let page = ResultsPage::from_rows_html(&bad_fav).unwrap();
        assert!(matches!(page.parse_row(0), Err(Error::Parse(_))));
    }

    #[test]
    fn first_page_reads_results_table() {
        let doc = Html::parse_document(&format!(
            r#"<html><body><table><thead><tr><th>h</th></tr></thead>
               <tbody id="geocaches">{ROW}{PM_ROW}</tbody></table></body></html>"#
        ));
        let page = ResultsPage::from_search_document(doc).unwrap().unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page.parse_row(1).unwrap().waypoint, "GC2PM");
    }

    #[test]
    fn missing_results_table_is_no_page() {
        let doc = Html::parse_document("<html><body><p>No results</p></body></html>");
        assert!(ResultsPage::from_search_document(doc).unwrap().is_none());
    }

    #[test]
    fn more_results_payload() {
        let page = ResultsPage::from_more_results(&json!({ "HtmlString": format!("  {ROW}  ") }))
            .unwrap()
            .unwrap();
        assert_eq!(page.len(), 1);
        assert!(ResultsPage::from_more_results(&json!({ "HtmlString": "  " })).unwrap().is_none());
        assert!(ResultsPage::from_more_results(&json!({})).is_err());
    }
}
