// src/scrape/search.rs
use crate::cache::Cache;
use crate::client::{Geocaching, RequestOptions};
use crate::config::consts::{ORIGIN_TREATMENT, SEARCH, SEARCH_MORE};
use crate::core::net::Transport;
use crate::error::Result;
use crate::geo::Point;
use crate::specs::search::ResultsPage;

/// Caches around a point, in the order the site lists them.
///
/// The stream ends when the site returns an empty page or `limit` rows have
/// been produced; the two are indistinguishable to the caller. After an
/// error the stream is finished.
pub struct Search<'a, T: Transport> {
    client: &'a mut Geocaching<T>,
    origin: String,
    /// Index of the first row of `page` in the whole result list.
    start_index: usize,
    remaining: Option<usize>,
    page: Option<ResultsPage>,
    row: usize,
    done: bool,
}

impl<T: Transport> Geocaching<T> {
    /// Search around `point`, producing at most `limit` caches (`None` = all).
    ///
    /// Fails with `AuthRequired` right away when logged out; nothing is
    /// loaded until the first `next()`.
    pub fn search(&mut self, point: &Point, limit: Option<usize>) -> Result<Search<'_, T>> {
        self.ensure_logged_in()?;
        logf!("Searching at {}", point.format());
        Ok(Search {
            client: self,
            origin: point.format(),
            start_index: 0,
            remaining: limit,
            page: None,
            row: 0,
            done: false,
        })
    }
}

impl<T: Transport> Search<'_, T> {
    /// Index of the next row to be produced.
    pub fn start_index(&self) -> usize {
        self.start_index + self.row
    }

    fn load_page(&mut self) -> Result<Option<ResultsPage>> {
        logd!("Loading page from start_index {}", self.start_index);

        if self.start_index == 0 {
            // the first page only exists as the full search page
            logd!("Using normal search endpoint");
            let opts = RequestOptions::default().query("origin", &self.origin);
            let doc = self.client.get_markup(SEARCH, opts)?;
            ResultsPage::from_search_document(doc)
        } else {
            logd!("Using AJAX search endpoint");
            let opts = RequestOptions::default()
                .query("inputOrigin", &self.origin)
                .query("startIndex", self.start_index)
                .query("originTreatment", ORIGIN_TREATMENT);
            let json = self.client.get_json(SEARCH_MORE, opts)?;
            ResultsPage::from_more_results(&json)
        }
    }

    fn finish<X>(&mut self, item: Option<X>) -> Option<X> {
        self.done = true;
        self.page = None;
        item
    }
}

impl<T: Transport> Iterator for Search<'_, T> {
    type Item = Result<Cache>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            if let Some(page) = &self.page {
                if self.row < page.len() {
                    if let Some(left) = self.remaining.as_mut() {
                        if *left == 0 {
                            return self.finish(None);
                        }
                        *left -= 1;
                    }

                    let parsed = page.parse_row(self.row);
                    self.row += 1;
                    return match parsed {
                        Ok(cache) => {
                            logd!("Cache parsed: {cache}");
                            Some(Ok(cache))
                        }
                        Err(e) => self.finish(Some(Err(e))),
                    };
                }

                // page used up, continue after its last row
                self.start_index += page.len();
                self.page = None;
                self.row = 0;
            }

            match self.load_page() {
                Ok(Some(page)) => self.page = Some(page),
                Ok(None) => return self.finish(None),
                Err(e) => return self.finish(Some(Err(e))),
            }
        }
    }
}
