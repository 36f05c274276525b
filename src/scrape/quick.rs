// src/scrape/quick.rs
use std::collections::VecDeque;

use crate::cache::Cache;
use crate::client::Geocaching;
use crate::core::net::Transport;
use crate::error::Result;
use crate::geo::{Area, Block, Tile};

/// Caches from the map tiles covering an area.
///
/// Tiles over-cover the area; with `strict` the stray caches are dropped.
/// Nothing is de-duplicated across tiles: each listing's grid data comes from
/// one tile only.
pub struct QuickSearch<'a, T: Transport, A: Area> {
    client: &'a mut Geocaching<T>,
    area: &'a A,
    strict: bool,
    tiles: A::Tiles,
    blocks: VecDeque<Block>,
    done: bool,
}

impl<T: Transport> Geocaching<T> {
    /// Search the tiles covering `area`, at `zoom` or the deepest zoom that
    /// still fits the area into one tile.
    pub fn search_quick<'a, A: Area>(
        &'a mut self,
        area: &'a A,
        strict: bool,
        zoom: Option<u8>,
    ) -> Result<QuickSearch<'a, T, A>> {
        self.ensure_logged_in()?;
        let tiles = area.to_tiles(zoom);
        logf!("Searching quick in {} tiles", tiles.size_hint().0);
        Ok(QuickSearch {
            client: self,
            area,
            strict,
            tiles,
            blocks: VecDeque::new(),
            done: false,
        })
    }
}

impl<T: Transport, A: Area> Iterator for QuickSearch<'_, T, A> {
    type Item = Result<Cache>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            while let Some(block) = self.blocks.pop_front() {
                let cache = Cache::from_block(&block);
                if self.strict && !cache.location.is_some_and(|p| self.area.contains(&p)) {
                    continue;
                }
                return Some(Ok(cache));
            }

            let Some(tile) = self.tiles.next() else {
                self.done = true;
                return None;
            };
            match tile.blocks(self.client) {
                Ok(blocks) => self.blocks = blocks.into(),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
