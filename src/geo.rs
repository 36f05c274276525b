// src/geo.rs
//! Points, areas and the web-mercator map tiles used by quick search.

use std::collections::HashMap;
use std::f64::consts::PI;

use serde_json::Value;

use crate::client::{Auth, Expect, Geocaching, RequestOptions};
use crate::config::consts::{GRID_CELL_PX, MAX_ZOOM, TILE_GRID, TILE_SIZE_PX};
use crate::core::net::{Method, Transport};
use crate::error::{Error, Result};

/// Web-mercator stops being defined past this latitude.
const MAX_LATITUDE: f64 = 85.051_128_78;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Degrees and decimal minutes, space separated: `N 49 44.123 E 013 22.456`.
    /// This is the form the search endpoints take as `origin` / `inputOrigin`.
    pub fn format(&self) -> String {
        join!(
            &degrees_minutes(self.latitude, 'N', 'S', 2),
            " ",
            &degrees_minutes(self.longitude, 'E', 'W', 3),
        )
    }
}

fn degrees_minutes(value: f64, pos: char, neg: char, width: usize) -> String {
    let hemisphere = if value < 0.0 { neg } else { pos };
    // work in thousandths of a minute so rounding can't produce "60.000"
    let total = (value.abs() * 60_000.0).round() as u64;
    let degrees = total / 60_000;
    let rest = total % 60_000;
    format!("{hemisphere} {degrees:0width$} {:02}.{:03}", rest / 1000, rest % 1000)
}

/// A region the quick search can cover with tiles.
pub trait Area {
    type Tile: Tile;
    type Tiles: Iterator<Item = Self::Tile>;

    fn contains(&self, point: &Point) -> bool;

    /// Tiles covering the area at `zoom`, or at an automatically chosen zoom.
    /// Produced on demand, so a huge cover costs nothing until walked.
    fn to_tiles(&self, zoom: Option<u8>) -> Self::Tiles;
}

/// One cell of map data holding a list of blocks.
pub trait Tile {
    fn blocks<T: Transport>(&self, client: &mut Geocaching<T>) -> Result<Vec<Block>>;
}

/// One listing's compact entry inside a tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub waypoint: String,
    pub name: String,
    pub location: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    south_west: Point,
    north_east: Point,
}

impl Rectangle {
    /// Any two opposite corners.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            south_west: Point::new(a.latitude.min(b.latitude), a.longitude.min(b.longitude)),
            north_east: Point::new(a.latitude.max(b.latitude), a.longitude.max(b.longitude)),
        }
    }

    /// Deepest zoom at which the whole rectangle still sits in one tile.
    pub fn fitting_zoom(&self) -> u8 {
        (0..=MAX_ZOOM)
            .rev()
            .find(|&z| MapTile::containing(&self.south_west, z) == MapTile::containing(&self.north_east, z))
            .unwrap_or(0)
    }
}

impl Area for Rectangle {
    type Tile = MapTile;
    type Tiles = TileRange;

    fn contains(&self, point: &Point) -> bool {
        (self.south_west.latitude..=self.north_east.latitude).contains(&point.latitude)
            && (self.south_west.longitude..=self.north_east.longitude).contains(&point.longitude)
    }

    fn to_tiles(&self, zoom: Option<u8>) -> TileRange {
        let z = zoom.unwrap_or_else(|| self.fitting_zoom()).min(MAX_ZOOM);
        let north_west = MapTile::containing(&Point::new(self.north_east.latitude, self.south_west.longitude), z);
        let south_east = MapTile::containing(&Point::new(self.south_west.latitude, self.north_east.longitude), z);
        TileRange {
            west: north_west.x,
            east: south_east.x,
            south: south_east.y,
            next: Some((north_west.x, north_west.y)),
            z,
        }
    }
}

/// Block of tiles walked row by row, north row first.
#[derive(Clone, Debug)]
pub struct TileRange {
    west: u32,
    east: u32,
    south: u32,
    next: Option<(u32, u32)>,
    z: u8,
}

impl TileRange {
    fn remaining(&self) -> u64 {
        let Some((x, y)) = self.next else { return 0 };
        let width = u64::from(self.east - self.west) + 1;
        let rows_below = u64::from(self.south - y);
        rows_below * width + u64::from(self.east - x) + 1
    }
}

impl Iterator for TileRange {
    type Item = MapTile;

    fn next(&mut self) -> Option<MapTile> {
        let (x, y) = self.next?;
        self.next = if x < self.east {
            Some((x + 1, y))
        } else if y < self.south {
            Some((self.west, y + 1))
        } else {
            None
        };
        Some(MapTile { x, y, z: self.z })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let exact = usize::try_from(self.remaining()).ok();
        (exact.unwrap_or(usize::MAX), exact)
    }
}

/// Slippy-map tile address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MapTile {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl MapTile {
    pub fn containing(point: &Point, z: u8) -> Self {
        let n = f64::from(1u32 << z);
        let lat = point.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let fx = (point.longitude + 180.0) / 360.0 * n;
        let fy = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * n;
        let max = (1u32 << z) - 1;
        Self {
            x: (fx.floor().max(0.0) as u32).min(max),
            y: (fy.floor().max(0.0) as u32).min(max),
            z,
        }
    }

    /// Point at a fractional offset inside this tile; (0, 0) is the north-west corner.
    pub fn point_at(&self, fx: f64, fy: f64) -> Point {
        let n = f64::from(1u32 << self.z);
        let gx = f64::from(self.x) + fx;
        let gy = f64::from(self.y) + fy;
        let longitude = gx / n * 360.0 - 180.0;
        let latitude = (PI * (1.0 - 2.0 * gy / n)).sinh().atan().to_degrees();
        Point::new(latitude, longitude)
    }

    /// Group the `data` section of a map.info grid into one block per waypoint.
    ///
    /// Keys look like `"(12, 40)"` and address 4 px cells of the 256 px tile; a
    /// listing usually spans several cells, its location is their centre.
    /// Blocks come in the grid's row-major order of their first cell.
    pub fn parse_grid(&self, grid: &Value) -> Result<Vec<Block>> {
        let Some(data) = grid.get("data").and_then(Value::as_object) else {
            return Ok(Vec::new());
        };

        let mut cells = data
            .iter()
            .map(|(key, entries)| -> Result<_> { Ok((parse_cell_key(key)?, key, entries)) })
            .collect::<Result<Vec<_>>>()?;
        cells.sort_by_key(|&((x, y), _, _)| (y, x));

        let mut order: Vec<(String, String, Vec<(f64, f64)>)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for ((x, y), key, entries) in cells {
            let cell = (f64::from(x), f64::from(y));
            let entries = entries
                .as_array()
                .ok_or_else(|| Error::parse(format!("grid cell {key} is not a list")))?;
            for entry in entries {
                let wp = entry.get("i").and_then(Value::as_str)
                    .ok_or_else(|| Error::parse(format!("grid cell {key} entry without waypoint")))?;
                let name = entry.get("n").and_then(Value::as_str).unwrap_or_default();
                let slot = *index.entry(s!(wp)).or_insert_with(|| {
                    order.push((s!(wp), s!(name), Vec::new()));
                    order.len() - 1
                });
                order[slot].2.push(cell);
            }
        }

        let cell = f64::from(GRID_CELL_PX);
        let size = f64::from(TILE_SIZE_PX);
        Ok(order
            .into_iter()
            .map(|(waypoint, name, cells)| {
                let count = cells.len() as f64;
                let (sx, sy) = cells.iter().fold((0.0, 0.0), |(ax, ay), (x, y)| (ax + x, ay + y));
                let px = (sx / count) * cell + cell / 2.0;
                let py = (sy / count) * cell + cell / 2.0;
                Block { waypoint, name, location: self.point_at(px / size, py / size) }
            })
            .collect())
    }
}

fn parse_cell_key(key: &str) -> Result<(u32, u32)> {
    let bad = || Error::parse(format!("bad grid key {key:?}"));
    let inner = key.trim().strip_prefix('(').and_then(|k| k.strip_suffix(')')).ok_or_else(bad)?;
    let (x, y) = inner.split_once(',').ok_or_else(bad)?;
    let x: u32 = x.trim().parse().map_err(|_| bad())?;
    let y: u32 = y.trim().parse().map_err(|_| bad())?;
    Ok((x, y))
}

impl Tile for MapTile {
    fn blocks<T: Transport>(&self, client: &mut Geocaching<T>) -> Result<Vec<Block>> {
        logd!("Loading tile {}/{}/{}", self.z, self.x, self.y);
        let opts = RequestOptions::default()
            .query("x", self.x)
            .query("y", self.y)
            .query("z", self.z);
        let res = client
            .request(TILE_GRID, Method::Get, Expect::Raw, Auth::Required, opts)?
            .into_raw()?;

        // tiles without listings come back with an empty body
        if res.body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let grid: Value = serde_json::from_str(&res.body).map_err(|e| Error::transport(res.url.clone(), e))?;
        self.parse_grid(&grid)
    }
}
