// src/cache.rs
//! The cache entity as far as search results can fill it in.

use std::fmt;

use chrono::NaiveDate;

use crate::core::sanitize::label_key;
use crate::error::{Error, Result};
use crate::geo::{Block, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheType {
    Traditional,
    Multi,
    Mystery,
    Letterbox,
    Wherigo,
    Event,
    MegaEvent,
    GigaEvent,
    CacheInTrashOut,
    Earthcache,
    Virtual,
    Webcam,
    LostAndFound,
    CommunityCelebration,
    ProjectApe,
    GpsAdventures,
    HqCelebration,
    HqBlockParty,
    Locationless,
}

impl CacheType {
    pub fn from_label(label: &str) -> Result<Self> {
        use CacheType::*;
        let ty = match label_key(label).as_str() {
            "traditional" | "traditionalcache" => Traditional,
            "multi" | "multicache" => Multi,
            "mystery" | "mysterycache" | "unknown" | "unknowncache" => Mystery,
            "letterbox" | "letterboxhybrid" => Letterbox,
            "wherigo" | "wherigocache" => Wherigo,
            "event" | "eventcache" => Event,
            "megaevent" | "megaeventcache" => MegaEvent,
            "gigaevent" | "gigaeventcache" => GigaEvent,
            "cito" | "cacheintrashoutevent" => CacheInTrashOut,
            "earthcache" => Earthcache,
            "virtual" | "virtualcache" => Virtual,
            "webcam" | "webcamcache" => Webcam,
            "lostandfoundevent" | "lostandfound" => LostAndFound,
            "communitycelebrationevent" => CommunityCelebration,
            "projectape" | "projectapecache" => ProjectApe,
            "gpsadventuresexhibit" | "gpsadventuresmaze" => GpsAdventures,
            "geocachinghqcelebration" | "groundspeakhq" | "geocachinghq" => HqCelebration,
            "geocachinghqblockparty" | "groundspeakblockparty" => HqBlockParty,
            "locationless" | "locationlessreversecache" => Locationless,
            _ => return Err(Error::parse(format!("unknown cache type {label:?}"))),
        };
        Ok(ty)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Size {
    Micro,
    Small,
    Regular,
    Large,
    NotChosen,
    Virtual,
    Other,
}

impl Size {
    pub fn from_label(label: &str) -> Result<Self> {
        let size = match label_key(label).as_str() {
            "micro" => Size::Micro,
            "small" => Size::Small,
            "regular" | "medium" => Size::Regular,
            "large" => Size::Large,
            "notchosen" | "unknown" => Size::NotChosen,
            "virtual" => Size::Virtual,
            "other" => Size::Other,
            _ => return Err(Error::parse(format!("unknown cache size {label:?}"))),
        };
        Ok(size)
    }
}

/// A listing keyed by waypoint. Fields stay `None` until something filled them;
/// premium-only rows never get size/difficulty/terrain/hidden/author.
#[derive(Clone, Debug, PartialEq)]
pub struct Cache {
    pub waypoint: String,
    pub cache_type: Option<CacheType>,
    pub name: Option<String>,
    pub found: bool,
    pub favorites: Option<u32>,
    /// `false` when the listing is disabled.
    pub enabled: bool,
    pub pm_only: bool,
    pub size: Option<Size>,
    pub difficulty: Option<f32>,
    pub terrain: Option<f32>,
    pub hidden: Option<NaiveDate>,
    pub author: Option<String>,
    pub location: Option<Point>,
}

impl Cache {
    pub fn new(waypoint: impl Into<String>) -> Self {
        Self {
            waypoint: waypoint.into(),
            cache_type: None,
            name: None,
            found: false,
            favorites: None,
            enabled: true,
            pm_only: false,
            size: None,
            difficulty: None,
            terrain: None,
            hidden: None,
            author: None,
            location: None,
        }
    }

    /// Build from one map-tile block: waypoint, name and approximate position.
    pub fn from_block(block: &Block) -> Self {
        let mut cache = Cache::new(block.waypoint.clone());
        cache.name = Some(block.name.clone());
        cache.location = Some(block.location);
        cache
    }

    /// Flat text row for CSV output; empty cells for unknown fields.
    pub fn to_row(&self) -> Vec<String> {
        fn opt<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map(ToString::to_string).unwrap_or_default()
        }
        vec![
            self.waypoint.clone(),
            self.cache_type.map(|t| format!("{t:?}")).unwrap_or_default(),
            opt(&self.name),
            self.found.to_string(),
            opt(&self.favorites),
            self.enabled.to_string(),
            self.pm_only.to_string(),
            self.size.map(|s| format!("{s:?}")).unwrap_or_default(),
            opt(&self.difficulty),
            opt(&self.terrain),
            opt(&self.hidden),
            opt(&self.author),
            self.location.map(|p| p.format()).unwrap_or_default(),
        ]
    }
}

impl fmt::Display for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", self.waypoint, name),
            None => f.write_str(&self.waypoint),
        }
    }
}
