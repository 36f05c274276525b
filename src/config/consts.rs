// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://www.geocaching.com";
pub const USER_AGENT: &str = concat!("gc_scrape/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Endpoints (relative to BASE_URL unless absolute)
pub const LOGIN_PAGE: &str = "login/default.aspx";
pub const SEARCH: &str = "play/search";
pub const SEARCH_MORE: &str = "play/search/more-results";
pub const TILE_GRID: &str = "https://tiles01.geocaching.com/map.info";

// Search protocol
pub const ORIGIN_TREATMENT: &str = "0";
pub const AUTHOR_PREFIX_LEN: usize = 3; // "by "

// Login form
pub const REMEMBER_ME: &str = "1";

// Local files
pub const CREDENTIALS_FILE: &str = ".gc_credentials";
pub const LOG_FILE: &str = ".store/debug.log";

// Map tiles
pub const TILE_SIZE_PX: u32 = 256;
pub const GRID_CELL_PX: u32 = 4; // map.info keys address 4x4 px cells
pub const MAX_ZOOM: u8 = 18;
