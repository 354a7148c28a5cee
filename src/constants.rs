//! Application constants and configuration

use std::time::Duration;

pub const APP_NAME: &str = "RLMapLoader";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const HELP_URL: &str = "https://github.com/mishnea/RLMapLoader#usage";

/// Workshop item page, the item id goes in the `id` query parameter
pub const WORKSHOP_PAGE_URL: &str = "https://steamcommunity.com/sharedfiles/filedetails/";
pub const HTTP_USER_AGENT: &str = concat!("rl-map-loader/", env!("CARGO_PKG_VERSION"));
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Map files picked up from the workshop folder
pub const MAP_EXTENSION: &str = "udk";
/// The map slot that gets replaced when a workshop map is activated
pub const ACTIVE_MAP_FILENAME: &str = "Labs_Underpass_P.upk";
pub const MODS_DIR_NAME: &str = "mods";
pub const COOKED_DIR_NAME: &str = "CookedPCConsole";

/// Scanned in this order; matching is case-sensitive
pub const PREVIEW_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];
/// Bounding box for preview images (width, height)
pub const PREVIEW_SIZE: (u32, u32) = (240, 158);
pub const PLACEHOLDER_TEXT: &str = "No preview";
/// Optional user-supplied placeholder in the data dir
pub const PLACEHOLDER_FILENAME: &str = "default.png";

pub const SELECTION_POLL_INTERVAL: Duration = Duration::from_millis(100);

// Defaults written on first run
pub const DEFAULT_WORKSHOP_DIR: &str =
    "C:/Program Files (x86)/Steam/steamapps/workshop/content/252950";
pub const DEFAULT_MODS_DIR: &str =
    "C:/Program Files (x86)/Steam/steamapps/common/rocketleague/TAGame/CookedPCConsole/mods";
pub const DEFAULT_EG_MODS_DIR: &str =
    "C:/Program Files/Epic Games/rocketleague/TAGame/CookedPCConsole/mods";
