/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Config file location
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024; // 10MB

// Image defaults
pub const DEFAULT_PIXEL_SIZE: i64 = 400;
pub const DEFAULT_MAX_PIXEL_SIZE: u32 = 4096;
/// Size range accepted by the link planner
pub const MIN_PLANNED_PIXEL_SIZE: i64 = 100;
pub const MAX_PLANNED_PIXEL_SIZE: i64 = 1000;

// Icon fetch defaults
pub const DEFAULT_ICON_USER_AGENT: &str = "QR Generator Bot";
pub const DEFAULT_ICON_FETCH_TIMEOUT: &str = "10s";
pub const DEFAULT_MAX_ICON_BYTES: usize = 5 * 1024 * 1024; // 5MB

// Request cache defaults
pub const DEFAULT_CACHE_SWEEP_INTERVAL: &str = "5m";
