//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default API root of the comments backend
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

/// Environment variable overriding the configured API root
pub const API_BASE_ENV: &str = "THREADVIEW_API_BASE";

/// Default cap on rendered search results
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Minimum trimmed query length, in characters, before a search is sent
pub const MIN_SEARCH_CHARS: usize = 3;

/// How long the "created" confirmation stays visible
pub const DEFAULT_CONFIRMATION_MS: u64 = 2000;

/// Client-side request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// chrono format used for comment timestamps
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Config directory name under the home directory
pub const CONFIG_DIR: &str = ".threadview";

/// Config file name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.yaml";

/// Log file written next to the working directory
pub const LOG_FILE: &str = "threadview.log";

/// Application name
pub const APP_NAME: &str = "threadview";
