//! Application configuration. Paths, simulated latency, attachment limits.

use serde::Deserialize;
use std::path::PathBuf;

/// Environment prefix: `RAIL_COMPLAINTS_DATA_DIR`, `RAIL_COMPLAINTS_LATENCY_MS`, ...
pub const ENV_PREFIX: &str = "RAIL_COMPLAINTS";

/// Default per-file attachment ceiling in megabytes.
pub const DEFAULT_MAX_ATTACHMENT_MB: u64 = 50;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Directory holding the session file. Read from RAIL_COMPLAINTS_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Session file name inside `data_dir`. Read from RAIL_COMPLAINTS_SESSION_FILE.
    #[serde(default)]
    pub session_file: Option<String>,

    /// Simulated repository round-trip in ms (default 0). Read from RAIL_COMPLAINTS_LATENCY_MS.
    #[serde(default)]
    pub latency_ms: Option<u64>,

    /// Per-file attachment ceiling in MB (default 50). Read from RAIL_COMPLAINTS_MAX_ATTACHMENT_MB.
    #[serde(default)]
    pub max_attachment_mb: Option<u64>,

    /// Print the startup banner (default true). Read from RAIL_COMPLAINTS_SHOW_BANNER.
    #[serde(default)]
    pub show_banner: Option<bool>,
}

impl AppConfig {
    /// Environment (after `.env`) plus an optional file named by RAIL_COMPLAINTS_CONFIG.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var(format!("{ENV_PREFIX}_CONFIG")) {
            c = c.add_source(config::File::with_name(&path));
        }
        c = c.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));
        c.build()?.try_deserialize()
    }

    pub fn data_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or("./data"))
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir_or_default()
            .join(self.session_file.as_deref().unwrap_or("session.json"))
    }

    pub fn latency_ms_or_default(&self) -> u64 {
        self.latency_ms.unwrap_or(0)
    }

    pub fn max_attachment_bytes(&self) -> u64 {
        self.max_attachment_mb
            .unwrap_or(DEFAULT_MAX_ATTACHMENT_MB)
            .saturating_mul(1024 * 1024)
    }

    pub fn show_banner_or_default(&self) -> bool {
        self.show_banner.unwrap_or(true)
    }
}
