use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name pattern of the query-result files this tool ingests.
pub const SOURCE_PREFIX: &str = "Yahoo序號連結查詢結果_";
pub const SOURCE_EXT: &str = "txt";

pub const OVERVIEW_REPORT_FILE: &str = "Telegram獎品網址整理.html";
pub const STATUS_REPORT_FILE: &str = "Telegram獎品兌換狀態.html";
pub const URL_LIST_FILE: &str = "Telegram獎品網址清單.txt";
pub const CACHE_FILE: &str = "coupon_cache.txt";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Pause after each outbound coupon request, in milliseconds.
    pub fetch_delay_ms: u64,
    /// Timeout for a single coupon-page request, in seconds.
    pub request_timeout_secs: u64,
    pub git_remote: String,
    pub git_branch: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: 500,
            request_timeout_secs: 15,
            git_remote: "origin".to_string(),
            git_branch: "main".to_string(),
        }
    }
}

/// All tunables have defaults, so a missing config file is not an error;
/// a present-but-broken one is.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Filesystem locations, all rooted at one base directory. In production the
/// base is the executable's own directory; tests construct custom instances.
#[derive(Debug, Clone)]
pub struct AppPaths {
    base_dir: PathBuf,
}

impl AppPaths {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn from_exe() -> Result<Self, ConfigError> {
        let exe = std::env::current_exe()?;
        let base = exe.parent().ok_or(ConfigError::NoBaseDir)?.to_path_buf();
        Ok(Self::new(base))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    pub fn cache_file(&self) -> PathBuf {
        self.base_dir.join(CACHE_FILE)
    }

    pub fn overview_report(&self) -> PathBuf {
        self.base_dir.join(OVERVIEW_REPORT_FILE)
    }

    pub fn status_report(&self) -> PathBuf {
        self.base_dir.join(STATUS_REPORT_FILE)
    }

    pub fn url_list(&self) -> PathBuf {
        self.base_dir.join(URL_LIST_FILE)
    }
}
