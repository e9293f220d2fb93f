// Core structs: PrizeEntry, SourceRecord, CouponMeta
use thiserror::Error;

/// One redeemable prize captured from a query-result file.
///
/// `link` is the voucher's identity: two entries with the same link are the
/// same voucher no matter which file or date produced them.
#[derive(Debug, Clone)]
pub struct PrizeEntry {
    pub num: String,
    pub profile: String,
    pub title: String,
    pub time: String,
    pub link: String,
    /// `YYYY.MM.DD` when known, empty when the page showed none,
    /// `None` until enriched.
    pub expiry: Option<String>,
    /// Non-empty marker when the voucher page carries a used stamp, empty
    /// when checked and clean, `None` until enriched.
    pub used: Option<String>,
}

impl PrizeEntry {
    pub fn is_used(&self) -> bool {
        self.used.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// The extracted section of one source file.
#[derive(Debug, Clone)]
pub struct SourceRecord {
    pub file: String,
    /// `None` when the section carries no send-date label at all.
    pub send_date: Option<String>,
    pub prizes: Vec<PrizeEntry>,
}

/// Expiry/used facts for one voucher URL, as cached and as scanned.
/// Empty strings are real facts ("page shows no date" / "not stamped"),
/// distinct from never-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponMeta {
    pub expiry: String,
    pub used: String,
}

/// A deduplicated prize carrying the send date of the file it was first
/// seen in. Working unit of the arrange and render stages; holds copies,
/// the SourceRecord stays the source of truth.
#[derive(Debug, Clone)]
pub struct FlatEntry {
    pub send_date: String,
    pub prize: PrizeEntry,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to run {cmd}: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{cmd} exited with {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("cannot resolve the executable's directory")]
    NoBaseDir,
}
