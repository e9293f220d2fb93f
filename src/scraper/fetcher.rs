use crate::model::{CouponMeta, FetchError};
use crate::scraper::traits::CouponFetcher;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Substring identifying the one coupon host this tool understands.
pub const COUPON_DOMAIN: &str = "mygift.tw";

/// The coupon page varies its markup for non-browser clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Recorded used-status value; the page itself never contains this exact
/// string, it is this tool's own marker.
pub const USED_VALUE: &str = "已兌換";

/// Either of these substrings in the page body means the voucher shows a
/// "used" stamp.
const USED_MARKERS: [&str; 2] = ["stamp-used", "已使用"];

/// Date printed right after the "redeemable through" label.
static EXPIRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"兌換期限\s*[:：]?\s*(\d{4}\.\d{2}\.\d{2})").unwrap());

pub fn is_coupon_url(url: &str) -> bool {
    url.contains(COUPON_DOMAIN)
}

pub struct HttpCouponFetcher {
    client: Client,
}

impl HttpCouponFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .expect("❗ Failed to create HTTP client");
        Self { client }
    }
}

#[async_trait::async_trait]
impl CouponFetcher for HttpCouponFetcher {
    async fn fetch(&self, url: &str) -> Result<Option<CouponMeta>, FetchError> {
        if !is_coupon_url(url) {
            return Ok(None);
        }

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        let body = response.text().await?;

        let meta = scan_body(&body);
        if meta.expiry.is_empty() && meta.used.is_empty() {
            // Neither probe matched a page we did receive; keep the body
            // around so the markup drift can be inspected offline.
            log_and_save_body(&body, url);
        }
        Ok(Some(meta))
    }
}

/// Runs both probes over a fetched coupon page. Empty strings are facts:
/// "no date shown" and "no used stamp".
pub fn scan_body(body: &str) -> CouponMeta {
    let expiry = EXPIRY_RE
        .captures(body)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();
    let used = if USED_MARKERS.iter().any(|marker| body.contains(marker)) {
        USED_VALUE.to_string()
    } else {
        String::new()
    };
    CouponMeta { expiry, used }
}

/// Saves an unrecognized coupon page for debugging.
fn log_and_save_body(body: &str, url: &str) {
    let folder = Path::new("logs/html");
    if let Err(e) = fs::create_dir_all(folder) {
        warn!("Failed to create debug folder: {}", e);
        return;
    }
    let slug: String = url
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(80)
        .collect();
    let filename = folder.join(format!("debug-{}.html", slug));
    if let Err(e) = fs::write(&filename, body) {
        warn!("Failed to write debug HTML: {}", e);
    } else {
        info!("Saved unrecognized coupon page: {}", filename.display());
    }
}
