use crate::model::SourceRecord;
use crate::scraper::CouponFetcher;
use crate::storage::UrlCache;
use std::time::Duration;
use tracing::{info, warn};

/// Knobs for one enrichment pass.
pub struct EnrichOptions {
    /// Read only from the cache, never touch the network.
    pub skip_fetch: bool,
    /// Pause after every outbound request, successful or not.
    pub fetch_delay: Duration,
}

/// Counters for the end-of-run summary.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EnrichStats {
    pub cache_hits: usize,
    pub fetched: usize,
    pub failures: usize,
    /// Entries passed over without a request: outside the voucher domain,
    /// or cache misses under skip-fetch.
    pub skipped: usize,
}

/// Annotates every prize across all records with expiry/used metadata,
/// in place. Cache hits are free; misses cost one fetch plus the rate-limit
/// delay. Fetch failures leave the entry untouched and the cache unchanged,
/// so the next run retries them.
pub async fn enrich_all(
    records: &mut [SourceRecord],
    cache: &mut UrlCache,
    fetcher: &dyn CouponFetcher,
    opts: &EnrichOptions,
) -> EnrichStats {
    let mut stats = EnrichStats::default();

    for record in records.iter_mut() {
        for prize in record.prizes.iter_mut() {
            if let Some(meta) = cache.get(&prize.link) {
                prize.expiry = Some(meta.expiry.clone());
                prize.used = Some(meta.used.clone());
                stats.cache_hits += 1;
                continue;
            }

            if opts.skip_fetch {
                prize.expiry = Some(String::new());
                prize.used = Some(String::new());
                stats.skipped += 1;
                continue;
            }

            match fetcher.fetch(&prize.link).await {
                Ok(Some(meta)) => {
                    info!("🔍 Scanned {} → expiry '{}'", prize.link, meta.expiry);
                    prize.expiry = Some(meta.expiry.clone());
                    prize.used = Some(meta.used.clone());
                    // Later duplicates of this URL in the batch now hit the cache.
                    cache.insert(&prize.link, meta);
                    stats.fetched += 1;
                    tokio::time::sleep(opts.fetch_delay).await;
                }
                Ok(None) => {
                    stats.skipped += 1;
                }
                Err(e) => {
                    warn!("⚠️ Metadata fetch failed for {}: {}", prize.link, e);
                    stats.failures += 1;
                    // The request went out even though it failed.
                    tokio::time::sleep(opts.fetch_delay).await;
                }
            }
        }
    }

    stats
}
