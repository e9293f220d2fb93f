mod config;
mod model;
mod parser;
mod scraper;
mod storage;
mod enricher;
mod arranger;
mod report;
mod publisher;

use arranger::{arrange, dedup_by_url, partition_by_used};
use chrono::Local;
use clap::Parser;
use config::{
    load_config, AppPaths, OVERVIEW_REPORT_FILE, SOURCE_EXT, SOURCE_PREFIX, STATUS_REPORT_FILE,
    URL_LIST_FILE,
};
use enricher::{enrich_all, EnrichOptions};
use model::SourceRecord;
use parser::PrizeBlockParser;
use scraper::HttpCouponFetcher;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use storage::UrlCache;
use tracing::{error, info, warn};

/// Collects Telegram prize links from Yahoo serial-query result files,
/// enriches them with coupon expiry and redemption status, and renders
/// the HTML overview pages plus a plain URL list.
#[derive(Debug, Parser)]
#[command(name = "prize-tracker", version, about = "Telegram 獎品網址整理")]
struct Cli {
    /// Push the regenerated artifacts to the configured git remote.
    #[arg(short = 'u', long)]
    upload: bool,
    /// Never touch the network, render from the coupon cache alone.
    #[arg(long)]
    skip_fetch: bool,
    /// Discard the coupon cache and fetch every URL again.
    #[arg(long)]
    force_refresh: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let cli = Cli::parse();

    let paths = match AppPaths::from_exe() {
        Ok(p) => p,
        Err(e) => {
            error!("Cannot resolve base directory: {}", e);
            return;
        }
    };

    let config = match load_config(&paths.config_file()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    info!("🔎 Scanning {} for query-result files...", paths.base_dir().display());
    let files = match collect_source_files(paths.base_dir()) {
        Ok(f) => f,
        Err(e) => {
            error!("Cannot read {}: {}", paths.base_dir().display(), e);
            return;
        }
    };
    info!("Found {} candidate files", files.len());

    let parser = PrizeBlockParser::new();
    let mut records: Vec<SourceRecord> = Vec::new();
    for path in &files {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                continue;
            }
        };
        if let Some(block) = parser.parse(&content) {
            let record = SourceRecord {
                file: file_name(path),
                send_date: block.send_date,
                prizes: block.prizes,
            };
            info!("📄 {}: {} prizes", record.file, record.prizes.len());
            records.push(record);
        }
    }

    // An empty report would overwrite good artifacts with nothing; stop here.
    if records.is_empty() {
        error!("No 「📱 發送到 Telegram 的獎品 📱」 section found in any file.");
        return;
    }
    let total_prizes: usize = records.iter().map(|r| r.prizes.len()).sum();
    info!("📦 {} matched sections, {} prizes total", records.len(), total_prizes);

    let mut cache = UrlCache::load(paths.cache_file(), cli.force_refresh);
    if cli.force_refresh {
        info!("♻️ Coupon cache discarded, every URL will be fetched again");
    } else {
        info!("Coupon cache loaded: {} URLs", cache.len());
    }

    let fetcher = HttpCouponFetcher::new(Duration::from_secs(config.request_timeout_secs));
    let opts = EnrichOptions {
        skip_fetch: cli.skip_fetch,
        fetch_delay: Duration::from_millis(config.fetch_delay_ms),
    };
    let stats = enrich_all(&mut records, &mut cache, &fetcher, &opts).await;
    info!(
        "Enrichment: {} cache hits, {} fetched, {} failed, {} skipped",
        stats.cache_hits, stats.fetched, stats.failures, stats.skipped
    );

    match cache.persist_if_dirty() {
        Ok(true) => info!("💾 Coupon cache saved: {} URLs", cache.len()),
        Ok(false) => {}
        Err(e) => warn!("Coupon cache save failed: {}", e),
    }

    let flat = dedup_by_url(&records);
    info!("{} unique prize links", flat.len());

    let generated_at = Local::now().format("%Y-%m-%d %H:%M").to_string();
    let overview =
        report::html::render_overview(&arrange(flat.clone()), records.len(), &generated_at);
    let (available, used) = partition_by_used(&flat);
    let status = report::html::render_status(&arrange(available), &arrange(used), &generated_at);
    let url_list = report::url_list::render_url_list(&flat);

    write_artifact(&paths.overview_report(), &overview);
    write_artifact(&paths.status_report(), &status);
    write_artifact(&paths.url_list(), &url_list);

    if cli.upload {
        info!("🚀 Uploading to GitHub...");
        let artifacts = [OVERVIEW_REPORT_FILE, STATUS_REPORT_FILE, URL_LIST_FILE];
        match publisher::publish(
            paths.base_dir(),
            &config.git_remote,
            &config.git_branch,
            &artifacts,
        )
        .await
        {
            Ok(()) => info!("✅ Upload complete!"),
            Err(e) => warn!("❌ Upload failed, push manually: {}", e),
        }
    }

    info!("Done.");
}

/// Query-result files in the base directory, sorted by filename so reruns
/// visit them in a stable order.
fn collect_source_files(base_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(base_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_source_file(path))
        .collect();
    files.sort();
    Ok(files)
}

fn is_source_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.starts_with(SOURCE_PREFIX) && path.extension().is_some_and(|ext| ext == SOURCE_EXT)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write_artifact(path: &Path, content: &str) {
    match fs::write(path, content) {
        Ok(()) => info!("📝 Wrote {}", path.display()),
        Err(e) => warn!("Failed to write {}: {}", path.display(), e),
    }
}
