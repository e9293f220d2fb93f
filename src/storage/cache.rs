use crate::model::{CacheError, CouponMeta};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::warn;

/// Durable URL to (expiry, used) mapping backed by a tab-separated text file:
/// `url\texpiry[\tused]`, the used field omitted when empty.
///
/// Loading never fails: a missing or unreadable file is an empty cache, and
/// malformed lines are skipped. Corrupt state can only cost refetches.
pub struct UrlCache {
    path: PathBuf,
    entries: BTreeMap<String, CouponMeta>,
    dirty: bool,
}

impl UrlCache {
    /// `force_refresh` skips the file entirely: the mapping starts empty and
    /// already counts as changed, so the end-of-run save rebuilds the file
    /// from whatever this batch visits.
    pub fn load(path: PathBuf, force_refresh: bool) -> Self {
        if force_refresh {
            return Self {
                path,
                entries: BTreeMap::new(),
                dirty: true,
            };
        }
        let entries = match fs::read_to_string(&path) {
            Ok(content) => parse_cache(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Cache read failed ({}), starting empty: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self {
            path,
            entries,
            dirty: false,
        }
    }

    pub fn get(&self, url: &str) -> Option<&CouponMeta> {
        self.entries.get(url)
    }

    /// Re-inserting an identical value does not mark the cache dirty, so an
    /// unchanged batch skips the save.
    pub fn insert(&mut self, url: &str, meta: CouponMeta) {
        if self.entries.get(url) == Some(&meta) {
            return;
        }
        self.entries.insert(url.to_string(), meta);
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whole-file overwrite, one line per URL, sorted by URL. Returns whether
    /// a write actually happened.
    pub fn persist_if_dirty(&mut self) -> Result<bool, CacheError> {
        if !self.dirty {
            return Ok(false);
        }
        fs::write(&self.path, serialize_cache(&self.entries))?;
        self.dirty = false;
        Ok(true)
    }
}

fn parse_cache(content: &str) -> BTreeMap<String, CouponMeta> {
    let mut entries = BTreeMap::new();
    for line in content.lines() {
        let Some((url, rest)) = line.split_once('\t') else {
            continue;
        };
        let (expiry, used) = match rest.split_once('\t') {
            Some((expiry, used)) => (expiry, used),
            None => (rest, ""),
        };
        entries.insert(
            url.to_string(),
            CouponMeta {
                expiry: expiry.to_string(),
                used: used.to_string(),
            },
        );
    }
    entries
}

fn serialize_cache(entries: &BTreeMap<String, CouponMeta>) -> String {
    let mut out = String::new();
    for (url, meta) in entries {
        out.push_str(url);
        out.push('\t');
        out.push_str(&meta.expiry);
        if !meta.used.is_empty() {
            out.push('\t');
            out.push_str(&meta.used);
        }
        out.push('\n');
    }
    out
}
