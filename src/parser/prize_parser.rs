// Telegram prize-section parsing
use crate::model::PrizeEntry;
use once_cell::sync::Lazy;
use regex::Regex;

pub const SECTION_MARKER: &str = "📱 發送到 Telegram 的獎品 📱";
pub const SECTION_END_MARKER: &str = "--- 批次流程結束 ---";

const SEND_DATE_LABEL: &str = "發送日期:";
const TITLE_LABEL: &str = "標題:";
const TIME_LABEL: &str = "時間:";
const LINK_LABEL: &str = "連結:";
const RULER_PREFIX: &str = "===";

/// A full item header: bracketed ordinal plus profile token on one line.
static ORDINAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\[\s*(\d+)\s*\]\s*Profile\s*(\d+)\s*$").unwrap());

/// Loose look-ahead shape that terminates the previous item: anything that
/// opens a bracketed digit.
static ITEM_START_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\[\s*\d").unwrap());

#[derive(Debug, Clone)]
pub struct ParsedBlock {
    /// `None` when no line in the section carries the send-date label;
    /// empty when the label is present without a value.
    pub send_date: Option<String>,
    pub prizes: Vec<PrizeEntry>,
}

/// Extracts the Telegram prize section from one file's text.
///
/// The item grammar is a line-state machine rather than one big regex: an
/// item starts at an ordinal line, collects its three labeled lines in fixed
/// order (blank lines in between are tolerated), and anything unexpected
/// (another ordinal, a `===` ruler, a wrong or empty label line) drops the
/// item whole and resumes scanning at the offending line.
pub struct PrizeBlockParser;

impl PrizeBlockParser {
    pub fn new() -> Self {
        Self
    }

    /// Returns `None` when the file has no prize section at all. A section
    /// with zero well-formed items still returns `Some` so callers can tell
    /// "matched but empty" from "did not match".
    pub fn parse(&self, text: &str) -> Option<ParsedBlock> {
        let start = text.find(SECTION_MARKER)?;
        let mut block = &text[start..];
        if let Some(end) = block.find(SECTION_END_MARKER) {
            block = &block[..end];
        }

        let lines: Vec<&str> = block.lines().collect();
        Some(ParsedBlock {
            send_date: extract_send_date(&lines),
            prizes: extract_prizes(&lines),
        })
    }
}

fn extract_send_date(lines: &[&str]) -> Option<String> {
    for line in lines {
        if let Some(idx) = line.find(SEND_DATE_LABEL) {
            return Some(line[idx + SEND_DATE_LABEL.len()..].trim().to_string());
        }
    }
    None
}

fn extract_prizes(lines: &[&str]) -> Vec<PrizeEntry> {
    let mut prizes = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let Some(caps) = ORDINAL_RE.captures(lines[i]) else {
            i += 1;
            continue;
        };
        match parse_item_body(lines, i + 1) {
            Some((title, time, link, next)) => {
                prizes.push(PrizeEntry {
                    num: caps[1].to_string(),
                    profile: caps[2].to_string(),
                    title,
                    time,
                    link,
                    expiry: None,
                    used: None,
                });
                i = next;
            }
            // Malformed item: skip only the ordinal line so the line that
            // broke it is re-examined (it may start the next item).
            None => i += 1,
        }
    }
    prizes
}

fn parse_item_body(lines: &[&str], mut i: usize) -> Option<(String, String, String, usize)> {
    let title = expect_label(lines, &mut i, TITLE_LABEL)?;
    let time = expect_label(lines, &mut i, TIME_LABEL)?;
    let link = expect_label(lines, &mut i, LINK_LABEL)?;
    Some((title, time, link, i))
}

/// Advances to the next non-blank line and captures `label`'s value from it.
/// Returns `None` when a structural delimiter or a different line shape is
/// hit first, or when the value is empty.
fn expect_label(lines: &[&str], i: &mut usize, label: &str) -> Option<String> {
    while *i < lines.len() {
        let line = lines[*i];
        if line.trim().is_empty() {
            *i += 1;
            continue;
        }
        if ITEM_START_RE.is_match(line) || line.starts_with(RULER_PREFIX) {
            return None;
        }
        let value = line.trim_start().strip_prefix(label)?.trim();
        *i += 1;
        if value.is_empty() {
            return None;
        }
        return Some(value.to_string());
    }
    None
}
