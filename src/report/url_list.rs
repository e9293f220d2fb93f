use crate::model::FlatEntry;

/// One URL per line, in the order the entries arrive (first-seen order for
/// a deduplicated list). No trailing newline.
pub fn render_url_list(entries: &[FlatEntry]) -> String {
    entries
        .iter()
        .map(|e| e.prize.link.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
