use crate::model::{FlatEntry, SourceRecord};
use std::collections::{HashMap, HashSet};

/// Sorts after every real `YYYY.MM.DD` date, so undated vouchers land at the
/// back of their group.
const FAR_EXPIRY: &str = "9999.99.99";

/// Flattens all records into one list, keeping the first occurrence of each
/// link. The first file's send date travels with the entry.
pub fn dedup_by_url(records: &[SourceRecord]) -> Vec<FlatEntry> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut flat = Vec::new();
    for record in records {
        for prize in &record.prizes {
            if seen.insert(prize.link.as_str()) {
                flat.push(FlatEntry {
                    send_date: record.send_date.clone().unwrap_or_default(),
                    prize: prize.clone(),
                });
            }
        }
    }
    flat
}

/// Groups entries by exact title, orders each group by expiry ascending, then
/// orders the groups by their nearest member expiry. Both sorts are stable,
/// so ties keep first-encountered order.
pub fn arrange(entries: Vec<FlatEntry>) -> Vec<FlatEntry> {
    let mut groups: Vec<Vec<FlatEntry>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for entry in entries {
        match index.get(&entry.prize.title) {
            Some(&i) => groups[i].push(entry),
            None => {
                index.insert(entry.prize.title.clone(), groups.len());
                groups.push(vec![entry]);
            }
        }
    }

    for group in groups.iter_mut() {
        group.sort_by(|a, b| expiry_key(a).cmp(expiry_key(b)));
    }
    // After the member sort each group's first entry carries its minimum.
    groups.sort_by(|a, b| expiry_key(&a[0]).cmp(expiry_key(&b[0])));

    groups.into_iter().flatten().collect()
}

/// Splits into (still available, already used). Each half is meant to be
/// arranged independently afterwards.
pub fn partition_by_used(entries: &[FlatEntry]) -> (Vec<FlatEntry>, Vec<FlatEntry>) {
    let (used, available): (Vec<_>, Vec<_>) =
        entries.iter().cloned().partition(|e| e.prize.is_used());
    (available, used)
}

fn expiry_key(entry: &FlatEntry) -> &str {
    match entry.prize.expiry.as_deref() {
        Some(e) if !e.is_empty() => e,
        _ => FAR_EXPIRY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrizeEntry;

    fn entry(title: &str, expiry: Option<&str>, link: &str) -> FlatEntry {
        FlatEntry {
            send_date: "2025-05-01".into(),
            prize: PrizeEntry {
                num: "1".into(),
                profile: "1".into(),
                title: title.into(),
                time: "10:00".into(),
                link: link.into(),
                expiry: expiry.map(str::to_string),
                used: Some(String::new()),
            },
        }
    }

    fn used_entry(title: &str, expiry: Option<&str>, link: &str) -> FlatEntry {
        let mut e = entry(title, expiry, link);
        e.prize.used = Some("已兌換".into());
        e
    }

    fn record(file: &str, send_date: Option<&str>, links: &[&str]) -> SourceRecord {
        SourceRecord {
            file: file.into(),
            send_date: send_date.map(str::to_string),
            prizes: links
                .iter()
                .map(|link| entry("咖啡券", None, link).prize)
                .collect(),
        }
    }

    #[test]
    fn nearest_group_first_and_undated_last_within_group() {
        let arranged = arrange(vec![
            entry("A", Some("2025.01.01"), "https://mygift.tw/1"),
            entry("A", None, "https://mygift.tw/2"),
            entry("B", Some("2024.06.01"), "https://mygift.tw/3"),
        ]);

        let order: Vec<(&str, &str)> = arranged
            .iter()
            .map(|e| (e.prize.title.as_str(), e.prize.link.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("B", "https://mygift.tw/3"),
                ("A", "https://mygift.tw/1"),
                ("A", "https://mygift.tw/2"),
            ]
        );
    }

    #[test]
    fn empty_expiry_sorts_like_missing() {
        let arranged = arrange(vec![
            entry("A", Some(""), "https://mygift.tw/1"),
            entry("A", Some("2030.12.31"), "https://mygift.tw/2"),
        ]);
        assert_eq!(arranged[0].prize.link, "https://mygift.tw/2");
    }

    #[test]
    fn interleaved_titles_regroup_contiguously() {
        let arranged = arrange(vec![
            entry("A", Some("2025.03.01"), "https://mygift.tw/1"),
            entry("B", Some("2025.03.01"), "https://mygift.tw/2"),
            entry("A", Some("2025.02.01"), "https://mygift.tw/3"),
        ]);

        let titles: Vec<&str> = arranged.iter().map(|e| e.prize.title.as_str()).collect();
        // Group A wins the tie on its 2025.02.01 member and stays contiguous.
        assert_eq!(titles, vec!["A", "A", "B"]);
        assert_eq!(arranged[0].prize.link, "https://mygift.tw/3");
    }

    #[test]
    fn tied_groups_keep_encounter_order() {
        let arranged = arrange(vec![
            entry("甲", Some("2025.05.05"), "https://mygift.tw/1"),
            entry("乙", Some("2025.05.05"), "https://mygift.tw/2"),
        ]);
        assert_eq!(arranged[0].prize.title, "甲");
        assert_eq!(arranged[1].prize.title, "乙");
    }

    #[test]
    fn dedup_keeps_first_file_and_send_date() {
        let records = vec![
            record("a.txt", Some("2025-04-01"), &["https://mygift.tw/x", "https://mygift.tw/y"]),
            record("b.txt", Some("2025-04-02"), &["https://mygift.tw/x", "https://mygift.tw/z"]),
        ];

        let flat = dedup_by_url(&records);

        let links: Vec<&str> = flat.iter().map(|e| e.prize.link.as_str()).collect();
        assert_eq!(
            links,
            vec!["https://mygift.tw/x", "https://mygift.tw/y", "https://mygift.tw/z"]
        );
        assert_eq!(flat[0].send_date, "2025-04-01");
    }

    #[test]
    fn missing_send_date_flattens_to_empty() {
        let records = vec![record("a.txt", None, &["https://mygift.tw/x"])];
        let flat = dedup_by_url(&records);
        assert_eq!(flat[0].send_date, "");
    }

    #[test]
    fn partition_splits_on_used_stamp() {
        let entries = vec![
            used_entry("A", Some("2025.01.01"), "https://mygift.tw/1"),
            entry("B", Some("2025.02.01"), "https://mygift.tw/2"),
        ];

        let (available, used) = partition_by_used(&entries);

        assert_eq!(available.len(), 1);
        assert_eq!(available[0].prize.title, "B");
        assert_eq!(used.len(), 1);
        assert_eq!(used[0].prize.title, "A");
    }
}
