use crate::model::FlatEntry;

/// Dark theme shared by both reports.
const STYLE: &str = r#"        * { box-sizing: border-box; }
        body { font-family: "Microsoft JhengHei", "Segoe UI", sans-serif; margin: 20px; background: #1a1a2e; color: #eee; }
        h1 { color: #00d9ff; text-align: center; }
        h2 { color: #00d9ff; margin-top: 32px; }
        .summary { text-align: center; margin-bottom: 24px; font-size: 1.1em; color: #aaa; }
        .table-wrap { overflow-x: auto; background: #16213e; padding: 16px; border-radius: 12px; }
        table { width: 100%; border-collapse: collapse; }
        th, td { border: 1px solid #0f3460; padding: 10px; text-align: left; }
        th { background: #0f3460; color: #00d9ff; }
        tr:nth-child(even) { background: #1a1a2e; }
        a { color: #00d9ff; }
        .used { color: #888; border: 1px solid #444; border-radius: 6px; padding: 2px 8px; }"#;

const TABLE_HEADER: &str =
    "<thead><tr><th>#</th><th>標題</th><th>可用期限</th><th>發送日期</th><th>時間</th><th>Profile</th><th>連結</th></tr></thead>";

/// All deduplicated vouchers in one table.
pub fn render_overview(entries: &[FlatEntry], source_count: usize, generated_at: &str) -> String {
    let mut html = String::new();
    push_head(&mut html, "📱 發送到 Telegram 的獎品 - 網址整理");
    html.push_str("    <h1>📱 發送到 Telegram 的獎品 📱</h1>\n");
    html.push_str(&format!(
        "    <p class=\"summary\">最後更新：{generated_at}｜共 {source_count} 個查詢日、{total} 筆獎項網址</p>\n",
        total = entries.len(),
    ));
    push_table(&mut html, entries);
    html.push_str("</body>\n</html>\n");
    html
}

/// The same vouchers split into a still-redeemable and an already-used table.
pub fn render_status(available: &[FlatEntry], used: &[FlatEntry], generated_at: &str) -> String {
    let mut html = String::new();
    push_head(&mut html, "📱 Telegram 獎品兌換狀態");
    html.push_str("    <h1>📱 Telegram 獎品兌換狀態 📱</h1>\n");
    html.push_str(&format!(
        "    <p class=\"summary\">最後更新：{generated_at}｜可兌換 {} 筆、已兌換 {} 筆</p>\n",
        available.len(),
        used.len(),
    ));
    html.push_str(&format!("    <h2>🎁 可兌換（{}）</h2>\n", available.len()));
    push_table(&mut html, available);
    html.push_str(&format!("    <h2>🗑️ 已兌換（{}）</h2>\n", used.len()));
    push_table(&mut html, used);
    html.push_str("</body>\n</html>\n");
    html
}

fn push_head(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"zh-TW\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("    <title>{}</title>\n", html_escape(title)));
    html.push_str("    <style>\n");
    html.push_str(STYLE);
    html.push_str("\n    </style>\n</head>\n<body>\n");
}

fn push_table(html: &mut String, entries: &[FlatEntry]) {
    html.push_str("    <div class=\"table-wrap\">\n        <table>\n            ");
    html.push_str(TABLE_HEADER);
    html.push_str("\n            <tbody>\n");
    for (i, entry) in entries.iter().enumerate() {
        let p = &entry.prize;
        let action = if p.is_used() {
            "<span class=\"used\">已兌換</span>".to_string()
        } else {
            format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">開啟</a>",
                html_escape(&p.link)
            )
        };
        html.push_str(&format!(
            "                <tr><td>{idx}</td><td>{title}</td><td>{expiry}</td><td>{send_date}</td><td>{time}</td><td>Profile {profile}</td><td>{action}</td></tr>\n",
            idx = i + 1,
            title = html_escape(&p.title),
            expiry = html_escape(p.expiry.as_deref().unwrap_or("")),
            send_date = html_escape(&entry.send_date),
            time = html_escape(&p.time),
            profile = html_escape(&p.profile),
        ));
    }
    html.push_str("            </tbody>\n        </table>\n    </div>\n");
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrizeEntry;

    fn entry(title: &str, expiry: Option<&str>, used: &str, link: &str) -> FlatEntry {
        FlatEntry {
            send_date: "2025-05-01".into(),
            prize: PrizeEntry {
                num: "1".into(),
                profile: "2".into(),
                title: title.into(),
                time: "2025-05-01 10:00".into(),
                link: link.into(),
                expiry: expiry.map(str::to_string),
                used: Some(used.to_string()),
            },
        }
    }

    #[test]
    fn overview_is_deterministic_for_a_fixed_stamp() {
        let entries = vec![
            entry("咖啡券", Some("2025.12.31"), "", "https://mygift.tw/a"),
            entry("茶券", None, "", "https://mygift.tw/b"),
        ];
        let a = render_overview(&entries, 2, "2025-08-25 12:00");
        let b = render_overview(&entries, 2, "2025-08-25 12:00");
        assert_eq!(a, b);
    }

    #[test]
    fn summary_line_carries_counts_and_stamp() {
        let entries = vec![entry("咖啡券", Some("2025.12.31"), "", "https://mygift.tw/a")];
        let html = render_overview(&entries, 3, "2025-08-25 12:00");
        assert!(html.contains("最後更新：2025-08-25 12:00"));
        assert!(html.contains("共 3 個查詢日、1 筆獎項網址"));
    }

    #[test]
    fn used_entry_renders_badge_instead_of_link() {
        let entries = vec![entry("咖啡券", Some("2025.12.31"), "已兌換", "https://mygift.tw/a")];
        let html = render_overview(&entries, 1, "2025-08-25 12:00");
        assert!(html.contains("<span class=\"used\">已兌換</span>"));
        assert!(!html.contains("開啟"));
    }

    #[test]
    fn unknown_expiry_renders_blank_cell() {
        let entries = vec![entry("咖啡券", None, "", "https://mygift.tw/a")];
        let html = render_overview(&entries, 1, "2025-08-25 12:00");
        assert!(html.contains("<td>咖啡券</td><td></td><td>2025-05-01</td>"));
    }

    #[test]
    fn markup_in_titles_is_escaped() {
        let entries = vec![entry("<b>獎品</b> & \"quoted\"", None, "", "https://mygift.tw/a")];
        let html = render_overview(&entries, 1, "2025-08-25 12:00");
        assert!(html.contains("&lt;b&gt;獎品&lt;/b&gt; &amp; &quot;quoted&quot;"));
        assert!(!html.contains("<b>獎品</b>"));
    }

    #[test]
    fn status_report_renders_both_sections_with_counts() {
        let available = vec![entry("咖啡券", Some("2025.12.31"), "", "https://mygift.tw/a")];
        let used = vec![
            entry("茶券", Some("2025.01.01"), "已兌換", "https://mygift.tw/b"),
            entry("茶券", Some("2025.02.01"), "已兌換", "https://mygift.tw/c"),
        ];
        let html = render_status(&available, &used, "2025-08-25 12:00");
        assert!(html.contains("可兌換（1）"));
        assert!(html.contains("已兌換（2）"));
        assert!(html.contains("可兌換 1 筆、已兌換 2 筆"));
    }
}
