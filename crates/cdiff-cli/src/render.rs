use std::fmt::Write;

use colored::Colorize;
use serde_json::Value;

use cdiff_types::{record_uid, DiffReport, FieldDiff, Record};

/// Longest value shown inline before it is cut.
const MAX_VALUE_WIDTH: usize = 80;

fn record_heading(record: &Record) -> String {
    let uid = record_uid(record).unwrap_or("?");
    match record.get("title").and_then(Value::as_str) {
        Some(title) if !title.is_empty() => format!("{uid}  {title}"),
        _ => uid.to_string(),
    }
}

fn show_value(value: &Value, display: Option<&str>) -> String {
    let text = match (display, value) {
        (Some(display), _) => display.to_string(),
        (None, Value::String(s)) => format!("{s:?}"),
        (None, other) => other.to_string(),
    };
    if text.chars().count() > MAX_VALUE_WIDTH {
        let cut: String = text.chars().take(MAX_VALUE_WIDTH - 1).collect();
        format!("{cut}…")
    } else {
        text
    }
}

fn show_field(out: &mut String, label: &str, diff: &FieldDiff) {
    let _ = writeln!(
        out,
        "      {}: {} → {}",
        label.bold(),
        show_value(&diff.current, diff.current_display.as_deref()).red(),
        show_value(&diff.remote, diff.remote_display.as_deref()).green(),
    );
}

/// Human-readable report; sections without differences are omitted.
pub fn render_text(report: &DiffReport, remote_label: &str) -> String {
    let mut out = String::new();
    if report.is_empty() {
        let _ = writeln!(out, "{} No differences with {}.", "✓".green().bold(), remote_label);
        return out;
    }

    for (handle, section) in &report.sections {
        if section.is_empty() {
            continue;
        }
        let _ = writeln!(
            out,
            "{}  (+{} -{} ~{})",
            handle.bold().underline(),
            section.added.len(),
            section.removed.len(),
            section.changed.len(),
        );
        for record in &section.added {
            let _ = writeln!(out, "  {} {}", "+".green().bold(), record_heading(record));
        }
        for record in &section.removed {
            let _ = writeln!(out, "  {} {}", "-".red().bold(), record_heading(record));
        }
        for entry in section.changed.values() {
            let _ = writeln!(out, "  {} {}", "~".yellow().bold(), record_heading(&entry.current));
            for (label, diff) in &entry.field_diffs {
                show_field(&mut out, label, diff);
            }
        }
    }

    let summary = report.summary();
    let _ = writeln!(
        out,
        "\n{} added, {} removed, {} changed compared with {}.",
        summary.added, summary.removed, summary.changed, remote_label,
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdiff_engine::sample_report;
    use cdiff_types::SectionDiff;

    #[test]
    fn empty_report_message() {
        colored::control::set_override(false);
        let mut report = DiffReport::new();
        report.sections.insert("news".into(), SectionDiff::default());
        assert_eq!(render_text(&report, "Staging"), "✓ No differences with Staging.\n");
    }

    #[test]
    fn sample_rendering() {
        colored::control::set_override(false);
        let text = render_text(&sample_report("news"), "Remote");
        assert!(text.starts_with("news  (+1 -1 ~1)\n"));
        assert!(text.contains("  + sample-created-001  Sample entry (created on other env)\n"));
        assert!(text.contains("  - sample-deleted-001  Sample entry (deleted on other env)\n"));
        assert!(text.contains(
            "      body — Block 2 (image): items — Block 1 (item): heading: \"Nested item (current)\" → \"Nested item (remote)\"\n"
        ));
        assert!(text.ends_with("1 added, 1 removed, 1 changed compared with Remote.\n"));
    }

    #[test]
    fn long_values_cut() {
        let long = Value::String("x".repeat(200));
        let shown = show_value(&long, None);
        assert_eq!(shown.chars().count(), MAX_VALUE_WIDTH);
        assert!(shown.ends_with('…'));
    }

    #[test]
    fn display_label_preferred() {
        assert_eq!(show_value(&serde_json::json!([12]), Some("hero.jpg (ID: 12)")), "hero.jpg (ID: 12)");
        assert_eq!(show_value(&serde_json::json!(null), None), "null");
    }
}
