//! Plain-text rendering of analysis records for the terminal.

use fraudlens_core::{AnalysisRecord, Label};

const PREVIEW_CHARS: usize = 48;

fn label_str(label: Label) -> &'static str {
    match label {
        Label::Fraud => "fraud",
        Label::Legit => "legit",
    }
}

fn preview(content: &str) -> String {
    let mut out: String = content.chars().take(PREVIEW_CHARS).collect();
    if content.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    out
}

/// One line per record: id, status flags, timestamp, verdicts, preview.
pub fn record_line(r: &AnalysisRecord) -> String {
    let status = match (r.verified, r.used_for_training) {
        (true, true) => "verified+consumed",
        (true, false) => "verified",
        (false, _) => "unverified",
    };
    let verdicts = r
        .verdicts
        .iter()
        .map(|v| format!("{}:{} {:.2}", v.role.as_str(), label_str(v.label), v.confidence))
        .collect::<Vec<_>>()
        .join("  ");
    format!(
        "#{:<4} {:<17} {}  {}  {}",
        r.id,
        status,
        r.timestamp.to_rfc3339(),
        verdicts,
        preview(&r.content),
    )
}
