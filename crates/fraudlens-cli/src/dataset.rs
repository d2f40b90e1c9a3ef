//! Labelled datasets for the initial model fit.
//!
//! `init` can read a `text,label` CSV or fall back to a small built-in
//! starter set, enough to get all three predictors past their trained
//! threshold so serving works before any feedback exists.

use std::fs;
use std::path::Path;

use anyhow::{Context, bail};

use fraudlens_core::Label;

const STARTER: &[(&str, Label)] = &[
    (
        "congratulations you have won a free prize claim now",
        Label::Fraud,
    ),
    (
        "urgent your account is suspended verify your password here",
        Label::Fraud,
    ),
    (
        "you are selected for a cash reward send your bank details",
        Label::Fraud,
    ),
    ("final notice pay the transfer fee to release funds", Label::Fraud),
    ("click this link to claim your lottery winnings today", Label::Fraud),
    ("free gift card waiting act now before it expires", Label::Fraud),
    ("are we still on for lunch tomorrow", Label::Legit),
    ("the meeting moved to three can you make it", Label::Legit),
    ("thanks for the report i will review it tonight", Label::Legit),
    ("can you pick up milk on the way home", Label::Legit),
    ("happy birthday hope you have a great day", Label::Legit),
    ("the invoice for march is attached let me know", Label::Legit),
];

/// Built-in starter set used when `init` runs without `--data`.
pub fn starter_set() -> Vec<(String, Label)> {
    STARTER
        .iter()
        .map(|(text, label)| ((*text).to_string(), *label))
        .collect()
}

/// Load a labelled dataset from a `text,label` CSV.
///
/// The label is the last comma-separated field of each line (`0` legit,
/// `1` fraud), so message text may itself contain commas. Blank lines and
/// a leading `text,label` header row are skipped.
pub fn load_csv(path: &Path) -> anyhow::Result<Vec<(String, Label)>> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading dataset {}", path.display()))?;

    let mut data = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || (idx == 0 && line.eq_ignore_ascii_case("text,label")) {
            continue;
        }
        let Some((text, label)) = line.rsplit_once(',') else {
            bail!("line {}: expected `text,label`", idx + 1);
        };
        let value: i64 = label
            .trim()
            .parse()
            .with_context(|| format!("line {}: label is not an integer", idx + 1))?;
        let label =
            Label::from_i64(value).with_context(|| format!("line {}: bad label", idx + 1))?;
        let text = text.trim();
        if text.is_empty() {
            bail!("line {}: empty message text", idx + 1);
        }
        data.push((text.to_string(), label));
    }

    if data.is_empty() {
        bail!("dataset {} contains no examples", path.display());
    }
    Ok(data)
}
