//! Normalizes the free-text `variable` labels inside the `forecasts_json`
//! column of an LLM-extraction CSV onto the canonical vocabulary, dropping
//! items nothing maps to.

pub mod label;

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::config::NormalizeConfig;
use crate::table::Table;

pub use label::{normalize_label, CanonicalLabel};

/// The canonical encoding of an empty forecast list, also used as the
/// recovery value whenever a cell cannot be parsed.
pub const EMPTY_LIST: &str = "[]";

/// Coerce a forecast item's `variable` field to the string the classifier
/// sees: strings as-is, anything else via its JSON rendering, missing as "".
fn variable_text(item: &Map<String, Value>) -> String {
    match item.get("variable") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Clean one `forecasts_json` cell: parse, classify each item's `variable`,
/// drop what cannot be classified, re-serialize.
///
/// Any parse failure (malformed JSON, or a value that is not an array) is
/// recovered as the empty list. That is a deliberate policy of this tool,
/// not incidental error swallowing: a bad cell loses its forecasts but never
/// aborts the file.
pub fn clean_forecast_list(raw_json: &str) -> String {
    let items = match serde_json::from_str::<Value>(raw_json) {
        Ok(Value::Array(items)) => items,
        _ => return EMPTY_LIST.to_string(),
    };

    let mut cleaned: Vec<Value> = Vec::with_capacity(items.len());
    for item in items {
        let obj = match item {
            Value::Object(obj) => obj,
            _ => continue,
        };
        let Some(canonical) = normalize_label(&variable_text(&obj)) else {
            continue;
        };
        let mut kept = obj;
        kept.insert(
            "variable".to_string(),
            Value::String(canonical.as_str().to_string()),
        );
        cleaned.push(Value::Object(kept));
    }

    // serde_json leaves non-ASCII unescaped, which the Polish labels need.
    serde_json::to_string(&Value::Array(cleaned)).unwrap_or_else(|_| EMPTY_LIST.to_string())
}

/// Count canonical labels across every item of every cleaned cell. Cells are
/// re-parsed rather than trusted, mirroring the file-level sanity report.
fn label_counts<'a>(cells: impl Iterator<Item = &'a str>) -> BTreeMap<CanonicalLabel, u64> {
    let mut counts = BTreeMap::new();
    for cell in cells {
        let Ok(Value::Array(items)) = serde_json::from_str::<Value>(cell) else {
            continue;
        };
        for item in items {
            let Some(Value::String(name)) = item.get("variable") else {
                continue;
            };
            match CanonicalLabel::from_canonical(name) {
                Some(label) => *counts.entry(label).or_insert(0) += 1,
                None => warn!(variable = %name, "non-canonical label in cleaned output"),
            }
        }
    }
    counts
}

/// Run the normalizer end to end: read the source CSV, clean the forecast
/// column of every row (a missing or empty cell is treated as the empty list
/// first), write the destination CSV, and log a label frequency report.
pub fn run(cfg: &NormalizeConfig) -> Result<()> {
    let mut table = Table::read_csv(&cfg.source)
        .with_context(|| format!("reading source file `{}`", cfg.source.display()))?;
    let col = table.column_index(&cfg.forecast_column)?;
    info!(
        source = %cfg.source.display(),
        rows = table.len(),
        column = %cfg.forecast_column,
        "normalizing forecast labels"
    );

    for row in &mut table.rows {
        let raw = match row.get(col) {
            Some(cell) if !cell.is_empty() => cell.as_str(),
            _ => EMPTY_LIST,
        };
        let cleaned = clean_forecast_list(raw);
        if row.len() <= col {
            row.resize(col + 1, String::new());
        }
        row[col] = cleaned;
    }

    table
        .write_csv(&cfg.dest)
        .with_context(|| format!("writing cleaned file `{}`", cfg.dest.display()))?;
    info!(dest = %cfg.dest.display(), "saved cleaned file");

    let counts = label_counts(table.rows.iter().map(|r| table.cell(r, col)));
    for (label, count) in &counts {
        info!(variable = label.as_str(), count, "variable count");
    }
    Ok(())
}
