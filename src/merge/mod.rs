//! Combines yearly news-export CSVs into one file: concatenate in priority
//! order, deduplicate by URL (first occurrence wins), sort by detected date
//! descending.

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use tracing::info;

use crate::config::MergeConfig;
use crate::table::Table;

/// Date formats accepted in the sort column. Anything else is a hard stop
/// for the whole run, not a per-row skip.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

fn parse_sort_date(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(d.and_hms_opt(0, 0, 0).unwrap());
        }
    }
    bail!("unparseable date `{}` in sort column", value)
}

/// Merge tables sharing one schema: concatenate in the given order,
/// deduplicate on `dedup_key` keeping the earliest occurrence, then sort by
/// `sort_key` parsed as a date, most recent first.
///
/// An empty or missing key cell is a valid, distinct key: the first row
/// carrying it survives and later ones are dropped like any other duplicate.
/// The caller's input order is the priority order, so the most recent export
/// should come first.
pub fn merge_tables(tables: &[Table], dedup_key: &str, sort_key: &str) -> Result<Table> {
    let headers = match tables.first() {
        Some(t) => t.headers.clone(),
        None => return Ok(Table::new(Vec::new())),
    };
    let mut merged = Table::new(headers);
    let dedup_idx = merged.column_index(dedup_key)?;
    let sort_idx = merged.column_index(sort_key)?;

    let mut seen: HashSet<String> = HashSet::new();
    for table in tables {
        for row in &table.rows {
            let key = merged.cell(row, dedup_idx);
            if seen.insert(key.to_string()) {
                merged.rows.push(row.clone());
            }
        }
    }

    let mut dated: Vec<(NaiveDateTime, Vec<String>)> = Vec::with_capacity(merged.rows.len());
    for row in merged.rows.drain(..) {
        let cell = row.get(sort_idx).map(String::as_str).unwrap_or("");
        let date = parse_sort_date(cell)
            .with_context(|| format!("parsing `{}` column", sort_key))?;
        dated.push((date, row));
    }
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    merged.rows = dated.into_iter().map(|(_, row)| row).collect();

    Ok(merged)
}

/// Run the merger end to end: read every configured input in order, merge,
/// write the combined file, and log the record count.
pub fn run(cfg: &MergeConfig) -> Result<()> {
    let mut tables = Vec::with_capacity(cfg.inputs.len());
    for path in &cfg.inputs {
        let table = Table::read_csv(path)
            .with_context(|| format!("reading input file `{}`", path.display()))?;
        info!(path = %path.display(), rows = table.len(), "loaded input");
        tables.push(table);
    }

    let total: usize = tables.iter().map(Table::len).sum();
    let merged = merge_tables(&tables, &cfg.dedup_key, &cfg.sort_key)?;
    merged
        .write_csv(&cfg.output)
        .with_context(|| format!("writing merged file `{}`", cfg.output.display()))?;

    info!(
        output = %cfg.output.display(),
        combined = total,
        deduplicated = merged.len(),
        "merged input files"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MergeConfig;
    use std::io::Write;
    use tempfile::tempdir;

    fn table(rows: &[(&str, &str)]) -> Table {
        let mut t = Table::new(vec![
            "url".to_string(),
            "google_detected_date".to_string(),
        ]);
        for (url, date) in rows {
            t.rows.push(vec![url.to_string(), date.to_string()]);
        }
        t
    }

    #[test]
    fn first_occurrence_wins_across_inputs() -> Result<()> {
        let newer = table(&[("https://a.example", "2023-03-01")]);
        let older = table(&[
            ("https://a.example", "2022-03-01"),
            ("https://b.example", "2022-01-01"),
        ]);
        let merged = merge_tables(&[newer, older], "url", "google_detected_date")?;
        assert_eq!(merged.len(), 2);
        let a = merged
            .rows
            .iter()
            .find(|r| r[0] == "https://a.example")
            .unwrap();
        assert_eq!(a[1], "2023-03-01");
        Ok(())
    }

    #[test]
    fn dedup_is_idempotent() -> Result<()> {
        let t = table(&[
            ("https://a.example", "2023-03-01"),
            ("https://b.example", "2023-01-01"),
        ]);
        let once = merge_tables(&[t.clone()], "url", "google_detected_date")?;
        let twice = merge_tables(&[t.clone(), t], "url", "google_detected_date")?;
        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn output_is_sorted_descending_by_date() -> Result<()> {
        let t = table(&[
            ("https://a.example", "2021-06-15"),
            ("https://b.example", "2023-02-28"),
            ("https://c.example", "2022-12-31"),
        ]);
        let merged = merge_tables(&[t], "url", "google_detected_date")?;
        let dates: Vec<NaiveDateTime> = merged
            .rows
            .iter()
            .map(|r| parse_sort_date(&r[1]))
            .collect::<Result<_>>()?;
        for pair in dates.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        assert_eq!(merged.rows[0][0], "https://b.example");
        Ok(())
    }

    #[test]
    fn empty_key_is_a_distinct_key_not_always_kept() -> Result<()> {
        let t = table(&[
            ("", "2023-01-02"),
            ("", "2023-01-01"),
            ("https://a.example", "2023-01-03"),
        ]);
        let merged = merge_tables(&[t], "url", "google_detected_date")?;
        assert_eq!(merged.len(), 2);
        let empties: Vec<_> = merged.rows.iter().filter(|r| r[0].is_empty()).collect();
        assert_eq!(empties.len(), 1);
        assert_eq!(empties[0][1], "2023-01-02");
        Ok(())
    }

    #[test]
    fn empty_inputs_produce_empty_output() -> Result<()> {
        let merged = merge_tables(&[], "url", "google_detected_date")?;
        assert!(merged.is_empty());

        let t = table(&[]);
        let merged = merge_tables(&[t], "url", "google_detected_date")?;
        assert!(merged.is_empty());
        Ok(())
    }

    #[test]
    fn unparseable_date_aborts_the_run() {
        let t = table(&[
            ("https://a.example", "2023-01-02"),
            ("https://b.example", "kiedyś"),
        ]);
        assert!(merge_tables(&[t], "url", "google_detected_date").is_err());
    }

    #[test]
    fn missing_key_column_is_fatal() {
        let mut t = Table::new(vec!["title".to_string()]);
        t.rows.push(vec!["artykuł".to_string()]);
        assert!(merge_tables(&[t], "url", "google_detected_date").is_err());
    }

    #[test]
    fn datetime_values_sort_within_a_day() -> Result<()> {
        let t = table(&[
            ("https://a.example", "2023-01-02 08:00:00"),
            ("https://b.example", "2023-01-02 17:30:00"),
        ]);
        let merged = merge_tables(&[t], "url", "google_detected_date")?;
        assert_eq!(merged.rows[0][0], "https://b.example");
        Ok(())
    }

    #[test]
    fn run_merges_files_end_to_end() -> Result<()> {
        let dir = tempdir()?;
        let p2023 = dir.path().join("money_pl_2023.csv");
        let p2022 = dir.path().join("money_pl_2022.csv");
        let out = dir.path().join("money_pl_combined.csv");

        let mut f = std::fs::File::create(&p2023)?;
        writeln!(f, "url,title,google_detected_date")?;
        writeln!(f, "https://a.example,Nowy,2023-05-01")?;
        let mut f = std::fs::File::create(&p2022)?;
        writeln!(f, "url,title,google_detected_date")?;
        writeln!(f, "https://a.example,Stary,2022-05-01")?;
        writeln!(f, "https://b.example,Inny,2022-06-01")?;

        let cfg = MergeConfig {
            inputs: vec![p2023, p2022],
            dedup_key: "url".to_string(),
            sort_key: "google_detected_date".to_string(),
            output: out.clone(),
        };
        run(&cfg)?;

        let merged = Table::read_csv(&out)?;
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.rows[0], vec!["https://a.example", "Nowy", "2023-05-01"]);
        assert_eq!(merged.rows[1], vec!["https://b.example", "Inny", "2022-06-01"]);
        Ok(())
    }
}
