use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;
use tracing::debug;

/// An in-memory delimited table: one header row plus data rows, all cells
/// kept as raw strings. Rows shorter than the header are allowed; missing
/// cells read back as the empty string via [`Table::cell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Table {
            headers,
            rows: Vec::new(),
        }
    }

    /// Read a CSV file into memory. The first record is taken as the header
    /// row. Reads are flexible: a short row is kept as-is rather than
    /// rejected, so absent trailing cells behave like nulls.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("failed to open CSV file `{}`", path.display()))?;

        let headers: Vec<String> = reader
            .headers()
            .with_context(|| format!("failed to read header row of `{}`", path.display()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.with_context(|| {
                format!("failed to read record {} of `{}`", i + 1, path.display())
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(path = %path.display(), rows = rows.len(), "read CSV");
        Ok(Table { headers, rows })
    }

    /// Write the table back out as CSV, header first, no index column. Short
    /// rows are padded with empty cells so every record has the full width.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = WriterBuilder::new()
            .from_path(path)
            .with_context(|| format!("failed to create CSV file `{}`", path.display()))?;

        writer
            .write_record(&self.headers)
            .context("writing header row")?;

        let width = self.headers.len();
        for row in &self.rows {
            if row.len() >= width {
                writer.write_record(row).context("writing data row")?;
            } else {
                let padded = row
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::repeat("").take(width - row.len()));
                writer.write_record(padded).context("writing data row")?;
            }
        }

        writer
            .flush()
            .with_context(|| format!("failed to flush CSV file `{}`", path.display()))?;
        debug!(path = %path.display(), rows = self.rows.len(), "wrote CSV");
        Ok(())
    }

    /// Index of a named column, or an error if the header lacks it.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        match self.headers.iter().position(|h| h == name) {
            Some(i) => Ok(i),
            None => bail!(
                "required column `{}` not found (headers: {:?})",
                name,
                self.headers
            ),
        }
    }

    /// Cell value at (row, column index); empty string when the row is short.
    pub fn cell<'a>(&'a self, row: &'a [String], idx: usize) -> &'a str {
        row.get(idx).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
