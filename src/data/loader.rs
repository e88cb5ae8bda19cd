use std::borrow::Cow;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use anyhow::{Context, Result, bail};

use super::model::{Column, Table};
use crate::error::PlotError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an instrument CSV export.
///
/// Leading lines that are blank or start with `#` are skipped; the first
/// remaining line is the header and every following line is a numeric row.
pub fn load_table(path: &Path) -> Result<Table, PlotError> {
    if !path.exists() {
        return Err(PlotError::FileNotFound(path.to_path_buf()));
    }

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == IoErrorKind::NotFound => {
            return Err(PlotError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("reading {}", path.display()))
                .into());
        }
    };

    let text = decode_text(&bytes);
    let table = parse_table(&text).with_context(|| format!("parsing {}", path.display()))?;
    log::info!("Loaded {}: {table}", path.display());
    Ok(table)
}

/// UTF-8 when valid, otherwise Windows-1252 (the usual encoding of bench
/// instrument exports carrying `°`, `µ` or `Ω`).
fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(e) => {
            log::debug!("Input is not UTF-8 ({e}); decoding as Windows-1252");
            encoding_rs::WINDOWS_1252.decode_without_bom_handling(bytes).0
        }
    }
}

// ---------------------------------------------------------------------------
// Preamble handling
// ---------------------------------------------------------------------------

/// Count the consecutive comment / blank lines at the top of `text`.
pub fn count_preamble(text: &str) -> usize {
    text.lines().take_while(|line| is_preamble(line)).count()
}

fn is_preamble(line: &str) -> bool {
    line.starts_with('#') || line.trim().is_empty()
}

/// Byte slice of `text` after its first `skip` lines.
fn strip_lines(text: &str, skip: usize) -> &str {
    let offset: usize = text.split_inclusive('\n').take(skip).map(str::len).sum();
    &text[offset..]
}

// ---------------------------------------------------------------------------
// CSV body
// ---------------------------------------------------------------------------

/// Parse the full text of an export (preamble included) into a [`Table`].
pub fn parse_table(text: &str) -> Result<Table> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let skip_rows = count_preamble(text);
    log::debug!("Skipping {skip_rows} preamble line(s)");

    let body = strip_lines(text, skip_rows);
    if body.trim().is_empty() {
        bail!("no header row found after {skip_rows} preamble line(s)");
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields but found {}",
                headers.len(),
                record.len()
            );
        }

        for (col_idx, cell) in record.iter().enumerate() {
            values[col_idx].push(parse_cell(cell, row_no, &headers[col_idx])?);
        }
    }

    let mut columns: Vec<Column> = headers
        .into_iter()
        .zip(values)
        .map(|(name, vals)| Column::new(name, vals))
        .collect();

    // a trailing delimiter on every line adds an unnamed, empty column
    while columns
        .last()
        .is_some_and(|c| c.name.is_empty() && c.values.iter().all(|v| v.is_nan()))
    {
        columns.pop();
    }

    Ok(Table::new(columns, skip_rows))
}

fn parse_cell(cell: &str, row: usize, col: &str) -> Result<f64> {
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .with_context(|| format!("Row {row}, column '{col}': '{cell}' is not a number"))
}
