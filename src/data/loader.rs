use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{DateTime, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{columns, is_allowed_hs_code, Dataset, Transaction};
use super::filter::parse_us_date;
use super::resolve::resolve_buyer_seller;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the transaction dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the spreadsheet column names
/// * `.json`    – `[{ "Date": "01/15/2024", "HS Code": 854442, ... }, ...]`
/// * `.parquet` – one column per spreadsheet column, any scalar type
/// * `.xlsx` / `.xls` – the `Data` worksheet, header in the first row
///
/// Missing columns and malformed cells never fail the load; they become nulls.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => read_csv(path),
        "json" => read_json(path),
        "parquet" | "pq" => read_parquet(path),
        "xlsx" | "xls" => read_workbook(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    Ok(build_dataset(rows))
}

/// Like [`load_file`], but a failed load yields an empty dataset plus the
/// error text for the status bar.
pub fn load_or_empty(path: &Path) -> (Dataset, Option<String>) {
    match load_file(path) {
        Ok(dataset) => {
            log::info!("Loaded {} transactions from {}", dataset.len(), path.display());
            (dataset, None)
        }
        Err(e) => {
            log::error!("Failed to load data, continuing with an empty dataset: {e:#}");
            (Dataset::empty(), Some(format!("Error: {e:#}")))
        }
    }
}

// ---------------------------------------------------------------------------
// Raw rows: text cells keyed by spreadsheet column
// ---------------------------------------------------------------------------

/// One source row, cells in [`columns::REQUIRED`] order. Blank cells are `None`;
/// other cells keep their surrounding whitespace.
#[derive(Debug, Clone, Default)]
struct RawRow {
    cells: [Option<String>; 10],
}

impl RawRow {
    fn from_lookup<'a>(mut cell: impl FnMut(&str) -> Option<&'a str>) -> Self {
        let mut row = RawRow::default();
        for (slot, name) in row.cells.iter_mut().zip(columns::REQUIRED) {
            *slot = cell(name).and_then(clean_text);
        }
        row
    }

    fn get(&self, name: &str) -> Option<&str> {
        columns::REQUIRED
            .iter()
            .position(|c| *c == name)
            .and_then(|i| self.cells[i].as_deref())
    }
}

fn clean_text(s: &str) -> Option<String> {
    (!s.trim().is_empty()).then(|| s.to_string())
}

fn warn_missing_columns(present: impl Fn(&str) -> bool) {
    for name in columns::REQUIRED {
        if !present(name) {
            log::warn!("Column '{name}' not found; its values load as empty");
        }
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    warn_missing_columns(|name| headers.iter().any(|h| h == name));

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping unreadable CSV row {row_no}: {e}");
                continue;
            }
        };
        rows.push(RawRow::from_lookup(|name| {
            let idx = headers.iter().position(|h| h == name)?;
            record.get(idx)
        }));
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented export, as written by `df.to_json(orient='records')`.
/// Integer dates are read as epoch milliseconds, the pandas default.
fn read_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    if let Some(first) = records.first().and_then(|r| r.as_object()) {
        warn_missing_columns(|name| first.contains_key(name));
    }

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let Some(obj) = rec.as_object() else {
            log::warn!("Skipping JSON row {i}: not an object");
            continue;
        };
        let texts: Vec<Option<String>> = columns::REQUIRED
            .iter()
            .map(|name| {
                let val = obj.get(*name)?;
                if *name == columns::DATE {
                    if let Some(ms) = val.as_i64() {
                        return epoch_millis_to_text(ms);
                    }
                }
                json_to_text(val)
            })
            .collect();
        rows.push(RawRow::from_lookup(|name| {
            let idx = columns::REQUIRED.iter().position(|c| *c == name)?;
            texts[idx].as_deref()
        }));
    }
    Ok(rows)
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn epoch_millis_to_text(ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(ms).map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
}

// ---------------------------------------------------------------------------
// Excel reader
// ---------------------------------------------------------------------------

/// Worksheet holding the transactions.
const DATA_SHEET: &str = "Data";

fn read_workbook(path: &Path) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range(DATA_SHEET)
        .with_context(|| format!("reading worksheet '{DATA_SHEET}'"))?;

    let mut sheet_rows = range.rows();
    let Some(header_row) = sheet_rows.next() else {
        warn_missing_columns(|_| false);
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|c| cell_to_text(c).unwrap_or_default().trim().to_string())
        .collect();
    warn_missing_columns(|name| headers.iter().any(|h| h == name));

    let mut rows = Vec::new();
    for cells in sheet_rows {
        let texts: Vec<Option<String>> = columns::REQUIRED
            .iter()
            .map(|name| {
                let idx = headers.iter().position(|h| h == name)?;
                cells.get(idx).and_then(cell_to_text)
            })
            .collect();
        rows.push(RawRow::from_lookup(|name| {
            let idx = columns::REQUIRED.iter().position(|c| *c == name)?;
            texts[idx].as_deref()
        }));
    }
    Ok(rows)
}

/// Worksheet cell as text. Date cells become ISO dates; error cells are blank.
fn cell_to_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.date().format("%Y-%m-%d").to_string()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Every cell is rendered through Arrow's
/// display formatter and then coerced like a CSV cell.
fn read_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let schema = builder.schema().clone();
    warn_missing_columns(|name| schema.index_of(name).is_ok());
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let indices: Vec<Option<usize>> = columns::REQUIRED
            .iter()
            .map(|name| batch.schema().index_of(name).ok())
            .collect();

        for row in 0..batch.num_rows() {
            let texts: Vec<Option<String>> = indices
                .iter()
                .map(|idx| {
                    let col = batch.column((*idx)?);
                    if col.is_null(row) {
                        return None;
                    }
                    array_value_to_string(col.as_ref(), row).ok()
                })
                .collect();
            rows.push(RawRow::from_lookup(|name| {
                let idx = columns::REQUIRED.iter().position(|c| *c == name)?;
                texts[idx].as_deref()
            }));
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Coercion and validation
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct LoadStats {
    rows_read: usize,
    outside_allow_list: usize,
    bad_dates: usize,
    bad_numbers: usize,
}

fn build_dataset(rows: Vec<RawRow>) -> Dataset {
    let mut stats = LoadStats {
        rows_read: rows.len(),
        ..Default::default()
    };

    let records: Vec<Transaction> = rows
        .iter()
        .filter_map(|raw| {
            let hs_code = raw.get(columns::HS_CODE).map(normalize_code).unwrap_or_default();
            if !is_allowed_hs_code(&hs_code) {
                stats.outside_allow_list += 1;
                return None;
            }
            Some(build_transaction(raw, hs_code, &mut stats))
        })
        .collect();

    log::info!(
        "Read {} rows, kept {}, dropped {} outside the HS code allow-list",
        stats.rows_read,
        records.len(),
        stats.outside_allow_list
    );
    if stats.bad_dates > 0 || stats.bad_numbers > 0 {
        log::debug!(
            "{} unparseable dates and {} unparseable numbers set to null",
            stats.bad_dates,
            stats.bad_numbers
        );
    }

    Dataset::from_records(records)
}

fn build_transaction(raw: &RawRow, hs_code: String, stats: &mut LoadStats) -> Transaction {
    let text = |name: &str| raw.get(name).map(|s| s.trim().to_string());
    let mut number = |name: &str| {
        let cell = raw.get(name)?;
        let parsed = parse_number(cell);
        if parsed.is_none() {
            stats.bad_numbers += 1;
        }
        parsed
    };
    let metric_tons = number(columns::METRIC_TONS);
    let total_value = number(columns::TOTAL_VALUE);
    let value_per_kg = number(columns::VALUE_PER_KG);

    let date = raw.get(columns::DATE).and_then(|cell| {
        let parsed = parse_cell_date(cell);
        if parsed.is_none() {
            stats.bad_dates += 1;
        }
        parsed
    });

    // The shipper stays verbatim; it is also the seller.
    let shipper = raw.get(columns::SHIPPER_DECLARED);
    let parties = resolve_buyer_seller(
        shipper,
        raw.get(columns::INTERNATIONAL_COMPETITOR).map(str::trim),
        raw.get(columns::DOMESTIC_COMPETITOR).map(str::trim),
    );

    Transaction {
        date,
        shipper_declared: shipper.map(str::to_string),
        international_competitor: text(columns::INTERNATIONAL_COMPETITOR),
        domestic_competitor: text(columns::DOMESTIC_COMPETITOR),
        hs_code,
        country_of_origin: text(columns::COUNTRY_OF_ORIGIN),
        category: text(columns::CATEGORY),
        metric_tons,
        total_value,
        value_per_kg,
        buyer: parties.buyer,
        seller: parties.seller,
    }
}

/// Classification code as text. Integral floats lose their fraction
/// (`854442.0` → `854442`) since spreadsheets often store codes as numbers.
fn normalize_code(cell: &str) -> String {
    let cell = cell.trim();
    if cell.contains(['.', 'e', 'E']) {
        if let Ok(v) = cell.parse::<f64>() {
            if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
                return format!("{}", v as i64);
            }
        }
    }
    cell.to_string()
}

/// Numeric cell; anything unparseable or non-finite is `None`.
fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Date cell: `MM/DD/YYYY`, or ISO `YYYY-MM-DD` with an optional time part.
fn parse_cell_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if let Some(d) = parse_us_date(cell) {
        return Some(d);
    }
    if cell.len() < 10 || !cell.is_char_boundary(10) {
        return None;
    }
    let (day, rest) = cell.split_at(10);
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
