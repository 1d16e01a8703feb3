//! Question file decoding

use agentprobe_domain::constants::{QUESTION_COLUMN_ALIASES, UTF8_BOM};
use agentprobe_domain::{BatchItem, ProbeError, Result};
use csv::ReaderBuilder;

/// A decoded CSV body: header names and string rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    /// Header row, BOM stripped.
    pub headers: Vec<String>,
    /// Data rows in file order.
    pub rows: Vec<Vec<String>>,
}

/// The column picked as question input and the items read from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionSelection {
    /// Header of the selected column.
    pub column: String,
    /// True when no alias matched and the first column was taken instead.
    pub used_fallback: bool,
    /// One item per data row, in file order.
    pub items: Vec<BatchItem>,
}

/// Parse a CSV body whose first record is the header row.
///
/// A leading byte-order mark is ignored. Rows may have fewer or more fields
/// than the header.
///
/// # Errors
/// `ProbeError::InvalidInput` when the body is not valid CSV or not UTF-8.
pub fn decode(bytes: &[u8]) -> Result<CsvTable> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = ReaderBuilder::new().has_headers(true).flexible(true).from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ProbeError::InvalidInput(format!("Failed to read CSV header: {e}")))?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| ProbeError::InvalidInput(format!("Failed to read CSV row: {e}")))?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(CsvTable { headers, rows })
}

impl CsvTable {
    /// True when the file has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header.trim() == name)
    }

    /// Locate the question column and turn its cells into batch items.
    ///
    /// Aliases are tried in order; when none matches the first column is
    /// used and `used_fallback` is set so the caller can tell the operator.
    ///
    /// # Errors
    /// `ProbeError::InvalidInput` when the table has no header row.
    pub fn questions(&self) -> Result<QuestionSelection> {
        if self.headers.is_empty() {
            return Err(ProbeError::InvalidInput("CSV input has no header row".into()));
        }

        let matched = QUESTION_COLUMN_ALIASES.iter().find_map(|alias| self.column_index(alias));
        let (index, used_fallback) = match matched {
            Some(index) => (index, false),
            None => (0, true),
        };

        let items = self
            .rows
            .iter()
            .enumerate()
            .map(|(position, row)| {
                BatchItem::from_text(position, row.get(index).cloned().unwrap_or_default())
            })
            .collect();

        Ok(QuestionSelection { column: self.headers[index].clone(), used_fallback, items })
    }
}
