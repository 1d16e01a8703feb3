//! CSV encoding for exports and decoding for question input files
//!
//! Every generated body starts with the UTF-8 byte-order mark and ends each
//! record with CRLF so spreadsheet tools pick the right encoding and line
//! breaks on any platform.
//!
//! Encoding is strict about the schema: a record that carries a field the
//! column list does not declare is a [`ProbeError::Serialization`], never a
//! silently dropped value.

pub mod decode;

use agentprobe_domain::constants::UTF8_BOM;
use agentprobe_domain::{ProbeError, ResultRecord, Result};
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use serde_json::{Map, Value};

pub use decode::{CsvTable, QuestionSelection};

/// Which fields get wrapped in quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotePolicy {
    /// Quote every field; used for free-text batch results.
    All,
    /// Quote only fields that need it; used for raw table exports.
    Minimal,
}

impl QuotePolicy {
    fn style(self) -> QuoteStyle {
        match self {
            Self::All => QuoteStyle::Always,
            Self::Minimal => QuoteStyle::Necessary,
        }
    }
}

/// A record addressed by column name.
pub trait CsvRecord {
    /// `(column, rendered value)` pairs, in the record's own order.
    fn fields(&self) -> Vec<(String, String)>;
}

impl CsvRecord for ResultRecord {
    fn fields(&self) -> Vec<(String, String)> {
        vec![
            ("Question".to_string(), self.question.clone()),
            ("Answer".to_string(), self.answer.clone()),
            ("Status".to_string(), self.status.to_string()),
        ]
    }
}

impl CsvRecord for Map<String, Value> {
    fn fields(&self) -> Vec<(String, String)> {
        self.iter().map(|(name, value)| (name.clone(), render_scalar(value))).collect()
    }
}

/// CSV encoder/decoder with a fixed quoting policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvCodec {
    policy: QuotePolicy,
}

impl CsvCodec {
    /// Codec with the given quoting policy.
    pub fn new(policy: QuotePolicy) -> Self {
        Self { policy }
    }

    /// Codec that quotes every field, used for batch results.
    pub fn quote_all() -> Self {
        Self::new(QuotePolicy::All)
    }

    /// Codec that quotes only when needed, used for the raw log export.
    pub fn minimal() -> Self {
        Self::new(QuotePolicy::Minimal)
    }

    /// Quoting policy in use.
    pub fn policy(&self) -> QuotePolicy {
        self.policy
    }

    /// Encode named records under a header of `columns`.
    ///
    /// A column a record does not mention is written empty.
    ///
    /// # Errors
    /// `ProbeError::Serialization` when a record carries a field outside
    /// `columns`, or the writer fails.
    pub fn encode_records<C, R>(&self, columns: &[C], records: &[R]) -> Result<Vec<u8>>
    where
        C: AsRef<str>,
        R: CsvRecord,
    {
        let mut writer = self.writer();
        write_row(&mut writer, columns.iter().map(AsRef::as_ref))?;

        for (index, record) in records.iter().enumerate() {
            let mut row = vec![String::new(); columns.len()];
            for (name, value) in record.fields() {
                let slot = columns.iter().position(|column| column.as_ref() == name).ok_or_else(
                    || {
                        ProbeError::Serialization(format!(
                            "record {index} has field `{name}` outside the column schema [{}]",
                            join_columns(columns)
                        ))
                    },
                )?;
                row[slot] = value;
            }
            write_row(&mut writer, row.iter().map(String::as_str))?;
        }

        finish(writer)
    }

    /// Encode positional rows of scalar values.
    ///
    /// With a non-empty `columns` a header is written and short rows are
    /// padded with empty fields. With no columns, rows are written as they
    /// are and no header is emitted.
    ///
    /// # Errors
    /// `ProbeError::Serialization` when a row is longer than a non-empty
    /// column list, or the writer fails.
    pub fn encode_rows<C>(&self, columns: &[C], rows: &[Vec<Value>]) -> Result<Vec<u8>>
    where
        C: AsRef<str>,
    {
        let mut writer = self.writer();
        if !columns.is_empty() {
            write_row(&mut writer, columns.iter().map(AsRef::as_ref))?;
        }

        for (index, row) in rows.iter().enumerate() {
            if !columns.is_empty() && row.len() > columns.len() {
                return Err(ProbeError::Serialization(format!(
                    "row {index} has {} values but the column schema [{}] has {}",
                    row.len(),
                    join_columns(columns),
                    columns.len()
                )));
            }

            let mut fields: Vec<String> = row.iter().map(render_scalar).collect();
            if fields.len() < columns.len() {
                fields.resize(columns.len(), String::new());
            }
            write_row(&mut writer, fields.iter().map(String::as_str))?;
        }

        finish(writer)
    }

    /// Parse a CSV body with a header row. See [`decode::decode`].
    pub fn decode(&self, bytes: &[u8]) -> Result<CsvTable> {
        decode::decode(bytes)
    }
}

impl Default for CsvCodec {
    fn default() -> Self {
        Self::quote_all()
    }
}

impl CsvCodec {
    fn writer(&self) -> Writer<Vec<u8>> {
        WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .terminator(Terminator::CRLF)
            .quote_style(self.policy.style())
            .from_writer(UTF8_BOM.to_vec())
    }
}

/// Render one JSON scalar as a CSV field.
///
/// Strings are written as they are, numbers and booleans by their JSON
/// text, `null` as an empty field, arrays and objects as compact JSON.
pub fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn write_row<'a, I>(writer: &mut Writer<Vec<u8>>, fields: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    writer
        .write_record(fields)
        .map_err(|e| ProbeError::Serialization(format!("Failed to write CSV record: {e}")))
}

fn finish(writer: Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| ProbeError::Serialization(format!("Failed to flush CSV writer: {}", e.error())))
}

fn join_columns<C: AsRef<str>>(columns: &[C]) -> String {
    columns.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use agentprobe_domain::constants::BATCH_COLUMNS;
    use serde_json::json;

    use super::*;

    fn body(bytes: &[u8]) -> &str {
        std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap()
    }

    #[test]
    fn batch_export_quotes_everything_with_crlf_and_bom() {
        let records = vec![ResultRecord::success("What is X?", "A letter."), ResultRecord::skipped()];

        let bytes = CsvCodec::quote_all().encode_records(&BATCH_COLUMNS, &records).unwrap();

        assert!(bytes.starts_with(UTF8_BOM));
        assert_eq!(
            body(&bytes),
            "\"Question\",\"Answer\",\"Status\"\r\n\
             \"What is X?\",\"A letter.\",\"Success\"\r\n\
             \"\",\"\",\"Skipped\"\r\n"
        );
    }

    #[test]
    fn every_line_ends_with_crlf() {
        let rows = vec![vec![json!("a"), json!(1)], vec![json!("b"), json!(2)]];
        let bytes = CsvCodec::minimal().encode_rows(&["name", "n"], &rows).unwrap();
        let text = body(&bytes);

        assert!(text.ends_with("\r\n"));
        assert_eq!(text.matches('\n').count(), text.matches("\r\n").count());
        assert_eq!(text, "name,n\r\na,1\r\nb,2\r\n");
    }

    #[test]
    fn awkward_text_survives_a_round_trip() {
        let tricky = "one, \"two\"\r\nthree";
        let records = vec![ResultRecord::success("q", tricky)];

        for codec in [CsvCodec::quote_all(), CsvCodec::minimal()] {
            let bytes = codec.encode_records(&BATCH_COLUMNS, &records).unwrap();
            let table = codec.decode(&bytes).unwrap();

            assert_eq!(table.headers, BATCH_COLUMNS);
            assert_eq!(table.rows[0][1], tricky);
        }
    }

    #[test]
    fn field_outside_schema_is_rejected() {
        let mut record = Map::new();
        record.insert("Question".into(), json!("q"));
        record.insert("Score".into(), json!(3));

        let err = CsvCodec::quote_all().encode_records(&BATCH_COLUMNS, &[record]).unwrap_err();

        match err {
            ProbeError::Serialization(msg) => assert!(msg.contains("`Score`")),
            other => panic!("expected serialization error, got {other:?}"),
        }
    }

    #[test]
    fn missing_named_field_is_written_empty() {
        let mut record = Map::new();
        record.insert("Status".into(), json!("Skipped"));

        let bytes = CsvCodec::minimal().encode_records(&BATCH_COLUMNS, &[record]).unwrap();

        assert_eq!(body(&bytes), "Question,Answer,Status\r\n,,Skipped\r\n");
    }

    #[test]
    fn positional_row_longer_than_schema_is_rejected() {
        let rows = vec![vec![json!(1), json!(2), json!(3)]];
        let err = CsvCodec::minimal().encode_rows(&["A", "B"], &rows).unwrap_err();
        assert!(matches!(err, ProbeError::Serialization(_)));
    }

    #[test]
    fn short_rows_are_padded() {
        let rows = vec![vec![json!("x")]];
        let bytes = CsvCodec::minimal().encode_rows(&["A", "B"], &rows).unwrap();
        assert_eq!(body(&bytes), "A,B\r\nx,\r\n");
    }

    #[test]
    fn no_columns_means_no_header() {
        let rows = vec![vec![json!(1), json!(2)], vec![json!(3)]];
        let bytes = CsvCodec::minimal().encode_rows::<&str>(&[], &rows).unwrap();
        assert_eq!(body(&bytes), "1,2\r\n3\r\n");
    }

    #[test]
    fn scalars_render_predictably() {
        assert_eq!(render_scalar(&json!("text")), "text");
        assert_eq!(render_scalar(&json!(42)), "42");
        assert_eq!(render_scalar(&json!(1.5)), "1.5");
        assert_eq!(render_scalar(&json!(true)), "true");
        assert_eq!(render_scalar(&Value::Null), "");
        assert_eq!(render_scalar(&json!(["a", 1])), r#"["a",1]"#);
    }
}
