//! CSV exports wrapped with delivery metadata

pub mod response;

use std::collections::BTreeMap;

use agentprobe_domain::constants::{
    BATCH_COLUMNS, BATCH_EXPORT_FILENAME, CONTENT_TYPE_CSV, HEADER_CONTENT_DISPOSITION,
    HEADER_CONTENT_TYPE, HEADER_JOB_STATUS, LOG_EXPORT_FILENAME,
};
use agentprobe_domain::{FunctionResponse, JobCompletion, JobOutcome, Result, ResultRecord};
use tracing::debug;

use crate::csv_codec::CsvCodec;

pub use response::{cors_headers, json_error, json_response, preflight};

/// Encoded CSV plus what a transport needs to deliver it as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Encoded CSV, BOM included.
    pub bytes: Vec<u8>,
    /// Attachment file name.
    pub filename: String,
    /// Data rows in the body.
    pub rows: usize,
    /// Set for job exports; tells the receiver whether rows may be partial.
    pub completion: Option<JobCompletion>,
}

impl ExportArtifact {
    /// Content type of the body.
    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE_CSV
    }

    /// `attachment` disposition carrying the file name.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }

    /// Headers for delivery: content type, attachment name, open CORS and,
    /// for job exports, the job completion state.
    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = cors_headers();
        headers.insert(HEADER_CONTENT_TYPE.to_string(), self.content_type().to_string());
        headers.insert(HEADER_CONTENT_DISPOSITION.to_string(), self.content_disposition());
        if let Some(completion) = self.completion {
            headers.insert(HEADER_JOB_STATUS.to_string(), completion.to_string());
        }
        headers
    }

    /// Wrap as a `200` function response. The body keeps the leading BOM.
    pub fn into_response(self) -> FunctionResponse {
        let headers = self.headers();
        FunctionResponse {
            status_code: 200,
            headers,
            body: String::from_utf8_lossy(&self.bytes).into_owned(),
        }
    }
}

/// Builds the two CSV exports.
#[derive(Debug, Clone, Copy)]
pub struct ResultExporter {
    batch_codec: CsvCodec,
    raw_codec: CsvCodec,
}

impl Default for ResultExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultExporter {
    /// Exporter with the default codecs.
    pub fn new() -> Self {
        Self { batch_codec: CsvCodec::quote_all(), raw_codec: CsvCodec::minimal() }
    }

    /// `Question,Answer,Status` export, every field quoted.
    pub fn export_batch(&self, records: &[ResultRecord]) -> Result<ExportArtifact> {
        let bytes = self.batch_codec.encode_records(&BATCH_COLUMNS, records)?;
        debug!(rows = records.len(), bytes = bytes.len(), "Encoded batch export");
        Ok(ExportArtifact {
            bytes,
            filename: BATCH_EXPORT_FILENAME.to_string(),
            rows: records.len(),
            completion: None,
        })
    }

    /// Raw table export with the job's own column list and minimal quoting.
    pub fn export_job(&self, outcome: &JobOutcome) -> Result<ExportArtifact> {
        let bytes = self.raw_codec.encode_rows(outcome.columns.as_slice(), &outcome.rows)?;
        debug!(
            rows = outcome.rows.len(),
            completion = %outcome.completion,
            bytes = bytes.len(),
            "Encoded job export"
        );
        Ok(ExportArtifact {
            bytes,
            filename: LOG_EXPORT_FILENAME.to_string(),
            rows: outcome.rows.len(),
            completion: Some(outcome.completion),
        })
    }
}
