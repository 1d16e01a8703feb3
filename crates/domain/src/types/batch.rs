//! Batch question items and their uniform result records

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::constants::{STATUS_SKIPPED, STATUS_SUCCESS};

/// One input question and its position in the original input list.
///
/// `question` is `None` when the input value was not text at all (a number,
/// `null`, an object in a JSON request).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    /// Position in the input.
    pub position: usize,
    /// Trimmed question, `None` when there is nothing to ask.
    pub question: Option<String>,
}

impl BatchItem {
    /// Item from raw text; blank text is skipped.
    pub fn from_text(position: usize, text: impl Into<String>) -> Self {
        Self { position, question: Some(text.into()) }
    }

    /// Item from a JSON value; anything but non-blank text is skipped.
    pub fn from_value(position: usize, value: &Value) -> Self {
        Self { position, question: value.as_str().map(str::to_owned) }
    }

    /// Build positioned items from an ordered list of texts.
    pub fn from_texts<I, S>(texts: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts.into_iter().enumerate().map(|(idx, text)| Self::from_text(idx, text)).collect()
    }

    /// The trimmed question, or `None` when the item must be skipped.
    pub fn prompt(&self) -> Option<&str> {
        self.question.as_deref().map(str::trim).filter(|text| !text.is_empty())
    }
}

/// Outcome label written to the `Status` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    Success,
    Skipped,
    /// Full status text, already prefixed with `Error: `.
    Error(String),
}

impl RecordStatus {
    /// The question was answered.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The question failed.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str(STATUS_SUCCESS),
            Self::Skipped => f.write_str(STATUS_SKIPPED),
            Self::Error(detail) => f.write_str(detail),
        }
    }
}

impl Serialize for RecordStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One output row of a batch: `{Question, Answer, Status}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    /// Question as asked, empty when skipped.
    #[serde(rename = "Question")]
    pub question: String,
    /// Answer text, empty unless answered.
    #[serde(rename = "Answer")]
    pub answer: String,
    /// Outcome of the question.
    #[serde(rename = "Status")]
    pub status: RecordStatus,
}

impl ResultRecord {
    /// Answered question.
    pub fn success(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { question: question.into(), answer: answer.into(), status: RecordStatus::Success }
    }

    /// Record for an empty or non-text item: every column blank except the status.
    pub fn skipped() -> Self {
        Self { question: String::new(), answer: String::new(), status: RecordStatus::Skipped }
    }

    /// Question whose call failed with `detail`.
    pub fn failed(question: impl Into<String>, detail: impl fmt::Display) -> Self {
        Self {
            question: question.into(),
            answer: String::new(),
            status: RecordStatus::Error(format!("Error: {detail}")),
        }
    }
}
