//! One recorded chat interaction, as posted by the portal widget

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Timestamp layout of the log table, millisecond precision.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A chat interaction to append to the log table.
///
/// Field names on the wire follow the portal widget that posts them
/// (`garoonId`, `isPositive`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionLog {
    /// Row id chosen by the client.
    #[serde(default)]
    pub id: String,
    /// Portal user id.
    #[serde(rename = "garoonId", alias = "userId", default)]
    pub user_id: String,
    /// Display name of the user.
    #[serde(default)]
    pub name: String,
    /// Filled with the time of recording when the client leaves it empty.
    #[serde(default)]
    pub timestamp: String,
    /// Question asked.
    #[serde(default)]
    pub question: String,
    /// Answer given.
    #[serde(default)]
    pub answer: String,
    /// `1` for a positive rating, `0` otherwise (also when absent).
    #[serde(rename = "isPositive", default, deserialize_with = "rating_flag")]
    pub is_positive: u8,
    /// A string or a list of strings.
    #[serde(default)]
    pub categories: Value,
    /// Free-text comment.
    #[serde(default)]
    pub text: String,
}

impl InteractionLog {
    /// Stamp the entry with `now` unless the client supplied a timestamp.
    pub fn ensure_timestamp(&mut self, now: DateTime<Utc>) {
        if self.timestamp.trim().is_empty() {
            self.timestamp = now.format(LOG_TIMESTAMP_FORMAT).to_string();
        }
    }

    /// Categories flattened to one comma separated string.
    pub fn categories_text(&self) -> String {
        match &self.categories {
            Value::Null => String::new(),
            Value::String(text) => text.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            other => other.to_string(),
        }
    }
}

/// Accept the widget's `1`/`0` as well as booleans, numeric strings and `null`.
fn rating_flag<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0),
        Value::Bool(flag) => Ok(u8::from(flag)),
        Value::Number(number) => Ok(u8::from(number.as_f64().is_some_and(|n| n != 0.0))),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "" | "0" | "false" => Ok(0),
            "1" | "true" => Ok(1),
            other => Err(serde::de::Error::custom(format!("invalid isPositive value: {other}"))),
        },
        other => Err(serde::de::Error::custom(format!("invalid isPositive value: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_widget_payload() {
        let log: InteractionLog = serde_json::from_value(json!({
            "id": "42",
            "garoonId": "u-7",
            "name": "Sato",
            "timestamp": "2025-01-10 09:00:00",
            "question": "q",
            "answer": "a",
            "isPositive": true,
            "categories": ["contract", "nda"],
            "text": ""
        }))
        .unwrap();

        assert_eq!(log.user_id, "u-7");
        assert_eq!(log.is_positive, 1);
        assert_eq!(log.categories_text(), "contract,nda");
    }

    #[test]
    fn optional_fields_default() {
        let log: InteractionLog = serde_json::from_value(json!({"id": "1"})).unwrap();
        assert_eq!(log.is_positive, 0);
        assert_eq!(log.categories_text(), "");
        assert_eq!(log.timestamp, "");
    }

    #[test]
    fn numeric_rating_from_widget_is_accepted() {
        let log: InteractionLog = serde_json::from_value(json!({
            "id": "u1",
            "garoonId": "7",
            "name": "Sato",
            "question": "q",
            "answer": "a",
            "isPositive": 1,
            "categories": "",
            "text": ""
        }))
        .unwrap();
        assert_eq!(log.is_positive, 1);

        for (raw, expected) in [(json!(0), 0), (json!(false), 0), (json!(null), 0), (json!("1"), 1)] {
            let log: InteractionLog =
                serde_json::from_value(json!({"id": "1", "isPositive": raw})).unwrap();
            assert_eq!(log.is_positive, expected, "{raw}");
        }
    }

    #[test]
    fn unreadable_rating_is_rejected() {
        let result = serde_json::from_value::<InteractionLog>(json!({"isPositive": "maybe"}));
        assert!(result.is_err());
        let result = serde_json::from_value::<InteractionLog>(json!({"isPositive": [1]}));
        assert!(result.is_err());
    }

    #[test]
    fn missing_timestamp_is_generated() {
        let now = DateTime::parse_from_rfc3339("2025-01-10T09:00:00.123Z").unwrap().with_timezone(&Utc);

        let mut log: InteractionLog = serde_json::from_value(json!({"id": "1"})).unwrap();
        log.ensure_timestamp(now);
        assert_eq!(log.timestamp, "2025-01-10 09:00:00.123");

        let mut given: InteractionLog =
            serde_json::from_value(json!({"id": "2", "timestamp": "2024-12-31 23:59:59"})).unwrap();
        given.ensure_timestamp(now);
        assert_eq!(given.timestamp, "2024-12-31 23:59:59");
    }
}
