//! SQL for the chat interaction log table

use agentprobe_domain::InteractionLog;

/// Newest-first select of every logged interaction.
pub fn select_recent_sql(table: &str) -> String {
    format!("SELECT * FROM {table} ORDER BY \"timestamp\" DESC")
}

/// Single-row insert for one interaction.
///
/// Text values are single-quoted with embedded quotes doubled. The rating
/// is written as the integer `1` or `0`.
pub fn insert_sql(table: &str, log: &InteractionLog) -> String {
    let rating = u8::from(log.is_positive != 0);

    format!(
        "INSERT INTO {table} (id, garoonId, name, \"timestamp\", question, answer, isPositive, categories, text) \
         VALUES ({}, {}, {}, {}, {}, {}, {rating}, {}, {})",
        quote(&log.id),
        quote(&log.user_id),
        quote(&log.name),
        quote(&log.timestamp),
        quote(&log.question),
        quote(&log.answer),
        quote(&log.categories_text()),
        quote(&log.text),
    )
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
