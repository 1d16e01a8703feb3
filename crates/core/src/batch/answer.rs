//! Answer extraction from the agent's chat-completion envelope

use serde_json::Value;

/// JSON pointer to the answer text in a chat-completion response.
pub const ANSWER_POINTER: &str = "/choices/0/message/content";

/// Pull the answer text out of a response.
///
/// When the expected field is missing the whole response is returned as
/// compact JSON; the call itself succeeded, so the record stays a success.
pub fn extract_answer(response: &Value) -> String {
    match response.pointer(ANSWER_POINTER) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => response.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_first_choice_content() {
        let response = json!({
            "choices": [
                {"message": {"role": "assistant", "content": "X is a letter."}},
                {"message": {"content": "ignored"}}
            ]
        });
        assert_eq!(extract_answer(&response), "X is a letter.");
    }

    #[test]
    fn falls_back_to_raw_response() {
        let response = json!({"output": "unexpected shape"});
        assert_eq!(extract_answer(&response), r#"{"output":"unexpected shape"}"#);

        let empty_choices = json!({"choices": []});
        assert_eq!(extract_answer(&empty_choices), r#"{"choices":[]}"#);
    }

    #[test]
    fn non_text_content_is_rendered_as_json() {
        let response = json!({"choices": [{"message": {"content": [{"type": "text"}]}}]});
        assert_eq!(extract_answer(&response), r#"[{"type":"text"}]"#);
    }
}
