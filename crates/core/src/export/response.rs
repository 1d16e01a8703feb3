//! Non-CSV responses of the function boundary

use std::collections::BTreeMap;

use agentprobe_domain::constants::{
    ALLOWED_HEADERS, ALLOWED_METHODS, ALLOW_ANY_ORIGIN, CONTENT_TYPE_JSON, HEADER_ALLOW_HEADERS,
    HEADER_ALLOW_METHODS, HEADER_ALLOW_ORIGIN, HEADER_CONTENT_TYPE,
};
use agentprobe_domain::FunctionResponse;
use serde_json::{json, Value};

/// Cross-origin headers attached to every response.
pub fn cors_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        (HEADER_ALLOW_ORIGIN.to_string(), ALLOW_ANY_ORIGIN.to_string()),
        (HEADER_ALLOW_METHODS.to_string(), ALLOWED_METHODS.to_string()),
        (HEADER_ALLOW_HEADERS.to_string(), ALLOWED_HEADERS.to_string()),
    ])
}

/// JSON body with the CORS headers.
pub fn json_response(status_code: u16, body: &Value) -> FunctionResponse {
    let mut headers = cors_headers();
    headers.insert(HEADER_CONTENT_TYPE.to_string(), CONTENT_TYPE_JSON.to_string());
    FunctionResponse { status_code, headers, body: body.to_string() }
}

/// `{"error": message}` with the given status.
pub fn json_error(status_code: u16, message: impl Into<String>) -> FunctionResponse {
    json_response(status_code, &json!({ "error": message.into() }))
}

/// Empty `204` answer to a CORS preflight request.
pub fn preflight() -> FunctionResponse {
    FunctionResponse { status_code: 204, headers: cors_headers(), body: String::new() }
}
