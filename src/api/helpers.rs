//! Proxy-response builders shared by both handlers.

use serde_json::{Value, json};

/// Headers attached to every prescription upload response so the browser
/// client can read it cross-origin.
#[must_use]
pub fn cors_json_headers() -> Value {
    json!({
        "Access-Control-Allow-Origin": "*",
        "Content-Type": "application/json"
    })
}

/// Returns a JSON response with the given status and body.
#[must_use]
pub fn json_response(status_code: u16, body: &Value) -> Value {
    json!({
        "statusCode": status_code,
        "body": body.to_string()
    })
}

/// Same as [`json_response`] with the CORS/JSON headers attached.
#[must_use]
pub fn cors_json_response(status_code: u16, body: &Value) -> Value {
    json!({
        "statusCode": status_code,
        "headers": cors_json_headers(),
        "body": body.to_string()
    })
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json_response(status_code, &json!({ "error": message }))
}

/// Returns a CORS-enabled error response.
#[must_use]
pub fn cors_err_response(status_code: u16, message: &str) -> Value {
    cors_json_response(status_code, &json!({ "error": message }))
}

/// Parses the JSON `body` string of a response built here.
#[must_use]
pub fn response_body(response: &Value) -> Option<Value> {
    response
        .get("body")
        .and_then(Value::as_str)
        .and_then(|s| serde_json::from_str(s).ok())
}
