use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::errors::RemediError;

pub const DEFAULT_FILENAME: &str = "prescription.png";

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// Looks up a header on a proxy event, tolerating a missing `headers` map.
pub fn event_header<'a>(payload: &'a Value, name: &str) -> Option<&'a str> {
    payload
        .get("headers")
        .and_then(|headers| get_header_value(headers, name))
}

/// Returns the raw image bytes carried by a proxy event.
///
/// # Errors
///
/// Returns `RemediError::MissingBody` when there is no body, and
/// `RemediError::DecodeError` when `isBase64Encoded` is set but the body is
/// not valid base64.
pub fn decode_body(payload: &Value) -> Result<Vec<u8>, RemediError> {
    let body = match payload.get("body") {
        None | Some(Value::Null) => return Err(RemediError::MissingBody),
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(RemediError::DecodeError(
                "Request body is not a string".to_string(),
            ));
        }
    };

    let is_base64 = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if !is_base64 {
        return Ok(body.as_bytes().to_vec());
    }

    // API Gateway may wrap long payloads; whitespace is not part of the alphabet.
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

/// Extracts the filename from a `Content-Disposition` value.
///
/// The RFC 5987 `filename*` form takes precedence over `filename`. Any
/// directory components are dropped.
pub fn parse_content_disposition(value: &str) -> Option<String> {
    static EXT_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)(?:^|;)\s*filename\*\s*=\s*([A-Za-z0-9_-]*)'[^']*'([^;\s]+)")
            .expect("static regex compile")
    });
    static PLAIN_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r#"(?i)(?:^|;)\s*filename\s*=\s*(?:"((?:[^"\\]|\\.)*)"|([^;\s"]+))"#)
            .expect("static regex compile")
    });

    let extended = EXT_RE.captures(value).and_then(|cap| {
        let charset = cap[1].to_ascii_lowercase();
        if !charset.is_empty() && charset != "utf-8" {
            return None;
        }
        percent_decode_str(&cap[2])
            .decode_utf8()
            .ok()
            .map(|s| s.into_owned())
    });

    let raw = extended.or_else(|| {
        PLAIN_RE.captures(value).and_then(|cap| {
            cap.get(1)
                .map(|quoted| unescape_quoted(quoted.as_str()))
                .or_else(|| cap.get(2).map(|token| token.as_str().to_string()))
        })
    })?;

    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim()
        .to_string();

    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name)
    }
}

/// Resolves the upload filename for an event, defaulting to
/// [`DEFAULT_FILENAME`] when the header is absent or unusable.
pub fn resolve_filename(payload: &Value) -> String {
    let Some(disposition) = event_header(payload, "Content-Disposition") else {
        return DEFAULT_FILENAME.to_string();
    };

    parse_content_disposition(disposition).unwrap_or_else(|| {
        warn!(
            content_disposition = %disposition,
            "Filename not found in Content-Disposition header"
        );
        DEFAULT_FILENAME.to_string()
    })
}

fn unescape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
