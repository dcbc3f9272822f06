//! PhishTank response decoding
//!
//! The service answers in JSON when asked to, but has been seen replying in
//! XML regardless, sometimes with a misleading content type. Bodies are
//! negotiated by content type first and by trial second.

use crate::domain::repositories::TransportError;
use serde_json::{Map, Value};

const SNIPPET_LEN: usize = 200;

/// Decodes a response body into the JSON shape the interpreter expects
///
/// An `errortext` element in either format is a service error.
pub fn decode_body(content_type: &str, text: &str) -> Result<Value, TransportError> {
    let content_type = content_type.to_ascii_lowercase();

    let value = if content_type.contains("application/json") {
        serde_json::from_str(text)
            .map_err(|e| TransportError::Malformed(format!("invalid JSON: {}", e)))?
    } else if content_type.contains("text/xml") || content_type.contains("application/xml") {
        parse_xml(text)?
    } else {
        match serde_json::from_str(text) {
            Ok(value) => value,
            Err(_) => parse_xml(text).map_err(|e| match e {
                TransportError::Service(_) => e,
                _ => TransportError::Malformed(format!(
                    "Content-Type: {}, response: {}",
                    content_type,
                    snippet(text)
                )),
            })?,
        }
    };

    if let Some(message) = value.get("errortext").and_then(Value::as_str) {
        return Err(TransportError::Service(message.to_string()));
    }

    Ok(value)
}

/// Converts a PhishTank XML response to `{"results": {...}}`
///
/// Only tags that are present are copied over, so a missing flag stays
/// missing instead of turning into `false`. Flag text is kept verbatim for
/// the verdict interpreter to resolve.
pub fn parse_xml(text: &str) -> Result<Value, TransportError> {
    if let Some(message) = extract_tag(text, "errortext") {
        return Err(TransportError::Service(message.to_string()));
    }

    let mut results = Map::new();

    if let Some(url) = extract_tag(text, "url") {
        results.insert("url".into(), Value::String(url.to_string()));
    }
    for flag in ["in_database", "verified", "valid"] {
        if let Some(raw) = extract_tag(text, flag) {
            results.insert(flag.into(), Value::String(raw.trim().to_string()));
        }
    }
    if let Some(id) = extract_tag(text, "phish_id").and_then(|s| s.trim().parse::<u64>().ok()) {
        results.insert("phish_id".into(), Value::from(id));
    }

    if results.is_empty() {
        return Err(TransportError::Malformed(format!(
            "no PhishTank fields in XML: {}",
            snippet(text)
        )));
    }

    let mut root = Map::new();
    root.insert("results".into(), Value::Object(results));
    Ok(Value::Object(root))
}

/// Text between the first `<tag>` and the following `</tag>`
fn extract_tag<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    let start = text.find(&open)? + open.len();
    let end = text[start..].find(&close)? + start;
    Some(&text[start..end])
}

fn snippet(text: &str) -> &str {
    match text.char_indices().nth(SNIPPET_LEN) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
