//! Frame log format
//!
//! A frame log records what a decoder saw, one frame per line:
//!
//! ```text
//! # comment
//! none                      no QR code in frame
//! checksum                  checksum mismatch
//! error lens obstructed     any other decode error
//! code https://example.com  decoded payload
//! ```

use crate::domain::entities::DecodeErrorKind;
use crate::domain::repositories::{DecodeEvent, DecodeFailure};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors loading a frame log
#[derive(Error, Debug)]
pub enum FrameLogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: {message}")]
    Syntax { line: usize, message: String },
}

/// Parses one frame record
pub fn parse_frame(record: &str) -> Result<DecodeEvent, String> {
    let record = record.trim();
    let (keyword, rest) = match record.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (record, ""),
    };

    match keyword.to_ascii_lowercase().as_str() {
        "none" => Ok(DecodeEvent::Failed(DecodeFailure::no_detection())),
        "checksum" => Ok(DecodeEvent::Failed(DecodeFailure::checksum_mismatch())),
        "error" => {
            let message = if rest.is_empty() { "decode error" } else { rest };
            Ok(DecodeEvent::Failed(DecodeFailure::new(DecodeErrorKind::Other, message)))
        }
        "code" if !rest.is_empty() => Ok(DecodeEvent::Decoded(rest.to_string())),
        "code" => Err("'code' needs a payload".to_string()),
        other => Err(format!("unknown frame keyword '{}'", other)),
    }
}

/// Returns the frame records of a log, validated
pub fn parse_log(text: &str) -> Result<Vec<String>, FrameLogError> {
    let mut records = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        parse_frame(trimmed).map_err(|message| FrameLogError::Syntax {
            line: idx + 1,
            message,
        })?;
        records.push(trimmed.to_string());
    }

    Ok(records)
}

/// Reads and validates a frame log file
pub fn load_log(path: &Path) -> Result<Vec<String>, FrameLogError> {
    let text = fs::read_to_string(path)?;
    parse_log(&text)
}
