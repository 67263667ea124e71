//! Encode/decode error types for boundary payloads.
//!
//! Every payload either decodes fully or the whole call fails — there is no
//! partial acceptance of a batch, so these errors always describe the entire
//! payload (with the failing element index where one exists).

use std::fmt;

/// Error decoding an inbound payload.
#[derive(Debug)]
pub enum DecodeError {
    /// Payload is not valid JSON.
    Json(String),
    /// Payload parsed, but does not have the expected shape.
    Shape(String),
    /// A specific element of a batch payload failed to decode.
    Element { index: usize, message: String },
}

impl DecodeError {
    /// Classify a serde_json error: syntax problems are `Json`, valid JSON
    /// with the wrong structure is `Shape`.
    pub fn from_serde(err: serde_json::Error) -> Self {
        use serde_json::error::Category;
        match err.classify() {
            Category::Syntax | Category::Eof | Category::Io => Self::Json(err.to_string()),
            Category::Data => Self::Shape(err.to_string()),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Json(msg) => write!(f, "malformed JSON: {}", msg),
            DecodeError::Shape(msg) => write!(f, "unexpected payload shape: {}", msg),
            DecodeError::Element { index, message } => {
                write!(f, "element {} failed to decode: {}", index, message)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Error serializing an outbound payload.
#[derive(Debug)]
pub struct EncodeError(pub String);

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "encode failed: {}", self.0)
    }
}

impl std::error::Error for EncodeError {}
