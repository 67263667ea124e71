//! Bridge error taxonomy.
//!
//! Everything here is a protocol or programmer error: a broken
//! request/response pairing, a payload the connector should never have
//! produced, or an operation the connector does not implement. None of these
//! are retried internally and none have a partial-failure mode — an operation
//! either fully succeeds or fails outright.

use std::fmt;

use gridhost_protocol::{DecodeError, EncodeError, EntryPoint};

/// Errors surfaced by the widget bridge.
#[derive(Debug)]
pub enum BridgeError {
    /// An inbound response referenced a token with no pending call
    /// (never registered, or already resolved).
    TokenNotFound {
        entry_point: EntryPoint,
        token: String,
    },
    /// An inbound token string did not parse.
    MalformedToken {
        entry_point: EntryPoint,
        token: String,
    },
    /// An inbound payload was malformed or schema-mismatched. The whole
    /// payload fails; the handler is not invoked.
    Decode {
        entry_point: EntryPoint,
        source: DecodeError,
    },
    /// An inbound call named an entry point that does not exist.
    UnknownEntryPoint(String),
    /// An outbound payload failed to serialize.
    Encode(EncodeError),
    /// The operation is not wired to the widget connector.
    Unsupported(&'static str),
    /// The per-session channel to the widget is closed.
    ChannelClosed,
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::TokenNotFound { entry_point, token } => {
                write!(f, "{}: no pending call for token {}", entry_point.name(), token)
            }
            BridgeError::MalformedToken { entry_point, token } => {
                write!(f, "{}: malformed token {:?}", entry_point.name(), token)
            }
            BridgeError::Decode { entry_point, source } => {
                write!(f, "{}: {}", entry_point.name(), source)
            }
            BridgeError::UnknownEntryPoint(name) => {
                write!(f, "unknown entry point {:?}", name)
            }
            BridgeError::Encode(source) => write!(f, "{}", source),
            BridgeError::Unsupported(operation) => {
                write!(f, "operation {} is not wired to the widget", operation)
            }
            BridgeError::ChannelClosed => write!(f, "widget channel closed"),
        }
    }
}

impl std::error::Error for BridgeError {}

impl From<EncodeError> for BridgeError {
    fn from(err: EncodeError) -> Self {
        BridgeError::Encode(err)
    }
}
