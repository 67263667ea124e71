//! Inbound response entry points.
//!
//! The widget completes every asynchronous getter by calling one of these
//! fixed entry points with `(correlation_token, payload)`. Each entry point
//! parses the token, resolves it one-shot against the matching registry,
//! decodes the payload into its typed shape, and invokes the handler.
//!
//! Failure here means the protocol itself is broken — an unknown token, a
//! payload the connector should never have produced — so every error is
//! surfaced to the caller unrecoverably. The resolve happens before the
//! decode: a payload that fails to decode has already consumed its handler,
//! which is never invoked.

use gridhost_protocol::{cell_meta, data, EntryPoint, Settings};

use crate::error::BridgeError;
use crate::host::GridHost;
use crate::registry::{CorrelationToken, PendingCalls, ResponseHandler};

impl GridHost {
    /// Route an inbound call by entry point name. Used by framework glue
    /// that receives `(entry_point, token, payload)` off the wire.
    pub fn receive_named(
        &self,
        entry_point: &str,
        token: &str,
        payload: &str,
    ) -> Result<(), BridgeError> {
        match EntryPoint::from_name(entry_point) {
            Some(EntryPoint::Data) => self.receive_data(token, payload),
            Some(EntryPoint::Rows) => self.receive_rows(token, payload),
            Some(EntryPoint::CellsMeta) => self.receive_cells_meta(token, payload),
            Some(EntryPoint::Settings) => self.receive_settings(token, payload),
            Some(EntryPoint::CellValue) => self.receive_cell_value(token, payload),
            None => Err(BridgeError::UnknownEntryPoint(entry_point.to_string())),
        }
    }

    /// Raw data response, as requested by `retrieve_data`.
    pub fn receive_data(&self, token: &str, payload: &str) -> Result<(), BridgeError> {
        let handler = self.take_handler(EntryPoint::Data, &self.pending_data, token)?;
        let value = data::decode_data(payload).map_err(|source| BridgeError::Decode {
            entry_point: EntryPoint::Data,
            source,
        })?;
        handler(value);
        Ok(())
    }

    /// Rows-of-strings response, as requested by `retrieve_data_as_array`.
    pub fn receive_rows(&self, token: &str, payload: &str) -> Result<(), BridgeError> {
        let handler = self.take_handler(EntryPoint::Rows, &self.pending_rows, token)?;
        let rows = data::decode_rows(payload).map_err(|source| BridgeError::Decode {
            entry_point: EntryPoint::Rows,
            source,
        })?;
        handler(rows);
        Ok(())
    }

    /// Cell metadata response, as requested by `retrieve_cells_meta`.
    pub fn receive_cells_meta(&self, token: &str, payload: &str) -> Result<(), BridgeError> {
        let handler =
            self.take_handler(EntryPoint::CellsMeta, &self.pending_cells_meta, token)?;
        let cells =
            cell_meta::decode_cells_meta(payload).map_err(|source| BridgeError::Decode {
                entry_point: EntryPoint::CellsMeta,
                source,
            })?;
        handler(cells);
        Ok(())
    }

    /// Settings response, as requested by `retrieve_settings`.
    pub fn receive_settings(&self, token: &str, payload: &str) -> Result<(), BridgeError> {
        let handler =
            self.take_handler(EntryPoint::Settings, &self.pending_settings, token)?;
        let settings = Settings::decode(payload).map_err(|source| BridgeError::Decode {
            entry_point: EntryPoint::Settings,
            source,
        })?;
        handler(settings);
        Ok(())
    }

    /// Single cell value, as requested by `retrieve_data_at_cell`. The
    /// payload is already final — identity passthrough, no decode step.
    pub fn receive_cell_value(&self, token: &str, payload: &str) -> Result<(), BridgeError> {
        let handler =
            self.take_handler(EntryPoint::CellValue, &self.pending_cell_values, token)?;
        handler(payload.to_string());
        Ok(())
    }

    /// Parse the token and take its handler out of `registry`.
    fn take_handler<T>(
        &self,
        entry_point: EntryPoint,
        registry: &PendingCalls<T>,
        token: &str,
    ) -> Result<ResponseHandler<T>, BridgeError> {
        let parsed = CorrelationToken::parse(token).map_err(|_| {
            log::warn!("{}: malformed token {:?}", entry_point.name(), token);
            BridgeError::MalformedToken {
                entry_point,
                token: token.to_string(),
            }
        })?;

        registry.resolve(&parsed).map_err(|_| {
            log::warn!("{}: no pending call for token {}", entry_point.name(), token);
            BridgeError::TokenNotFound {
                entry_point,
                token: token.to_string(),
            }
        })
    }
}
