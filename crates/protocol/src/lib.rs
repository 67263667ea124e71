//! Gridhost Widget Bridge — Wire Types
//!
//! This crate defines the types that cross the host ↔ widget boundary.
//! Outbound traffic is a positional function call (`WidgetCall`); inbound
//! traffic is one of a fixed set of named entry points, each carrying a
//! correlation token and a payload string.
//!
//! Encoding convention: structured payloads (data, settings, cell metadata)
//! are serialized to JSON *text* before crossing the boundary, so a structured
//! argument travels as a JSON string containing JSON. Primitives (indices,
//! cell values, tokens) pass through as plain JSON numbers/strings.
//!
//! # Usage
//!
//! ```ignore
//! use gridhost_protocol::{WidgetCall, WidgetFn};
//!
//! let call = WidgetCall::new(WidgetFn::SetDataAtCell.name(), vec![
//!     serde_json::json!(0),
//!     serde_json::json!(2),
//!     serde_json::json!("42"),
//! ]);
//! let wire = serde_json::to_string(&call)?;
//! ```

use serde::{Deserialize, Serialize};

pub mod cell_meta;
pub mod data;
pub mod error;
pub mod settings;

pub use cell_meta::CellMeta;
pub use error::{DecodeError, EncodeError};
pub use settings::{HeaderSpec, Settings};

/// Client-side bootstrap function. Invoked exactly once per host, at
/// construction, with (target, [locale], [initial data]). Unlike the
/// `$grid.*` functions it is page-level, not widget-scoped — the widget
/// does not exist until this call runs.
pub const CREATE_FN: &str = "createGrid";

/// A single outbound invocation: function name plus positional arguments.
///
/// Arguments are untyped at this boundary. Callers pre-serialize structured
/// values to JSON text; see the crate docs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetCall {
    /// Fully-qualified client function name (e.g. `$grid.setData`).
    pub function: String,
    /// Positional arguments.
    pub args: Vec<serde_json::Value>,
}

impl WidgetCall {
    pub fn new(function: impl Into<String>, args: Vec<serde_json::Value>) -> Self {
        Self {
            function: function.into(),
            args,
        }
    }
}

/// Widget-scoped client functions the host can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetFn {
    SetData,
    SetDataAtCell,
    SetCellsMeta,
    SetSettings,
    SetNestedHeaders,
    SetHeaderClassNames,
    /// Structural edits (insert/remove rows/cols) share one client function;
    /// the edit kind travels as the first argument. See [`AlterKind`].
    Alter,
    RetrieveData,
    RetrieveDataAsArray,
    RetrieveCellsMeta,
    RetrieveSettings,
    RetrieveDataAtCell,
}

impl WidgetFn {
    /// The connector-side function name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetData => "$grid.setData",
            Self::SetDataAtCell => "$grid.setDataAtCell",
            Self::SetCellsMeta => "$grid.setCellsMeta",
            Self::SetSettings => "$grid.setSettings",
            Self::SetNestedHeaders => "$grid.setNestedHeaders",
            Self::SetHeaderClassNames => "$grid.setHeaderClassNames",
            Self::Alter => "$grid.alter",
            Self::RetrieveData => "$grid.retrieveData",
            Self::RetrieveDataAsArray => "$grid.retrieveDataAsArray",
            Self::RetrieveCellsMeta => "$grid.retrieveCellsMeta",
            Self::RetrieveSettings => "$grid.retrieveSettings",
            Self::RetrieveDataAtCell => "$grid.retrieveDataAtCell",
        }
    }
}

/// Structural edit kinds dispatched through `$grid.alter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterKind {
    InsertRow,
    InsertCol,
    RemoveRow,
    RemoveCol,
}

impl AlterKind {
    /// The alter keyword the widget expects as the first argument.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::InsertRow => "insert_row",
            Self::InsertCol => "insert_col",
            Self::RemoveRow => "remove_row",
            Self::RemoveCol => "remove_col",
        }
    }
}

/// Inbound entry points — the fixed set of host functions the widget may
/// call back into, one per response shape. Every entry point takes
/// `(correlation_token, payload)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// Raw hierarchical data, as passed to setData.
    Data,
    /// Data normalized to rows of strings.
    Rows,
    /// List of per-cell metadata objects.
    CellsMeta,
    /// Settings object.
    Settings,
    /// A single cell value; the payload is already final (no JSON layer).
    CellValue,
}

impl EntryPoint {
    pub const ALL: [EntryPoint; 5] = [
        EntryPoint::Data,
        EntryPoint::Rows,
        EntryPoint::CellsMeta,
        EntryPoint::Settings,
        EntryPoint::CellValue,
    ];

    /// The connector-side name of this entry point.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Data => "receiveData",
            Self::Rows => "receiveDataAsArray",
            Self::CellsMeta => "receiveCellsMeta",
            Self::Settings => "receiveSettings",
            Self::CellValue => "receiveDataAtCell",
        }
    }

    /// Look up an entry point by its connector-side name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ep| ep.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_call_serialization() {
        let call = WidgetCall::new(
            WidgetFn::SetDataAtCell.name(),
            vec![
                serde_json::json!(1),
                serde_json::json!(2),
                serde_json::json!("hello"),
            ],
        );

        let json = serde_json::to_string(&call).unwrap();
        assert!(json.contains(r#""function":"$grid.setDataAtCell""#));

        let parsed: WidgetCall = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, call);
    }

    #[test]
    fn test_entry_point_names_round_trip() {
        for ep in EntryPoint::ALL {
            assert_eq!(EntryPoint::from_name(ep.name()), Some(ep));
        }
        assert_eq!(EntryPoint::from_name("receiveNothing"), None);
    }

    #[test]
    fn test_alter_keywords() {
        assert_eq!(AlterKind::InsertRow.keyword(), "insert_row");
        assert_eq!(AlterKind::RemoveCol.keyword(), "remove_col");
    }
}
