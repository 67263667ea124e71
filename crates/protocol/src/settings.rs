// Widget settings bag
// Serialized camelCase; unset keys are omitted rather than sent as null.
// The settings object is fully replaced on each write, never patched.

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};

/// Header configuration: either toggle the widget's default headers or
/// supply explicit labels. The widget accepts both forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderSpec {
    Enabled(bool),
    Labels(Vec<String>),
}

/// Widget look/behavior settings.
///
/// Open-ended configuration bag: recognized keys configure the widget, and
/// every field is optional. No identity beyond its field values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_headers: Option<HeaderSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_headers: Option<HeaderSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_widths: Option<Vec<u32>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_heights: Option<Vec<u32>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rows: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_cols: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cols: Option<u32>,

    /// Empty rows kept below the data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_spare_rows: Option<u32>,

    /// Empty columns kept right of the data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_spare_cols: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_wrap: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_menu: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_column_resize: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_row_resize: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_column_move: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_row_move: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_rows_top: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_columns_left: Option<u32>,

    /// Horizontal stretch mode: "all", "last" or "none".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stretch_h: Option<String>,

    /// Language pack tag (hyphen-separated, e.g. "de-DE").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Settings {
    /// Encode for the boundary.
    pub fn encode(&self) -> Result<String, EncodeError> {
        serde_json::to_string(self).map_err(|e| EncodeError(e.to_string()))
    }

    /// Decode a settings payload.
    pub fn decode(payload: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(payload).map_err(DecodeError::from_serde)
    }
}
