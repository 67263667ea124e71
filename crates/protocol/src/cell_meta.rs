//! Per-cell metadata crossing the boundary as a JSON array of objects.

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};

/// Style/behavior metadata for one cell.
///
/// `row` and `col` are required; everything else is optional widget
/// configuration. Properties this struct does not name survive round trips
/// through the flattened `extra` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellMeta {
    pub row: u32,
    pub col: u32,

    /// CSS class applied to the cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    /// Cell type (e.g. "text", "numeric", "dropdown").
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub cell_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub renderer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Permitted values for dropdown/autocomplete cells.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Vec<String>>,

    /// Unrecognized properties, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CellMeta {
    /// Metadata for the cell at (row, col) with no properties set.
    pub fn new(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            class_name: None,
            read_only: None,
            cell_type: None,
            renderer: None,
            editor: None,
            source: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Encode a metadata list as a JSON array of objects.
pub fn encode_cells_meta(cells: &[CellMeta]) -> Result<String, EncodeError> {
    serde_json::to_string(cells).map_err(|e| EncodeError(e.to_string()))
}

/// Decode a metadata list.
///
/// The top-level array is parsed first, then each element is decoded
/// independently so a failure is traceable to its element index. One bad
/// element fails the whole batch.
pub fn decode_cells_meta(payload: &str) -> Result<Vec<CellMeta>, DecodeError> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(DecodeError::from_serde)?;
    let items = value
        .as_array()
        .ok_or_else(|| DecodeError::Shape("cells-meta payload is not a JSON array".to_string()))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<CellMeta>(item.clone()).map_err(|e| DecodeError::Element {
                index,
                message: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_meta_serializes_camel_case_and_omits_unset() {
        let mut meta = CellMeta::new(2, 3);
        meta.class_name = Some("highlight".to_string());
        meta.read_only = Some(true);

        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains(r#""className":"highlight""#));
        assert!(json.contains(r#""readOnly":true"#));
        // Unset keys are omitted, never emitted as null.
        assert!(!json.contains("renderer"));
        assert!(!json.contains("null"));
    }

    #[test]
    fn test_unknown_properties_survive_round_trip() {
        let payload = r#"[{"row":0,"col":1,"type":"dropdown","source":["a","b"],"strict":true}]"#;
        let cells = decode_cells_meta(payload).unwrap();
        assert_eq!(cells[0].cell_type.as_deref(), Some("dropdown"));
        assert_eq!(cells[0].extra["strict"], serde_json::json!(true));

        let encoded = encode_cells_meta(&cells).unwrap();
        assert!(encoded.contains(r#""strict":true"#));
    }

    #[test]
    fn test_decode_preserves_array_order() {
        let payload = r#"[{"row":5,"col":0},{"row":1,"col":9}]"#;
        let cells = decode_cells_meta(payload).unwrap();
        assert_eq!((cells[0].row, cells[0].col), (5, 0));
        assert_eq!((cells[1].row, cells[1].col), (1, 9));
    }

    #[test]
    fn test_malformed_element_fails_whole_batch() {
        // Element 1 of 3 is missing "col".
        let payload = r#"[{"row":0,"col":0},{"row":1},{"row":2,"col":2}]"#;
        let err = decode_cells_meta(payload).unwrap_err();
        match err {
            DecodeError::Element { index, .. } => assert_eq!(index, 1),
            other => panic!("expected Element error, got {:?}", other),
        }
    }
}
