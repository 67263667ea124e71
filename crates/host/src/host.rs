//! Host facade: the server-side object applications use to control the widget.
//!
//! One `GridHost` serves one session. It exclusively owns the pending-call
//! registries; correlation tokens are scoped to its lifetime and nothing is
//! shared across hosts.
//!
//! Operations come in two patterns:
//! - fire-and-forget setters: encode, dispatch, return;
//! - asynchronous getters: register a handler, dispatch a call carrying the
//!   generated token, return immediately. The widget completes the request
//!   later through an inbound entry point (see `receive.rs`). Responses are
//!   matched purely by token, so out-of-order replies route correctly.

use std::sync::Arc;

use serde_json::{json, Value};

use gridhost_protocol::{
    cell_meta, data, AlterKind, CellMeta, EncodeError, Settings, WidgetCall, WidgetFn, CREATE_FN,
};

use crate::channel::WidgetChannel;
use crate::dispatch::CallDispatcher;
use crate::error::BridgeError;
use crate::registry::PendingCalls;

/// Construction-time host configuration.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Client-side mount reference the bootstrap function attaches to.
    pub target: String,
    /// Locale tag for the widget's language pack. Underscore-separated tags
    /// (as produced by some session APIs) are normalized to hyphens before
    /// crossing the boundary. Omitted from the bootstrap call when unset.
    pub locale: Option<String>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            target: "grid".to_string(),
            locale: None,
        }
    }
}

/// Server-side host for one browser-resident grid widget.
pub struct GridHost {
    pub(crate) dispatcher: CallDispatcher,
    pub(crate) pending_data: PendingCalls<Value>,
    pub(crate) pending_rows: PendingCalls<Vec<Vec<String>>>,
    pub(crate) pending_cells_meta: PendingCalls<Vec<CellMeta>>,
    pub(crate) pending_settings: PendingCalls<Settings>,
    pub(crate) pending_cell_values: PendingCalls<String>,
}

impl std::fmt::Debug for GridHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridHost").finish_non_exhaustive()
    }
}

impl GridHost {
    /// Create an empty grid. Dispatches exactly one bootstrap call.
    pub fn new(channel: Arc<dyn WidgetChannel>, config: HostConfig) -> Result<Self, BridgeError> {
        Self::construct(channel, config, None)
    }

    /// Create a grid initialized with `data`, forwarding its encoded form in
    /// the bootstrap call itself — no separate setData round trip. The top
    /// level of `data` must be a JSON array of row arrays.
    pub fn with_data(
        channel: Arc<dyn WidgetChannel>,
        config: HostConfig,
        data: Value,
    ) -> Result<Self, BridgeError> {
        ensure_array(&data, "initial data")?;
        Self::construct(channel, config, Some(data))
    }

    fn construct(
        channel: Arc<dyn WidgetChannel>,
        config: HostConfig,
        initial: Option<Value>,
    ) -> Result<Self, BridgeError> {
        let mut args = vec![json!(config.target)];
        if let Some(locale) = &config.locale {
            args.push(json!(locale_tag(locale)));
        }
        if let Some(data) = &initial {
            args.push(json!(data::encode_data(data)));
        }

        let dispatcher = CallDispatcher::new(channel);
        dispatcher.invoke_raw(WidgetCall::new(CREATE_FN, args))?;

        Ok(Self {
            dispatcher,
            pending_data: PendingCalls::new(),
            pending_rows: PendingCalls::new(),
            pending_cells_meta: PendingCalls::new(),
            pending_settings: PendingCalls::new(),
            pending_cell_values: PendingCalls::new(),
        })
    }

    // ── Fire-and-forget setters ─────────────────────────────────────

    /// Replace the grid's data. The top level must be a JSON array.
    pub fn set_data(&self, data: &Value) -> Result<(), BridgeError> {
        ensure_array(data, "data")?;
        self.dispatcher
            .invoke(WidgetFn::SetData, vec![json!(data::encode_data(data))])
    }

    /// Set one cell's value.
    pub fn set_data_at_cell(&self, row: u32, col: u32, value: &str) -> Result<(), BridgeError> {
        self.dispatcher.invoke(
            WidgetFn::SetDataAtCell,
            vec![json!(row), json!(col), json!(value)],
        )
    }

    /// Set metadata for the given cells.
    pub fn set_cells_meta(&self, cells: &[CellMeta]) -> Result<(), BridgeError> {
        let encoded = cell_meta::encode_cells_meta(cells)?;
        self.dispatcher
            .invoke(WidgetFn::SetCellsMeta, vec![json!(encoded)])
    }

    /// Replace the widget's settings. Full replacement, never a patch.
    pub fn set_settings(&self, settings: &Settings) -> Result<(), BridgeError> {
        let encoded = settings.encode()?;
        self.dispatcher
            .invoke(WidgetFn::SetSettings, vec![json!(encoded)])
    }

    /// Set the header structure for multi-row or merged headers.
    /// The top level must be a JSON array (one element per header row).
    pub fn set_nested_headers(&self, headers: &Value) -> Result<(), BridgeError> {
        ensure_array(headers, "nested headers")?;
        self.dispatcher
            .invoke(WidgetFn::SetNestedHeaders, vec![json!(data::encode_data(headers))])
    }

    /// Set CSS class names for the header cells.
    pub fn set_header_class_names(&self, class_names: &[String]) -> Result<(), BridgeError> {
        let encoded =
            serde_json::to_string(class_names).map_err(|e| EncodeError(e.to_string()))?;
        self.dispatcher
            .invoke(WidgetFn::SetHeaderClassNames, vec![json!(encoded)])
    }

    // ── Structural edits ────────────────────────────────────────────
    //
    // Index and amount are passed through unvalidated; bounds behavior
    // (negative index, zero amount) is widget-defined.

    /// Insert empty rows starting at `index`.
    pub fn insert_row(&self, index: i64, amount: i64) -> Result<(), BridgeError> {
        self.alter(AlterKind::InsertRow, index, amount)
    }

    /// Insert empty columns starting at `index`.
    pub fn insert_col(&self, index: i64, amount: i64) -> Result<(), BridgeError> {
        self.alter(AlterKind::InsertCol, index, amount)
    }

    /// Remove rows starting at `index`.
    pub fn remove_row(&self, index: i64, amount: i64) -> Result<(), BridgeError> {
        self.alter(AlterKind::RemoveRow, index, amount)
    }

    /// Remove columns starting at `index`.
    pub fn remove_col(&self, index: i64, amount: i64) -> Result<(), BridgeError> {
        self.alter(AlterKind::RemoveCol, index, amount)
    }

    fn alter(&self, kind: AlterKind, index: i64, amount: i64) -> Result<(), BridgeError> {
        self.dispatcher.invoke(
            WidgetFn::Alter,
            vec![json!(kind.keyword()), json!(index), json!(amount)],
        )
    }

    // ── Asynchronous getters ────────────────────────────────────────
    //
    // Callback-style: the call returns before the result is known. There is
    // no timeout and no cancellation; if the widget never responds, the
    // handler is never invoked.

    /// Retrieve the grid's data in the same structure passed to `set_data`.
    pub fn retrieve_data(
        &self,
        callback: impl FnOnce(Value) + Send + 'static,
    ) -> Result<(), BridgeError> {
        let token = self.pending_data.register(callback);
        let dispatched = self
            .dispatcher
            .invoke(WidgetFn::RetrieveData, vec![json!(token.to_string())]);
        self.unregister_on_error(dispatched, || {
            let _ = self.pending_data.resolve(&token);
        })
    }

    /// Retrieve the grid's data normalized to rows of strings.
    pub fn retrieve_data_as_array(
        &self,
        callback: impl FnOnce(Vec<Vec<String>>) + Send + 'static,
    ) -> Result<(), BridgeError> {
        let token = self.pending_rows.register(callback);
        let dispatched = self
            .dispatcher
            .invoke(WidgetFn::RetrieveDataAsArray, vec![json!(token.to_string())]);
        self.unregister_on_error(dispatched, || {
            let _ = self.pending_rows.resolve(&token);
        })
    }

    /// Retrieve metadata of all cells.
    pub fn retrieve_cells_meta(
        &self,
        callback: impl FnOnce(Vec<CellMeta>) + Send + 'static,
    ) -> Result<(), BridgeError> {
        let token = self.pending_cells_meta.register(callback);
        let dispatched = self
            .dispatcher
            .invoke(WidgetFn::RetrieveCellsMeta, vec![json!(token.to_string())]);
        self.unregister_on_error(dispatched, || {
            let _ = self.pending_cells_meta.resolve(&token);
        })
    }

    /// Retrieve the widget's current settings.
    pub fn retrieve_settings(
        &self,
        callback: impl FnOnce(Settings) + Send + 'static,
    ) -> Result<(), BridgeError> {
        let token = self.pending_settings.register(callback);
        let dispatched = self
            .dispatcher
            .invoke(WidgetFn::RetrieveSettings, vec![json!(token.to_string())]);
        self.unregister_on_error(dispatched, || {
            let _ = self.pending_settings.resolve(&token);
        })
    }

    /// Retrieve one cell's value as a string.
    pub fn retrieve_data_at_cell(
        &self,
        row: u32,
        col: u32,
        callback: impl FnOnce(String) + Send + 'static,
    ) -> Result<(), BridgeError> {
        let token = self.pending_cell_values.register(callback);
        let dispatched = self.dispatcher.invoke(
            WidgetFn::RetrieveDataAtCell,
            vec![json!(row), json!(col), json!(token.to_string())],
        );
        self.unregister_on_error(dispatched, || {
            let _ = self.pending_cell_values.resolve(&token);
        })
    }

    /// Keep "pending implies dispatched": a call that never reached the
    /// channel must not leave a handler behind.
    fn unregister_on_error(
        &self,
        dispatched: Result<(), BridgeError>,
        unregister: impl FnOnce(),
    ) -> Result<(), BridgeError> {
        if dispatched.is_err() {
            unregister();
        }
        dispatched
    }

    // ── Unwired operations ──────────────────────────────────────────

    /// Merge a block of cells. Not wired to the connector; always fails
    /// immediately with [`BridgeError::Unsupported`], regardless of
    /// arguments.
    pub fn merge_cells(
        &self,
        _row: u32,
        _col: u32,
        _rowspan: u32,
        _colspan: u32,
    ) -> Result<(), BridgeError> {
        Err(BridgeError::Unsupported("mergeCells"))
    }

    // ── Observability ───────────────────────────────────────────────

    /// Total calls accepted for dispatch over this host's lifetime.
    pub fn calls_dispatched(&self) -> u64 {
        self.dispatcher.calls_dispatched()
    }

    /// Calls still awaiting a widget response, across all response shapes.
    /// With no expiry mechanism, an unanswered call counts here forever.
    pub fn pending_responses(&self) -> usize {
        self.pending_data.len()
            + self.pending_rows.len()
            + self.pending_cells_meta.len()
            + self.pending_settings.len()
            + self.pending_cell_values.len()
    }
}

/// Normalize a locale tag to the hyphen-separated form the widget's
/// language packs use ("de_DE" → "de-DE").
fn locale_tag(raw: &str) -> String {
    raw.replace('_', "-")
}

fn ensure_array(value: &Value, what: &str) -> Result<(), BridgeError> {
    if value.is_array() {
        Ok(())
    } else {
        Err(BridgeError::Encode(EncodeError(format!(
            "{}: top level must be a JSON array",
            what
        ))))
    }
}
