//! End-to-end bridge tests: host dispatches, a scripted widget responds.
//!
//! The widget side is played by `WidgetHarness`: tests read the recorded
//! outbound calls (including the correlation token each retrieval carried)
//! and answer through the host's inbound entry points.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;

use gridhost::protocol::{HeaderSpec, Settings, WidgetFn};
use gridhost::{GridHost, HostConfig, WidgetHarness};

fn host_with_harness() -> (Arc<WidgetHarness>, GridHost) {
    let harness = Arc::new(WidgetHarness::new());
    let host = GridHost::new(harness.clone(), HostConfig::default()).unwrap();
    (harness, host)
}

#[test]
fn retrieve_data_round_trips_raw_value() {
    let (harness, host) = host_with_harness();

    let received = Arc::new(Mutex::new(None));
    let slot = received.clone();
    host.retrieve_data(move |value| {
        *slot.lock().unwrap() = Some(value);
    })
    .unwrap();

    let token = harness.last_token_for(WidgetFn::RetrieveData.name()).unwrap();
    host.receive_data(&token, r#"[["a",5],["c",null]]"#).unwrap();

    assert_eq!(
        received.lock().unwrap().take().unwrap(),
        json!([["a", 5], ["c", null]])
    );
    assert_eq!(host.pending_responses(), 0);
}

#[test]
fn retrieve_data_as_array_coerces_scalars() {
    let (harness, host) = host_with_harness();

    let received = Arc::new(Mutex::new(None));
    let slot = received.clone();
    host.retrieve_data_as_array(move |rows| {
        *slot.lock().unwrap() = Some(rows);
    })
    .unwrap();

    let token = harness
        .last_token_for(WidgetFn::RetrieveDataAsArray.name())
        .unwrap();
    host.receive_rows(&token, r#"[[5,"a",true]]"#).unwrap();

    let rows = received.lock().unwrap().take().unwrap();
    assert_eq!(rows, vec![vec!["5".to_string(), "a".to_string(), "true".to_string()]]);
}

#[test]
fn retrieve_cells_meta_invokes_handler_once_in_order() {
    let (harness, host) = host_with_harness();

    let invocations = Arc::new(AtomicUsize::new(0));
    let received = Arc::new(Mutex::new(Vec::new()));
    let count = invocations.clone();
    let slot = received.clone();
    host.retrieve_cells_meta(move |cells| {
        count.fetch_add(1, Ordering::SeqCst);
        *slot.lock().unwrap() = cells;
    })
    .unwrap();

    let token = harness
        .last_token_for(WidgetFn::RetrieveCellsMeta.name())
        .unwrap();
    host.receive_cells_meta(
        &token,
        r#"[{"row":0,"col":0,"readOnly":true},{"row":1,"col":2,"className":"warn"}]"#,
    )
    .unwrap();

    assert_eq!(invocations.load(Ordering::SeqCst), 1);
    let cells = received.lock().unwrap();
    assert_eq!(cells.len(), 2);
    assert_eq!((cells[0].row, cells[0].col), (0, 0));
    assert_eq!(cells[0].read_only, Some(true));
    assert_eq!((cells[1].row, cells[1].col), (1, 2));
    assert_eq!(cells[1].class_name.as_deref(), Some("warn"));
}

#[test]
fn retrieve_settings_round_trips() {
    let (harness, host) = host_with_harness();

    let received = Arc::new(Mutex::new(None));
    let slot = received.clone();
    host.retrieve_settings(move |settings| {
        *slot.lock().unwrap() = Some(settings);
    })
    .unwrap();

    let token = harness
        .last_token_for(WidgetFn::RetrieveSettings.name())
        .unwrap();
    host.receive_settings(&token, r#"{"colHeaders":["A","B"],"readOnly":false}"#)
        .unwrap();

    let settings: Settings = received.lock().unwrap().take().unwrap();
    assert_eq!(
        settings.col_headers,
        Some(HeaderSpec::Labels(vec!["A".to_string(), "B".to_string()]))
    );
    assert_eq!(settings.read_only, Some(false));
}

#[test]
fn retrieve_data_at_cell_is_identity_passthrough() {
    let (harness, host) = host_with_harness();

    let received = Arc::new(Mutex::new(None));
    let slot = received.clone();
    host.retrieve_data_at_cell(4, 1, move |value| {
        *slot.lock().unwrap() = Some(value);
    })
    .unwrap();

    let call = harness
        .calls_to(WidgetFn::RetrieveDataAtCell.name())
        .pop()
        .unwrap();
    assert_eq!(call.args[0], json!(4));
    assert_eq!(call.args[1], json!(1));
    let token = call.args[2].as_str().unwrap().to_string();

    // The payload is already final: no JSON layer, delivered verbatim.
    host.receive_cell_value(&token, "=SUM(A1:A3)").unwrap();
    assert_eq!(received.lock().unwrap().take().as_deref(), Some("=SUM(A1:A3)"));
}

#[test]
fn out_of_order_responses_route_by_token() {
    let (harness, host) = host_with_harness();

    let first = Arc::new(Mutex::new(None));
    let second = Arc::new(Mutex::new(None));

    let slot = first.clone();
    host.retrieve_data_at_cell(0, 0, move |v| *slot.lock().unwrap() = Some(v))
        .unwrap();
    let slot = second.clone();
    host.retrieve_data_at_cell(0, 1, move |v| *slot.lock().unwrap() = Some(v))
        .unwrap();

    let calls = harness.calls_to(WidgetFn::RetrieveDataAtCell.name());
    let token_first = calls[0].args[2].as_str().unwrap();
    let token_second = calls[1].args[2].as_str().unwrap();

    // Answer the second request before the first.
    host.receive_cell_value(token_second, "beta").unwrap();
    host.receive_cell_value(token_first, "alpha").unwrap();

    assert_eq!(first.lock().unwrap().take().as_deref(), Some("alpha"));
    assert_eq!(second.lock().unwrap().take().as_deref(), Some("beta"));
}

#[test]
fn receive_named_routes_to_matching_entry_point() {
    let (harness, host) = host_with_harness();

    let received = Arc::new(Mutex::new(None));
    let slot = received.clone();
    host.retrieve_data_as_array(move |rows| {
        *slot.lock().unwrap() = Some(rows);
    })
    .unwrap();

    let token = harness
        .last_token_for(WidgetFn::RetrieveDataAsArray.name())
        .unwrap();
    host.receive_named("receiveDataAsArray", &token, r#"[["x"]]"#)
        .unwrap();

    assert_eq!(
        received.lock().unwrap().take().unwrap(),
        vec![vec!["x".to_string()]]
    );
}

#[test]
fn setters_and_getters_interleave_without_blocking() {
    // set_settings then retrieve_settings before any response: two
    // independent outbound calls, two distinct tokens.
    let (harness, host) = host_with_harness();

    host.set_settings(&Settings {
        min_spare_rows: Some(1),
        ..Default::default()
    })
    .unwrap();
    host.retrieve_settings(|_| {}).unwrap();
    host.retrieve_settings(|_| {}).unwrap();

    assert_eq!(harness.calls_to(WidgetFn::SetSettings.name()).len(), 1);
    let retrieves = harness.calls_to(WidgetFn::RetrieveSettings.name());
    assert_eq!(retrieves.len(), 2);
    assert_ne!(retrieves[0].args[0], retrieves[1].args[0]);

    // Both getters returned without their responses; nothing resolved yet.
    assert_eq!(host.pending_responses(), 2);
}
