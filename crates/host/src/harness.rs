//! Widget harness for exercising the bridge without a browser session.
//!
//! `WidgetHarness` is an in-memory [`WidgetChannel`] that records every
//! outbound call in dispatch order. Tests (and the smoke binary) script the
//! widget's side of a conversation by reading the recorded calls and driving
//! the host's inbound entry points with synthesized responses.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use gridhost_protocol::WidgetCall;

use crate::channel::{ChannelClosed, WidgetChannel};

#[derive(Default)]
pub struct WidgetHarness {
    calls: Mutex<Vec<WidgetCall>>,
    closed: AtomicBool,
}

impl WidgetHarness {
    pub fn new() -> Self {
        Self::default()
    }

    /// All outbound calls recorded so far, in dispatch order.
    pub fn calls(&self) -> Vec<WidgetCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The calls addressed to `function`, in dispatch order.
    pub fn calls_to(&self, function: &str) -> Vec<WidgetCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.function == function)
            .cloned()
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The correlation token of the most recent call to `function`.
    ///
    /// Retrieval calls carry their token as the last argument.
    pub fn last_token_for(&self, function: &str) -> Option<String> {
        self.calls_to(function)
            .last()
            .and_then(|call| call.args.last().cloned())
            .and_then(|arg| arg.as_str().map(String::from))
    }

    /// Close the channel: every later dispatch fails with [`ChannelClosed`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl WidgetChannel for WidgetHarness {
    fn send_call(&self, call: WidgetCall) -> Result<(), ChannelClosed> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ChannelClosed);
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_harness_records_in_dispatch_order() {
        let harness = WidgetHarness::new();
        harness
            .send_call(WidgetCall::new("$grid.first", vec![]))
            .unwrap();
        harness
            .send_call(WidgetCall::new("$grid.second", vec![json!("tok-1")]))
            .unwrap();

        assert_eq!(harness.call_count(), 2);
        assert_eq!(harness.calls()[0].function, "$grid.first");
        assert_eq!(
            harness.last_token_for("$grid.second"),
            Some("tok-1".to_string())
        );
    }

    #[test]
    fn test_closed_harness_rejects_calls() {
        let harness = WidgetHarness::new();
        harness.close();
        let err = harness
            .send_call(WidgetCall::new("$grid.setData", vec![]))
            .unwrap_err();
        assert_eq!(err, ChannelClosed);
        assert_eq!(harness.call_count(), 0);
    }
}
