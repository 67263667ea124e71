//! Outbound call dispatch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gridhost_protocol::{WidgetCall, WidgetFn};
use serde_json::Value;

use crate::channel::WidgetChannel;
use crate::error::BridgeError;

/// Encodes outbound invocations and forwards them over the widget channel.
pub struct CallDispatcher {
    channel: Arc<dyn WidgetChannel>,
    /// Total calls accepted for dispatch over this host's lifetime.
    dispatched: AtomicU64,
}

impl CallDispatcher {
    pub fn new(channel: Arc<dyn WidgetChannel>) -> Self {
        Self {
            channel,
            dispatched: AtomicU64::new(0),
        }
    }

    /// Dispatch a widget-scoped function call.
    pub fn invoke(&self, function: WidgetFn, args: Vec<Value>) -> Result<(), BridgeError> {
        self.forward(WidgetCall::new(function.name(), args))
    }

    /// Dispatch a raw call. Construction uses this for the page-level
    /// bootstrap function, which is not widget-scoped.
    pub fn invoke_raw(&self, call: WidgetCall) -> Result<(), BridgeError> {
        self.forward(call)
    }

    fn forward(&self, call: WidgetCall) -> Result<(), BridgeError> {
        log::debug!("dispatch {} ({} args)", call.function, call.args.len());
        self.channel
            .send_call(call)
            .map_err(|_| BridgeError::ChannelClosed)?;
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Total calls accepted for dispatch (for metrics).
    pub fn calls_dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::WidgetHarness;

    #[test]
    fn test_invoke_records_call_and_counts() {
        let harness = Arc::new(WidgetHarness::new());
        let dispatcher = CallDispatcher::new(harness.clone());

        dispatcher
            .invoke(WidgetFn::SetDataAtCell, vec![serde_json::json!(0)])
            .unwrap();

        assert_eq!(dispatcher.calls_dispatched(), 1);
        let calls = harness.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function, "$grid.setDataAtCell");
    }

    #[test]
    fn test_closed_channel_propagates() {
        let harness = Arc::new(WidgetHarness::new());
        harness.close();
        let dispatcher = CallDispatcher::new(harness);

        let err = dispatcher
            .invoke(WidgetFn::RetrieveData, vec![])
            .unwrap_err();
        assert!(matches!(err, BridgeError::ChannelClosed));
        assert_eq!(dispatcher.calls_dispatched(), 0);
    }
}
