//! Outbound boundary to the browser-side widget.
//!
//! The host never talks to the widget directly; it hands each call to a
//! [`WidgetChannel`] the embedding framework implements over its own
//! send-a-call-to-the-client mechanism. One channel serves one session.

use std::fmt;

use gridhost_protocol::WidgetCall;

/// The per-session channel to the widget is gone (session ended, page
/// detached). Calls cannot be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelClosed;

impl fmt::Display for ChannelClosed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget channel closed")
    }
}

impl std::error::Error for ChannelClosed {}

/// Outbound half of the widget message channel.
///
/// Delivery is fire-and-forget: `Ok` means the call was accepted for
/// dispatch, not that the widget finished processing it. Replies travel
/// through a correlation token plus a later inbound entry point, never
/// through this call's return channel.
pub trait WidgetChannel: Send + Sync {
    fn send_call(&self, call: WidgetCall) -> Result<(), ChannelClosed>;
}
