//! gridhost: server-side host for a browser-resident grid widget.
//!
//! The widget renders in a connected browser session; this crate is the
//! host-side half of the bridge. It serializes method calls into client-side
//! widget invocations and correlates asynchronous client responses back to
//! the waiting caller via generated correlation tokens.
//!
//! # Architecture
//!
//! - [`registry`] — one-shot map from correlation token to pending handler,
//!   one registry per response shape.
//! - [`channel`] — the [`WidgetChannel`] trait the embedding framework
//!   implements over its send-a-call-to-the-client mechanism.
//! - [`dispatch`] — encodes outbound invocations and forwards them.
//! - `receive` — the fixed entry points the widget calls back into.
//! - [`host`] — [`GridHost`], the facade applications interact with.
//! - [`harness`] — in-memory widget channel for tests and the smoke binary.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use gridhost::{GridHost, HostConfig};
//!
//! let host = GridHost::with_data(channel, HostConfig::default(), data)?;
//! host.retrieve_data_as_array(|rows| println!("{} rows", rows.len()))?;
//! // ...later, the framework routes the widget's reply:
//! host.receive_named("receiveDataAsArray", &token, &payload)?;
//! ```

pub mod channel;
pub mod dispatch;
pub mod error;
pub mod harness;
pub mod host;
mod receive;
pub mod registry;

pub use channel::{ChannelClosed, WidgetChannel};
pub use error::BridgeError;
pub use harness::WidgetHarness;
pub use host::{GridHost, HostConfig};
pub use registry::{CorrelationToken, PendingCalls};

pub use gridhost_protocol as protocol;
