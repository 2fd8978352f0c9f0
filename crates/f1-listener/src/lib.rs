//! UDP intake for F1 25 telemetry.
//!
//! [`UdpListener`] binds a tokio UDP socket, hands every datagram to a
//! [`Dispatcher`](f1_telemetry_protocol::Dispatcher) and forwards decoded
//! records as [`DecodedFrame`]s over a bounded channel. [`RecordSink`]s and
//! [`pump`] take it from there.
//!
//! ## Modules
//! - `config` - listener settings with environment overrides
//! - `listener` - socket and receive loop
//! - `sink` - channel, JSON-lines and kind-filter sinks
//! - `frame` - decoded frame type and monotonic clock

#![deny(static_mut_refs)]

pub mod config;
pub mod error;
pub mod frame;
pub mod listener;
pub mod sink;

pub use config::ListenerConfig;
pub use error::{ListenerError, ListenerResult};
pub use frame::{DecodedFrame, FrameReceiver, telemetry_now_ns};
pub use listener::UdpListener;
pub use sink::{ChannelSink, JsonLinesSink, KindFilter, RecordSink, pump};
