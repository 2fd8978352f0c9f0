//! Listener error types

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Errors raised at the intake boundary.
///
/// Decode failures never show up here; they are counted by the dispatcher.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The UDP socket could not be bound
    #[error("failed to bind UDP socket on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// Configuration rejected by [`ListenerConfig::validate`](crate::ListenerConfig::validate)
    #[error("invalid listener configuration: {0}")]
    InvalidConfig(String),

    /// The listener is already running
    #[error("listener already started")]
    AlreadyRunning,

    /// A sink's downstream side has gone away
    #[error("record sink closed")]
    SinkClosed,

    /// Serializing a record for output failed
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type ListenerResult<T> = Result<T, ListenerError>;
