//! Error types for f1tel

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Malformed capture file: {0}")]
    CaptureFormat(String),

    #[error("Listener error: {0}")]
    Listener(#[from] f1_telemetry_listener::ListenerError),
}
