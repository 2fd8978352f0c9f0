//! Listener configuration: constant defaults, serde, environment overrides.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use f1_telemetry_protocol::{DEFAULT_PORT, PacketKind};
use serde::{Deserialize, Serialize};

use crate::error::{ListenerError, ListenerResult};

pub const ENV_BIND_ADDR: &str = "F1_TELEMETRY_BIND_ADDR";
pub const ENV_PORT: &str = "F1_TELEMETRY_UDP_PORT";
pub const ENV_RECV_BUFFER: &str = "F1_TELEMETRY_RECV_BUFFER";
pub const ENV_HEARTBEAT_MS: &str = "F1_TELEMETRY_HEARTBEAT_TIMEOUT_MS";

pub const DEFAULT_RECV_BUFFER: usize = 2048;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
pub const DEFAULT_RECV_TIMEOUT_MS: u64 = 64;
pub const DEFAULT_HEARTBEAT_TIMEOUT_MS: u64 = 2000;

/// UDP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Local address to bind; the game broadcasts to any interface.
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Size of the receive buffer; must hold the largest packet.
    pub recv_buffer: usize,
    /// Bound of the decoded-frame channel.
    pub channel_capacity: usize,
    /// How long a single receive waits before the loop re-checks for shutdown.
    pub recv_timeout_ms: u64,
    /// A datagram within this window means the game is sending.
    pub heartbeat_timeout_ms: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            recv_buffer: DEFAULT_RECV_BUFFER,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            recv_timeout_ms: DEFAULT_RECV_TIMEOUT_MS,
            heartbeat_timeout_ms: DEFAULT_HEARTBEAT_TIMEOUT_MS,
        }
    }
}

impl ListenerConfig {
    /// Defaults, overridden by any well-formed environment variable.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`; unparsable or zero values are ignored.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(addr) = lookup(ENV_BIND_ADDR).and_then(|v| v.trim().parse().ok()) {
            self.bind_addr = addr;
        }
        self.port = parse_nonzero(lookup(ENV_PORT)).unwrap_or(self.port);
        self.recv_buffer = parse_nonzero(lookup(ENV_RECV_BUFFER)).unwrap_or(self.recv_buffer);
        self.heartbeat_timeout_ms =
            parse_nonzero(lookup(ENV_HEARTBEAT_MS)).unwrap_or(self.heartbeat_timeout_ms);
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_bind_addr(mut self, addr: IpAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }

    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_millis(self.heartbeat_timeout_ms)
    }

    pub fn validate(&self) -> ListenerResult<()> {
        let largest = PacketKind::max_packet_size();
        if self.recv_buffer < largest {
            return Err(ListenerError::InvalidConfig(format!(
                "recv_buffer {} is smaller than the largest packet ({largest} bytes)",
                self.recv_buffer
            )));
        }
        if self.channel_capacity == 0 {
            return Err(ListenerError::InvalidConfig(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        if self.recv_timeout_ms == 0 {
            return Err(ListenerError::InvalidConfig(
                "recv_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_nonzero<T>(raw: Option<String>) -> Option<T>
where
    T: std::str::FromStr + PartialEq + Default,
{
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v != T::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_are_valid() -> TestResult {
        let config = ListenerConfig::default();
        assert_eq!(config.port, 20777);
        assert_eq!(config.recv_buffer, 2048);
        config.validate()?;
        Ok(())
    }

    #[test]
    fn env_overrides_apply() {
        let config = ListenerConfig::default().with_env_overrides(env(&[
            (ENV_BIND_ADDR, "127.0.0.1"),
            (ENV_PORT, "30777"),
            (ENV_RECV_BUFFER, "4096"),
            (ENV_HEARTBEAT_MS, "500"),
        ]));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:30777");
        assert_eq!(config.recv_buffer, 4096);
        assert_eq!(config.heartbeat_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn malformed_env_values_fall_back() {
        let config = ListenerConfig::default().with_env_overrides(env(&[
            (ENV_BIND_ADDR, "not-an-ip"),
            (ENV_PORT, "0"),
            (ENV_RECV_BUFFER, "lots"),
        ]));
        assert_eq!(config, ListenerConfig::default());
    }

    #[test]
    fn buffer_below_largest_packet_is_rejected() {
        let config = ListenerConfig {
            recv_buffer: 1459,
            ..ListenerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ListenerError::InvalidConfig(_))
        ));
        let exact = ListenerConfig {
            recv_buffer: 1460,
            ..ListenerConfig::default()
        };
        assert!(exact.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() -> TestResult {
        let config: ListenerConfig = serde_json::from_str(r#"{"port": 20888}"#)?;
        assert_eq!(config.port, 20888);
        assert_eq!(config.recv_buffer, DEFAULT_RECV_BUFFER);
        Ok(())
    }
}
