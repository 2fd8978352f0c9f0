//! Command implementations for f1tel

pub mod decode;
pub mod listen;

use std::net::IpAddr;

use clap::Args;
use f1_telemetry_protocol::PacketKind;

#[derive(Args, Debug, Clone, Default)]
pub struct ListenArgs {
    /// UDP port to listen on (default 20777)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Local address to bind
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Only print these packet kinds (name or id, comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub kinds: Vec<PacketKind>,

    /// Stop after this many seconds
    #[arg(short, long)]
    pub duration: Option<u64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DecodeArgs {
    /// Raw datagram dumps or ORACAPv1 capture files
    #[arg(required = true)]
    pub files: Vec<String>,

    /// Only print these packet kinds (name or id, comma separated)
    #[arg(short, long, value_delimiter = ',')]
    pub kinds: Vec<PacketKind>,
}

/// Kinds to forward; an empty selection means all of them.
pub fn selected_kinds(kinds: &[PacketKind]) -> Vec<PacketKind> {
    if kinds.is_empty() {
        PacketKind::ALL.to_vec()
    } else {
        kinds.to_vec()
    }
}
