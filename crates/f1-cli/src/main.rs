//! f1tel - F1 25 telemetry listener and capture decoder

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod capture;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{DecodeArgs, ListenArgs};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "f1tel")]
#[command(about = "Listen for and decode F1 25 UDP telemetry")]
#[command(version)]
struct Cli {
    /// Output JSON lines instead of one-line summaries
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen on UDP and print every decoded packet
    Listen(ListenArgs),

    /// Decode raw datagram dumps or capture files
    Decode(DecodeArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "f1tel={log_level},f1_telemetry_listener={log_level},f1_telemetry_protocol={log_level}"
                )
                .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let exit_code = match e.downcast_ref::<CliError>() {
                Some(CliError::InvalidConfiguration(_)) | Some(CliError::CaptureFormat(_)) => 4,
                Some(CliError::Listener(_)) => 5,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Listen(args) => commands::listen::execute(args, cli.json).await,
        Commands::Decode(args) => commands::decode::execute(args, cli.json).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use f1_telemetry_protocol::PacketKind;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_listen_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["f1tel", "listen"])?;
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
        let Commands::Listen(args) = cli.command else {
            return Err("expected listen".into());
        };
        assert!(args.kinds.is_empty());
        assert!(args.duration.is_none());
        Ok(())
    }

    #[test]
    fn parse_listen_with_kinds_and_port() -> TestResult {
        let cli = Cli::try_parse_from([
            "f1tel",
            "-vv",
            "listen",
            "--port",
            "20888",
            "--kinds",
            "lap_data,6,Event",
            "--json",
        ])?;
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        let Commands::Listen(args) = cli.command else {
            return Err("expected listen".into());
        };
        assert_eq!(args.port, Some(20888));
        assert_eq!(
            args.kinds,
            vec![PacketKind::LapData, PacketKind::CarTelemetry, PacketKind::Event]
        );
        Ok(())
    }

    #[test]
    fn parse_rejects_unknown_kind() {
        let result = Cli::try_parse_from(["f1tel", "listen", "--kinds", "tyres"]);
        assert!(result.is_err());
    }

    #[test]
    fn decode_requires_files() -> TestResult {
        assert!(Cli::try_parse_from(["f1tel", "decode"]).is_err());
        let cli = Cli::try_parse_from(["f1tel", "decode", "a.bin", "b.cap"])?;
        let Commands::Decode(args) = cli.command else {
            return Err("expected decode".into());
        };
        assert_eq!(args.files, vec!["a.bin", "b.cap"]);
        Ok(())
    }
}
