//! `f1tel listen`: stream decoded records from the game.

use std::time::Duration;

use anyhow::{Context, Result};
use f1_telemetry_listener::{
    FrameReceiver, JsonLinesSink, KindFilter, ListenerConfig, RecordSink, UdpListener, pump,
};
use tracing::info;

use crate::commands::{ListenArgs, selected_kinds};
use crate::error::CliError;
use crate::output::{SummarySink, print_stats};

pub async fn execute(args: &ListenArgs, json: bool) -> Result<()> {
    if args.duration == Some(0) {
        return Err(CliError::InvalidConfiguration("--duration must be > 0".to_string()).into());
    }
    let mut config = ListenerConfig::from_env();
    if let Some(port) = args.port {
        config = config.with_port(port);
    }
    if let Some(bind) = args.bind {
        config = config.with_bind_addr(bind);
    }

    let listener = UdpListener::new(config);
    let frames = listener
        .start()
        .await
        .map_err(CliError::from)
        .with_context(|| format!("failed to start listener on {}", listener.config().socket_addr()))?;
    info!(addr = ?listener.local_addr().await, "listening for F1 25 telemetry");

    let kinds = selected_kinds(&args.kinds);
    let duration = args.duration.map(Duration::from_secs);
    let delivered = if json {
        let mut sink = KindFilter::new(&kinds, JsonLinesSink::new(tokio::io::stdout()));
        run(&listener, frames, &mut sink, duration).await?
    } else {
        let mut sink = KindFilter::new(&kinds, SummarySink::new(tokio::io::stdout()));
        run(&listener, frames, &mut sink, duration).await?
    };

    info!(delivered, "listener finished");
    print_stats(&listener.stats(), json);
    Ok(())
}

/// Pump frames into `sink` until Ctrl-C, the optional deadline, or the
/// listener closing the channel.
async fn run<S: RecordSink>(
    listener: &UdpListener,
    frames: FrameReceiver,
    sink: &mut S,
    duration: Option<Duration>,
) -> Result<u64> {
    let pumping = pump(frames, sink);
    tokio::pin!(pumping);

    let delivered = tokio::select! {
        result = &mut pumping => result?,
        () = shutdown_signal(duration) => {
            listener.stop().await;
            pumping.await?
        }
    };
    Ok(delivered)
}

async fn shutdown_signal(duration: Option<Duration>) {
    let deadline = async {
        match duration {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(err) = result {
                tracing::warn!(error = %err, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        }
        () = deadline => {}
    }
}
