//! `f1tel decode`: decode captured datagrams offline.

use anyhow::{Context, Result};
use f1_telemetry_protocol::{DispatchOutcome, Dispatcher};
use tracing::{debug, warn};

use crate::capture::read_datagrams;
use crate::commands::{DecodeArgs, selected_kinds};
use crate::output::{print_stats, render_outcome};

pub async fn execute(args: &DecodeArgs, json: bool) -> Result<()> {
    let dispatcher = Dispatcher::default();
    let kinds = selected_kinds(&args.kinds);

    for file in &args.files {
        let bytes = tokio::fs::read(file)
            .await
            .with_context(|| format!("failed to read capture file '{}'", file))?;
        let datagrams =
            read_datagrams(&bytes).with_context(|| format!("failed to parse '{}'", file))?;
        debug!(file = %file, datagrams = datagrams.len(), "decoding capture");

        for (index, datagram) in datagrams.iter().enumerate() {
            if datagram.is_cut() {
                warn!(
                    file = %file,
                    index,
                    stored = datagram.data.len(),
                    original = datagram.original_len,
                    "datagram was cut during capture"
                );
            }
            let outcome = dispatcher.classify(&datagram.data);
            if let DispatchOutcome::Decoded(record) = &outcome
                && !kinds.contains(&record.kind())
            {
                continue;
            }
            println!("{}", render_outcome(file, index, &outcome, json)?);
        }
    }

    print_stats(&dispatcher.stats(), json);
    Ok(())
}
