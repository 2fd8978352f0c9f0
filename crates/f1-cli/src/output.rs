//! Output formatting for decoded records

use async_trait::async_trait;
use f1_telemetry_listener::{DecodedFrame, ListenerResult, RecordSink};
use f1_telemetry_protocol::{DispatchOutcome, DispatchStats, PacketRecord};
use serde_json::json;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Writes one human-readable line per frame.
pub struct SummarySink<W> {
    writer: W,
}

impl<W> SummarySink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W> RecordSink for SummarySink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn accept(&mut self, frame: DecodedFrame) -> ListenerResult<()> {
        let line = format!("#{:<6} {}\n", frame.sequence, summary_line(&frame.record));
        self.writer.write_all(line.as_bytes()).await?;
        Ok(())
    }

    async fn flush(&mut self) -> ListenerResult<()> {
        self.writer.flush().await?;
        Ok(())
    }
}

/// Summary prefixed with the frame identifier.
pub fn summary_line(record: &PacketRecord) -> String {
    format!("[frame {}] {}", record.frame_identifier(), record.summary())
}

/// Render one decode outcome for `f1tel decode`.
pub fn render_outcome(
    file: &str,
    index: usize,
    outcome: &DispatchOutcome,
    json: bool,
) -> Result<String, serde_json::Error> {
    match (outcome, json) {
        (DispatchOutcome::Decoded(record), true) => serde_json::to_string(&json!({
            "file": file,
            "index": index,
            "record": record,
        })),
        (DispatchOutcome::Dropped(reason), true) => serde_json::to_string(&json!({
            "file": file,
            "index": index,
            "dropped": reason.to_string(),
        })),
        (DispatchOutcome::Decoded(record), false) => {
            Ok(format!("{file}#{index}: {}", summary_line(record)))
        }
        (DispatchOutcome::Dropped(reason), false) => {
            Ok(format!("{file}#{index}: dropped ({reason})"))
        }
    }
}

pub fn print_stats(stats: &DispatchStats, json: bool) {
    if json {
        match serde_json::to_string(&json!({ "stats": stats })) {
            Ok(s) => eprintln!("{}", s),
            Err(e) => eprintln!("Failed to format stats as JSON: {}", e),
        }
    } else {
        eprintln!("{}", stats);
    }
}

pub fn print_error_human(error: &anyhow::Error) {
    eprintln!("Error: {}", error);
    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  Caused by: {}", err);
        source = err.source();
    }
}

pub fn print_error_json(error: &anyhow::Error) {
    let error_json = json!({
        "success": false,
        "error": { "message": error.to_string() }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to format error as JSON: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use f1_telemetry_protocol::fixtures::{build_fastest_lap_event, zeroed_packet};
    use f1_telemetry_protocol::{Dispatcher, PacketKind, decode_datagram};

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn decoded_outcome_human() -> TestResult {
        let dispatcher = Dispatcher::default();
        let outcome = dispatcher.classify(&build_fastest_lap_event(3, 83.456));
        insta::assert_snapshot!(
            render_outcome("lap.bin", 0, &outcome, false)?,
            @"lap.bin#0: [frame 100] Event FTLP Fastest Lap"
        );
        Ok(())
    }

    #[test]
    fn dropped_outcome_human() -> TestResult {
        let dispatcher = Dispatcher::default();
        let outcome = dispatcher.classify(&[0u8; 4]);
        insta::assert_snapshot!(
            render_outcome("junk.bin", 2, &outcome, false)?,
            @"junk.bin#2: dropped (truncated input: need 29 bytes at offset 0, have 4)"
        );
        Ok(())
    }

    #[test]
    fn dropped_outcome_json() -> TestResult {
        let dispatcher = Dispatcher::default();
        let outcome = dispatcher.classify(&[0u8; 4]);
        let value: serde_json::Value =
            serde_json::from_str(&render_outcome("junk.bin", 2, &outcome, true)?)?;
        assert_eq!(value["index"], 2);
        assert!(value["dropped"].is_string());
        Ok(())
    }

    #[tokio::test]
    async fn summary_sink_numbers_lines() -> TestResult {
        let record = decode_datagram(&zeroed_packet(PacketKind::LobbyInfo, 0))?;
        let mut sink = SummarySink::new(Vec::new());
        sink.accept(DecodedFrame::new(record, 0, 7, 954)).await?;
        let out = String::from_utf8(sink.into_inner())?;
        assert_eq!(out, "#7      [frame 100] LobbyInfo 0 players, 0 ready\n");
        Ok(())
    }
}
