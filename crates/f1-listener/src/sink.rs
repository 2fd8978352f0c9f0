//! Record sinks and the pump that drives frames into them.

use async_trait::async_trait;
use f1_telemetry_protocol::PacketKind;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::error::{ListenerError, ListenerResult};
use crate::frame::{DecodedFrame, FrameReceiver};

/// Consumer of decoded frames.
#[async_trait]
pub trait RecordSink: Send {
    async fn accept(&mut self, frame: DecodedFrame) -> ListenerResult<()>;

    async fn flush(&mut self) -> ListenerResult<()> {
        Ok(())
    }
}

/// Forwards frames to another channel.
pub struct ChannelSink {
    tx: mpsc::Sender<DecodedFrame>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<DecodedFrame>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl RecordSink for ChannelSink {
    async fn accept(&mut self, frame: DecodedFrame) -> ListenerResult<()> {
        self.tx
            .send(frame)
            .await
            .map_err(|_| ListenerError::SinkClosed)
    }
}

/// Writes one JSON object per frame, newline-terminated.
pub struct JsonLinesSink<W> {
    writer: W,
    lines: u64,
}

impl<W> JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    pub fn lines_written(&self) -> u64 {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W> RecordSink for JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn accept(&mut self, frame: DecodedFrame) -> ListenerResult<()> {
        let mut line = serde_json::to_vec(&frame)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.lines = self.lines.saturating_add(1);
        Ok(())
    }

    async fn flush(&mut self) -> ListenerResult<()> {
        self.writer.flush().await?;
        Ok(())
    }
}

/// Passes only frames of the selected kinds to `inner`.
pub struct KindFilter<S> {
    allowed: [bool; PacketKind::COUNT],
    inner: S,
}

impl<S: RecordSink> KindFilter<S> {
    pub fn new(kinds: &[PacketKind], inner: S) -> Self {
        let mut allowed = [false; PacketKind::COUNT];
        for kind in kinds {
            if let Some(slot) = allowed.get_mut(usize::from(kind.id())) {
                *slot = true;
            }
        }
        Self { allowed, inner }
    }

    pub fn allows(&self, kind: PacketKind) -> bool {
        self.allowed
            .get(usize::from(kind.id()))
            .copied()
            .unwrap_or(false)
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

#[async_trait]
impl<S: RecordSink> RecordSink for KindFilter<S> {
    async fn accept(&mut self, frame: DecodedFrame) -> ListenerResult<()> {
        if self.allows(frame.kind()) {
            self.inner.accept(frame).await
        } else {
            Ok(())
        }
    }

    async fn flush(&mut self) -> ListenerResult<()> {
        self.inner.flush().await
    }
}

/// Drive every frame from `frames` into `sink`, in order, until the channel
/// closes. Returns the number of frames delivered.
pub async fn pump<S>(mut frames: FrameReceiver, sink: &mut S) -> ListenerResult<u64>
where
    S: RecordSink + ?Sized,
{
    let mut delivered = 0u64;
    while let Some(frame) = frames.recv().await {
        sink.accept(frame).await?;
        delivered = delivered.saturating_add(1);
    }
    sink.flush().await?;
    Ok(delivered)
}
