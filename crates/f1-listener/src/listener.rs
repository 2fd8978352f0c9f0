//! Tokio UDP intake: socket → dispatcher → frame channel.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use f1_telemetry_protocol::{DecoderTable, DispatchStats, Dispatcher};
use tokio::net::UdpSocket;
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::config::ListenerConfig;
use crate::error::{ListenerError, ListenerResult};
use crate::frame::{DecodedFrame, FrameReceiver, telemetry_now_ns};

/// Receives F1 25 datagrams on one UDP socket and forwards decoded records.
///
/// Each datagram is decoded exactly once, in arrival order. Datagrams that
/// fail to decode are counted by the dispatcher and never reach the channel.
pub struct UdpListener {
    config: ListenerConfig,
    dispatcher: Arc<Dispatcher>,
    last_packet_ns: Arc<AtomicU64>,
    running: Mutex<Option<Running>>,
    local_addr: Mutex<Option<SocketAddr>>,
}

/// Handles for one started receive loop.
struct Running {
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl UdpListener {
    /// Listener using every built-in decoder.
    pub fn new(config: ListenerConfig) -> Self {
        Self::with_table(config, DecoderTable::standard())
    }

    pub fn with_table(config: ListenerConfig, table: DecoderTable) -> Self {
        Self {
            config,
            dispatcher: Arc::new(Dispatcher::new(table)),
            last_packet_ns: Arc::new(AtomicU64::new(0)),
            running: Mutex::new(None),
            local_addr: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }

    /// Bind the socket and spawn the receive loop.
    ///
    /// The loop ends when [`stop`](Self::stop) is called or the returned
    /// receiver is dropped. A listener whose loop has ended can be started
    /// again.
    pub async fn start(&self) -> ListenerResult<FrameReceiver> {
        self.config.validate()?;
        let mut running = self.running.lock().await;
        if let Some(previous) = running.as_ref() {
            if !previous.task.is_finished() {
                return Err(ListenerError::AlreadyRunning);
            }
            debug!("previous receive loop already ended");
        }

        let addr = self.config.socket_addr();
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| ListenerError::Bind { addr, source })?;
        let bound = socket.local_addr()?;
        *self.local_addr.lock().await = Some(bound);
        info!(addr = %bound, "F1 telemetry listener bound");

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let (tx, rx) = mpsc::channel(self.config.channel_capacity);
        let receive_loop = ReceiveLoop {
            socket,
            dispatcher: Arc::clone(&self.dispatcher),
            last_packet_ns: Arc::clone(&self.last_packet_ns),
            buf: vec![0u8; self.config.recv_buffer],
            recv_timeout: self.config.recv_timeout(),
        };
        let task = tokio::spawn(receive_loop.run(tx, shutdown_rx));
        *running = Some(Running { shutdown_tx, task });

        Ok(rx)
    }

    /// Signal the receive loop to exit and wait for it to release the
    /// socket. A no-op when not running.
    pub async fn stop(&self) {
        let running = self.running.lock().await.take();
        if let Some(Running { shutdown_tx, task }) = running {
            info!(stats = %self.stats(), "F1 telemetry listener stopping");
            if shutdown_tx.send(()).is_err() {
                debug!("receive loop had already exited");
            }
            if let Err(err) = task.await {
                warn!(error = %err, "receive loop did not finish cleanly");
            }
        }
        *self.local_addr.lock().await = None;
    }

    /// Address the socket is actually bound to, once started.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock().await
    }

    /// True when a datagram arrived within the heartbeat timeout.
    pub fn is_receiving(&self) -> bool {
        let last = self.last_packet_ns.load(Ordering::Relaxed);
        if last == 0 {
            return false;
        }
        let elapsed_ns = u128::from(telemetry_now_ns()).saturating_sub(u128::from(last));
        elapsed_ns <= self.config.heartbeat_timeout().as_nanos()
    }

    pub fn stats(&self) -> DispatchStats {
        self.dispatcher.stats()
    }
}

struct ReceiveLoop {
    socket: UdpSocket,
    dispatcher: Arc<Dispatcher>,
    last_packet_ns: Arc<AtomicU64>,
    buf: Vec<u8>,
    recv_timeout: std::time::Duration,
}

impl ReceiveLoop {
    async fn run(mut self, tx: mpsc::Sender<DecodedFrame>, mut shutdown: broadcast::Receiver<()>) {
        let mut sequence = 0u64;
        loop {
            let received = tokio::select! {
                _ = shutdown.recv() => {
                    debug!("shutdown requested");
                    break;
                }
                () = tx.closed() => {
                    debug!("frame receiver dropped");
                    break;
                }
                received = tokio::time::timeout(self.recv_timeout, self.socket.recv(&mut self.buf)) => received,
            };

            let len = match received {
                Ok(Ok(len)) => len,
                Ok(Err(err)) => {
                    warn!(error = %err, "UDP receive error");
                    continue;
                }
                Err(_) => {
                    trace!("UDP receive timeout");
                    continue;
                }
            };

            let received_at_ns = telemetry_now_ns();
            // zero is reserved for "never"
            self.last_packet_ns
                .store(received_at_ns.max(1), Ordering::Relaxed);

            let Some(datagram) = self.buf.get(..len) else {
                continue;
            };
            let Some(record) = self.dispatcher.dispatch(datagram) else {
                continue;
            };
            let frame = DecodedFrame::new(record, received_at_ns, sequence, len);
            tokio::select! {
                _ = shutdown.recv() => {
                    debug!(sequence, "shutdown requested while forwarding");
                    break;
                }
                sent = tx.send(frame) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
            sequence = sequence.saturating_add(1);
        }
        info!(stats = %self.dispatcher.stats(), "F1 telemetry receive loop ended");
    }
}
