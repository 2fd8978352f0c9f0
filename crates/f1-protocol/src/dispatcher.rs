//! Header-first dispatch of raw datagrams to body decoders.
//!
//! The dispatcher never fails: every datagram ends up either as one
//! [`PacketRecord`] or as a counted drop with a [`DropReason`].

use core::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::error::{DecodeError, HeaderRejection};
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::record::{BodyDecoder, PacketRecord, standard_decoder};
use crate::HEADER_SIZE;

/// Immutable `kind → decoder` table, built once and handed to a
/// [`Dispatcher`].
#[derive(Clone, Copy)]
pub struct DecoderTable {
    decoders: [Option<BodyDecoder>; PacketKind::COUNT],
}

impl DecoderTable {
    /// A table with nothing registered.
    pub fn empty() -> Self {
        Self {
            decoders: [None; PacketKind::COUNT],
        }
    }

    /// All sixteen built-in decoders.
    pub fn standard() -> Self {
        PacketKind::ALL
            .into_iter()
            .fold(Self::empty(), |table, kind| table.with(kind, standard_decoder(kind)))
    }

    /// Register (or replace) the decoder for `kind`.
    #[must_use]
    pub fn with(mut self, kind: PacketKind, decoder: BodyDecoder) -> Self {
        if let Some(slot) = self.decoders.get_mut(kind.index()) {
            *slot = Some(decoder);
        }
        self
    }

    /// Remove the decoder for `kind`; its datagrams will be skipped.
    #[must_use]
    pub fn without(mut self, kind: PacketKind) -> Self {
        if let Some(slot) = self.decoders.get_mut(kind.index()) {
            *slot = None;
        }
        self
    }

    /// Keep only the decoders for `kinds`.
    #[must_use]
    pub fn only(self, kinds: &[PacketKind]) -> Self {
        PacketKind::ALL
            .into_iter()
            .filter(|kind| !kinds.contains(kind))
            .fold(self, Self::without)
    }

    pub fn get(&self, kind: PacketKind) -> Option<BodyDecoder> {
        self.decoders.get(kind.index()).copied().flatten()
    }

    pub fn is_registered(&self, kind: PacketKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn kinds(&self) -> impl Iterator<Item = PacketKind> + '_ {
        PacketKind::ALL
            .into_iter()
            .filter(|kind| self.is_registered(*kind))
    }
}

impl Default for DecoderTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for DecoderTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}

/// Why a datagram produced no record.
#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    /// Shorter than the 29-byte header.
    Truncated { len: usize },
    /// Header parsed but refused.
    InvalidHeader(HeaderRejection),
    /// The packet id is outside 0..=15.
    UnknownKind(u8),
    /// The kind is valid but the table has no decoder for it.
    Unregistered(PacketKind),
    /// The body decoder returned an error.
    Body { kind: PacketKind, error: DecodeError },
    /// The body decoder panicked.
    Panicked(PacketKind),
}

impl DropReason {
    /// The drop expressed as a [`DecodeError`].
    pub fn to_error(&self) -> DecodeError {
        match self {
            DropReason::Truncated { len } => DecodeError::TruncatedInput {
                offset: 0,
                needed: HEADER_SIZE,
                available: *len,
            },
            DropReason::InvalidHeader(rejection) => DecodeError::InvalidHeader(*rejection),
            DropReason::UnknownKind(id) => DecodeError::UnknownPacketKind(*id),
            DropReason::Unregistered(kind) => DecodeError::UnknownPacketKind(kind.id()),
            DropReason::Body { error, .. } => error.clone(),
            DropReason::Panicked(kind) => DecodeError::DecoderPanic { kind: *kind },
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Unregistered(kind) => write!(f, "no decoder registered for {kind}"),
            other => write!(f, "{}", other.to_error()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Decoded(PacketRecord),
    Dropped(DropReason),
}

impl DispatchOutcome {
    pub fn record(self) -> Option<PacketRecord> {
        match self {
            DispatchOutcome::Decoded(record) => Some(record),
            DispatchOutcome::Dropped(_) => None,
        }
    }

    pub fn is_decoded(&self) -> bool {
        matches!(self, DispatchOutcome::Decoded(_))
    }
}

/// Point-in-time copy of the dispatcher counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DispatchStats {
    pub received: u64,
    pub decoded: u64,
    pub dropped: u64,
    pub dropped_truncated: u64,
    pub dropped_invalid_header: u64,
    pub dropped_unknown_kind: u64,
    pub dropped_body_error: u64,
    pub dropped_panic: u64,
}

impl DispatchStats {
    /// Fraction of received datagrams that were dropped.
    pub fn drop_rate(&self) -> f64 {
        if self.received == 0 {
            return 0.0;
        }
        self.dropped as f64 / self.received as f64
    }
}

impl fmt::Display for DispatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "received={} decoded={} dropped={} (truncated={} invalid_header={} unknown_kind={} body_error={} panic={})",
            self.received,
            self.decoded,
            self.dropped,
            self.dropped_truncated,
            self.dropped_invalid_header,
            self.dropped_unknown_kind,
            self.dropped_body_error,
            self.dropped_panic
        )
    }
}

#[derive(Debug, Default)]
struct Counters {
    received: AtomicU64,
    decoded: AtomicU64,
    truncated: AtomicU64,
    invalid_header: AtomicU64,
    unknown_kind: AtomicU64,
    body_error: AtomicU64,
    panic: AtomicU64,
}

impl Counters {
    #[inline]
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_drop(&self, reason: &DropReason) {
        let counter = match reason {
            DropReason::Truncated { .. } => &self.truncated,
            DropReason::InvalidHeader(_) => &self.invalid_header,
            DropReason::UnknownKind(_) | DropReason::Unregistered(_) => &self.unknown_kind,
            DropReason::Body { .. } => &self.body_error,
            DropReason::Panicked(_) => &self.panic,
        };
        Self::bump(counter);
    }

    fn snapshot(&self) -> DispatchStats {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        let dropped_truncated = load(&self.truncated);
        let dropped_invalid_header = load(&self.invalid_header);
        let dropped_unknown_kind = load(&self.unknown_kind);
        let dropped_body_error = load(&self.body_error);
        let dropped_panic = load(&self.panic);
        DispatchStats {
            received: load(&self.received),
            decoded: load(&self.decoded),
            dropped: dropped_truncated
                .saturating_add(dropped_invalid_header)
                .saturating_add(dropped_unknown_kind)
                .saturating_add(dropped_body_error)
                .saturating_add(dropped_panic),
            dropped_truncated,
            dropped_invalid_header,
            dropped_unknown_kind,
            dropped_body_error,
            dropped_panic,
        }
    }
}

/// Routes datagrams through a [`DecoderTable`] and keeps drop counters.
///
/// Safe to share between tasks; counters are relaxed atomics and never gate
/// decoding.
#[derive(Debug, Default)]
pub struct Dispatcher {
    table: DecoderTable,
    counters: Counters,
}

impl Dispatcher {
    pub fn new(table: DecoderTable) -> Self {
        Self {
            table,
            counters: Counters::default(),
        }
    }

    pub fn table(&self) -> &DecoderTable {
        &self.table
    }

    /// Decode one datagram, discarding the drop reason.
    pub fn dispatch(&self, datagram: &[u8]) -> Option<PacketRecord> {
        self.classify(datagram).record()
    }

    /// Decode one datagram and report what happened to it.
    pub fn classify(&self, datagram: &[u8]) -> DispatchOutcome {
        Counters::bump(&self.counters.received);
        match self.route(datagram) {
            Ok(record) => {
                Counters::bump(&self.counters.decoded);
                DispatchOutcome::Decoded(record)
            }
            Err(reason) => {
                self.counters.record_drop(&reason);
                DispatchOutcome::Dropped(reason)
            }
        }
    }

    pub fn stats(&self) -> DispatchStats {
        self.counters.snapshot()
    }

    fn route(&self, datagram: &[u8]) -> Result<PacketRecord, DropReason> {
        let len = datagram.len();
        let header = PacketHeader::decode(datagram).map_err(|err| {
            warn!(error = %err, len, "dropping datagram shorter than header");
            DropReason::Truncated { len }
        })?;

        if let Err(rejection) = header.validate() {
            if let HeaderRejection::PacketKind { found } = rejection {
                debug!(packet_id = found, len, "skipping unknown packet kind");
                return Err(DropReason::UnknownKind(found));
            }
            warn!(reason = %rejection, len, "dropping datagram with invalid header");
            return Err(DropReason::InvalidHeader(rejection));
        }
        let Some(kind) = header.kind() else {
            return Err(DropReason::UnknownKind(header.packet_id));
        };

        let Some(decoder) = self.table.get(kind) else {
            debug!(%kind, "no decoder registered, skipping");
            return Err(DropReason::Unregistered(kind));
        };

        let body = datagram.get(HEADER_SIZE..).unwrap_or_default();
        match catch_unwind(AssertUnwindSafe(|| decoder(header, body))) {
            Ok(Ok(record)) => Ok(record),
            Ok(Err(error)) => {
                warn!(
                    %kind,
                    packet_version = header.packet_version,
                    error = %error,
                    len,
                    "failed to decode packet body"
                );
                Err(DropReason::Body { kind, error })
            }
            Err(_panic) => {
                error!(%kind, len, "packet decoder panicked");
                Err(DropReason::Panicked(kind))
            }
        }
    }
}
