//! End-to-end dispatch: raw datagram in, record or counted drop out.

use f1_telemetry_protocol::fixtures::{build_header_bytes, zeroed_packet};
use f1_telemetry_protocol::{
    DecoderTable, DispatchOutcome, Dispatcher, DropReason, HeaderRejection, MAX_CARS,
    PacketKind, PacketRecord,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn valid_lap_data_header_with_zeroed_body_yields_one_record() -> TestResult {
    let dispatcher = Dispatcher::new(DecoderTable::standard());
    let record = dispatcher
        .dispatch(&zeroed_packet(PacketKind::LapData, 0))
        .ok_or("expected a record")?;
    let PacketRecord::LapData(packet) = record else {
        return Err("expected lap data".into());
    };
    assert_eq!(packet.cars.len(), MAX_CARS);
    assert!(packet.cars.iter().all(|car| *car == Default::default()));

    let stats = dispatcher.stats();
    assert_eq!(stats.received, 1);
    assert_eq!(stats.decoded, 1);
    assert_eq!(stats.dropped, 0);
    Ok(())
}

#[test]
fn wrong_packet_format_is_dropped_as_invalid_header() {
    let dispatcher = Dispatcher::default();
    let mut datagram = build_header_bytes(2024, 2, 0);
    datagram.resize(PacketKind::LapData.packet_size(), 0);
    assert_eq!(
        dispatcher.classify(&datagram),
        DispatchOutcome::Dropped(DropReason::InvalidHeader(HeaderRejection::PacketFormat {
            found: 2024,
            expected: 2025
        }))
    );
    assert_eq!(dispatcher.stats().dropped_invalid_header, 1);
}

#[test]
fn out_of_range_packet_id_is_skipped_as_unknown() {
    let dispatcher = Dispatcher::default();
    let datagram = build_header_bytes(2025, 42, 0);
    assert_eq!(
        dispatcher.classify(&datagram),
        DispatchOutcome::Dropped(DropReason::UnknownKind(42))
    );
    let stats = dispatcher.stats();
    assert_eq!(stats.dropped_unknown_kind, 1);
    assert_eq!(stats.dropped_invalid_header, 0);
}

#[test]
fn short_datagram_is_dropped() {
    let dispatcher = Dispatcher::default();
    assert_eq!(dispatcher.dispatch(&[0u8; 10]), None);
    assert_eq!(dispatcher.stats().dropped_truncated, 1);
}

#[test]
fn truncated_body_is_counted_as_body_error() {
    let dispatcher = Dispatcher::default();
    let mut datagram = zeroed_packet(PacketKind::Participants, 0);
    datagram.truncate(datagram.len() - 1);
    let outcome = dispatcher.classify(&datagram);
    let DispatchOutcome::Dropped(DropReason::Body { kind, error }) = outcome else {
        panic!("expected a body drop, got {outcome:?}");
    };
    assert_eq!(kind, PacketKind::Participants);
    assert!(error.is_truncation());
    assert_eq!(dispatcher.stats().dropped_body_error, 1);
}

#[test]
fn records_come_out_in_input_order() -> TestResult {
    let dispatcher = Dispatcher::default();
    let order = [
        PacketKind::Session,
        PacketKind::Event,
        PacketKind::CarTelemetry,
        PacketKind::TyreSets,
    ];
    let kinds: Vec<PacketKind> = order
        .iter()
        .filter_map(|kind| dispatcher.dispatch(&zeroed_packet(*kind, 0)))
        .map(|record| record.kind())
        .collect();
    assert_eq!(kinds, order);
    Ok(())
}

#[test]
fn dispatcher_is_shareable_across_threads() -> TestResult {
    let dispatcher = std::sync::Arc::new(Dispatcher::default());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let dispatcher = std::sync::Arc::clone(&dispatcher);
            std::thread::spawn(move || {
                for _ in 0..25 {
                    let _record = dispatcher.dispatch(&zeroed_packet(PacketKind::CarStatus, 1));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().map_err(|_| "worker panicked")?;
    }
    assert_eq!(dispatcher.stats().decoded, 100);
    Ok(())
}
