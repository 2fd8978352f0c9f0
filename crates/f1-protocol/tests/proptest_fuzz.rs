//! Property tests: no input may panic the decoders or the dispatcher.

use f1_telemetry_protocol::fixtures::fixture_header;
use f1_telemetry_protocol::{
    DispatchOutcome, Dispatcher, DropReason, PacketHeader, PacketKind, decode_datagram,
    standard_decoder,
};
use proptest::prelude::*;

fn any_kind() -> impl Strategy<Value = PacketKind> {
    (0u8..16).prop_filter_map("valid packet id", PacketKind::from_id)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn dispatch_no_panic_on_arbitrary_bytes(
        data in proptest::collection::vec(any::<u8>(), 0..2048)
    ) {
        let dispatcher = Dispatcher::default();
        let outcome = dispatcher.classify(&data);
        prop_assert!(!matches!(outcome, DispatchOutcome::Dropped(DropReason::Panicked(_))));
        let stats = dispatcher.stats();
        prop_assert_eq!(stats.received, 1);
        prop_assert_eq!(stats.decoded + stats.dropped, 1);
    }

    #[test]
    fn exact_size_random_body_decodes_or_fails_cleanly(
        kind in any_kind(),
        seed in proptest::collection::vec(any::<u8>(), 1..64)
    ) {
        let body: Vec<u8> = seed.iter().copied().cycle().take(kind.body_size()).collect();
        let header = fixture_header(kind, 0);
        match standard_decoder(kind)(header, &body) {
            Ok(record) => prop_assert_eq!(record.kind(), kind),
            Err(err) => prop_assert!(!err.is_truncation(), "{kind}: {err}"),
        }
    }

    #[test]
    fn any_shorter_body_is_rejected(kind in any_kind(), cut in 1usize..64) {
        let size = kind.body_size();
        let body = vec![0u8; size.saturating_sub(cut)];
        let result = standard_decoder(kind)(fixture_header(kind, 0), &body);
        prop_assert!(matches!(result, Err(ref err) if err.is_truncation()));
    }

    #[test]
    fn header_round_trips_through_wire_form(
        format in any::<u16>(),
        id in any::<u8>(),
        uid in any::<u64>(),
        frame in any::<u32>(),
        player in any::<u8>(),
    ) {
        let header = PacketHeader {
            packet_format: format,
            packet_id: id,
            session_uid: uid,
            frame_identifier: frame,
            player_car_index: player,
            ..fixture_header(PacketKind::Motion, 0)
        };
        let decoded = PacketHeader::decode(&header.to_bytes());
        prop_assert_eq!(decoded, Ok(header));
        prop_assert_eq!(header.is_valid(), format == 2025 && id < 16 && player < 22);
    }

    #[test]
    fn datagram_decode_never_panics(
        kind in any_kind(),
        tail in proptest::collection::vec(any::<u8>(), 0..1500)
    ) {
        let mut datagram = fixture_header(kind, 0).to_bytes().to_vec();
        datagram.extend_from_slice(&tail);
        let _outcome = decode_datagram(&datagram);
    }
}
