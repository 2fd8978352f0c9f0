//! Wire-format packet builders for integration tests, benches and fuzz
//! seeds. Compiled only for tests or with the `test-helpers` feature.
//!
//! Every builder starts from a zero-filled body of the exact published size
//! and patches in only the fields it is given.

use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::packets::car_status::CAR_STATUS_ENTRY_SIZE;
use crate::packets::car_telemetry::CAR_TELEMETRY_ENTRY_SIZE;
use crate::packets::event::EventCode;
use crate::packets::lap_data::LAP_DATA_ENTRY_SIZE;
use crate::packets::session_history::LAP_HISTORY_ENTRY_SIZE;
use crate::{HEADER_SIZE, MAX_CARS, NO_CAR, PACKET_FORMAT_2025};

/// Header for `kind` with fixed, recognisable frame metadata.
pub fn fixture_header(kind: PacketKind, player_index: u8) -> PacketHeader {
    PacketHeader {
        packet_format: PACKET_FORMAT_2025,
        game_year: 25,
        game_major_version: 1,
        game_minor_version: 0,
        packet_version: 1,
        packet_id: kind.id(),
        session_uid: 0x0123_4567_89AB_CDEF,
        session_time: 12.5,
        frame_identifier: 100,
        overall_frame_identifier: 100,
        player_car_index: player_index,
        secondary_player_car_index: NO_CAR,
    }
}

/// Raw header bytes with an arbitrary packet format and id.
pub fn build_header_bytes(packet_format: u16, packet_id: u8, player_index: u8) -> Vec<u8> {
    let header = PacketHeader {
        packet_format,
        packet_id,
        ..fixture_header(PacketKind::Motion, player_index)
    };
    header.to_bytes().to_vec()
}

/// Header plus an all-zero body of the exact size for `kind`.
pub fn zeroed_packet(kind: PacketKind, player_index: u8) -> Vec<u8> {
    let mut buf = fixture_header(kind, player_index).to_bytes().to_vec();
    buf.resize(kind.packet_size(), 0);
    buf
}

/// Copy `bytes` into `buf` at `offset`; out-of-range writes are ignored.
fn put(buf: &mut [u8], offset: usize, bytes: &[u8]) {
    if let Some(dst) = buf.get_mut(offset..offset.saturating_add(bytes.len())) {
        dst.copy_from_slice(bytes);
    }
}

fn car_offset(player_index: u8, leading: usize, stride: usize) -> usize {
    HEADER_SIZE + leading + usize::from(player_index).min(MAX_CARS - 1) * stride
}

/// Car telemetry packet with the player's entry filled in.
pub fn build_car_telemetry_packet(
    player_index: u8,
    speed_kmh: u16,
    gear: i8,
    engine_rpm: u16,
    throttle: f32,
    brake: f32,
) -> Vec<u8> {
    let mut buf = zeroed_packet(PacketKind::CarTelemetry, player_index);
    let at = car_offset(player_index, 0, CAR_TELEMETRY_ENTRY_SIZE);
    put(&mut buf, at, &speed_kmh.to_le_bytes());
    put(&mut buf, at + 2, &throttle.to_le_bytes());
    put(&mut buf, at + 10, &brake.to_le_bytes());
    put(&mut buf, at + 15, &gear.to_le_bytes());
    put(&mut buf, at + 16, &engine_rpm.to_le_bytes());
    buf
}

/// Car status packet with fuel, ERS and visual compound for the player.
pub fn build_car_status_packet(
    player_index: u8,
    fuel_in_tank: f32,
    ers_store_energy: f32,
    visual_tyre_compound: u8,
) -> Vec<u8> {
    let mut buf = zeroed_packet(PacketKind::CarStatus, player_index);
    let at = car_offset(player_index, 0, CAR_STATUS_ENTRY_SIZE);
    put(&mut buf, at + 5, &fuel_in_tank.to_le_bytes());
    put(&mut buf, at + 26, &[visual_tyre_compound]);
    put(&mut buf, at + 37, &ers_store_energy.to_le_bytes());
    buf
}

/// Lap data packet with the player's timing filled in.
pub fn build_lap_data_packet(
    player_index: u8,
    last_lap_time_ms: u32,
    sector1_ms: u32,
    sector2_ms: u32,
    car_position: u8,
    current_lap_num: u8,
) -> Vec<u8> {
    let mut buf = zeroed_packet(PacketKind::LapData, player_index);
    let at = car_offset(player_index, 0, LAP_DATA_ENTRY_SIZE);
    put(&mut buf, at, &last_lap_time_ms.to_le_bytes());
    put(&mut buf, at + 8, &split_bytes(sector1_ms));
    put(&mut buf, at + 11, &split_bytes(sector2_ms));
    put(&mut buf, at + 32, &[car_position, current_lap_num]);
    buf
}

/// Session packet with track, session type, weather and marshal zone count.
pub fn build_session_packet(
    track_id: i8,
    session_type: u8,
    weather: u8,
    total_laps: u8,
    num_marshal_zones: u8,
) -> Vec<u8> {
    let mut buf = zeroed_packet(PacketKind::Session, 0);
    put(&mut buf, HEADER_SIZE, &[weather]);
    put(&mut buf, HEADER_SIZE + 3, &[total_laps]);
    put(&mut buf, HEADER_SIZE + 6, &[session_type]);
    put(&mut buf, HEADER_SIZE + 7, &track_id.to_le_bytes());
    put(&mut buf, HEADER_SIZE + 18, &[num_marshal_zones]);
    buf
}

/// Event packet with `code` and up to 12 payload bytes.
pub fn build_event_packet(code: EventCode, payload: &[u8]) -> Vec<u8> {
    let mut buf = zeroed_packet(PacketKind::Event, 0);
    put(&mut buf, HEADER_SIZE, code.as_bytes());
    let payload = payload.get(..payload.len().min(12)).unwrap_or_default();
    put(&mut buf, HEADER_SIZE + 4, payload);
    buf
}

/// `FTLP` event for `vehicle_idx` with a lap time in seconds.
pub fn build_fastest_lap_event(vehicle_idx: u8, lap_time: f32) -> Vec<u8> {
    let mut payload = vec![vehicle_idx];
    payload.extend_from_slice(&lap_time.to_le_bytes());
    build_event_packet(EventCode::FASTEST_LAP, &payload)
}

/// Session history for `car_idx`; each lap is `(lap_time_ms, valid_flags)`.
pub fn build_session_history_packet(car_idx: u8, laps: &[(u32, u8)]) -> Vec<u8> {
    let mut buf = zeroed_packet(PacketKind::SessionHistory, 0);
    let count = u8::try_from(laps.len()).unwrap_or(u8::MAX);
    put(&mut buf, HEADER_SIZE, &[car_idx, count]);
    for (i, (lap_time_ms, flags)) in laps.iter().enumerate() {
        let at = HEADER_SIZE + 7 + i * LAP_HISTORY_ENTRY_SIZE;
        put(&mut buf, at, &lap_time_ms.to_le_bytes());
        put(&mut buf, at + 13, &[*flags]);
    }
    buf
}

/// Lap positions packet; `rows[lap][car]` is the wire cell (0 = no data).
pub fn build_lap_positions_packet(lap_start: u8, rows: &[[u8; MAX_CARS]]) -> Vec<u8> {
    let mut buf = zeroed_packet(PacketKind::LapPositions, 0);
    let count = u8::try_from(rows.len()).unwrap_or(u8::MAX);
    put(&mut buf, HEADER_SIZE, &[count, lap_start]);
    for (i, row) in rows.iter().enumerate() {
        put(&mut buf, HEADER_SIZE + 2 + i * MAX_CARS, row);
    }
    buf
}

/// `(ms part, minutes part)` wire encoding of a split time.
fn split_bytes(total_ms: u32) -> [u8; 3] {
    let minutes = u8::try_from(total_ms / 60_000).unwrap_or(u8::MAX);
    let ms = u16::try_from(total_ms % 60_000).unwrap_or(0);
    let [lo, hi] = ms.to_le_bytes();
    [lo, hi, minutes]
}
