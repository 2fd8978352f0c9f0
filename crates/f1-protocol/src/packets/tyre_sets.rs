//! Tyre sets packet (id 12): the 20 sets allocated to one car.

use serde::Serialize;

use super::body_reader;
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::reader::{ByteReader, read_strided};
use crate::Result;

/// 13 dry sets followed by 7 wet sets.
pub const NUM_TYRE_SETS: usize = 20;
pub const TYRE_SET_ENTRY_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TyreSetData {
    pub actual_tyre_compound: u8,
    pub visual_tyre_compound: u8,
    /// Percent.
    pub wear: u8,
    pub available: bool,
    pub recommended_session: u8,
    /// Laps left in this set.
    pub life_span: u8,
    /// Maximum laps recommended for this compound.
    pub usable_life: u8,
    /// Lap delta to the fitted set, milliseconds.
    pub lap_delta_time_ms: i16,
    pub fitted: bool,
}

impl TyreSetData {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            actual_tyre_compound: r.u8()?,
            visual_tyre_compound: r.u8()?,
            wear: r.u8()?,
            available: r.flag()?,
            recommended_session: r.u8()?,
            life_span: r.u8()?,
            usable_life: r.u8()?,
            lap_delta_time_ms: r.i16_le()?,
            fitted: r.flag()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TyreSetsPacket {
    pub header: PacketHeader,
    pub car_idx: u8,
    pub tyre_sets: [TyreSetData; NUM_TYRE_SETS],
    pub fitted_idx: u8,
}

impl TyreSetsPacket {
    /// The set the car is running, by the trailing fitted index.
    pub fn fitted(&self) -> Option<&TyreSetData> {
        self.tyre_sets.get(usize::from(self.fitted_idx))
    }

    pub fn available(&self) -> impl Iterator<Item = &TyreSetData> {
        self.tyre_sets.iter().filter(|set| set.available)
    }
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<TyreSetsPacket> {
    let mut r = body_reader(PacketKind::TyreSets, body)?;
    let car_idx = r.u8()?;
    let tyre_sets = read_strided(&mut r, TYRE_SET_ENTRY_SIZE, TyreSetData::read)?;
    Ok(TyreSetsPacket {
        header,
        car_idx,
        tyre_sets,
        fitted_idx: r.u8()?,
    })
}
