//! F1 UDP wire format: layout constants and packet decoders.
//!
//! Every datagram starts with a fixed 29-byte [`PacketHeader`]. The packet id
//! in the header selects the body layout. The three decoded body kinds are a
//! repeating array of fixed-size per-car records, one per car on the grid:
//!
//! | Packet id | Kind          | Record size |
//! |-----------|---------------|-------------|
//! | 0         | Motion        | 60 bytes    |
//! | 2         | Lap data      | 54 bytes    |
//! | 6         | Car telemetry | 60 bytes    |
//!
//! All multi-byte values are little-endian. Record decoders are tolerant of
//! short datagrams: they return every complete record that fits and silently
//! drop a partial trailing record. Only a buffer too short for the header is
//! an error.

pub mod car_telemetry;
pub mod header;
pub mod lap_data;
pub mod motion;
pub mod reader;

pub use car_telemetry::{CarTelemetryRecord, Wheel, decode_car_telemetry};
pub use header::{PacketHeader, decode_header};
pub use lap_data::{LapDataRecord, decode_lap_data};
pub use motion::{CarMotionRecord, decode_motion};
pub use reader::ByteReader;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{Result, TelemetryError};

/// Size of the common packet header in bytes.
pub const HEADER_SIZE: usize = 29;

/// Size of one per-car motion record.
pub const MOTION_RECORD_SIZE: usize = 60;

/// Size of one per-car lap data record.
pub const LAP_DATA_RECORD_SIZE: usize = 54;

/// Size of one per-car telemetry record.
pub const CAR_TELEMETRY_RECORD_SIZE: usize = 60;

/// Maximum number of per-car records in a packet.
pub const MAX_CARS: usize = 22;

/// Secondary player index value meaning "no second player".
pub const NO_SECONDARY_PLAYER: u8 = 255;

/// Default UDP port the game sends telemetry to.
pub const DEFAULT_PORT: u16 = 20777;

/// Receive buffer size; larger than any packet the game emits.
pub const MAX_DATAGRAM_SIZE: usize = 2048;

/// Packet type identifiers carried in byte 6 of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
#[repr(u8)]
pub enum PacketId {
    Motion = 0,
    Session = 1,
    LapData = 2,
    Event = 3,
    Participants = 4,
    CarSetups = 5,
    CarTelemetry = 6,
    CarStatus = 7,
    FinalClassification = 8,
    LobbyInfo = 9,
    CarDamage = 10,
    SessionHistory = 11,
    TyreSets = 12,
    MotionEx = 13,
}

impl PacketId {
    /// Map a raw packet id byte to a known packet type.
    pub fn from_u8(id: u8) -> Option<Self> {
        let packet = match id {
            0 => PacketId::Motion,
            1 => PacketId::Session,
            2 => PacketId::LapData,
            3 => PacketId::Event,
            4 => PacketId::Participants,
            5 => PacketId::CarSetups,
            6 => PacketId::CarTelemetry,
            7 => PacketId::CarStatus,
            8 => PacketId::FinalClassification,
            9 => PacketId::LobbyInfo,
            10 => PacketId::CarDamage,
            11 => PacketId::SessionHistory,
            12 => PacketId::TyreSets,
            13 => PacketId::MotionEx,
            _ => return None,
        };
        Some(packet)
    }

    /// Raw wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether this crate decodes the packet body.
    pub fn is_decoded(self) -> bool {
        matches!(self, PacketId::Motion | PacketId::LapData | PacketId::CarTelemetry)
    }

    /// Per-car record size for decoded packet kinds.
    pub fn record_size(self) -> Option<usize> {
        match self {
            PacketId::Motion => Some(MOTION_RECORD_SIZE),
            PacketId::LapData => Some(LAP_DATA_RECORD_SIZE),
            PacketId::CarTelemetry => Some(CAR_TELEMETRY_RECORD_SIZE),
            _ => None,
        }
    }
}

/// A fixed-size per-car record that repeats after the header.
pub(crate) trait CarRecord: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Name used in diagnostics.
    const KIND: &'static str;

    /// Decode one record. The reader holds exactly `SIZE` bytes.
    fn decode(reader: &mut ByteReader<'_>) -> Result<Self>;
}

/// Decode the repeating per-car array that follows the header.
///
/// Stops at the first incomplete record and never returns more than
/// [`MAX_CARS`] records.
pub(crate) fn decode_car_array<R: CarRecord>(buf: &[u8], header: &PacketHeader) -> Result<Vec<R>> {
    if buf.len() < HEADER_SIZE {
        return Err(TelemetryError::truncated("packet header", HEADER_SIZE, buf.len()));
    }

    let records: Vec<R> = buf[HEADER_SIZE..]
        .chunks_exact(R::SIZE)
        .take(MAX_CARS)
        .map_while(|chunk| R::decode(&mut ByteReader::new(chunk)).ok())
        .collect();

    trace!(
        kind = R::KIND,
        frame = header.frame_identifier,
        buf_len = buf.len(),
        records = records.len(),
        "Decoded per-car records"
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packet_ids_round_trip_through_raw_byte() {
        for id in 0u8..=13 {
            let packet = PacketId::from_u8(id).expect("ids 0..=13 are known");
            assert_eq!(packet.as_u8(), id);
        }
        assert_eq!(PacketId::from_u8(14), None);
        assert_eq!(PacketId::from_u8(255), None);
    }

    #[test]
    fn only_three_packet_kinds_are_decoded() {
        let decoded: Vec<PacketId> =
            (0u8..=13).filter_map(PacketId::from_u8).filter(|p| p.is_decoded()).collect();
        assert_eq!(decoded, vec![PacketId::Motion, PacketId::LapData, PacketId::CarTelemetry]);
        assert_eq!(PacketId::CarStatus.record_size(), None);
        assert_eq!(PacketId::LapData.record_size(), Some(54));
    }

    #[test]
    fn full_grid_fits_in_receive_buffer() {
        let largest = [MOTION_RECORD_SIZE, LAP_DATA_RECORD_SIZE, CAR_TELEMETRY_RECORD_SIZE]
            .into_iter()
            .max()
            .unwrap_or_default();
        assert!(HEADER_SIZE + MAX_CARS * largest <= MAX_DATAGRAM_SIZE);
    }
}
