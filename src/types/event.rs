//! Events produced for each accepted datagram.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

use crate::wire::{CarMotionRecord, CarTelemetryRecord, LapDataRecord, PacketHeader, PacketId};

/// Player record decoded from one of the three supported packet kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum PacketData {
    Motion(CarMotionRecord),
    LapData(LapDataRecord),
    CarTelemetry(CarTelemetryRecord),
}

impl PacketData {
    pub fn packet_id(&self) -> PacketId {
        match self {
            PacketData::Motion(_) => PacketId::Motion,
            PacketData::LapData(_) => PacketId::LapData,
            PacketData::CarTelemetry(_) => PacketId::CarTelemetry,
        }
    }
}

/// The player crossed the line and started a new lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct LapCompleted {
    /// Last-lap time carried by the record that preceded the new lap.
    pub last_lap_time_ms: u32,
    /// The lap now being driven.
    pub lap_number: u8,
}

/// The player moved into a different sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SectorChanged {
    pub previous_sector: u8,
    pub sector: u8,
}

/// Sectors are shown 1-based; out-of-range raw bytes saturate instead of
/// wrapping.
impl std::fmt::Display for SectorChanged {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sector {} -> {}",
            self.previous_sector.saturating_add(1),
            self.sector.saturating_add(1)
        )
    }
}

/// One accepted datagram.
///
/// Recognized packet kinds without a decoder produce a header-only event
/// with `data == None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub header: PacketHeader,
    pub received_at: SystemTime,
    pub data: Option<PacketData>,
    pub lap_completed: Option<LapCompleted>,
    pub sector_changed: Option<SectorChanged>,
}

impl TelemetryEvent {
    pub(crate) fn new(header: PacketHeader, data: Option<PacketData>) -> Self {
        Self {
            header,
            received_at: SystemTime::now(),
            data,
            lap_completed: None,
            sector_changed: None,
        }
    }

    /// Packet type from the header; events are only built for known ids.
    pub fn packet_type(&self) -> Option<PacketId> {
        self.header.packet_type()
    }

    pub fn motion(&self) -> Option<&CarMotionRecord> {
        match &self.data {
            Some(PacketData::Motion(record)) => Some(record),
            _ => None,
        }
    }

    pub fn lap_data(&self) -> Option<&LapDataRecord> {
        match &self.data {
            Some(PacketData::LapData(record)) => Some(record),
            _ => None,
        }
    }

    pub fn car_telemetry(&self) -> Option<&CarTelemetryRecord> {
        match &self.data {
            Some(PacketData::CarTelemetry(record)) => Some(record),
            _ => None,
        }
    }

    pub fn is_header_only(&self) -> bool {
        self.data.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_header;

    #[test]
    fn sector_change_displays_one_based() {
        let change = SectorChanged { previous_sector: 2, sector: 0 };
        assert_eq!(change.to_string(), "Sector 3 -> 1");
    }

    #[test]
    fn garbage_sector_byte_does_not_overflow() {
        let change = SectorChanged { previous_sector: 255, sector: 254 };
        assert_eq!(change.to_string(), "Sector 255 -> 255");
    }

    #[test]
    fn header_only_event_has_no_record() {
        let event = TelemetryEvent::new(sample_header(PacketId::Session, 0), None);
        assert!(event.is_header_only());
        assert_eq!(event.packet_type(), Some(PacketId::Session));
        assert!(event.motion().is_none() && event.lap_data().is_none());
    }
}
