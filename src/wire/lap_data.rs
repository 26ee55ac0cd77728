//! Lap data packet (id 2).
//!
//! Per-car record layout (54 bytes, little-endian):
//!
//! | Offset | Type | Field                              |
//! |--------|------|------------------------------------|
//! | 0      | u32  | last lap time (ms)                 |
//! | 4      | u32  | current lap time (ms)              |
//! | 8      | u16  | sector 1 time, ms part             |
//! | 10     | u8   | sector 1 time, minutes part        |
//! | 11     | u16  | sector 2 time, ms part             |
//! | 13     | u8   | sector 2 time, minutes part        |
//! | 14     | u16  | delta to car in front (ms)         |
//! | 16     | u16  | delta to race leader (ms)          |
//! | 18     | f32  | lap distance (m)                   |
//! | 22     | f32  | total distance (m)                 |
//! | 26     | f32  | safety car delta (s)               |
//! | 30     | u8   | car position                       |
//! | 31     | u8   | current lap number                 |
//! | 32     | u8   | pit status                         |
//! | 33     | u8   | number of pit stops                |
//! | 34     | u8   | sector (0-based)                   |
//! | 35     | u8   | current lap invalid                |
//! | 36     | u8   | penalties (s)                      |
//! | 37     | u8   | total warnings                     |
//! | 38     | u8   | corner cutting warnings            |
//! | 39     | u8   | unserved drive-through penalties   |
//! | 40     | u8   | unserved stop-go penalties         |
//! | 41     | u8   | grid position                      |
//! | 42     | u8   | driver status                      |
//! | 43     | u8   | result status                      |
//! | 44     | u8   | pit lane timer active              |
//! | 45     | u16  | pit lane time in lane (ms)         |
//! | 47     | u16  | pit stop timer (ms)                |
//! | 49     | u8   | pit stop should serve penalty      |
//! | 50     | f32  | speed trap fastest speed (km/h)    |

use serde::{Deserialize, Serialize};

use super::{ByteReader, CarRecord, LAP_DATA_RECORD_SIZE, PacketHeader, decode_car_array};
use crate::Result;
use crate::types::{DriverStatus, PitStatus, ResultStatus};

/// Lap timing and race state for one car.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct LapDataRecord {
    pub last_lap_time_in_ms: u32,
    pub current_lap_time_in_ms: u32,
    pub sector1_time_in_ms: u16,
    pub sector1_time_minutes: u8,
    pub sector2_time_in_ms: u16,
    pub sector2_time_minutes: u8,
    pub delta_to_car_in_front_in_ms: u16,
    pub delta_to_race_leader_in_ms: u16,
    pub lap_distance: f32,
    pub total_distance: f32,
    pub safety_car_delta: f32,
    pub car_position: u8,
    pub current_lap_num: u8,
    pub pit_status: u8,
    pub num_pit_stops: u8,
    pub sector: u8,
    pub current_lap_invalid: u8,
    pub penalties: u8,
    pub total_warnings: u8,
    pub corner_cutting_warnings: u8,
    pub num_unserved_drive_through_pens: u8,
    pub num_unserved_stop_go_pens: u8,
    pub grid_position: u8,
    pub driver_status: u8,
    pub result_status: u8,
    pub pit_lane_timer_active: u8,
    pub pit_lane_time_in_lane_in_ms: u16,
    pub pit_stop_timer_in_ms: u16,
    pub pit_stop_should_serve_pen: u8,
    pub speed_trap_fastest_speed: f32,
}

impl LapDataRecord {
    /// Sector 1 time with the minutes part folded in.
    pub fn sector1_time_ms(&self) -> u32 {
        u32::from(self.sector1_time_minutes) * 60_000 + u32::from(self.sector1_time_in_ms)
    }

    /// Sector 2 time with the minutes part folded in.
    pub fn sector2_time_ms(&self) -> u32 {
        u32::from(self.sector2_time_minutes) * 60_000 + u32::from(self.sector2_time_in_ms)
    }

    pub fn is_lap_invalid(&self) -> bool {
        self.current_lap_invalid != 0
    }

    pub fn is_pit_lane_timer_active(&self) -> bool {
        self.pit_lane_timer_active != 0
    }

    pub fn pit_status(&self) -> PitStatus {
        PitStatus::from_raw(self.pit_status)
    }

    pub fn driver_status(&self) -> DriverStatus {
        DriverStatus::from_raw(self.driver_status)
    }

    pub fn result_status(&self) -> ResultStatus {
        ResultStatus::from_raw(self.result_status)
    }
}

impl CarRecord for LapDataRecord {
    const SIZE: usize = LAP_DATA_RECORD_SIZE;
    const KIND: &'static str = "lap data";

    fn decode(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            last_lap_time_in_ms: r.u32()?,
            current_lap_time_in_ms: r.u32()?,
            sector1_time_in_ms: r.u16()?,
            sector1_time_minutes: r.u8()?,
            sector2_time_in_ms: r.u16()?,
            sector2_time_minutes: r.u8()?,
            delta_to_car_in_front_in_ms: r.u16()?,
            delta_to_race_leader_in_ms: r.u16()?,
            lap_distance: r.f32()?,
            total_distance: r.f32()?,
            safety_car_delta: r.f32()?,
            car_position: r.u8()?,
            current_lap_num: r.u8()?,
            pit_status: r.u8()?,
            num_pit_stops: r.u8()?,
            sector: r.u8()?,
            current_lap_invalid: r.u8()?,
            penalties: r.u8()?,
            total_warnings: r.u8()?,
            corner_cutting_warnings: r.u8()?,
            num_unserved_drive_through_pens: r.u8()?,
            num_unserved_stop_go_pens: r.u8()?,
            grid_position: r.u8()?,
            driver_status: r.u8()?,
            result_status: r.u8()?,
            pit_lane_timer_active: r.u8()?,
            pit_lane_time_in_lane_in_ms: r.u16()?,
            pit_stop_timer_in_ms: r.u16()?,
            pit_stop_should_serve_pen: r.u8()?,
            speed_trap_fastest_speed: r.f32()?,
        })
    }
}

/// Decode every complete lap data record in a packet.
pub fn decode_lap_data(buf: &[u8], header: &PacketHeader) -> Result<Vec<LapDataRecord>> {
    decode_car_array(buf, header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TelemetryError;
    use crate::test_utils::{build_packet, encode_lap_data, sample_header, sample_lap_data};
    use crate::wire::{HEADER_SIZE, MAX_CARS, PacketId};
    use proptest::prelude::*;

    fn header() -> PacketHeader {
        sample_header(PacketId::LapData, 0)
    }

    #[test]
    fn encoded_record_is_fifty_four_bytes() {
        assert_eq!(encode_lap_data(&sample_lap_data(1, 0)).len(), LAP_DATA_RECORD_SIZE);
    }

    #[test]
    fn fields_land_at_wire_offsets() {
        let record = LapDataRecord { current_lap_num: 17, sector: 2, ..sample_lap_data(4, 1) };
        let bytes = encode_lap_data(&record);

        assert_eq!(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), record.last_lap_time_in_ms);
        assert_eq!(bytes[10], record.sector1_time_minutes);
        assert_eq!(u16::from_le_bytes([bytes[14], bytes[15]]), record.delta_to_car_in_front_in_ms);
        assert_eq!(f32::from_le_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]), record.lap_distance);
        assert_eq!(bytes[31], 17);
        assert_eq!(bytes[34], 2);
        assert_eq!(bytes[49], record.pit_stop_should_serve_pen);
        assert_eq!(
            f32::from_le_bytes([bytes[50], bytes[51], bytes[52], bytes[53]]),
            record.speed_trap_fastest_speed
        );
    }

    #[test]
    fn decodes_player_record_from_full_grid() {
        let records: Vec<_> = (0..MAX_CARS as u8).map(|i| sample_lap_data(i + 1, i % 3)).collect();
        let encoded: Vec<_> = records.iter().map(encode_lap_data).collect();
        let buf = build_packet(&header(), &encoded);

        let decoded = decode_lap_data(&buf, &header()).unwrap();
        assert_eq!(decoded.len(), MAX_CARS);
        assert_eq!(decoded[7], records[7]);
        assert_eq!(decoded[7].current_lap_num, 8);
    }

    #[test]
    fn partial_trailing_record_is_dropped() {
        let records = [sample_lap_data(2, 0), sample_lap_data(3, 1)];
        let encoded: Vec<_> = records.iter().map(encode_lap_data).collect();
        let mut buf = build_packet(&header(), &encoded);
        buf.extend_from_slice(&encode_lap_data(&sample_lap_data(9, 2))[..20]);

        let decoded = decode_lap_data(&buf, &header()).unwrap();
        assert_eq!(decoded, records.to_vec());
    }

    #[test]
    fn short_buffer_is_truncated_input() {
        let result = decode_lap_data(&[0u8; HEADER_SIZE - 1], &header());
        assert!(matches!(result, Err(TelemetryError::TruncatedInput { .. })));
    }

    #[test]
    fn sector_times_fold_minutes() {
        let record = LapDataRecord {
            sector1_time_in_ms: 5_250,
            sector1_time_minutes: 1,
            sector2_time_in_ms: 31_000,
            sector2_time_minutes: 0,
            ..sample_lap_data(1, 0)
        };
        assert_eq!(record.sector1_time_ms(), 65_250);
        assert_eq!(record.sector2_time_ms(), 31_000);
    }

    #[test]
    fn status_accessors_keep_raw_bytes() {
        let record = LapDataRecord {
            pit_status: 1,
            driver_status: 1,
            result_status: 42,
            current_lap_invalid: 1,
            ..sample_lap_data(1, 0)
        };
        assert_eq!(record.pit_status(), PitStatus::Pitting);
        assert_eq!(record.driver_status(), DriverStatus::FlyingLap);
        assert_eq!(record.result_status(), ResultStatus::Unknown(42));
        assert!(record.is_lap_invalid());
        assert_eq!(record.result_status, 42);
    }

    proptest! {
        #[test]
        fn decodes_exactly_the_complete_records(
            count in 0usize..=MAX_CARS,
            trailing in 0usize..LAP_DATA_RECORD_SIZE,
        ) {
            let records: Vec<_> = (0..count as u8).map(|i| sample_lap_data(i, i % 3)).collect();
            let encoded: Vec<_> = records.iter().map(encode_lap_data).collect();
            let mut buf = build_packet(&header(), &encoded);
            buf.extend(std::iter::repeat_n(0xC3u8, trailing));

            let decoded = decode_lap_data(&buf, &header()).unwrap();
            prop_assert_eq!(decoded, records);
        }
    }
}
