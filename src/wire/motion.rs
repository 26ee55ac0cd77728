//! Motion packet (id 0).
//!
//! Per-car record layout (60 bytes, little-endian): six `f32` (world
//! position xyz, world velocity xyz), six `i16` (forward direction xyz, right
//! direction xyz), six `f32` (g-force lateral, longitudinal, vertical, then
//! yaw, pitch, roll).
//!
//! Direction vectors are normalised vectors scaled to the `i16` range on the
//! wire. They are stored raw; [`CarMotionRecord::forward_dir`] and
//! [`CarMotionRecord::right_dir`] divide by 32767 for consumers that want
//! unit vectors.

use serde::{Deserialize, Serialize};

use super::{ByteReader, CarRecord, MOTION_RECORD_SIZE, PacketHeader, decode_car_array};
use crate::Result;

const DIRECTION_SCALE: f32 = 32767.0;

/// World-space motion for one car.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CarMotionRecord {
    pub world_position_x: f32,
    pub world_position_y: f32,
    pub world_position_z: f32,
    pub world_velocity_x: f32,
    pub world_velocity_y: f32,
    pub world_velocity_z: f32,
    pub world_forward_dir_x: i16,
    pub world_forward_dir_y: i16,
    pub world_forward_dir_z: i16,
    pub world_right_dir_x: i16,
    pub world_right_dir_y: i16,
    pub world_right_dir_z: i16,
    pub g_force_lateral: f32,
    pub g_force_longitudinal: f32,
    pub g_force_vertical: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl CarMotionRecord {
    pub fn world_position(&self) -> [f32; 3] {
        [self.world_position_x, self.world_position_y, self.world_position_z]
    }

    pub fn world_velocity(&self) -> [f32; 3] {
        [self.world_velocity_x, self.world_velocity_y, self.world_velocity_z]
    }

    /// Forward direction as a unit vector.
    pub fn forward_dir(&self) -> [f32; 3] {
        [
            f32::from(self.world_forward_dir_x) / DIRECTION_SCALE,
            f32::from(self.world_forward_dir_y) / DIRECTION_SCALE,
            f32::from(self.world_forward_dir_z) / DIRECTION_SCALE,
        ]
    }

    /// Right direction as a unit vector.
    pub fn right_dir(&self) -> [f32; 3] {
        [
            f32::from(self.world_right_dir_x) / DIRECTION_SCALE,
            f32::from(self.world_right_dir_y) / DIRECTION_SCALE,
            f32::from(self.world_right_dir_z) / DIRECTION_SCALE,
        ]
    }

    /// Speed in m/s from the velocity vector.
    pub fn speed(&self) -> f32 {
        let [x, y, z] = self.world_velocity();
        (x * x + y * y + z * z).sqrt()
    }
}

impl CarRecord for CarMotionRecord {
    const SIZE: usize = MOTION_RECORD_SIZE;
    const KIND: &'static str = "motion";

    fn decode(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            world_position_x: r.f32()?,
            world_position_y: r.f32()?,
            world_position_z: r.f32()?,
            world_velocity_x: r.f32()?,
            world_velocity_y: r.f32()?,
            world_velocity_z: r.f32()?,
            world_forward_dir_x: r.i16()?,
            world_forward_dir_y: r.i16()?,
            world_forward_dir_z: r.i16()?,
            world_right_dir_x: r.i16()?,
            world_right_dir_y: r.i16()?,
            world_right_dir_z: r.i16()?,
            g_force_lateral: r.f32()?,
            g_force_longitudinal: r.f32()?,
            g_force_vertical: r.f32()?,
            yaw: r.f32()?,
            pitch: r.f32()?,
            roll: r.f32()?,
        })
    }
}

/// Decode every complete motion record in a packet.
pub fn decode_motion(buf: &[u8], header: &PacketHeader) -> Result<Vec<CarMotionRecord>> {
    decode_car_array(buf, header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{build_packet, encode_motion, sample_header, sample_motion};
    use crate::wire::{MAX_CARS, PacketId};
    use proptest::prelude::*;

    fn header() -> PacketHeader {
        sample_header(PacketId::Motion, 0)
    }

    #[test]
    fn direction_vectors_stay_raw_integers() {
        let record = CarMotionRecord {
            world_forward_dir_x: 32767,
            world_forward_dir_y: 0,
            world_forward_dir_z: -32767,
            ..sample_motion(0)
        };
        let bytes = encode_motion(&record);
        assert_eq!(bytes.len(), MOTION_RECORD_SIZE);
        assert_eq!(i16::from_le_bytes([bytes[24], bytes[25]]), 32767);
        assert_eq!(i16::from_le_bytes([bytes[28], bytes[29]]), -32767);

        let decoded = decode_motion(&build_packet(&header(), &[bytes]), &header()).unwrap();
        assert_eq!(decoded[0].world_forward_dir_x, 32767);
        assert_eq!(decoded[0].world_forward_dir_z, -32767);
        assert_eq!(decoded[0].forward_dir(), [1.0, 0.0, -1.0]);
    }

    #[test]
    fn attitude_follows_g_forces() {
        let record = sample_motion(5);
        let bytes = encode_motion(&record);
        assert_eq!(f32::from_le_bytes([bytes[36], bytes[37], bytes[38], bytes[39]]), record.g_force_lateral);
        assert_eq!(f32::from_le_bytes([bytes[48], bytes[49], bytes[50], bytes[51]]), record.yaw);
        assert_eq!(f32::from_le_bytes([bytes[56], bytes[57], bytes[58], bytes[59]]), record.roll);
    }

    #[test]
    fn speed_is_velocity_magnitude() {
        let record = CarMotionRecord {
            world_velocity_x: 3.0,
            world_velocity_y: 0.0,
            world_velocity_z: 4.0,
            ..sample_motion(0)
        };
        assert_eq!(record.speed(), 5.0);
    }

    proptest! {
        #[test]
        fn decodes_exactly_the_complete_records(
            count in 0usize..=MAX_CARS,
            trailing in 0usize..MOTION_RECORD_SIZE,
        ) {
            let records: Vec<_> = (0..count as i16).map(sample_motion).collect();
            let encoded: Vec<_> = records.iter().map(encode_motion).collect();
            let mut buf = build_packet(&header(), &encoded);
            buf.extend(std::iter::repeat_n(0x11u8, trailing));

            let decoded = decode_motion(&buf, &header()).unwrap();
            prop_assert_eq!(decoded, records);
        }
    }
}
