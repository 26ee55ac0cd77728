//! Common packet header.
//!
//! Layout (29 bytes, little-endian):
//!
//! | Offset | Type | Field                          |
//! |--------|------|--------------------------------|
//! | 0      | u16  | packet format (e.g. 2025)      |
//! | 2      | u8   | game year                      |
//! | 3      | u8   | game major version             |
//! | 4      | u8   | game minor version             |
//! | 5      | u8   | packet version                 |
//! | 6      | u8   | packet id                      |
//! | 7      | u64  | session uid                    |
//! | 15     | f32  | session time (seconds)         |
//! | 19     | u32  | frame identifier               |
//! | 23     | u32  | overall frame identifier       |
//! | 27     | u8   | player car index               |
//! | 28     | u8   | secondary player car index     |
//!
//! Only the length is validated. Unknown packet formats and ids pass through
//! so newer game versions keep flowing to consumers.

use serde::{Deserialize, Serialize};

use super::{ByteReader, HEADER_SIZE, NO_SECONDARY_PLAYER, PacketId};
use crate::{Result, TelemetryError};

/// Header prefixed to every datagram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct PacketHeader {
    pub packet_format: u16,
    pub game_year: u8,
    pub game_major_version: u8,
    pub game_minor_version: u8,
    pub packet_version: u8,
    pub packet_id: u8,
    pub session_uid: u64,
    /// Seconds since the session started.
    pub session_time: f32,
    pub frame_identifier: u32,
    /// Frame counter that does not go back after flashbacks.
    pub overall_frame_identifier: u32,
    pub player_car_index: u8,
    /// 255 when there is no split-screen second player.
    pub secondary_player_car_index: u8,
}

impl PacketHeader {
    /// Packet type, or `None` for ids this crate does not know.
    pub fn packet_type(&self) -> Option<PacketId> {
        PacketId::from_u8(self.packet_id)
    }

    /// Index of the split-screen second player, if any.
    pub fn secondary_player(&self) -> Option<u8> {
        (self.secondary_player_car_index != NO_SECONDARY_PLAYER)
            .then_some(self.secondary_player_car_index)
    }
}

/// Decode the 29-byte header at the start of `buf`.
pub fn decode_header(buf: &[u8]) -> Result<PacketHeader> {
    if buf.len() < HEADER_SIZE {
        return Err(TelemetryError::truncated("packet header", HEADER_SIZE, buf.len()));
    }

    let mut r = ByteReader::with_context(&buf[..HEADER_SIZE], "packet header");
    Ok(PacketHeader {
        packet_format: r.u16()?,
        game_year: r.u8()?,
        game_major_version: r.u8()?,
        game_minor_version: r.u8()?,
        packet_version: r.u8()?,
        packet_id: r.u8()?,
        session_uid: r.u64()?,
        session_time: r.f32()?,
        frame_identifier: r.u32()?,
        overall_frame_identifier: r.u32()?,
        player_car_index: r.u8()?,
        secondary_player_car_index: r.u8()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::encode_header;
    use proptest::prelude::*;

    prop_compose! {
        fn arb_header()(
            packet_format in any::<u16>(),
            game_year in any::<u8>(),
            game_major_version in any::<u8>(),
            game_minor_version in any::<u8>(),
            packet_version in any::<u8>(),
            packet_id in any::<u8>(),
            session_uid in any::<u64>(),
            session_time in -1.0e6f32..1.0e6f32,
            frame_identifier in any::<u32>(),
            overall_frame_identifier in any::<u32>(),
            player_car_index in any::<u8>(),
            secondary_player_car_index in any::<u8>(),
        ) -> PacketHeader {
            PacketHeader {
                packet_format,
                game_year,
                game_major_version,
                game_minor_version,
                packet_version,
                packet_id,
                session_uid,
                session_time,
                frame_identifier,
                overall_frame_identifier,
                player_car_index,
                secondary_player_car_index,
            }
        }
    }

    proptest! {
        #[test]
        fn header_fields_survive_the_wire(header in arb_header()) {
            let bytes = encode_header(&header);
            prop_assert_eq!(bytes.len(), HEADER_SIZE);
            let decoded = decode_header(&bytes).unwrap();
            prop_assert_eq!(decoded, header);
        }

        #[test]
        fn short_buffers_are_truncated_input(len in 0usize..HEADER_SIZE) {
            let bytes = vec![0xAAu8; len];
            let result = decode_header(&bytes);
            let is_truncated = matches!(
                result,
                Err(TelemetryError::TruncatedInput { needed: HEADER_SIZE, available, .. }) if available == len
            );
            prop_assert!(is_truncated);
        }
    }

    #[test]
    fn decodes_car_telemetry_header_bytes() {
        let mut bytes = vec![0x01, 0x00, 0x18, 0x01, 0x19, 0x01, 0x06];
        bytes.extend_from_slice(&0x0102_0304_0506_0708u64.to_le_bytes());
        bytes.extend_from_slice(&12.5f32.to_le_bytes());
        bytes.extend_from_slice(&42u32.to_le_bytes());
        bytes.extend_from_slice(&43u32.to_le_bytes());
        bytes.extend_from_slice(&[0x00, 0xFF]);

        let header = decode_header(&bytes).unwrap();
        assert_eq!(header.packet_format, 1);
        assert_eq!(header.game_year, 24);
        assert_eq!(header.game_major_version, 1);
        assert_eq!(header.game_minor_version, 25);
        assert_eq!(header.packet_version, 1);
        assert_eq!(header.packet_id, 6);
        assert_eq!(header.packet_type(), Some(PacketId::CarTelemetry));
        assert_eq!(header.session_uid, 0x0102_0304_0506_0708);
        assert_eq!(header.session_time, 12.5);
        assert_eq!(header.frame_identifier, 42);
        assert_eq!(header.overall_frame_identifier, 43);
        assert_eq!(header.player_car_index, 0);
        assert_eq!(header.secondary_player_car_index, 255);
        assert_eq!(header.secondary_player(), None);
    }

    #[test]
    fn trailing_body_bytes_are_ignored() {
        let header = PacketHeader {
            packet_format: 2025,
            game_year: 25,
            game_major_version: 1,
            game_minor_version: 0,
            packet_version: 1,
            packet_id: 99,
            session_uid: 7,
            session_time: 0.0,
            frame_identifier: 1,
            overall_frame_identifier: 1,
            player_car_index: 3,
            secondary_player_car_index: 4,
        };
        let mut bytes = encode_header(&header);
        bytes.extend_from_slice(&[0xEE; 100]);

        let decoded = decode_header(&bytes).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(decoded.packet_type(), None);
        assert_eq!(decoded.secondary_player(), Some(4));
    }
}
