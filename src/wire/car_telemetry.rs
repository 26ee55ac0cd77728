//! Car telemetry packet (id 6).
//!
//! Per-car record layout (60 bytes, little-endian):
//!
//! | Offset | Type    | Field                         |
//! |--------|---------|-------------------------------|
//! | 0      | u16     | speed (km/h)                  |
//! | 2      | f32     | throttle (0.0..=1.0)          |
//! | 6      | f32     | steer (-1.0..=1.0)            |
//! | 10     | f32     | brake (0.0..=1.0)             |
//! | 14     | u8      | clutch (0..=100)              |
//! | 15     | i8      | gear (-1 reverse, 0 neutral)  |
//! | 16     | u16     | engine RPM                    |
//! | 18     | u8      | DRS (0 off, 1 on)             |
//! | 19     | u8      | rev lights percent            |
//! | 20     | u16     | rev lights bit value          |
//! | 22     | 4 × u16 | brake temperatures (°C)       |
//! | 30     | 4 × u8  | tyre surface temperatures     |
//! | 34     | 4 × u8  | tyre inner temperatures       |
//! | 38     | u16     | engine temperature (°C)       |
//! | 40     | 4 × f32 | tyre pressures (PSI)          |
//! | 56     | 4 × u8  | surface types                 |

use serde::{Deserialize, Serialize};

use super::{
    ByteReader, CAR_TELEMETRY_RECORD_SIZE, CarRecord, PacketHeader, decode_car_array,
};
use crate::Result;

/// Index into the four-element per-wheel arrays.
///
/// Wire order is preserved as-is; this enum only names the slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Wheel {
    FrontLeft = 0,
    FrontRight = 1,
    RearLeft = 2,
    RearRight = 3,
}

impl Wheel {
    pub const ALL: [Wheel; 4] = [Wheel::FrontLeft, Wheel::FrontRight, Wheel::RearLeft, Wheel::RearRight];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Telemetry for one car.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CarTelemetryRecord {
    pub speed: u16,
    pub throttle: f32,
    pub steer: f32,
    pub brake: f32,
    pub clutch: u8,
    pub gear: i8,
    pub engine_rpm: u16,
    pub drs: u8,
    pub rev_lights_percent: u8,
    /// Opaque LED bitmask; bit layout is left to consumers.
    pub rev_lights_bit_value: u16,
    pub brakes_temperature: [u16; 4],
    pub tyres_surface_temperature: [u8; 4],
    pub tyres_inner_temperature: [u8; 4],
    pub engine_temperature: u16,
    pub tyres_pressure: [f32; 4],
    /// Opaque driving-surface codes per wheel.
    pub surface_type: [u8; 4],
}

impl CarTelemetryRecord {
    pub fn is_drs_open(&self) -> bool {
        self.drs != 0
    }

    pub fn brake_temperature(&self, wheel: Wheel) -> u16 {
        self.brakes_temperature[wheel.index()]
    }

    pub fn tyre_surface_temperature(&self, wheel: Wheel) -> u8 {
        self.tyres_surface_temperature[wheel.index()]
    }

    pub fn tyre_inner_temperature(&self, wheel: Wheel) -> u8 {
        self.tyres_inner_temperature[wheel.index()]
    }

    pub fn tyre_pressure(&self, wheel: Wheel) -> f32 {
        self.tyres_pressure[wheel.index()]
    }

    /// Mean of the four tyre surface temperatures.
    pub fn average_tyre_surface_temperature(&self) -> f32 {
        self.tyres_surface_temperature.iter().map(|&t| f32::from(t)).sum::<f32>() / 4.0
    }
}

impl CarRecord for CarTelemetryRecord {
    const SIZE: usize = CAR_TELEMETRY_RECORD_SIZE;
    const KIND: &'static str = "car telemetry";

    fn decode(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            speed: r.u16()?,
            throttle: r.f32()?,
            steer: r.f32()?,
            brake: r.f32()?,
            clutch: r.u8()?,
            gear: r.i8()?,
            engine_rpm: r.u16()?,
            drs: r.u8()?,
            rev_lights_percent: r.u8()?,
            rev_lights_bit_value: r.u16()?,
            brakes_temperature: r.u16_array()?,
            tyres_surface_temperature: r.u8_array()?,
            tyres_inner_temperature: r.u8_array()?,
            engine_temperature: r.u16()?,
            tyres_pressure: r.f32_array()?,
            surface_type: r.u8_array()?,
        })
    }
}

/// Decode every complete car telemetry record in a packet.
pub fn decode_car_telemetry(buf: &[u8], header: &PacketHeader) -> Result<Vec<CarTelemetryRecord>> {
    decode_car_array(buf, header)
}
