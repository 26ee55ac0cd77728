//! Enumerations for raw status bytes carried in lap data and telemetry.
//!
//! Records always store the raw byte; these helpers interpret it. Values the
//! game adds in later versions decode to `Unknown(raw)` instead of failing.

use serde::{Deserialize, Serialize};

/// Pit lane state of a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum PitStatus {
    None,
    Pitting,
    InPitArea,
    Unknown(u8),
}

impl PitStatus {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => PitStatus::None,
            1 => PitStatus::Pitting,
            2 => PitStatus::InPitArea,
            other => PitStatus::Unknown(other),
        }
    }

    pub fn is_in_pits(self) -> bool {
        matches!(self, PitStatus::Pitting | PitStatus::InPitArea)
    }
}

/// What the driver is currently doing on track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum DriverStatus {
    InGarage,
    FlyingLap,
    InLap,
    OutLap,
    OnTrack,
    Unknown(u8),
}

impl DriverStatus {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => DriverStatus::InGarage,
            1 => DriverStatus::FlyingLap,
            2 => DriverStatus::InLap,
            3 => DriverStatus::OutLap,
            4 => DriverStatus::OnTrack,
            other => DriverStatus::Unknown(other),
        }
    }
}

/// Classification state of a car in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum ResultStatus {
    Invalid,
    Inactive,
    Active,
    Finished,
    DidNotFinish,
    Disqualified,
    NotClassified,
    Retired,
    Unknown(u8),
}

impl ResultStatus {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => ResultStatus::Invalid,
            1 => ResultStatus::Inactive,
            2 => ResultStatus::Active,
            3 => ResultStatus::Finished,
            4 => ResultStatus::DidNotFinish,
            5 => ResultStatus::Disqualified,
            6 => ResultStatus::NotClassified,
            7 => ResultStatus::Retired,
            other => ResultStatus::Unknown(other),
        }
    }

    /// Whether the car is still taking part in the session.
    pub fn is_running(self) -> bool {
        matches!(self, ResultStatus::Active)
    }
}

/// Selected gear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Gear {
    Reverse,
    Neutral,
    Forward(u8),
    Unknown(i8),
}

impl Gear {
    pub fn from_raw(raw: i8) -> Self {
        match raw {
            -1 => Gear::Reverse,
            0 => Gear::Neutral,
            1..=8 => Gear::Forward(raw as u8),
            other => Gear::Unknown(other),
        }
    }
}

impl std::fmt::Display for Gear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gear::Reverse => write!(f, "R"),
            Gear::Neutral => write!(f, "N"),
            Gear::Forward(n) => write!(f, "{}", n),
            Gear::Unknown(raw) => write!(f, "?{}", raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_pit_values() {
        assert_eq!(PitStatus::from_raw(0), PitStatus::None);
        assert_eq!(PitStatus::from_raw(2), PitStatus::InPitArea);
        assert!(PitStatus::Pitting.is_in_pits());
        assert!(!PitStatus::None.is_in_pits());
    }

    #[test]
    fn known_driver_and_result_values() {
        assert_eq!(DriverStatus::from_raw(3), DriverStatus::OutLap);
        assert_eq!(DriverStatus::from_raw(4), DriverStatus::OnTrack);
        assert_eq!(ResultStatus::from_raw(7), ResultStatus::Retired);
        assert!(ResultStatus::from_raw(2).is_running());
        assert!(!ResultStatus::Finished.is_running());
    }

    #[test]
    fn gear_display() {
        assert_eq!(Gear::from_raw(-1).to_string(), "R");
        assert_eq!(Gear::from_raw(0).to_string(), "N");
        assert_eq!(Gear::from_raw(7).to_string(), "7");
        assert_eq!(Gear::from_raw(12), Gear::Unknown(12));
    }

    proptest! {
        #[test]
        fn unknown_values_keep_the_raw_byte(raw in 8u8..=255) {
            prop_assert_eq!(ResultStatus::from_raw(raw), ResultStatus::Unknown(raw));
            prop_assert_eq!(DriverStatus::from_raw(raw), DriverStatus::Unknown(raw));
            prop_assert_eq!(PitStatus::from_raw(raw), PitStatus::Unknown(raw));
        }
    }
}
