//! Aggregate statistics over a session's telemetry history.
//!
//! Used by display and analysis consumers that want a compact view of the
//! session instead of raw records.

use serde::{Deserialize, Serialize};

use crate::types::Gear;
use crate::wire::{CarTelemetryRecord, LapDataRecord};

/// Samples needed before a speed trend is reported.
const SPEED_TREND_MIN_SAMPLES: usize = 50;

/// Samples needed before a tyre temperature trend is reported.
const TEMP_TREND_MIN_SAMPLES: usize = 10;

/// Throttle above this counts as flat out.
const FULL_THROTTLE: f32 = 0.95;

/// Direction of average speed between the two halves of the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum Trend {
    Improving,
    Degrading,
    Stable,
}

/// Direction of average tyre surface temperature over the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum TempTrend {
    Rising,
    Falling,
    Stable,
}

/// Time trial when no car position is known, race otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum SessionMode {
    TimeTrial,
    Race,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SpeedStats {
    pub current: u16,
    pub average: f32,
    pub max: u16,
    pub min: u16,
    pub trend: Trend,
}

/// Pedal values as percentages (0..=100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct ThrottleStats {
    pub current_percent: f32,
    pub average_percent: f32,
    /// Share of samples above 95% throttle.
    pub full_throttle_percent: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct BrakeStats {
    pub current_percent: f32,
    pub average_percent: f32,
    /// Mean of the four current brake temperatures.
    pub temperature_average: f32,
    pub temperature_max: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct CarState {
    pub gear: Gear,
    pub engine_rpm: u16,
    pub drs_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct TyreStats {
    pub surface_temperature: [u8; 4],
    pub inner_temperature: [u8; 4],
    pub pressure: [f32; 4],
    /// Mean surface temperature across every sample in the history.
    pub average_surface_temperature: f32,
    pub temperature_trend: TempTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct LapInfo {
    pub current_lap: u8,
    /// `None` when the game reports position 0 (time trial).
    pub position: Option<u8>,
    pub sector: u8,
    pub lap_distance: f32,
    pub last_lap_time: Option<String>,
    pub current_lap_time: Option<String>,
    pub pit_stops: u8,
}

impl LapInfo {
    pub fn from_record(lap: &LapDataRecord) -> Self {
        Self {
            current_lap: lap.current_lap_num,
            position: (lap.car_position > 0).then_some(lap.car_position),
            sector: lap.sector,
            lap_distance: lap.lap_distance,
            last_lap_time: format_lap_time(lap.last_lap_time_in_ms),
            current_lap_time: format_lap_time(lap.current_lap_time_in_ms),
            pit_stops: lap.num_pit_stops,
        }
    }
}

/// Snapshot of a session for analysis consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub struct SessionSummary {
    pub packets_received: u64,
    pub samples_analyzed: usize,
    pub speed: SpeedStats,
    pub throttle: ThrottleStats,
    pub brake: BrakeStats,
    pub car: CarState,
    pub tyres: TyreStats,
    pub mode: SessionMode,
    pub lap: Option<LapInfo>,
}

impl SessionSummary {
    /// Build a summary; `None` until both a history and a current telemetry
    /// record exist.
    pub fn build(
        history: &[CarTelemetryRecord],
        current: Option<&CarTelemetryRecord>,
        current_lap: Option<&LapDataRecord>,
        packets_received: u64,
    ) -> Option<Self> {
        let current = current?;
        if history.is_empty() {
            return None;
        }
        let samples = history.len() as f32;

        let speeds: Vec<u16> = history.iter().map(|t| t.speed).collect();
        let speed = SpeedStats {
            current: current.speed,
            average: speeds.iter().map(|&s| f32::from(s)).sum::<f32>() / samples,
            max: speeds.iter().copied().max().unwrap_or_default(),
            min: speeds.iter().copied().min().unwrap_or_default(),
            trend: speed_trend(&speeds),
        };

        let full_throttle = history.iter().filter(|t| t.throttle > FULL_THROTTLE).count() as f32;
        let throttle = ThrottleStats {
            current_percent: current.throttle * 100.0,
            average_percent: history.iter().map(|t| t.throttle).sum::<f32>() / samples * 100.0,
            full_throttle_percent: full_throttle / samples * 100.0,
        };

        let brake = BrakeStats {
            current_percent: current.brake * 100.0,
            average_percent: history.iter().map(|t| t.brake).sum::<f32>() / samples * 100.0,
            temperature_average: current.brakes_temperature.iter().map(|&t| f32::from(t)).sum::<f32>()
                / 4.0,
            temperature_max: current.brakes_temperature.iter().copied().max().unwrap_or_default(),
        };

        let tyre_temps: Vec<f32> =
            history.iter().map(CarTelemetryRecord::average_tyre_surface_temperature).collect();
        let tyres = TyreStats {
            surface_temperature: current.tyres_surface_temperature,
            inner_temperature: current.tyres_inner_temperature,
            pressure: current.tyres_pressure,
            average_surface_temperature: tyre_temps.iter().sum::<f32>() / samples,
            temperature_trend: temp_trend(&tyre_temps),
        };

        let mode = match current_lap {
            Some(lap) if lap.car_position != 0 => SessionMode::Race,
            _ => SessionMode::TimeTrial,
        };

        Some(Self {
            packets_received,
            samples_analyzed: history.len(),
            speed,
            throttle,
            brake,
            car: CarState {
                gear: Gear::from_raw(current.gear),
                engine_rpm: current.engine_rpm,
                drs_active: current.is_drs_open(),
            },
            tyres,
            mode,
            lap: current_lap.map(LapInfo::from_record),
        })
    }
}

fn speed_trend(speeds: &[u16]) -> Trend {
    if speeds.len() <= SPEED_TREND_MIN_SAMPLES {
        return Trend::Stable;
    }
    let (first, second) = speeds.split_at(speeds.len() / 2);
    let mean = |xs: &[u16]| xs.iter().map(|&s| f64::from(s)).sum::<f64>() / xs.len() as f64;
    if mean(second) > mean(first) { Trend::Improving } else { Trend::Degrading }
}

fn temp_trend(temps: &[f32]) -> TempTrend {
    match (temps.first(), temps.last()) {
        (Some(first), Some(last)) if temps.len() > TEMP_TREND_MIN_SAMPLES => {
            if last > first {
                TempTrend::Rising
            } else {
                TempTrend::Falling
            }
        }
        _ => TempTrend::Stable,
    }
}

/// Format a lap time as `m:ss.mmm`; `None` for 0, which the game uses for
/// "no time yet".
pub fn format_lap_time(ms: u32) -> Option<String> {
    if ms == 0 {
        return None;
    }
    let minutes = ms / 60_000;
    let rest = ms % 60_000;
    Some(format!("{}:{:02}.{:03}", minutes, rest / 1000, rest % 1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_car_telemetry, sample_lap_data};

    fn with_speed(speed: u16) -> CarTelemetryRecord {
        CarTelemetryRecord { speed, ..sample_car_telemetry(0) }
    }

    #[test]
    fn lap_time_formatting() {
        assert_eq!(format_lap_time(0), None);
        assert_eq!(format_lap_time(83_456).as_deref(), Some("1:23.456"));
        assert_eq!(format_lap_time(59_999).as_deref(), Some("0:59.999"));
        assert_eq!(format_lap_time(605_007).as_deref(), Some("10:05.007"));
    }

    #[test]
    fn no_summary_without_telemetry() {
        assert!(SessionSummary::build(&[], None, None, 0).is_none());
        let record = sample_car_telemetry(0);
        assert!(SessionSummary::build(&[], Some(&record), None, 3).is_none());
        assert!(SessionSummary::build(&[record], None, None, 3).is_none());
    }

    #[test]
    fn speed_and_pedal_statistics() {
        let history = vec![
            CarTelemetryRecord { speed: 100, throttle: 1.0, brake: 0.0, ..sample_car_telemetry(0) },
            CarTelemetryRecord { speed: 200, throttle: 0.5, brake: 0.5, ..sample_car_telemetry(0) },
            CarTelemetryRecord { speed: 300, throttle: 0.0, brake: 1.0, ..sample_car_telemetry(0) },
            CarTelemetryRecord { speed: 200, throttle: 0.96, brake: 0.0, ..sample_car_telemetry(0) },
        ];
        let current = history[3];
        let summary = SessionSummary::build(&history, Some(&current), None, 10).unwrap();

        assert_eq!(summary.packets_received, 10);
        assert_eq!(summary.samples_analyzed, 4);
        assert_eq!(summary.speed.current, 200);
        assert_eq!(summary.speed.average, 200.0);
        assert_eq!(summary.speed.max, 300);
        assert_eq!(summary.speed.min, 100);
        assert_eq!(summary.speed.trend, Trend::Stable);
        assert_eq!(summary.throttle.full_throttle_percent, 50.0);
        assert!((summary.brake.average_percent - 37.5).abs() < 1e-4);
        assert_eq!(summary.mode, SessionMode::TimeTrial);
        assert!(summary.lap.is_none());
    }

    #[test]
    fn speed_trend_needs_enough_samples() {
        let rising: Vec<_> = (0..60).map(|i| with_speed(100 + i)).collect();
        let falling: Vec<_> = (0..60).map(|i| with_speed(300 - i)).collect();
        let short: Vec<_> = (0..50).map(|i| with_speed(100 + i)).collect();

        let trend = |h: &[CarTelemetryRecord]| {
            SessionSummary::build(h, h.last(), None, 0).map(|s| s.speed.trend)
        };
        assert_eq!(trend(&rising), Some(Trend::Improving));
        assert_eq!(trend(&falling), Some(Trend::Degrading));
        assert_eq!(trend(&short), Some(Trend::Stable));
    }

    #[test]
    fn tyre_temperature_trend() {
        let heating: Vec<_> = (0..12u8)
            .map(|i| CarTelemetryRecord { tyres_surface_temperature: [80 + i; 4], ..sample_car_telemetry(0) })
            .collect();
        let summary = SessionSummary::build(&heating, heating.last(), None, 0).unwrap();
        assert_eq!(summary.tyres.temperature_trend, TempTrend::Rising);
        assert_eq!(summary.tyres.surface_temperature, [91; 4]);

        let few = &heating[..5];
        let summary = SessionSummary::build(few, few.last(), None, 0).unwrap();
        assert_eq!(summary.tyres.temperature_trend, TempTrend::Stable);
    }

    #[test]
    fn odd_length_history_compares_true_half_means() {
        // 25 samples at 200 then 26 at 195: the longer second half is slower
        let history: Vec<_> =
            (0..51).map(|i| with_speed(if i < 25 { 200 } else { 195 })).collect();
        let summary = SessionSummary::build(&history, history.last(), None, 0).unwrap();
        assert_eq!(summary.speed.trend, Trend::Degrading);
    }

    #[test]
    fn short_cooling_history_is_stable() {
        let cooling: Vec<_> = (0..10u8)
            .map(|i| CarTelemetryRecord { tyres_surface_temperature: [100 - i; 4], ..sample_car_telemetry(0) })
            .collect();
        let summary = SessionSummary::build(&cooling, cooling.last(), None, 0).unwrap();
        assert_eq!(summary.tyres.temperature_trend, TempTrend::Stable);
    }

    #[test]
    fn race_mode_includes_lap_info() {
        let history = vec![sample_car_telemetry(0)];
        let lap = LapDataRecord {
            car_position: 3,
            last_lap_time_in_ms: 83_456,
            current_lap_time_in_ms: 0,
            num_pit_stops: 1,
            ..sample_lap_data(7, 1)
        };
        let summary = SessionSummary::build(&history, history.last(), Some(&lap), 1).unwrap();

        assert_eq!(summary.mode, SessionMode::Race);
        let info = summary.lap.unwrap();
        assert_eq!(info.current_lap, 7);
        assert_eq!(info.position, Some(3));
        assert_eq!(info.sector, 1);
        assert_eq!(info.last_lap_time.as_deref(), Some("1:23.456"));
        assert_eq!(info.current_lap_time, None);
        assert_eq!(info.pit_stops, 1);
    }

    #[test]
    fn time_trial_position_is_none() {
        let history = vec![sample_car_telemetry(0)];
        let lap = LapDataRecord { car_position: 0, ..sample_lap_data(2, 0) };
        let summary = SessionSummary::build(&history, history.last(), Some(&lap), 1).unwrap();
        assert_eq!(summary.mode, SessionMode::TimeTrial);
        assert_eq!(summary.lap.and_then(|l| l.position), None);
    }
}
