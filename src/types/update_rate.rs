//! Update rate control for current-record streams.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rate at which a current-record stream yields values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum UpdateRate {
    /// Every update the game sends (typically 60Hz)
    #[default]
    Native,

    /// At most this many updates per second, latest value wins.
    /// Rates at or above the source rate, and zero, behave like `Native`.
    Max(u32),
}

impl UpdateRate {
    /// Effective rate against a source sending at `source_hz`.
    pub fn normalize(self, source_hz: f64) -> Self {
        match self {
            UpdateRate::Native => UpdateRate::Native,
            UpdateRate::Max(0) => UpdateRate::Native,
            UpdateRate::Max(hz) if f64::from(hz) >= source_hz => UpdateRate::Native,
            UpdateRate::Max(hz) => UpdateRate::Max(hz),
        }
    }

    pub fn needs_throttle(self, source_hz: f64) -> bool {
        matches!(self.normalize(source_hz), UpdateRate::Max(_))
    }

    /// Sampling interval, or `None` when every update passes through.
    pub fn throttle_interval(self, source_hz: f64) -> Option<Duration> {
        match self.normalize(source_hz) {
            UpdateRate::Native => None,
            UpdateRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / f64::from(hz))),
        }
    }
}
