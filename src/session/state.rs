//! Shared current/history state and its read-only handle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

use super::history::History;
use crate::summary::SessionSummary;
use crate::wire::{CarMotionRecord, CarTelemetryRecord, LapDataRecord};

/// Current value plus bounded history for one record kind.
pub(crate) struct Channel<T> {
    current: watch::Sender<Option<T>>,
    history: Mutex<History<T>>,
}

impl<T: Clone> Channel<T> {
    fn new(capacity: usize) -> Self {
        let (current, _) = watch::channel(None);
        Self { current, history: Mutex::new(History::new(capacity)) }
    }

    /// Append to history, then replace the current value.
    pub(crate) fn record(&self, value: T) {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).push(value.clone());
        self.current.send_replace(Some(value));
    }

    pub(crate) fn current(&self) -> Option<T> {
        self.current.borrow().clone()
    }

    fn history(&self) -> Vec<T> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).snapshot()
    }

    fn subscribe(&self) -> watch::Receiver<Option<T>> {
        self.current.subscribe()
    }
}

/// State written by the receive loop and read by any number of consumers.
pub(crate) struct SharedState {
    pub(crate) motion: Channel<CarMotionRecord>,
    pub(crate) lap_data: Channel<LapDataRecord>,
    pub(crate) telemetry: Channel<CarTelemetryRecord>,
    packets_received: AtomicU64,
}

impl SharedState {
    pub(crate) fn new(history_capacity: usize) -> Self {
        Self {
            motion: Channel::new(history_capacity),
            lap_data: Channel::new(history_capacity),
            telemetry: Channel::new(history_capacity),
            packets_received: AtomicU64::new(0),
        }
    }

    pub(crate) fn count_packet(&self) -> u64 {
        self.packets_received.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn reset_packets_received(&self) {
        self.packets_received.store(0, Ordering::Relaxed);
    }
}

/// Cloneable read-only view of a session's state.
///
/// Safe to use from any thread while the receive loop runs. Current values
/// are swapped atomically; history accessors return a consistent copy.
#[derive(Clone)]
pub struct SessionReader {
    state: Arc<SharedState>,
}

impl SessionReader {
    pub(crate) fn new(state: Arc<SharedState>) -> Self {
        Self { state }
    }

    pub fn current_motion(&self) -> Option<CarMotionRecord> {
        self.state.motion.current()
    }

    pub fn current_lap_data(&self) -> Option<LapDataRecord> {
        self.state.lap_data.current()
    }

    pub fn current_telemetry(&self) -> Option<CarTelemetryRecord> {
        self.state.telemetry.current()
    }

    /// Motion history, oldest first.
    pub fn motion_history(&self) -> Vec<CarMotionRecord> {
        self.state.motion.history()
    }

    /// Lap data history, oldest first.
    pub fn lap_history(&self) -> Vec<LapDataRecord> {
        self.state.lap_data.history()
    }

    /// Car telemetry history, oldest first.
    pub fn telemetry_history(&self) -> Vec<CarTelemetryRecord> {
        self.state.telemetry.history()
    }

    pub fn watch_motion(&self) -> watch::Receiver<Option<CarMotionRecord>> {
        self.state.motion.subscribe()
    }

    pub fn watch_lap_data(&self) -> watch::Receiver<Option<LapDataRecord>> {
        self.state.lap_data.subscribe()
    }

    pub fn watch_telemetry(&self) -> watch::Receiver<Option<CarTelemetryRecord>> {
        self.state.telemetry.subscribe()
    }

    /// Datagrams received since the session last started.
    pub fn packets_received(&self) -> u64 {
        self.state.packets_received.load(Ordering::Relaxed)
    }

    /// Aggregate statistics over the telemetry history; `None` before any
    /// car telemetry has arrived.
    pub fn summary(&self) -> Option<SessionSummary> {
        SessionSummary::build(
            &self.telemetry_history(),
            self.current_telemetry().as_ref(),
            self.current_lap_data().as_ref(),
            self.packets_received(),
        )
    }
}

impl std::fmt::Debug for SessionReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionReader")
            .field("packets_received", &self.packets_received())
            .field("has_telemetry", &self.state.telemetry.current.borrow().is_some())
            .finish()
    }
}
