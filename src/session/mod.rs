//! Telemetry session: socket ownership, receive loop step and state updates.
//!
//! A [`TelemetrySession`] binds a UDP socket, receives one datagram at a
//! time, decodes it and keeps the player's latest record and a bounded history
//! per packet kind. Decode failures, timeouts and socket errors never stop a
//! session; only a failed bind is reported to the caller.
//!
//! ```no_run
//! use racewire::{ReceiveOutcome, SessionConfig, TelemetrySession};
//!
//! # async fn run() -> racewire::Result<()> {
//! let mut session = TelemetrySession::new(SessionConfig::default());
//! session.start("127.0.0.1", 20777).await?;
//!
//! loop {
//!     match session.receive_one().await {
//!         ReceiveOutcome::Event(event) => {
//!             if let Some(lap) = event.lap_completed {
//!                 println!("Lap {} started, last lap {} ms", lap.lap_number, lap.last_lap_time_ms);
//!             }
//!         }
//!         ReceiveOutcome::NotRunning => break,
//!         ReceiveOutcome::NoPacket | ReceiveOutcome::NoEvent => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod history;
mod state;
mod transition;

pub use history::History;
pub use state::SessionReader;
pub use transition::detect as detect_transitions;

pub(crate) use state::SharedState;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::SessionConfig;
use crate::types::{PacketData, TelemetryEvent};
use crate::wire::{PacketId, decode_car_telemetry, decode_header, decode_lap_data, decode_motion};
use crate::{Result, TelemetryError};

const MAX_ERROR_BACKOFF_SHIFT: u32 = 5;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Listening,
}

/// Result of one receive attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiveOutcome {
    /// The session is stopped or was never started.
    NotRunning,
    /// Nothing arrived before the timeout, the wait was cancelled, or the
    /// socket reported a transient error.
    NoPacket,
    /// A datagram arrived but was dropped.
    NoEvent,
    Event(TelemetryEvent),
}

/// Thread-safe handle that stops the current run of a session.
#[derive(Debug, Clone)]
pub struct StopHandle {
    token: CancellationToken,
}

impl StopHandle {
    /// Signal the receive loop to exit. A pending receive returns promptly.
    pub fn stop(&self) {
        self.token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// UDP telemetry session.
pub struct TelemetrySession {
    config: SessionConfig,
    socket: Option<UdpSocket>,
    cancel: CancellationToken,
    state: Arc<SharedState>,
    buf: Vec<u8>,
    consecutive_errors: u32,
}

impl TelemetrySession {
    pub fn new(config: SessionConfig) -> Self {
        let cancel = CancellationToken::new();
        cancel.cancel();
        Self {
            state: Arc::new(SharedState::new(config.history_capacity)),
            buf: vec![0u8; config.max_datagram_size],
            config,
            socket: None,
            cancel,
            consecutive_errors: 0,
        }
    }

    /// Bind to `address:port` and open the receive gate.
    ///
    /// Starting a listening session closes the previous socket first. On an
    /// invalid configuration or a bind failure the session is left idle.
    pub async fn start(&mut self, address: &str, port: u16) -> Result<()> {
        self.config.validate()?;

        if self.socket.is_some() {
            debug!("Rebinding telemetry session");
            self.stop();
        }

        let label = format!("{}:{}", address, port);
        let socket = UdpSocket::bind((address, port))
            .await
            .map_err(|e| TelemetryError::bind_failed(label.clone(), e))?;

        let local = socket.local_addr().ok();
        self.socket = Some(socket);
        self.cancel = CancellationToken::new();
        self.consecutive_errors = 0;
        self.state.reset_packets_received();

        info!(address = %label, local_addr = ?local, "Telemetry session listening");
        Ok(())
    }

    /// Start on the configured bind address and port.
    pub async fn start_configured(&mut self) -> Result<()> {
        let address = self.config.bind_address.clone();
        let port = self.config.bind_port;
        self.start(&address, port).await
    }

    /// Close the gate and the socket. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        self.release_socket();
    }

    fn release_socket(&mut self) {
        if self.socket.take().is_some() {
            info!(packets = self.reader().packets_received(), "Telemetry session stopped");
        }
    }

    /// Handle that stops the current run from any thread or task.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle { token: self.cancel.clone() }
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_running() { SessionStatus::Listening } else { SessionStatus::Idle }
    }

    pub fn is_running(&self) -> bool {
        self.socket.is_some() && !self.cancel.is_cancelled()
    }

    /// Bound address, useful after binding port 0.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.local_addr().ok())
    }

    pub fn reader(&self) -> SessionReader {
        SessionReader::new(self.state.clone())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Wait for one datagram and process it.
    ///
    /// Waits at most the configured receive timeout. Cancelling through a
    /// [`StopHandle`] wakes a pending wait and closes the socket.
    pub async fn receive_one(&mut self) -> ReceiveOutcome {
        if self.cancel.is_cancelled() {
            self.release_socket();
            return ReceiveOutcome::NotRunning;
        }
        let Some(socket) = self.socket.as_ref() else {
            return ReceiveOutcome::NotRunning;
        };

        let timeout = self.config.receive_timeout();
        let received = tokio::select! {
            _ = self.cancel.cancelled() => None,
            result = tokio::time::timeout(timeout, socket.recv_from(&mut self.buf)) => Some(result),
        };
        let Some(received) = received else {
            debug!("Receive cancelled");
            self.release_socket();
            return ReceiveOutcome::NoPacket;
        };

        match received {
            Err(_) => {
                trace!(timeout_ms = self.config.receive_timeout_ms, "No packet before timeout");
                ReceiveOutcome::NoPacket
            }
            Ok(Err(e)) => {
                self.consecutive_errors = self.consecutive_errors.saturating_add(1);
                let err = TelemetryError::socket_error("recv_from", e);
                warn!(error = %err, source = ?std::error::Error::source(&err), consecutive = self.consecutive_errors, "Receive failed");

                // 20ms, 40ms, 80ms, ... capped at 320ms
                let shift = self.consecutive_errors.min(MAX_ERROR_BACKOFF_SHIFT);
                let backoff = Duration::from_millis(10 << shift).min(timeout);
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    _ = tokio::time::sleep(backoff) => {}
                }
                ReceiveOutcome::NoPacket
            }
            Ok(Ok((len, from))) => {
                self.consecutive_errors = 0;
                trace!(bytes = len, from = %from, "Datagram received");
                match self.process_datagram(&self.buf[..len]) {
                    Some(event) => ReceiveOutcome::Event(event),
                    None => ReceiveOutcome::NoEvent,
                }
            }
        }
    }

    /// Decode one datagram, update state and build its event.
    ///
    /// Counts the datagram whether or not it is accepted. Returns `None` for
    /// a truncated header, an unrecognized packet id, or a player index with
    /// no complete record behind it. Recognized packets without a decoder
    /// yield a header-only event.
    pub fn process_datagram(&self, datagram: &[u8]) -> Option<TelemetryEvent> {
        self.state.count_packet();

        let header = match decode_header(datagram) {
            Ok(header) => header,
            Err(err) => {
                debug!(error = %err, "Dropping datagram");
                return None;
            }
        };

        let Some(packet_id) = header.packet_type() else {
            debug!(packet_id = header.packet_id, "Dropping unrecognized packet");
            return None;
        };

        let player = usize::from(header.player_car_index);
        let decoded = match packet_id {
            PacketId::Motion => decode_motion(datagram, &header)
                .and_then(|records| player_record(&records, player))
                .map(PacketData::Motion),
            PacketId::LapData => decode_lap_data(datagram, &header)
                .and_then(|records| player_record(&records, player))
                .map(PacketData::LapData),
            PacketId::CarTelemetry => decode_car_telemetry(datagram, &header)
                .and_then(|records| player_record(&records, player))
                .map(PacketData::CarTelemetry),
            _ => {
                trace!(packet = ?packet_id, frame = header.frame_identifier, "Header-only packet");
                return Some(TelemetryEvent::new(header, None));
            }
        };

        let data = match decoded {
            Ok(data) => data,
            Err(err) => {
                debug!(packet = ?packet_id, error = %err, "Dropping datagram");
                return None;
            }
        };

        let mut event = TelemetryEvent::new(header, Some(data));
        match data {
            PacketData::Motion(record) => self.state.motion.record(record),
            PacketData::CarTelemetry(record) => self.state.telemetry.record(record),
            PacketData::LapData(record) => {
                let previous = self.state.lap_data.current();
                let (lap_completed, sector_changed) = transition::detect(previous.as_ref(), &record);
                self.state.lap_data.record(record);

                if let Some(lap) = lap_completed {
                    info!(lap = lap.lap_number, last_lap_time_ms = lap.last_lap_time_ms, "Lap completed");
                }
                if let Some(sector) = sector_changed {
                    debug!(from = sector.previous_sector, to = sector.sector, "Sector changed");
                }
                event.lap_completed = lap_completed;
                event.sector_changed = sector_changed;
            }
        }

        Some(event)
    }
}

impl std::fmt::Debug for TelemetrySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetrySession")
            .field("status", &self.status())
            .field("local_addr", &self.local_addr())
            .field("config", &self.config)
            .finish()
    }
}

fn player_record<R: Copy>(records: &[R], index: usize) -> Result<R> {
    records.get(index).copied().ok_or_else(|| TelemetryError::index_out_of_range(index, records.len()))
}
