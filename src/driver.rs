//! Driver runs a session's receive loop as a background task

use tokio::sync::broadcast;
use tracing::{debug, info, trace};

use crate::session::{ReceiveOutcome, SessionReader, StopHandle, TelemetrySession};
use crate::types::TelemetryEvent;

/// Handles returned by [`Driver::spawn`]
pub struct DriverChannels {
    /// Event receiver; `resubscribe()` for additional consumers. Closes when
    /// the receive loop ends.
    pub events: broadcast::Receiver<TelemetryEvent>,
    /// Read access to current records and histories
    pub reader: SessionReader,
    /// Stops the receive loop
    pub stop: StopHandle,
}

/// Driver owns a started session and pumps it until stopped
///
/// Every event is broadcast to all subscribers. A subscriber that falls more
/// than the channel capacity behind loses its oldest events.
pub struct Driver;

impl Driver {
    /// Spawn the receive loop for an already started session
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(session: TelemetrySession) -> DriverChannels {
        let capacity = session.config().event_channel_capacity.max(1);
        let (events_tx, events) = broadcast::channel(capacity);
        let reader = session.reader();
        let stop = session.stop_handle();

        tokio::spawn(async move {
            Self::receive_task(session, events_tx).await;
        });

        DriverChannels { events, reader, stop }
    }

    async fn receive_task(mut session: TelemetrySession, events: broadcast::Sender<TelemetryEvent>) {
        info!(local_addr = ?session.local_addr(), "Receive task started");
        let mut event_count = 0u64;
        let mut dropped_count = 0u64;

        loop {
            match session.receive_one().await {
                ReceiveOutcome::Event(event) => {
                    event_count += 1;
                    trace!(event = event_count, packet = ?event.packet_type(), "Publishing event");
                    // No subscribers is fine; state is still updated for readers
                    let _ = events.send(event);
                }
                ReceiveOutcome::NoEvent => dropped_count += 1,
                ReceiveOutcome::NoPacket => {}
                ReceiveOutcome::NotRunning => {
                    debug!("Session no longer running");
                    break;
                }
            }
        }

        session.stop();
        info!(events = event_count, dropped = dropped_count, "Receive task ended");
    }
}
