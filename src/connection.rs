//! Live UDP telemetry connection

use futures::{Stream, StreamExt};
use std::net::SocketAddr;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};
use tracing::{debug, info, warn};

use crate::driver::Driver;
use crate::session::{SessionReader, StopHandle, TelemetrySession};
use crate::stream::ThrottleExt;
use crate::types::{TelemetryEvent, UpdateRate};
use crate::wire::{CarMotionRecord, CarTelemetryRecord, LapDataRecord};
use crate::{Result, SessionConfig};

/// Handle to a listening session whose receive loop runs in the background.
///
/// Dropping the connection stops the loop and closes the socket.
pub struct LiveConnection {
    events: broadcast::Receiver<TelemetryEvent>,
    reader: SessionReader,
    stop: StopHandle,
    local_addr: Option<SocketAddr>,
    source_hz: f64,
}

impl LiveConnection {
    /// Bind using `config` and start the receive loop.
    ///
    /// Fails only if the configuration is invalid or the socket cannot be bound.
    pub async fn listen(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let source_hz = config.source_hz;

        let mut session = TelemetrySession::new(config);
        session.start_configured().await?;
        let local_addr = session.local_addr();

        let channels = Driver::spawn(session);
        info!(local_addr = ?local_addr, "Live connection established, waiting for packets");

        Ok(Self {
            events: channels.events,
            reader: channels.reader,
            stop: channels.stop,
            local_addr,
            source_hz,
        })
    }

    /// Every accepted event from now on.
    ///
    /// A consumer that falls behind by more than the channel capacity skips
    /// the oldest events. The stream ends when the connection stops.
    pub fn events(&self) -> impl Stream<Item = TelemetryEvent> + 'static {
        BroadcastStream::new(self.events.resubscribe()).filter_map(|item| async move {
            match item {
                Ok(event) => Some(event),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event subscriber lagging, oldest events dropped");
                    None
                }
            }
        })
    }

    /// Player car telemetry, latest value at the requested rate.
    pub fn telemetry(&self, rate: UpdateRate) -> impl Stream<Item = CarTelemetryRecord> + 'static {
        self.current_stream(self.reader.watch_telemetry(), rate)
    }

    /// Player lap data, latest value at the requested rate.
    pub fn lap_data(&self, rate: UpdateRate) -> impl Stream<Item = LapDataRecord> + 'static {
        self.current_stream(self.reader.watch_lap_data(), rate)
    }

    /// Player motion, latest value at the requested rate.
    pub fn motion(&self, rate: UpdateRate) -> impl Stream<Item = CarMotionRecord> + 'static {
        self.current_stream(self.reader.watch_motion(), rate)
    }

    fn current_stream<T>(
        &self,
        rx: watch::Receiver<Option<T>>,
        rate: UpdateRate,
    ) -> futures::stream::BoxStream<'static, T>
    where
        T: Clone + Send + Sync + 'static,
    {
        // WatchStream yields the current value first; None until the first packet
        let records = WatchStream::new(rx).filter_map(|opt| async move { opt });

        match rate.throttle_interval(self.source_hz) {
            None => records.boxed(),
            Some(period) => records.throttle(period).boxed(),
        }
    }

    pub fn reader(&self) -> &SessionReader {
        &self.reader
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn source_hz(&self) -> f64 {
        self.source_hz
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped()
    }

    /// Stop the receive loop. Event streams end once it exits.
    pub fn stop(&self) {
        self.stop.stop();
    }
}

impl Drop for LiveConnection {
    fn drop(&mut self) {
        debug!("Dropping live connection");
        self.stop.stop();
    }
}
