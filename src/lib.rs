//! Type-safe decoder and live session for F1 UDP telemetry.
//!
//! The game broadcasts fixed-layout little-endian packets over UDP (port
//! 20777 by default). This crate decodes the packet header and the motion, lap
//! data and car telemetry packets into strongly typed records, and runs a
//! session that keeps the player's latest record, a bounded history and
//! lap/sector transitions.
//!
//! # Features
//!
//! - **Bounds-checked decoding**: truncated or malformed datagrams never panic
//! - **Pull or push**: call [`TelemetrySession::receive_one`] yourself, or let
//!   [`Racewire::listen`] run the loop and subscribe to streams
//! - **Rate control**: current-record streams can be sampled with [`UpdateRate`]
//!
//! # Decoding a datagram
//!
//! ```rust
//! use racewire::wire::{PacketId, decode_header, decode_car_telemetry};
//!
//! fn handle(datagram: &[u8]) -> racewire::Result<()> {
//!     let header = decode_header(datagram)?;
//!     if header.packet_type() == Some(PacketId::CarTelemetry) {
//!         let cars = decode_car_telemetry(datagram, &header)?;
//!         if let Some(player) = cars.get(header.player_car_index as usize) {
//!             println!("{} km/h in gear {}", player.speed, player.gear);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Live streaming
//!
//! ```rust,no_run
//! use racewire::{Racewire, SessionConfig, UpdateRate};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> racewire::Result<()> {
//!     let connection = Racewire::listen(SessionConfig::default()).await?;
//!     let mut telemetry = connection.telemetry(UpdateRate::Max(10));
//!
//!     while let Some(record) = telemetry.next().await {
//!         println!("Speed: {} km/h", record.speed);
//!     }
//!     Ok(())
//! }
//! ```

mod config;
mod error;
pub mod summary;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;
pub mod wire;

// Session and streaming
pub mod connection;
pub mod driver;
pub mod session;
pub mod stream;

pub use config::{ENV_BIND_ADDRESS, ENV_UDP_PORT, SessionConfig};
pub use error::*;
pub use types::*;

pub use wire::{
    CarMotionRecord, CarTelemetryRecord, LapDataRecord, PacketHeader, PacketId, Wheel,
};

pub use connection::LiveConnection;
pub use session::{ReceiveOutcome, SessionReader, SessionStatus, StopHandle, TelemetrySession};
pub use summary::{SessionSummary, format_lap_time};

/// Entry point for live telemetry connections.
///
/// # Example
///
/// ```rust,no_run
/// use racewire::{Racewire, SessionConfig};
///
/// # #[tokio::main]
/// # async fn main() -> racewire::Result<()> {
/// let config = SessionConfig::default().with_env_overrides();
/// let connection = Racewire::listen(config).await?;
/// println!("Listening on {:?}", connection.local_addr());
/// # Ok(())
/// # }
/// ```
pub struct Racewire;

impl Racewire {
    /// Bind the configured address and start receiving in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration fails validation
    /// - The UDP socket cannot be bound (port in use, unknown address)
    pub async fn listen(config: SessionConfig) -> Result<LiveConnection> {
        LiveConnection::listen(config).await
    }
}
