//! Domain types shared by the session, driver and consumers.
//!
//! - [`TelemetryEvent`] is what the receive loop hands out for every accepted
//!   datagram, with the player's decoded record in [`PacketData`] and any
//!   [`LapCompleted`] / [`SectorChanged`] annotations.
//! - [`PitStatus`], [`DriverStatus`], [`ResultStatus`] and [`Gear`] interpret
//!   raw status bytes with an `Unknown` fallback.
//! - [`UpdateRate`] controls how often current-record streams yield.

mod event;
mod status;
mod update_rate;

pub use event::{LapCompleted, PacketData, SectorChanged, TelemetryEvent};
pub use status::{DriverStatus, Gear, PitStatus, ResultStatus};
pub use update_rate::UpdateRate;
