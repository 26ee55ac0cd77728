//! Stream combinators for current-record streams.

mod throttle;

pub use throttle::{Throttle, ThrottleExt};
