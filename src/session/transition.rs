//! Lap and sector edge detection between consecutive lap data records.

use crate::types::{LapCompleted, SectorChanged};
use crate::wire::LapDataRecord;

/// Compare the player's new lap data against the previous current record.
///
/// A lap completes only when the lap number strictly increases, so a reset to
/// a lower lap number (new session) is not reported. The two annotations are
/// independent of each other.
pub fn detect(
    previous: Option<&LapDataRecord>,
    current: &LapDataRecord,
) -> (Option<LapCompleted>, Option<SectorChanged>) {
    let Some(previous) = previous else {
        return (None, None);
    };

    let lap_completed = (current.current_lap_num > previous.current_lap_num).then_some(LapCompleted {
        last_lap_time_ms: previous.last_lap_time_in_ms,
        lap_number: current.current_lap_num,
    });

    let sector_changed = (current.sector != previous.sector)
        .then_some(SectorChanged { previous_sector: previous.sector, sector: current.sector });

    (lap_completed, sector_changed)
}
