// src/common/timing.rs

use core::ops::RangeInclusive;
use core::time::Duration;

/// Time budget for a single bus transaction, bus acquisition excluded.
pub const BUS_TIMEOUT: Duration = Duration::from_millis(50);

/// Polling cadence used when the caller does not pick one.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Measurement intervals the sensor accepts, in seconds.
pub const MEASUREMENT_INTERVAL_RANGE: RangeInclusive<u16> = 2..=1800;

/// Converts a polling interval to the whole seconds sent with `SetInterval`.
///
/// Truncates like integer division of milliseconds by 1000 and saturates at
/// `u16::MAX`.
pub fn interval_seconds(interval: Duration) -> u16 {
    u16::try_from(interval.as_secs()).unwrap_or(u16::MAX)
}
