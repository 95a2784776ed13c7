//! Millisecond timestamp arithmetic
//!
//! Timestamps are raw `u32` millisecond counters that wrap after ~49.7 days.
//! Differences are computed with wrapping subtraction, so a wrap between two
//! readings still yields the right elapsed time.

/// Differences above this are treated as a timestamp from the past
///
/// A wrapped `u32` difference cannot tell "far in the future" from "slightly
/// in the past", so the upper half of the range is read as the latter.
pub const STALE_THRESHOLD_MS: u32 = u32::MAX / 2;

/// Milliseconds elapsed from `since_ms` to `now_ms`
///
/// Returns 0 when `now_ms` is earlier than `since_ms` (a stale reading).
pub const fn elapsed_ms(now_ms: u32, since_ms: u32) -> u32 {
    let diff = now_ms.wrapping_sub(since_ms);
    if diff > STALE_THRESHOLD_MS {
        0
    } else {
        diff
    }
}
