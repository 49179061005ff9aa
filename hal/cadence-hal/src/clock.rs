//! Monotonic time source
//!
//! All scheduling and debounce logic measures time in milliseconds held in
//! a `u32`. The counter wraps after roughly 49.7 days; every comparison in
//! the workspace goes through [`elapsed_ms`] so the wrap is harmless.

/// Milliseconds since an arbitrary epoch (usually boot)
pub type Millis = u32;

/// Source of the current time
///
/// Takes `&self` so a single clock can be shared by every timer, input
/// and the scheduler at once.
pub trait Clock {
    /// Current time in milliseconds
    fn now_ms(&self) -> Millis;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}

/// Time elapsed from `since` to `now`, correct across counter wrap
#[inline]
pub fn elapsed_ms(now: Millis, since: Millis) -> Millis {
    now.wrapping_sub(since)
}

/// Whether `now` is at or past `deadline`, correct across counter wrap
///
/// Deadlines more than half the counter range in the past read as
/// future ones; no caller waits anywhere near that long.
#[inline]
pub fn is_reached(now: Millis, deadline: Millis) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}
