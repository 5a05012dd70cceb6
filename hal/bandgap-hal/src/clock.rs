//! Monotonic millisecond clock
//!
//! The counter is free-running and wraps at `u32::MAX`; all comparisons
//! go through the wrapping helpers below.

/// Free-running millisecond counter
pub trait Clock {
    /// Current counter value in milliseconds
    fn now_ms(&self) -> u32;

    /// Milliseconds elapsed since `since`
    fn elapsed_since(&self, since: u32) -> u32 {
        self.now_ms().wrapping_sub(since)
    }
}

/// Whether `deadline` has been reached at `now`
///
/// Valid as long as the two instants are less than `u32::MAX / 2` ms apart.
pub fn deadline_reached(now: u32, deadline: u32) -> bool {
    now.wrapping_sub(deadline) < u32::MAX / 2
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_reached_simple() {
        assert!(!deadline_reached(99, 100));
        assert!(deadline_reached(100, 100));
        assert!(deadline_reached(150, 100));
    }

    #[test]
    fn test_deadline_reached_across_wrap() {
        let deadline = 10u32;
        assert!(!deadline_reached(u32::MAX - 5, deadline));
        assert!(deadline_reached(10, deadline));
        assert!(deadline_reached(11, deadline));
    }
}
