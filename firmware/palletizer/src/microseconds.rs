/// Time in microseconds.
///
/// Timestamps come from a free-running counter that wraps after roughly 71
/// minutes, so durations must always be computed with [MicroSeconds::since].
#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Copy, Clone)]
pub struct MicroSeconds(u32);
impl MicroSeconds {
    /// Creates a new `MicroSeconds`.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Creates a `MicroSeconds` from a number of milliseconds.
    ///
    /// Saturates at the largest representable value.
    pub const fn from_millis(millis: u32) -> Self {
        Self(millis.saturating_mul(1000))
    }

    /// Zero microseconds.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Returns the value as a `u32`.
    pub fn get_value(&self) -> u32 {
        self.0
    }

    /// Returns the time elapsed since an `earlier` timestamp.
    ///
    /// Wrapping of the underlying counter is handled, provided that less
    /// than one full counter period has passed.
    ///
    /// # Parameters
    ///
    /// - `earlier`: The earlier timestamp.
    pub fn since(&self, earlier: MicroSeconds) -> MicroSeconds {
        MicroSeconds(self.0.wrapping_sub(earlier.0))
    }

    /// Returns the timestamp that lies `duration` before this one.
    pub fn rewind(&self, duration: MicroSeconds) -> MicroSeconds {
        MicroSeconds(self.0.wrapping_sub(duration.0))
    }

    /// Returns true if at least `duration` has passed between `start` and
    /// this timestamp.
    pub fn has_elapsed(&self, start: MicroSeconds, duration: MicroSeconds) -> bool {
        self.since(start) >= duration
    }
}

/// Source of monotonic timestamps.
///
/// Control loops never block on time; they read the clock and compare
/// against recorded timestamps.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> MicroSeconds;
}

#[cfg(test)]
pub mod test {
    use super::*;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    /// Clock to use for testing purposes.
    ///
    /// Every read advances the clock by a fixed increment, so that loops
    /// which poll the clock always make progress. Clones share the same
    /// underlying time.
    #[derive(Clone)]
    pub struct TestClock {
        now: Arc<Mutex<u32>>,
        increment: u32,
    }
    impl TestClock {
        /// Creates a new test clock starting at `start` microseconds.
        pub fn new(start: u32, increment: u32) -> Self {
            Self {
                now: Arc::new(Mutex::new(start)),
                increment,
            }
        }

        /// Moves the clock forward without reading it.
        pub fn advance(&self, duration: MicroSeconds) {
            let mut now = self.now.lock().unwrap();
            *now = now.wrapping_add(duration.get_value());
        }

        /// Returns the current time without advancing the clock.
        pub fn peek(&self) -> MicroSeconds {
            MicroSeconds::new(*self.now.lock().unwrap())
        }
    }
    impl Clock for TestClock {
        fn now(&self) -> MicroSeconds {
            let mut now = self.now.lock().unwrap();
            let current = *now;
            *now = now.wrapping_add(self.increment);
            MicroSeconds::new(current)
        }
    }

    #[test]
    fn test_from_millis() {
        assert_eq!(MicroSeconds::new(1_500_000), MicroSeconds::from_millis(1500));
        assert_eq!(MicroSeconds::new(u32::MAX), MicroSeconds::from_millis(u32::MAX));
    }

    #[test]
    fn test_since_wraps() {
        let earlier = MicroSeconds::new(u32::MAX - 9);
        let later = MicroSeconds::new(10);
        assert_eq!(MicroSeconds::new(20), later.since(earlier));
        assert!(later.has_elapsed(earlier, MicroSeconds::new(20)));
        assert!(!later.has_elapsed(earlier, MicroSeconds::new(21)));
    }

    #[test]
    fn test_clock_advances_on_read() {
        let clock = TestClock::new(100, 5);
        assert_eq!(MicroSeconds::new(100), clock.now());
        assert_eq!(MicroSeconds::new(105), clock.now());
        clock.advance(MicroSeconds::new(1000));
        assert_eq!(MicroSeconds::new(1110), clock.peek());
    }

    proptest! {
        #[test]
        fn test_rewind_since(start: u32, duration: u32) {
            let now = MicroSeconds::new(start);
            let duration = MicroSeconds::new(duration);
            assert_eq!(duration, now.since(now.rewind(duration)));
        }
    }
}
