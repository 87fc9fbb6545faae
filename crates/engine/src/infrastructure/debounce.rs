//! Timer-free debouncing driven by an injected clock.
//!
//! A [`Debouncer`] holds at most one pending value. Scheduling a new value
//! replaces the pending one and restarts the delay; the owner decides when
//! to look at it again with [`Debouncer::poll`], or forces it out with
//! [`Debouncer::flush`] (blur, unmount) and drops it with
//! [`Debouncer::cancel`].

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::infrastructure::ports::ClockPort;

struct Pending<T> {
    value: T,
    scheduled_at: DateTime<Utc>,
}

pub struct Debouncer<T, C: ClockPort> {
    clock: C,
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T, C: ClockPort> Debouncer<T, C> {
    pub fn new(clock: C, delay: Duration) -> Self {
        Self {
            clock,
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|pending| &pending.value)
    }

    /// Replaces any pending value and restarts the delay.
    ///
    /// Returns the value that was superseded.
    pub fn schedule(&mut self, value: T) -> Option<T> {
        let scheduled_at = self.clock.now();
        self.pending
            .replace(Pending {
                value,
                scheduled_at,
            })
            .map(|previous| previous.value)
    }

    /// Whether the pending value has waited out the delay.
    pub fn due(&self) -> bool {
        self.pending.as_ref().is_some_and(|pending| {
            (self.clock.now() - pending.scheduled_at)
                .to_std()
                .is_ok_and(|elapsed| elapsed >= self.delay)
        })
    }

    /// Takes the pending value once it is due.
    pub fn poll(&mut self) -> Option<T> {
        if self.due() {
            self.flush()
        } else {
            None
        }
    }

    /// Takes the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    /// Drops the pending value; returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::ManualClock;
    use crate::infrastructure::ports::MockClockPort;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn debouncer() -> (Arc<ManualClock>, Debouncer<&'static str, Arc<ManualClock>>) {
        let clock = Arc::new(ManualClock::starting_at(start()));
        let debouncer = Debouncer::new(clock.clone(), Duration::from_millis(300));
        (clock, debouncer)
    }

    #[test]
    fn value_is_released_only_after_the_delay() {
        let (clock, mut debouncer) = debouncer();
        assert_eq!(debouncer.schedule("a"), None);

        clock.advance(chrono::Duration::milliseconds(299));
        assert!(!debouncer.due());
        assert_eq!(debouncer.poll(), None);
        assert!(debouncer.is_pending());

        clock.advance(chrono::Duration::milliseconds(1));
        assert_eq!(debouncer.poll(), Some("a"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn rescheduling_restarts_the_delay() {
        let (clock, mut debouncer) = debouncer();
        debouncer.schedule("a");
        clock.advance(chrono::Duration::milliseconds(200));
        assert_eq!(debouncer.schedule("ab"), Some("a"));

        clock.advance(chrono::Duration::milliseconds(200));
        assert_eq!(debouncer.poll(), None);
        clock.advance(chrono::Duration::milliseconds(100));
        assert_eq!(debouncer.poll(), Some("ab"));
    }

    #[test]
    fn flush_releases_early_and_cancel_discards() {
        let (_, mut debouncer) = debouncer();
        debouncer.schedule("a");
        assert_eq!(debouncer.flush(), Some("a"));
        assert_eq!(debouncer.flush(), None);

        debouncer.schedule("b");
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());
        assert_eq!(debouncer.poll(), None);
    }

    #[test]
    fn clock_running_backwards_never_releases() {
        let mut clock = MockClockPort::new();
        let mut calls = 0;
        clock.expect_now().returning(move || {
            calls += 1;
            if calls == 1 {
                start()
            } else {
                start() - chrono::Duration::seconds(5)
            }
        });
        let mut debouncer = Debouncer::new(clock, Duration::ZERO);
        debouncer.schedule(1);
        assert!(!debouncer.due());
    }
}
