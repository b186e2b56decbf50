// ==================== Timers ====================
// Both timers are driven by elapsed milliseconds handed in by the game loop,
// nothing here reads a clock. That keeps them deterministic under test.
//
// ┌────────────────── Collection → Timer Timeline ───────────────────┐
// │ t=0 collect   t=G resume                       t=G+D reposition  │
// │   │──suspended──│────────── counting down D ─────────│           │
// └──────────────────────────────────────────────────────────────────┘

/// Looping countdown that fires every `delay_ms` of un-suspended time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepositionTimer {
    delay_ms: f64,
    elapsed_ms: f64,
    suspended: bool,
}

impl RepositionTimer {
    pub fn new(delay_ms: f64) -> Self {
        RepositionTimer {
            delay_ms,
            elapsed_ms: 0.0,
            suspended: false,
        }
    }

    /// Advance by `dt_ms` and return how many times the timer expired.
    /// - suspended timers don't accumulate time at all
    /// - a long frame may expire it more than once
    pub fn tick(&mut self, dt_ms: f64) -> u32 {
        if self.suspended || self.delay_ms <= 0.0 {
            return 0;
        }
        self.elapsed_ms += dt_ms;
        let mut fired = 0;
        while self.elapsed_ms >= self.delay_ms {
            self.elapsed_ms -= self.delay_ms;
            fired += 1;
        }
        fired
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// New delay, countdown restarts from zero. Suspension is left alone.
    pub fn reset_delay(&mut self, delay_ms: f64) {
        self.delay_ms = delay_ms;
        self.elapsed_ms = 0.0;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    pub fn remaining_ms(&self) -> f64 {
        (self.delay_ms - self.elapsed_ms).max(0.0)
    }
}

/// One shot countdown, the equivalent of a `setTimeout` owned by the game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayedCall {
    remaining_ms: f64,
    done: bool,
}

impl DelayedCall {
    pub fn new(delay_ms: f64) -> Self {
        DelayedCall {
            remaining_ms: delay_ms,
            done: false,
        }
    }

    /// true exactly once: on the tick that runs the countdown out
    pub fn tick(&mut self, dt_ms: f64) -> bool {
        if self.done {
            return false;
        }
        self.remaining_ms -= dt_ms;
        if self.remaining_ms <= 0.0 {
            self.remaining_ms = 0.0;
            self.done = true;
            return true;
        }
        false
    }

    pub fn remaining_ms(&self) -> f64 {
        self.remaining_ms
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fires_after_full_delay() {
        let mut timer = RepositionTimer::new(5000.0);
        assert_eq!(timer.tick(4999.0), 0);
        assert_eq!(timer.tick(1.0), 1);
        assert_relative_eq!(timer.remaining_ms(), 5000.0);
    }

    #[test]
    fn keeps_looping() {
        let mut timer = RepositionTimer::new(100.0);
        let fired: u32 = (0..25).map(|_| timer.tick(20.0)).sum();
        assert_eq!(fired, 5);
    }

    #[test]
    fn long_frame_fires_more_than_once() {
        let mut timer = RepositionTimer::new(100.0);
        assert_eq!(timer.tick(250.0), 2);
        assert_relative_eq!(timer.remaining_ms(), 50.0);
    }

    #[test]
    fn suspended_timer_does_not_advance() {
        let mut timer = RepositionTimer::new(100.0);
        timer.tick(60.0);
        timer.suspend();
        assert_eq!(timer.tick(1000.0), 0);
        assert_relative_eq!(timer.remaining_ms(), 40.0);
        timer.resume();
        assert_eq!(timer.tick(40.0), 1);
    }

    #[test]
    fn reset_delay_restarts_countdown() {
        let mut timer = RepositionTimer::new(100.0);
        timer.tick(90.0);
        timer.reset_delay(200.0);
        assert_eq!(timer.tick(150.0), 0);
        assert_relative_eq!(timer.remaining_ms(), 50.0);
        assert_relative_eq!(timer.delay_ms(), 200.0);
    }

    #[test]
    fn delayed_call_fires_once() {
        let mut call = DelayedCall::new(1000.0);
        assert!(!call.tick(600.0));
        assert!(call.tick(600.0));
        assert!(call.is_done());
        assert!(!call.tick(600.0));
        assert_relative_eq!(call.remaining_ms(), 0.0);
    }
}
