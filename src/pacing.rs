use std::time::{Duration, Instant};

/// Fixed-rate slots. `wait` sleeps out the rest of the current slot; `is_due`
/// is the non-blocking form for work that shares the loop.
pub struct FrequencyLock {
    period: Duration,
    next: Instant,
}

impl FrequencyLock {
    pub fn new(hz: u32) -> Self {
        let period = Duration::from_secs(1) / hz.max(1);
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn wait(&mut self) {
        let now = Instant::now();
        if now < self.next {
            std::thread::sleep(self.next - now);
            self.next += self.period;
        } else {
            // fell behind, don't try to catch up with a burst
            self.next = now + self.period;
        }
    }

    pub fn is_due(&mut self) -> bool {
        self.is_due_at(Instant::now())
    }

    fn is_due_at(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.period;
        if self.next < now {
            self.next = now + self.period;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_from_hz() {
        assert_eq!(FrequencyLock::new(60).period(), Duration::from_nanos(16_666_666));
        assert_eq!(FrequencyLock::new(0).period(), Duration::from_secs(1));
    }

    #[test]
    fn test_due_once_per_slot() {
        let mut lock = FrequencyLock::new(10);
        let start = lock.next - lock.period;
        assert!(!lock.is_due_at(start));
        assert!(lock.is_due_at(start + Duration::from_millis(100)));
        assert!(!lock.is_due_at(start + Duration::from_millis(150)));
        assert!(lock.is_due_at(start + Duration::from_millis(200)));
    }

    #[test]
    fn test_wait_sleeps_out_the_slot() {
        let mut lock = FrequencyLock::new(100);
        let start = Instant::now();
        lock.wait();
        lock.wait();
        assert!(start.elapsed() >= Duration::from_millis(15));
    }
}
