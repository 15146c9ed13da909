use std::time::Duration;
use tokio::time::Instant;

/// Holds the latest pushed value until no new value has arrived for the
/// quiet period.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Replaces any pending value and restarts the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.quiet)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn take_ready(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_released_after_quiet_period() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.push("ng", t0);
        assert_eq!(debouncer.take_ready(t0 + Duration::from_millis(299)), None);
        assert_eq!(
            debouncer.take_ready(t0 + Duration::from_millis(300)),
            Some("ng")
        );
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_new_value_restarts_quiet_period() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.push("n", t0);
        debouncer.push("ng", t0 + Duration::from_millis(200));
        assert_eq!(debouncer.take_ready(t0 + Duration::from_millis(400)), None);
        assert_eq!(
            debouncer.deadline(),
            Some(t0 + Duration::from_millis(500))
        );
        assert_eq!(
            debouncer.take_ready(t0 + Duration::from_millis(500)),
            Some("ng")
        );
    }

    #[test]
    fn test_flush_ignores_deadline() {
        let mut debouncer = Debouncer::new(Duration::from_secs(10));
        debouncer.push(String::from("nginx"), Instant::now());
        assert_eq!(debouncer.flush().as_deref(), Some("nginx"));
        assert_eq!(debouncer.flush(), None);
    }
}
