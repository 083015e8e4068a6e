use std::time::{Duration, Instant};

/// A cancellable repeating deadline, polled from the input loop.
///
/// At most one schedule exists: arming again replaces it. Each `poll` fires
/// at most once and the next deadline is counted from the previous one, so
/// a late poll neither drops nor doubles a tick.
#[derive(Debug, Default)]
pub struct Ticker {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Ticker {
    pub fn new() -> Self {
        Ticker::default()
    }

    pub fn arm(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.next_due = Some(now + interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `None` when disarmed.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if due <= now => {
                self.next_due = Some(due + self.interval);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_100: Duration = Duration::from_millis(100);

    #[test]
    fn disarmed_never_fires() {
        let mut ticker = Ticker::new();
        let now = Instant::now();
        assert!(!ticker.poll(now + Duration::from_secs(10)));
        assert_eq!(ticker.time_until_due(now), None);
    }

    #[test]
    fn fires_once_per_interval() {
        let mut ticker = Ticker::new();
        let start = Instant::now();
        ticker.arm(MS_100, start);

        assert!(!ticker.poll(start + Duration::from_millis(99)));
        assert!(ticker.poll(start + MS_100));
        assert!(!ticker.poll(start + MS_100));
        assert_eq!(ticker.time_until_due(start + MS_100), Some(MS_100));
        assert!(ticker.poll(start + Duration::from_millis(200)));
    }

    #[test]
    fn late_poll_catches_up_one_tick_at_a_time() {
        let mut ticker = Ticker::new();
        let start = Instant::now();
        ticker.arm(MS_100, start);

        let late = start + Duration::from_millis(350);
        assert!(ticker.poll(late));
        assert!(ticker.poll(late));
        assert!(ticker.poll(late));
        assert!(!ticker.poll(late));
        assert_eq!(ticker.time_until_due(late), Some(Duration::from_millis(50)));
    }

    #[test]
    fn rearm_replaces_schedule() {
        let mut ticker = Ticker::new();
        let start = Instant::now();
        ticker.arm(MS_100, start);

        let later = start + Duration::from_millis(60);
        ticker.arm(Duration::from_millis(99), later);
        assert_eq!(ticker.interval(), Duration::from_millis(99));
        assert!(!ticker.poll(start + MS_100));
        assert!(ticker.poll(later + Duration::from_millis(99)));
    }

    #[test]
    fn cancel_stops_ticks() {
        let mut ticker = Ticker::new();
        let start = Instant::now();
        ticker.arm(MS_100, start);
        ticker.cancel();
        assert_eq!(ticker.time_until_due(start), None);
        assert!(!ticker.poll(start + Duration::from_secs(1)));
    }
}
