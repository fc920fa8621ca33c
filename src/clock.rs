use std::time::{Duration, Instant};

/// Fixed-period gate checked against a monotonic sample taken once per tick.
///
/// The first check is always due; afterwards the next deadline is the
/// sampled time plus the period. Nothing blocks or sleeps.
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    next_due: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// True when the deadline has passed; arms the next deadline if so.
    pub fn due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(deadline) if now < deadline => false,
            _ => {
                self.next_due = Some(now + self.period);
                true
            }
        }
    }
}

/// Seconds from config; negative or non-finite values mean "every tick".
pub fn duration_from_secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}
