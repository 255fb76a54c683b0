use chrono::{DateTime, Duration, Utc};

/// Quiet period before a pending remote upsert fires.
pub const DEFAULT_DEBOUNCE_MS: i64 = 1000;

/// Single-shot coalescing timer: `poke` arms (or re-arms) a deadline, and the
/// action runs when `fire_if_due` first observes a time past it. Bursts of
/// pokes collapse into one firing carrying only the latest state.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<DateTime<Utc>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arms the timer, replacing any earlier deadline.
    pub fn poke(&mut self, now: DateTime<Utc>) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Disarms the timer, reporting whether a firing was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Returns true exactly once per armed deadline, when `now` has reached it.
    pub fn fire_if_due(&mut self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(Duration::milliseconds(DEFAULT_DEBOUNCE_MS))
    }
}
