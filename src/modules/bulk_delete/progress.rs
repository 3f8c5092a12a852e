use std::time::{Duration, Instant};

/// Per-run deletion progress. Lives only for the duration of one run.
#[derive(Debug, Clone)]
pub struct ProgressState {
    started_at: Instant,
    pub deleted: u64,
    pub total: u64,
}

impl ProgressState {
    pub fn new(total: u64) -> Self {
        Self {
            started_at: Instant::now(),
            deleted: 0,
            total,
        }
    }

    pub fn record_deleted(&mut self, count: u64) {
        self.deleted += count;
    }

    pub fn is_complete(&self) -> bool {
        self.deleted >= self.total
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn eta(&self) -> Option<Duration> {
        estimate_remaining(self.elapsed(), self.deleted, self.total)
    }
}

/// `"1h 1m 5s"`, omitting the hour component when it is zero.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let seconds = total_seconds % 60;
    let minutes = (total_seconds / 60) % 60;
    let hours = total_seconds / 3600;

    if hours == 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{hours}h {minutes}m {seconds}s")
    }
}

/// Linear extrapolation of the time left: `elapsed * total / completed`
/// minus what has already passed. `None` until the first batch lands.
pub fn estimate_remaining(elapsed: Duration, completed: u64, total: u64) -> Option<Duration> {
    if completed == 0 {
        return None;
    }

    let elapsed_ms = elapsed.as_millis() as u64;
    let estimated_total_ms = elapsed_ms * total / completed;
    Some(Duration::from_millis(
        estimated_total_ms.saturating_sub(elapsed_ms),
    ))
}
