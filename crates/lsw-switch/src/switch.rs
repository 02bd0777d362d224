use chrono::Utc;
use tracing::info;

use crate::view::SwitchSnapshot;

/// Recognised "on" position.
pub const ON: &str = "on";
/// Recognised "off" position.
pub const OFF: &str = "off";

/// The opposite recognised position, or `None` for any other string.
///
/// `None` means a transition leaves `next` where it was.
pub fn complement(state: &str) -> Option<&'static str> {
    match state {
        ON => Some(OFF),
        OFF => Some(ON),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Switch
// ---------------------------------------------------------------------------

/// A named toggle with the time of its most recent change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Switch {
    name: String,
    state: String,
    next: String,
    timestamp: u64,
}

impl Switch {
    /// Build a switch that has never transitioned (`timestamp == 0`).
    pub fn new(
        name: impl Into<String>,
        initial_state: impl Into<String>,
        initial_next: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            state: initial_state.into(),
            next: initial_next.into(),
            timestamp: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn next(&self) -> &str {
        &self.next
    }

    /// Nanoseconds since the Unix epoch of the last transition; `0` if none.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Apply `requested` using the current wall clock.
    ///
    /// The value is not validated: any string becomes the new state.
    pub fn transition(&mut self, requested: &str) {
        self.transition_at(requested, now_nanos());
    }

    /// Apply `requested` as if the clock read `now_nanos`.
    ///
    /// The stamp is `max(now_nanos, timestamp + 1)` so it strictly increases
    /// across calls even when the clock is coarse or steps backwards.
    pub fn transition_at(&mut self, requested: &str, now_nanos: u64) {
        self.timestamp = now_nanos.max(self.timestamp.saturating_add(1));
        self.state = requested.to_string();
        if let Some(next) = complement(requested) {
            self.next = next.to_string();
        }

        info!(
            name = %self.name,
            state = %self.state,
            next = %self.next,
            timestamp = self.timestamp,
            "switch transition"
        );
    }

    /// Owned copy of all four fields, taken together.
    pub fn snapshot(&self) -> SwitchSnapshot {
        SwitchSnapshot {
            name: self.name.clone(),
            state: self.state.clone(),
            next: self.next.clone(),
            timestamp: self.timestamp,
        }
    }
}

fn now_nanos() -> u64 {
    // Pre-epoch clocks (and the i64 overflow in 2262) collapse to 0; the
    // monotonic stamp in `transition_at` still advances.
    Utc::now()
        .timestamp_nanos_opt()
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
