//! Logical tick clock and duration formatting
//!
//! The clock counts host simulation steps, not wall-clock time. A tick count is
//! turned into `h:mm:ss.cc` text using the host's fixed ticks-per-second rate.

use serde::{Deserialize, Serialize};

/// One host simulation step
pub type Tick = u64;

/// Rendered in place of a duration when there is no value
pub const NO_VALUE: &str = "-";

/// Monotonic logical tick counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    ticks: Tick,
}

impl Clock {
    /// Create a clock at tick zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick and return the new value
    pub fn tick(&mut self) -> Tick {
        self.ticks += 1;
        self.ticks
    }

    /// Current tick value
    pub fn now(&self) -> Tick {
        self.ticks
    }

    /// Back to tick zero (start of a new run)
    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}

/// Format a tick count as a duration.
///
/// Hours and minutes are omitted while zero; a unit is zero-padded only when a
/// larger unit is shown. Negative input renders as [`NO_VALUE`].
pub fn ticks_to_duration(ticks: i64, fps: u32) -> String {
    if ticks < 0 || fps == 0 {
        return NO_VALUE.to_string();
    }

    let centiseconds = (ticks as f64 / fps as f64 * 100.0).round() as u64;
    let total_minutes = centiseconds / 100 / 60;
    let second_centis = centiseconds - total_minutes * 6000;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    let whole_seconds = second_centis / 100;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}:", hours));
    }
    if hours > 0 || minutes > 0 {
        if hours > 0 && minutes < 10 {
            out.push('0');
        }
        out.push_str(&format!("{}:", minutes));
        if whole_seconds < 10 {
            out.push('0');
        }
    }
    out.push_str(&format!("{}.{:02}", whole_seconds, second_centis % 100));
    out
}

/// Format an optional tick value, `None` rendering as [`NO_VALUE`]
pub fn format_ticks(ticks: Option<Tick>, fps: u32) -> String {
    match ticks {
        Some(t) => match i64::try_from(t) {
            Ok(t) => ticks_to_duration(t, fps),
            Err(_) => NO_VALUE.to_string(),
        },
        None => NO_VALUE.to_string(),
    }
}

/// Format a signed difference with an explicit `+`/`-` sign
pub fn format_delta(delta: i64, fps: u32) -> String {
    let Some(magnitude) = delta.checked_abs() else {
        return NO_VALUE.to_string();
    };
    let sign = if delta < 0 { '-' } else { '+' };
    format!("{}{}", sign, ticks_to_duration(magnitude, fps))
}
