//! Time and session allocation ranges.
//!
//! Curriculum components carry an estimated time budget as a low/medium/high
//! range of minutes. The tally works in sessions, so ranges convert between
//! the two views at a given session duration:
//! - [`MinuteRange`] keeps integer minutes and clamps `medium` into bounds
//! - [`SessionRange`] keeps fractional sessions and leaves `medium` alone
//! - [`RoundedSessions`] is an integer projection of a session range

use serde::{Deserialize, Serialize};

/// Tolerance used when deciding whether two session counts are the same
const SESSION_EPSILON: f64 = 1e-7;

/// Session duration assumed when an allocation is given in sessions
pub const DEFAULT_SESSION_MINUTES: u32 = 60;

fn clamp_minutes(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

/// Format a session count with at most two decimals, trimming trailing
/// zeros and a bare decimal point (`3.00` → `3`, `3.50` → `3.5`).
pub fn format_sessions(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    if !formatted.contains('.') {
        return formatted;
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

// ============================================================================
// Minute ranges
// ============================================================================

/// Range of minutes with an optional medium anchor.
///
/// Invariant: when `medium` is set it lies in `[low, high]`. All
/// constructors and setters re-establish it; negative inputs clamp to 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MinuteRangeRepr", into = "MinuteRangeRepr")]
pub struct MinuteRange {
    low: u32,
    medium: Option<u32>,
    high: u32,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct MinuteRangeRepr {
    low: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    medium: Option<i64>,
    #[serde(default)]
    high: Option<i64>,
}

impl From<MinuteRangeRepr> for MinuteRange {
    fn from(repr: MinuteRangeRepr) -> Self {
        MinuteRange::new(repr.low, repr.medium, repr.high)
    }
}

impl From<MinuteRange> for MinuteRangeRepr {
    fn from(range: MinuteRange) -> Self {
        MinuteRangeRepr {
            low: range.low as i64,
            medium: range.medium.map(|m| m as i64),
            high: Some(range.high as i64),
        }
    }
}

impl MinuteRange {
    /// Build a range; `high` defaults to `low` when absent.
    pub fn new(low: i64, medium: Option<i64>, high: Option<i64>) -> Self {
        let low = clamp_minutes(low);
        let high = high.map(clamp_minutes).unwrap_or(low);
        let mut range = MinuteRange {
            low,
            medium: medium.map(clamp_minutes),
            high,
        };
        range.clamp_medium();
        range
    }

    /// A range with only low and high anchors
    pub fn span(low: i64, high: i64) -> Self {
        Self::new(low, None, Some(high))
    }

    /// A single fixed number of minutes
    pub fn exactly(minutes: i64) -> Self {
        Self::new(minutes, None, None)
    }

    // `high < low` is tolerated, so this is max-then-min rather than clamp()
    fn clamp_medium(&mut self) {
        if let Some(medium) = self.medium {
            self.medium = Some(medium.max(self.low).min(self.high));
        }
    }

    pub fn low(&self) -> u32 {
        self.low
    }

    pub fn medium(&self) -> Option<u32> {
        self.medium
    }

    pub fn high(&self) -> u32 {
        self.high
    }

    pub fn set_low(&mut self, low: i64) {
        self.low = clamp_minutes(low);
        self.clamp_medium();
    }

    pub fn set_medium(&mut self, medium: Option<i64>) {
        self.medium = medium.map(clamp_minutes);
        self.clamp_medium();
    }

    pub fn set_high(&mut self, high: i64) {
        self.high = clamp_minutes(high);
        self.clamp_medium();
    }

    /// `medium` if set, else the integer midpoint of low and high
    pub fn effective_medium(&self) -> u32 {
        self.medium
            .unwrap_or(((self.low as u64 + self.high as u64) / 2) as u32)
    }

    /// Convert to sessions of `duration` minutes (minimum 1)
    pub fn session_range(&self, duration: u32) -> SessionRange {
        let duration = duration.max(1) as f64;
        SessionRange::new(
            self.low as f64 / duration,
            self.medium.map(|m| m as f64 / duration),
            Some(self.high as f64 / duration),
        )
    }

    /// Human readable minutes and sessions for a session duration
    pub fn summary(&self, session_duration: u32) -> RangeSummary {
        let minutes_text = if self.low == self.high {
            format!("{} min", self.low)
        } else {
            format!("{}–{} min", self.low, self.high)
        };

        let sessions_text = if self.low == 0 && self.high == 0 {
            None
        } else {
            let sessions = self.session_range(session_duration);
            if (sessions.low - sessions.high).abs() < SESSION_EPSILON {
                Some(format!("{} sess", format_sessions(sessions.low)))
            } else {
                Some(format!(
                    "{}–{} sess",
                    format_sessions(sessions.low),
                    format_sessions(sessions.high)
                ))
            }
        };

        RangeSummary {
            minutes_text,
            sessions_text,
        }
    }
}

/// Display strings produced by [`MinuteRange::summary`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSummary {
    pub minutes_text: String,
    pub sessions_text: Option<String>,
}

// ============================================================================
// Session ranges
// ============================================================================

/// Range of (possibly fractional) sessions.
///
/// `low` and `high` are non-negative and `high` defaults to `low`. Unlike
/// [`MinuteRange`], `medium` is stored exactly as given.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRange {
    pub low: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<f64>,
    pub high: f64,
}

impl SessionRange {
    pub fn new(low: f64, medium: Option<f64>, high: Option<f64>) -> Self {
        let low = low.max(0.0);
        let high = high.map(|h| h.max(0.0)).unwrap_or(low);
        SessionRange { low, medium, high }
    }

    pub fn span(low: f64, high: f64) -> Self {
        Self::new(low, None, Some(high))
    }

    /// `medium` if set, else the exact midpoint of low and high
    pub fn effective_medium(&self) -> f64 {
        self.medium.unwrap_or((self.low + self.high) / 2.0)
    }

    /// Convert to minutes at `duration` minutes per session (minimum 1)
    pub fn minute_range(&self, duration: u32) -> MinuteRange {
        let duration = duration.max(1) as f64;
        MinuteRange::new(
            (self.low * duration).round() as i64,
            self.medium.map(|m| (m * duration).round() as i64),
            Some((self.high * duration).round() as i64),
        )
    }

    /// Round each field half away from zero
    pub fn rounded(&self) -> RoundedSessions {
        self.project(f64::round)
    }

    /// Round each field down
    pub fn floored(&self) -> RoundedSessions {
        self.project(f64::floor)
    }

    /// Round each field up
    pub fn ceiled(&self) -> RoundedSessions {
        self.project(f64::ceil)
    }

    fn project(&self, policy: fn(f64) -> f64) -> RoundedSessions {
        RoundedSessions {
            low: policy(self.low) as i64,
            medium: self.medium.map(|m| policy(m) as i64),
            high: policy(self.high) as i64,
        }
    }
}

/// Integer projection of a [`SessionRange`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundedSessions {
    pub low: i64,
    pub medium: Option<i64>,
    pub high: i64,
}

// ============================================================================
// Allocation
// ============================================================================

/// Time budget attached to a curriculum component, always held in minutes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionAllocation {
    minutes: MinuteRange,
}

impl SessionAllocation {
    pub fn from_minutes(minutes: MinuteRange) -> Self {
        SessionAllocation { minutes }
    }

    /// Convert a session range using the default 60 minute session
    pub fn from_sessions(sessions: SessionRange) -> Self {
        SessionAllocation {
            minutes: sessions.minute_range(DEFAULT_SESSION_MINUTES),
        }
    }

    pub fn minutes(&self) -> &MinuteRange {
        &self.minutes
    }
}

impl From<MinuteRange> for SessionAllocation {
    fn from(minutes: MinuteRange) -> Self {
        Self::from_minutes(minutes)
    }
}

impl From<SessionRange> for SessionAllocation {
    fn from(sessions: SessionRange) -> Self {
        Self::from_sessions(sessions)
    }
}
