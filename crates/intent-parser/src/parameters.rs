//! Parameters extracted from an utterance for a specific intent

use serde::{Deserialize, Serialize};

/// Location used when a weather request names no place
pub const DEFAULT_LOCATION: &str = "current location";

/// Units a spoken duration can be given in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    /// Seconds in one of this unit
    pub fn seconds(&self) -> u64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Minutes => 60,
            TimeUnit::Hours => 3600,
        }
    }
}

/// A timer duration normalized to seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDuration {
    /// Total duration in seconds
    pub seconds: u64,
    /// Unit of `seconds`; always [`TimeUnit::Seconds`] after normalization
    pub unit: TimeUnit,
    /// Unit the user actually said
    pub spoken_unit: TimeUnit,
}

impl TimerDuration {
    /// Normalize `value` given in `spoken_unit`; `None` on overflow
    pub fn from_spoken(value: u64, spoken_unit: TimeUnit) -> Option<Self> {
        let seconds = value.checked_mul(spoken_unit.seconds())?;
        Some(Self {
            seconds,
            unit: TimeUnit::Seconds,
            spoken_unit,
        })
    }
}

/// Per-utterance parameters. Every field is optional; handlers substitute
/// defaults for anything missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TimerDuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

impl ParameterSet {
    pub fn is_empty(&self) -> bool {
        self.duration.is_none()
            && self.location.is_none()
            && self.app.is_none()
            && self.operation.is_none()
    }

    pub fn with_duration(mut self, duration: TimerDuration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spoken_units_normalize_to_seconds() {
        let d = TimerDuration::from_spoken(2, TimeUnit::Minutes);
        assert_eq!(d.map(|d| d.seconds), Some(120));
        assert_eq!(d.map(|d| d.unit), Some(TimeUnit::Seconds));
        assert_eq!(d.map(|d| d.spoken_unit), Some(TimeUnit::Minutes));
    }

    #[test]
    fn overflowing_durations_are_rejected() {
        assert!(TimerDuration::from_spoken(u64::MAX, TimeUnit::Hours).is_none());
    }

    #[test]
    fn empty_set_skips_absent_fields_when_serialized() {
        let set = ParameterSet::default();
        assert!(set.is_empty());
        assert_eq!(serde_json::to_string(&set).unwrap_or_default(), "{}");
        assert!(!set.with_location("Paris").is_empty());
    }
}
