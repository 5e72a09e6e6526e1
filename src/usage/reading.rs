use super::{FieldValue, Metadata};
use crate::fields::FieldError;
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// One metered usage sample for a single resource over a time window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub resource_id: String,
    pub project_id: String,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub value: FieldValue,

    #[serde(default)]
    pub metadata: Metadata,
}

impl Reading {
    /// Create a reading
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidTimeRange`] when `stop` precedes `start`.
    pub fn new(
        resource_id: impl Into<String>,
        project_id: impl Into<String>,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        value: impl Into<FieldValue>,
        metadata: Metadata,
    ) -> Result<Self, FieldError> {
        if stop < start {
            return Err(FieldError::InvalidTimeRange { start, stop });
        }

        Ok(Self {
            resource_id: resource_id.into(),
            project_id: project_id.into(),
            start,
            stop,
            value: value.into(),
            metadata,
        })
    }

    /// Length of the reading window in fractional hours.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "Window lengths are far below 2^52 microseconds")]
    pub fn hours(&self) -> f64 {
        let window = self.stop - self.start;
        let seconds = window
            .num_microseconds()
            .map_or_else(|| window.num_seconds() as f64, |us| us as f64 / 1_000_000.0);
        seconds / 3600.0
    }
}

/// Render a UTC timestamp as a naive ISO-8601 string
///
/// Fractional seconds are only emitted when non-zero, and always with microsecond precision,
/// so whole-second timestamps come out as `2024-01-01T00:00:00`.
#[must_use]
pub fn isoformat(ts: &DateTime<Utc>) -> String {
    let naive = ts.naive_utc();
    if naive.nanosecond() / 1_000 == 0 {
        naive.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        format!("{}.{:06}", naive.format("%Y-%m-%dT%H:%M:%S"), naive.nanosecond() / 1_000)
    }
}
