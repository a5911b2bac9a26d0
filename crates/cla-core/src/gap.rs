//! Silent-period detection over the merged contact stream.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A silent period in the overall log exceeding the reporting threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    /// Last contact before the silence.
    pub start: DateTime<Utc>,

    /// First contact after the silence.
    pub end: DateTime<Utc>,
}

impl Gap {
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Gap-detector output over the full chronological stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapReport {
    /// Gaps above the threshold, ordered by start time and non-overlapping
    /// by construction.
    pub gaps: Vec<Gap>,

    /// Total duration of the reported (long) gaps.
    pub long_gap_time: Duration,

    /// Summed idle time between consecutive contacts that stayed at or below
    /// the threshold. Computed directly from the deltas, so it can never be
    /// negative.
    pub short_gap_time: Duration,
}

impl Default for GapReport {
    fn default() -> Self {
        Self {
            gaps: Vec::new(),
            long_gap_time: Duration::zero(),
            short_gap_time: Duration::zero(),
        }
    }
}

/// Scan globally sorted contact timestamps for silent periods.
///
/// Every inter-contact delta lands in exactly one bucket: deltas strictly
/// greater than `threshold_minutes` become [`Gap`]s, the rest accumulate into
/// the short-gap tally. Long plus short gap time therefore equals the full
/// log span exactly.
#[must_use]
pub fn find_gaps(times: &[DateTime<Utc>], threshold_minutes: i64) -> GapReport {
    debug_assert!(
        times.windows(2).all(|w| w[0] <= w[1]),
        "gap detector input must be time-ordered"
    );

    let threshold = Duration::minutes(threshold_minutes);
    let mut report = GapReport::default();

    for pair in times.windows(2) {
        let delta = pair[1] - pair[0];
        if delta > threshold {
            report.gaps.push(Gap {
                start: pair[0],
                end: pair[1],
            });
            report.long_gap_time = report.long_gap_time + delta;
        } else {
            report.short_gap_time = report.short_gap_time + delta;
        }
    }

    report
}
