//! Run vs. Search-and-Pounce classification from frequency movement.
//!
//! A running station sits on one frequency and works callers; a station in
//! search-and-pounce tunes across the band looking for stations to call.
//! Neither fact is logged directly, so it is inferred per operator from the
//! frequency delta between consecutive contacts.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::contact::Contact;

/// Configuration for the frequency classifier.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Frequency tolerance in kHz. Consecutive contacts within this band of
    /// each other count as staying on frequency. Default: 0.2 (200 Hz).
    pub freq_tolerance_khz: f64,

    /// Maximum time between consecutive contacts for a Run classification.
    /// Beyond this the operator is assumed to have gone looking. Default: 15.
    pub continuity_minutes: i64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            freq_tolerance_khz: 0.2,
            continuity_minutes: 15,
        }
    }
}

/// Per-contact classification tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunClassification {
    Run,
    SearchAndPounce,
    /// Frequency missing and not estimable for this contact.
    Unknown,
}

impl RunClassification {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::SearchAndPounce => "search_and_pounce",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for RunClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification output for one operator's contact sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSequence {
    /// One tag per input contact, in input order.
    pub tags: Vec<RunClassification>,

    /// Contacts whose frequency was estimated from the band center.
    pub estimated_frequencies: usize,

    /// Contacts with no frequency and no band to estimate from.
    pub missing_frequencies: usize,
}

impl ClassifiedSequence {
    /// Number of contacts tagged [`RunClassification::Run`].
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.tags
            .iter()
            .filter(|t| **t == RunClassification::Run)
            .count()
    }

    /// Number of contacts tagged [`RunClassification::SearchAndPounce`].
    #[must_use]
    pub fn sp_count(&self) -> usize {
        self.tags
            .iter()
            .filter(|t| **t == RunClassification::SearchAndPounce)
            .count()
    }

    /// Number of contacts tagged [`RunClassification::Unknown`].
    #[must_use]
    pub fn unknown_count(&self) -> usize {
        self.tags
            .iter()
            .filter(|t| **t == RunClassification::Unknown)
            .count()
    }
}

/// Resolve a contact's frequency: logged value first, band center second.
///
/// Returns the frequency in kHz and whether it was estimated.
fn resolve_freq(contact: &Contact) -> Option<(f64, bool)> {
    if let Some(freq) = contact.freq_khz {
        return Some((freq, false));
    }
    contact.band.map(|band| (band.center_khz(), true))
}

/// Classify one operator's time-ordered contact sequence.
///
/// The first resolvable contact is SearchAndPounce by convention (the
/// operator had to tune somewhere to make it). A contact is Run when it is
/// within the frequency tolerance of the previous contact, on the same band,
/// and within the continuity window; any frequency jump, band change, or long
/// pause is SearchAndPounce. Contacts with no frequency and no band are
/// Unknown and excluded from the Run/S&P split.
#[must_use]
pub fn classify_sequence(contacts: &[Contact], config: &ClassifierConfig) -> ClassifiedSequence {
    debug_assert!(
        contacts.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
        "classifier input must be time-ordered"
    );

    let continuity = Duration::minutes(config.continuity_minutes);
    let mut tags = Vec::with_capacity(contacts.len());
    let mut estimated_frequencies = 0usize;
    let mut missing_frequencies = 0usize;

    // (freq_khz, band, timestamp) of the previous resolvable contact.
    let mut prev: Option<(f64, Option<crate::contact::Band>, chrono::DateTime<chrono::Utc>)> =
        None;

    for contact in contacts {
        let Some((freq, estimated)) = resolve_freq(contact) else {
            missing_frequencies += 1;
            tags.push(RunClassification::Unknown);
            // The next contact has no reference frequency to run against.
            prev = None;
            continue;
        };
        if estimated {
            estimated_frequencies += 1;
        }

        let tag = match prev {
            Some((prev_freq, prev_band, prev_ts)) => {
                let same_band = contact.band == prev_band;
                let on_frequency = (freq - prev_freq).abs() <= config.freq_tolerance_khz;
                let continuous = contact.timestamp - prev_ts <= continuity;
                if same_band && on_frequency && continuous {
                    RunClassification::Run
                } else {
                    RunClassification::SearchAndPounce
                }
            }
            // First resolvable contact: tuned to find it.
            None => RunClassification::SearchAndPounce,
        };

        tags.push(tag);
        prev = Some((freq, contact.band, contact.timestamp));
    }

    ClassifiedSequence {
        tags,
        estimated_frequencies,
        missing_frequencies,
    }
}
