//! Metrics aggregation: the analysis entry point.
//!
//! Combines the classifier, session builder, and gap detector outputs into
//! per-operator statistics, an hourly rate histogram, a data-quality summary,
//! and a reconciled time ledger. Everything is rebuilt from scratch on each
//! [`analyze`] call; no state survives between runs.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{ClassifierConfig, classify_sequence};
use crate::contact::{Band, Contact, Mode, ModeClass};
use crate::gap::{Gap, find_gaps};
use crate::session::{SessionConfig, SessionTrack, build_sessions};
use crate::types::{Callsign, StationId};

/// Configuration for one analysis run.
///
/// Passed explicitly into [`analyze`] so each run is reproducible in
/// isolation; there is no process-wide mutable state.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub session: SessionConfig,
    pub classifier: ClassifierConfig,

    /// Silent-period reporting threshold in minutes. Distinct from (but by
    /// default equal to) the session break threshold.
    pub gap_minutes: i64,

    /// Minimum percentage of contacts with genuinely logged frequencies for
    /// the Run/S&P split to be considered reliable.
    pub min_freq_coverage_pct: f64,
}

impl AnalysisConfig {
    /// Defaults: 15-minute thresholds, 200 Hz tolerance, 90% coverage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: SessionConfig::default(),
            classifier: ClassifierConfig::default(),
            gap_minutes: 15,
            min_freq_coverage_pct: 90.0,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-operator aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorStats {
    pub operator: Callsign,
    pub qso_count: usize,

    /// This operator's share of the grand total, in percent.
    pub pct_of_total: f64,

    pub run_count: usize,
    pub sp_count: usize,
    pub unknown_count: usize,

    /// Run percentage over classified (non-Unknown) contacts. 0.0 when
    /// nothing could be classified.
    pub run_pct: f64,

    /// Search-and-Pounce percentage over classified contacts.
    pub sp_pct: f64,

    /// QSOs per active operating hour. 0.0 for an operator whose active time
    /// is zero (a single contact, or only zero-duration sessions) rather
    /// than a division artifact.
    pub avg_rate_per_hour: f64,

    /// Maximum contact count within any single clock hour.
    pub peak_rate_per_hour: u64,

    pub missing_frequencies: usize,
    pub estimated_frequencies: usize,

    /// Percentage of this operator's contacts with a genuinely logged
    /// frequency (estimates excluded).
    pub freq_coverage_pct: f64,

    /// False when frequency coverage is below the configured minimum, which
    /// makes the Run/S&P split untrustworthy.
    pub sp_reliable: bool,

    /// Session tracks for this operator, one per station, sorted by station.
    pub tracks: Vec<SessionTrack>,
}

impl OperatorStats {
    /// Sum of session durations across all of this operator's stations.
    #[must_use]
    pub fn active_time(&self) -> Duration {
        self.tracks
            .iter()
            .fold(Duration::zero(), |acc, t| acc + t.active_time())
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.tracks.iter().map(|t| t.sessions.len()).sum()
    }
}

/// Reconciled time accounting for the whole log.
///
/// Per-operator activity is additive: operators running concurrently from
/// different stations each contribute their own active time, so active time
/// may legitimately exceed the gap-free log span. The discrepancy is
/// surfaced, never hidden, and no field here can go negative except the
/// signed discrepancy itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeLedger {
    /// First contact to last contact.
    pub total_log_seconds: i64,

    /// Sum of session durations across every (operator, station) track.
    pub active_seconds: i64,

    /// Total silent-period time above the reporting threshold.
    pub long_gap_seconds: i64,

    /// Total inter-contact idle at or below the threshold. By construction
    /// `long + short == total`.
    pub short_gap_seconds: i64,

    /// `active − short_gap` (equivalently `active + long_gap − total`).
    /// Zero when one operator worked the whole log with equal thresholds;
    /// positive when concurrent operators overlap. A session threshold
    /// above the silent-period threshold also produces a positive value for
    /// a single operator, because pauses between the two thresholds count
    /// as active session time but not as gap-free time.
    pub discrepancy_seconds: i64,

    /// True when active time exceeds the gap-free span. With a single
    /// station this signals the threshold interaction described on
    /// [`discrepancy_seconds`](Self::discrepancy_seconds), not concurrency.
    pub overlap_detected: bool,
}

impl TimeLedger {
    #[expect(clippy::cast_precision_loss, reason = "report-level precision")]
    #[must_use]
    pub fn total_log_hours(&self) -> f64 {
        self.total_log_seconds as f64 / 3600.0
    }

    #[expect(clippy::cast_precision_loss, reason = "report-level precision")]
    #[must_use]
    pub fn active_hours(&self) -> f64 {
        self.active_seconds as f64 / 3600.0
    }

    #[expect(clippy::cast_precision_loss, reason = "report-level precision")]
    #[must_use]
    pub fn long_gap_hours(&self) -> f64 {
        self.long_gap_seconds as f64 / 3600.0
    }

    #[expect(clippy::cast_precision_loss, reason = "report-level precision")]
    #[must_use]
    pub fn short_gap_hours(&self) -> f64 {
        self.short_gap_seconds as f64 / 3600.0
    }

    #[expect(clippy::cast_precision_loss, reason = "report-level precision")]
    #[must_use]
    pub fn discrepancy_hours(&self) -> f64 {
        self.discrepancy_seconds as f64 / 3600.0
    }
}

/// Log-wide data-quality summary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataQuality {
    pub total_qsos: usize,
    pub missing_frequency: usize,
    pub missing_band: usize,
    pub estimated_frequencies: usize,

    /// Percentage of contacts with a genuinely logged frequency.
    pub freq_coverage_pct: f64,

    /// False when coverage is below the configured minimum.
    pub sp_reliable: bool,

    /// True when more than half of the resolved frequencies were band-center
    /// estimates; the split is printable but soft.
    pub mostly_estimated: bool,
}

/// A callsign worked more than once on the same band and mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DupeGroup {
    pub call: Callsign,
    pub band: Option<Band>,
    pub mode: Mode,
    pub count: usize,
}

/// Silent periods within a single station's own contact stream.
///
/// A station can sit idle while the rest of the operation keeps logging, so
/// these are detected per station, independently of the log-wide gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationGaps {
    pub station: StationId,
    pub gaps: Vec<Gap>,
}

/// Calls worked on more than one mode on the same band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiModeRow {
    pub band: Band,

    /// Calls worked on two or more distinct modes on this band.
    pub multi_mode_calls: usize,

    /// Unique calls worked on this band at all.
    pub total_calls: usize,
}

/// Multi-mode workings across the log. Band-less contacts are excluded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MultiModeSummary {
    /// Per-band rows in band order.
    pub rows: Vec<MultiModeRow>,

    /// Calls worked multi-mode on at least one band, each counted once.
    pub multi_mode_calls: usize,
}

/// Contact counts for one band, split by mode class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandModeRow {
    pub band: Option<Band>,
    pub cw: usize,
    pub phone: usize,
    pub digital: usize,
}

impl BandModeRow {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.cw + self.phone + self.digital
    }
}

/// The full analysis result handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogAnalysis {
    pub total_qsos: usize,
    pub unique_calls: usize,
    pub first_contact: Option<DateTime<Utc>>,
    pub last_contact: Option<DateTime<Utc>>,

    /// QSOs per hour over the whole log span. 0.0 for an empty or
    /// zero-length log.
    pub overall_rate_per_hour: f64,

    /// Overall S&P percentage over all classified contacts.
    pub overall_sp_pct: f64,

    /// Contact counts bucketed by UTC hour of day, aggregated across
    /// calendar days. Bucket sum equals `total_qsos`.
    pub hourly_counts: [u64; 24],

    /// Per-operator statistics, sorted by callsign.
    pub operators: Vec<OperatorStats>,

    /// Silent periods above the reporting threshold, in order.
    pub gaps: Vec<Gap>,

    /// Per-station silent periods, sorted by station. Stations with no
    /// gaps of their own are omitted.
    pub station_gaps: Vec<StationGaps>,

    /// Calls worked on multiple modes, per band and overall.
    pub multi_mode: MultiModeSummary,

    pub ledger: TimeLedger,
    pub quality: DataQuality,

    /// Duplicate contacts (same call, band, mode), sorted by call.
    pub dupes: Vec<DupeGroup>,

    /// Band/mode breakdown in band order; band-less contacts last.
    pub band_mode: Vec<BandModeRow>,
}

impl LogAnalysis {
    /// The defined-zero result for an empty contact set.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_qsos: 0,
            unique_calls: 0,
            first_contact: None,
            last_contact: None,
            overall_rate_per_hour: 0.0,
            overall_sp_pct: 0.0,
            hourly_counts: [0; 24],
            operators: Vec::new(),
            gaps: Vec::new(),
            station_gaps: Vec::new(),
            multi_mode: MultiModeSummary::default(),
            ledger: TimeLedger::default(),
            quality: DataQuality::default(),
            dupes: Vec::new(),
            band_mode: Vec::new(),
        }
    }
}

#[expect(clippy::cast_precision_loss, reason = "counts fit f64 exactly")]
fn pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Maximum contact count within any single absolute clock hour.
fn peak_clock_hour(times: &[DateTime<Utc>]) -> u64 {
    let mut buckets: HashMap<(NaiveDate, u32), u64> = HashMap::new();
    for ts in times {
        *buckets.entry((ts.date_naive(), ts.hour())).or_insert(0) += 1;
    }
    buckets.values().copied().max().unwrap_or(0)
}

fn build_band_mode(contacts: &[Contact]) -> Vec<BandModeRow> {
    let mut rows: BTreeMap<Option<Band>, BandModeRow> = BTreeMap::new();
    for contact in contacts {
        let row = rows.entry(contact.band).or_insert(BandModeRow {
            band: contact.band,
            cw: 0,
            phone: 0,
            digital: 0,
        });
        match contact.mode.class() {
            ModeClass::Cw => row.cw += 1,
            ModeClass::Phone => row.phone += 1,
            ModeClass::Digital => row.digital += 1,
        }
    }

    // Band order first, the band-less row last.
    let mut out: Vec<BandModeRow> = Vec::with_capacity(rows.len());
    for band in Band::ALL {
        if let Some(row) = rows.remove(&Some(band)) {
            out.push(row);
        }
    }
    if let Some(row) = rows.remove(&None) {
        out.push(row);
    }
    out
}

/// Detect silent periods inside each station's own contact stream.
///
/// Expects `contacts` sorted by timestamp so each station's times come out
/// in order.
fn find_station_gaps(contacts: &[Contact], gap_minutes: i64) -> Vec<StationGaps> {
    let mut times_by_station: BTreeMap<StationId, Vec<DateTime<Utc>>> = BTreeMap::new();
    for contact in contacts {
        times_by_station
            .entry(contact.station.clone())
            .or_default()
            .push(contact.timestamp);
    }

    times_by_station
        .into_iter()
        .filter_map(|(station, times)| {
            let gaps = find_gaps(&times, gap_minutes).gaps;
            if gaps.is_empty() {
                None
            } else {
                Some(StationGaps { station, gaps })
            }
        })
        .collect()
}

fn build_multi_mode(contacts: &[Contact]) -> MultiModeSummary {
    let mut modes_by_call_band: BTreeMap<(Callsign, Band), HashSet<&str>> = BTreeMap::new();
    for contact in contacts {
        if let Some(band) = contact.band {
            modes_by_call_band
                .entry((contact.call.clone(), band))
                .or_default()
                .insert(contact.mode.as_str());
        }
    }

    let mut per_band: BTreeMap<Band, (usize, usize)> = BTreeMap::new();
    let mut multi_calls: HashSet<Callsign> = HashSet::new();
    for ((call, band), modes) in &modes_by_call_band {
        let (multi, total) = per_band.entry(*band).or_insert((0, 0));
        *total += 1;
        if modes.len() > 1 {
            *multi += 1;
            multi_calls.insert(call.clone());
        }
    }

    MultiModeSummary {
        rows: per_band
            .into_iter()
            .map(|(band, (multi_mode_calls, total_calls))| MultiModeRow {
                band,
                multi_mode_calls,
                total_calls,
            })
            .collect(),
        multi_mode_calls: multi_calls.len(),
    }
}

fn find_dupes(contacts: &[Contact]) -> Vec<DupeGroup> {
    let mut counts: BTreeMap<(Callsign, Option<Band>, String), usize> = BTreeMap::new();
    for contact in contacts {
        *counts
            .entry((
                contact.call.clone(),
                contact.band,
                contact.mode.as_str().to_string(),
            ))
            .or_insert(0) += 1;
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|((call, band, mode), count)| DupeGroup {
            call,
            band,
            mode: Mode::parse(&mode),
            count,
        })
        .collect()
}

/// Run the full analysis over a set of contacts.
///
/// Input need not be sorted; the engine sorts a private copy by timestamp.
/// Every aggregate has a defined zero value for empty input, and no
/// per-operator anomaly (missing frequencies, a single contact) aborts the
/// run.
#[must_use]
pub fn analyze(contacts: &[Contact], config: &AnalysisConfig) -> LogAnalysis {
    if contacts.is_empty() {
        return LogAnalysis::empty();
    }

    let mut sorted: Vec<Contact> = contacts.to_vec();
    sorted.sort_by_key(|c| c.timestamp);

    let total_qsos = sorted.len();
    let first_contact = sorted.first().map(|c| c.timestamp);
    let last_contact = sorted.last().map(|c| c.timestamp);

    // Global silent periods.
    let times: Vec<DateTime<Utc>> = sorted.iter().map(|c| c.timestamp).collect();
    let gap_report = find_gaps(&times, config.gap_minutes);

    // Session tracks for every (operator, station) pair.
    let tracks = build_sessions(&sorted, &config.session);

    // Group contacts per operator in deterministic (sorted) order.
    let mut by_operator: BTreeMap<Callsign, Vec<Contact>> = BTreeMap::new();
    for contact in &sorted {
        by_operator
            .entry(contact.operator.clone())
            .or_default()
            .push(contact.clone());
    }

    let mut tracks_by_operator: BTreeMap<Callsign, Vec<SessionTrack>> = BTreeMap::new();
    for track in tracks {
        tracks_by_operator
            .entry(track.operator.clone())
            .or_default()
            .push(track);
    }

    let mut operators = Vec::with_capacity(by_operator.len());
    let mut global_run = 0usize;
    let mut global_sp = 0usize;
    let mut estimated_total = 0usize;
    let mut missing_total = 0usize;

    for (operator, op_contacts) in by_operator {
        let classified = classify_sequence(&op_contacts, &config.classifier);
        let run_count = classified.run_count();
        let sp_count = classified.sp_count();
        let unknown_count = classified.unknown_count();
        global_run += run_count;
        global_sp += sp_count;
        estimated_total += classified.estimated_frequencies;
        missing_total += classified.missing_frequencies;

        let op_tracks = tracks_by_operator.remove(&operator).unwrap_or_default();
        let active: Duration = op_tracks
            .iter()
            .fold(Duration::zero(), |acc, t| acc + t.active_time());

        let qso_count = op_contacts.len();
        let classified_count = run_count + sp_count;
        #[expect(clippy::cast_precision_loss, reason = "seconds fit f64 exactly")]
        let active_hours = active.num_seconds() as f64 / 3600.0;
        #[expect(clippy::cast_precision_loss, reason = "counts fit f64 exactly")]
        let avg_rate_per_hour = if active_hours > 0.0 {
            qso_count as f64 / active_hours
        } else {
            // Single contact or zero-duration sessions only: an hourly rate
            // is undefined, reported as zero rather than a division error.
            0.0
        };

        let op_times: Vec<DateTime<Utc>> = op_contacts.iter().map(|c| c.timestamp).collect();
        let real_freq_count =
            qso_count - classified.missing_frequencies - classified.estimated_frequencies;
        let freq_coverage_pct = pct(real_freq_count, qso_count);

        operators.push(OperatorStats {
            operator,
            qso_count,
            pct_of_total: pct(qso_count, total_qsos),
            run_count,
            sp_count,
            unknown_count,
            run_pct: pct(run_count, classified_count),
            sp_pct: pct(sp_count, classified_count),
            avg_rate_per_hour,
            peak_rate_per_hour: peak_clock_hour(&op_times),
            missing_frequencies: classified.missing_frequencies,
            estimated_frequencies: classified.estimated_frequencies,
            freq_coverage_pct,
            sp_reliable: freq_coverage_pct >= config.min_freq_coverage_pct,
            tracks: op_tracks,
        });
    }

    // Hour-of-day histogram, aggregated across calendar days.
    let mut hourly_counts = [0u64; 24];
    for ts in &times {
        hourly_counts[ts.hour() as usize] += 1;
    }

    // Time ledger. `long + short == total` by construction; the discrepancy
    // compares additive active time against the gap-free span.
    let total_span = times[times.len() - 1] - times[0];
    let active_total: Duration = operators
        .iter()
        .fold(Duration::zero(), |acc, op| acc + op.active_time());
    let discrepancy = active_total - gap_report.short_gap_time;
    let ledger = TimeLedger {
        total_log_seconds: total_span.num_seconds(),
        active_seconds: active_total.num_seconds(),
        long_gap_seconds: gap_report.long_gap_time.num_seconds(),
        short_gap_seconds: gap_report.short_gap_time.num_seconds(),
        discrepancy_seconds: discrepancy.num_seconds(),
        overlap_detected: discrepancy > Duration::zero(),
    };

    let missing_frequency = sorted
        .iter()
        .filter(|c| c.freq_khz.is_none())
        .count();
    let missing_band = sorted.iter().filter(|c| c.band.is_none()).count();
    let real_freq_total = total_qsos - missing_total - estimated_total;
    let freq_coverage_pct = pct(real_freq_total, total_qsos);
    let quality = DataQuality {
        total_qsos,
        missing_frequency,
        missing_band,
        estimated_frequencies: estimated_total,
        freq_coverage_pct,
        sp_reliable: freq_coverage_pct >= config.min_freq_coverage_pct,
        mostly_estimated: estimated_total * 2 > total_qsos,
    };

    let unique_calls = sorted
        .iter()
        .map(|c| c.call.as_str())
        .collect::<HashSet<_>>()
        .len();

    #[expect(clippy::cast_precision_loss, reason = "seconds fit f64 exactly")]
    let total_hours = total_span.num_seconds() as f64 / 3600.0;
    #[expect(clippy::cast_precision_loss, reason = "counts fit f64 exactly")]
    let overall_rate_per_hour = if total_hours > 0.0 {
        total_qsos as f64 / total_hours
    } else {
        0.0
    };

    tracing::debug!(
        total_qsos,
        operators = operators.len(),
        gaps = gap_report.gaps.len(),
        overlap = ledger.overlap_detected,
        "analysis aggregated"
    );

    LogAnalysis {
        total_qsos,
        unique_calls,
        first_contact,
        last_contact,
        overall_rate_per_hour,
        overall_sp_pct: pct(global_sp, global_run + global_sp),
        hourly_counts,
        operators,
        gaps: gap_report.gaps,
        station_gaps: find_station_gaps(&sorted, config.gap_minutes),
        multi_mode: build_multi_mode(&sorted),
        ledger,
        quality,
        dupes: find_dupes(&sorted),
        band_mode: build_band_mode(&sorted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StationId;
    use chrono::TimeZone;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 28, 18, 0, 0).unwrap()
    }

    fn contact(
        minutes: i64,
        operator: &str,
        station: &str,
        call: &str,
        freq_khz: Option<f64>,
        band: Option<Band>,
    ) -> Contact {
        Contact {
            timestamp: base() + Duration::minutes(minutes),
            operator: Callsign::new(operator).unwrap(),
            station: StationId::new(station).unwrap(),
            call: Callsign::new(call).unwrap(),
            band,
            mode: Mode::Cw,
            freq_khz,
        }
    }

    fn run_chain(operator: &str, count: i64) -> Vec<Contact> {
        (0..count)
            .map(|i| {
                contact(
                    i * 2,
                    operator,
                    "S",
                    &format!("W{i}XYZ"),
                    Some(14_025.0),
                    Some(Band::B20m),
                )
            })
            .collect()
    }

    #[test]
    fn empty_input_reports_defined_zeros() {
        let result = analyze(&[], &AnalysisConfig::new());
        assert_eq!(result.total_qsos, 0);
        assert!(result.operators.is_empty());
        assert!(result.gaps.is_empty());
        assert_eq!(result.ledger, TimeLedger::default());
        assert_eq!(result.overall_sp_pct, 0.0);
        assert_eq!(result.hourly_counts.iter().sum::<u64>(), 0);
    }

    #[test]
    fn run_and_sp_percentages_sum_to_hundred() {
        let contacts = run_chain("K9K", 10);
        let result = analyze(&contacts, &AnalysisConfig::new());
        let op = &result.operators[0];
        assert_eq!(op.run_count, 9);
        assert_eq!(op.sp_count, 1);
        assert!((op.run_pct + op.sp_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn histogram_sum_equals_total() {
        let mut contacts = run_chain("K9K", 8);
        // Push a few contacts into other hours and another day.
        contacts.push(contact(90, "K9K", "S", "N1AA", Some(14_030.0), Some(Band::B20m)));
        contacts.push(contact(
            60 * 26,
            "W1OP",
            "S2",
            "N2BB",
            Some(7_030.0),
            Some(Band::B40m),
        ));
        let result = analyze(&contacts, &AnalysisConfig::new());
        assert_eq!(
            result.hourly_counts.iter().sum::<u64>(),
            result.total_qsos as u64
        );
    }

    #[test]
    fn operator_with_no_frequency_data_is_flagged_not_crashed() {
        let contacts: Vec<Contact> = (0..5)
            .map(|i| contact(i * 3, "K9K", "S", &format!("W{i}AA"), None, None))
            .collect();
        let result = analyze(&contacts, &AnalysisConfig::new());
        let op = &result.operators[0];
        assert_eq!(op.run_pct, 0.0);
        assert_eq!(op.sp_pct, 0.0);
        assert_eq!(op.unknown_count, 5);
        assert!(!op.sp_reliable);
        assert!(!result.quality.sp_reliable);
        assert_eq!(result.quality.freq_coverage_pct, 0.0);
    }

    #[test]
    fn single_contact_operator_reports_zero_rate() {
        let contacts = vec![contact(0, "K9K", "S", "W1AW", Some(14_025.0), Some(Band::B20m))];
        let result = analyze(&contacts, &AnalysisConfig::new());
        let op = &result.operators[0];
        assert_eq!(op.avg_rate_per_hour, 0.0);
        assert_eq!(op.session_count(), 1);
        assert_eq!(op.active_time(), Duration::zero());
    }

    #[test]
    fn single_operator_ledger_reconciles_exactly() {
        // One operator, one station, equal thresholds: active time equals
        // the short-gap (gap-free) time, so the discrepancy is zero.
        let contacts: Vec<Contact> = [0, 5, 10, 40, 45, 120, 125]
            .iter()
            .enumerate()
            .map(|(i, &m)| {
                contact(m, "K9K", "S", &format!("W{i}AA"), Some(14_025.0), Some(Band::B20m))
            })
            .collect();
        let result = analyze(&contacts, &AnalysisConfig::new());

        let ledger = result.ledger;
        assert_eq!(
            ledger.long_gap_seconds + ledger.short_gap_seconds,
            ledger.total_log_seconds
        );
        assert_eq!(ledger.discrepancy_seconds, 0);
        assert!(!ledger.overlap_detected);
    }

    #[test]
    fn concurrent_operators_surface_overlap() {
        // Two operators active over the same 30 minutes from different
        // stations: additive active time exceeds the gap-free span.
        let mut contacts = Vec::new();
        for i in 0..7 {
            contacts.push(contact(
                i * 5,
                "K9K",
                "ALPHA",
                &format!("W{i}AA"),
                Some(14_025.0),
                Some(Band::B20m),
            ));
            contacts.push(contact(
                i * 5 + 1,
                "W1OP",
                "BRAVO",
                &format!("N{i}BB"),
                Some(7_025.0),
                Some(Band::B40m),
            ));
        }
        let result = analyze(&contacts, &AnalysisConfig::new());

        assert!(result.ledger.overlap_detected);
        assert!(result.ledger.discrepancy_seconds > 0);
        assert!(result.ledger.active_seconds > result.ledger.short_gap_seconds);
    }

    #[test]
    fn gaps_visible_in_analysis() {
        let mut contacts = run_chain("K9K", 3);
        contacts.push(contact(4 + 70, "K9K", "S", "N9GAP", Some(14_025.0), Some(Band::B20m)));
        let result = analyze(&contacts, &AnalysisConfig::new());
        assert_eq!(result.gaps.len(), 1);
        assert_eq!(result.gaps[0].duration(), Duration::minutes(70));
    }

    #[test]
    fn operators_sorted_by_callsign() {
        let mut contacts = run_chain("W9ZZZ", 2);
        contacts.extend(run_chain("AA1AA", 2));
        let result = analyze(&contacts, &AnalysisConfig::new());
        let names: Vec<&str> = result.operators.iter().map(|o| o.operator.as_str()).collect();
        assert_eq!(names, vec!["AA1AA", "W9ZZZ"]);
    }

    #[test]
    fn unsorted_input_is_handled() {
        let mut contacts = run_chain("K9K", 5);
        contacts.reverse();
        let sorted_result = analyze(&run_chain("K9K", 5), &AnalysisConfig::new());
        let reversed_result = analyze(&contacts, &AnalysisConfig::new());
        assert_eq!(sorted_result, reversed_result);
    }

    #[test]
    fn dupes_and_unique_calls_counted() {
        let contacts = vec![
            contact(0, "K9K", "S", "W1AW", Some(14_025.0), Some(Band::B20m)),
            contact(5, "K9K", "S", "W1AW", Some(14_025.0), Some(Band::B20m)),
            contact(10, "K9K", "S", "N1XX", Some(14_025.0), Some(Band::B20m)),
        ];
        let result = analyze(&contacts, &AnalysisConfig::new());
        assert_eq!(result.unique_calls, 2);
        assert_eq!(result.dupes.len(), 1);
        assert_eq!(result.dupes[0].call.as_str(), "W1AW");
        assert_eq!(result.dupes[0].count, 2);
    }

    #[test]
    fn band_mode_rows_sum_to_total() {
        let mut contacts = run_chain("K9K", 4);
        contacts.push(contact(50, "K9K", "S", "N5FM", Some(7_200.0), Some(Band::B40m)));
        let result = analyze(&contacts, &AnalysisConfig::new());
        let sum: usize = result.band_mode.iter().map(BandModeRow::total).sum();
        assert_eq!(sum, result.total_qsos);
    }

    #[test]
    fn peak_rate_uses_clock_hour_buckets() {
        // 4 contacts at 18:xx and 2 at 19:xx.
        let contacts: Vec<Contact> = [0, 10, 20, 50, 65, 70]
            .iter()
            .enumerate()
            .map(|(i, &m)| {
                contact(m, "K9K", "S", &format!("W{i}AA"), Some(14_025.0), Some(Band::B20m))
            })
            .collect();
        let result = analyze(&contacts, &AnalysisConfig::new());
        assert_eq!(result.operators[0].peak_rate_per_hour, 4);
    }

    #[test]
    fn station_gaps_detected_independently_of_global_gaps() {
        // ALPHA sits idle for 40 minutes while BRAVO keeps logging, so the
        // log-wide stream never goes quiet but ALPHA does.
        let mut contacts = Vec::new();
        for i in 0..5 {
            contacts.push(contact(
                i * 10,
                "W1OP",
                "BRAVO",
                &format!("N{i}BB"),
                Some(7_025.0),
                Some(Band::B40m),
            ));
        }
        contacts.push(contact(0, "K9K", "ALPHA", "W1AA", Some(14_025.0), Some(Band::B20m)));
        contacts.push(contact(40, "K9K", "ALPHA", "W2AA", Some(14_025.0), Some(Band::B20m)));
        let result = analyze(&contacts, &AnalysisConfig::new());

        assert!(result.gaps.is_empty());
        assert_eq!(result.station_gaps.len(), 1);
        assert_eq!(result.station_gaps[0].station.as_str(), "ALPHA");
        assert_eq!(
            result.station_gaps[0].gaps[0].duration(),
            Duration::minutes(40)
        );
    }

    #[test]
    fn multi_mode_calls_tallied_per_band() {
        let mut contacts = vec![
            contact(0, "K9K", "S", "W1AW", Some(14_025.0), Some(Band::B20m)),
            contact(5, "K9K", "S", "N1XX", Some(14_030.0), Some(Band::B20m)),
            contact(10, "K9K", "S", "W1AW", Some(14_200.0), Some(Band::B20m)),
        ];
        contacts[2].mode = Mode::Ssb;
        let result = analyze(&contacts, &AnalysisConfig::new());

        assert_eq!(result.multi_mode.rows.len(), 1);
        let row = &result.multi_mode.rows[0];
        assert_eq!(row.band, Band::B20m);
        assert_eq!(row.multi_mode_calls, 1);
        assert_eq!(row.total_calls, 2);
        assert_eq!(result.multi_mode.multi_mode_calls, 1);
    }

    #[test]
    fn session_threshold_above_gap_threshold_yields_positive_discrepancy() {
        // Pauses between the silent-period threshold and the session break
        // threshold count as active time but not as gap-free time, so even
        // a single station ends up with a positive discrepancy.
        let config = AnalysisConfig {
            session: SessionConfig { break_minutes: 30 },
            gap_minutes: 15,
            ..AnalysisConfig::new()
        };
        let contacts: Vec<Contact> = [0, 20, 40]
            .iter()
            .enumerate()
            .map(|(i, &m)| {
                contact(m, "K9K", "S", &format!("W{i}AA"), Some(14_025.0), Some(Band::B20m))
            })
            .collect();
        let result = analyze(&contacts, &config);

        assert_eq!(result.ledger.discrepancy_seconds, 40 * 60);
        assert!(result.ledger.overlap_detected);
    }

    #[test]
    fn estimated_frequencies_reported_in_quality() {
        let contacts = vec![
            contact(0, "K9K", "S", "W1AW", None, Some(Band::B20m)),
            contact(2, "K9K", "S", "N1XX", None, Some(Band::B20m)),
            contact(4, "K9K", "S", "K5ZZ", Some(14_025.0), Some(Band::B20m)),
        ];
        let result = analyze(&contacts, &AnalysisConfig::new());
        assert_eq!(result.quality.estimated_frequencies, 2);
        assert_eq!(result.quality.missing_frequency, 2);
        // Strictly more than half of the frequencies are estimated.
        assert!(result.quality.mostly_estimated);
        assert!(!result.quality.sp_reliable);
    }
}
