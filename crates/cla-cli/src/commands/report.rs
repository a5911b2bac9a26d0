//! Text and JSON rendering of an analysis result.

use std::collections::HashSet;
use std::fmt::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use cla_core::{LogAnalysis, OperatorStats, SessionTrack};

// ========== Duration Formatting ==========

/// Formats seconds as a duration string.
/// Returns "Xh Ym" if >= 1 hour, "Xm" if < 1 hour.
/// Negative durations are rendered as 0m.
pub fn format_duration(seconds: i64) -> String {
    if seconds < 0 {
        return "0m".to_string();
    }
    let total_minutes = seconds / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%MZ").to_string()
}

// ========== Activity Bar ==========

/// Generates a 10-character activity bar for the hourly histogram.
/// Values <5% of max get a single block for visibility.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn activity_bar(value: u64, max: u64) -> String {
    if max == 0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value as f64 / max as f64;
    let filled = if ratio < 0.05 && value > 0 {
        1
    } else {
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

// ========== Report Sections ==========

fn write_header(output: &mut String, analysis: &LogAnalysis) {
    writeln!(output, "{}", "=".repeat(60)).unwrap();
    writeln!(output, "CONTEST LOG ANALYSIS").unwrap();
    writeln!(output, "{}", "=".repeat(60)).unwrap();
    writeln!(output, "Total QSOs: {}", analysis.total_qsos).unwrap();
    writeln!(output, "Unique callsigns: {}", analysis.unique_calls).unwrap();

    writeln!(
        output,
        "Duplicate contacts (same callsign on same band/mode): {}",
        analysis.dupes.len()
    )
    .unwrap();
    for dupe in &analysis.dupes {
        let band = dupe.band.map_or("?", |b| b.as_str());
        writeln!(
            output,
            "  {} on {} {}: {} QSOs",
            dupe.call, band, dupe.mode, dupe.count
        )
        .unwrap();
    }

    if !analysis.multi_mode.rows.is_empty() {
        writeln!(output, "Calls worked on multiple modes per band:").unwrap();
        for row in &analysis.multi_mode.rows {
            writeln!(
                output,
                "  {}: {} of {} calls ({:.1}%)",
                row.band.as_str(),
                row.multi_mode_calls,
                row.total_calls,
                pct(row.multi_mode_calls, row.total_calls)
            )
            .unwrap();
        }
        writeln!(
            output,
            "Total calls worked on multiple modes (any band): {} of {} unique calls ({:.1}%)",
            analysis.multi_mode.multi_mode_calls,
            analysis.unique_calls,
            pct(analysis.multi_mode.multi_mode_calls, analysis.unique_calls)
        )
        .unwrap();
    }
}

fn write_data_quality(output: &mut String, analysis: &LogAnalysis) {
    let quality = &analysis.quality;
    writeln!(output).unwrap();
    writeln!(output, "DATA QUALITY ANALYSIS:").unwrap();
    writeln!(output, "{}", "-".repeat(40)).unwrap();
    writeln!(output, "QSOs analyzed: {}", quality.total_qsos).unwrap();
    writeln!(output, "QSOs missing frequency: {}", quality.missing_frequency).unwrap();
    writeln!(output, "QSOs missing band: {}", quality.missing_band).unwrap();
    writeln!(
        output,
        "Frequency coverage: {:.1}% of QSOs have frequency data",
        quality.freq_coverage_pct
    )
    .unwrap();
    writeln!(
        output,
        "QSOs with estimated (band center) frequencies: {}",
        quality.estimated_frequencies
    )
    .unwrap();
    writeln!(
        output,
        "Search & Pounce (S&P) percentage: {:.1}%",
        analysis.overall_sp_pct
    )
    .unwrap();

    if !quality.sp_reliable {
        writeln!(
            output,
            "WARNING: S&P analysis may be unreliable due to missing or estimated frequency data."
        )
        .unwrap();
    } else if quality.mostly_estimated {
        writeln!(
            output,
            "NOTE: Many frequencies are estimated from band center; S&P analysis may be less accurate."
        )
        .unwrap();
    } else {
        writeln!(output, "S&P analysis is considered reliable.").unwrap();
    }
}

fn write_log_statistics(output: &mut String, analysis: &LogAnalysis) {
    writeln!(output).unwrap();
    writeln!(output, "LOG STATISTICS:").unwrap();
    writeln!(output, "{}", "-".repeat(40)).unwrap();
    writeln!(
        output,
        "Total Log Duration: {:.1} hours",
        analysis.ledger.total_log_hours()
    )
    .unwrap();
    writeln!(
        output,
        "Overall QSO Rate: {:.1} QSOs/hour",
        analysis.overall_rate_per_hour
    )
    .unwrap();
    if let (Some(first), Some(last)) = (analysis.first_contact, analysis.last_contact) {
        writeln!(output, "First QSO: {}", format_timestamp(first)).unwrap();
        writeln!(output, "Last QSO: {}", format_timestamp(last)).unwrap();
    }

    if analysis.gaps.is_empty() {
        writeln!(output, "Silent Periods: None").unwrap();
    } else {
        writeln!(
            output,
            "Silent Periods: {} totaling {:.1} hours",
            analysis.gaps.len(),
            analysis.ledger.long_gap_hours()
        )
        .unwrap();
        for (i, gap) in analysis.gaps.iter().enumerate() {
            writeln!(
                output,
                "  Gap {}: {} minutes ({} - {})",
                i + 1,
                gap.duration().num_minutes(),
                format_timestamp(gap.start),
                format_timestamp(gap.end)
            )
            .unwrap();
        }
    }

    let ledger = &analysis.ledger;
    writeln!(output).unwrap();
    writeln!(output, "TIME BREAKDOWN:").unwrap();
    writeln!(
        output,
        "  Total Log Duration: {:.1} hours",
        ledger.total_log_hours()
    )
    .unwrap();
    writeln!(
        output,
        "  Active Operating Time: {:.1} hours",
        ledger.active_hours()
    )
    .unwrap();
    writeln!(
        output,
        "  Silent/Gap Time: {:.1} hours",
        ledger.long_gap_hours() + ledger.short_gap_hours()
    )
    .unwrap();
    writeln!(
        output,
        "    - Long gaps: {:.1} hours",
        ledger.long_gap_hours()
    )
    .unwrap();
    writeln!(
        output,
        "    - Short gaps: {:.1} hours",
        ledger.short_gap_hours()
    )
    .unwrap();
    if ledger.overlap_detected {
        let stations: HashSet<&str> = analysis
            .operators
            .iter()
            .flat_map(|op| op.tracks.iter().map(|t| t.station.as_str()))
            .collect();
        if stations.len() > 1 {
            writeln!(
                output,
                "  NOTE: Concurrent multi-station activity: {:.1} hours of overlap",
                ledger.discrepancy_hours()
            )
            .unwrap();
        } else {
            // One station cannot overlap with itself; the surplus comes
            // from a session threshold above the silent-period threshold.
            writeln!(
                output,
                "  NOTE: Active time exceeds gap-free time by {:.1} hours (session threshold exceeds silent-period threshold)",
                ledger.discrepancy_hours()
            )
            .unwrap();
        }
    } else {
        writeln!(output, "  STATUS: Time accounting reconciled").unwrap();
    }
}

fn write_hourly_activity(output: &mut String, analysis: &LogAnalysis) {
    writeln!(output).unwrap();
    writeln!(output, "HOURLY ACTIVITY (UTC):").unwrap();
    writeln!(output, "{}", "-".repeat(40)).unwrap();

    let max = analysis.hourly_counts.iter().copied().max().unwrap_or(0);
    for (hour, &count) in analysis.hourly_counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let bar = activity_bar(count, max);
        writeln!(output, "  {hour:02}:00  {bar}  {count}").unwrap();
    }
}

fn write_band_mode(output: &mut String, analysis: &LogAnalysis) {
    if analysis.band_mode.is_empty() {
        return;
    }
    writeln!(output).unwrap();
    writeln!(output, "BAND/MODE BREAKDOWN:").unwrap();
    writeln!(output, " Band  |   CW  | Phone |  Dig  | Total |  %").unwrap();
    writeln!(output, "-------|-------|-------|-------|-------|-----").unwrap();

    let mut total_cw = 0;
    let mut total_phone = 0;
    let mut total_dig = 0;
    for row in &analysis.band_mode {
        let band = row.band.map_or("??", |b| b.as_str());
        let pct = pct(row.total(), analysis.total_qsos);
        writeln!(
            output,
            " {band:<5} | {:>5} | {:>5} | {:>5} | {:>5} | {pct:>3.0}",
            row.cw,
            row.phone,
            row.digital,
            row.total()
        )
        .unwrap();
        total_cw += row.cw;
        total_phone += row.phone;
        total_dig += row.digital;
    }
    writeln!(output, "-------|-------|-------|-------|-------|-----").unwrap();
    writeln!(
        output,
        " Total | {total_cw:>5} | {total_phone:>5} | {total_dig:>5} | {:>5} | 100",
        analysis.total_qsos
    )
    .unwrap();
}

fn write_operator_totals(output: &mut String, analysis: &LogAnalysis) {
    writeln!(output).unwrap();
    writeln!(output, "Total Contacts by Operator:").unwrap();
    writeln!(output, " Operator       Total     %").unwrap();
    writeln!(output, " --------       -----   ---").unwrap();
    for op in &analysis.operators {
        writeln!(
            output,
            " {:<12} {:>7} {:>5.1}",
            op.operator.as_str(),
            op.qso_count,
            op.pct_of_total
        )
        .unwrap();
    }
    writeln!(output, " Total = {}", analysis.total_qsos).unwrap();
}

fn write_operator_statistics(output: &mut String, operators: &[OperatorStats]) {
    writeln!(output).unwrap();
    writeln!(output, "OPERATOR STATISTICS:").unwrap();
    writeln!(output, "{}", "-".repeat(40)).unwrap();
    for op in operators {
        writeln!(output, "Operator: {}", op.operator).unwrap();
        writeln!(
            output,
            "  QSO Count: {} ({:.1}% of total)",
            op.qso_count, op.pct_of_total
        )
        .unwrap();
        writeln!(output, "  Average Rate: {:.1} QSOs/hour", op.avg_rate_per_hour).unwrap();
        writeln!(output, "  Peak Rate: {} QSOs/hour", op.peak_rate_per_hour).unwrap();
        let confidence = if op.sp_reliable {
            ""
        } else {
            " (low confidence)"
        };
        writeln!(
            output,
            "  Run: {:.1}% | S&P: {:.1}%{confidence}",
            op.run_pct, op.sp_pct
        )
        .unwrap();
    }
}

fn write_sessions(output: &mut String, analysis: &LogAnalysis) {
    writeln!(output).unwrap();
    writeln!(output, "OPERATOR SESSIONS:").unwrap();
    writeln!(output, "{}", "-".repeat(40)).unwrap();

    let tracks: Vec<&SessionTrack> = analysis
        .operators
        .iter()
        .flat_map(|op| op.tracks.iter())
        .collect();

    for track in &tracks {
        writeln!(
            output,
            "Operator: {} @ Station: {}",
            track.operator, track.station
        )
        .unwrap();
        writeln!(
            output,
            "  Operating Time: {} ({} sessions, {} QSOs)",
            format_duration(track.active_time().num_seconds()),
            track.sessions.len(),
            track.qso_count()
        )
        .unwrap();
        writeln!(output, "  First QSO: {}", format_timestamp(track.first_contact)).unwrap();
        writeln!(output, "  Last QSO: {}", format_timestamp(track.last_contact)).unwrap();
        writeln!(output, "  Sessions:").unwrap();
        for (i, session) in track.sessions.iter().enumerate() {
            writeln!(
                output,
                "    {}. {} - {} ({}, {} QSOs)",
                i + 1,
                format_timestamp(session.start),
                format_timestamp(session.end),
                format_duration(session.duration().num_seconds()),
                session.qso_count()
            )
            .unwrap();
        }
        writeln!(output).unwrap();
    }

    let total_sessions: usize = tracks.iter().map(|t| t.sessions.len()).sum();
    writeln!(output, "SUMMARY:").unwrap();
    writeln!(
        output,
        "  Total Operator Time: {:.1} hours across {} sessions",
        analysis.ledger.active_hours(),
        total_sessions
    )
    .unwrap();

    let single_contact_sessions: usize =
        tracks.iter().map(|t| t.single_contact_sessions()).sum();
    if single_contact_sessions > 2 {
        writeln!(output).unwrap();
        writeln!(output, "MULTI-STATION OPERATION DETECTED:").unwrap();
        writeln!(
            output,
            "  {single_contact_sessions} short sessions detected (likely single QSOs)"
        )
        .unwrap();
        writeln!(
            output,
            "  This suggests a merged log from multiple logging computers."
        )
        .unwrap();
        writeln!(
            output,
            "  Session times represent minimum estimates for multi-station operations."
        )
        .unwrap();
    }
}

fn write_station_gaps(output: &mut String, analysis: &LogAnalysis) {
    writeln!(output).unwrap();
    if analysis.station_gaps.is_empty() {
        writeln!(output, "SILENT PERIODS BY STATION: None detected").unwrap();
        return;
    }
    writeln!(output, "SILENT PERIODS BY STATION:").unwrap();
    writeln!(output, "{}", "-".repeat(40)).unwrap();
    for entry in &analysis.station_gaps {
        writeln!(output, "Station: {}", entry.station).unwrap();
        for (i, gap) in entry.gaps.iter().enumerate() {
            writeln!(
                output,
                "  Gap {}: {} minutes ({} - {})",
                i + 1,
                gap.duration().num_minutes(),
                format_timestamp(gap.start),
                format_timestamp(gap.end)
            )
            .unwrap();
        }
        writeln!(output).unwrap();
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

// ========== Public Interface ==========

/// Formats the human-readable report.
pub fn format_report(analysis: &LogAnalysis) -> String {
    let mut output = String::new();

    write_header(&mut output, analysis);

    if analysis.total_qsos == 0 {
        writeln!(output).unwrap();
        writeln!(output, "No QSOs found in log.").unwrap();
        return output;
    }

    write_data_quality(&mut output, analysis);
    write_log_statistics(&mut output, analysis);
    write_hourly_activity(&mut output, analysis);
    write_band_mode(&mut output, analysis);
    write_operator_totals(&mut output, analysis);
    write_operator_statistics(&mut output, &analysis.operators);
    write_sessions(&mut output, analysis);
    write_station_gaps(&mut output, analysis);

    output
}

/// Formats the full analysis as pretty-printed JSON.
pub fn format_report_json(analysis: &LogAnalysis) -> Result<String> {
    Ok(serde_json::to_string_pretty(analysis)?)
}
