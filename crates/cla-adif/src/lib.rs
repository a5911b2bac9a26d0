//! ADIF (Amateur Data Interchange Format) log parsing.
//!
//! A streaming tag scanner over `<field:length[:type]>value` fields, with
//! records delimited by `<eor>`. Field names are case-insensitive. Records
//! that cannot be turned into a valid [`Contact`] are skipped with a warning
//! and counted, never fatal; only I/O failures and a file with zero usable
//! records are hard errors.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use thiserror::Error;

use cla_core::{Callsign, Contact, Mode, StationId};

#[derive(Debug, Error)]
pub enum AdifError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no usable records in {path} ({skipped} skipped)")]
    NoRecords { path: PathBuf, skipped: usize },
}

/// Result of parsing one log file.
#[derive(Debug, Clone, Default)]
pub struct ParseSummary {
    /// Valid contacts, sorted by timestamp.
    pub contacts: Vec<Contact>,
    /// Records seen in the file, valid or not.
    pub total_records: usize,
    /// Records dropped for missing or unparseable required fields.
    pub skipped_records: usize,
}

/// One raw ADIF record: uppercased field names mapped to values.
type RawRecord = HashMap<String, String>;

/// Scan ADIF text into raw records.
///
/// The scanner walks the byte offsets of `<` and `>` directly; field value
/// length comes from the tag itself, so values containing newlines or `<`
/// are handled without lookahead. Anything between tags (including the
/// pre-`<eoh>` header prose) is ignored.
fn scan_records(input: &str) -> Vec<RawRecord> {
    let mut records = Vec::new();
    let mut current = RawRecord::new();
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        rest = &rest[open + 1..];
        let Some(close) = rest.find('>') else { break };
        let tag = &rest[..close];
        rest = &rest[close + 1..];

        let mut parts = tag.splitn(3, ':');
        let name = parts.next().unwrap_or("").trim().to_ascii_uppercase();

        match name.as_str() {
            "EOH" => {
                // Header fields are not contact data.
                current.clear();
                continue;
            }
            "EOR" => {
                if !current.is_empty() {
                    records.push(std::mem::take(&mut current));
                }
                continue;
            }
            _ => {}
        }

        let Some(len) = parts.next().and_then(|l| l.trim().parse::<usize>().ok()) else {
            continue;
        };
        let Some(value) = rest.get(..len) else {
            // Declared length runs past the end of the file or splits a
            // multi-byte character; drop the field.
            tracing::warn!(field = %name, len, "truncated ADIF field");
            continue;
        };
        rest = &rest[len..];
        current.insert(name, value.trim().to_string());
    }

    if !current.is_empty() {
        records.push(current);
    }
    records
}

/// `QSO_DATE` (YYYYMMDD) + `TIME_ON` (HHMM or HHMMSS) to a UTC timestamp.
fn parse_timestamp(record: &RawRecord) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(record.get("QSO_DATE")?, "%Y%m%d").ok()?;
    let raw_time = record.get("TIME_ON")?;
    let time = match raw_time.len() {
        4 => NaiveTime::parse_from_str(raw_time, "%H%M").ok()?,
        6 => NaiveTime::parse_from_str(raw_time, "%H%M%S").ok()?,
        _ => return None,
    };
    Some(date.and_time(time).and_utc())
}

fn record_to_contact(record: &RawRecord) -> Option<Contact> {
    let timestamp = parse_timestamp(record)?;
    let call = Callsign::new(record.get("CALL")?).ok()?;

    let operator = record
        .get("OPERATOR")
        .or_else(|| record.get("STATION_CALLSIGN"))
        .and_then(|s| Callsign::new(s).ok())
        .unwrap_or_else(Callsign::unknown);

    let station = record
        .get("N3FJP_COMPUTERNAME")
        .or_else(|| record.get("APP_N3FJP_COMPUTERNAME"))
        .or_else(|| record.get("STATION_CALLSIGN"))
        .and_then(|s| StationId::new(s).ok())
        .unwrap_or_else(StationId::unknown);

    // FREQ is logged in MHz.
    let freq_khz = record
        .get("FREQ")
        .and_then(|f| f.parse::<f64>().ok())
        .map(|mhz| mhz * 1000.0);

    let band = record.get("BAND").and_then(|b| b.parse().ok());

    let mode = record
        .get("MODE")
        .map_or(Mode::Other("UNKNOWN".to_string()), |m| Mode::parse(m));

    Some(Contact {
        timestamp,
        operator,
        station,
        call,
        band,
        mode,
        freq_khz,
    })
}

/// Parse ADIF text into contacts, skipping and counting bad records.
#[must_use]
pub fn parse_str(input: &str) -> ParseSummary {
    let records = scan_records(input);
    let total_records = records.len();

    let mut contacts = Vec::with_capacity(total_records);
    let mut skipped_records = 0;
    for record in &records {
        if let Some(contact) = record_to_contact(record) {
            contacts.push(contact);
        } else {
            skipped_records += 1;
            tracing::warn!(
                call = record.get("CALL").map(String::as_str).unwrap_or("?"),
                "skipping record without a valid call or timestamp"
            );
        }
    }

    contacts.sort_by_key(|c| c.timestamp);
    ParseSummary {
        contacts,
        total_records,
        skipped_records,
    }
}

/// Parse an ADIF file from disk.
pub fn parse_file(path: &Path) -> Result<ParseSummary, AdifError> {
    let input = std::fs::read_to_string(path).map_err(|source| AdifError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let summary = parse_str(&input);
    if summary.contacts.is_empty() {
        return Err(AdifError::NoRecords {
            path: path.to_path_buf(),
            skipped: summary.skipped_records,
        });
    }
    tracing::debug!(
        path = %path.display(),
        contacts = summary.contacts.len(),
        skipped = summary.skipped_records,
        "parsed ADIF file"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use std::io::Write;

    const RECORD: &str = "<CALL:4>W1AW<QSO_DATE:8>20250628<TIME_ON:6>180512\
<FREQ:6>14.025<BAND:3>20M<MODE:2>CW<OPERATOR:4>K9CT\
<N3FJP_COMPUTERNAME:5>ALPHA<eor>\n";

    #[test]
    fn parses_a_complete_record() {
        let summary = parse_str(RECORD);
        assert_eq!(summary.total_records, 1);
        assert_eq!(summary.skipped_records, 0);

        let contact = &summary.contacts[0];
        assert_eq!(contact.call.as_str(), "W1AW");
        assert_eq!(contact.operator.as_str(), "K9CT");
        assert_eq!(contact.station.as_str(), "ALPHA");
        assert_eq!(
            contact.timestamp,
            Utc.with_ymd_and_hms(2025, 6, 28, 18, 5, 12).unwrap()
        );
        assert_eq!(contact.freq_khz, Some(14_025.0));
        assert_eq!(contact.band, Some(cla_core::Band::B20m));
        assert_eq!(contact.mode, Mode::Cw);
    }

    #[test]
    fn field_names_are_case_insensitive() {
        let input = "<call:4>W1AW<qso_date:8>20250628<time_on:4>1805<eor>";
        let summary = parse_str(input);
        assert_eq!(summary.contacts.len(), 1);
        assert_eq!(summary.contacts[0].timestamp.minute(), 5);
    }

    #[test]
    fn header_is_ignored() {
        let input = format!(
            "Generated by a logger\n<ADIF_VER:5>3.1.4<PROGRAMID:5>N3FJP<eoh>\n{RECORD}"
        );
        let summary = parse_str(&input);
        assert_eq!(summary.total_records, 1);
        assert_eq!(summary.contacts.len(), 1);
    }

    #[test]
    fn value_length_comes_from_the_tag() {
        // The value contains a '<' that must not be treated as a tag open.
        let input = "<CALL:4>W1AW<COMMENT:3><ok<QSO_DATE:8>20250628<TIME_ON:4>1805<eor>";
        let summary = parse_str(input);
        assert_eq!(summary.contacts.len(), 1);
    }

    #[test]
    fn missing_timestamp_is_skipped_and_counted() {
        let input = "<CALL:4>W1AW<FREQ:6>14.025<eor>\
<CALL:4>N1XX<QSO_DATE:8>20250628<TIME_ON:4>1810<eor>";
        let summary = parse_str(input);
        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.skipped_records, 1);
        assert_eq!(summary.contacts.len(), 1);
        assert_eq!(summary.contacts[0].call.as_str(), "N1XX");
    }

    #[test]
    fn operator_falls_back_to_station_callsign_then_unknown() {
        let input = "<CALL:4>W1AW<QSO_DATE:8>20250628<TIME_ON:4>1805\
<STATION_CALLSIGN:4>K9CT<eor>\
<CALL:4>N1XX<QSO_DATE:8>20250628<TIME_ON:4>1810<eor>";
        let summary = parse_str(input);
        assert_eq!(summary.contacts[0].operator.as_str(), "K9CT");
        assert_eq!(summary.contacts[0].station.as_str(), "K9CT");
        assert_eq!(summary.contacts[1].operator.as_str(), "UNKNOWN");
        assert_eq!(summary.contacts[1].station.as_str(), "UNKNOWN");
    }

    #[test]
    fn output_is_sorted_by_timestamp() {
        let input = "<CALL:4>N1XX<QSO_DATE:8>20250628<TIME_ON:4>1810<eor>\
<CALL:4>W1AW<QSO_DATE:8>20250628<TIME_ON:4>1805<eor>";
        let summary = parse_str(input);
        assert_eq!(summary.contacts[0].call.as_str(), "W1AW");
        assert_eq!(summary.contacts[1].call.as_str(), "N1XX");
    }

    #[test]
    fn missing_frequency_and_band_stay_none() {
        let input = "<CALL:4>W1AW<QSO_DATE:8>20250628<TIME_ON:4>1805<eor>";
        let summary = parse_str(input);
        let contact = &summary.contacts[0];
        assert_eq!(contact.freq_khz, None);
        assert_eq!(contact.band, None);
    }

    #[test]
    fn truncated_declared_length_drops_the_field_not_the_record() {
        let input = "<CALL:4>W1AW<QSO_DATE:8>20250628<TIME_ON:4>1805<eor><COMMENT:99>short";
        let summary = parse_str(input);
        assert_eq!(summary.contacts.len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_summary() {
        let summary = parse_str("");
        assert_eq!(summary.total_records, 0);
        assert!(summary.contacts.is_empty());
    }

    #[test]
    fn file_roundtrip_with_tempfile() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RECORD.as_bytes()).unwrap();

        let summary = parse_file(file.path()).unwrap();
        assert_eq!(summary.contacts.len(), 1);
    }

    #[test]
    fn file_with_no_usable_records_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<CALL:4>W1AW<eor>").unwrap();

        let err = parse_file(file.path()).unwrap_err();
        assert!(matches!(err, AdifError::NoRecords { skipped: 1, .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = parse_file(Path::new("/nonexistent/log.adi")).unwrap_err();
        assert!(matches!(err, AdifError::Read { .. }));
    }
}
