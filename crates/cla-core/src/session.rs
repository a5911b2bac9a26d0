//! Operating-session reconstruction from the contact stream.
//!
//! A session is a contiguous block of activity by one operator at one
//! station: consecutive contacts separated by more than the break threshold
//! split into separate sessions. Sessions for the same callsign at different
//! stations are physically distinct setups and are never merged, even when
//! temporally adjacent.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::contact::Contact;
use crate::types::{Callsign, StationId};

/// Configuration for session reconstruction.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Inactivity threshold in minutes. A gap strictly greater than this
    /// between consecutive contacts closes the session. Default: 15.
    pub break_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { break_minutes: 15 }
    }
}

/// One contiguous block of operating activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Timestamp of the first contact in the session.
    pub start: DateTime<Utc>,

    /// Timestamp of the last contact in the session.
    pub end: DateTime<Utc>,

    /// The contacts in this session, time-ordered.
    pub contacts: Vec<Contact>,
}

impl Session {
    /// Elapsed duration, end minus start. Zero for a single-contact session.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    #[must_use]
    pub fn qso_count(&self) -> usize {
        self.contacts.len()
    }
}

/// The ordered sessions of one (operator, station) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTrack {
    pub operator: Callsign,
    pub station: StationId,

    /// Sessions in chronological order.
    pub sessions: Vec<Session>,

    /// Timestamp of this pair's first contact.
    pub first_contact: DateTime<Utc>,

    /// Timestamp of this pair's last contact.
    pub last_contact: DateTime<Utc>,
}

impl SessionTrack {
    /// Sum of session durations for this pair.
    #[must_use]
    pub fn active_time(&self) -> Duration {
        self.sessions
            .iter()
            .fold(Duration::zero(), |acc, s| acc + s.duration())
    }

    #[must_use]
    pub fn qso_count(&self) -> usize {
        self.sessions.iter().map(Session::qso_count).sum()
    }

    /// Sessions holding exactly one contact. A high share of these usually
    /// means a merged multi-station log.
    #[must_use]
    pub fn single_contact_sessions(&self) -> usize {
        self.sessions.iter().filter(|s| s.qso_count() == 1).count()
    }
}

/// Split one pair's time-ordered contacts at gaps above the threshold.
fn split_sessions(contacts: Vec<Contact>, break_threshold: Duration) -> Vec<Session> {
    let mut sessions = Vec::new();
    let mut current: Vec<Contact> = Vec::new();

    for contact in contacts {
        if let Some(prev) = current.last() {
            if contact.timestamp - prev.timestamp > break_threshold {
                let start = current[0].timestamp;
                let end = prev.timestamp;
                sessions.push(Session {
                    start,
                    end,
                    contacts: std::mem::take(&mut current),
                });
            }
        }
        current.push(contact);
    }

    if let Some(last) = current.last() {
        let start = current[0].timestamp;
        let end = last.timestamp;
        sessions.push(Session {
            start,
            end,
            contacts: current,
        });
    }

    sessions
}

/// Build session tracks for every (operator, station) pair in the stream.
///
/// Input must be globally time-ordered. Pairs are built independently (in
/// parallel) and the resulting tracks are sorted by (operator, station) so
/// output order is deterministic across runs.
#[must_use]
pub fn build_sessions(contacts: &[Contact], config: &SessionConfig) -> Vec<SessionTrack> {
    debug_assert!(
        contacts.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
        "session builder input must be time-ordered"
    );

    let mut by_pair: HashMap<(Callsign, StationId), Vec<Contact>> = HashMap::new();
    for contact in contacts {
        by_pair
            .entry((contact.operator.clone(), contact.station.clone()))
            .or_default()
            .push(contact.clone());
    }

    let break_threshold = Duration::minutes(config.break_minutes);
    let mut tracks: Vec<SessionTrack> = by_pair
        .into_par_iter()
        .map(|((operator, station), pair_contacts)| {
            let first_contact = pair_contacts[0].timestamp;
            let last_contact = pair_contacts[pair_contacts.len() - 1].timestamp;
            SessionTrack {
                operator,
                station,
                sessions: split_sessions(pair_contacts, break_threshold),
                first_contact,
                last_contact,
            }
        })
        .collect();

    tracks.sort_by(|a, b| {
        (&a.operator, &a.station).cmp(&(&b.operator, &b.station))
    });
    tracks
}
