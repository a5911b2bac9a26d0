//! Core domain logic for the contest log analyzer.
//!
//! This crate contains the fundamental types and logic for:
//! - Classification: tagging contacts as Run or Search-and-Pounce
//! - Session reconstruction: splitting contact streams on idle gaps
//! - Gap detection: finding silent periods in the global timeline
//! - Metrics: per-operator statistics, time ledger, and data quality

pub mod classify;
pub mod contact;
pub mod gap;
pub mod metrics;
pub mod session;
pub mod types;

pub use classify::{ClassifiedSequence, ClassifierConfig, RunClassification, classify_sequence};
pub use contact::{Band, Contact, Mode, ModeClass, UnknownBand};
pub use gap::{Gap, GapReport, find_gaps};
pub use metrics::{
    AnalysisConfig, BandModeRow, DataQuality, DupeGroup, LogAnalysis, MultiModeRow,
    MultiModeSummary, OperatorStats, StationGaps, TimeLedger, analyze,
};
pub use session::{Session, SessionConfig, SessionTrack, build_sessions};
pub use types::{Callsign, StationId, ValidationError};
