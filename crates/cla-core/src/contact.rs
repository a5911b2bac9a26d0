//! The contact (QSO) record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Callsign, StationId};

/// Amateur-radio contest bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    #[serde(rename = "160m")]
    B160m,
    #[serde(rename = "80m")]
    B80m,
    #[serde(rename = "60m")]
    B60m,
    #[serde(rename = "40m")]
    B40m,
    #[serde(rename = "30m")]
    B30m,
    #[serde(rename = "20m")]
    B20m,
    #[serde(rename = "17m")]
    B17m,
    #[serde(rename = "15m")]
    B15m,
    #[serde(rename = "12m")]
    B12m,
    #[serde(rename = "10m")]
    B10m,
    #[serde(rename = "6m")]
    B6m,
    #[serde(rename = "4m")]
    B4m,
    #[serde(rename = "2m")]
    B2m,
    #[serde(rename = "1.25m")]
    B125m,
    #[serde(rename = "70cm")]
    B70cm,
}

impl Band {
    /// All bands in frequency order, used for report ordering.
    pub const ALL: [Self; 15] = [
        Self::B160m,
        Self::B80m,
        Self::B60m,
        Self::B40m,
        Self::B30m,
        Self::B20m,
        Self::B17m,
        Self::B15m,
        Self::B12m,
        Self::B10m,
        Self::B6m,
        Self::B4m,
        Self::B2m,
        Self::B125m,
        Self::B70cm,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::B160m => "160m",
            Self::B80m => "80m",
            Self::B60m => "60m",
            Self::B40m => "40m",
            Self::B30m => "30m",
            Self::B20m => "20m",
            Self::B17m => "17m",
            Self::B15m => "15m",
            Self::B12m => "12m",
            Self::B10m => "10m",
            Self::B6m => "6m",
            Self::B4m => "4m",
            Self::B2m => "2m",
            Self::B125m => "1.25m",
            Self::B70cm => "70cm",
        }
    }

    /// Nominal band-center frequency in kHz.
    ///
    /// Used as a fallback estimate when a contact carries a band but no
    /// logged frequency.
    #[must_use]
    pub const fn center_khz(&self) -> f64 {
        match self {
            Self::B160m => 1_900.0,
            Self::B80m => 3_750.0,
            Self::B60m => 5_330.0,
            Self::B40m => 7_100.0,
            Self::B30m => 10_125.0,
            Self::B20m => 14_200.0,
            Self::B17m => 18_100.0,
            Self::B15m => 21_200.0,
            Self::B12m => 24_900.0,
            Self::B10m => 28_400.0,
            Self::B6m => 50_100.0,
            Self::B4m => 70_200.0,
            Self::B2m => 144_200.0,
            Self::B125m => 222_100.0,
            Self::B70cm => 432_100.0,
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Band {
    type Err = UnknownBand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "160M" => Ok(Self::B160m),
            "80M" => Ok(Self::B80m),
            "60M" => Ok(Self::B60m),
            "40M" => Ok(Self::B40m),
            "30M" => Ok(Self::B30m),
            "20M" => Ok(Self::B20m),
            "17M" => Ok(Self::B17m),
            "15M" => Ok(Self::B15m),
            "12M" => Ok(Self::B12m),
            "10M" => Ok(Self::B10m),
            "6M" => Ok(Self::B6m),
            "4M" => Ok(Self::B4m),
            "2M" => Ok(Self::B2m),
            "1.25M" => Ok(Self::B125m),
            "70CM" => Ok(Self::B70cm),
            _ => Err(UnknownBand(s.to_string())),
        }
    }
}

/// Error type for unrecognized band strings.
#[derive(Debug, Clone)]
pub struct UnknownBand(String);

impl std::fmt::Display for UnknownBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown band: {}", self.0)
    }
}

impl std::error::Error for UnknownBand {}

/// Operating mode as logged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Cw,
    Ssb,
    Fm,
    Am,
    Ft8,
    Ft4,
    Psk31,
    Rtty,
    /// Anything else the logger wrote, kept verbatim (uppercased).
    Other(String),
}

impl Mode {
    /// Parse a logged mode string. Never fails; unrecognized modes become
    /// [`Mode::Other`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "CW" => Self::Cw,
            "SSB" | "PHONE" | "USB" | "LSB" => Self::Ssb,
            "FM" => Self::Fm,
            "AM" => Self::Am,
            "FT8" => Self::Ft8,
            "FT4" => Self::Ft4,
            "PSK31" => Self::Psk31,
            "RTTY" => Self::Rtty,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cw => "CW",
            Self::Ssb => "SSB",
            Self::Fm => "FM",
            Self::Am => "AM",
            Self::Ft8 => "FT8",
            Self::Ft4 => "FT4",
            Self::Psk31 => "PSK31",
            Self::Rtty => "RTTY",
            Self::Other(s) => s,
        }
    }

    /// Coarse grouping used by the band/mode breakdown.
    #[must_use]
    pub const fn class(&self) -> ModeClass {
        match self {
            Self::Cw => ModeClass::Cw,
            Self::Ssb | Self::Fm | Self::Am => ModeClass::Phone,
            Self::Ft8 | Self::Ft4 | Self::Psk31 | Self::Rtty => ModeClass::Digital,
            Self::Other(_) => ModeClass::Digital,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CW / Phone / Digital grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeClass {
    Cw,
    Phone,
    Digital,
}

impl ModeClass {
    pub const ALL: [Self; 3] = [Self::Cw, Self::Phone, Self::Digital];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cw => "CW",
            Self::Phone => "Phone",
            Self::Digital => "Dig",
        }
    }
}

/// One logged two-way contact, normalized and immutable.
///
/// This is the record the analysis engine consumes; the ADIF adapter is
/// responsible for producing them already validated (in particular, every
/// contact has an absolute UTC timestamp).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// When the contact started (from `QSO_DATE` + `TIME_ON`).
    pub timestamp: DateTime<Utc>,

    /// Operator of record at the logging position.
    pub operator: Callsign,

    /// Logging station (computer / physical position) the contact was made from.
    pub station: StationId,

    /// The station worked.
    pub call: Callsign,

    /// Band, when logged. Needed for the frequency-estimation fallback.
    pub band: Option<Band>,

    /// Operating mode.
    pub mode: Mode,

    /// Logged frequency in kHz, when present.
    pub freq_khz: Option<f64>,
}
