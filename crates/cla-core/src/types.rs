//! Core identifier types with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// Generates a validated string ID newtype with common trait implementations.
///
/// Values are trimmed and uppercased on construction so that `w1aw` and
/// `W1AW ` compare equal everywhere downstream.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after trimming, uppercasing, and validation.
            pub fn new(id: impl AsRef<str>) -> Result<Self, ValidationError> {
                let id = id.as_ref().trim().to_ascii_uppercase();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// The `"UNKNOWN"` placeholder used when a log omits this field.
            #[must_use]
            pub fn unknown() -> Self {
                Self("UNKNOWN".to_string())
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated amateur-radio callsign.
    ///
    /// Used both for the operator of record and for the station worked.
    /// Normalized to uppercase so log variants of the same call collapse
    /// into one operator.
    Callsign, "callsign"
);

define_string_id!(
    /// A validated station (logging computer / physical position) identifier.
    ///
    /// The same operator callsign may log from several stations during a
    /// contest; sessions are tracked per (operator, station) pair.
    StationId, "station ID"
);
