//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use cla_core::{AnalysisConfig, ClassifierConfig, SessionConfig};

/// Application configuration.
///
/// All thresholds default to the values the analysis engine uses and can be
/// overridden by a config file or `CLA_*` environment variables; CLI flags
/// override both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Session break threshold in minutes.
    pub session_gap_minutes: i64,

    /// Silent-period reporting threshold in minutes.
    pub silence_gap_minutes: i64,

    /// Frequency tolerance for Run detection, in kHz.
    pub freq_tolerance_khz: f64,

    /// Minimum frequency coverage for the Run/S&P split to be reliable.
    pub min_freq_coverage_pct: f64,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = AnalysisConfig::new();
        Self {
            session_gap_minutes: defaults.session.break_minutes,
            silence_gap_minutes: defaults.gap_minutes,
            freq_tolerance_khz: defaults.classifier.freq_tolerance_khz,
            min_freq_coverage_pct: defaults.min_freq_coverage_pct,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("CLA_"));

        figment.extract()
    }

    /// Converts loaded settings into the engine's analysis config.
    #[must_use]
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            session: SessionConfig {
                break_minutes: self.session_gap_minutes,
            },
            classifier: ClassifierConfig {
                freq_tolerance_khz: self.freq_tolerance_khz,
                continuity_minutes: self.session_gap_minutes,
            },
            gap_minutes: self.silence_gap_minutes,
            min_freq_coverage_pct: self.min_freq_coverage_pct,
        }
    }
}

/// Returns the platform-specific config directory for cla.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cla"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = Config::default();
        assert_eq!(config.session_gap_minutes, 15);
        assert_eq!(config.silence_gap_minutes, 15);
        assert!((config.freq_tolerance_khz - 0.2).abs() < 1e-9);
        assert!((config.min_freq_coverage_pct - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_analysis_config_carries_overrides() {
        let config = Config {
            session_gap_minutes: 30,
            silence_gap_minutes: 20,
            freq_tolerance_khz: 0.5,
            min_freq_coverage_pct: 80.0,
        };
        let analysis = config.analysis_config();
        assert_eq!(analysis.session.break_minutes, 30);
        assert_eq!(analysis.gap_minutes, 20);
        assert!((analysis.classifier.freq_tolerance_khz - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_dirs_config_path_ends_with_cla() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "cla");
    }
}
