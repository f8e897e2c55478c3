//! Tee-time sources
//!
//! Each upstream collection is served from a fixed path. All of them share
//! the same response schema: a JSON array of [`TeeTimeRecord`](super::TeeTimeRecord).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An upstream tee-time collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TeeTimeSource {
    /// Generic/test collection
    All,
    /// ChronoGolf courses
    #[value(name = "chronogolf")]
    ChronoGolf,
    /// ForeUp courses
    #[value(name = "foreup")]
    ForeUp,
    /// Eaglewood
    Eaglewood,
}

impl TeeTimeSource {
    /// Every source, in declaration order
    pub fn all() -> [TeeTimeSource; 4] {
        [
            TeeTimeSource::All,
            TeeTimeSource::ChronoGolf,
            TeeTimeSource::ForeUp,
            TeeTimeSource::Eaglewood,
        ]
    }

    /// Path of the collection, relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            TeeTimeSource::All => "/test_api/teetimes",
            TeeTimeSource::ChronoGolf => "/api/teetimes",
            TeeTimeSource::ForeUp => "/api/foreup_teetimes",
            TeeTimeSource::Eaglewood => "/api/eaglewood_teetimes",
        }
    }

    /// Provider label shown to users; the generic collection has none
    pub fn label(&self) -> Option<&'static str> {
        match self {
            TeeTimeSource::All => None,
            TeeTimeSource::ChronoGolf => Some("ChronoGolf"),
            TeeTimeSource::ForeUp => Some("ForeUp"),
            TeeTimeSource::Eaglewood => Some("Eaglewood"),
        }
    }

    /// User-visible message set when a load from this source fails
    pub fn failure_message(&self) -> String {
        match self.label() {
            Some(label) => format!("Failed to load {} tee times", label),
            None => "Failed to load tee times".to_string(),
        }
    }
}

impl fmt::Display for TeeTimeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TeeTimeSource::All => "all",
            TeeTimeSource::ChronoGolf => "chronogolf",
            TeeTimeSource::ForeUp => "foreup",
            TeeTimeSource::Eaglewood => "eaglewood",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown tee-time source: {0}")]
pub struct ParseSourceError(String);

impl FromStr for TeeTimeSource {
    type Err = ParseSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "test" => Ok(TeeTimeSource::All),
            "chronogolf" => Ok(TeeTimeSource::ChronoGolf),
            "foreup" => Ok(TeeTimeSource::ForeUp),
            "eaglewood" => Ok(TeeTimeSource::Eaglewood),
            other => Err(ParseSourceError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(TeeTimeSource::All.path(), "/test_api/teetimes");
        assert_eq!(TeeTimeSource::ChronoGolf.path(), "/api/teetimes");
        assert_eq!(TeeTimeSource::ForeUp.path(), "/api/foreup_teetimes");
        assert_eq!(TeeTimeSource::Eaglewood.path(), "/api/eaglewood_teetimes");
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(TeeTimeSource::All.failure_message(), "Failed to load tee times");
        assert_eq!(
            TeeTimeSource::ForeUp.failure_message(),
            "Failed to load ForeUp tee times"
        );
    }

    #[test]
    fn test_parse_round_trips_display() {
        for source in TeeTimeSource::all() {
            let parsed: TeeTimeSource = source.to_string().parse().unwrap();
            assert_eq!(parsed, source);
        }
        assert_eq!("Test".parse::<TeeTimeSource>().unwrap(), TeeTimeSource::All);
        assert!("stonebridge".parse::<TeeTimeSource>().is_err());
    }
}
