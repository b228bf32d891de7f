//! Speed/quality tradeoff selected by the caller.
//!
//! The value carries no behaviour. Each engine adapter maps it onto its own
//! knob (or documents that it has none).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Recognition accuracy level.
///
/// - `Fast`: lowest latency, may miss small or degraded text.
/// - `Accurate`: language correction and the full recognition model, slower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrAccuracy {
    Fast,
    Accurate,
}

impl Default for OcrAccuracy {
    fn default() -> Self {
        OcrAccuracy::Fast
    }
}

impl OcrAccuracy {
    pub fn as_str(self) -> &'static str {
        match self {
            OcrAccuracy::Fast => "fast",
            OcrAccuracy::Accurate => "accurate",
        }
    }
}

impl fmt::Display for OcrAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown accuracy level '{0}' (expected 'fast' or 'accurate')")]
pub struct ParseAccuracyError(pub String);

impl FromStr for OcrAccuracy {
    type Err = ParseAccuracyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(OcrAccuracy::Fast),
            "accurate" => Ok(OcrAccuracy::Accurate),
            _ => Err(ParseAccuracyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_levels_case_insensitively() {
        assert_eq!("fast".parse::<OcrAccuracy>(), Ok(OcrAccuracy::Fast));
        assert_eq!(" Accurate ".parse::<OcrAccuracy>(), Ok(OcrAccuracy::Accurate));
    }

    #[test]
    fn rejects_unknown_level() {
        let err = "balanced".parse::<OcrAccuracy>().unwrap_err();
        assert_eq!(err, ParseAccuracyError("balanced".into()));
        assert!(err.to_string().contains("balanced"));
    }

    #[test]
    fn display_matches_parse() {
        for level in [OcrAccuracy::Fast, OcrAccuracy::Accurate] {
            assert_eq!(level.to_string().parse::<OcrAccuracy>(), Ok(level));
        }
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&OcrAccuracy::Accurate).unwrap();
        assert_eq!(json, "\"accurate\"");
    }
}
