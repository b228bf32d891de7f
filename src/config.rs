//! Environment-driven defaults for recognition calls.
//!
//! Recognized variables:
//! - `OCR_MODE`: `fast` (default) or `accurate`
//! - `OCR_LANGUAGES`: comma-separated BCP-47 tags, empty for auto-detect
//! - `OCR_MIN_TEXT_HEIGHT`: fraction of image height, `0.0..=1.0`
//! - `OCR_LANGUAGE_CORRECTION`: `true`/`false`/`1`/`0`
//!
//! Unset variables keep the defaults from [`RecognizeOptions::default`].

use crate::accuracy::{OcrAccuracy, ParseAccuracyError};
use crate::options::RecognizeOptions;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OCR_MODE: {0}")]
    Mode(#[from] ParseAccuracyError),

    #[error("{var}: invalid value '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Defaults applied to calls that don't pass explicit options.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OcrConfig {
    pub options: RecognizeOptions,
}

impl OcrConfig {
    /// Read `OCR_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = RecognizeOptions::default();

        if let Some(mode) = non_empty(lookup("OCR_MODE")) {
            options.accuracy = mode.parse::<OcrAccuracy>()?;
        }

        if let Some(langs) = non_empty(lookup("OCR_LANGUAGES")) {
            options.languages = langs
                .split(',')
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(raw) = non_empty(lookup("OCR_MIN_TEXT_HEIGHT")) {
            let height: f32 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "OCR_MIN_TEXT_HEIGHT",
                value: raw.clone(),
                reason: "not a number",
            })?;
            if !(0.0..=1.0).contains(&height) {
                return Err(ConfigError::Invalid {
                    var: "OCR_MIN_TEXT_HEIGHT",
                    value: raw,
                    reason: "must be between 0 and 1",
                });
            }
            options.min_text_height = height;
        }

        if let Some(raw) = non_empty(lookup("OCR_LANGUAGE_CORRECTION")) {
            options.language_correction = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "OCR_LANGUAGE_CORRECTION",
                        value: raw,
                        reason: "expected a boolean",
                    })
                }
            };
        }

        log::debug!(
            "[OCR] Config: mode={}, languages={:?}, min_text_height={}, language_correction={}",
            options.accuracy,
            options.languages,
            options.min_text_height,
            options.language_correction
        );

        Ok(Self { options })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<OcrConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        OcrConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config(&[]).unwrap(), OcrConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let cfg = config(&[
            ("OCR_MODE", "accurate"),
            ("OCR_LANGUAGES", "fr-FR, zh-Hans,,"),
            ("OCR_MIN_TEXT_HEIGHT", "0.02"),
            ("OCR_LANGUAGE_CORRECTION", "off"),
        ])
        .unwrap();
        assert_eq!(cfg.options.accuracy, OcrAccuracy::Accurate);
        assert_eq!(cfg.options.languages, vec!["fr-FR", "zh-Hans"]);
        assert_eq!(cfg.options.min_text_height, 0.02);
        assert!(!cfg.options.language_correction);
    }

    #[test]
    fn blank_mode_is_ignored() {
        let cfg = config(&[("OCR_MODE", "  ")]).unwrap();
        assert_eq!(cfg.options.accuracy, OcrAccuracy::Fast);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = config(&[("OCR_MODE", "turbo")]).unwrap_err();
        assert!(matches!(err, ConfigError::Mode(_)));
        assert!(err.to_string().starts_with("OCR_MODE"));
    }

    #[test]
    fn out_of_range_height_is_rejected() {
        let err = config(&[("OCR_MIN_TEXT_HEIGHT", "1.5")]).unwrap_err();
        assert!(err.to_string().contains("must be between 0 and 1"));
        let err = config(&[("OCR_MIN_TEXT_HEIGHT", "tall")]).unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn bad_boolean_is_rejected() {
        let err = config(&[("OCR_LANGUAGE_CORRECTION", "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "OCR_LANGUAGE_CORRECTION", .. }));
    }
}
