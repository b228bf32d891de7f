//! Per-call recognition settings.

use crate::accuracy::OcrAccuracy;

/// Smallest text height, as a fraction of image height, that Vision will
/// try to read. Anything lower gets dropped as noise.
pub const DEFAULT_MIN_TEXT_HEIGHT: f32 = 0.008;

/// Settings for a single recognition call.
///
/// Built fresh for each call and consumed by the active engine adapter.
/// Fields an engine has no equivalent for are ignored by that engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizeOptions {
    pub accuracy: OcrAccuracy,
    /// BCP-47 tags such as `en-US`, `fr-FR`, `zh-Hans`. Empty means let
    /// the engine detect the language.
    pub languages: Vec<String>,
    pub language_correction: bool,
    pub min_text_height: f32,
    pub include_regions: bool,
}

impl Default for RecognizeOptions {
    fn default() -> Self {
        Self {
            accuracy: OcrAccuracy::default(),
            languages: Vec::new(),
            language_correction: true,
            min_text_height: DEFAULT_MIN_TEXT_HEIGHT,
            include_regions: true,
        }
    }
}

impl RecognizeOptions {
    pub fn new(accuracy: OcrAccuracy) -> Self {
        Self {
            accuracy,
            ..Default::default()
        }
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_language_correction(mut self, enabled: bool) -> Self {
        self.language_correction = enabled;
        self
    }

    pub fn with_min_text_height(mut self, fraction: f32) -> Self {
        self.min_text_height = fraction.clamp(0.0, 1.0);
        self
    }

    pub fn with_regions(mut self, enabled: bool) -> Self {
        self.include_regions = enabled;
        self
    }
}

impl From<OcrAccuracy> for RecognizeOptions {
    fn from(value: OcrAccuracy) -> Self {
        RecognizeOptions::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_request_automatic_language_detection() {
        let opts = RecognizeOptions::default();
        assert!(opts.languages.is_empty());
        assert!(opts.language_correction);
        assert_eq!(opts.min_text_height, DEFAULT_MIN_TEXT_HEIGHT);
        assert_eq!(opts.accuracy, OcrAccuracy::Fast);
    }

    #[test]
    fn builder_sets_fields() {
        let opts = RecognizeOptions::new(OcrAccuracy::Accurate)
            .with_languages(["fr-FR", "zh-Hans"])
            .with_language_correction(false)
            .with_min_text_height(3.0)
            .with_regions(false);
        assert_eq!(opts.accuracy, OcrAccuracy::Accurate);
        assert_eq!(opts.languages, vec!["fr-FR".to_string(), "zh-Hans".to_string()]);
        assert!(!opts.language_correction);
        assert_eq!(opts.min_text_height, 1.0);
        assert!(!opts.include_regions);
    }
}
