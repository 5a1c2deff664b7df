use std::sync::Arc;

use image::RgbImage;

use crate::config::{ClassifierKind, ClassifierSettings};
use crate::models::AnalysisResult;

/// Turns a decoded leaf image into a disease verdict.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    fn classify(&self, image: &RgbImage) -> AnalysisResult;
}

/// Placeholder until a trained PDDD model is wired in.
///
/// Always reports a healthy plant with unknown disease and zero confidence.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubClassifier;

impl Classifier for StubClassifier {
    fn name(&self) -> &str {
        "stub"
    }

    fn classify(&self, _image: &RgbImage) -> AnalysisResult {
        AnalysisResult::unknown()
    }
}

pub fn from_settings(settings: &ClassifierSettings) -> Arc<dyn Classifier> {
    match settings.kind {
        ClassifierKind::Stub => Arc::new(StubClassifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HealthStatus;
    use image::Rgb;

    #[test]
    fn test_stub_ignores_input() {
        let classifier = StubClassifier;
        let tiny = RgbImage::new(1, 1);
        let brown = RgbImage::from_pixel(64, 48, Rgb([120, 72, 0]));

        for img in [&tiny, &brown] {
            let result = classifier.classify(img);
            assert_eq!(result, AnalysisResult::unknown());
            assert_eq!(result.disease_confidence, 0.0);
            assert_eq!(result.health_status, HealthStatus::Healthy);
        }
    }

    #[test]
    fn test_from_settings_defaults_to_stub() {
        let classifier = from_settings(&ClassifierSettings::default());
        assert_eq!(classifier.name(), "stub");
        assert_eq!(classifier.classify(&RgbImage::new(2, 2)).disease_name, "Unknown");
    }
}
