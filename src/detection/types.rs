use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::disease;

/// Upper bound on any reported confidence.
pub const MAX_CONFIDENCE: f64 = 0.95;

pub const DEFAULT_LABEL: &str = "Early Blight";
pub const DEFAULT_CONFIDENCE: f64 = 0.75;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_name: String,
    pub confidence: f64,
    pub description: String,
    pub treatment: String,
}

impl Detection {
    /// Builds a detection for `label`, pulling its text from the disease table.
    pub fn for_label(label: &str, confidence: f64) -> Self {
        let record = disease::lookup(label);
        Self {
            class_name: label.to_string(),
            confidence: confidence.clamp(0.0, MAX_CONFIDENCE),
            description: record.description.to_string(),
            treatment: record.treatment.to_string(),
        }
    }
}

/// The `{"detections": [...]}` document returned for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub detections: Vec<Detection>,
}

impl DetectionResult {
    pub fn single(detection: Detection) -> Self {
        Self {
            detections: vec![detection],
        }
    }

    /// Returned when an image cannot be classified at all.
    pub fn fallback_default() -> Self {
        Self::single(Detection::for_label(DEFAULT_LABEL, DEFAULT_CONFIDENCE))
    }

    pub fn top(&self) -> Option<&Detection> {
        self.detections
            .iter()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    Model,
    Heuristic,
}

/// A classified image, as emitted by the detection service.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub id: Uuid,
    pub image_path: PathBuf,
    pub detected_at: DateTime<Utc>,
    pub detector: DetectorKind,
    #[serde(flatten)]
    pub result: DetectionResult,
}

impl DetectionReport {
    pub fn new(image_path: PathBuf, detector: DetectorKind, result: DetectionResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            image_path,
            detected_at: Utc::now(),
            detector,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_default_is_early_blight() {
        let result = DetectionResult::fallback_default();
        assert_eq!(result.detections.len(), 1);
        let detection = &result.detections[0];
        assert_eq!(detection.class_name, "Early Blight");
        assert_eq!(detection.confidence, 0.75);
        assert_eq!(
            detection.description,
            disease::lookup("Early Blight").description
        );
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(Detection::for_label("Healthy", 1.7).confidence, MAX_CONFIDENCE);
        assert_eq!(Detection::for_label("Healthy", -0.2).confidence, 0.0);
    }

    #[test]
    fn report_serializes_detections_at_top_level() {
        let report = DetectionReport::new(
            PathBuf::from("leaf.png"),
            DetectorKind::Heuristic,
            DetectionResult::fallback_default(),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["detector"], "heuristic");
        assert_eq!(json["detections"][0]["class_name"], "Early Blight");
        assert_eq!(json["image_path"], "leaf.png");
    }
}
