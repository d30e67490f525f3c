use std::path::Path;
use std::sync::Arc;

use image::RgbImage;
use tracing::debug;

use super::types::{Detection, DetectionResult};
use crate::disease;
use crate::error::ClassifierError;

/// Confidence reported when the model sees nothing it recognizes.
const UNKNOWN_CONFIDENCE: f64 = 0.5;

/// One box reported by the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawDetection {
    pub class_id: u32,
    pub confidence: f64,
}

/// A loaded disease model. Implementations wrap whatever runtime executes the
/// weights.
pub trait InferenceBackend: Send + Sync {
    fn name(&self) -> &'static str;
    fn infer(&self, image: &RgbImage) -> Result<Vec<RawDetection>, ClassifierError>;
}

/// Resolves the configured weights into a backend.
///
/// No inference runtime is linked into this build, so an existing weights
/// file still reports [`ClassifierError::InferenceUnavailable`]; callers fall
/// back to the heuristic classifier.
pub fn load_backend(model_path: &Path) -> Result<Arc<dyn InferenceBackend>, ClassifierError> {
    if !model_path.is_file() {
        return Err(ClassifierError::ModelNotFound(model_path.to_path_buf()));
    }
    Err(ClassifierError::InferenceUnavailable(model_path.to_path_buf()))
}

/// Maps model output onto labelled detections. Unmapped class ids become
/// "Unknown"; an empty list becomes a single "Unknown" entry.
pub fn to_detection_result(raw: &[RawDetection]) -> DetectionResult {
    let detections: Vec<Detection> = raw
        .iter()
        .filter(|r| r.confidence.is_finite())
        .map(|r| Detection::for_label(disease::class_name(r.class_id), r.confidence))
        .collect();

    if detections.is_empty() {
        debug!("Model returned no usable detections");
        return DetectionResult::single(Detection::for_label(
            disease::UNKNOWN,
            UNKNOWN_CONFIDENCE,
        ));
    }

    DetectionResult { detections }
}
