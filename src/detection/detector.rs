use std::path::Path;
use std::sync::Arc;

use image::DynamicImage;
use tracing::{info, warn};

use super::heuristic::{open_image, HeuristicClassifier};
use super::model::{self, InferenceBackend};
use super::types::{DetectionResult, DetectorKind};
use crate::config::Configuration;
use crate::error::ClassifierError;

/// Which classifier handles images, decided once at startup.
#[derive(Clone)]
pub enum Detector {
    ModelBased(Arc<dyn InferenceBackend>),
    Heuristic(HeuristicClassifier),
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Detector::ModelBased(backend) => write!(f, "ModelBased({})", backend.name()),
            Detector::Heuristic(_) => write!(f, "Heuristic"),
        }
    }
}

impl Detector {
    pub fn heuristic() -> Self {
        Detector::Heuristic(HeuristicClassifier::new())
    }

    pub fn model_based(backend: Arc<dyn InferenceBackend>) -> Self {
        Detector::ModelBased(backend)
    }

    /// Tries the configured model and settles on the heuristic classifier if
    /// it cannot be loaded.
    pub fn from_config(configuration: &Configuration) -> Self {
        let Some(model_path) = configuration.model_path.as_deref() else {
            info!("No model configured. Using fallback detection method.");
            return Self::heuristic();
        };

        match model::load_backend(model_path) {
            Ok(backend) => {
                info!("Loaded {} model from {:?}", backend.name(), model_path);
                Self::model_based(backend)
            }
            Err(e) => {
                warn!("{}. Using fallback detection method.", e);
                Self::heuristic()
            }
        }
    }

    pub fn kind(&self) -> DetectorKind {
        match self {
            Detector::ModelBased(_) => DetectorKind::Model,
            Detector::Heuristic(_) => DetectorKind::Heuristic,
        }
    }

    pub fn detect(&self, image: &DynamicImage) -> (DetectorKind, DetectionResult) {
        match self {
            Detector::ModelBased(backend) => match Self::run_model(backend.as_ref(), image) {
                Ok(result) => (DetectorKind::Model, result),
                Err(e) => {
                    warn!(
                        "Model {} failed, using heuristic classifier: {}",
                        backend.name(),
                        e
                    );
                    (
                        DetectorKind::Heuristic,
                        HeuristicClassifier::new().classify(image),
                    )
                }
            },
            Detector::Heuristic(classifier) => (DetectorKind::Heuristic, classifier.classify(image)),
        }
    }

    /// Loads and classifies the file at `path`. Unreadable files yield the
    /// default detection, reported as heuristic since no model ran.
    pub fn detect_path(&self, path: &Path) -> (DetectorKind, DetectionResult) {
        match open_image(path) {
            Ok(image) => self.detect(&image),
            Err(e) => {
                warn!("Could not load {:?}, using default: {}", path, e);
                (DetectorKind::Heuristic, DetectionResult::fallback_default())
            }
        }
    }

    fn run_model(
        backend: &dyn InferenceBackend,
        image: &DynamicImage,
    ) -> Result<DetectionResult, ClassifierError> {
        let raw = backend.infer(&image.to_rgb8())?;
        Ok(model::to_detection_result(&raw))
    }
}
