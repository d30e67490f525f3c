pub mod detector;
pub mod features;
pub mod heuristic;
pub mod model;
pub mod service;
pub mod types;

pub use detector::Detector;
pub use features::{RegionFeature, CANVAS_SIZE};
pub use heuristic::{HeuristicAnalysis, HeuristicClassifier, HeuristicLabel, ScoreTable, Tallies};
pub use model::{InferenceBackend, RawDetection};
pub use service::DetectionService;
pub use types::{Detection, DetectionReport, DetectionResult, DetectorKind};
