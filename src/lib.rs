pub mod config;
pub mod detection;
pub mod disease;
pub mod error;

pub use crate::config::Configuration;
pub use detection::{
    Detection, DetectionReport, DetectionResult, DetectionService, Detector, HeuristicClassifier,
};
pub use error::{AppError, ClassifierError};
