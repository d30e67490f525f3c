use std::path::PathBuf;

use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Detection task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
    #[error("No images given. Pass one or more image paths or --list-diseases.")]
    NoInput,
}

// Classifier Error Type
//
// These never reach callers of the `classify*` entry points, which degrade to
// the default detection instead.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Failed to read image {1:?}: {0}")]
    Read(std::io::Error, PathBuf),
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Image has no pixels ({0}x{1})")]
    EmptyImage(u32, u32),
    #[error("Score for {0} is not finite")]
    NonFiniteScore(&'static str),
    #[error("Model file not found at {0:?}")]
    ModelNotFound(PathBuf),
    #[error("No inference runtime is available to load {0:?}")]
    InferenceUnavailable(PathBuf),
    #[error("Inference failed: {0}")]
    Inference(String),
}
