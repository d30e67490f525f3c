use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::Level;

use crate::error::AppError;

const ENV_PREFIX: &str = "BLIGHTSCAN";
const LOCAL_CONFIG: &str = "blightscan";

#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    /// Trained model weights. The heuristic classifier is used when this is
    /// unset, empty (`BLIGHTSCAN_MODEL_PATH=`) or cannot be loaded.
    pub model_path: Option<PathBuf>,
    /// Maximum number of images classified at once.
    pub concurrency: usize,
    pub log_level: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            model_path: Some(PathBuf::from("best.pt")),
            concurrency: 4,
            log_level: "info".to_string(),
        }
    }
}

impl Configuration {
    /// Layers defaults, `./blightscan.toml`, an explicit file and
    /// `BLIGHTSCAN_*` environment variables, in that order.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        Self::load_with(path, Environment::with_prefix(ENV_PREFIX))
    }

    /// Same as [`Configuration::load`] with the environment layer supplied by
    /// the caller.
    pub fn load_with(path: Option<&Path>, environment: Environment) -> Result<Self, AppError> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("concurrency", defaults.concurrency as i64)?
            .set_default("log_level", defaults.log_level)?
            .add_source(File::with_name(LOCAL_CONFIG).required(false));

        if let Some(model_path) = defaults.model_path {
            builder = builder.set_default("model_path", model_path.to_string_lossy().to_string())?;
        }

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let configuration: Configuration = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        Ok(configuration.normalized())
    }

    pub fn with_concurrency(mut self, concurrency: Option<usize>) -> Self {
        if let Some(concurrency) = concurrency {
            self.concurrency = concurrency;
        }
        self.normalized()
    }

    pub fn max_log_level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }

    fn normalized(mut self) -> Self {
        self.concurrency = self.concurrency.max(1);
        if self
            .model_path
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            self.model_path = None;
        }
        self
    }
}
