//! Rule-based classifier used when the trained model is unavailable.
//!
//! The image is stretched to a fixed canvas and split into quadrants. Each
//! quadrant votes for a label through a color predicate, and a global texture
//! measure nudges the scores. Weights and thresholds are empirical.

use std::path::Path;

use image::{DynamicImage, RgbImage};
use indexmap::IndexMap;
use tracing::{debug, warn};

use super::features::{self, RegionFeature};
use super::types::{Detection, DetectionResult, MAX_CONFIDENCE};
use crate::error::ClassifierError;

const TALLY_WEIGHT: f64 = 0.25;
const BASE_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeuristicLabel {
    EarlyBlight,
    LateBlight,
    HealthyPotato,
}

impl HeuristicLabel {
    /// Tie-break order: earlier labels win equal scores.
    pub const ALL: [HeuristicLabel; 3] = [
        HeuristicLabel::EarlyBlight,
        HeuristicLabel::LateBlight,
        HeuristicLabel::HealthyPotato,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HeuristicLabel::EarlyBlight => "Early Blight",
            HeuristicLabel::LateBlight => "Late Blight",
            HeuristicLabel::HealthyPotato => "Healthy Potato",
        }
    }

    /// Per-quadrant color predicate for this label.
    fn matches(&self, region: &RegionFeature) -> bool {
        let RegionFeature { red: r, green: g, blue: b } = *region;
        match self {
            // brown
            HeuristicLabel::EarlyBlight => r > g && g > b && r - b > 50.0,
            // dark lesions
            HeuristicLabel::LateBlight => r < 100.0 && g < 100.0 && b < 100.0,
            HeuristicLabel::HealthyPotato => g > r && g > b,
        }
    }

    fn texture_term(&self, texture: f64) -> f64 {
        match self {
            HeuristicLabel::EarlyBlight => (texture / 100.0) * 0.1,
            HeuristicLabel::LateBlight => (texture / 150.0) * 0.15,
            HeuristicLabel::HealthyPotato => (1.0 - texture / 200.0) * 0.15,
        }
    }
}

/// Number of quadrants matching each label's color predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tallies {
    pub early_blight: u32,
    pub late_blight: u32,
    pub healthy: u32,
}

impl Tallies {
    pub fn from_regions(regions: &[RegionFeature]) -> Self {
        let count = |label: HeuristicLabel| regions.iter().filter(|r| label.matches(r)).count() as u32;
        Self {
            early_blight: count(HeuristicLabel::EarlyBlight),
            late_blight: count(HeuristicLabel::LateBlight),
            healthy: count(HeuristicLabel::HealthyPotato),
        }
    }

    pub fn get(&self, label: HeuristicLabel) -> u32 {
        match label {
            HeuristicLabel::EarlyBlight => self.early_blight,
            HeuristicLabel::LateBlight => self.late_blight,
            HeuristicLabel::HealthyPotato => self.healthy,
        }
    }
}

/// Scores keyed by label, iterated in [`HeuristicLabel::ALL`] order.
pub type ScoreTable = IndexMap<HeuristicLabel, f64>;

/// Everything computed for one image, before the winner is chosen.
#[derive(Debug, Clone)]
pub struct HeuristicAnalysis {
    pub regions: [RegionFeature; 4],
    pub tallies: Tallies,
    pub texture: f64,
    pub scores: ScoreTable,
}

impl HeuristicAnalysis {
    pub fn of(image: &RgbImage) -> Result<Self, ClassifierError> {
        let regions = features::quadrant_features(image);
        let tallies = Tallies::from_regions(&regions);
        let texture = features::texture_score(image);

        let mut scores = ScoreTable::with_capacity(HeuristicLabel::ALL.len());
        for label in HeuristicLabel::ALL {
            let score = tallies.get(label) as f64 * TALLY_WEIGHT + label.texture_term(texture);
            if !score.is_finite() {
                return Err(ClassifierError::NonFiniteScore(label.as_str()));
            }
            scores.insert(label, score);
        }

        Ok(Self {
            regions,
            tallies,
            texture,
            scores,
        })
    }

    /// Highest-scoring label; the first label wins a tie.
    pub fn winner(&self) -> (HeuristicLabel, f64) {
        let mut best = (HeuristicLabel::EarlyBlight, f64::NEG_INFINITY);
        for (&label, &score) in &self.scores {
            if score > best.1 {
                best = (label, score);
            }
        }
        best
    }

    pub fn confidence(&self) -> f64 {
        (BASE_CONFIDENCE + self.winner().1).min(MAX_CONFIDENCE)
    }

    pub fn detection(&self) -> Detection {
        let (label, _) = self.winner();
        Detection::for_label(label.as_str(), self.confidence())
    }
}

/// Stateless; safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, image: &DynamicImage) -> Result<HeuristicAnalysis, ClassifierError> {
        let canvas = features::normalize(image)?;
        HeuristicAnalysis::of(&canvas)
    }

    pub fn try_classify(&self, image: &DynamicImage) -> Result<DetectionResult, ClassifierError> {
        let analysis = self.analyze(image)?;
        debug!(
            "Heuristic tallies {:?}, texture {:.3}, scores {:?}",
            analysis.tallies, analysis.texture, analysis.scores
        );
        Ok(DetectionResult::single(analysis.detection()))
    }

    /// Never fails: anything that goes wrong yields the default detection.
    pub fn classify(&self, image: &DynamicImage) -> DetectionResult {
        self.try_classify(image).unwrap_or_else(|e| {
            warn!("Heuristic classification failed, using default: {}", e);
            DetectionResult::fallback_default()
        })
    }

    pub fn classify_bytes(&self, bytes: &[u8]) -> DetectionResult {
        match image::load_from_memory(bytes) {
            Ok(image) => self.classify(&image),
            Err(e) => {
                warn!("Could not decode image, using default: {}", e);
                DetectionResult::fallback_default()
            }
        }
    }

    pub fn classify_path(&self, path: &Path) -> DetectionResult {
        match open_image(path) {
            Ok(image) => self.classify(&image),
            Err(e) => {
                warn!("Could not load {:?}, using default: {}", path, e);
                DetectionResult::fallback_default()
            }
        }
    }
}

/// Reads and decodes an image, sniffing the format from its content.
pub fn open_image(path: &Path) -> Result<DynamicImage, ClassifierError> {
    let bytes = std::fs::read(path).map_err(|e| ClassifierError::Read(e, path.to_path_buf()))?;
    Ok(image::load_from_memory(&bytes)?)
}
