use std::{
    future::Future,
    path::PathBuf,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Instant,
};

use tower::Service;
use tracing::{debug, instrument};

use super::detector::Detector;
use super::types::DetectionReport;
use crate::error::AppError;

/// Classifies image files on the blocking thread pool.
#[derive(Debug, Clone)]
pub struct DetectionService {
    detector: Arc<Detector>,
}

impl DetectionService {
    pub fn new(detector: Arc<Detector>) -> Self {
        Self { detector }
    }
}

impl Service<PathBuf> for DetectionService {
    type Response = DetectionReport;
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), AppError>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, path: PathBuf) -> Self::Future {
        let detector = self.detector.clone();
        Box::pin(detect_file(detector, path))
    }
}

#[instrument(skip(detector))]
async fn detect_file(detector: Arc<Detector>, path: PathBuf) -> Result<DetectionReport, AppError> {
    let start = Instant::now();

    let report = tokio::task::spawn_blocking(move || {
        let (kind, result) = detector.detect_path(&path);
        DetectionReport::new(path, kind, result)
    })
    .await?;

    debug!(
        "Classified in {}us as {:?}",
        start.elapsed().as_micros(),
        report.result.top().map(|d| d.class_name.as_str())
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::types::DetectorKind;
    use image::{ImageBuffer, Rgb};
    use tower::ServiceExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_detection_service() {
        let path = std::env::temp_dir().join(format!("blightscan-{}.png", Uuid::new_v4()));
        ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(40, 40, Rgb([0, 0, 0]))
            .save(&path)
            .unwrap();

        let service = DetectionService::new(Arc::new(Detector::heuristic()));
        let report = service.oneshot(path.clone()).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(report.image_path, path);
        assert_eq!(report.detector, DetectorKind::Heuristic);
        assert_eq!(report.result.detections.len(), 1);
        assert_eq!(report.result.detections[0].class_name, "Late Blight");
    }

    #[tokio::test]
    async fn test_detection_service_missing_file() {
        let mut service = DetectionService::new(Arc::new(Detector::heuristic()));
        let report = service
            .ready()
            .await
            .unwrap()
            .call(PathBuf::from("/nonexistent/leaf.png"))
            .await
            .unwrap();
        assert_eq!(report.result.detections[0].class_name, "Early Blight");
        assert_eq!(report.result.detections[0].confidence, 0.75);
    }
}
