//! End-to-end checks through the public API.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use blightscan::detection::{DetectionService, Detector, DetectorKind, HeuristicClassifier};
use blightscan::DetectionResult;
use futures::future::join_all;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use tower::{ServiceBuilder, ServiceExt};
use uuid::Uuid;

fn encode(color: [u8; 3], format: ImageFormat) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(
        120,
        90,
        Rgb(color),
    ));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, format).expect("encode image");
    bytes.into_inner()
}

fn write_temp(bytes: &[u8], extension: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("blightscan-it-{}.{}", Uuid::new_v4(), extension));
    std::fs::write(&path, bytes).expect("write temp image");
    path
}

#[test]
fn encoded_images_classify_by_color() {
    let classifier = HeuristicClassifier::new();

    let green = classifier.classify_bytes(&encode([20, 200, 30], ImageFormat::Png));
    assert_eq!(green.detections[0].class_name, "Healthy Potato");

    let brown = classifier.classify_bytes(&encode([150, 100, 40], ImageFormat::Png));
    assert_eq!(brown.detections[0].class_name, "Early Blight");

    let black = classifier.classify_bytes(&encode([0, 0, 0], ImageFormat::Jpeg));
    assert_eq!(black.detections[0].class_name, "Late Blight");
}

#[test]
fn result_document_shape() {
    let result = HeuristicClassifier::new().classify_bytes(&encode([0, 0, 0], ImageFormat::Png));
    let json = serde_json::to_value(&result).unwrap();

    let detection = &json["detections"][0];
    assert_eq!(json["detections"].as_array().unwrap().len(), 1);
    assert!(detection["class_name"].is_string());
    assert!(detection["confidence"].as_f64().unwrap() <= 0.95);
    assert!(detection["description"].is_string());
    assert!(detection["treatment"].is_string());
}

#[test]
fn truncated_file_gives_the_default() {
    let mut bytes = encode([150, 100, 40], ImageFormat::Png);
    bytes.truncate(bytes.len() / 3);
    let path = write_temp(&bytes, "png");

    let result = HeuristicClassifier::new().classify_path(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(result, DetectionResult::fallback_default());
}

#[tokio::test]
async fn service_classifies_a_batch() {
    let paths = vec![
        write_temp(&encode([20, 200, 30], ImageFormat::Png), "png"),
        write_temp(&encode([0, 0, 0], ImageFormat::Png), "png"),
        write_temp(b"definitely not an image", "jpg"),
    ];

    let service = ServiceBuilder::new()
        .concurrency_limit(2)
        .service(DetectionService::new(Arc::new(Detector::heuristic())));

    let reports = join_all(paths.iter().cloned().map(|p| service.clone().oneshot(p))).await;
    for path in &paths {
        std::fs::remove_file(path).unwrap();
    }

    let labels: Vec<String> = reports
        .into_iter()
        .map(|r| {
            let report = r.unwrap();
            assert_eq!(report.detector, DetectorKind::Heuristic);
            report.result.detections[0].class_name.clone()
        })
        .collect();

    assert_eq!(labels, ["Healthy Potato", "Late Blight", "Early Blight"]);
}
