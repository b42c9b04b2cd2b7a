//! End-to-end batch detector runs over temporary frame directories.

use std::path::Path;

use image::{Rgb, RgbImage};
use tempfile::TempDir;

use framesift::batch::BatchProcessor;
use framesift::{read_npy, FrameDetector, StubBackend, RESULTS_FILE_NAME};

fn write_frame(dir: &Path, name: &str) {
    RgbImage::from_pixel(64, 64, Rgb([30, 60, 90]))
        .save(dir.join(name))
        .unwrap();
}

fn build_processor(root: &Path, backend: StubBackend, classes: &[&str]) -> BatchProcessor {
    let classes: Vec<String> = classes.iter().map(|s| s.to_string()).collect();
    let detector = FrameDetector::new(
        Box::new(backend),
        &classes,
        root.join("scratch"),
        root.join("detections"),
    )
    .unwrap();
    BatchProcessor::new(detector)
}

#[test]
fn car_only_frame_yields_the_documented_row() {
    let root = TempDir::new().unwrap();
    let image_dir = root.path().join("converted");
    std::fs::create_dir(&image_dir).unwrap();
    write_frame(&image_dir, "2025-02-21_15-46-30.jpg");

    let backend = StubBackend::new().with_detections("2025-02-21_15-46-30", &["car"]);
    let mut processor = build_processor(root.path(), backend, &["truck", "car"]);
    let summary = processor.run(&image_dir).unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.table_path, image_dir.join(RESULTS_FILE_NAME));

    let table = read_npy(&summary.table_path).unwrap();
    assert_eq!(table.dim(), (1, 3));
    // 2025-02-21 15:46:30 UTC, catalog order [truck, car]
    assert_eq!(table[[0, 0]], 1740152790.0);
    assert_eq!(table[[0, 1]], 0.0);
    assert_eq!(table[[0, 2]], 1.0);

    // Annotated artifact relocated under the original filename.
    assert!(root
        .path()
        .join("detections/2025-02-21_15-46-30.jpg")
        .exists());
}

#[test]
fn unparseable_filenames_are_skipped_not_fatal() {
    let root = TempDir::new().unwrap();
    let image_dir = root.path().join("converted");
    std::fs::create_dir(&image_dir).unwrap();
    write_frame(&image_dir, "2025-02-21_15-46-30.jpg");
    write_frame(&image_dir, "not_a_timestamp.jpg");

    let mut processor = build_processor(root.path(), StubBackend::new(), &["truck", "car"]);
    let summary = processor.run(&image_dir).unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 1);

    let table = read_npy(&summary.table_path).unwrap();
    assert_eq!(table.dim(), (1, 3));
    // The skipped frame never reached the detector, so no artifact either.
    assert!(!root.path().join("detections/not_a_timestamp.jpg").exists());
}

#[test]
fn identical_classes_different_timestamps_give_distinct_rows() {
    let root = TempDir::new().unwrap();
    let image_dir = root.path().join("converted");
    std::fs::create_dir(&image_dir).unwrap();
    write_frame(&image_dir, "2025-02-21_15-46-30.jpg");
    write_frame(&image_dir, "2025-02-21_15-46-31.jpg");

    let backend = StubBackend::new()
        .with_detections("2025-02-21_15-46-30", &["truck"])
        .with_detections("2025-02-21_15-46-31", &["truck"]);
    let mut processor = build_processor(root.path(), backend, &["truck", "car"]);
    let summary = processor.run(&image_dir).unwrap();

    assert_eq!(summary.processed, 2);
    let table = read_npy(&summary.table_path).unwrap();
    assert_eq!(table.dim(), (2, 3));
    // Filename order, distinct timestamp column, identical presence bits.
    assert_eq!(table[[0, 0]], 1740152790.0);
    assert_eq!(table[[1, 0]], 1740152791.0);
    for row in 0..2 {
        assert_eq!(table[[row, 1]], 1.0);
        assert_eq!(table[[row, 2]], 0.0);
    }
}

#[test]
fn empty_directory_writes_a_zero_row_table() {
    let root = TempDir::new().unwrap();
    let image_dir = root.path().join("converted");
    std::fs::create_dir(&image_dir).unwrap();
    std::fs::write(image_dir.join("notes.txt"), "no frames here").unwrap();

    let mut processor = build_processor(root.path(), StubBackend::new(), &["truck", "car"]);
    let summary = processor.run(&image_dir).unwrap();

    assert_eq!(summary.processed, 0);
    assert_eq!(summary.skipped, 0);
    let table = read_npy(&summary.table_path).unwrap();
    assert_eq!(table.dim(), (0, 3));
}

#[test]
fn rerunning_an_unchanged_directory_is_idempotent() {
    let root = TempDir::new().unwrap();
    let image_dir = root.path().join("converted");
    std::fs::create_dir(&image_dir).unwrap();
    write_frame(&image_dir, "20250221_154630.jpg");
    write_frame(&image_dir, "20250221_154631.jpg");

    let script = || {
        StubBackend::new()
            .with_detections("20250221_154630", &["car", "truck"])
            .with_detections("20250221_154631", &["car"])
    };

    let mut first = build_processor(root.path(), script(), &["truck", "car"]);
    let path = first.run(&image_dir).unwrap().table_path;
    let first_bytes = std::fs::read(&path).unwrap();

    // The results table written into the image dir is not a recognized frame
    // extension, so the second run must not pick it up.
    let mut second = build_processor(root.path(), script(), &["truck", "car"]);
    let second_path = second.run(&image_dir).unwrap().table_path;
    let second_bytes = std::fs::read(&second_path).unwrap();

    assert_eq!(path, second_path);
    assert_eq!(first_bytes, second_bytes);
}

#[test]
fn case_insensitive_extensions_are_processed() {
    let root = TempDir::new().unwrap();
    let image_dir = root.path().join("converted");
    std::fs::create_dir(&image_dir).unwrap();
    RgbImage::from_pixel(32, 32, Rgb([10, 10, 10]))
        .save_with_format(image_dir.join("20250221_154630.PNG"), image::ImageFormat::Png)
        .unwrap();

    let mut processor = build_processor(root.path(), StubBackend::new(), &["car"]);
    let summary = processor.run(&image_dir).unwrap();

    assert_eq!(summary.processed, 1);
    let table = read_npy(&summary.table_path).unwrap();
    assert_eq!(table.dim(), (1, 2));
    assert_eq!(table[[0, 1]], 0.0);
}
