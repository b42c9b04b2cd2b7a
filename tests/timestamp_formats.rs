//! Format-priority audit for the filename timestamp parser.
//!
//! These tests pin two contracts: every documented format parses to the same
//! UTC epoch, and no two formats in the priority list can match the same
//! real-world filename with different results (the order would otherwise be
//! silently load-bearing).

use framesift::timestamp::{matching_formats, parse_timestamp};

// 2025-02-21 15:46:30 UTC
const EPOCH: f64 = 1740152790.0;

#[test]
fn every_documented_format_parses_to_the_same_epoch() {
    let names = [
        "2025-02-21_15_46_30.jpg",
        "20250221_154630.jpg",
        "2025-02-21 15:46:30.jpg",
        "20250221 154630.jpg",
        "2025-02-21_15-46-30.jpg",
        "20250221-154630.jpg",
        "2025-02-21T15:46:30.jpg",
        "20250221T154630.jpg",
        "20250221154630.jpg",
        "2025-02-21-154630.jpg",
    ];
    for name in names {
        assert_eq!(parse_timestamp(name).unwrap(), EPOCH, "{name}");
    }
}

#[test]
fn underscore_fallback_handles_camera_suffixes() {
    assert_eq!(parse_timestamp("2025-02-21_15_46_30_front.jpg").unwrap(), EPOCH);
    assert_eq!(parse_timestamp("2025-02-21_15_46_30_cam0.png").unwrap(), EPOCH);
}

#[test]
fn rejection_carries_the_filename_verbatim() {
    for name in ["not_a_timestamp.jpg", "IMG_0042.jpeg", "frame.png", ""] {
        let err = parse_timestamp(name).unwrap_err();
        assert_eq!(err.filename, name);
        if !name.is_empty() {
            assert!(err.to_string().contains(name), "{name}");
        }
    }
}

#[test]
fn parsing_twice_is_bitwise_identical() {
    for name in ["20250221154630.jpg", "2025-02-21T15:46:30.jpg"] {
        let first = parse_timestamp(name).unwrap();
        let second = parse_timestamp(name).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }
}

#[test]
fn no_two_formats_disagree_on_a_corpus_filename() {
    // Filenames in the shapes heterogeneous capture tools actually produce.
    let corpus = [
        "2025-02-21_15_46_30.jpg",
        "20250221_154630.jpg",
        "2025-02-21 15:46:30.jpg",
        "20250221 154630.jpg",
        "2025-02-21_15-46-30.jpg",
        "20250221-154630.jpg",
        "2025-02-21T15:46:30.jpg",
        "20250221T154630.jpg",
        "20250221154630.jpg",
        "2025-02-21-154630.jpg",
        "2024-12-31_23_59_59.png",
        "20240101000000.jpeg",
        "1999-01-02T03:04:05.jpg",
    ];
    for name in corpus {
        let matches = matching_formats(name);
        assert!(!matches.is_empty(), "{name} matched no format");
        let (_, first) = matches[0];
        for (format_name, value) in &matches {
            assert_eq!(
                *value, first,
                "{name}: format {format_name} disagrees with {}",
                matches[0].0
            );
        }
    }
}

#[test]
fn midnight_and_leap_day_edge_values() {
    // 2024-02-29 00:00:00 UTC
    assert_eq!(parse_timestamp("20240229_000000.jpg").unwrap(), 1709164800.0);
    // 1970-01-01 00:00:00 UTC
    assert_eq!(parse_timestamp("1970-01-01_00_00_00.jpg").unwrap(), 0.0);
}
