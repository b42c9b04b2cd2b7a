//! Capture-timestamp recovery from frame filenames.
//!
//! Heterogeneous capture tools name their exports inconsistently, so the parser
//! tries an ordered priority list of literal datetime formats rather than a
//! general date-guessing heuristic. The list order is a deliberate contract:
//! for ambiguous strings the earliest matching format wins, and the order must
//! not be reshuffled without revisiting `formats_never_disagree` in the tests.
//!
//! Naive datetimes are interpreted as UTC. Host-local interpretation would make
//! the same archive produce different tables on different machines.

use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::FormatError;

/// Primary formats, tried in order against the whole base name.
const PRIMARY_FORMATS: &[(&str, &str)] = &[
    ("dashed-underscore", "%Y-%m-%d_%H_%M_%S"),
    ("compact-underscore", "%Y%m%d_%H%M%S"),
    ("dashed-space", "%Y-%m-%d %H:%M:%S"),
    ("compact-space", "%Y%m%d %H%M%S"),
    ("dashed-hyphen-time", "%Y-%m-%d_%H-%M-%S"),
    ("compact-hyphen", "%Y%m%d-%H%M%S"),
    ("iso8601", "%Y-%m-%dT%H:%M:%S"),
    ("compact-iso8601", "%Y%m%dT%H%M%S"),
    ("compact", "%Y%m%d%H%M%S"),
    ("dashed-compact-time", "%Y-%m-%d-%H%M%S"),
];

/// Fallback formats, tried against a candidate rebuilt from underscore parts.
const FALLBACK_FORMATS: &[(&str, &str)] = &[
    ("dashed-space", "%Y-%m-%d %H:%M:%S"),
    ("compact-space", "%Y%m%d %H%M%S"),
];

/// Parse a capture timestamp (seconds since epoch, UTC) from a frame filename.
///
/// The extension is stripped first; the base name is then matched against
/// `PRIMARY_FORMATS` in order. If none matches and the base name splits on `_`
/// into at least four parts, a `"{p0} {p1}:{p2}:{p3}"` candidate is retried
/// against `FALLBACK_FORMATS` (this is what rescues suffixed names like
/// `2025-02-21_15_46_30_front.jpg`).
pub fn parse_timestamp(filename: &str) -> Result<f64, FormatError> {
    let base_name = strip_extension(filename);

    for (_, format) in PRIMARY_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(base_name, format) {
            return Ok(to_epoch(dt));
        }
    }

    let parts: Vec<&str> = base_name.split('_').collect();
    if parts.len() >= 4 {
        let candidate = format!("{} {}:{}:{}", parts[0], parts[1], parts[2], parts[3]);
        for (_, format) in FALLBACK_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(&candidate, format) {
                return Ok(to_epoch(dt));
            }
        }
    }

    Err(FormatError::new(filename))
}

/// Every format that matches `filename`, with its parsed epoch value.
///
/// Exposed for the ambiguity audit: two formats matching the same real-world
/// name with different results would make the priority order load-bearing in a
/// way nobody intended.
pub fn matching_formats(filename: &str) -> Vec<(&'static str, f64)> {
    let base_name = strip_extension(filename);
    PRIMARY_FORMATS
        .iter()
        .filter_map(|(name, format)| {
            NaiveDateTime::parse_from_str(base_name, format)
                .ok()
                .map(|dt| (*name, to_epoch(dt)))
        })
        .collect()
}

fn strip_extension(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(filename)
}

fn to_epoch(dt: NaiveDateTime) -> f64 {
    dt.and_utc().timestamp() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-02-21 15:46:30 UTC
    const EPOCH: f64 = 1740152790.0;

    #[test]
    fn parses_primary_formats() {
        for name in [
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
        ] {
            assert_eq!(parse_timestamp(name).unwrap(), EPOCH, "{name}");
        }
    }

    #[test]
    fn fallback_rescues_suffixed_names() {
        assert_eq!(
            parse_timestamp("2025-02-21_15_46_30_front.jpg").unwrap(),
            EPOCH
        );
    }

    #[test]
    fn extension_is_ignored() {
        assert_eq!(parse_timestamp("20250221_154630.PNG").unwrap(), EPOCH);
        assert_eq!(parse_timestamp("20250221_154630").unwrap(), EPOCH);
    }

    #[test]
    fn unknown_format_carries_filename_verbatim() {
        let err = parse_timestamp("not_a_timestamp.jpg").unwrap_err();
        assert_eq!(err.filename, "not_a_timestamp.jpg");
        assert!(err.to_string().contains("not_a_timestamp.jpg"));
    }

    #[test]
    fn parsing_is_deterministic() {
        let a = parse_timestamp("2025-02-21_15-46-30.jpg").unwrap();
        let b = parse_timestamp("2025-02-21_15-46-30.jpg").unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
