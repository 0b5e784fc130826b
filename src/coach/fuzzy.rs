// ABOUTME: Name normalization and normalized edit distance for entity matching
// ABOUTME: Distance 0 means identical and 1 means nothing in common
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

/// Trim and collapse internal whitespace, substituting `fallback` when blank
#[must_use]
pub fn normalize_name(raw: Option<&str>, fallback: &str) -> String {
    let collapsed = raw
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    if collapsed.is_empty() {
        fallback.to_owned()
    } else {
        collapsed
    }
}

/// Case-insensitive normalized Levenshtein distance in [0, 1]
#[must_use]
pub fn name_distance(a: &str, b: &str) -> f64 {
    1.0 - strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Closest candidate within `threshold`
///
/// Ties keep the earliest candidate.
pub fn best_match<'a, T, I>(target: &str, candidates: I, threshold: f64) -> Option<(T, f64)>
where
    I: IntoIterator<Item = (&'a str, T)>,
{
    let mut best: Option<(T, f64)> = None;
    for (name, value) in candidates {
        let distance = name_distance(target, name);
        if distance > threshold {
            continue;
        }
        if best.as_ref().is_none_or(|(_, d)| distance < *d) {
            best = Some((value, distance));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name(Some("  Push   Day "), "x"), "Push Day");
        assert_eq!(normalize_name(Some("   "), "Workout"), "Workout");
        assert_eq!(normalize_name(None, "General Workout"), "General Workout");
    }

    #[test]
    fn test_distance_bounds() {
        assert!(name_distance("Bench", "bench").abs() < f64::EPSILON);
        assert!((name_distance("abc", "xyz") - 1.0).abs() < f64::EPSILON);
        assert!(name_distance("Fll Super A", "Full Super A") < 0.3);
        assert!(name_distance("arm day", "leg day") > 0.3);
    }

    #[test]
    fn test_best_match_prefers_closest_then_earliest() {
        let candidates = [("Push Day", 1), ("Pull Day", 2), ("Push Dayy", 3)];
        let found = best_match("Push Da", candidates, 0.3);
        assert_eq!(found.map(|(v, _)| v), Some(1));
        assert!(best_match("Cardio", candidates, 0.3).is_none());
    }
}
