//! Keyframe similarity scoring using dynamic time warping
//!
//! Compares a live keypoint set against a stored template keyframe. DTW
//! absorbs small ordering wobble between the two point sequences while
//! staying deterministic for identical inputs.

use crate::landmarks::Landmark;

/// Compute the DTW distance between two keypoint sequences.
///
/// Full dynamic programming table with per-point Euclidean cost. The
/// sequences are short and fixed-size, so the quadratic table stays tiny.
/// Identical sequences score 0.
#[hotpath::measure]
pub fn dtw_distance(a: &[Landmark], b: &[Landmark]) -> f32 {
    let mut dp = vec![vec![f32::INFINITY; b.len() + 1]; a.len() + 1];
    dp[0][0] = 0.0;

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let cost = a[i - 1].distance(&b[j - 1]);
            let best = dp[i - 1][j].min(dp[i][j - 1]).min(dp[i - 1][j - 1]);
            dp[i][j] = cost + best;
        }
    }
    dp[a.len()][b.len()]
}

/// Thresholded keyframe matcher, shared by every session
#[derive(Debug, Clone, Copy)]
pub struct StageMatcher {
    threshold: f32,
}

impl StageMatcher {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Score a candidate against a template keyframe.
    ///
    /// Returns `None` when the shapes disagree (different point counts or
    /// an empty side). A mismatched candidate can never match, but it is
    /// not an error either.
    pub fn score(&self, candidate: &[Landmark], template: &[Landmark]) -> Option<f32> {
        if candidate.is_empty() || candidate.len() != template.len() {
            return None;
        }
        Some(dtw_distance(candidate, template))
    }

    /// Strictly-below-threshold match check
    pub fn is_match(&self, candidate: &[Landmark], template: &[Landmark]) -> bool {
        match self.score(candidate, template) {
            Some(distance) => distance < self.threshold,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(coords: &[(f32, f32, f32)]) -> Vec<Landmark> {
        coords
            .iter()
            .map(|&(x, y, z)| Landmark::new(x, y, z))
            .collect()
    }

    #[test]
    fn test_identical_sequences_score_zero() {
        let a = points(&[(0.0, 0.0, 0.0), (1.0, 2.0, 3.0), (4.0, 5.0, 6.0)]);
        assert_eq!(dtw_distance(&a, &a), 0.0);
    }

    #[test]
    fn test_known_distance() {
        let a = points(&[(0.0, 0.0, 0.0)]);
        let b = points(&[(1.0, 0.0, 0.0)]);
        assert_eq!(dtw_distance(&a, &b), 1.0);

        let c = points(&[(0.0, 3.0, 4.0)]);
        assert_eq!(dtw_distance(&a, &c), 5.0);
    }

    #[test]
    fn test_symmetry() {
        let a = points(&[(0.0, 0.0, 0.0), (1.0, 1.0, 0.0), (2.0, 0.0, 0.0)]);
        let b = points(&[(0.5, 0.0, 0.0), (1.5, 1.0, 0.0), (2.5, 0.0, 0.0)]);
        assert_eq!(dtw_distance(&a, &b), dtw_distance(&b, &a));
    }

    #[test]
    fn test_warping_absorbs_repeats() {
        // A repeated point warps onto a single point at no extra cost.
        let a = points(&[(0.0, 0.0, 0.0), (0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]);
        let b = points(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]);
        assert_eq!(dtw_distance(&a, &b), 0.0);
    }

    #[test]
    fn test_shape_mismatch_never_matches() {
        let matcher = StageMatcher::new(1_000.0);
        let a = points(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]);
        let b = points(&[(0.0, 0.0, 0.0)]);

        assert_eq!(matcher.score(&a, &b), None);
        assert!(!matcher.is_match(&a, &b));
        assert!(!matcher.is_match(&[], &b));
    }

    #[test]
    fn test_threshold_is_strict() {
        let a = points(&[(0.0, 0.0, 0.0)]);
        let b = points(&[(1.0, 0.0, 0.0)]);

        // Distance is exactly 1.0; a threshold of 1.0 must not match.
        assert!(!StageMatcher::new(1.0).is_match(&a, &b));
        assert!(StageMatcher::new(1.01).is_match(&a, &b));
    }
}
