use std::collections::HashSet;

/// Minimum overlap for a complaint to join an existing cluster (inclusive).
pub const CLUSTER_MATCH_THRESHOLD: f64 = 0.30;

/// Jaccard overlap of two keyword lists, compared case-insensitively as sets.
///
/// Returns 0.0 when either side is empty.
pub fn keyword_overlap<A, B>(left: &[A], right: &[B]) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let left: HashSet<String> = left.iter().map(|k| k.as_ref().to_lowercase()).collect();
    let right: HashSet<String> = right.iter().map(|k| k.as_ref().to_lowercase()).collect();

    let union = left.union(&right).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = left.intersection(&right).count();

    intersection as f64 / union as f64
}

pub fn meets_threshold(overlap: f64) -> bool {
    overlap >= CLUSTER_MATCH_THRESHOLD
}
