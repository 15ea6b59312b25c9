//! Selected highlight chunks and claimed time intervals.

use serde::{Deserialize, Serialize};

/// A selected highlight window: a contiguous span of segments with a
/// start/end time and a composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Index of the first segment in the window
    pub start_idx: usize,
    /// Index of the last segment in the window (inclusive)
    pub end_idx: usize,
    /// Start time in seconds
    pub start_time: f64,
    /// End time in seconds (may extend past the last segment's end to
    /// absorb trailing silence up to the next spoken word)
    pub end_time: f64,
    /// `end_time - start_time`
    pub duration: f64,
    /// Composite emotional/duration score
    pub score: f64,
}

/// Set of disjoint time intervals already claimed by selected chunks.
///
/// Grows monotonically during selection; private to one job.
#[derive(Debug, Clone, Default)]
pub struct UsedIntervalSet {
    intervals: Vec<(f64, f64)>,
}

impl UsedIntervalSet {
    /// Create an empty interval set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `(start, end)` intersects any claimed interval.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        self.intervals
            .iter()
            .any(|&(used_start, used_end)| start < used_end && end > used_start)
    }

    /// Whether `time` falls inside any claimed interval.
    pub fn contains(&self, time: f64) -> bool {
        self.intervals
            .iter()
            .any(|&(used_start, used_end)| time >= used_start && time < used_end)
    }

    /// Claim an interval. Caller must have checked `overlaps` first.
    pub fn claim(&mut self, start: f64, end: f64) {
        self.intervals.push((start, end));
    }

    /// Number of claimed intervals.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Whether no intervals have been claimed.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlaps() {
        let mut used = UsedIntervalSet::new();
        used.claim(10.0, 20.0);

        assert!(used.overlaps(5.0, 11.0));
        assert!(used.overlaps(15.0, 25.0));
        assert!(used.overlaps(12.0, 18.0));
        assert!(!used.overlaps(0.0, 10.0)); // touching is not overlapping
        assert!(!used.overlaps(20.0, 30.0));
    }

    #[test]
    fn test_contains() {
        let mut used = UsedIntervalSet::new();
        used.claim(10.0, 20.0);

        assert!(used.contains(10.0));
        assert!(used.contains(15.0));
        assert!(!used.contains(20.0)); // half-open at the end
        assert!(!used.contains(5.0));
    }

    #[test]
    fn test_grows_monotonically() {
        let mut used = UsedIntervalSet::new();
        assert!(used.is_empty());
        used.claim(0.0, 5.0);
        used.claim(10.0, 15.0);
        assert_eq!(used.len(), 2);
        assert!(used.overlaps(4.0, 11.0));
    }
}
