//! Timed transcript segments and the ordered segment index.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A timestamped span of transcript text, word- or sentence-level.
///
/// Produced by the external transcriber (text only) or classifier
/// (label + score attached). Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedSegment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
    /// Spoken text for this span
    pub text: String,
    /// Emotion label, if classified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Classifier confidence, if classified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl TimedSegment {
    /// Create an unclassified segment.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            label: None,
            score: None,
        }
    }

    /// Create a classified segment with an emotion label and score.
    pub fn classified(
        start: f64,
        end: f64,
        text: impl Into<String>,
        label: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            label: Some(label.into()),
            score: Some(score),
        }
    }

    /// Duration of this segment in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Emotion score, treating unclassified segments as zero.
    pub fn score_or_zero(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

/// Error constructing a segment index.
#[derive(Debug, Error)]
pub enum SegmentIndexError {
    #[error("segment {index} starts at {start}s before previous segment ends at {previous_end}s")]
    Overlapping {
        index: usize,
        start: f64,
        previous_end: f64,
    },

    #[error("segment {index} has non-positive span ({start}s..{end}s)")]
    InvalidSpan { index: usize, start: f64, end: f64 },
}

/// Immutable, time-ordered view over annotated segments.
///
/// Validates ordering on construction: segments must be non-overlapping
/// with non-decreasing start times. Lifetime is one processing job.
#[derive(Debug, Clone)]
pub struct SegmentIndex {
    segments: Vec<TimedSegment>,
}

impl SegmentIndex {
    /// Build an index from segments, validating time ordering.
    pub fn new(segments: Vec<TimedSegment>) -> Result<Self, SegmentIndexError> {
        for (i, seg) in segments.iter().enumerate() {
            if seg.end < seg.start {
                return Err(SegmentIndexError::InvalidSpan {
                    index: i,
                    start: seg.start,
                    end: seg.end,
                });
            }
            if i > 0 {
                let prev_end = segments[i - 1].end;
                // Word timestamps can touch but never run backwards.
                if seg.start < prev_end - 1e-6 {
                    return Err(SegmentIndexError::Overlapping {
                        index: i,
                        start: seg.start,
                        previous_end: prev_end,
                    });
                }
            }
        }
        Ok(Self { segments })
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment at a linear index.
    pub fn get(&self, index: usize) -> Option<&TimedSegment> {
        self.segments.get(index)
    }

    /// All segments as a slice.
    pub fn as_slice(&self) -> &[TimedSegment] {
        &self.segments
    }

    /// Index of the first segment whose end time is at or after `time`.
    ///
    /// Binary search over the ordered starts; returns `None` when every
    /// segment finishes before `time`.
    pub fn first_at_or_after(&self, time: f64) -> Option<usize> {
        let mut lo = 0usize;
        let mut hi = self.segments.len();
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.segments[mid].end < time {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        (lo < self.segments.len()).then_some(lo)
    }

    /// Iterate over all segments.
    pub fn iter(&self) -> std::slice::Iter<'_, TimedSegment> {
        self.segments.iter()
    }
}

impl std::ops::Index<usize> for SegmentIndex {
    type Output = TimedSegment;

    fn index(&self, index: usize) -> &TimedSegment {
        &self.segments[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(start: f64, end: f64, text: &str) -> TimedSegment {
        TimedSegment::new(start, end, text)
    }

    #[test]
    fn test_index_accepts_ordered_segments() {
        let idx = SegmentIndex::new(vec![
            word(0.0, 1.0, "hello"),
            word(1.0, 2.0, "world"),
            word(2.5, 3.0, "again"),
        ])
        .unwrap();
        assert_eq!(idx.len(), 3);
        assert_eq!(idx[1].text, "world");
    }

    #[test]
    fn test_index_rejects_overlapping_segments() {
        let result = SegmentIndex::new(vec![word(0.0, 2.0, "a"), word(1.0, 3.0, "b")]);
        assert!(matches!(
            result,
            Err(SegmentIndexError::Overlapping { index: 1, .. })
        ));
    }

    #[test]
    fn test_index_rejects_backwards_span() {
        let result = SegmentIndex::new(vec![word(2.0, 1.0, "a")]);
        assert!(matches!(result, Err(SegmentIndexError::InvalidSpan { .. })));
    }

    #[test]
    fn test_first_at_or_after() {
        let idx = SegmentIndex::new(vec![
            word(0.0, 1.0, "a"),
            word(1.0, 2.0, "b"),
            word(4.0, 5.0, "c"),
        ])
        .unwrap();
        assert_eq!(idx.first_at_or_after(0.0), Some(0));
        assert_eq!(idx.first_at_or_after(1.5), Some(1));
        assert_eq!(idx.first_at_or_after(3.0), Some(2));
        assert_eq!(idx.first_at_or_after(6.0), None);
    }

    #[test]
    fn test_score_or_zero() {
        let seg = TimedSegment::classified(0.0, 1.0, "hi", "joy", 0.9);
        assert_eq!(seg.score_or_zero(), 0.9);
        assert_eq!(word(0.0, 1.0, "hi").score_or_zero(), 0.0);
    }
}
