//! Candidate window scoring.

use sclip_models::TimedSegment;

use crate::error::{SelectionError, SelectionResult};

/// Tunable parameters for highlight selection.
#[derive(Debug, Clone, Copy)]
pub struct SelectionParams {
    /// Ideal clip duration in seconds
    pub target_duration: f64,
    /// Shortest acceptable clip in seconds
    pub min_duration: f64,
    /// Longest acceptable clip in seconds
    pub max_duration: f64,
    /// Weight of the normalized emotional score
    pub emotional_weight: f64,
    /// Weight of the duration-closeness score
    pub duration_weight: f64,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            target_duration: 59.0,
            min_duration: 25.0,
            max_duration: 59.0,
            emotional_weight: 0.7,
            duration_weight: 0.3,
        }
    }
}

impl SelectionParams {
    /// Validate parameter consistency.
    pub fn validate(&self) -> SelectionResult<()> {
        if self.min_duration <= 0.0 {
            return Err(SelectionError::InvalidParams(format!(
                "min_duration must be positive, got {}",
                self.min_duration
            )));
        }
        if self.min_duration > self.max_duration {
            return Err(SelectionError::InvalidParams(format!(
                "min_duration {} exceeds max_duration {}",
                self.min_duration, self.max_duration
            )));
        }
        if self.target_duration < self.min_duration || self.target_duration > self.max_duration {
            return Err(SelectionError::InvalidParams(format!(
                "target_duration {} outside [{}, {}]",
                self.target_duration, self.min_duration, self.max_duration
            )));
        }
        Ok(())
    }

    /// Whether `duration` lies within the acceptable bounds.
    pub fn duration_in_bounds(&self, duration: f64) -> bool {
        duration >= self.min_duration && duration <= self.max_duration
    }
}

/// Score a candidate window covering `segments[start_idx..=end_idx]` with
/// an adjusted (silence-buffered) duration.
///
/// The emotional term is the per-segment mean of classifier scores; the
/// duration term is `1.0` at the target and decreases linearly with the
/// deviation. Returns `None` when the duration is out of bounds — such a
/// candidate is excluded rather than ranked.
pub fn score_window(
    segments: &[TimedSegment],
    start_idx: usize,
    end_idx: usize,
    adjusted_duration: f64,
    params: &SelectionParams,
) -> Option<f64> {
    if !params.duration_in_bounds(adjusted_duration) {
        return None;
    }

    let emotional_sum: f64 = segments[start_idx..=end_idx]
        .iter()
        .map(|s| s.score_or_zero())
        .sum();
    let normalized_emotional = emotional_sum / (end_idx - start_idx + 1) as f64;

    let duration_score =
        1.0 - (params.target_duration - adjusted_duration).abs() / params.target_duration;

    Some(params.emotional_weight * normalized_emotional + params.duration_weight * duration_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified(start: f64, end: f64, score: f64) -> TimedSegment {
        TimedSegment::classified(start, end, "text", "sadness", score)
    }

    #[test]
    fn test_default_params_valid() {
        SelectionParams::default().validate().unwrap();
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = SelectionParams {
            min_duration: 60.0,
            max_duration: 59.0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(SelectionError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_out_of_bounds_duration_excluded() {
        let segs = vec![classified(0.0, 10.0, 0.9)];
        let params = SelectionParams::default();
        assert!(score_window(&segs, 0, 0, 10.0, &params).is_none());
        assert!(score_window(&segs, 0, 0, 60.0, &params).is_none());
    }

    #[test]
    fn test_target_duration_scores_full_duration_term() {
        let segs = vec![classified(0.0, 59.0, 1.0)];
        let params = SelectionParams::default();
        let score = score_window(&segs, 0, 0, 59.0, &params).unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_emotional_term_is_normalized() {
        let segs = vec![
            classified(0.0, 10.0, 0.9),
            classified(10.0, 20.0, 0.3),
            classified(20.0, 30.0, 0.6),
        ];
        let params = SelectionParams::default();
        let score = score_window(&segs, 0, 2, 30.0, &params).unwrap();

        let expected_emotional = (0.9 + 0.3 + 0.6) / 3.0;
        let expected_duration = 1.0 - (59.0 - 30.0) / 59.0;
        let expected = 0.7 * expected_emotional + 0.3 * expected_duration;
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_unclassified_segments_score_zero() {
        let segs = vec![TimedSegment::new(0.0, 30.0, "text")];
        let params = SelectionParams::default();
        let score = score_window(&segs, 0, 0, 30.0, &params).unwrap();
        let expected = 0.3 * (1.0 - 29.0 / 59.0);
        assert!((score - expected).abs() < 1e-9);
    }
}
