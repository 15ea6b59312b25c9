//! Greedy selection of non-overlapping highlight windows.

use std::cmp::Ordering;

use tokio::sync::watch;
use tracing::debug;

use sclip_models::{Chunk, SegmentIndex, UsedIntervalSet};

use crate::error::{SelectionError, SelectionResult};
use crate::scorer::{score_window, SelectionParams};
use crate::sentence::{find_sentence_end, find_sentence_start};

/// Enumerates candidate windows anchored at each segment start, snaps them
/// to sentence boundaries, scores them, and greedily picks the best
/// non-overlapping set.
#[derive(Debug, Clone)]
pub struct ChunkSelector {
    params: SelectionParams,
}

impl ChunkSelector {
    /// Create a selector with validated parameters.
    pub fn new(params: SelectionParams) -> SelectionResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Selection parameters in use.
    pub fn params(&self) -> &SelectionParams {
        &self.params
    }

    /// Select the full set of mutually non-overlapping chunks, ordered by
    /// descending score. Callers truncate to top-N as desired.
    ///
    /// Returns [`SelectionError::NoSuitableSegment`] when no window ever
    /// satisfies the duration bounds.
    pub fn select(&self, index: &SegmentIndex) -> SelectionResult<Vec<Chunk>> {
        self.select_inner(index, None)
    }

    /// Like [`select`](Self::select), but stops accepting further chunks
    /// once `cancel` flips to true, returning whatever was already chosen.
    /// Selection is pure, so a cancelled job is restartable from scratch.
    pub fn select_with_cancel(
        &self,
        index: &SegmentIndex,
        cancel: &watch::Receiver<bool>,
    ) -> SelectionResult<Vec<Chunk>> {
        self.select_inner(index, Some(cancel))
    }

    fn select_inner(
        &self,
        index: &SegmentIndex,
        cancel: Option<&watch::Receiver<bool>>,
    ) -> SelectionResult<Vec<Chunk>> {
        let mut used = UsedIntervalSet::new();
        let candidates = self.collect_candidates(index, &used);
        if candidates.is_empty() {
            return Err(SelectionError::NoSuitableSegment);
        }

        let mut chunks = Vec::new();
        for candidate in candidates {
            if cancel.is_some_and(|rx| *rx.borrow()) {
                debug!(
                    accepted = chunks.len(),
                    "selection cancelled, returning chunks accepted so far"
                );
                break;
            }
            if !used.overlaps(candidate.start_time, candidate.end_time) {
                used.claim(candidate.start_time, candidate.end_time);
                chunks.push(candidate);
            }
        }

        debug!(chunks = chunks.len(), "selected highlight chunks");
        Ok(chunks)
    }

    /// Enumerate and score all candidate windows, sorted by descending
    /// score with earlier start time breaking ties.
    fn collect_candidates(&self, index: &SegmentIndex, used: &UsedIntervalSet) -> Vec<Chunk> {
        let segments = index.as_slice();
        let params = &self.params;
        let mut candidates = Vec::new();

        for s in 0..segments.len() {
            if used.contains(segments[s].start) {
                continue;
            }

            // Snap the anchor to the enclosing sentence start.
            let start_idx = find_sentence_start(segments, s);
            let start_time = segments[start_idx].start;

            let mut e = start_idx;
            while e < segments.len() {
                let current_duration = segments[e].end - start_time;
                if current_duration > params.max_duration {
                    break;
                }

                if params.duration_in_bounds(current_duration) {
                    let end_idx = find_sentence_end(segments, e).min(segments.len() - 1);

                    // Absorb trailing silence up to the next spoken word,
                    // as long as that keeps the window within bounds.
                    let end_time = match segments.get(end_idx + 1) {
                        Some(next) if next.start - start_time <= params.max_duration => next.start,
                        _ => segments[end_idx].end,
                    };

                    let adjusted_duration = end_time - start_time;
                    if params.duration_in_bounds(adjusted_duration)
                        && !used.overlaps(start_time, end_time)
                    {
                        if let Some(score) =
                            score_window(segments, start_idx, end_idx, adjusted_duration, params)
                        {
                            candidates.push(Chunk {
                                start_idx,
                                end_idx,
                                start_time,
                                end_time,
                                duration: adjusted_duration,
                                score,
                            });
                        }
                    }

                    // Continue growing from the snapped sentence end.
                    e = end_idx;
                }

                e += 1;
            }
        }

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| {
                    a.start_time
                        .partial_cmp(&b.start_time)
                        .unwrap_or(Ordering::Equal)
                })
        });

        debug!(candidates = candidates.len(), "scored candidate windows");
        candidates
    }
}
