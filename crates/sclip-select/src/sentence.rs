//! Sentence boundary resolution over an ordered segment sequence.
//!
//! Boundaries are detected from terminal punctuation (`.`, `!`, `?`)
//! with a comma fallback once the scan has moved far enough from the
//! anchor index. Both functions are pure and deterministic.

use sclip_models::TimedSegment;

/// How many segments a backward scan may pass before a trailing comma
/// counts as a pause boundary.
const BACKWARD_PAUSE_DISTANCE: usize = 3;

/// How many segments a forward scan may pass before a trailing comma
/// counts as a pause boundary; also the forward default when nothing
/// matches.
const FORWARD_PAUSE_DISTANCE: usize = 5;

fn ends_sentence(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.ends_with('.') || trimmed.ends_with('!') || trimmed.ends_with('?')
}

fn ends_with_pause(text: &str) -> bool {
    text.trim().ends_with(',')
}

/// Find the start of the sentence enclosing `index`. Returns `j <= index`.
///
/// If `index` already begins a sentence (first segment, or the previous
/// segment is blank) it is returned unchanged. Otherwise the scan walks
/// backward until a segment ending a sentence is found and returns the
/// index after it; a trailing comma qualifies once the scan is more than
/// [`BACKWARD_PAUSE_DISTANCE`] segments back. With no match, `index` is
/// returned as-is.
pub fn find_sentence_start(segments: &[TimedSegment], index: usize) -> usize {
    if index == 0 || segments[index - 1].text.trim().is_empty() {
        return index;
    }

    let mut i = index - 1;
    loop {
        let text = &segments[i].text;

        if ends_sentence(text) {
            return i + 1;
        }

        // Pause-based fallback past the look-back window
        if index - i > BACKWARD_PAUSE_DISTANCE && ends_with_pause(text) {
            return i + 1;
        }

        if i == 0 {
            return index;
        }
        i -= 1;
    }
}

/// Find the end of the sentence starting at `index`. Returns `k >= index`.
///
/// Scans forward for the first segment ending a sentence; a trailing
/// comma qualifies once the scan is more than [`FORWARD_PAUSE_DISTANCE`]
/// segments ahead. Reaching the end of the sequence without a match
/// yields `min(index + FORWARD_PAUSE_DISTANCE, last)`.
pub fn find_sentence_end(segments: &[TimedSegment], index: usize) -> usize {
    let mut i = index;
    while i < segments.len() {
        let text = &segments[i].text;

        if ends_sentence(text) {
            return i;
        }

        if i > index + FORWARD_PAUSE_DISTANCE && ends_with_pause(text) {
            return i;
        }

        i += 1;
    }

    (index + FORWARD_PAUSE_DISTANCE).min(segments.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sclip_models::TimedSegment;

    fn words(texts: &[&str]) -> Vec<TimedSegment> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| TimedSegment::new(i as f64, i as f64 + 1.0, *t))
            .collect()
    }

    #[test]
    fn test_start_at_zero_is_unchanged() {
        let segs = words(&["hello", "world."]);
        assert_eq!(find_sentence_start(&segs, 0), 0);
    }

    #[test]
    fn test_start_after_blank_previous_is_unchanged() {
        let segs = words(&["", "hello", "world."]);
        assert_eq!(find_sentence_start(&segs, 1), 1);
    }

    #[test]
    fn test_start_snaps_after_terminal_punctuation() {
        let segs = words(&["one.", "two", "three", "four"]);
        assert_eq!(find_sentence_start(&segs, 3), 1);
    }

    #[test]
    fn test_start_comma_fallback_beyond_lookback() {
        // No terminal punctuation anywhere; the comma is more than three
        // segments back from the anchor.
        let segs = words(&["a,", "b", "c", "d", "e", "f"]);
        assert_eq!(find_sentence_start(&segs, 5), 1);
    }

    #[test]
    fn test_start_comma_ignored_within_lookback() {
        let segs = words(&["a", "b,", "c", "d"]);
        assert_eq!(find_sentence_start(&segs, 3), 3);
    }

    #[test]
    fn test_start_returns_original_with_no_match() {
        let segs = words(&["a", "b", "c", "d"]);
        assert_eq!(find_sentence_start(&segs, 3), 3);
    }

    #[test]
    fn test_start_is_idempotent() {
        let segs = words(&["one.", "two", "three,", "four", "five!", "six", "seven"]);
        for i in 0..segs.len() {
            let once = find_sentence_start(&segs, i);
            assert_eq!(find_sentence_start(&segs, once), once, "index {}", i);
        }
    }

    #[test]
    fn test_end_finds_terminal_punctuation() {
        let segs = words(&["one", "two", "three!"]);
        assert_eq!(find_sentence_end(&segs, 0), 2);
    }

    #[test]
    fn test_end_at_index_with_punctuation() {
        let segs = words(&["done.", "next"]);
        assert_eq!(find_sentence_end(&segs, 0), 0);
    }

    #[test]
    fn test_end_comma_fallback_beyond_lookahead() {
        let segs = words(&["a", "b", "c", "d", "e", "f", "g,", "h", "i"]);
        assert_eq!(find_sentence_end(&segs, 0), 6);
    }

    #[test]
    fn test_end_defaults_when_nothing_matches() {
        let segs = words(&["a", "b", "c"]);
        assert_eq!(find_sentence_end(&segs, 0), 2);

        let segs = words(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        assert_eq!(find_sentence_end(&segs, 0), 5);
    }

    #[test]
    fn test_boundaries_handle_whitespace() {
        let segs = words(&["one. ", "two", " three? "]);
        assert_eq!(find_sentence_start(&segs, 2), 1);
        assert_eq!(find_sentence_end(&segs, 1), 2);
    }
}
