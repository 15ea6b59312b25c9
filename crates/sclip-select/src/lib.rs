//! Highlight selection core.
//!
//! Pure, single-threaded and allocation-light: given an immutable
//! [`SegmentIndex`](sclip_models::SegmentIndex), this crate snaps window
//! boundaries to sentences, scores candidate windows against a target
//! duration, and greedily picks the best non-overlapping set.

pub mod error;
pub mod scorer;
pub mod selector;
pub mod sentence;

pub use error::{SelectionError, SelectionResult};
pub use scorer::{score_window, SelectionParams};
pub use selector::ChunkSelector;
pub use sentence::{find_sentence_end, find_sentence_start};
