//! Shared data models for the sclip pipeline.
//!
//! This crate provides the job-scoped value types consumed by the
//! selection and reframing engines:
//! - Timed transcript/emotion segments and the ordered `SegmentIndex`
//! - Selected highlight `Chunk`s and the `UsedIntervalSet`
//! - Crop rectangles and face samples
//! - Persisted transcript/emotion record formats

pub mod chunk;
pub mod records;
pub mod rect;
pub mod segment;

// Re-export common types
pub use chunk::{Chunk, UsedIntervalSet};
pub use records::{
    parse_emotion_records, parse_transcript, write_emotion_records, write_transcript, RecordError,
};
pub use rect::{CropRect, FaceSample};
pub use segment::{SegmentIndex, SegmentIndexError, TimedSegment};
