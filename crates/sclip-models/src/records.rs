//! Persisted transcript and emotion record formats.
//!
//! Two line-oriented formats survive between pipeline stages:
//! - Transcript: `[<start> - <end>] <text>`, one segment per line
//! - Emotion: `<start> - <end> - <label> - <score> - <text>`
//!
//! A non-conforming line is rejected rather than skipped: silently
//! dropping a line would desynchronize emotion labels from transcript
//! text downstream.

use thiserror::Error;

use crate::segment::TimedSegment;

/// Error parsing a persisted transcript/emotion record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed transcript record at line {line}: {content:?}")]
    MalformedTranscript { line: usize, content: String },

    #[error("malformed emotion record at line {line}: {content:?}")]
    MalformedEmotion { line: usize, content: String },
}

impl RecordError {
    fn transcript(line: usize, content: &str) -> Self {
        Self::MalformedTranscript {
            line,
            content: content.to_string(),
        }
    }

    fn emotion(line: usize, content: &str) -> Self {
        Self::MalformedEmotion {
            line,
            content: content.to_string(),
        }
    }
}

/// Parse transcript records from `[<start> - <end>] <text>` lines.
///
/// Empty lines are ignored; any other non-conforming line fails with the
/// 1-based line number.
pub fn parse_transcript(content: &str) -> Result<Vec<TimedSegment>, RecordError> {
    let mut segments = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }

        let rest = line
            .strip_prefix('[')
            .ok_or_else(|| RecordError::transcript(line_no, line))?;
        let (timestamp, text) = rest
            .split_once(']')
            .ok_or_else(|| RecordError::transcript(line_no, line))?;
        let (start, end) = timestamp
            .split_once(" - ")
            .ok_or_else(|| RecordError::transcript(line_no, line))?;

        let start: f64 = start
            .trim()
            .parse()
            .map_err(|_| RecordError::transcript(line_no, line))?;
        let end: f64 = end
            .trim()
            .parse()
            .map_err(|_| RecordError::transcript(line_no, line))?;

        segments.push(TimedSegment::new(start, end, text.trim()));
    }

    Ok(segments)
}

/// Serialize segments to the transcript line format.
pub fn write_transcript(segments: &[TimedSegment]) -> String {
    let mut out = String::new();
    for seg in segments {
        out.push_str(&format!("[{:.3} - {:.3}] {}\n", seg.start, seg.end, seg.text));
    }
    out
}

/// Parse emotion records from `<start> - <end> - <label> - <score> - <text>` lines.
///
/// The first four ` - ` separators delimit the numeric/label fields; the
/// remainder is the text verbatim, so spoken dashes survive a round-trip.
pub fn parse_emotion_records(content: &str) -> Result<Vec<TimedSegment>, RecordError> {
    let mut records = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line_no = i + 1;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.splitn(5, " - ");
        let start = fields
            .next()
            .ok_or_else(|| RecordError::emotion(line_no, line))?;
        let end = fields
            .next()
            .ok_or_else(|| RecordError::emotion(line_no, line))?;
        let label = fields
            .next()
            .ok_or_else(|| RecordError::emotion(line_no, line))?;
        let score = fields
            .next()
            .ok_or_else(|| RecordError::emotion(line_no, line))?;
        let text = fields
            .next()
            .ok_or_else(|| RecordError::emotion(line_no, line))?;

        let start: f64 = start
            .trim()
            .parse()
            .map_err(|_| RecordError::emotion(line_no, line))?;
        let end: f64 = end
            .trim()
            .parse()
            .map_err(|_| RecordError::emotion(line_no, line))?;
        let score: f64 = score
            .trim()
            .parse()
            .map_err(|_| RecordError::emotion(line_no, line))?;

        records.push(TimedSegment::classified(start, end, text, label.trim(), score));
    }

    Ok(records)
}

/// Serialize classified segments to the emotion record line format.
pub fn write_emotion_records(records: &[TimedSegment]) -> String {
    let mut out = String::new();
    for rec in records {
        out.push_str(&format!(
            "{} - {} - {} - {} - {}\n",
            rec.start,
            rec.end,
            rec.label.as_deref().unwrap_or("neutral"),
            rec.score.unwrap_or(0.0),
            rec.text
        ));
    }
    out
}
