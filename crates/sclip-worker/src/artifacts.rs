//! Content-addressed intermediate artifacts.
//!
//! Audio, transcript and emotion files are keyed by the SHA-256 of the
//! source video so a re-run of the same file reuses whatever stages
//! already completed.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::WorkerResult;

/// Paths of the per-video intermediate artifacts inside the work dir.
#[derive(Debug, Clone)]
pub struct JobArtifacts {
    pub audio: PathBuf,
    pub transcript: PathBuf,
    pub emotions: PathBuf,
    work_dir: PathBuf,
    hash: String,
}

impl JobArtifacts {
    /// Derive artifact paths for a video hash.
    pub fn new(work_dir: impl AsRef<Path>, hash: &str) -> Self {
        let work_dir = work_dir.as_ref().to_path_buf();
        Self {
            audio: work_dir.join(format!("{hash}_audio.mp3")),
            transcript: work_dir.join(format!("{hash}_transcript.txt")),
            emotions: work_dir.join(format!("{hash}_emotions.txt")),
            work_dir,
            hash: hash.to_string(),
        }
    }

    /// Path for the rendered (not yet subtitled) clip of chunk `n`.
    pub fn clip(&self, n: usize) -> PathBuf {
        self.work_dir.join(format!("{}_clip_{}.mp4", self.hash, n))
    }

    /// Path for the SRT file of chunk `n`.
    pub fn srt(&self, n: usize) -> PathBuf {
        self.work_dir.join(format!("{}_subtitles_{}.srt", self.hash, n))
    }

    /// Path for the subtitled clip of chunk `n`.
    pub fn subtitled_clip(&self, n: usize) -> PathBuf {
        self.work_dir
            .join(format!("{}_clip_{}_subtitled.mp4", self.hash, n))
    }

    /// Delete every artifact belonging to this job that exists.
    pub async fn cleanup(&self, clip_count: usize) {
        let mut paths = vec![
            self.audio.clone(),
            self.transcript.clone(),
            self.emotions.clone(),
        ];
        for n in 0..clip_count {
            paths.push(self.clip(n));
            paths.push(self.srt(n));
            paths.push(self.subtitled_clip(n));
        }
        for path in paths {
            if tokio::fs::remove_file(&path).await.is_ok() {
                debug!(path = %path.display(), "removed intermediate artifact");
            }
        }
    }
}

/// SHA-256 of a file's contents, hex-encoded.
pub async fn file_sha256(path: impl AsRef<Path>) -> WorkerResult<String> {
    let path = path.as_ref().to_path_buf();
    let digest = tokio::task::spawn_blocking(move || -> std::io::Result<String> {
        let mut file = std::fs::File::open(&path)?;
        let mut hasher = Sha256::new();
        std::io::copy(&mut file, &mut hasher)?;
        Ok(format!("{:x}", hasher.finalize()))
    })
    .await
    .map_err(|e| std::io::Error::other(e.to_string()))??;
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_sha256() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data");
        tokio::fs::write(&path, b"hello").await.unwrap();

        let digest = file_sha256(&path).await.unwrap();
        assert_eq!(
            digest,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_artifact_paths_share_hash_prefix() {
        let artifacts = JobArtifacts::new("/tmp/work", "abc123");
        assert_eq!(artifacts.audio, PathBuf::from("/tmp/work/abc123_audio.mp3"));
        assert!(artifacts.clip(0).to_string_lossy().contains("abc123_clip_0"));
        assert!(artifacts
            .subtitled_clip(2)
            .to_string_lossy()
            .ends_with("abc123_clip_2_subtitled.mp4"));
    }
}
