use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::{RecordingError, Result},
    video::{Frame, RecordingParams},
};

/// Sink that persists processed frames
///
/// A sink is exclusively owned by the loop worker while recording. `close`
/// is idempotent: only the first call flushes, later calls are no-ops, and
/// dropping an unclosed sink closes it.
pub trait RecordingSink: Send {
    /// Append one frame.
    fn write(&mut self, frame: &Frame) -> Result<()>;

    /// Flush and close. Safe to call more than once.
    fn close(&mut self) -> Result<()>;

    /// Whether the sink has been closed.
    fn is_closed(&self) -> bool;
}

#[derive(Serialize)]
struct Manifest<'a> {
    fps: f64,
    width: u32,
    height: u32,
    started_at: &'a str,
    frames: u64,
}

/// Numbered-PNG sequence recording
///
/// Writes `frame_000000.png`, `frame_000001.png`, … into a directory and
/// finishes with a `recording.toml` manifest carrying the playback rate,
/// frame size and count. Container encoding is left to external tooling.
pub struct FrameSequenceSink {
    dir: PathBuf,
    params: RecordingParams,
    started_at: String,
    frames_written: u64,
    closed: bool,
}

impl FrameSequenceSink {
    /// Open a sink rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>, params: RecordingParams) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| RecordingError::OpenFailed {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        info!("Recording to {:?} at {:.1} fps", dir, params.fps);
        Ok(Self {
            dir,
            params,
            started_at: chrono::Local::now().to_rfc3339(),
            frames_written: 0,
            closed: false,
        })
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl RecordingSink for FrameSequenceSink {
    fn write(&mut self, frame: &Frame) -> Result<()> {
        if self.closed {
            return Err(RecordingError::Closed.into());
        }
        let path = self.dir.join(format!("frame_{:06}.png", self.frames_written));
        frame.save_png(&path).map_err(|e| RecordingError::WriteFailed {
            reason: e.to_string(),
        })?;
        self.frames_written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let manifest = Manifest {
            fps: self.params.fps,
            width: self.params.resolution.0,
            height: self.params.resolution.1,
            started_at: &self.started_at,
            frames: self.frames_written,
        };
        let content = toml::to_string_pretty(&manifest).map_err(|e| {
            RecordingError::WriteFailed {
                reason: e.to_string(),
            }
        })?;
        std::fs::write(self.dir.join("recording.toml"), content)?;
        debug!(
            "Recording closed: {} frames in {:?}",
            self.frames_written, self.dir
        );
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for FrameSequenceSink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_and_close() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("take1");
        let mut sink = FrameSequenceSink::open(&target, RecordingParams::default()).unwrap();

        let frame = Frame::new_filled(16, 8, [1, 2, 3]);
        sink.write(&frame).unwrap();
        sink.write(&frame).unwrap();
        sink.close().unwrap();

        assert!(target.join("frame_000000.png").exists());
        assert!(target.join("frame_000001.png").exists());
        let manifest = std::fs::read_to_string(target.join("recording.toml")).unwrap();
        assert!(manifest.contains("frames = 2"));
        assert!(manifest.contains("fps = 20.0"));
    }

    #[test]
    fn test_close_is_idempotent() {
        let dir = tempdir().unwrap();
        let mut sink =
            FrameSequenceSink::open(dir.path().join("take2"), RecordingParams::default()).unwrap();
        sink.close().unwrap();
        assert!(sink.is_closed());
        // Second close is a no-op, not an error
        sink.close().unwrap();
    }

    #[test]
    fn test_write_after_close_fails() {
        let dir = tempdir().unwrap();
        let mut sink =
            FrameSequenceSink::open(dir.path().join("take3"), RecordingParams::default()).unwrap();
        sink.close().unwrap();
        let frame = Frame::new_black(4, 4);
        assert!(sink.write(&frame).is_err());
    }

    #[test]
    fn test_open_fails_on_unwritable_path() {
        // A file standing where the directory should go
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        assert!(FrameSequenceSink::open(&blocker, RecordingParams::default()).is_err());
    }
}
