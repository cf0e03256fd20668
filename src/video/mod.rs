//! # Video Module
//!
//! Frame type, capture sources, the recording sink, and the frame loop
//! driver that owns the capture → detect → apply → publish cycle.

pub mod capture;
pub mod loop_driver;
pub mod recorder;
pub mod types;

pub use capture::{CaptureSource, SyntheticCapture};
pub use loop_driver::{FrameEvent, FrameLoop, LoopHandle};
pub use recorder::{FrameSequenceSink, RecordingSink};
pub use types::{Frame, RecordingParams};

#[cfg(feature = "camera")]
pub use capture::CameraCapture;
