//! # Motion-FX
//!
//! Real-time landmark-driven video effects with a composable per-frame
//! pipeline.
//!
//! Frames flow through a fixed cycle on a dedicated worker: capture →
//! landmark detection → effect pipeline → overlay → recording → publish.
//! The control surface toggles effects and turns knobs through a shared,
//! lock-guarded settings handle without ever blocking the loop.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use motion_fx::{
//!     config::Config,
//!     detect::SimulatedDetector,
//!     effects::EffectId,
//!     video::{FrameEvent, FrameLoop, SyntheticCapture},
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let mut frame_loop = FrameLoop::spawn(
//!     Box::new(SyntheticCapture::new(640, 480)),
//!     Box::new(SimulatedDetector::new()),
//!     config.recording.params.clone(),
//!     config.overlay.clone(),
//! )?;
//!
//! let handle = frame_loop.handle();
//! handle.set_effect_enabled(EffectId::Glitch, true);
//! handle.set_parameter(EffectId::Pointillism, "size", 4.0)?;
//!
//! while let Ok(event) = frame_loop.events().recv() {
//!     if let FrameEvent::Frame(frame) = event {
//!         // hand the frame to the presentation layer
//!         let _ = frame;
//!         break;
//!     }
//! }
//! frame_loop.stop();
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`effects`] - The effect transforms and the registry fixing their order
//! - [`pipeline`] - Per-frame orchestration and shared settings
//! - [`video`] - Frame type, capture sources, recording, the loop driver
//! - [`detect`] - Landmark types and the detector seam
//! - [`config`] - Configuration management
//!
//! ## Adding Custom Effects
//!
//! Custom transforms implement the [`Effect`](effects::Effect) trait and
//! slot into an explicit registry:
//!
//! ```rust,no_run
//! use motion_fx::detect::Detection;
//! use motion_fx::effects::{Channel, Effect, EffectId, EffectParams};
//! use motion_fx::video::Frame;
//! use motion_fx::error::Result;
//!
//! struct Invert;
//!
//! impl Effect for Invert {
//!     fn id(&self) -> EffectId {
//!         EffectId::ColorChange
//!     }
//!
//!     fn channel(&self) -> Channel {
//!         Channel::None
//!     }
//!
//!     fn apply(&self, frame: &mut Frame, _: &Detection, _: &EffectParams) -> Result<()> {
//!         for pixel in frame.as_image_mut().pixels_mut() {
//!             for channel in pixel.0.iter_mut() {
//!                 *channel = 255 - *channel;
//!             }
//!         }
//!         Ok(())
//!     }
//! }
//! ```

pub mod config;
pub mod detect;
pub mod effects;
pub mod error;
pub mod pipeline;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    effects::{Effect, EffectId, EffectParams, EffectRegistry},
    error::{FxError, Result},
    pipeline::{EffectPipeline, PipelineSettings, SharedSettings},
    video::{Frame, FrameEvent, FrameLoop, LoopHandle},
};
