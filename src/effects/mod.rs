//! # Effect System
//!
//! The per-frame transforms and the registry that fixes their application
//! order. Each effect is a pure function of (frame, detection, params):
//! it mutates the frame it is handed (or replaces it wholesale) and does
//! nothing else. Effects whose detection channel is absent for a frame are
//! silent no-ops.
//!
//! ## Built-in effects, in application order
//!
//! Deformation, Mirror, Color Change, Fun Filters, Bubble, Wave,
//! Pointillism, Face Morphing, Rainbow, Glitch, Hand Tracking,
//! Background Distortion, Face Mask.
//!
//! ## Usage
//!
//! ```rust
//! use motion_fx::effects::{EffectId, EffectRegistry, EffectParams};
//! use motion_fx::detect::Detection;
//! use motion_fx::video::Frame;
//!
//! let registry = EffectRegistry::new();
//! let glitch = registry.get(EffectId::Glitch).unwrap();
//!
//! let mut frame = Frame::new_black(640, 480);
//! glitch.apply(&mut frame, &Detection::empty(), &EffectParams::default()).unwrap();
//! ```

pub mod blur;
pub mod color;
pub mod draw;
pub mod registry;
pub mod traits;

// Effect implementations, grouped by the detection channel they read
pub mod face;
pub mod global;
pub mod hands;
pub mod pose;

// Re-exports for convenience
pub use registry::EffectRegistry;
pub use traits::{Channel, Effect, EffectId, EffectParams};

pub use face::{FaceMask, FaceMorphing};
pub use global::{Glitch, Rainbow};
pub use hands::HandTracking;
pub use pose::{
    BackgroundDistortion, Bubble, ColorChange, Deformation, FunFilters, Mirror, Pointillism, Wave,
};
