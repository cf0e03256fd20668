use serde::{Deserialize, Serialize};

use crate::{
    detect::Detection,
    error::{ConfigError, Result},
    video::Frame,
};

/// Identifiers for the built-in effects.
///
/// Declaration order here IS the pipeline application order: when several
/// effects are active, each runs on the cumulative output of the ones
/// before it, so a fixed order is required for deterministic output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectId {
    Deformation,
    Mirror,
    ColorChange,
    FunFilters,
    Bubble,
    Wave,
    Pointillism,
    FaceMorphing,
    Rainbow,
    Glitch,
    HandTracking,
    BackgroundDistortion,
    FaceMask,
}

impl EffectId {
    /// Number of built-in effects.
    pub const COUNT: usize = 13;

    /// All effects in application order.
    pub const ALL: [EffectId; Self::COUNT] = [
        EffectId::Deformation,
        EffectId::Mirror,
        EffectId::ColorChange,
        EffectId::FunFilters,
        EffectId::Bubble,
        EffectId::Wave,
        EffectId::Pointillism,
        EffectId::FaceMorphing,
        EffectId::Rainbow,
        EffectId::Glitch,
        EffectId::HandTracking,
        EffectId::BackgroundDistortion,
        EffectId::FaceMask,
    ];

    /// Position in the application order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label, as shown on the control surface.
    pub fn label(self) -> &'static str {
        match self {
            EffectId::Deformation => "Deformation",
            EffectId::Mirror => "Mirror",
            EffectId::ColorChange => "Color Change",
            EffectId::FunFilters => "Fun Filters",
            EffectId::Bubble => "Bubble",
            EffectId::Wave => "Wave",
            EffectId::Pointillism => "Pointillism",
            EffectId::FaceMorphing => "Face Morphing",
            EffectId::Rainbow => "Rainbow",
            EffectId::Glitch => "Glitch",
            EffectId::HandTracking => "Hand Tracking",
            EffectId::BackgroundDistortion => "Background Distortion",
            EffectId::FaceMask => "Face Mask",
        }
    }

    /// Parse a command-line style name ("glitch", "face-mask", "face_mask").
    pub fn from_cli_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        let id = match normalized.as_str() {
            "deformation" => EffectId::Deformation,
            "mirror" => EffectId::Mirror,
            "colorchange" => EffectId::ColorChange,
            "funfilters" => EffectId::FunFilters,
            "bubble" => EffectId::Bubble,
            "wave" => EffectId::Wave,
            "pointillism" => EffectId::Pointillism,
            "facemorphing" => EffectId::FaceMorphing,
            "rainbow" => EffectId::Rainbow,
            "glitch" => EffectId::Glitch,
            "handtracking" => EffectId::HandTracking,
            "backgrounddistortion" => EffectId::BackgroundDistortion,
            "facemask" => EffectId::FaceMask,
            _ => return None,
        };
        Some(id)
    }
}

/// Detection channel an effect reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Pose,
    Face,
    Hands,
    /// The effect works on the whole frame without landmarks.
    None,
}

/// Runtime knobs the effects consume.
///
/// Values persist across frames until the control surface changes them;
/// toggling an effect on or off does not touch them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectParams {
    /// Scales the warped region of Deformation (anchor half-size 30 px × this)
    pub deformation_intensity: f32,

    /// Scales the flipped region of Mirror (anchor half-size 100 px × this)
    pub mirror_intensity: u32,

    /// Disc radius, in pixels, of the Pointillism dots
    pub pointillism_size: u32,

    /// Disc radius, in pixels, of the Face Mask dots
    pub facemask_point_size: u32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            deformation_intensity: 1.0,
            mirror_intensity: 1,
            pointillism_size: 2,
            facemask_point_size: 5,
        }
    }
}

impl EffectParams {
    /// Set a knob by the name the control surface uses.
    ///
    /// Unknown (effect, name) pairs are a configuration error; effects
    /// without knobs accept nothing.
    pub fn set(&mut self, effect: EffectId, name: &str, value: f64) -> Result<()> {
        match (effect, name) {
            (EffectId::Deformation, "intensity") => {
                self.deformation_intensity = value as f32;
            }
            (EffectId::Mirror, "intensity") => {
                self.mirror_intensity = value.max(0.0) as u32;
            }
            (EffectId::Pointillism, "size") => {
                self.pointillism_size = value.max(0.0) as u32;
            }
            (EffectId::FaceMask, "point_size") => {
                self.facemask_point_size = value.max(0.0) as u32;
            }
            _ => {
                return Err(ConfigError::UnknownParameter {
                    effect: effect.label().to_string(),
                    name: name.to_string(),
                }
                .into())
            }
        }
        Ok(())
    }
}

/// Core trait every effect implements.
///
/// An effect is a pure frame transform keyed on landmark geometry: no side
/// effects beyond the frame it is handed. If the detection channel it
/// requires is absent for this frame, `apply` must be a no-op; absent
/// landmarks are the expected common case, never a failure.
pub trait Effect: Send + Sync {
    /// The identifier this effect registers under.
    fn id(&self) -> EffectId;

    /// Human-readable name.
    fn name(&self) -> &str {
        self.id().label()
    }

    /// Detection channel this effect requires.
    fn channel(&self) -> Channel;

    /// Apply the effect to a frame.
    ///
    /// The frame is exclusively owned for the duration of the call;
    /// replacement-style effects may swap the buffer wholesale. All
    /// geometry must be clipped to frame bounds before use.
    fn apply(&self, frame: &mut Frame, detection: &Detection, params: &EffectParams)
        -> Result<()>;
}
