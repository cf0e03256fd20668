//! # Landmark Detection Model
//!
//! Types for per-frame landmark detection results and the seam the actual
//! detector plugs into. The detection model itself is an external
//! collaborator: anything implementing [`LandmarkSource`] can drive the
//! pipeline. Two built-in sources ship with the crate, [`NoopDetector`]
//! (never finds a subject) and [`SimulatedDetector`] (a deterministic
//! stand-in useful for demos and tests).

use crate::video::Frame;

/// Named indices into the 33-point pose topology.
pub mod pose {
    pub const NOSE: usize = 0;
    pub const LEFT_EYE: usize = 2;
    pub const RIGHT_EYE: usize = 5;
    pub const MOUTH_LEFT: usize = 9;
    pub const MOUTH_RIGHT: usize = 10;
    pub const LEFT_WRIST: usize = 15;
    pub const RIGHT_WRIST: usize = 16;
    pub const LEFT_KNEE: usize = 25;
    pub const RIGHT_KNEE: usize = 26;

    /// Number of points in a full pose set.
    pub const COUNT: usize = 33;
}

/// Named indices into the 21-point hand topology.
pub mod hand {
    pub const INDEX_TIP: usize = 8;

    /// Number of points in a full hand set.
    pub const COUNT: usize = 21;
}

/// A normalized landmark point.
///
/// `x` and `y` are fractions of the frame width/height, nominally in
/// [0, 1] but allowed to fall slightly outside it for points the detector
/// extrapolates past the frame edge. `z` is an optional relative depth
/// that the effects do not consume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn with_depth(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Project to pixel coordinates for a frame of the given size.
    ///
    /// Truncates toward zero; callers clip to frame bounds before use.
    pub fn to_pixel(&self, width: u32, height: u32) -> (i32, i32) {
        (
            (self.x * width as f32) as i32,
            (self.y * height as f32) as i32,
        )
    }
}

/// An ordered sequence of landmarks for one detection channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Indexed access; out-of-range indices are absent, not an error.
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<Landmark> for LandmarkSet {
    fn from_iter<I: IntoIterator<Item = Landmark>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// The full detection result for one frame.
///
/// Any channel may be absent; a frame with no detectable subject is the
/// expected common case, not an error. Immutable once produced.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub pose: Option<LandmarkSet>,
    pub face: Option<LandmarkSet>,
    pub left_hand: Option<LandmarkSet>,
    pub right_hand: Option<LandmarkSet>,
}

impl Detection {
    /// A detection with every channel absent.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the given channel has data this frame.
    pub fn provides(&self, channel: crate::effects::Channel) -> bool {
        use crate::effects::Channel;
        match channel {
            Channel::Pose => self.pose.is_some(),
            Channel::Face => self.face.is_some(),
            Channel::Hands => self.left_hand.is_some() || self.right_hand.is_some(),
            Channel::None => true,
        }
    }
}

/// Produces a [`Detection`] for each frame.
///
/// Implementations are synchronous and total: a frame with no detectable
/// subject yields absent channels, never an error. Detectors are owned
/// values constructed at startup and torn down on drop.
pub trait LandmarkSource: Send {
    fn detect(&mut self, frame: &Frame) -> Detection;
}

/// Detector that never finds a subject. Useful when wiring a real model
/// is out of scope but the loop still needs a source.
pub struct NoopDetector;

impl LandmarkSource for NoopDetector {
    fn detect(&mut self, _frame: &Frame) -> Detection {
        Detection::empty()
    }
}

/// Deterministic stand-in detector: a full pose, face ring, and one hand
/// orbiting the frame center. Lets the binary and the tests exercise every
/// effect without a model or a camera subject.
pub struct SimulatedDetector {
    frame_count: u32,
}

impl SimulatedDetector {
    pub fn new() -> Self {
        Self { frame_count: 0 }
    }
}

impl Default for SimulatedDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LandmarkSource for SimulatedDetector {
    fn detect(&mut self, _frame: &Frame) -> Detection {
        self.frame_count = self.frame_count.wrapping_add(1);
        let t = self.frame_count as f32 * 0.05;

        // Full pose set on a slow orbit around the center
        let pose_set: LandmarkSet = (0..pose::COUNT)
            .map(|i| {
                let phase = t + i as f32 * 0.19;
                Landmark::new(0.5 + phase.cos() * 0.25, 0.5 + phase.sin() * 0.25)
            })
            .collect();

        // Face ring around wherever the nose currently is
        let (nose_x, nose_y) = {
            let nose = pose_set.get(pose::NOSE).copied().unwrap_or(Landmark::new(0.5, 0.5));
            (nose.x, nose.y)
        };
        let face_set: LandmarkSet = (0..36)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::TAU / 36.0;
                Landmark::new(nose_x + angle.cos() * 0.08, nose_y + angle.sin() * 0.1)
            })
            .collect();

        // One hand: a small grid of points following the right wrist
        let (wrist_x, wrist_y) = {
            let wrist = pose_set
                .get(pose::RIGHT_WRIST)
                .copied()
                .unwrap_or(Landmark::new(0.5, 0.5));
            (wrist.x, wrist.y)
        };
        let right_hand: LandmarkSet = (0..hand::COUNT)
            .map(|i| {
                let col = (i % 5) as f32;
                let row = (i / 5) as f32;
                Landmark::new(wrist_x + col * 0.015, wrist_y + row * 0.015)
            })
            .collect();

        Detection {
            pose: Some(pose_set),
            face: Some(face_set),
            left_hand: None,
            right_hand: Some(right_hand),
        }
    }
}
