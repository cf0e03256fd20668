//! Effects keyed on face-mesh landmarks.

use crate::{
    detect::Detection,
    effects::{draw, Channel, Effect, EffectId, EffectParams},
    error::Result,
    video::Frame,
};

const GREEN: [u8; 3] = [0, 255, 0];
const BLUE: [u8; 3] = [0, 0, 255];

/// Paint a 3x3 green block at every face landmark.
pub struct FaceMorphing;

impl Effect for FaceMorphing {
    fn id(&self) -> EffectId {
        EffectId::FaceMorphing
    }

    fn channel(&self) -> Channel {
        Channel::Face
    }

    fn apply(&self, frame: &mut Frame, detection: &Detection, _params: &EffectParams) -> Result<()> {
        let Some(landmarks) = detection.face.as_ref() else {
            return Ok(());
        };
        let (width, height) = frame.dimensions();
        for point in landmarks.iter() {
            let (x, y) = point.to_pixel(width, height);
            // Block extends down-right from the landmark pixel
            for dy in 0..3 {
                for dx in 0..3 {
                    draw::put_pixel(frame, x + dx, y + dy, GREEN);
                }
            }
        }
        Ok(())
    }
}

/// Filled blue discs at every face landmark; radius comes from the
/// `point_size` knob.
pub struct FaceMask;

impl Effect for FaceMask {
    fn id(&self) -> EffectId {
        EffectId::FaceMask
    }

    fn channel(&self) -> Channel {
        Channel::Face
    }

    fn apply(&self, frame: &mut Frame, detection: &Detection, params: &EffectParams) -> Result<()> {
        let Some(landmarks) = detection.face.as_ref() else {
            return Ok(());
        };
        let (width, height) = frame.dimensions();
        let radius = params.facemask_point_size as i32;
        for point in landmarks.iter() {
            let (x, y) = point.to_pixel(width, height);
            draw::filled_circle(frame, x, y, radius, BLUE);
        }
        Ok(())
    }
}
