//! Whole-frame effects that need no landmarks.

use rand::Rng;

use crate::{
    detect::Detection,
    effects::{color, Channel, Effect, EffectId, EffectParams},
    error::Result,
    video::Frame,
};

/// Hue offset added per application, modulo the 180-step hue range.
const HUE_STEP: u8 = 10;

/// Global hue rotation: every pixel's hue shifts by a constant offset.
pub struct Rainbow;

impl Effect for Rainbow {
    fn id(&self) -> EffectId {
        EffectId::Rainbow
    }

    fn channel(&self) -> Channel {
        Channel::None
    }

    fn apply(&self, frame: &mut Frame, _detection: &Detection, _params: &EffectParams) -> Result<()> {
        let (width, height) = frame.dimensions();
        for y in 0..height {
            for x in 0..width {
                let [r, g, b] = frame.get_pixel(x, y);
                let (h, s, v) = color::rgb_to_hsv(r, g, b);
                let (r, g, b) = color::hsv_to_rgb((h + HUE_STEP) % 180, s, v);
                frame.set_pixel(x, y, [r, g, b]);
            }
        }
        Ok(())
    }
}

/// Height of one independently shifted strip.
const STRIP_ROWS: u32 = 4;

/// Horizontal tear: 4-row strips each circularly shifted by a fresh random
/// offset in [-10, 10).
///
/// Offsets are unseeded and change every frame, so the tear flickers;
/// Wave is the seeded, frame-stable counterpart.
pub struct Glitch;

impl Effect for Glitch {
    fn id(&self) -> EffectId {
        EffectId::Glitch
    }

    fn channel(&self) -> Channel {
        Channel::None
    }

    fn apply(&self, frame: &mut Frame, _detection: &Detection, _params: &EffectParams) -> Result<()> {
        let (width, height) = frame.dimensions();
        if width == 0 {
            return Ok(());
        }
        let source = frame.clone();
        let mut rng = rand::thread_rng();
        let mut strip_top = 0;
        while strip_top < height {
            let shift: i32 = rng.gen_range(-10..10);
            let strip_bottom = (strip_top + STRIP_ROWS).min(height);
            if shift != 0 {
                for y in strip_top..strip_bottom {
                    for x in 0..width {
                        let sx = (x as i32 - shift).rem_euclid(width as i32) as u32;
                        frame.set_pixel(x, y, source.get_pixel(sx, y));
                    }
                }
            }
            strip_top += STRIP_ROWS;
        }
        Ok(())
    }
}
