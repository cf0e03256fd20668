//! Effects keyed on pose landmarks: localized geometric transforms around
//! anchor points (eyes, nose, mouth, wrists, knees) plus the two
//! whole-frame pose effects (Pointillism, Background Distortion).

use rand::{rngs::SmallRng, Rng, SeedableRng};

use crate::{
    detect::{pose, Detection},
    effects::{blur, color, draw, Channel, Effect, EffectId, EffectParams},
    error::Result,
    video::Frame,
};

const BLACK: [u8; 3] = [0, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];
const YELLOW: [u8; 3] = [255, 255, 0];

/// Anchors whose surroundings get vertically stretched.
const DEFORMATION_ANCHORS: [usize; 4] = [
    pose::LEFT_EYE,
    pose::RIGHT_EYE,
    pose::LEFT_WRIST,
    pose::RIGHT_WRIST,
];

/// Vertical stretch around eye and wrist anchors.
///
/// Pixels inside a square around each anchor sample the frame closer to
/// the anchor's center line, stretching the content by 1.5x; everything
/// outside the square is untouched.
pub struct Deformation;

impl Effect for Deformation {
    fn id(&self) -> EffectId {
        EffectId::Deformation
    }

    fn channel(&self) -> Channel {
        Channel::Pose
    }

    fn apply(&self, frame: &mut Frame, detection: &Detection, params: &EffectParams) -> Result<()> {
        let Some(landmarks) = detection.pose.as_ref() else {
            return Ok(());
        };
        let half = (30.0 * params.deformation_intensity) as i32;
        if half <= 0 {
            return Ok(());
        }
        let frame_height = frame.height() as i32;
        for index in DEFORMATION_ANCHORS {
            let Some(point) = landmarks.get(index) else {
                continue;
            };
            let (cx, cy) = point.to_pixel(frame.width(), frame.height());
            let Some((left, top, right, bottom)) = draw::clipped_square(frame, cx, cy, half)
            else {
                continue;
            };
            // Later anchors stretch the already-warped result, so each
            // anchor reads its own snapshot.
            let source = frame.clone();
            for py in top..bottom {
                let sample_y = cy as f32 + (py as i32 - cy) as f32 / 1.5;
                let sample_y = (sample_y.round() as i32).clamp(0, frame_height - 1) as u32;
                for px in left..right {
                    frame.set_pixel(px, py, source.get_pixel(px, sample_y));
                }
            }
        }
        Ok(())
    }
}

/// Horizontal flip of a square region around nose and mouth anchors.
pub struct Mirror;

impl Effect for Mirror {
    fn id(&self) -> EffectId {
        EffectId::Mirror
    }

    fn channel(&self) -> Channel {
        Channel::Pose
    }

    fn apply(&self, frame: &mut Frame, detection: &Detection, params: &EffectParams) -> Result<()> {
        let Some(landmarks) = detection.pose.as_ref() else {
            return Ok(());
        };
        let half = 100 * params.mirror_intensity as i32;
        if half <= 0 {
            return Ok(());
        }
        for index in [pose::NOSE, pose::MOUTH_LEFT, pose::MOUTH_RIGHT] {
            let Some(point) = landmarks.get(index) else {
                continue;
            };
            let (cx, cy) = point.to_pixel(frame.width(), frame.height());
            let Some((left, top, right, bottom)) = draw::clipped_square(frame, cx, cy, half)
            else {
                continue;
            };
            for py in top..bottom {
                let (mut lx, mut rx) = (left, right - 1);
                while lx < rx {
                    let a = frame.get_pixel(lx, py);
                    let b = frame.get_pixel(rx, py);
                    frame.set_pixel(lx, py, b);
                    frame.set_pixel(rx, py, a);
                    lx += 1;
                    rx -= 1;
                }
            }
        }
        Ok(())
    }
}

/// Jet-style recoloring of a 30 px square around each wrist.
pub struct ColorChange;

impl Effect for ColorChange {
    fn id(&self) -> EffectId {
        EffectId::ColorChange
    }

    fn channel(&self) -> Channel {
        Channel::Pose
    }

    fn apply(&self, frame: &mut Frame, detection: &Detection, _params: &EffectParams) -> Result<()> {
        let Some(landmarks) = detection.pose.as_ref() else {
            return Ok(());
        };
        for index in [pose::LEFT_WRIST, pose::RIGHT_WRIST] {
            let Some(point) = landmarks.get(index) else {
                continue;
            };
            let (cx, cy) = point.to_pixel(frame.width(), frame.height());
            let Some((left, top, right, bottom)) = draw::clipped_square(frame, cx, cy, 30) else {
                continue;
            };
            for py in top..bottom {
                for px in left..right {
                    let gray = color::luma(frame.get_pixel(px, py));
                    frame.set_pixel(px, py, color::jet(gray));
                }
            }
        }
        Ok(())
    }
}

/// Cartoon sketch: circled eyes, a brow line and two mouth lines.
///
/// Stylistic, not geometry-preserving; the strokes just follow the eye
/// and mouth landmarks.
pub struct FunFilters;

impl Effect for FunFilters {
    fn id(&self) -> EffectId {
        EffectId::FunFilters
    }

    fn channel(&self) -> Channel {
        Channel::Pose
    }

    fn apply(&self, frame: &mut Frame, detection: &Detection, _params: &EffectParams) -> Result<()> {
        let Some(landmarks) = detection.pose.as_ref() else {
            return Ok(());
        };
        let (left_eye, right_eye, mouth_left, mouth_right) = match (
            landmarks.get(pose::LEFT_EYE),
            landmarks.get(pose::RIGHT_EYE),
            landmarks.get(pose::MOUTH_LEFT),
            landmarks.get(pose::MOUTH_RIGHT),
        ) {
            (Some(le), Some(re), Some(ml), Some(mr)) => (le, re, ml, mr),
            _ => return Ok(()),
        };
        let (width, height) = frame.dimensions();
        let (lex, ley) = left_eye.to_pixel(width, height);
        let (rex, rey) = right_eye.to_pixel(width, height);
        let (mlx, mly) = mouth_left.to_pixel(width, height);
        let (mrx, mry) = mouth_right.to_pixel(width, height);

        draw::thick_line(frame, lex - 20, ley, rex + 20, rey, 5, BLACK);
        draw::circle_outline(frame, lex, ley, 30, 5, BLACK);
        draw::circle_outline(frame, rex, rey, 30, 5, BLACK);

        draw::thick_line(frame, mlx, mly + 10, mrx, mry + 10, 10, BLACK);
        draw::thick_line(frame, mlx - 10, mly + 20, mrx + 10, mry + 20, 10, BLACK);
        Ok(())
    }
}

/// Unfilled white circles at eyes, nose and mouth corners.
pub struct Bubble;

impl Effect for Bubble {
    fn id(&self) -> EffectId {
        EffectId::Bubble
    }

    fn channel(&self) -> Channel {
        Channel::Pose
    }

    fn apply(&self, frame: &mut Frame, detection: &Detection, _params: &EffectParams) -> Result<()> {
        let Some(landmarks) = detection.pose.as_ref() else {
            return Ok(());
        };
        for index in [
            pose::LEFT_EYE,
            pose::RIGHT_EYE,
            pose::NOSE,
            pose::MOUTH_LEFT,
            pose::MOUTH_RIGHT,
        ] {
            let Some(point) = landmarks.get(index) else {
                continue;
            };
            let (x, y) = point.to_pixel(frame.width(), frame.height());
            draw::circle_outline(frame, x, y, 30, 3, WHITE);
        }
        Ok(())
    }
}

/// Concentric rings at wrists and knees.
///
/// The ring radii come from a generator seeded with a fixed value per
/// anchor, so the pattern is reproducible across frames and anchors.
/// Glitch is the deliberate opposite: fresh randomness every frame.
pub struct Wave;

impl Effect for Wave {
    fn id(&self) -> EffectId {
        EffectId::Wave
    }

    fn channel(&self) -> Channel {
        Channel::Pose
    }

    fn apply(&self, frame: &mut Frame, detection: &Detection, _params: &EffectParams) -> Result<()> {
        let Some(landmarks) = detection.pose.as_ref() else {
            return Ok(());
        };
        for index in [
            pose::LEFT_WRIST,
            pose::RIGHT_WRIST,
            pose::LEFT_KNEE,
            pose::RIGHT_KNEE,
        ] {
            let Some(point) = landmarks.get(index) else {
                continue;
            };
            let (x, y) = point.to_pixel(frame.width(), frame.height());
            let mut rng = SmallRng::seed_from_u64(42);
            for _ in 0..5 {
                let k: i32 = rng.gen_range(1..6);
                draw::circle_outline(frame, x, y, 30 + k * 5, 2, YELLOW);
            }
        }
        Ok(())
    }
}

/// Replace the frame with dots: a black canvas with one disc per pose
/// landmark, each painted in the source pixel's color.
pub struct Pointillism;

impl Effect for Pointillism {
    fn id(&self) -> EffectId {
        EffectId::Pointillism
    }

    fn channel(&self) -> Channel {
        Channel::Pose
    }

    fn apply(&self, frame: &mut Frame, detection: &Detection, params: &EffectParams) -> Result<()> {
        let Some(landmarks) = detection.pose.as_ref() else {
            return Ok(());
        };
        let (width, height) = frame.dimensions();
        let mut output = Frame::new_black(width, height);
        let radius = params.pointillism_size as i32;
        for point in landmarks.iter() {
            let (x, y) = point.to_pixel(width, height);
            if frame.in_bounds(x, y) {
                let sample = frame.get_pixel(x as u32, y as u32);
                draw::filled_circle(&mut output, x, y, radius, sample);
            }
        }
        *frame = output;
        Ok(())
    }
}

/// Keep the subject sharp, blur everything else.
///
/// The subject mask is the union of 15 px discs at every pose landmark;
/// masked pixels keep the original value, the rest take a heavy Gaussian
/// blur (kernel 99, sigma 30).
pub struct BackgroundDistortion;

const SUBJECT_DISC_RADIUS: i32 = 15;
const BLUR_KERNEL: usize = 99;
const BLUR_SIGMA: f32 = 30.0;

impl Effect for BackgroundDistortion {
    fn id(&self) -> EffectId {
        EffectId::BackgroundDistortion
    }

    fn channel(&self) -> Channel {
        Channel::Pose
    }

    fn apply(&self, frame: &mut Frame, detection: &Detection, _params: &EffectParams) -> Result<()> {
        let Some(landmarks) = detection.pose.as_ref() else {
            return Ok(());
        };
        let (width, height) = frame.dimensions();
        let mask = subject_mask(landmarks.iter().map(|p| p.to_pixel(width, height)), width, height);
        let blurred = blur::gaussian_blur(frame, BLUR_KERNEL, BLUR_SIGMA);
        for y in 0..height {
            for x in 0..width {
                if !mask[(y * width + x) as usize] {
                    frame.set_pixel(x, y, blurred.get_pixel(x, y));
                }
            }
        }
        Ok(())
    }
}

/// Binary mask with a filled disc painted at every anchor.
fn subject_mask(
    anchors: impl Iterator<Item = (i32, i32)>,
    width: u32,
    height: u32,
) -> Vec<bool> {
    let mut mask = vec![false; (width * height) as usize];
    let (w, h) = (width as i32, height as i32);
    for (cx, cy) in anchors {
        for dy in -SUBJECT_DISC_RADIUS..=SUBJECT_DISC_RADIUS {
            for dx in -SUBJECT_DISC_RADIUS..=SUBJECT_DISC_RADIUS {
                if dx * dx + dy * dy <= SUBJECT_DISC_RADIUS * SUBJECT_DISC_RADIUS {
                    let (x, y) = (cx + dx, cy + dy);
                    if x >= 0 && x < w && y >= 0 && y < h {
                        mask[(y * w + x) as usize] = true;
                    }
                }
            }
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{Landmark, LandmarkSet};

    fn gradient_frame(width: u32, height: u32) -> Frame {
        let mut frame = Frame::new_black(width, height);
        for y in 0..height {
            for x in 0..width {
                frame.set_pixel(x, y, [(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
            }
        }
        frame
    }

    /// Pose set with a single landmark placed at the given index.
    fn pose_with(index: usize, landmark: Landmark) -> Detection {
        let mut points = vec![Landmark::new(-1.0, -1.0); pose::COUNT];
        points[index] = landmark;
        Detection {
            pose: Some(LandmarkSet::new(points)),
            ..Detection::default()
        }
    }

    fn full_pose(landmark: Landmark) -> Detection {
        Detection {
            pose: Some(LandmarkSet::new(vec![landmark; pose::COUNT])),
            ..Detection::default()
        }
    }

    #[test]
    fn test_pose_effects_are_noops_without_pose() {
        let original = gradient_frame(64, 48);
        let detection = Detection::empty();
        let params = EffectParams::default();
        let effects: [&dyn Effect; 8] = [
            &Deformation,
            &Mirror,
            &ColorChange,
            &FunFilters,
            &Bubble,
            &Wave,
            &Pointillism,
            &BackgroundDistortion,
        ];
        for effect in effects {
            let mut frame = original.clone();
            effect.apply(&mut frame, &detection, &params).unwrap();
            assert_eq!(frame, original, "{} modified the frame", effect.name());
        }
    }

    #[test]
    fn test_deformation_touches_only_the_anchor_square() {
        let original = gradient_frame(200, 200);
        let mut frame = original.clone();
        let detection = pose_with(pose::LEFT_EYE, Landmark::new(0.5, 0.5));
        Deformation
            .apply(&mut frame, &detection, &EffectParams::default())
            .unwrap();
        // Center row of the square samples itself, but rows away from the
        // center are pulled toward it
        assert_ne!(frame.get_pixel(100, 75), original.get_pixel(100, 75));
        // Outside the 30 px square nothing changes
        assert_eq!(frame.get_pixel(100, 140), original.get_pixel(100, 140));
        assert_eq!(frame.get_pixel(20, 20), original.get_pixel(20, 20));
    }

    #[test]
    fn test_deformation_clips_at_frame_edge() {
        let mut frame = gradient_frame(64, 64);
        let detection = pose_with(pose::RIGHT_WRIST, Landmark::new(0.0, 0.0));
        // Must not panic with the square hanging off the top-left corner
        Deformation
            .apply(&mut frame, &detection, &EffectParams::default())
            .unwrap();
    }

    #[test]
    fn test_mirror_flips_region_horizontally() {
        let original = gradient_frame(400, 300);
        let mut frame = original.clone();
        let detection = pose_with(pose::NOSE, Landmark::new(0.5, 0.5));
        Mirror
            .apply(&mut frame, &detection, &EffectParams::default())
            .unwrap();
        // Region is x in [100, 300): leftmost column now holds the old
        // rightmost column of the region
        assert_eq!(frame.get_pixel(100, 150), original.get_pixel(299, 150));
        assert_eq!(frame.get_pixel(299, 150), original.get_pixel(100, 150));
        // Applying twice restores the original
        Mirror
            .apply(&mut frame, &detection, &EffectParams::default())
            .unwrap();
        assert_eq!(frame, original);
    }

    #[test]
    fn test_color_change_recolors_wrist_square() {
        let original = gradient_frame(200, 200);
        let mut frame = original.clone();
        let detection = pose_with(pose::LEFT_WRIST, Landmark::new(0.5, 0.5));
        ColorChange
            .apply(&mut frame, &detection, &EffectParams::default())
            .unwrap();
        let expected = color::jet(color::luma(original.get_pixel(100, 100)));
        assert_eq!(frame.get_pixel(100, 100), expected);
        // Outside the square untouched
        assert_eq!(frame.get_pixel(150, 100), original.get_pixel(150, 100));
    }

    #[test]
    fn test_wave_is_reproducible_across_frames() {
        let detection = pose_with(pose::LEFT_WRIST, Landmark::new(0.5, 0.5));
        let params = EffectParams::default();
        let mut first = gradient_frame(300, 300);
        let mut second = gradient_frame(300, 300);
        Wave.apply(&mut first, &detection, &params).unwrap();
        Wave.apply(&mut second, &detection, &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pointillism_output_black_outside_discs() {
        let mut frame = gradient_frame(100, 100);
        let source = frame.clone();
        let detection = full_pose(Landmark::new(0.5, 0.5));
        let params = EffectParams::default();
        Pointillism.apply(&mut frame, &detection, &params).unwrap();

        assert_eq!(frame.dimensions(), source.dimensions());
        let radius = params.pointillism_size as i32;
        for y in 0..100i32 {
            for x in 0..100i32 {
                let inside = (x - 50).pow(2) + (y - 50).pow(2) <= radius * radius;
                let pixel = frame.get_pixel(x as u32, y as u32);
                if inside {
                    assert_eq!(pixel, source.get_pixel(50, 50));
                } else {
                    assert_eq!(pixel, [0, 0, 0], "non-black pixel outside discs at {x},{y}");
                }
            }
        }
    }

    #[test]
    fn test_pointillism_skips_out_of_frame_landmarks() {
        let mut frame = gradient_frame(50, 50);
        let detection = full_pose(Landmark::new(1.5, 1.5));
        Pointillism
            .apply(&mut frame, &detection, &EffectParams::default())
            .unwrap();
        // Every landmark was outside: output is fully black
        for y in 0..50 {
            for x in 0..50 {
                assert_eq!(frame.get_pixel(x, y), [0, 0, 0]);
            }
        }
    }

    #[test]
    fn test_background_distortion_masks_subject_exactly() {
        let source = gradient_frame(80, 60);
        let mut frame = source.clone();
        let detection = full_pose(Landmark::new(0.5, 0.5));
        BackgroundDistortion
            .apply(&mut frame, &detection, &EffectParams::default())
            .unwrap();

        let blurred = blur::gaussian_blur(&source, BLUR_KERNEL, BLUR_SIGMA);
        let (cx, cy) = (40i32, 30i32);
        for y in 0..60i32 {
            for x in 0..80i32 {
                let inside = (x - cx).pow(2) + (y - cy).pow(2)
                    <= SUBJECT_DISC_RADIUS * SUBJECT_DISC_RADIUS;
                let pixel = frame.get_pixel(x as u32, y as u32);
                if inside {
                    assert_eq!(pixel, source.get_pixel(x as u32, y as u32));
                } else {
                    assert_eq!(pixel, blurred.get_pixel(x as u32, y as u32));
                }
            }
        }
    }
}
