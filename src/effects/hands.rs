//! Effects keyed on hand landmarks.

use crate::{
    detect::Detection,
    effects::{draw, Channel, Effect, EffectId, EffectParams},
    error::Result,
    video::Frame,
};

const GREEN: [u8; 3] = [0, 255, 0];
const MARKER_RADIUS: i32 = 5;

/// Filled green circles at every landmark of each present hand.
///
/// Left and right hands are independent: either one alone is enough.
pub struct HandTracking;

impl Effect for HandTracking {
    fn id(&self) -> EffectId {
        EffectId::HandTracking
    }

    fn channel(&self) -> Channel {
        Channel::Hands
    }

    fn apply(&self, frame: &mut Frame, detection: &Detection, _params: &EffectParams) -> Result<()> {
        let (width, height) = frame.dimensions();
        for hand_set in [detection.left_hand.as_ref(), detection.right_hand.as_ref()]
            .into_iter()
            .flatten()
        {
            for point in hand_set.iter() {
                let (x, y) = point.to_pixel(width, height);
                draw::filled_circle(frame, x, y, MARKER_RADIUS, GREEN);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{Landmark, LandmarkSet};

    #[test]
    fn test_noop_without_hands() {
        let original = Frame::new_filled(32, 32, [10, 20, 30]);
        let mut frame = original.clone();
        HandTracking
            .apply(&mut frame, &Detection::empty(), &EffectParams::default())
            .unwrap();
        assert_eq!(frame, original);
    }

    #[test]
    fn test_each_hand_drawn_independently() {
        let mut frame = Frame::new_black(100, 100);
        let detection = Detection {
            left_hand: Some(LandmarkSet::new(vec![Landmark::new(0.25, 0.25)])),
            right_hand: Some(LandmarkSet::new(vec![Landmark::new(0.75, 0.75)])),
            ..Detection::default()
        };
        HandTracking
            .apply(&mut frame, &detection, &EffectParams::default())
            .unwrap();
        assert_eq!(frame.get_pixel(25, 25), GREEN);
        assert_eq!(frame.get_pixel(75, 75), GREEN);

        // One hand alone still draws
        let mut frame = Frame::new_black(100, 100);
        let detection = Detection {
            right_hand: Some(LandmarkSet::new(vec![Landmark::new(0.75, 0.75)])),
            ..Detection::default()
        };
        HandTracking
            .apply(&mut frame, &detection, &EffectParams::default())
            .unwrap();
        assert_eq!(frame.get_pixel(75, 75), GREEN);
        assert_eq!(frame.get_pixel(25, 25), [0, 0, 0]);
    }
}
