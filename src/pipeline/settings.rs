use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    effects::{EffectId, EffectParams},
    error::Result,
};

/// Per-effect enable flags
///
/// Fixed-size so toggling an effect never allocates: parameters and flags
/// live for the whole session, only their values change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveEffects {
    enabled: [bool; EffectId::COUNT],
}

impl ActiveEffects {
    /// No effects enabled.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: EffectId, on: bool) {
        self.enabled[id.index()] = on;
    }

    pub fn contains(&self, id: EffectId) -> bool {
        self.enabled[id.index()]
    }

    pub fn is_empty(&self) -> bool {
        !self.enabled.iter().any(|&on| on)
    }

    /// Enabled ids in application order.
    pub fn iter(&self) -> impl Iterator<Item = EffectId> + '_ {
        EffectId::ALL.into_iter().filter(|id| self.contains(*id))
    }
}

/// Everything the pipeline reads for one frame
///
/// The loop worker takes one snapshot per iteration, so a toggle or a
/// slider change is never observed half-applied within a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineSettings {
    /// Which effects run this frame
    pub active: ActiveEffects,

    /// Effect knobs
    pub params: EffectParams,

    /// Brightness offset for the final tone stage, [-127, 127]
    pub brightness: i32,

    /// Contrast amount for the final tone stage, [-127, 127]
    pub contrast: i32,

    /// Whether the freehand drawing overlay is active
    pub drawing: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            active: ActiveEffects::none(),
            params: EffectParams::default(),
            brightness: 0,
            contrast: 0,
            drawing: false,
        }
    }
}

/// Shared, lock-guarded pipeline settings
///
/// Written by the control surface, read (snapshotted) once per frame by
/// the loop worker. The two actors are uncoordinated, so every mutation
/// goes through the lock; no field is ever observable half-written.
#[derive(Clone, Default)]
pub struct SharedSettings {
    inner: Arc<RwLock<PipelineSettings>>,
}

impl SharedSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy out the current settings for one frame iteration.
    pub fn snapshot(&self) -> PipelineSettings {
        *self.inner.read()
    }

    pub fn set_effect_enabled(&self, id: EffectId, on: bool) {
        self.inner.write().active.set(id, on);
    }

    /// Set an effect knob by name; unknown names are a configuration error.
    pub fn set_parameter(&self, id: EffectId, name: &str, value: f64) -> Result<()> {
        self.inner.write().params.set(id, name, value)
    }

    pub fn set_brightness(&self, brightness: i32) {
        self.inner.write().brightness = brightness.clamp(-127, 127);
    }

    pub fn set_contrast(&self, contrast: i32) {
        self.inner.write().contrast = contrast.clamp(-127, 127);
    }

    pub fn set_drawing(&self, on: bool) {
        self.inner.write().drawing = on;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_set_iterates_in_application_order() {
        let mut active = ActiveEffects::none();
        // Enable out of declaration order
        active.set(EffectId::FaceMask, true);
        active.set(EffectId::Deformation, true);
        active.set(EffectId::Rainbow, true);

        let order: Vec<EffectId> = active.iter().collect();
        assert_eq!(
            order,
            vec![EffectId::Deformation, EffectId::Rainbow, EffectId::FaceMask]
        );
    }

    #[test]
    fn test_toggle_preserves_params() {
        let settings = SharedSettings::new();
        settings
            .set_parameter(EffectId::Pointillism, "size", 8.0)
            .unwrap();

        settings.set_effect_enabled(EffectId::Pointillism, true);
        settings.set_effect_enabled(EffectId::Pointillism, false);
        settings.set_effect_enabled(EffectId::Pointillism, true);

        let snapshot = settings.snapshot();
        assert!(snapshot.active.contains(EffectId::Pointillism));
        assert_eq!(snapshot.params.pointillism_size, 8);
    }

    #[test]
    fn test_tone_values_clamped() {
        let settings = SharedSettings::new();
        settings.set_brightness(500);
        settings.set_contrast(-500);
        let snapshot = settings.snapshot();
        assert_eq!(snapshot.brightness, 127);
        assert_eq!(snapshot.contrast, -127);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let settings = SharedSettings::new();
        let before = settings.snapshot();
        settings.set_effect_enabled(EffectId::Glitch, true);
        // The earlier snapshot is unaffected by later writes
        assert!(!before.active.contains(EffectId::Glitch));
        assert!(settings.snapshot().active.contains(EffectId::Glitch));
    }
}
