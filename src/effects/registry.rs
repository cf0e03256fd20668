use crate::effects::{
    face::{FaceMask, FaceMorphing},
    global::{Glitch, Rainbow},
    hands::HandTracking,
    pose::{
        BackgroundDistortion, Bubble, ColorChange, Deformation, FunFilters, Mirror, Pointillism,
        Wave,
    },
    Effect, EffectId,
};

/// Registry of the built-in effects
///
/// Holds one instance per [`EffectId`], stored in declaration order.
/// Iteration order is the pipeline application order: the registry, not
/// the selection order on the control surface, decides when each effect
/// runs.
pub struct EffectRegistry {
    effects: Vec<Box<dyn Effect>>,
}

impl EffectRegistry {
    /// Create a registry with all built-in effects in application order.
    pub fn new() -> Self {
        let effects: Vec<Box<dyn Effect>> = vec![
            Box::new(Deformation),
            Box::new(Mirror),
            Box::new(ColorChange),
            Box::new(FunFilters),
            Box::new(Bubble),
            Box::new(Wave),
            Box::new(Pointillism),
            Box::new(FaceMorphing),
            Box::new(Rainbow),
            Box::new(Glitch),
            Box::new(HandTracking),
            Box::new(BackgroundDistortion),
            Box::new(FaceMask),
        ];
        Self { effects }
    }

    /// Build a registry from explicit effects, keeping the given order.
    ///
    /// Mainly useful for embedding custom transforms or for tests.
    pub fn with_effects(effects: Vec<Box<dyn Effect>>) -> Self {
        Self { effects }
    }

    /// Iterate the effects in application order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Effect> {
        self.effects.iter().map(|effect| effect.as_ref())
    }

    /// Look up an effect by id.
    pub fn get(&self, id: EffectId) -> Option<&dyn Effect> {
        self.effects
            .iter()
            .find(|effect| effect.id() == id)
            .map(|effect| effect.as_ref())
    }

    /// Number of registered effects.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
