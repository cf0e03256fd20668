use tracing::warn;

use crate::{
    detect::Detection,
    effects::EffectRegistry,
    pipeline::PipelineSettings,
    video::Frame,
};

/// The per-frame effect pipeline
///
/// Threads a frame through every active effect in registry (declaration)
/// order, so each effect sees the cumulative result of the ones before it,
/// then applies the brightness/contrast stage unconditionally.
pub struct EffectPipeline {
    registry: EffectRegistry,
}

impl EffectPipeline {
    /// Create a pipeline over the built-in registry.
    pub fn new() -> Self {
        Self {
            registry: EffectRegistry::new(),
        }
    }

    /// Create a pipeline over an explicit registry.
    pub fn with_registry(registry: EffectRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    /// Apply all active effects, then the tone stage.
    ///
    /// An effect that fails is logged and its changes discarded: the
    /// frame rolls back to the last good state and the remaining effects
    /// still run. Nothing here can abort the frame loop.
    pub fn process(&self, frame: &mut Frame, detection: &Detection, settings: &PipelineSettings) {
        for effect in self.registry.iter() {
            if !settings.active.contains(effect.id()) {
                continue;
            }
            if !detection.provides(effect.channel()) {
                // Absent landmarks are the expected common case
                continue;
            }
            let backup = frame.clone();
            if let Err(error) = effect.apply(frame, detection, &settings.params) {
                warn!("Effect '{}' failed ({}); frame restored", effect.name(), error);
                *frame = backup;
            }
        }
        apply_tone(frame, settings.brightness, settings.contrast);
    }
}

impl Default for EffectPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Brightness/contrast remap, the unconditional final pipeline stage.
///
/// Both corrections are linear `out = in * alpha + gamma` passes, clipped
/// to the valid pixel range; brightness runs before contrast.
pub fn apply_tone(frame: &mut Frame, brightness: i32, contrast: i32) {
    if brightness != 0 {
        let shadow = if brightness > 0 { brightness } else { 0 };
        let highlight = if brightness > 0 { 255 } else { 255 + brightness };
        let alpha = (highlight - shadow) as f32 / 255.0;
        remap(frame, alpha, shadow as f32);
    }
    if contrast != 0 {
        let contrast = contrast as f32;
        let factor = 131.0 * (contrast + 127.0) / (127.0 * (131.0 - contrast));
        remap(frame, factor, 127.0 * (1.0 - factor));
    }
}

fn remap(frame: &mut Frame, alpha: f32, gamma: f32) {
    for pixel in frame.as_image_mut().pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = (*channel as f32 * alpha + gamma).round().clamp(0.0, 255.0) as u8;
        }
    }
}
