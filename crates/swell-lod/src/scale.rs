//! Viewer-altitude scale selection.
//!
//! The ocean's horizontal scale follows the viewer's height above sea level
//! so the finest slice always has useful detail. Altitude maps through a
//! configurable clamp onto a power-of-two ladder; the fractional log2
//! position crossfades the two adjacent bands.

/// Bounds of the horizontal scale ladder.
#[derive(Clone, Copy, Debug)]
pub struct ScaleRange {
    /// Smallest allowed scale; altitude below this stays at the bottom band.
    pub min_scale: f32,
    /// Largest allowed scale; altitude above this stays at the top band.
    pub max_scale: f32,
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self {
            min_scale: 8.0,
            max_scale: 256.0,
        }
    }
}

/// Result of a scale selection for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleSelection {
    /// Power-of-two horizontal scale.
    pub scale: f32,
    /// Fractional position between this band and the next, in `[0, 1)`.
    /// Used to fade detail bands so scale changes do not pop.
    pub level_alpha: f32,
}

impl ScaleRange {
    /// Select the scale band for a viewer at `altitude` above sea level.
    pub fn select(&self, altitude: f32) -> ScaleSelection {
        let clamped = altitude.abs().clamp(self.min_scale, self.max_scale);
        let l2 = clamped.log2();
        let l2f = l2.floor();
        ScaleSelection {
            scale: l2f.exp2(),
            level_alpha: l2 - l2f,
        }
    }

    /// Whether a further altitude increase can still push the scale up.
    pub fn could_increase(&self, current_scale: f32) -> bool {
        current_scale * 2.0 <= self.max_scale
    }

    /// Whether a further altitude decrease can still pull the scale down.
    pub fn could_decrease(&self, current_scale: f32) -> bool {
        current_scale * 0.5 >= self.min_scale
    }
}
