//! Input registration: external contributors that draw into simulation layers.
//!
//! Gameplay systems register inputs (wave shapes, depth probes, foam
//! whiteners) against a quantity. Contributors are sorted by
//! `(batch index, wavelength)` when they are drawn, not when they register,
//! because enablement can change between the two.

use rustc_hash::FxHashMap;

use crate::arena::Layer;
use crate::channel::SimQuantity;
use swell_lod::RenderData;

/// Identifies one registration. Returned by [`Registrar::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InputId(u64);

/// Mutable view of one slice's layer while an input draws into it.
pub struct LayerView<'a> {
    layer: &'a mut Layer,
    render_data: RenderData,
    weight: f32,
}

impl<'a> LayerView<'a> {
    /// Wrap a layer for drawing at `weight`.
    pub fn new(layer: &'a mut Layer, render_data: RenderData, weight: f32) -> Self {
        Self {
            layer,
            render_data,
            weight,
        }
    }

    /// Side length in texels.
    pub fn resolution(&self) -> u32 {
        self.layer.resolution()
    }

    /// Channels per texel.
    pub fn channels(&self) -> u32 {
        self.layer.channels()
    }

    /// Placement of the slice being drawn into.
    pub fn render_data(&self) -> &RenderData {
        &self.render_data
    }

    /// Add `value`, scaled by the view's blend weight, to channel `c` of
    /// texel `(x, y)`.
    pub fn add(&mut self, x: u32, y: u32, c: u32, value: f32) {
        let current = self.layer.texel(x, y, c);
        self.layer.set_texel(x, y, c, current + value * self.weight);
    }

    /// Replace channel `c` of texel `(x, y)`, crossfaded by the blend weight.
    pub fn blend(&mut self, x: u32, y: u32, c: u32, value: f32) {
        let current = self.layer.texel(x, y, c);
        let mixed = current + (value - current) * self.weight;
        self.layer.set_texel(x, y, c, mixed);
    }

    /// Texel coordinates of a world position, if it falls inside the slice.
    pub fn world_to_texel(&self, world_x: f32, world_z: f32) -> Option<(u32, u32)> {
        let res = self.layer.resolution() as f32;
        let tw = self.render_data.texel_width;
        if tw <= 0.0 {
            return None;
        }
        let half = res * tw * 0.5;
        let x = (world_x - self.render_data.pos_snapped.x + half) / tw;
        let y = (world_z - self.render_data.pos_snapped.y + half) / tw;
        if x < 0.0 || y < 0.0 || x >= res || y >= res {
            return None;
        }
        Some((x as u32, y as u32))
    }
}

/// A contributor that draws into a quantity's layers each tick.
pub trait LodInput {
    /// Draw into one slice.
    fn draw(&self, view: &mut LayerView<'_>);

    /// Longest wavelength this input contributes. Used for draw ordering.
    fn wavelength(&self) -> f32 {
        0.0
    }

    /// Disabled inputs stay registered but are skipped at draw time.
    fn enabled(&self) -> bool {
        true
    }
}

struct Registration {
    id: InputId,
    batch_idx: i32,
    input: Box<dyn LodInput>,
}

/// Holds every registered input, grouped by quantity.
#[derive(Default)]
pub struct Registrar {
    inputs: FxHashMap<SimQuantity, Vec<Registration>>,
    next_id: u64,
}

impl Registrar {
    /// Create an empty registrar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an input against a quantity.
    pub fn register(
        &mut self,
        quantity: SimQuantity,
        batch_idx: i32,
        input: Box<dyn LodInput>,
    ) -> InputId {
        let id = InputId(self.next_id);
        self.next_id += 1;
        self.inputs.entry(quantity).or_default().push(Registration {
            id,
            batch_idx,
            input,
        });
        id
    }

    /// Remove a registration. Unregistering an absent id is a no-op.
    pub fn unregister(&mut self, quantity: SimQuantity, id: InputId) {
        if let Some(list) = self.inputs.get_mut(&quantity) {
            list.retain(|reg| reg.id != id);
        }
    }

    /// Drop every registration for a quantity. Called when the quantity's
    /// manager is disabled.
    pub fn clear(&mut self, quantity: SimQuantity) {
        self.inputs.remove(&quantity);
    }

    /// Number of registrations for a quantity, enabled or not.
    pub fn count(&self, quantity: SimQuantity) -> usize {
        self.inputs.get(&quantity).map(Vec::len).unwrap_or(0)
    }

    /// Draw every enabled input for `quantity` into `view`, sorted by
    /// `(batch index, wavelength)`.
    pub fn draw(&mut self, quantity: SimQuantity, view: &mut LayerView<'_>) {
        let Some(list) = self.inputs.get_mut(&quantity) else {
            return;
        };
        list.sort_by(|a, b| {
            a.batch_idx
                .cmp(&b.batch_idx)
                .then(a.input.wavelength().total_cmp(&b.input.wavelength()))
        });
        for reg in list.iter().filter(|reg| reg.input.enabled()) {
            reg.input.draw(view);
        }
    }

    /// Ordered `(batch index, wavelength)` pairs of the enabled inputs that
    /// would draw next, in draw order.
    pub fn draw_order(&mut self, quantity: SimQuantity) -> Vec<(i32, f32)> {
        let Some(list) = self.inputs.get_mut(&quantity) else {
            return Vec::new();
        };
        list.sort_by(|a, b| {
            a.batch_idx
                .cmp(&b.batch_idx)
                .then(a.input.wavelength().total_cmp(&b.input.wavelength()))
        });
        list.iter()
            .filter(|reg| reg.input.enabled())
            .map(|reg| (reg.batch_idx, reg.input.wavelength()))
            .collect()
    }
}
