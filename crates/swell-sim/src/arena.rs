//! Arena-owned simulation layers with generational handles.
//!
//! All per-slice simulation data lives in one [`TextureArena`]. Managers hold
//! [`LayerHandle`]s, never the buffers themselves, so a released layer can be
//! detected: a handle whose generation no longer matches its slot surfaces
//! [`SimError::StaleBuffer`] instead of silently reading freed data.

use crate::channel::SimQuantity;
use crate::error::SimError;

/// Upper bound on total arena memory.
const MAX_ARENA_BYTES: usize = 512 * 1024 * 1024;

/// Handle to one arena layer, keyed by quantity and LOD slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerHandle {
    index: u32,
    generation: u32,
    quantity: SimQuantity,
    slice: u32,
}

impl LayerHandle {
    /// The quantity this layer belongs to.
    pub fn quantity(&self) -> SimQuantity {
        self.quantity
    }

    /// The LOD slice this layer covers.
    pub fn slice(&self) -> u32 {
        self.slice
    }
}

/// One simulation layer: a square grid of texels with one or more channels.
#[derive(Debug)]
pub struct Layer {
    resolution: u32,
    channels: u32,
    data: Vec<f32>,
}

impl Layer {
    fn new(resolution: u32, channels: u32) -> Self {
        Self {
            resolution,
            channels,
            data: vec![0.0; (resolution * resolution * channels) as usize],
        }
    }

    /// Side length in texels.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Channels per texel.
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// Set every value in every channel.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Read channel `c` of texel `(x, y)`.
    pub fn texel(&self, x: u32, y: u32, c: u32) -> f32 {
        self.data[((y * self.resolution + x) * self.channels + c) as usize]
    }

    /// Write channel `c` of texel `(x, y)`.
    pub fn set_texel(&mut self, x: u32, y: u32, c: u32, value: f32) {
        self.data[((y * self.resolution + x) * self.channels + c) as usize] = value;
    }

    /// Interleaved texel data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Interleaved texel data, mutable.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    fn byte_size(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }
}

struct Slot {
    generation: u32,
    layer: Option<Layer>,
}

/// Owns every simulation layer and tracks memory use.
pub struct TextureArena {
    slots: Vec<Slot>,
    free: Vec<usize>,
    bytes_in_use: usize,
    max_bytes: usize,
}

impl TextureArena {
    /// Create an empty arena with the default memory budget.
    pub fn new() -> Self {
        Self::with_budget(MAX_ARENA_BYTES)
    }

    /// Create an empty arena with an explicit memory budget in bytes.
    pub fn with_budget(max_bytes: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            bytes_in_use: 0,
            max_bytes,
        }
    }

    /// Allocate a layer for `quantity` at `slice`.
    pub fn allocate(
        &mut self,
        quantity: SimQuantity,
        slice: u32,
        resolution: u32,
    ) -> Result<LayerHandle, SimError> {
        let layer = Layer::new(resolution, quantity.channels());
        let bytes = layer.byte_size();
        if self.bytes_in_use + bytes > self.max_bytes {
            return Err(SimError::Allocation {
                quantity,
                reason: format!(
                    "budget exceeded: {} + {bytes} > {} bytes",
                    self.bytes_in_use, self.max_bytes
                ),
            });
        }
        self.bytes_in_use += bytes;

        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index].layer = Some(layer);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    layer: Some(layer),
                });
                self.slots.len() - 1
            }
        };

        Ok(LayerHandle {
            index: index as u32,
            generation: self.slots[index].generation,
            quantity,
            slice,
        })
    }

    /// Release a layer. The slot's generation advances, so every copy of the
    /// handle goes stale. Releasing an already-stale handle is an error.
    pub fn release(&mut self, handle: LayerHandle) -> Result<(), SimError> {
        let index = handle.index as usize;
        let layer = {
            let slot = self.slot_mut(handle)?;
            slot.generation = slot.generation.wrapping_add(1);
            slot.layer.take()
        };
        // slot_mut guarantees the layer was present
        if let Some(layer) = layer {
            self.free.push(index);
            self.bytes_in_use -= layer.byte_size();
        }
        Ok(())
    }

    /// Resolve a handle to its layer.
    pub fn layer(&self, handle: LayerHandle) -> Result<&Layer, SimError> {
        let slot = self
            .slots
            .get(handle.index as usize)
            .filter(|s| s.generation == handle.generation);
        match slot.and_then(|s| s.layer.as_ref()) {
            Some(layer) => Ok(layer),
            None => Err(SimError::StaleBuffer {
                quantity: handle.quantity,
                slice: handle.slice,
            }),
        }
    }

    /// Resolve a handle to its layer, mutable.
    pub fn layer_mut(&mut self, handle: LayerHandle) -> Result<&mut Layer, SimError> {
        let slot = self.slot_mut(handle)?;
        match slot.layer.as_mut() {
            Some(layer) => Ok(layer),
            None => Err(SimError::StaleBuffer {
                quantity: handle.quantity,
                slice: handle.slice,
            }),
        }
    }

    /// Whether `handle` still resolves to a live layer.
    pub fn is_live(&self, handle: LayerHandle) -> bool {
        self.layer(handle).is_ok()
    }

    /// Bytes held by live layers.
    pub fn bytes_in_use(&self) -> usize {
        self.bytes_in_use
    }

    /// Number of live layers.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.layer.is_some()).count()
    }

    fn slot_mut(&mut self, handle: LayerHandle) -> Result<&mut Slot, SimError> {
        match self
            .slots
            .get_mut(handle.index as usize)
            .filter(|s| s.generation == handle.generation && s.layer.is_some())
        {
            Some(slot) => Ok(slot),
            None => Err(SimError::StaleBuffer {
                quantity: handle.quantity,
                slice: handle.slice,
            }),
        }
    }
}

impl Default for TextureArena {
    fn default() -> Self {
        Self::new()
    }
}
