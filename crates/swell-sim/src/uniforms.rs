//! Named frame parameters for the rendering boundary.
//!
//! Consumers either pull the packed [`FrameUniforms`] block or receive the
//! same values through a [`PropertySink`], which lets a renderer map names
//! onto whatever binding scheme it uses.

use rustc_hash::FxHashMap;

use swell_config::MAX_LOD_COUNT;

/// Receives named frame parameters.
pub trait PropertySink {
    /// Bind a scalar float parameter.
    fn set_f32(&mut self, name: &'static str, value: f32);

    /// Bind a scalar integer parameter.
    fn set_u32(&mut self, name: &'static str, value: u32);
}

/// A [`PropertySink`] that stores everything in maps. Used by the demo and
/// by tests to observe what a manager binds.
#[derive(Default)]
pub struct CollectingSink {
    floats: FxHashMap<&'static str, f32>,
    ints: FxHashMap<&'static str, u32>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a float parameter.
    pub fn f32(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    /// Look up an integer parameter.
    pub fn u32(&self, name: &str) -> Option<u32> {
        self.ints.get(name).copied()
    }
}

impl PropertySink for CollectingSink {
    fn set_f32(&mut self, name: &'static str, value: f32) {
        self.floats.insert(name, value);
    }

    fn set_u32(&mut self, name: &'static str, value: u32) {
        self.ints.insert(name, value);
    }
}

/// Packed per-frame parameter block, std140-compatible.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    /// Simulation time in seconds.
    pub time: f32,
    /// Number of active LOD slices.
    pub lod_count: u32,
    /// Crossfade factor between the two finest detail bands.
    pub level_alpha: f32,
    /// Minimum texels a wave of any rendered wavelength spans.
    pub texels_per_wave: f32,
    /// World width of one texel, per slice. Entries past `lod_count` are zero.
    pub texel_widths: [f32; (MAX_LOD_COUNT + 1) as usize],
}

impl FrameUniforms {
    /// The raw bytes of the block, for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
