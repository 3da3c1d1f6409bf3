//! Simulated quantities and the capability set every LOD data manager
//! implements.

use crate::arena::{LayerHandle, TextureArena};
use crate::command::CommandBuffer;
use crate::error::SimError;
use crate::uniforms::PropertySink;
use swell_lod::LodTransform;

/// A quantity simulated per LOD slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SimQuantity {
    /// Wave displacement: height plus horizontal offsets, three channels.
    AnimatedWaves,
    /// Foam coverage, one channel.
    Foam,
    /// Depth of the sea floor below sea level, one channel.
    SeaFloorDepth,
}

impl SimQuantity {
    /// Every quantity, in update order.
    pub const ALL: [SimQuantity; 3] = [
        SimQuantity::AnimatedWaves,
        SimQuantity::Foam,
        SimQuantity::SeaFloorDepth,
    ];

    /// Number of data channels per texel.
    pub fn channels(&self) -> u32 {
        match self {
            SimQuantity::AnimatedWaves => 3,
            SimQuantity::Foam => 1,
            SimQuantity::SeaFloorDepth => 1,
        }
    }
}

/// Lifecycle of a manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelState {
    /// Constructed, no layers allocated.
    Uninitialized,
    /// Layers allocated, ready to record updates.
    Enabled,
    /// Layers released; must be re-enabled before use.
    Disabled,
}

/// Per-tick state handed to managers while they record their updates.
pub struct FrameContext<'a> {
    /// Frame being recorded.
    pub frame: i64,
    /// Simulation time in seconds.
    pub time: f32,
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Slice placements for this frame.
    pub transforms: &'a LodTransform,
}

/// The capability set shared by all LOD data managers.
///
/// A manager owns one arena layer per slice and knows how to record its
/// per-tick work into the command buffer and how to expose its outputs to
/// a property sink.
pub trait LodDataChannel {
    /// Which quantity this manager simulates.
    fn quantity(&self) -> SimQuantity;

    /// Allocate one layer per slice. Idempotent: enabling an enabled
    /// manager allocates nothing.
    fn enable(
        &mut self,
        arena: &mut TextureArena,
        lod_count: u32,
        resolution: u32,
    ) -> Result<(), SimError>;

    /// Record this tick's work into the command buffer. Nothing executes
    /// until the buffer is submitted.
    fn record_update(
        &mut self,
        frame: &FrameContext<'_>,
        commands: &mut CommandBuffer,
    ) -> Result<(), SimError>;

    /// Expose named frame parameters to the rendering boundary.
    fn bind(&self, sink: &mut dyn PropertySink);

    /// Release all layers back to the arena.
    fn release(&mut self, arena: &mut TextureArena);

    /// Arena handles, one per slice. Empty unless enabled.
    fn handles(&self) -> &[LayerHandle];

    /// Current lifecycle state.
    fn state(&self) -> ChannelState;

    /// Whether the manager currently holds layers.
    fn is_enabled(&self) -> bool {
        self.state() == ChannelState::Enabled
    }
}
