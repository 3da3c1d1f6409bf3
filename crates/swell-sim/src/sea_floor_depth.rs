//! Sea-floor depth manager.
//!
//! Carries no simulation of its own: each tick the layers reset to the
//! deep-water default and registered inputs (terrain probes, shoreline
//! renderers) write the actual depth.

use tracing::warn;

use crate::arena::{LayerHandle, TextureArena};
use crate::channel::{ChannelState, FrameContext, LodDataChannel, SimQuantity};
use crate::command::{CommandBuffer, SimCommand};
use crate::error::SimError;
use crate::uniforms::PropertySink;

/// Depth assumed where no input has written, in meters below sea level.
pub const DEFAULT_DEPTH: f32 = 1000.0;

pub struct SeaFloorDepthMgr {
    state: ChannelState,
    handles: Vec<LayerHandle>,
}

impl SeaFloorDepthMgr {
    pub fn new() -> Self {
        Self {
            state: ChannelState::Uninitialized,
            handles: Vec::new(),
        }
    }
}

impl Default for SeaFloorDepthMgr {
    fn default() -> Self {
        Self::new()
    }
}

impl LodDataChannel for SeaFloorDepthMgr {
    fn quantity(&self) -> SimQuantity {
        SimQuantity::SeaFloorDepth
    }

    fn enable(
        &mut self,
        arena: &mut TextureArena,
        lod_count: u32,
        resolution: u32,
    ) -> Result<(), SimError> {
        if self.state == ChannelState::Enabled {
            return Ok(());
        }

        let mut handles = Vec::with_capacity(lod_count as usize);
        for slice in 0..lod_count {
            match arena.allocate(SimQuantity::SeaFloorDepth, slice, resolution) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    for handle in handles {
                        let _ = arena.release(handle);
                    }
                    return Err(err);
                }
            }
        }

        self.handles = handles;
        self.state = ChannelState::Enabled;
        Ok(())
    }

    fn record_update(
        &mut self,
        _frame: &FrameContext<'_>,
        commands: &mut CommandBuffer,
    ) -> Result<(), SimError> {
        for &handle in &self.handles {
            commands.record(SimCommand::Clear {
                handle,
                value: DEFAULT_DEPTH,
            });
            commands.record(SimCommand::DrawInputs {
                quantity: SimQuantity::SeaFloorDepth,
                handle,
            });
        }
        Ok(())
    }

    fn bind(&self, sink: &mut dyn PropertySink) {
        sink.set_f32("swell_sea_floor_default_depth", DEFAULT_DEPTH);
    }

    fn release(&mut self, arena: &mut TextureArena) {
        for handle in self.handles.drain(..) {
            if let Err(err) = arena.release(handle) {
                warn!("releasing sea floor depth layer: {err}");
            }
        }
        self.state = ChannelState::Disabled;
    }

    fn handles(&self) -> &[LayerHandle] {
        &self.handles
    }

    fn state(&self) -> ChannelState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use swell_lod::LodTransform;

    /// Each tick records a clear to the default depth, then the input draws.
    #[test]
    fn test_records_clear_then_inputs() {
        let mut arena = TextureArena::new();
        let mut mgr = SeaFloorDepthMgr::new();
        mgr.enable(&mut arena, 1, 64).unwrap();

        let mut transforms = LodTransform::new(1, 64);
        transforms.update_transforms(0, Vec2::ZERO, 8.0);

        let mut commands = CommandBuffer::new();
        let frame = FrameContext {
            frame: 0,
            time: 0.0,
            dt: 1.0 / 60.0,
            transforms: &transforms,
        };
        mgr.record_update(&frame, &mut commands).unwrap();

        let recorded = commands.drain();
        assert_eq!(recorded.len(), 2);
        let SimCommand::Clear { value, .. } = recorded[0] else {
            panic!("expected a clear command first");
        };
        assert_eq!(value, DEFAULT_DEPTH);
        assert!(matches!(
            recorded[1],
            SimCommand::DrawInputs {
                quantity: SimQuantity::SeaFloorDepth,
                ..
            }
        ));
    }

    /// Enable and release round trip leaves the arena empty.
    #[test]
    fn test_enable_release_round_trip() {
        let mut arena = TextureArena::new();
        let mut mgr = SeaFloorDepthMgr::new();
        mgr.enable(&mut arena, 3, 64).unwrap();
        assert_eq!(arena.live_count(), 3);

        mgr.release(&mut arena);
        assert_eq!(arena.live_count(), 0);
        assert_eq!(mgr.state(), ChannelState::Disabled);
    }
}
