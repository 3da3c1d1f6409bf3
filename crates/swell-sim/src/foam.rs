//! Foam simulation manager.
//!
//! Foam decays exponentially every tick and accumulates where the wave
//! displacement field pinches together (negative horizontal divergence),
//! then registered inputs add their own contributions on top.

use tracing::warn;

use crate::arena::{LayerHandle, TextureArena};
use crate::channel::{ChannelState, FrameContext, LodDataChannel, SimQuantity};
use crate::command::{CommandBuffer, SimCommand};
use crate::error::SimError;
use crate::uniforms::PropertySink;

pub struct FoamMgr {
    state: ChannelState,
    handles: Vec<LayerHandle>,
    /// Fraction of foam remaining after one second.
    fade_rate: f32,
    /// Foam injected per unit of pinch per second.
    wave_strength: f32,
}

impl FoamMgr {
    pub fn new(fade_rate: f32, wave_strength: f32) -> Self {
        Self {
            state: ChannelState::Uninitialized,
            handles: Vec::new(),
            fade_rate,
            wave_strength,
        }
    }
}

impl LodDataChannel for FoamMgr {
    fn quantity(&self) -> SimQuantity {
        SimQuantity::Foam
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
            match arena.allocate(SimQuantity::Foam, slice, resolution) {
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
        frame: &FrameContext<'_>,
        commands: &mut CommandBuffer,
    ) -> Result<(), SimError> {
        // Per-second fade rate converted to a per-tick factor.
        let factor = self.fade_rate.powf(frame.dt).clamp(0.0, 1.0);
        for &handle in &self.handles {
            commands.record(SimCommand::Fade {
                handle,
                factor,
            });
            commands.record(SimCommand::AccumulateFoam {
                handle,
                strength: self.wave_strength * frame.dt,
            });
            commands.record(SimCommand::DrawInputs {
                quantity: SimQuantity::Foam,
                handle,
            });
        }
        Ok(())
    }

    fn bind(&self, sink: &mut dyn PropertySink) {
        sink.set_f32("swell_foam_fade_rate", self.fade_rate);
        sink.set_f32("swell_foam_wave_strength", self.wave_strength);
    }

    fn release(&mut self, arena: &mut TextureArena) {
        for handle in self.handles.drain(..) {
            if let Err(err) = arena.release(handle) {
                warn!("releasing foam layer: {err}");
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
