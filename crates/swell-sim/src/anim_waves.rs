//! Animated wave displacement manager.
//!
//! Owns one spectrum and one displacement field per LOD slice. Each tick it
//! records a synthesis command per slice; at execution time the spectrum is
//! evolved to the tick's time, inverse-transformed into the slice's
//! displacement field, and packed into the slice's arena layer.

use tracing::warn;

use crate::arena::{LayerHandle, TextureArena};
use crate::channel::{ChannelState, FrameContext, LodDataChannel, SimQuantity};
use crate::command::{CommandBuffer, SimCommand};
use crate::error::SimError;
use crate::uniforms::PropertySink;
use swell_config::Config;
use swell_fft::{DisplacementField, FftChannel, FftEngine};
use swell_spectrum::{SpectrumParams, WaveSpectrum};

pub struct AnimatedWavesMgr {
    state: ChannelState,
    resolution: u32,
    base_params: SpectrumParams,
    choppiness: f32,
    engine: FftEngine,
    handles: Vec<LayerHandle>,
    spectra: Vec<WaveSpectrum>,
    fields: Vec<DisplacementField>,
    /// World span of each slice, captured while recording.
    slice_domains: Vec<f32>,
    /// Largest displacement seen since the last take, (horizontal, vertical).
    max_disp: (f32, f32),
}

impl AnimatedWavesMgr {
    /// Build the manager for `config`. Layers are not allocated until
    /// [`enable`](LodDataChannel::enable).
    pub fn new(config: &Config) -> Result<Self, SimError> {
        let resolution = config.sim.resolution;
        let engine = FftEngine::new(resolution as usize)
            .map_err(|e| SimError::Configuration(e.to_string()))?;

        Ok(Self {
            state: ChannelState::Uninitialized,
            resolution,
            base_params: SpectrumParams {
                domain_size: 0.0,
                gravity: config.gravity(),
                wind_direction: config.waves.wind_direction,
                wind_speed: config.waves.wind_speed,
                amplitude: config.waves.amplitude,
                seed: config.waves.seed,
            },
            choppiness: config.waves.choppiness,
            engine,
            handles: Vec::new(),
            spectra: Vec::new(),
            fields: Vec::new(),
            slice_domains: Vec::new(),
            max_disp: (0.0, 0.0),
        })
    }

    /// Evolve the slice's spectrum to `time`, run the three inverse FFTs,
    /// apply choppiness, and pack the result into the arena layer.
    pub fn synthesize(
        &mut self,
        handle: LayerHandle,
        time: f32,
        arena: &mut TextureArena,
    ) -> Result<(), SimError> {
        let slice = handle.slice() as usize;
        let domain = self.slice_domains.get(slice).copied().unwrap_or(0.0);
        if domain <= 0.0 {
            // Transforms have not placed this slice yet.
            return Ok(());
        }

        let params = SpectrumParams {
            domain_size: domain,
            ..self.base_params.clone()
        };
        let spectrum = &mut self.spectra[slice];
        spectrum.init(&params);
        spectrum.update(time);

        let field = &mut self.fields[slice];
        self.engine
            .inverse_into_field(spectrum.height_spectrum(), FftChannel::Height, field)
            .map_err(|e| SimError::Configuration(e.to_string()))?;
        self.engine
            .inverse_into_field(spectrum.disp_x_spectrum(), FftChannel::DispX, field)
            .map_err(|e| SimError::Configuration(e.to_string()))?;
        self.engine
            .inverse_into_field(spectrum.disp_y_spectrum(), FftChannel::DispY, field)
            .map_err(|e| SimError::Configuration(e.to_string()))?;

        field.apply_choppiness(self.choppiness);
        let (horiz, vert) = field.max_displacement();
        self.max_disp.0 = self.max_disp.0.max(horiz);
        self.max_disp.1 = self.max_disp.1.max(vert);
        field.generate_mips();

        let layer = arena.layer_mut(handle)?;
        let data = layer.data_mut();
        for (i, texel) in field.texels().iter().enumerate() {
            data[i * 3] = texel.height;
            data[i * 3 + 1] = texel.dx;
            data[i * 3 + 2] = texel.dy;
        }
        Ok(())
    }

    /// The displacement field of one slice, if the manager is enabled.
    pub fn field(&self, slice: usize) -> Option<&DisplacementField> {
        self.fields.get(slice)
    }

    /// The largest (horizontal, vertical) displacement synthesized since the
    /// last call, then reset.
    pub fn take_max_displacement(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.max_disp)
    }
}

impl LodDataChannel for AnimatedWavesMgr {
    fn quantity(&self) -> SimQuantity {
        SimQuantity::AnimatedWaves
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
            match arena.allocate(SimQuantity::AnimatedWaves, slice, resolution) {
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
        self.spectra = (0..lod_count)
            .map(|_| WaveSpectrum::new(resolution as usize))
            .collect();
        self.fields = (0..lod_count)
            .map(|_| DisplacementField::new(resolution as usize))
            .collect();
        self.slice_domains = vec![0.0; lod_count as usize];
        self.state = ChannelState::Enabled;
        Ok(())
    }

    fn record_update(
        &mut self,
        frame: &FrameContext<'_>,
        commands: &mut CommandBuffer,
    ) -> Result<(), SimError> {
        for (slice, &handle) in self.handles.iter().enumerate() {
            self.slice_domains[slice] = frame.transforms.world_span(slice);
            commands.record(SimCommand::SynthesizeWaves {
                handle,
                time: frame.time,
            });
            commands.record(SimCommand::DrawInputs {
                quantity: SimQuantity::AnimatedWaves,
                handle,
            });
        }
        Ok(())
    }

    fn bind(&self, sink: &mut dyn PropertySink) {
        sink.set_f32("swell_choppiness", self.choppiness);
        sink.set_f32("swell_max_horizontal_disp", self.max_disp.0);
        sink.set_f32("swell_max_vertical_disp", self.max_disp.1);
    }

    fn release(&mut self, arena: &mut TextureArena) {
        for handle in self.handles.drain(..) {
            if let Err(err) = arena.release(handle) {
                warn!("releasing wave layer: {err}");
            }
        }
        self.spectra.clear();
        self.fields.clear();
        self.slice_domains.clear();
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

    fn test_config() -> Config {
        Config::default()
    }

    /// Enabling twice allocates exactly one layer set.
    #[test]
    fn test_enable_is_idempotent() {
        let mut arena = TextureArena::new();
        let mut mgr = AnimatedWavesMgr::new(&test_config()).unwrap();

        mgr.enable(&mut arena, 3, 256).unwrap();
        let after_first = arena.live_count();
        mgr.enable(&mut arena, 3, 256).unwrap();

        assert_eq!(after_first, 3);
        assert_eq!(arena.live_count(), 3);
    }

    /// Release frees every layer and clears the handle list.
    #[test]
    fn test_release_frees_layers() {
        let mut arena = TextureArena::new();
        let mut mgr = AnimatedWavesMgr::new(&test_config()).unwrap();
        mgr.enable(&mut arena, 3, 256).unwrap();

        mgr.release(&mut arena);
        assert_eq!(arena.live_count(), 0);
        assert!(mgr.handles().is_empty());
        assert_eq!(mgr.state(), ChannelState::Disabled);
    }

    /// Synthesis fills the arena layer with finite displacement data.
    #[test]
    fn test_synthesize_populates_layer() {
        let mut arena = TextureArena::new();
        let mut mgr = AnimatedWavesMgr::new(&test_config()).unwrap();
        mgr.enable(&mut arena, 2, 256).unwrap();

        let mut transforms = LodTransform::new(2, 256);
        transforms.update_transforms(0, Vec2::ZERO, 8.0);

        let mut commands = CommandBuffer::new();
        let frame = FrameContext {
            frame: 0,
            time: 1.0,
            dt: 1.0 / 60.0,
            transforms: &transforms,
        };
        mgr.record_update(&frame, &mut commands).unwrap();

        let handle = mgr.handles()[0];
        mgr.synthesize(handle, 1.0, &mut arena).unwrap();

        let layer = arena.layer(handle).unwrap();
        assert!(layer.data().iter().all(|v| v.is_finite()));
        assert!(
            layer.data().iter().any(|&v| v != 0.0),
            "synthesized layer should carry wave energy"
        );

        let (horiz, vert) = mgr.take_max_displacement();
        assert!(horiz > 0.0 && vert > 0.0);
        assert_eq!(mgr.take_max_displacement(), (0.0, 0.0));
    }

    /// Synthesis before any transform update is a quiet no-op, not NaN soup.
    #[test]
    fn test_synthesize_without_placement_is_noop() {
        let mut arena = TextureArena::new();
        let mut mgr = AnimatedWavesMgr::new(&test_config()).unwrap();
        mgr.enable(&mut arena, 2, 256).unwrap();

        let handle = mgr.handles()[0];
        mgr.synthesize(handle, 1.0, &mut arena).unwrap();
        let layer = arena.layer(handle).unwrap();
        assert!(layer.data().iter().all(|&v| v == 0.0));
    }
}
