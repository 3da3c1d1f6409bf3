//! The per-frame driver for the whole ocean simulation.
//!
//! [`OceanContext`] owns the arena, the LOD transforms, the managers, and
//! the command buffer, and advances them in a strict order each tick:
//! viewpoint resolution, scale selection, manager lifecycle, transform
//! update plus recording, then a single ordered submission. Work recorded
//! in one tick always executes before the next tick records.

use glam::{Vec2, Vec3};
use tracing::{debug, info};

use crate::anim_waves::AnimatedWavesMgr;
use crate::arena::{Layer, TextureArena};
use crate::channel::{FrameContext, LodDataChannel, SimQuantity};
use crate::command::{CommandBuffer, SimCommand};
use crate::error::SimError;
use crate::foam::FoamMgr;
use crate::input::{InputId, LayerView, LodInput, Registrar};
use crate::sea_floor_depth::SeaFloorDepthMgr;
use crate::uniforms::{FrameUniforms, PropertySink};
use swell_config::{Config, MAX_LOD_COUNT};
use swell_fft::DisplacementField;
use swell_lod::{LodTransform, ScaleRange, ScaleSelection};

/// Minimum texels a rendered wave of any wavelength spans.
const MIN_TEXELS_PER_WAVE: f32 = 4.0;

/// What the runtime can support. Construction fails without layered buffer
/// support rather than degrading.
#[derive(Clone, Copy, Debug)]
pub struct Capabilities {
    /// Whether layered simulation buffers are available.
    pub layered_buffers: bool,
    /// Most layers the runtime can hold at once.
    pub max_layers: u32,
}

impl Capabilities {
    /// Probe the current runtime.
    pub fn detect() -> Self {
        Self {
            layered_buffers: true,
            max_layers: 1024,
        }
    }
}

/// Summary of one completed tick.
#[derive(Clone, Copy, Debug)]
pub struct TickReport {
    /// Frame just simulated.
    pub frame: i64,
    /// Horizontal scale selected for the frame.
    pub scale: f32,
    /// Crossfade factor between the two finest detail bands.
    pub level_alpha: f32,
    /// Commands executed at submission.
    pub commands_executed: usize,
    /// Largest horizontal displacement reported during the frame.
    pub max_horizontal_disp: f32,
    /// Largest vertical displacement reported during the frame.
    pub max_vertical_disp: f32,
}

/// Owns and drives every simulation subsystem.
pub struct OceanContext {
    config: Config,
    arena: TextureArena,
    transforms: LodTransform,
    scale_range: ScaleRange,
    registrar: Registrar,
    commands: CommandBuffer,
    waves: AnimatedWavesMgr,
    foam: Option<FoamMgr>,
    depth: Option<SeaFloorDepthMgr>,
    frame: i64,
    time: f32,
    paused: bool,
    current_scale: ScaleSelection,
    /// Displacement maxima reported during the frame being simulated.
    reported_max: (f32, f32),
    /// Maxima of the last completed frame; read by the scale step.
    last_max: (f32, f32),
}

impl std::fmt::Debug for OceanContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OceanContext")
            .field("frame", &self.frame)
            .field("time", &self.time)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

impl OceanContext {
    /// Build a context for `config` against the detected capabilities.
    pub fn new(config: Config) -> Result<Self, SimError> {
        Self::with_capabilities(config, Capabilities::detect())
    }

    /// Build a context against explicit capabilities. Fails with
    /// [`SimError::Configuration`] before any allocation when the config is
    /// out of range or a required capability is missing.
    pub fn with_capabilities(config: Config, caps: Capabilities) -> Result<Self, SimError> {
        config.validate()?;
        if !caps.layered_buffers {
            return Err(SimError::Configuration(
                "layered simulation buffers are required".to_string(),
            ));
        }
        // Worst case: every quantity enabled, one layer per slice each.
        let worst_case = config.sim.lod_count * SimQuantity::ALL.len() as u32;
        if worst_case > caps.max_layers {
            return Err(SimError::Configuration(format!(
                "{} layers needed, runtime supports {}",
                worst_case, caps.max_layers
            )));
        }

        let lod_count = config.sim.lod_count;
        let resolution = config.sim.resolution;
        let mut arena = TextureArena::new();
        let mut waves = AnimatedWavesMgr::new(&config)?;
        waves.enable(&mut arena, lod_count, resolution)?;

        let scale_range = ScaleRange {
            min_scale: config.sim.min_scale,
            max_scale: config.sim.max_scale,
        };

        info!(
            resolution,
            lod_count, "ocean context ready: {} bytes of simulation layers", arena.bytes_in_use()
        );

        Ok(Self {
            transforms: LodTransform::new(lod_count as usize, resolution),
            current_scale: scale_range.select(scale_range.min_scale),
            config,
            arena,
            scale_range,
            registrar: Registrar::new(),
            commands: CommandBuffer::new(),
            waves,
            foam: None,
            depth: None,
            frame: -1,
            time: 0.0,
            paused: false,
            reported_max: (0.0, 0.0),
            last_max: (0.0, 0.0),
        })
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Returns [`SimError::MissingViewpoint`] when no viewpoint is supplied;
    /// the tick is skipped and the transforms are invalidated so nothing
    /// samples stale placements. A paused context ticks to a no-op.
    pub fn tick(&mut self, dt: f32, viewpoint: Option<Vec3>) -> Result<TickReport, SimError> {
        if self.paused {
            return Ok(self.report(0));
        }

        // 1. Resolve the viewpoint.
        let Some(viewpoint) = viewpoint else {
            self.transforms.invalidate();
            return Err(SimError::MissingViewpoint);
        };

        self.frame += 1;
        self.time += dt;
        self.last_max = std::mem::take(&mut self.reported_max);

        // 2. Select the horizontal scale from the viewer's height above the
        // (displaced) surface.
        let altitude = (viewpoint.y.abs() - self.last_max.1).max(0.0);
        self.current_scale = self.scale_range.select(altitude);

        // 3. Create or destroy the optional managers.
        self.sync_optional_managers()?;

        // 4. Place every slice, then let managers record their work.
        self.transforms.update_transforms(
            self.frame,
            Vec2::new(viewpoint.x, viewpoint.z),
            self.current_scale.scale,
        );
        let frame_ctx = FrameContext {
            frame: self.frame,
            time: self.time,
            dt,
            transforms: &self.transforms,
        };
        self.waves.record_update(&frame_ctx, &mut self.commands)?;
        if let Some(foam) = &mut self.foam {
            foam.record_update(&frame_ctx, &mut self.commands)?;
        }
        if let Some(depth) = &mut self.depth {
            depth.record_update(&frame_ctx, &mut self.commands)?;
        }

        // 5. Submit: one ordered batch.
        let recorded = self.commands.drain();
        let executed = recorded.len();
        for command in recorded {
            self.execute(command)?;
        }

        let (horiz, vert) = self.waves.take_max_displacement();
        self.report_max_displacement(horiz, vert);

        debug!(
            frame = self.frame,
            scale = self.current_scale.scale,
            executed,
            "tick complete"
        );
        Ok(self.report(executed))
    }

    fn report(&self, commands_executed: usize) -> TickReport {
        TickReport {
            frame: self.frame,
            scale: self.current_scale.scale,
            level_alpha: self.current_scale.level_alpha,
            commands_executed,
            max_horizontal_disp: self.reported_max.0,
            max_vertical_disp: self.reported_max.1,
        }
    }

    fn sync_optional_managers(&mut self) -> Result<(), SimError> {
        let lod_count = self.config.sim.lod_count;
        let resolution = self.config.sim.resolution;

        if self.config.sim.enable_foam {
            if self.foam.is_none() {
                let mut mgr =
                    FoamMgr::new(self.config.sim.foam_fade_rate, self.config.sim.foam_wave_strength);
                mgr.enable(&mut self.arena, lod_count, resolution)?;
                self.foam = Some(mgr);
                debug!("foam simulation enabled");
            }
        } else if let Some(mut mgr) = self.foam.take() {
            mgr.release(&mut self.arena);
            self.registrar.clear(SimQuantity::Foam);
            debug!("foam simulation disabled");
        }

        if self.config.sim.enable_sea_floor_depth {
            if self.depth.is_none() {
                let mut mgr = SeaFloorDepthMgr::new();
                mgr.enable(&mut self.arena, lod_count, resolution)?;
                self.depth = Some(mgr);
                debug!("sea floor depth tracking enabled");
            }
        } else if let Some(mut mgr) = self.depth.take() {
            mgr.release(&mut self.arena);
            self.registrar.clear(SimQuantity::SeaFloorDepth);
            debug!("sea floor depth tracking disabled");
        }

        Ok(())
    }

    fn execute(&mut self, command: SimCommand) -> Result<(), SimError> {
        match command {
            SimCommand::Clear { handle, value } => {
                self.arena.layer_mut(handle)?.fill(value);
            }
            SimCommand::Fade { handle, factor } => {
                for v in self.arena.layer_mut(handle)?.data_mut() {
                    *v *= factor;
                }
            }
            SimCommand::SynthesizeWaves { handle, time } => {
                self.waves.synthesize(handle, time, &mut self.arena)?;
            }
            SimCommand::AccumulateFoam { handle, strength } => {
                let slice = handle.slice() as usize;
                let texel_width = self.transforms.render_data(slice).texel_width;
                let Some(field) = self.waves.field(slice) else {
                    return Ok(());
                };
                if texel_width <= 0.0 {
                    return Ok(());
                }
                let layer = self.arena.layer_mut(handle)?;
                let n = layer.resolution() as isize;
                let inv_step = 1.0 / (2.0 * texel_width);
                for y in 0..n {
                    for x in 0..n {
                        let div = (field.texel(x + 1, y).dx - field.texel(x - 1, y).dx
                            + field.texel(x, y + 1).dy
                            - field.texel(x, y - 1).dy)
                            * inv_step;
                        // Converging displacement pinches the surface and
                        // whips up foam.
                        let pinch = (-div).max(0.0);
                        if pinch > 0.0 {
                            let current = layer.texel(x as u32, y as u32, 0);
                            layer.set_texel(x as u32, y as u32, 0, current + pinch * strength);
                        }
                    }
                }
            }
            SimCommand::DrawInputs { quantity, handle } => {
                let slice = handle.slice() as usize;
                let render_data = *self.transforms.render_data(slice);
                // The finest band fades out as detail shifts up the ladder.
                let weight = if slice == 0 {
                    1.0 - self.current_scale.level_alpha
                } else {
                    1.0
                };
                let layer = self.arena.layer_mut(handle)?;
                let mut view = LayerView::new(layer, render_data, weight);
                self.registrar.draw(quantity, &mut view);
            }
        }
        Ok(())
    }

    /// Fold a contributor's displacement maxima into this frame's totals.
    /// Cleared automatically when the frame advances.
    pub fn report_max_displacement(&mut self, horizontal: f32, vertical: f32) {
        self.reported_max.0 = self.reported_max.0.max(horizontal);
        self.reported_max.1 = self.reported_max.1.max(vertical);
    }

    /// Register an input that draws into `quantity`'s layers each tick.
    pub fn register_input(
        &mut self,
        quantity: SimQuantity,
        batch_idx: i32,
        input: Box<dyn LodInput>,
    ) -> InputId {
        self.registrar.register(quantity, batch_idx, input)
    }

    /// Remove a registration. Absent ids are a no-op.
    pub fn unregister_input(&mut self, quantity: SimQuantity, id: InputId) {
        self.registrar.unregister(quantity, id);
    }

    /// Number of inputs registered against `quantity`.
    pub fn input_count(&self, quantity: SimQuantity) -> usize {
        self.registrar.count(quantity)
    }

    /// Pause or resume. Pausing invalidates slice placements so consumers
    /// cannot sample them as current.
    pub fn set_paused(&mut self, paused: bool) {
        if paused && !self.paused {
            self.transforms.invalidate();
        }
        self.paused = paused;
    }

    /// Turn the foam simulation on or off. Applied on the next tick.
    pub fn set_foam_enabled(&mut self, enabled: bool) {
        self.config.sim.enable_foam = enabled;
    }

    /// Turn sea-floor depth tracking on or off. Applied on the next tick.
    pub fn set_sea_floor_depth_enabled(&mut self, enabled: bool) {
        self.config.sim.enable_sea_floor_depth = enabled;
    }

    /// Whether a quantity currently holds layers.
    pub fn quantity_enabled(&self, quantity: SimQuantity) -> bool {
        match quantity {
            SimQuantity::AnimatedWaves => self.waves.is_enabled(),
            SimQuantity::Foam => self.foam.as_ref().is_some_and(|m| m.is_enabled()),
            SimQuantity::SeaFloorDepth => self.depth.as_ref().is_some_and(|m| m.is_enabled()),
        }
    }

    /// Read-only displacement field of one slice.
    pub fn displacement_field(&self, slice: usize) -> Option<&DisplacementField> {
        self.waves.field(slice)
    }

    /// Read-only layer of `quantity` at `slice`, if enabled and live.
    pub fn layer(&self, quantity: SimQuantity, slice: usize) -> Option<&Layer> {
        let handles = match quantity {
            SimQuantity::AnimatedWaves => self.waves.handles(),
            SimQuantity::Foam => self.foam.as_ref()?.handles(),
            SimQuantity::SeaFloorDepth => self.depth.as_ref()?.handles(),
        };
        self.arena.layer(*handles.get(slice)?).ok()
    }

    /// Slice placements for the current frame.
    pub fn transforms(&self) -> &LodTransform {
        &self.transforms
    }

    /// Whether a higher viewer altitude could still increase the scale.
    pub fn scale_could_increase(&self) -> bool {
        self.scale_range.could_increase(self.current_scale.scale)
    }

    /// Whether a lower viewer altitude could still decrease the scale.
    pub fn scale_could_decrease(&self) -> bool {
        self.scale_range.could_decrease(self.current_scale.scale)
    }

    /// The packed per-frame parameter block.
    pub fn frame_uniforms(&self) -> FrameUniforms {
        let mut texel_widths = [0.0; (MAX_LOD_COUNT + 1) as usize];
        for (i, width) in texel_widths
            .iter_mut()
            .take(self.transforms.lod_count())
            .enumerate()
        {
            *width = self.transforms.render_data(i).texel_width;
        }
        FrameUniforms {
            time: self.time,
            lod_count: self.config.sim.lod_count,
            level_alpha: self.current_scale.level_alpha,
            texels_per_wave: MIN_TEXELS_PER_WAVE,
            texel_widths,
        }
    }

    /// Bind every named frame parameter, then each enabled manager's own.
    pub fn bind_properties(&self, sink: &mut dyn PropertySink) {
        sink.set_f32("swell_time", self.time);
        sink.set_u32("swell_lod_count", self.config.sim.lod_count);
        sink.set_f32("swell_level_alpha", self.current_scale.level_alpha);
        sink.set_f32("swell_scale", self.current_scale.scale);
        sink.set_f32("swell_texels_per_wave", MIN_TEXELS_PER_WAVE);
        self.waves.bind(sink);
        if let Some(foam) = &self.foam {
            foam.bind(sink);
        }
        if let Some(depth) = &self.depth {
            depth.bind(sink);
        }
    }
}
