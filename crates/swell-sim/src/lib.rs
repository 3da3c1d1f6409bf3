//! Ocean simulation runtime: arena-owned LOD layers, recorded command
//! submission, per-quantity data managers, and the frame driver.

mod anim_waves;
mod arena;
mod channel;
mod command;
mod context;
mod error;
mod foam;
mod input;
mod sea_floor_depth;
mod uniforms;

pub use anim_waves::AnimatedWavesMgr;
pub use arena::{Layer, LayerHandle, TextureArena};
pub use channel::{ChannelState, FrameContext, LodDataChannel, SimQuantity};
pub use command::{CommandBuffer, SimCommand};
pub use context::{Capabilities, OceanContext, TickReport};
pub use error::SimError;
pub use foam::FoamMgr;
pub use input::{InputId, LayerView, LodInput, Registrar};
pub use sea_floor_depth::{DEFAULT_DEPTH, SeaFloorDepthMgr};
pub use uniforms::{CollectingSink, FrameUniforms, PropertySink};
