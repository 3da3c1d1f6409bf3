//! Multi-resolution LOD management: power-of-two slice ladder, per-slice
//! render-data history, and viewer-altitude scale selection.

mod scale;
mod transform;

pub use scale::{ScaleRange, ScaleSelection};
pub use transform::{INVALID_FRAME, LodTransform, RenderData};
