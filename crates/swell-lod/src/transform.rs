//! Per-slice render data with a two-deep frame history.
//!
//! Each LOD slice covers a square patch of ocean centered near the viewer,
//! snapped to its own texel grid so the data does not swim as the viewer
//! moves. Consumers that blend against last frame's data (motion vectors,
//! temporal foam accumulation) read the previous record; a record is only
//! usable when its validity frame matches the frame being drawn.

use glam::Vec2;

/// Marks a render-data record that must not be sampled.
pub const INVALID_FRAME: i64 = -1;

/// Snapshot of one slice's placement for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderData {
    /// World-space center of the slice, snapped to the texel grid.
    pub pos_snapped: Vec2,
    /// World width of one texel at this slice's scale.
    pub texel_width: f32,
    /// Texture resolution the slice is simulated at.
    pub texture_res: u32,
    /// Horizontal scale of the slice (half the covered span / 2).
    pub scale: f32,
    /// Frame the record was produced for, or [`INVALID_FRAME`].
    pub frame: i64,
}

impl RenderData {
    fn invalid() -> Self {
        Self {
            pos_snapped: Vec2::ZERO,
            texel_width: 0.0,
            texture_res: 0,
            scale: 0.0,
            frame: INVALID_FRAME,
        }
    }

    /// Whether this record was produced for `frame`.
    pub fn is_valid_for(&self, frame: i64) -> bool {
        self.frame != INVALID_FRAME && self.frame == frame
    }
}

/// Tracks current- and previous-frame render data for every slice.
pub struct LodTransform {
    resolution: u32,
    current: Vec<RenderData>,
    previous: Vec<RenderData>,
}

impl LodTransform {
    /// Create transforms for `lod_count` slices at `resolution` texels each.
    /// All records start invalid; nothing may be sampled before the first
    /// [`update_transforms`](Self::update_transforms).
    pub fn new(lod_count: usize, resolution: u32) -> Self {
        Self {
            resolution,
            current: vec![RenderData::invalid(); lod_count],
            previous: vec![RenderData::invalid(); lod_count],
        }
    }

    /// Number of slices.
    pub fn lod_count(&self) -> usize {
        self.current.len()
    }

    /// Advance the history and recompute every slice for `frame`.
    ///
    /// Slice `i` has horizontal scale `base_scale · 2^i` and covers a world
    /// span of four times its scale, so each slice covers exactly twice the
    /// span of the one below it. Must run before any slice is sampled in a
    /// tick.
    pub fn update_transforms(&mut self, frame: i64, viewer_pos: Vec2, base_scale: f32) {
        self.previous.copy_from_slice(&self.current);

        for (i, data) in self.current.iter_mut().enumerate() {
            let scale = base_scale * (1u32 << i) as f32;
            let span = 4.0 * scale;
            let texel_width = span / self.resolution as f32;

            // Snap to the texel grid so data stays put under viewer motion.
            let snapped = (viewer_pos / texel_width).floor() * texel_width;

            *data = RenderData {
                pos_snapped: snapped,
                texel_width,
                texture_res: self.resolution,
                scale,
                frame,
            };
        }
    }

    /// Mark every current record invalid. Called when the simulation pauses,
    /// so stale placements are never sampled as if they were fresh.
    pub fn invalidate(&mut self) {
        for data in &mut self.current {
            data.frame = INVALID_FRAME;
        }
    }

    /// This frame's record for slice `i`.
    pub fn render_data(&self, i: usize) -> &RenderData {
        &self.current[i]
    }

    /// Last frame's record for slice `i`.
    pub fn render_data_prev(&self, i: usize) -> &RenderData {
        &self.previous[i]
    }

    /// World span covered by slice `i` this frame.
    pub fn world_span(&self, i: usize) -> f32 {
        self.current[i].texel_width * self.current[i].texture_res as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Each slice covers exactly twice the world span of the one below it.
    #[test]
    fn test_slice_spans_double() {
        let mut lt = LodTransform::new(7, 256);
        lt.update_transforms(0, Vec2::new(12.3, -45.6), 8.0);

        for i in 0..6 {
            let lower = lt.world_span(i);
            let upper = lt.world_span(i + 1);
            assert!(
                (upper - 2.0 * lower).abs() < 1e-3,
                "slice {} span {upper} is not 2x slice {i} span {lower}",
                i + 1
            );
        }
    }

    /// Records start invalid and become valid only after an update.
    #[test]
    fn test_records_invalid_until_first_update() {
        let mut lt = LodTransform::new(3, 256);
        for i in 0..3 {
            assert!(!lt.render_data(i).is_valid_for(0));
        }
        lt.update_transforms(0, Vec2::ZERO, 4.0);
        for i in 0..3 {
            assert!(lt.render_data(i).is_valid_for(0));
            assert!(!lt.render_data_prev(i).is_valid_for(0));
        }
    }

    /// The previous-frame record holds last tick's placement.
    #[test]
    fn test_history_advances() {
        let mut lt = LodTransform::new(2, 256);
        lt.update_transforms(10, Vec2::new(100.0, 0.0), 4.0);
        let first = *lt.render_data(0);

        lt.update_transforms(11, Vec2::new(200.0, 0.0), 4.0);
        assert_eq!(*lt.render_data_prev(0), first);
        assert!(lt.render_data(0).is_valid_for(11));
        assert!(lt.render_data_prev(0).is_valid_for(10));
    }

    /// Pausing invalidates current records without touching the history.
    #[test]
    fn test_invalidate_on_pause() {
        let mut lt = LodTransform::new(2, 256);
        lt.update_transforms(5, Vec2::ZERO, 4.0);
        lt.update_transforms(6, Vec2::ZERO, 4.0);

        lt.invalidate();
        assert!(!lt.render_data(0).is_valid_for(6));
        assert!(lt.render_data_prev(0).is_valid_for(5));
    }

    /// Snapped positions land on multiples of the texel width.
    #[test]
    fn test_position_snaps_to_texel_grid() {
        let mut lt = LodTransform::new(4, 256);
        lt.update_transforms(0, Vec2::new(37.77, -91.13), 8.0);

        for i in 0..4 {
            let data = lt.render_data(i);
            let rem_x = (data.pos_snapped.x / data.texel_width).fract();
            let rem_y = (data.pos_snapped.y / data.texel_width).fract();
            assert!(
                rem_x.abs() < 1e-4 && rem_y.abs() < 1e-4,
                "slice {i} position {:?} not on texel grid ({})",
                data.pos_snapped,
                data.texel_width
            );
        }
    }

    /// A small viewer move within one texel leaves the snapped position fixed.
    #[test]
    fn test_small_moves_do_not_shift_data() {
        let mut lt = LodTransform::new(1, 256);
        lt.update_transforms(0, Vec2::new(50.0, 50.0), 8.0);
        let before = lt.render_data(0).pos_snapped;

        let nudge = lt.render_data(0).texel_width * 0.25;
        lt.update_transforms(1, Vec2::new(50.0 + nudge, 50.0), 8.0);
        assert_eq!(lt.render_data(0).pos_snapped, before);
    }
}
