//! Spatial-domain displacement output: a 3-channel, mipmapped, toroidal field.

use bytemuck::{Pod, Zeroable};

use crate::FftChannel;

/// One texel of the displacement field: wave height plus horizontal offsets.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DisplacementTexel {
    /// Vertical wave height.
    pub height: f32,
    /// Horizontal displacement along X.
    pub dx: f32,
    /// Horizontal displacement along Y.
    pub dy: f32,
}

/// Final per-LOD-slice simulation output.
///
/// The domain is toroidal: all addressing wraps, matching the repeat wrap
/// mode of the original render target. Mip levels are box-filtered halvings
/// down to 1×1, rebuilt on demand after the base level changes.
pub struct DisplacementField {
    n: usize,
    texels: Vec<DisplacementTexel>,
    /// Mip chain, level 1 and up (level 0 is `texels`).
    mips: Vec<Vec<DisplacementTexel>>,
}

impl DisplacementField {
    /// Create a zeroed field of size `n × n`. `n` must be a power of two
    /// for the mip chain to halve cleanly.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            texels: vec![DisplacementTexel::default(); n * n],
            mips: Vec::new(),
        }
    }

    /// Side length of the base level.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Read a texel with toroidal wrap-around.
    #[inline]
    pub fn texel(&self, x: isize, y: isize) -> DisplacementTexel {
        let n = self.n as isize;
        let xi = x.rem_euclid(n) as usize;
        let yi = y.rem_euclid(n) as usize;
        self.texels[yi * self.n + xi]
    }

    /// Write one channel of a texel.
    #[inline]
    pub fn set_channel(&mut self, channel: FftChannel, x: usize, y: usize, value: f32) {
        let t = &mut self.texels[y * self.n + x];
        match channel {
            FftChannel::Height => t.height = value,
            FftChannel::DispX => t.dx = value,
            FftChannel::DispY => t.dy = value,
        }
    }

    /// Overwrite a full texel.
    #[inline]
    pub fn set_texel(&mut self, x: usize, y: usize, value: DisplacementTexel) {
        self.texels[y * self.n + x] = value;
    }

    /// Base-level texels, row-major.
    pub fn texels(&self) -> &[DisplacementTexel] {
        &self.texels
    }

    /// Base level as raw bytes for upload across the rendering boundary.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }

    /// Scale the horizontal channels by the choppiness factor.
    pub fn apply_choppiness(&mut self, choppiness: f32) {
        for t in &mut self.texels {
            t.dx *= choppiness;
            t.dy *= choppiness;
        }
    }

    /// Largest absolute value across all channels, used for displacement
    /// reporting to the frame driver.
    pub fn max_displacement(&self) -> (f32, f32) {
        let mut max_horiz = 0.0f32;
        let mut max_vert = 0.0f32;
        for t in &self.texels {
            max_horiz = max_horiz.max(t.dx.abs()).max(t.dy.abs());
            max_vert = max_vert.max(t.height.abs());
        }
        (max_horiz, max_vert)
    }

    /// True if any channel of any texel is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        self.texels
            .iter()
            .any(|t| !t.height.is_finite() || !t.dx.is_finite() || !t.dy.is_finite())
    }

    /// Number of mip levels including the base level.
    pub fn mip_count(&self) -> usize {
        self.mips.len() + 1
    }

    /// Texels of mip `level` (0 is the base level).
    pub fn mip(&self, level: usize) -> &[DisplacementTexel] {
        if level == 0 {
            &self.texels
        } else {
            &self.mips[level - 1]
        }
    }

    /// Side length of mip `level`.
    pub fn mip_size(&self, level: usize) -> usize {
        self.n >> level
    }

    /// Rebuild the mip chain with a 2×2 box filter down to 1×1.
    pub fn generate_mips(&mut self) {
        self.mips.clear();
        let mut src = self.texels.clone();
        let mut size = self.n;
        while size > 1 {
            let half = size / 2;
            let mut level = vec![DisplacementTexel::default(); half * half];
            for y in 0..half {
                for x in 0..half {
                    let mut height = 0.0;
                    let mut dx = 0.0;
                    let mut dy = 0.0;
                    for (ox, oy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                        let t = src[(y * 2 + oy) * size + (x * 2 + ox)];
                        height += t.height;
                        dx += t.dx;
                        dy += t.dy;
                    }
                    level[y * half + x] = DisplacementTexel {
                        height: height * 0.25,
                        dx: dx * 0.25,
                        dy: dy * 0.25,
                    };
                }
            }
            src = level.clone();
            self.mips.push(level);
            size = half;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toroidal_addressing() {
        let mut field = DisplacementField::new(4);
        field.set_channel(FftChannel::Height, 0, 0, 5.0);
        assert_eq!(field.texel(4, 4).height, 5.0);
        assert_eq!(field.texel(-4, -4).height, 5.0);
        assert_eq!(field.texel(-1, 0).height, 0.0);
    }

    #[test]
    fn test_channel_writes_are_independent() {
        let mut field = DisplacementField::new(2);
        field.set_channel(FftChannel::Height, 1, 1, 1.0);
        field.set_channel(FftChannel::DispX, 1, 1, 2.0);
        field.set_channel(FftChannel::DispY, 1, 1, 3.0);
        let t = field.texel(1, 1);
        assert_eq!((t.height, t.dx, t.dy), (1.0, 2.0, 3.0));
    }

    /// The mip chain halves down to 1×1 and each level box-averages its parent.
    #[test]
    fn test_mip_chain_averages() {
        let mut field = DisplacementField::new(4);
        for y in 0..4 {
            for x in 0..4 {
                field.set_channel(FftChannel::Height, x, y, (y * 4 + x) as f32);
            }
        }
        field.generate_mips();

        assert_eq!(field.mip_count(), 3); // 4, 2, 1
        assert_eq!(field.mip_size(1), 2);

        // Top-left 2×2 block of the base: 0, 1, 4, 5 -> 2.5.
        assert!((field.mip(1)[0].height - 2.5).abs() < 1e-6);

        // The 1×1 tail equals the mean of the whole base level: (0..16)/16.
        assert!((field.mip(2)[0].height - 7.5).abs() < 1e-6);
    }

    #[test]
    fn test_choppiness_scales_horizontal_only() {
        let mut field = DisplacementField::new(2);
        field.set_texel(
            0,
            0,
            DisplacementTexel {
                height: 1.0,
                dx: 1.0,
                dy: -1.0,
            },
        );
        field.apply_choppiness(2.0);
        let t = field.texel(0, 0);
        assert_eq!((t.height, t.dx, t.dy), (1.0, 2.0, -2.0));
    }

    #[test]
    fn test_max_displacement() {
        let mut field = DisplacementField::new(2);
        field.set_texel(
            1,
            0,
            DisplacementTexel {
                height: -3.0,
                dx: 0.5,
                dy: -2.0,
            },
        );
        let (horiz, vert) = field.max_displacement();
        assert_eq!(horiz, 2.0);
        assert_eq!(vert, 3.0);
    }

    #[test]
    fn test_byte_view_length() {
        let field = DisplacementField::new(8);
        assert_eq!(field.as_bytes().len(), 8 * 8 * 3 * 4);
    }
}
