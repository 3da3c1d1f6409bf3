//! Float-to-half conversion via precomputed 512-entry lookup tables.
//!
//! Used to prebuild the byte-level lookup textures consumed by the FFT
//! passes (twiddle factors as RG16F, bit-reversal indices as R32F). The
//! table method truncates the mantissa rather than rounding, which is the
//! behavior the precomputed-table upload path was built around.

/// Base half-float bit patterns indexed by the sign+exponent byte of an f32.
static BASE_TABLE: [u16; 512] = build_base_table();

/// Mantissa shift amounts indexed by the sign+exponent byte of an f32.
static SHIFT_TABLE: [u32; 512] = build_shift_table();

const fn build_base_table() -> [u16; 512] {
    let mut table = [0u16; 512];
    let mut i = 0usize;
    while i < 256 {
        let e = 127i32 - i as i32;
        if e > 24 {
            // Too small for a half denorm: maps to signed zero.
            table[i] = 0x0000;
            table[i | 0x100] = 0x8000;
        } else if e > 14 {
            // Half denormal range.
            let bits = (0x0400u32 >> (e - 14)) as u16;
            table[i] = bits;
            table[i | 0x100] = bits | 0x8000;
        } else if e >= -15 {
            // Normal numbers lose mantissa precision only.
            let bits = ((15 - e) as u16) << 10;
            table[i] = bits;
            table[i | 0x100] = bits | 0x8000;
        } else {
            // Overflow, infinity and NaN all land on the infinity exponent.
            table[i] = 0x7c00;
            table[i | 0x100] = 0xfc00;
        }
        i += 1;
    }
    table
}

const fn build_shift_table() -> [u32; 512] {
    let mut table = [0u32; 512];
    let mut i = 0usize;
    while i < 256 {
        let e = 127i32 - i as i32;
        let shift = if e > 24 {
            // Zero: discard the whole mantissa.
            24
        } else if e > 14 {
            // Denorm: mantissa shift grows with how far below normal we are.
            (e - 1) as u32
        } else if e >= -15 {
            // Normal: 23-bit mantissa narrows to 10 bits.
            13
        } else if e > -128 {
            // Overflow to infinity: discard mantissa entirely.
            24
        } else {
            // Infinity/NaN: keep the top mantissa bits so NaN stays NaN.
            13
        };
        table[i] = shift;
        table[i | 0x100] = shift;
        i += 1;
    }
    table
}

/// Convert raw f32 bits to raw half-float bits (truncating).
#[inline]
pub fn f32_to_half_bits(bits: u32) -> u16 {
    let idx = ((bits >> 23) & 0x1ff) as usize;
    (BASE_TABLE[idx] as u32 + ((bits & 0x007f_ffff) >> SHIFT_TABLE[idx])) as u16
}

/// Convert an f32 to raw half-float bits (truncating).
#[inline]
pub fn f32_to_half(value: f32) -> u16 {
    f32_to_half_bits(value.to_bits())
}

/// Write an f32 as two little-endian half-float bytes at `offset`.
pub fn write_half_le(value: f32, data: &mut [u8], offset: usize) {
    let half = f32_to_half(value);
    data[offset..offset + 2].copy_from_slice(&half.to_le_bytes());
}

/// Write an f32 as four little-endian bytes at `offset`.
pub fn write_f32_le(value: f32, data: &mut [u8], offset: usize) {
    data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    /// Exactly representable values must match the reference crate bit-for-bit.
    #[test]
    fn test_exact_values_match_reference() {
        let exact = [
            0.0f32, -0.0, 1.0, -1.0, 2.0, 0.5, -2.5, 1024.0, 65504.0, -65504.0,
            // Smallest normal half and smallest denorm half.
            6.103_515_6e-5,
            5.960_464_5e-8,
        ];
        for &v in &exact {
            assert_eq!(
                f32_to_half(v),
                f16::from_f32(v).to_bits(),
                "mismatch for exactly representable value {v}"
            );
        }
    }

    /// The table method truncates where the reference rounds to nearest, so
    /// results may differ by at most one ulp on non-representable values.
    #[test]
    fn test_within_one_ulp_of_reference() {
        let mut v = -1000.0f32;
        while v < 1000.0 {
            let ours = f32_to_half(v);
            let reference = f16::from_f32(v).to_bits();
            let diff = (ours as i32 - reference as i32).abs();
            assert!(diff <= 1, "value {v}: ours={ours:#06x} ref={reference:#06x}");
            v += 0.37;
        }
    }

    /// Values beyond the half range must map to infinity, not wrap.
    #[test]
    fn test_overflow_maps_to_infinity() {
        assert_eq!(f32_to_half(1.0e20), 0x7c00);
        assert_eq!(f32_to_half(-1.0e20), 0xfc00);
        assert_eq!(f32_to_half(f32::INFINITY), 0x7c00);
        assert_eq!(f32_to_half(f32::NEG_INFINITY), 0xfc00);
    }

    /// NaN must stay NaN (infinity exponent with a non-zero mantissa).
    #[test]
    fn test_nan_stays_nan() {
        let bits = f32_to_half(f32::NAN);
        assert_eq!(bits & 0x7c00, 0x7c00, "NaN must keep the max exponent");
        assert_ne!(bits & 0x03ff, 0, "NaN mantissa must not collapse to zero");
    }

    /// Values too small for a half denorm map to signed zero.
    #[test]
    fn test_tiny_values_flush_to_zero() {
        assert_eq!(f32_to_half(1.0e-10), 0x0000);
        assert_eq!(f32_to_half(-1.0e-10), 0x8000);
    }

    #[test]
    fn test_byte_writers_little_endian() {
        let mut buf = [0u8; 8];
        write_half_le(1.0, &mut buf, 2);
        assert_eq!(&buf[2..4], &0x3c00u16.to_le_bytes());

        write_f32_le(1.0, &mut buf, 4);
        assert_eq!(&buf[4..8], &1.0f32.to_le_bytes());
    }
}
