//! Bit-reversal and power-of-two helpers shared by the FFT table builders.

/// Reverse all 32 bits of `x`.
#[inline]
pub fn reverse_bits_u32(x: u32) -> u32 {
    x.reverse_bits()
}

/// Reverse the low `bits` bits of `i` (the bit-reversal permutation index
/// for an FFT of size `2^bits`).
///
/// # Panics
///
/// Panics in debug builds if `bits` is 0 or greater than 32.
#[inline]
pub fn bit_reverse(i: u32, bits: u32) -> u32 {
    debug_assert!(bits >= 1 && bits <= 32, "bits out of range: {bits}");
    i.reverse_bits() >> (32 - bits)
}

/// Return `log2(n)` if `n` is a power of two, `None` otherwise.
#[inline]
pub fn log2_exact(n: usize) -> Option<u32> {
    if n.is_power_of_two() {
        Some(n.trailing_zeros())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_reverse_small_widths() {
        // 3-bit reversals: 0b001 -> 0b100, 0b011 -> 0b110.
        assert_eq!(bit_reverse(0b001, 3), 0b100);
        assert_eq!(bit_reverse(0b011, 3), 0b110);
        assert_eq!(bit_reverse(0b111, 3), 0b111);
        assert_eq!(bit_reverse(0, 3), 0);
    }

    /// Reversal is an involution: applying it twice returns the input.
    #[test]
    fn test_bit_reverse_involution() {
        for bits in [1u32, 4, 8, 10] {
            let n = 1u32 << bits;
            for i in 0..n {
                assert_eq!(bit_reverse(bit_reverse(i, bits), bits), i);
            }
        }
    }

    /// The permutation for width `bits` is a bijection over `0..2^bits`.
    #[test]
    fn test_bit_reverse_is_permutation() {
        let bits = 8;
        let mut seen = vec![false; 1 << bits];
        for i in 0..(1u32 << bits) {
            let r = bit_reverse(i, bits) as usize;
            assert!(!seen[r], "index {r} produced twice");
            seen[r] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_log2_exact() {
        assert_eq!(log2_exact(256), Some(8));
        assert_eq!(log2_exact(1024), Some(10));
        assert_eq!(log2_exact(1), Some(0));
        assert_eq!(log2_exact(0), None);
        assert_eq!(log2_exact(300), None);
    }

    #[test]
    fn test_reverse_bits_u32_full_width() {
        assert_eq!(reverse_bits_u32(1), 0x8000_0000);
        assert_eq!(reverse_bits_u32(0x8000_0000), 1);
    }
}
