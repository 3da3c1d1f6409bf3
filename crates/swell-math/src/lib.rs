//! Half-float lookup-table encoding and bit-manipulation primitives for the Swell ocean simulation.

mod bits;
mod half;

pub use bits::{bit_reverse, log2_exact, reverse_bits_u32};
pub use half::{f32_to_half, f32_to_half_bits, write_f32_le, write_half_le};
