//! Reference model of the adder.
//!
//! Computed with plain integer arithmetic, independently of the simulated
//! stage, and used as the oracle for every scenario.

use hsim_common::mask;

/// The sum of `a` and `b` as carried on a result channel of `width + 1` bits.
pub fn masked_sum(a: u64, b: u64, width: u32) -> u64 {
    a.wrapping_add(b) & mask(width + 1)
}

/// Expected result stream for pairwise operands.
///
/// Extra elements of the longer slice are ignored.
pub fn expected(a: &[u64], b: &[u64], width: u32) -> Vec<u64> {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| masked_sum(x, y, width))
        .collect()
}
