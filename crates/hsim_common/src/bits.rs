//! Width-bounded 2-state values carried on simulated wires.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Widest value a single wire can carry.
pub const MAX_WIDTH: u32 = 64;

/// Returns the all-ones mask for a value of `width` bits.
///
/// A width of 0 gives 0; widths of 64 or more give `u64::MAX`.
pub fn mask(width: u32) -> u64 {
    if width >= MAX_WIDTH {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// An unsigned 2-state value of a declared bit width.
///
/// The stored value never has bits set above `width`: constructing a `Bits`
/// from a wider integer drops the excess high bits, the same way a physical
/// wire of that width would.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bits {
    width: u32,
    value: u64,
}

impl Bits {
    /// Creates a zero value of the given width.
    ///
    /// # Panics
    ///
    /// Panics if `width` is 0 or greater than [`MAX_WIDTH`].
    pub fn zero(width: u32) -> Self {
        assert!(
            (1..=MAX_WIDTH).contains(&width),
            "bit width {width} out of range 1..={MAX_WIDTH}"
        );
        Self { width, value: 0 }
    }

    /// Creates a `Bits` from a `u64` value with the given width.
    ///
    /// Bits beyond the given width are ignored.
    pub fn from_u64(value: u64, width: u32) -> Self {
        let mut b = Self::zero(width);
        b.value = value & mask(width);
        b
    }

    /// Creates a single-bit value from a boolean.
    pub fn from_bool(value: bool) -> Self {
        Self::from_u64(value as u64, 1)
    }

    /// Returns the declared width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the value as a `u64`.
    pub fn to_u64(&self) -> u64 {
        self.value
    }

    /// Returns `true` if every bit is zero.
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Returns bit `index` (LSB = 0).
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn bit(&self, index: u32) -> bool {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        (self.value >> index) & 1 != 0
    }
}

impl fmt::Debug for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bits({self})")
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'h{:x}", self.width, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_widths() {
        assert_eq!(mask(0), 0);
        assert_eq!(mask(1), 1);
        assert_eq!(mask(17), 0x1_ffff);
        assert_eq!(mask(64), u64::MAX);
        assert_eq!(mask(80), u64::MAX);
    }

    #[test]
    fn zero_value() {
        let b = Bits::zero(8);
        assert_eq!(b.width(), 8);
        assert!(b.is_zero());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn zero_width_panics() {
        let _ = Bits::zero(0);
    }

    #[test]
    fn from_u64_truncates() {
        let b = Bits::from_u64(0x1_2345, 16);
        assert_eq!(b.to_u64(), 0x2345);
    }

    #[test]
    fn from_bool() {
        assert!(Bits::from_bool(true).bit(0));
        assert!(!Bits::from_bool(false).bit(0));
        assert_eq!(Bits::from_bool(true).width(), 1);
    }

    #[test]
    fn full_width_value() {
        let b = Bits::from_u64(u64::MAX, 64);
        assert_eq!(b.to_u64(), u64::MAX);
        assert!(b.bit(63));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn bit_out_of_bounds() {
        Bits::zero(4).bit(4);
    }

    #[test]
    fn display_sized_hex() {
        assert_eq!(Bits::from_u64(0x1fffe, 17).to_string(), "17'h1fffe");
        assert_eq!(Bits::zero(1).to_string(), "1'h0");
        assert_eq!(format!("{:?}", Bits::from_u64(5, 4)), "Bits(4'h5)");
    }

    #[test]
    fn serde_roundtrip() {
        let b = Bits::from_u64(0xab, 9);
        let json = serde_json::to_string(&b).unwrap();
        let back: Bits = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
    }
}
