//! Small deterministic pseudo-random generator.
//!
//! A 16-bit LCG (`seed * 2053 + 13849`) owned by the strip, so every random
//! decision an effect makes flows from one seedable state. Seeding the strip
//! identically reproduces identical frames.

use crate::math8::scale8;

#[derive(Debug, Clone)]
pub struct Random16 {
    seed: u16,
}

impl Random16 {
    pub const fn new(seed: u16) -> Self {
        Self { seed }
    }

    /// Next raw 16-bit value
    pub fn random16(&mut self) -> u16 {
        self.seed = self.seed.wrapping_mul(2053).wrapping_add(13849);
        self.seed
    }

    /// Next 8-bit value, folding both halves of the state together
    #[allow(clippy::cast_possible_truncation)]
    pub fn random8(&mut self) -> u8 {
        let r = self.random16();
        ((r >> 8) as u8).wrapping_add(r as u8)
    }

    /// Random value below `limit` (returns 0 for `limit == 0`)
    pub fn random8_below(&mut self, limit: u8) -> u8 {
        scale8(self.random8(), limit)
    }

    /// Random value in `[low, high)`
    pub fn random8_range(&mut self, low: u8, high: u8) -> u8 {
        low + self.random8_below(high.wrapping_sub(low))
    }

    /// Random 16-bit value below `limit`
    #[allow(clippy::cast_possible_truncation)]
    pub fn random16_below(&mut self, limit: u16) -> u16 {
        ((u32::from(self.random16()) * u32::from(limit)) >> 16) as u16
    }

    /// Random 16-bit value in `[low, high)`
    pub fn random16_range(&mut self, low: u16, high: u16) -> u16 {
        low + self.random16_below(high.wrapping_sub(low))
    }

    /// A new color-wheel index at least `dist` away from `pos` (both
    /// directions wrap). Keeps consecutive random colors visually distinct.
    pub fn random_wheel_index(&mut self, pos: u8, dist: u8) -> u8 {
        let dist = if dist < 85 { dist } else { 85 };
        pos.wrapping_add(self.random8_range(dist, 255 - dist))
    }
}

impl Default for Random16 {
    fn default() -> Self {
        Self::new(1337)
    }
}
