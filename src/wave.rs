//! 16-bit periodic waves and wall-clock beat generators.
//!
//! All generators are pure: given the same `(period, timebase, now)` they
//! produce the same output, which keeps effects deterministic and testable.
//! Speeds are expressed in "beat88" units, a Q8.8 beats-per-minute value
//! where 256 is one beat per minute.

use crate::math8::scale8;

/// Scale a 16-bit value by a 16-bit factor (65535 = 1.0)
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale16(value: u16, scale: u16) -> u16 {
    ((value as u32 * (1 + scale as u32)) >> 16) as u16
}

// Piecewise-linear sine approximation. Eight 2048-wide segments per
// quarter wave, interpolated from base value + slope tables.
const SIN16_BASE: [u16; 8] = [0, 6393, 12539, 18204, 23170, 27245, 30273, 32137];
const SIN16_SLOPE: [u8; 8] = [49, 48, 44, 38, 31, 23, 14, 4];

/// 16-bit sine, input is a full circle in 0-65535, output -32645..32645
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const fn sin16(theta: u16) -> i16 {
    let offset = if theta & 0x4000 != 0 {
        // falling quarter: mirror the rising one
        0x3FFF - (theta & 0x3FFF)
    } else {
        theta & 0x3FFF
    };

    let section = (offset / 2048) as usize;
    let b = SIN16_BASE[section];
    let m = SIN16_SLOPE[section] as u16;
    let secoffset = (offset % 2048) / 16; // 0..127 within the section
    let y = (b + m * secoffset) as i16;

    if theta & 0x8000 != 0 { -y } else { y }
}

/// 16-bit cosine
#[inline]
pub const fn cos16(theta: u16) -> i16 {
    sin16(theta.wrapping_add(16384))
}

/// Symmetric triangle wave over the full 16-bit range:
/// `0 -> 0`, `32768 -> 65535`, `65535 -> 0`.
///
/// If the high bit is set the input is inverted before doubling, which keeps
/// both ramps exactly linear without a branchy midpoint special case.
#[inline]
pub const fn triwave16(x: u16) -> u16 {
    let j = if x & 0x8000 != 0 { 65535 - x } else { x };
    j << 1
}

/// 16-bit quadratic in/out easing. `f(0)=0`, `f(32768)=32768`,
/// `f(65535)=65535`, point-symmetric about the midpoint.
pub const fn ease16_in_out_quad(i: u16) -> u16 {
    let j = if i & 0x8000 != 0 { 65535 - i } else { i };
    let jj = scale16(j, j);
    let jj2 = jj << 1;
    if i & 0x8000 == 0 { jj2 } else { 65535 - jj2 }
}

/// 16-bit cubic in/out easing, same fixed points as the quadratic one
/// but with a steeper center slope.
///
/// Computed as `4t^3` on the folded lower half and mirrored, which keeps
/// the point symmetry about the midpoint exact.
#[allow(clippy::cast_possible_truncation)]
pub const fn ease16_in_out_cubic(i: u16) -> u16 {
    const FULL_SQ: u64 = 65535 * 65535;
    let j = if i & 0x8000 != 0 { 65535 - i } else { i } as u64;
    let r = ((4 * j * j * j + FULL_SQ / 2) / FULL_SQ) as u16;
    if i & 0x8000 != 0 { 65535 - r } else { r }
}

/// Triangle wave smoothed with quadratic easing
#[inline]
pub const fn quadwave16(x: u16) -> u16 {
    ease16_in_out_quad(triwave16(x))
}

/// Triangle wave smoothed with cubic easing
#[inline]
pub const fn cubicwave16(x: u16) -> u16 {
    ease16_in_out_cubic(triwave16(x))
}

/// Monotonically advancing beat phase.
///
/// Returns a sawtooth in 0-65535 that completes `beats88 / 256` cycles per
/// minute of wall-clock time, anchored at `timebase` (both in milliseconds).
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn beat88(beats88: u16, timebase: u32, now_ms: u32) -> u16 {
    // BPM is 'beats per minute' in Q8.8, so shift the product down by 16:
    // 280 =~ 65536 / 60000 * 256.
    ((now_ms.wrapping_sub(timebase).wrapping_mul(beats88 as u32).wrapping_mul(280)) >> 16) as u16
}

/// Beat phase for a whole-number BPM (values below 256 are taken as whole
/// beats per minute, larger values as already being Q8.8).
#[inline]
pub const fn beat16(beats_per_minute: u16, timebase: u32, now_ms: u32) -> u16 {
    let bpm88 = if beats_per_minute < 256 {
        beats_per_minute << 8
    } else {
        beats_per_minute
    };
    beat88(bpm88, timebase, now_ms)
}

/// 8-bit beat phase
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn beat8(beats_per_minute: u16, timebase: u32, now_ms: u32) -> u8 {
    (beat16(beats_per_minute, timebase, now_ms) >> 8) as u8
}

/// Sine oscillation between `lowest` and `highest` at a Q8.8 BPM rate,
/// with an additional phase offset.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn beatsin88_phase(
    beats88: u16,
    lowest: u16,
    highest: u16,
    timebase: u32,
    phase: u16,
    now_ms: u32,
) -> u16 {
    let beat = beat88(beats88, timebase, now_ms);
    let beatsin = (sin16(beat.wrapping_add(phase)) as i32 + 32768) as u16;
    let range = highest - lowest;
    lowest + scale16(beatsin, range)
}

/// Sine oscillation between `lowest` and `highest` at a Q8.8 BPM rate
#[inline]
pub const fn beatsin88(beats88: u16, lowest: u16, highest: u16, timebase: u32, now_ms: u32) -> u16 {
    beatsin88_phase(beats88, lowest, highest, timebase, 0, now_ms)
}

/// Sine oscillation for a whole-number BPM
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn beatsin16_phase(
    beats_per_minute: u16,
    lowest: u16,
    highest: u16,
    timebase: u32,
    phase: u16,
    now_ms: u32,
) -> u16 {
    let beat = beat16(beats_per_minute, timebase, now_ms);
    let beatsin = (sin16(beat.wrapping_add(phase)) as i32 + 32768) as u16;
    let range = highest - lowest;
    lowest + scale16(beatsin, range)
}

/// Sine oscillation for a whole-number BPM, no phase offset
#[inline]
pub const fn beatsin16(
    beats_per_minute: u16,
    lowest: u16,
    highest: u16,
    timebase: u32,
    now_ms: u32,
) -> u16 {
    beatsin16_phase(beats_per_minute, lowest, highest, timebase, 0, now_ms)
}

/// 8-bit sine oscillation between `lowest` and `highest`
#[allow(clippy::cast_possible_truncation)]
pub const fn beatsin8(
    beats_per_minute: u16,
    lowest: u8,
    highest: u8,
    timebase: u32,
    now_ms: u32,
) -> u8 {
    let beat = beat8(beats_per_minute, timebase, now_ms);
    let beatsin = crate::math8::sin8(beat);
    let range = highest - lowest;
    lowest + scale8(beatsin, range)
}
