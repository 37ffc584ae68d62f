//! 8-bit fixed-point math helpers.
//!
//! Integer-only building blocks used by the wave generators and pixel
//! operations. The value range 0-255 maps to 0.0-1.0 unless noted.

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Video variant of [`scale8`]: a non-zero input never scales down to zero
/// (so a dim pixel stays lit instead of blinking off).
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8_video(value: u8, scale: u8) -> u8 {
    let result = ((value as u16 * scale as u16) >> 8) as u8;
    if value != 0 && scale != 0 {
        result + 1
    } else {
        result
    }
}

/// Blend two 8-bit values
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn blend8(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let delta = b as i16 - a as i16;

    let mut partial: u32 = (a as u32) << 16; // a * 65536
    partial = partial.wrapping_add(
        (delta as u32)
            .wrapping_mul(amount_of_b as u32)
            .wrapping_mul(257),
    ); // (b - a) * amount_of_b * 257
    partial = partial.wrapping_add(0x8000); // + 32768 for rounding

    (partial >> 16) as u8
}

/// Saturating 8-bit add
#[inline]
pub const fn qadd8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Saturating 8-bit subtract
#[inline]
pub const fn qsub8(a: u8, b: u8) -> u8 {
    a.saturating_sub(b)
}

/// Subtract with a floor of zero, leaving the value untouched when the
/// subtrahend is larger ("analog unsigned subtract", used for plasma
/// dead zones).
#[inline]
pub const fn qsuba(value: u8, sub: u8) -> u8 {
    if value > sub { value - sub } else { 0 }
}

/// Map an 8-bit value into the range `[range_start, range_end]`
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn map8(value: u8, range_start: u8, range_end: u8) -> u8 {
    let range_width = (range_end - range_start) as u16;
    let out = ((value as u16 * range_width) >> 8) as u8;
    out + range_start
}

/// Linear interpolation between two u8 values with an 8-bit fraction
#[inline]
pub const fn lerp8by8(a: u8, b: u8, frac: u8) -> u8 {
    if b > a {
        a + scale8(b - a, frac)
    } else {
        a - scale8(a - b, frac)
    }
}

/// Triangle wave: 0 at 0, peak 254 at 128, back to 0 at 255
#[inline]
pub const fn triwave8(x: u8) -> u8 {
    let j = if x & 0x80 != 0 { 255 - x } else { x };
    j << 1
}

/// Ease in out quadratic
pub const fn ease8_in_out_quad(i: u8) -> u8 {
    let j = if i & 0x80 != 0 { 255 - i } else { i };
    let jj = scale8(j, j);
    let jj2 = jj << 1;
    if i & 0x80 == 0 { jj2 } else { 255 - jj2 }
}

/// Ease in out cubic: steeper S-curve than the quadratic variant
#[allow(clippy::cast_possible_truncation)]
pub const fn ease8_in_out_cubic(i: u8) -> u8 {
    let ii = scale8(i, i);
    let iii = scale8(ii, i);
    let r1 = (3 * ii as u16).wrapping_sub(2 * iii as u16);
    if r1 & 0x100 != 0 { 255 } else { r1 as u8 }
}

/// Triangle wave smoothed with quadratic easing
#[inline]
pub const fn quadwave8(x: u8) -> u8 {
    ease8_in_out_quad(triwave8(x))
}

/// Triangle wave smoothed with cubic easing
#[inline]
pub const fn cubicwave8(x: u8) -> u8 {
    ease8_in_out_cubic(triwave8(x))
}

/// 8-bit sine, input is a full circle in 0-255
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn sin8(theta: u8) -> u8 {
    let s = crate::wave::sin16((theta as u16) << 8);
    (((s as i32) + 32768) >> 8) as u8
}

/// 8-bit cosine
#[inline]
pub const fn cos8(theta: u8) -> u8 {
    sin8(theta.wrapping_add(64))
}

/// Sharp linear attack, slower decay. Natural-looking brightness curve for
/// twinkle effects: phase 0-85 ramps up, 86-255 decays at 1.5x slower rate.
pub const fn attack_decay_wave8(phase: u8) -> u8 {
    if phase < 86 {
        phase.saturating_mul(3)
    } else {
        let p = phase - 86;
        255 - (p + (p / 2))
    }
}

/// Combine multiple u8 adjusters
pub type U8Adjuster = fn(value: u8) -> u8;
