//! Coherent 8-bit gradient noise.
//!
//! Classic permutation-table Perlin noise sampled on a 8.8 fixed-point
//! lattice. Deterministic: the same `(x, y)` always yields the same value,
//! which is what lets noise-driven effects move "organically" while staying
//! reproducible in tests.

use crate::math8::ease8_in_out_quad;

#[rustfmt::skip]
const P: [u8; 256] = [
    151, 160, 137,  91,  90,  15, 131,  13, 201,  95,  96,  53, 194, 233,   7, 225,
    140,  36, 103,  30,  69, 142,   8,  99,  37, 240,  21,  10,  23, 190,   6, 148,
    247, 120, 234,  75,   0,  26, 197,  62,  94, 252, 219, 203, 117,  35,  11,  32,
     57, 177,  33,  88, 237, 149,  56,  87, 174,  20, 125, 136, 171, 168,  68, 175,
     74, 165,  71, 134, 139,  48,  27, 166,  77, 146, 158, 231,  83, 111, 229, 122,
     60, 211, 133, 230, 220, 105,  92,  41,  55,  46, 245,  40, 244, 102, 143,  54,
     65,  25,  63, 161,   1, 216,  80,  73, 209,  76, 132, 187, 208,  89,  18, 169,
    200, 196, 135, 130, 116, 188, 159,  86, 164, 100, 109, 198, 173, 186,   3,  64,
     52, 217, 226, 250, 124, 123,   5, 202,  38, 147, 118, 126, 255,  82,  85, 212,
    207, 206,  59, 227,  47,  16,  58,  17, 182, 189,  28,  42, 223, 183, 170, 213,
    119, 248, 152,   2,  44, 154, 163,  70, 221, 153, 101, 155, 167,  43, 172,   9,
    129,  22,  39, 253,  19,  98, 108, 110,  79, 113, 224, 232, 178, 185, 112, 104,
    218, 246,  97, 228, 251,  34, 242, 193, 238, 210, 144,  12, 191, 179, 162, 241,
     81,  51, 145, 235, 249,  14, 239, 107,  49, 192, 214,  31, 181, 199, 106, 157,
    184,  84, 204, 176, 115, 121,  50,  45, 127,   4, 150, 254, 138, 236, 205,  93,
    222, 114,  67,  29,  24,  72, 243, 141, 128, 195,  78,  66, 215,  61, 156, 180,
];

#[inline]
fn perm(i: u8) -> u8 {
    P[i as usize]
}

/// Gradient contribution: picks one of eight axis combinations from the
/// hash and projects the in-cell offsets onto it. Offsets are signed
/// half-range (-128..127 representing -1.0..1.0).
#[inline]
fn grad8(hash: u8, x: i16, y: i16) -> i16 {
    let (mut u, mut v) = if hash & 4 == 0 { (x, y) } else { (y, x) };
    if hash & 1 != 0 {
        u = -u;
    }
    if hash & 2 != 0 {
        v = -v;
    }
    (u + v) / 2
}

#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp15(a: i16, b: i16, frac: u8) -> i16 {
    let delta = i32::from(b) - i32::from(a);
    (i32::from(a) + (delta * i32::from(frac)) / 255) as i16
}

/// 2D coherent noise over an 8.8 fixed-point lattice, output 0-255
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn inoise8_2d(x: u16, y: u16) -> u8 {
    let cx = (x >> 8) as u8;
    let cy = (y >> 8) as u8;
    let fx = (x & 0xFF) as u8;
    let fy = (y & 0xFF) as u8;

    // In-cell offsets in signed half-range: 0..127 from the near corner,
    // the same minus 128 from the far corner.
    let xx = i16::from(fx >> 1);
    let yy = i16::from(fy >> 1);

    let a = perm(cx).wrapping_add(cy);
    let b = perm(cx.wrapping_add(1)).wrapping_add(cy);

    let u = ease8_in_out_quad(fx);
    let v = ease8_in_out_quad(fy);

    let x1 = lerp15(
        grad8(perm(a), xx, yy),
        grad8(perm(b), xx - 128, yy),
        u,
    );
    let x2 = lerp15(
        grad8(perm(a.wrapping_add(1)), xx, yy - 128),
        grad8(perm(b.wrapping_add(1)), xx - 128, yy - 128),
        u,
    );
    let n = lerp15(x1, x2, v);

    // Recenter -128..127 to 0..255 with saturation at the rims
    let out = n + 128;
    if out < 0 {
        0
    } else if out > 255 {
        255
    } else {
        out as u8
    }
}

/// 1D coherent noise, output 0-255
#[inline]
pub fn inoise8(x: u16) -> u8 {
    inoise8_2d(x, 0)
}
