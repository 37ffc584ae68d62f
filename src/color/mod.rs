//! Pixel color types and per-pixel operations.

mod bezier;
mod kelvin;
mod palette;

use smart_leds::{RGB8, hsv::Hsv as HSV, hsv::hsv2rgb};

pub use bezier::ColorCurve;
pub use kelvin::kelvin_to_rgb;
pub use palette::{BlendType, Palette16, PaletteId, blend_palette_toward, fill_palette};

use crate::math8::{blend8, qadd8, qsub8, scale8, scale8_video};

pub type Rgb = RGB8;
pub type Hsv = HSV;

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Create an RGB color from a u32 value (0xRRGGBB format)
#[allow(clippy::cast_possible_truncation)]
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Convert HSV to RGB (rainbow mapping)
pub fn hsv_to_rgb(hsv: Hsv) -> Rgb {
    hsv2rgb(hsv)
}

/// Blend two RGB colors
///
/// # Arguments
/// * `a` - First color
/// * `b` - Second color
/// * `amount_of_b` - Blend factor (0 = all a, 255 = all b)
#[inline]
pub const fn blend_colors(a: Rgb, b: Rgb, amount_of_b: u8) -> Rgb {
    Rgb {
        r: blend8(a.r, b.r, amount_of_b),
        g: blend8(a.g, b.g, amount_of_b),
        b: blend8(a.b, b.b, amount_of_b),
    }
}

/// Move `dst` a fraction `amount / 255` toward `src`, in place
#[inline]
pub fn nblend(dst: &mut Rgb, src: Rgb, amount: u8) {
    *dst = blend_colors(*dst, src, amount);
}

/// Saturating per-channel add (no wraparound)
#[inline]
pub const fn qadd_rgb(a: Rgb, b: Rgb) -> Rgb {
    Rgb {
        r: qadd8(a.r, b.r),
        g: qadd8(a.g, b.g),
        b: qadd8(a.b, b.b),
    }
}

/// Saturating per-channel subtract
#[inline]
pub const fn qsub_rgb(a: Rgb, b: Rgb) -> Rgb {
    Rgb {
        r: qsub8(a.r, b.r),
        g: qsub8(a.g, b.g),
        b: qsub8(a.b, b.b),
    }
}

/// Per-channel maximum; the lightweight "or" compositing used when bars
/// overlap an already lit background.
#[inline]
pub const fn or_rgb(a: Rgb, b: Rgb) -> Rgb {
    Rgb {
        r: if a.r > b.r { a.r } else { b.r },
        g: if a.g > b.g { a.g } else { b.g },
        b: if a.b > b.b { a.b } else { b.b },
    }
}

/// Scale every channel by `scale`
#[inline]
pub const fn nscale8(c: Rgb, scale: u8) -> Rgb {
    Rgb {
        r: scale8(c.r, scale),
        g: scale8(c.g, scale),
        b: scale8(c.b, scale),
    }
}

/// Video-scale every channel (lit channels never drop to zero)
#[inline]
pub const fn nscale8_video(c: Rgb, scale: u8) -> Rgb {
    Rgb {
        r: scale8_video(c.r, scale),
        g: scale8_video(c.g, scale),
        b: scale8_video(c.b, scale),
    }
}

/// Per-channel bitwise inversion
#[inline]
pub const fn invert_rgb(c: Rgb) -> Rgb {
    Rgb {
        r: !c.r,
        g: !c.g,
        b: !c.b,
    }
}

/// Add a constant to every channel, saturating
#[inline]
pub const fn add_to_rgb(c: Rgb, amount: u8) -> Rgb {
    Rgb {
        r: qadd8(c.r, amount),
        g: qadd8(c.g, amount),
        b: qadd8(c.b, amount),
    }
}

/// Rec.601-weighted luma of a pixel
#[inline]
pub const fn luma(c: Rgb) -> u8 {
    scale8(c.r, 54) + scale8(c.g, 183) + scale8(c.b, 18)
}

/// Plain channel average
#[inline]
pub const fn average_light(c: Rgb) -> u8 {
    scale8(c.r, 85) + scale8(c.g, 85) + scale8(c.b, 85)
}

pub const fn is_lit(c: Rgb) -> bool {
    c.r != 0 || c.g != 0 || c.b != 0
}

/// Fade a pixel run toward black by `amount / 256`
pub fn fade_to_black_by(leds: &mut [Rgb], amount: u8) {
    let keep = 255 - amount;
    for led in leds {
        *led = nscale8(*led, keep);
    }
}

/// Fill a pixel run with one color
pub fn fill_solid(leds: &mut [Rgb], color: Rgb) {
    for led in leds {
        *led = color;
    }
}

/// One-dimensional blur: each pixel keeps `1 - amount/255` of itself and
/// spills half the remainder to each neighbour.
pub fn blur1d(leds: &mut [Rgb], blur_amount: u8) {
    let keep = 255 - blur_amount;
    let seep = blur_amount >> 1;
    let mut carryover = BLACK;
    for i in 0..leds.len() {
        let cur = leds[i];
        let part = nscale8(cur, seep);
        let mixed = qadd_rgb(nscale8(cur, keep), carryover);
        if i > 0 {
            let prev = qadd_rgb(leds[i - 1], part);
            leds[i - 1] = prev;
        }
        leds[i] = mixed;
        carryover = part;
    }
}
