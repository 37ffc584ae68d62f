//! Pride: slowly shifting rainbow brightness waves (after Kriegsman).
//!
//! All four wave parameters are themselves beat-modulated, so the pattern
//! never visibly repeats. Brightness is a squared sine for contrast, with
//! a floor that keeps the strip from going fully dark.

use super::{Effect, Mode};
use crate::color::nblend;
use crate::helper;
use crate::strip::Strip;
use crate::wave::{beatsin88, sin16};

#[derive(Default)]
pub struct PrideEffect {
    pseudotime: u16,
    last_millis: u32,
    hue16: u16,
    initialized: bool,
}

impl PrideEffect {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn shaped_brightness(theta: u16, bright_depth: u8) -> u8 {
        let b16 = (i32::from(sin16(theta)) + 32768) as u16;
        let bri16 = ((u32::from(b16) * u32::from(b16)) / 65536) as u16;
        let bri8 = ((u32::from(bri16) * u32::from(bright_depth)) / 65536) as u8;
        bri8 + (255 - bright_depth)
    }
}

impl Effect for PrideEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !helper::validate(strip) {
            return false;
        }
        self.pseudotime = 0;
        self.last_millis = 0;
        self.hue16 = 0;
        self.initialized = true;
        strip.runtime_mut().modeinit = false;
        true
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        let rt = *strip.runtime();
        let beat = strip.segment().beat88();
        let now = strip.now_ms();

        let bright_depth = beatsin88(beat / 3 + 1, 96, 224, 0, now) as u8;
        let brightness_theta_inc = beatsin88(beat / 5 + 1, 25 * 256, 40 * 256, 0, now);
        let ms_multiplier = beatsin88(beat / 7 + 1, 23, 60, 0, now);
        let hue_inc = beatsin88(beat / 9 + 1, 1, 3000, 0, now);

        let deltams = (now.wrapping_sub(self.last_millis)) as u16;
        self.last_millis = now;
        self.pseudotime = self
            .pseudotime
            .wrapping_add(deltams.wrapping_mul(ms_multiplier));
        self.hue16 = self
            .hue16
            .wrapping_add(deltams.wrapping_mul(beatsin88((beat / 5) * 2 + 1, 5, 9, 0, now)));

        let mut hue16 = self.hue16;
        let mut brightness_theta = self.pseudotime;

        for i in 0..rt.length {
            hue16 = hue16.wrapping_add(hue_inc);
            let hue8 = (hue16 / 256) as u8;
            brightness_theta = brightness_theta.wrapping_add(brightness_theta_inc);
            let bri8 = Self::shaped_brightness(brightness_theta, bright_depth);

            let color = strip.color_from_palette(hue8, bri8);
            // paint back to front
            let pixel = rt.stop - i;
            nblend(&mut strip.leds_mut()[pixel as usize], color, 64);
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::Pride
    }
}
