//! Color waves: the pride machinery with a folded hue ramp.

use super::{Effect, EffectCore, Mode};
use crate::color::nblend;
use crate::helper;
use crate::math8::scale8;
use crate::strip::Strip;
use crate::wave::{beatsin88, sin16};

#[derive(Default)]
pub struct ColorWavesEffect {
    core: EffectCore,
    pseudotime: u16,
    last_millis: u32,
    hue16: u16,
}

impl ColorWavesEffect {
    /// Fold the 16-bit hue into an up-down ramp before scaling to the
    /// palette range.
    #[allow(clippy::cast_possible_truncation)]
    fn shape_hue(hue16: u16) -> u8 {
        let h128 = hue16 >> 7;
        if h128 & 0x100 != 0 {
            255 - (h128 >> 1) as u8
        } else {
            (h128 >> 1) as u8
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn shaped_brightness(theta: u16, bright_depth: u8) -> u8 {
        let sine = (i32::from(sin16(theta)) + 32768) as u16;
        let squared = ((u32::from(sine) * u32::from(sine)) / 65536) as u16;
        let modulated = ((u32::from(squared) * u32::from(bright_depth)) / 65536) as u8;
        modulated + (255 - bright_depth)
    }
}

impl Effect for ColorWavesEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !self.core.standard_init(strip) {
            return false;
        }
        self.pseudotime = 0;
        self.hue16 = 0;
        self.last_millis = strip.now_ms().saturating_sub(u32::from(strip.min_delay()));
        true
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        let rt = *strip.runtime();
        let beat = strip.segment().beat88();
        let now = strip.now_ms();

        let bright_depth = beatsin88((beat / 3 + 5).max(7), 96, 224, 0, now) as u8;
        let bright_theta_inc = beatsin88((beat / 4 + 2).max(5), 25 * 256, 40 * 256, 0, now);
        let ms_multiplier = beatsin88((beat / 6).saturating_sub(9).max(3), 23, 60, 0, now);
        let hue_inc = beatsin88((beat / 8).saturating_sub(12).max(2), 300, 1500, 0, now);

        let deltams = (now.wrapping_sub(self.last_millis)) as u16;
        self.last_millis = now;
        self.pseudotime = self
            .pseudotime
            .wrapping_add(deltams.wrapping_mul(ms_multiplier));
        self.hue16 = self.hue16.wrapping_add(
            deltams.wrapping_mul(beatsin88(((beat * 4) / 10).max(8), 5, 9, 0, now)),
        );

        let mut brightness_theta = self.pseudotime;

        for i in 0..rt.length {
            let pixel_hue16 = self.hue16.wrapping_add(i.wrapping_mul(hue_inc));
            let shaped = Self::shape_hue(pixel_hue16);
            brightness_theta = brightness_theta.wrapping_add(bright_theta_inc);
            let brightness = Self::shaped_brightness(brightness_theta, bright_depth);

            let palette_index = scale8(shaped, 240);
            let color = strip.color_from_palette(palette_index, brightness);

            let pixel = rt.start + (rt.length - 1 - i);
            nblend(&mut strip.leds_mut()[pixel as usize], color, 128);
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::ColorWaves
    }
}
