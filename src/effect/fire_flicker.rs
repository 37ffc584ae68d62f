//! Palette fill with random subtractive flicker.

use super::{Effect, EffectCore, Mode};
use crate::color::{Rgb, nblend, qsub_rgb};
use crate::helper;
use crate::strip::Strip;

#[derive(Default)]
pub struct FireFlickerEffect {
    core: EffectCore,
}

impl Effect for FireFlickerEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        self.core.standard_init(strip)
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
        let brightness = strip.segment().brightness();

        for i in rt.start..=rt.stop {
            let color_index =
                (helper::safe_map_u16(i, rt.start, rt.stop, 0, 255) as u8).wrapping_add(rt.base_hue);
            let color = strip.color_from_palette(color_index, brightness);
            strip.leds_mut()[i as usize] = color;

            // flicker roughly two of three pixels each frame
            if strip.random8_below(3) != 0 {
                let flicker = Rgb {
                    r: strip.random8(),
                    g: strip.random8(),
                    b: strip.random8(),
                };
                let dimmed = qsub_rgb(color, flicker);
                nblend(&mut strip.leds_mut()[i as usize], dimmed, 96);
            }
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::FireFlickerIntense
    }
}
