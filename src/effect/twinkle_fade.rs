//! Random sparks held at a density target while everything fades.

use super::{Effect, Mode};
use crate::color::is_lit;
use crate::helper;
use crate::math8::qadd8;
use crate::strip::Strip;

#[derive(Default)]
pub struct TwinkleFadeEffect {
    last_fade: u32,
    initialized: bool,
}

impl Effect for TwinkleFadeEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !helper::validate(strip) {
            return false;
        }
        self.last_fade = strip.now_ms();
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
        let now = strip.now_ms();
        let min_delay = u32::from(strip.min_delay());

        if now - self.last_fade >= min_delay {
            let fade_amount = qadd8((strip.segment().beat88() >> 8) as u8, 12);
            strip.fade_out(fade_amount);
            self.last_fade = now;
        }

        let (a, b) = (rt.start as usize, rt.stop as usize);
        let num_sparks = strip.leds()[a..=b].iter().filter(|c| is_lit(**c)).count() as u16;

        let density = u16::from(strip.segment().twinkle_density);
        let max_sparks = helper::safe_map_u16(density, 0, 8, 0, rt.length);

        if num_sparks < max_sparks {
            let led_index = a + strip.random16_below(rt.length) as usize;
            if !is_lit(strip.leds()[led_index]) {
                let color_index = strip.random8();
                let brightness = strip.random8_range(128, 255);
                let color = strip.color_from_palette(color_index, brightness);
                strip.leds_mut()[led_index] = color;
            }
        }

        // tightest possible cadence, the fade above keeps its own clock
        0
    }

    fn mode_id(&self) -> Mode {
        Mode::TwinkleFade
    }
}
