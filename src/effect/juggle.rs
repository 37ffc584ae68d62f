//! Several bars bouncing at staggered speeds, juggling-ball style.

use super::{Effect, EffectCore, Mode};
use crate::helper;
use crate::math8::qadd8;
use crate::strip::Strip;
use crate::wave::beatsin88;

const MIN_BAR_WIDTH: u16 = 2;
const FADE_AMOUNT: u8 = 96;
const HUE_CHANGE_INTERVAL_MS: u32 = 100;
const MAX_HUE_DELTA: u8 = 32;

#[derive(Default)]
pub struct JuggleEffect {
    core: EffectCore,
    current_hue: u8,
    last_hue_change: u32,
}

impl Effect for JuggleEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !self.core.standard_init(strip) {
            return false;
        }
        self.current_hue = 0;
        self.last_hue_change = strip.now_ms();
        true
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        let rt = *strip.runtime();
        let now = strip.now_ms();
        let bar_width = helper::proportional_width(strip, 15, MIN_BAR_WIDTH);

        if now - self.last_hue_change >= HUE_CHANGE_INTERVAL_MS {
            self.current_hue =
                strip.random8_range(self.current_hue, qadd8(self.current_hue, MAX_HUE_DELTA));
            self.last_hue_change = now;
        }

        strip.fade_out(FADE_AMOUNT);

        let num_bars = u16::from(strip.segment().num_bars().max(1));
        let beat = strip.segment().beat88();
        let mut working_hue = self.current_hue;
        let pal = *strip.current_palette();

        for i in 0..num_bars {
            let bar_speed = (beat / 2).max(1) + i * (beat / num_bars);
            let position = beatsin88(
                bar_speed,
                rt.start * 16,
                (rt.stop * 16)
                    .saturating_sub(bar_width * 16)
                    .max(rt.start * 16),
                self.core.timebase,
                now,
            );
            #[allow(clippy::cast_possible_truncation)]
            let color_index = working_hue.wrapping_add((255 / num_bars.min(255)) as u8 * i as u8);
            strip.draw_fractional_bar(
                i32::from(position),
                bar_width,
                &pal,
                color_index,
                255,
                true,
                1,
            );

            // small per-bar hue wander around the base
            let delta_hue = strip.random8_below(9);
            working_hue = if delta_hue < 5 {
                working_hue.wrapping_sub(delta_hue).wrapping_add(rt.base_hue)
            } else {
                working_hue
                    .wrapping_add(delta_hue / 2)
                    .wrapping_add(rt.base_hue)
            };
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::JugglePal
    }
}
