//! Pulse racing from both ends toward the center.

use super::{Effect, EffectCore, Mode};
use crate::color::fill_palette;
use crate::helper;
use crate::strip::Strip;
use crate::wave::beatsin88;

const SPEED_MULTIPLIER: u16 = 5;
const SPEED_THRESHOLD: u16 = 13107;
const FADE_THRESHOLD: u16 = 16320;
const MIN_FADE: u8 = 32;
const HUE_INCREMENT: u8 = 4;

#[derive(Default)]
pub struct ToInnerEffect {
    core: EffectCore,
}

impl Effect for ToInnerEffect {
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
        let beat = strip.segment().beat88();
        let center_length = rt.length / 2 + 1;

        let fade_amount = if beat.saturating_mul(SPEED_MULTIPLIER) <= FADE_THRESHOLD {
            ((beat.saturating_mul(SPEED_MULTIPLIER)) >> 6) as u8
        } else {
            255
        };
        strip.fade_out(fade_amount.max(MIN_FADE));

        let beat_speed = if beat < SPEED_THRESHOLD {
            beat * SPEED_MULTIPLIER
        } else {
            65535
        };
        let pulse_length = beatsin88(
            beat_speed,
            0,
            center_length,
            self.core.timebase,
            strip.now_ms(),
        );

        let pal = *strip.current_palette();
        let blend = strip.segment().blend_type;
        let from = rt.start as usize;
        let to = (from + pulse_length as usize).min(rt.stop as usize + 1);
        fill_palette(
            &mut strip.leds_mut()[from..to],
            &pal,
            rt.base_hue,
            HUE_INCREMENT,
            255,
            blend,
        );

        // mirror the lower half onto the upper half, inward
        let len = rt.length as usize;
        for k in 0..(pulse_length as usize).min(len / 2) {
            let src = from + k;
            let dst = from + len - 1 - k;
            let c = strip.leds()[src];
            strip.leds_mut()[dst] = c;
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::ToInner
    }
}
