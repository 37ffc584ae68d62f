//! Plasma: two phase-shifted waves summed per pixel.
//!
//! A cubic and a cosine wave at slightly different rates interfere along
//! the strip; a third oscillator subtracts brightness to carve moving dark
//! valleys. New colors are always blended over the previous frame, never
//! written flat, which is what makes the flow look liquid.

use super::{Effect, EffectCore, Mode};
use crate::color::nblend;
use crate::helper;
use crate::math8::{cos8, cubicwave8, qsuba};
use crate::strip::Strip;
use crate::wave::beatsin88;

const CUBIC_WAVE_FREQUENCY: u16 = 9;
const COS_WAVE_FREQUENCY: u16 = 3;
const BLEND_AMOUNT: u8 = 128;

#[derive(Default)]
pub struct PlasmaEffect {
    core: EffectCore,
}

impl Effect for PlasmaEffect {
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
        let now = strip.now_ms();
        let tb = self.core.timebase;

        let primary_phase = beatsin88(beat, 0, 255, tb, now) as u8;
        let secondary_phase = beatsin88((beat / 10).saturating_mul(11), 0, 255, tb, now) as u8;
        let brightness_modulator =
            beatsin88((beat / 10).saturating_mul(12), 0, 128, tb, now) as u8;

        for k in rt.start..rt.stop {
            let rel = k - rt.start;
            let cubic = cubicwave8(((rel * CUBIC_WAVE_FREQUENCY) as u8).wrapping_add(primary_phase)) / 2;
            let cosine = cos8(((rel * COS_WAVE_FREQUENCY) as u8).wrapping_add(secondary_phase)) / 2;
            let color_index = cubic.wrapping_add(cosine).wrapping_add(rt.base_hue);

            // the dead zone: high modulator values hollow out the valleys
            let brightness = qsuba(color_index, brightness_modulator);

            let new_color = strip.color_from_palette(color_index, brightness);
            nblend(&mut strip.leds_mut()[k as usize], new_color, BLEND_AMOUNT);
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::Plasma
    }
}
