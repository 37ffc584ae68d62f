//! A bar steered by coherent noise instead of a beat wave.

use super::{Effect, EffectCore, Mode};
use crate::helper;
use crate::noise::inoise8_2d;
use crate::strip::Strip;
use crate::wave::beatsin88;

const BAR_WIDTH: u16 = 6;
const FADE_AMOUNT: u8 = 48;
const NOISE_Y_SCALE: u16 = 1000;

#[derive(Default)]
pub struct NoiseMoverEffect {
    core: EffectCore,
    noise_dist: u16,
}

impl Effect for NoiseMoverEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !self.core.standard_init(strip) {
            return false;
        }
        self.noise_dist = 1234;
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
        let noise_value = inoise8_2d(rt.length, self.noise_dist.wrapping_add(NOISE_Y_SCALE));
        let pos16 = helper::safe_map_u16(
            u16::from(noise_value) << 8,
            0,
            65535,
            rt.start * 16,
            (rt.stop * 16).saturating_sub(BAR_WIDTH * 16),
        );

        strip.fade_out(FADE_AMOUNT);

        let color_index = ((pos16 / 64) as u8).wrapping_add(rt.base_hue);
        let pal = *strip.current_palette();
        strip.draw_fractional_bar(i32::from(pos16), BAR_WIDTH, &pal, color_index, 255, true, 1);

        let increment = beatsin88(
            strip.segment().beat88(),
            1,
            12,
            self.core.timebase,
            strip.now_ms(),
        );
        self.noise_dist = self.noise_dist.wrapping_add(increment);

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::NoiseMover
    }
}
