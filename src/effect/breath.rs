//! Breathing brightness over a slow palette fill.

use super::{Effect, EffectCore, Mode};
use crate::helper;
use crate::strip::Strip;
use crate::wave::beatsin88;

#[derive(Default)]
pub struct BreathEffect {
    core: EffectCore,
}

impl Effect for BreathEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        self.core.standard_init(strip)
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        let beat = strip.segment().beat88().saturating_mul(2);
        let brightness = beatsin88(beat, 10, 255, self.core.timebase, strip.now_ms());
        let base_hue = strip.runtime().base_hue;

        #[allow(clippy::cast_possible_truncation)]
        strip.fill_palette_segment(base_hue, 5, brightness as u8);

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::Breath
    }
}
