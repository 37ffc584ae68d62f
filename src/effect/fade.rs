//! Triangle-wave brightness fade over the palette.

use super::{Effect, EffectCore, Mode};
use crate::helper;
use crate::strip::Strip;

const FADE_SPEED_MULTIPLIER: u8 = 2;
const MIN_BRIGHTNESS: u8 = 16;
const MAX_BRIGHTNESS: u8 = 255;
const HUE_DELTA: u8 = 4;

#[derive(Default)]
pub struct FadeEffect {
    core: EffectCore,
}

impl Effect for FadeEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        self.core.standard_init(strip)
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }

        let beat = helper::beat_position(strip, self.core.timebase, FADE_SPEED_MULTIPLIER);
        let brightness = helper::triangle_brightness(beat, MIN_BRIGHTNESS, MAX_BRIGHTNESS);
        let base_hue = strip.runtime().base_hue;

        strip.fill_palette_segment(base_hue, HUE_DELTA, brightness);

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::Fade
    }
}
