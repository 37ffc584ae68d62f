//! Random wheel colors, refreshed on a speed-derived interval.

use super::{Effect, EffectCore, Mode};
use crate::helper;
use crate::segment::BEAT88_MAX;
use crate::strip::Strip;

#[derive(Default)]
pub struct MultiDynamicEffect {
    core: EffectCore,
    next_update: u32,
    last_color_index: u8,
}

impl Effect for MultiDynamicEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        self.next_update = 0;
        self.last_color_index = 0;
        self.core.standard_init(strip)
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        let now = strip.now_ms();
        if now > self.next_update {
            let rt = *strip.runtime();
            let brightness = strip.segment().brightness();
            for i in rt.start..=rt.stop {
                self.last_color_index = strip.random_wheel_index(self.last_color_index, 32);
                let color = strip.color_from_palette(self.last_color_index, brightness);
                strip.leds_mut()[i as usize] = color;
            }
            let interval = u32::from(BEAT88_MAX - strip.segment().beat88()) >> 6;
            self.next_update = now + interval;
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::MultiDynamic
    }
}
