//! Sine-luminance wave running along the segment.

use super::{Effect, EffectCore, Mode};
use crate::color::nblend;
use crate::helper;
use crate::math8::{qadd8, qsub8, sin8};
use crate::strip::Strip;
use crate::wave::beat88;

#[derive(Default)]
pub struct RunningLightsEffect {
    core: EffectCore,
}

impl Effect for RunningLightsEffect {
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
        let wave_offset = helper::safe_map_u16(
            beat88(beat, self.core.timebase, strip.now_ms()),
            0,
            65535,
            0,
            rt.length * 10,
        );

        for i in 0..rt.length {
            let sine_position = helper::safe_map_u16(i, 0, rt.length.max(2) - 1, 0, 255) as u8;
            let luminosity = qsub8(sin8(sine_position), 2);
            let final_offset = (wave_offset + i) % rt.length;
            let color_index = (helper::safe_map_u16(final_offset, 0, rt.length.max(2) - 1, 0, 255)
                as u8)
                .wrapping_add(rt.base_hue);
            let color = strip.color_from_palette(color_index, luminosity);
            let blend_amount = qadd8((beat >> 8) as u8, 16);
            if rt.start + final_offset < rt.stop {
                nblend(
                    &mut strip.leds_mut()[(rt.start + final_offset) as usize],
                    color,
                    blend_amount,
                );
            }
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::RunningLights
    }
}
