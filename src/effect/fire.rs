//! Fire2012 heat simulation.
//!
//! A heat cell per pixel: cool everything a random amount, diffuse heat
//! upward, randomly ignite sparks near the bottom, then map heat through
//! the fixed fire ramp. `cooling` and `sparking` are the segment tunables.

use super::{Effect, EffectCore, Mode};
use crate::color::{BlendType, Palette16};
use crate::helper::{self, ScratchBuffer};
use crate::math8::{qadd8, qsub8, scale8};
use crate::strip::Strip;

#[derive(Default)]
pub struct Fire2012Effect {
    core: EffectCore,
    heat: ScratchBuffer<u8>,
}

impl Fire2012Effect {
    fn cool(&mut self, strip: &mut Strip) {
        let length = strip.runtime().length;
        let cooling = u16::from(strip.segment().cooling);
        for i in 0..length as usize {
            let limit = ((cooling * 10) / length + 2).min(255);
            #[allow(clippy::cast_possible_truncation)]
            let amount = strip.random8_below(limit as u8);
            let heat = self.heat.as_mut_slice();
            heat[i] = qsub8(heat[i], amount);
        }
    }

    fn diffuse(&mut self) {
        let heat = self.heat.as_mut_slice();
        for k in (2..heat.len()).rev() {
            heat[k] = ((u16::from(heat[k - 1]) + 2 * u16::from(heat[k - 2])) / 3) as u8;
        }
    }

    fn spark(&mut self, strip: &mut Strip) {
        if strip.random8() < strip.segment().sparking {
            let pos = strip.random8_below(7) as usize;
            if pos < self.heat.len() {
                let spark_heat = strip.random8_range(160, 255);
                let heat = self.heat.as_mut_slice();
                heat[pos] = qadd8(heat[pos], spark_heat);
            }
        }
    }

    fn render(&self, strip: &mut Strip) {
        let rt = *strip.runtime();
        let pal = Palette16::heat();
        for (j, &h) in self.heat.as_slice().iter().enumerate() {
            let color_index = scale8(h, 240);
            let color = pal.color_at(color_index, 255, BlendType::LinearBlend);
            strip.leds_mut()[rt.start as usize + j] = color;
        }
    }
}

impl Effect for Fire2012Effect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !helper::validate(strip) {
            return false;
        }
        if !self.heat.ensure(strip.runtime().length as usize) {
            return false;
        }
        self.heat.fill(0);
        self.core.standard_init(strip)
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized && !self.init(strip) {
            return strip.min_delay();
        }
        if !helper::validate(strip) || self.heat.is_empty() {
            return helper::SAFE_DELAY_MS;
        }
        if self.heat.len() != strip.runtime().length as usize && !self.init(strip) {
            return strip.min_delay();
        }

        self.cool(strip);
        self.diffuse();
        self.spark(strip);
        self.render(strip);

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::Fire2012
    }

    fn cleanup(&mut self) {
        self.heat.release();
        self.core.reset();
    }
}
