//! Stationary firework bursts.
//!
//! Sparks ignite at random clear positions, burn down over a couple dozen
//! frames and bleed into their neighbourhood through a per-frame blur.

use super::{Effect, EffectCore, Mode};
use crate::color::{blur1d, is_lit, nblend};
use crate::helper;
use crate::math8::qadd8;
use crate::strip::Strip;

const MAX_FIREWORKS: usize = 8;

#[derive(Default)]
pub struct FireworkEffect {
    core: EffectCore,
    positions: [u16; MAX_FIREWORKS],
    color_indices: [u8; MAX_FIREWORKS],
    burn_time: [u8; MAX_FIREWORKS],
}

impl FireworkEffect {
    fn is_position_clear(&self, strip: &Strip, position: u16, min_distance: u16) -> bool {
        let rt = strip.runtime();
        let lo = position.saturating_sub(min_distance).max(rt.start);
        let hi = (position + min_distance).min(rt.stop);
        !strip.leds()[lo as usize..=hi as usize].iter().any(|c| is_lit(*c))
    }

    fn find_slot(&self) -> Option<usize> {
        self.burn_time.iter().position(|&t| t == 0)
    }
}

impl Effect for FireworkEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        self.positions = [0; MAX_FIREWORKS];
        self.color_indices = [0; MAX_FIREWORKS];
        self.burn_time = [0; MAX_FIREWORKS];
        strip.clear_all();
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

        let blur_amount = qadd8(255 - (beat >> 8) as u8, 32) % 172;
        let (a, b) = (rt.start as usize, rt.stop as usize);
        blur1d(&mut strip.leds_mut()[a..=b], blur_amount);

        for i in 0..MAX_FIREWORKS {
            if self.burn_time[i] > 0 {
                self.burn_time[i] -= 1;
                let color = strip.color_from_palette(self.color_indices[i], 255);
                nblend(
                    &mut strip.leds_mut()[self.positions[i] as usize],
                    color,
                    196,
                );
            }
        }

        let spawn_probability = (rt.length / 7).max(6).min(255) as u8;
        let spawn_threshold = (rt.length / 14).max(3).min(255) as u8;
        if strip.random8_below(spawn_probability) <= spawn_threshold {
            let min_distance = (rt.length / 20).max(2);
            if rt.start + min_distance < rt.stop - min_distance {
                let candidate = strip
                    .rng()
                    .random16_range(rt.start + min_distance, rt.stop - min_distance);
                if self.is_position_clear(strip, candidate, min_distance) {
                    if let Some(slot) = self.find_slot() {
                        self.positions[slot] = candidate;
                        self.color_indices[slot] =
                            strip.random_wheel_index(self.color_indices[slot], 64);
                        self.burn_time[slot] = strip.random8_range(10, 30);
                        let brightness = strip.random8_range(192, 255);
                        let color = strip.color_from_palette(self.color_indices[slot], brightness);
                        strip.leds_mut()[candidate as usize] = color;
                    }
                }
            }
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::Firework
    }
}
