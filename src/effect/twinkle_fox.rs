//! Per-pixel twinkle clocks (after Kriegsman's TwinkleFox).
//!
//! Every pixel derives its own speed multiplier, time offset and salt from
//! a fixed-seed PRNG that restarts each frame, so pixels twinkle
//! independently without any per-pixel storage. The low bits of the
//! adjusted clock drive the brightness wave, the high bits pick the color
//! and decide against the density whether the pixel lights at all.

use super::{Effect, EffectCore, Mode};
use crate::color::{BLACK, Rgb};
use crate::helper;
use crate::math8::{attack_decay_wave8, sin8};
use crate::strip::Strip;

#[derive(Default)]
pub struct TwinkleFoxEffect {
    core: EffectCore,
}

impl TwinkleFoxEffect {
    fn compute_one_twinkle(strip: &Strip, time_ms: u32, salt: u8) -> Rgb {
        let seg = strip.segment();
        let ticks = time_ms >> (8 - seg.twinkle_speed.min(8));
        #[allow(clippy::cast_possible_truncation)]
        let fast_cycle = ticks as u8;
        #[allow(clippy::cast_possible_truncation)]
        let mut slow_cycle16 = ((ticks >> 8) as u16).wrapping_add(u16::from(salt));
        slow_cycle16 = slow_cycle16.wrapping_add(u16::from(sin8(slow_cycle16 as u8)));
        slow_cycle16 = slow_cycle16.wrapping_mul(2053).wrapping_add(1384);
        #[allow(clippy::cast_possible_truncation)]
        let slow_cycle8 = (slow_cycle16 as u8).wrapping_add((slow_cycle16 >> 8) as u8);

        let bright = if (slow_cycle8 & 0x0E) / 2 < seg.twinkle_density {
            attack_decay_wave8(fast_cycle)
        } else {
            0
        };

        if bright > 0 {
            let hue = slow_cycle8.wrapping_sub(salt);
            strip.color_from_palette(hue, bright)
        } else {
            BLACK
        }
    }
}

impl Effect for TwinkleFoxEffect {
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
        let now = strip.now_ms();
        // fixed seed: the per-pixel parameters must repeat every frame
        let mut prng: u16 = 11337;

        for i in 0..rt.length {
            prng = prng.wrapping_mul(2053).wrapping_add(1384);
            let time_offset = u32::from(prng);
            prng = prng.wrapping_mul(2053).wrapping_add(1384);
            // speed multiplier in Q5.3 around 1.0-3.0
            let speed_q53 = (((prng as u8 >> 4).wrapping_add(prng as u8 & 0x0F)) & 0x0F) + 0x08;
            let adjusted_time = now
                .wrapping_mul(u32::from(speed_q53))
                .wrapping_shr(3)
                .wrapping_add(time_offset);
            let salt = (prng >> 8) as u8;

            let color = Self::compute_one_twinkle(strip, adjusted_time, salt);
            strip.leds_mut()[(rt.start + i) as usize] = color;
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::TwinkleFox
    }
}
