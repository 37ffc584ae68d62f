//! Shooting stars: quadratically accelerating sparks with an end flash.

use super::{Effect, EffectCore, Mode};
use crate::color::{add_to_rgb, blur1d, is_lit};
use crate::helper;
use crate::segment::MAX_NUM_BARS;
use crate::strip::Strip;
use crate::wave::beat88;

#[derive(Default)]
pub struct ShootingStarEffect {
    core: EffectCore,
    basebeat: u16,
    delta_b: [u16; MAX_NUM_BARS as usize],
    cind: [u8; MAX_NUM_BARS as usize],
    new_cind: [bool; MAX_NUM_BARS as usize],
    num_bars: u8,
}

impl ShootingStarEffect {
    /// Square the beat phase so stars accelerate toward the segment end
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn star_position(strip: &Strip, beat: u16) -> u16 {
        let rt = strip.runtime();
        let q = f64::from(beat / 100) * f64::from(beat / 100);
        let mapped = (q + 0.5) as u32;
        let lo = u32::from(rt.start) * 16;
        let hi = u32::from(rt.stop) * 16;
        (lo + (u64::from(mapped) * u64::from(hi - lo) / 429_484) as u32).min(hi) as u16
    }
}

impl Effect for ShootingStarEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !helper::validate(strip) {
            return false;
        }
        self.num_bars = strip.segment().num_bars().clamp(1, MAX_NUM_BARS);
        self.basebeat = strip.segment().beat88();
        self.cind[0] = strip.random_wheel_index(0, 32);
        self.delta_b[0] = 0;
        self.new_cind[0] = false;
        for i in 1..self.num_bars as usize {
            #[allow(clippy::cast_possible_truncation)]
            {
                self.delta_b[i] = (65535 / u16::from(self.num_bars)) * i as u16;
            }
            self.cind[i] = strip.random_wheel_index(self.cind[i - 1], 32);
            self.new_cind[i] = false;
        }
        self.core.initialized = false;
        self.core.standard_init(strip)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized || self.basebeat != strip.segment().beat88() {
            if !self.init(strip) {
                return helper::SAFE_DELAY_MS;
            }
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        let rt = *strip.runtime();
        let beat_cfg = strip.segment().beat88();

        // fade the body, keep a soft blur at the catch end
        let fade_amount = ((beat_cfg >> 8) as u8) | 0x60;
        let fade_len = if rt.length > 8 { rt.length - 8 } else { rt.length };
        let a = rt.start as usize;
        crate::color::fade_to_black_by(&mut strip.leds_mut()[a..a + fade_len as usize], fade_amount);
        if rt.length > 8 {
            let tail = (rt.stop - 7) as usize;
            blur1d(&mut strip.leds_mut()[tail..=rt.stop as usize], 120);
        }

        let pal = *strip.current_palette();
        for i in 0..self.num_bars as usize {
            let beat = beat88(beat_cfg, 0, strip.now_ms())
                .wrapping_mul(2)
                .wrapping_add(self.delta_b[i]);
            let pos = Self::star_position(strip, beat);

            strip.draw_fractional_bar(i32::from(pos), 2, &pal, self.cind[i], 255, true, 1);

            if pos / 16 > rt.stop.saturating_sub(4) {
                // reached the end: flash and queue a new color
                let led = strip.leds()[(pos / 16) as usize];
                if is_lit(led) {
                    let sparkle = (led.r | led.g | led.b) % 128;
                    let lifted = add_to_rgb(led, sparkle);
                    strip.leds_mut()[(pos / 16) as usize] = lifted;
                }
                self.new_cind[i] = true;
            } else {
                if self.new_cind[i] {
                    let prev = if i > 0 {
                        self.cind[i - 1]
                    } else {
                        self.cind[self.num_bars as usize - 1]
                    };
                    self.cind[i] = strip.random_wheel_index(prev, 32);
                }
                self.new_cind[i] = false;
            }
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::ShootingStar
    }
}
