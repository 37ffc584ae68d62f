//! Glow points breathing on independent sine clocks.
//!
//! Each element owns a beat rate, phase and color index; every time its
//! sine crosses zero upward the parameters drift randomly within bounds
//! around the configured speed.

use super::{Effect, EffectCore, Mode};
use crate::helper;
use crate::segment::MAX_NUM_BARS;
use crate::strip::Strip;
use crate::wave::{beat88, sin16};

const RAND_DELTA: u8 = 64;

#[derive(Default)]
pub struct BeatsinGlowEffect {
    core: EffectCore,
    beats: [u16; MAX_NUM_BARS as usize],
    theta: [u16; MAX_NUM_BARS as usize],
    cinds: [u8; MAX_NUM_BARS as usize],
    times: [u32; MAX_NUM_BARS as usize],
    prev: [i16; MAX_NUM_BARS as usize],
    num_bars: u8,
}

impl BeatsinGlowEffect {
    fn variation_limit(strip: &Strip) -> u16 {
        (strip.segment().beat88() / 5).saturating_mul(2)
    }

    fn drift_element(&mut self, strip: &mut Strip, i: usize) {
        let seg_beat = strip.segment().beat88();
        let lim10 = seg_beat.saturating_mul(10);
        let up = (lim10 / 50).max(1);
        let down = strip.random16_below((lim10 / 25).max(1));
        let adjusted = self.beats[i].wrapping_add(up).wrapping_sub(down);
        self.beats[i] = adjusted.clamp(seg_beat / 2, seg_beat.saturating_add(seg_beat / 2).max(1));

        let t_up = u16::from(RAND_DELTA / 2);
        self.theta[i] = self.theta[i]
            .wrapping_add(t_up)
            .wrapping_sub(u16::from(strip.random8_below(RAND_DELTA)));
        self.cinds[i] = self.cinds[i]
            .wrapping_add(RAND_DELTA / 2)
            .wrapping_sub(strip.random8_below(RAND_DELTA));
        self.times[i] = strip.now_ms().wrapping_sub(u32::from(self.theta[i]));
    }
}

impl Effect for BeatsinGlowEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !self.core.standard_init(strip) {
            return false;
        }
        self.num_bars = strip.segment().num_bars().clamp(1, MAX_NUM_BARS);
        let lim = Self::variation_limit(strip);
        let n = u16::from(self.num_bars);
        for i in 0..self.num_bars as usize {
            let seg_beat = strip.segment().beat88();
            self.beats[i] = seg_beat
                .wrapping_add(lim / 2)
                .wrapping_sub(strip.random16_below(lim.max(1)));
            #[allow(clippy::cast_possible_truncation)]
            {
                self.theta[i] = ((65535 / n) * i as u16)
                    .wrapping_add(65535 / (4 * n))
                    .wrapping_sub(strip.random16_below(65535 / (2 * n)));
            }
            let base_color = ((255 / n) * i as u16) as u8;
            let variation = strip.random8_below((255 / (2 * u16::from(n))).min(255) as u8);
            self.cinds[i] = if variation & 0x01 != 0 {
                base_color.wrapping_sub(variation)
            } else {
                base_color.wrapping_add(variation)
            };
            self.times[i] = strip.now_ms() + u32::from(strip.random8());
            self.prev[i] = 0;
        }
        true
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        #[allow(clippy::cast_possible_truncation)]
        let fade = ((strip.segment().beat88() >> 8) as u8) | 32;
        strip.fade_out(fade);

        let rt = *strip.runtime();
        let brightness = strip.segment().brightness();
        let n = self.num_bars;
        let pal = *strip.current_palette();

        for i in 0..n as usize {
            let beatval = beat88(
                self.beats[i],
                self.times[i].wrapping_add(u32::from(self.theta[i])),
                strip.now_ms(),
            );
            let si = sin16(beatval);

            if si > -2 && si < 2 && self.prev[i] < si {
                self.drift_element(strip, i);
            }
            self.prev[i] = si;

            #[allow(clippy::cast_sign_loss)]
            let pos = helper::safe_map_u16(
                (32767_i32 + i32::from(si)) as u16,
                0,
                65535,
                rt.start * 16,
                rt.stop * 16,
            );
            #[allow(clippy::cast_possible_truncation)]
            let color_index = self.cinds[i].wrapping_add(i as u8 * (255 / n));
            strip.draw_fractional_bar(
                i32::from(pos),
                2,
                &pal,
                color_index,
                brightness,
                true,
                1,
            );
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::BeatsinGlow
    }
}
