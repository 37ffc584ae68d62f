//! A breathing window of palette colors, eased at both ends.
//!
//! Two beatsin oscillators pick the window start and width independently,
//! a third modulates the brightness across it.

use super::{Effect, Mode};
use crate::color::{fade_to_black_by, fill_palette, nscale8};
use crate::helper;
use crate::math8::triwave8;
use crate::segment::{BEAT88_MAX, BEAT88_MIN};
use crate::strip::Strip;
use crate::wave::{beatsin8, beatsin16_phase};

#[derive(Default)]
pub struct EaseBarEffect {
    min_leds: u16,
    beat_freq1: u16,
    beat_freq2: u16,
    counter: u8,
    initialized: bool,
}

impl EaseBarEffect {
    fn recalc(&mut self, strip: &Strip) {
        let rt = strip.runtime();
        self.min_leds = (rt.length / 4).max(10).min(rt.length);
        let speed = strip.segment().beat88();
        self.beat_freq1 = helper::safe_map_u16(speed, BEAT88_MIN, BEAT88_MAX / 2, 2, 63);
        self.beat_freq2 = helper::safe_map_u16(speed, BEAT88_MIN, BEAT88_MAX / 2, 3, 111);
    }
}

impl Effect for EaseBarEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !helper::validate(strip) {
            return false;
        }
        self.recalc(strip);
        self.counter = 0;
        self.initialized = true;
        strip.runtime_mut().modeinit = false;
        true
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }
        self.recalc(strip);

        let rt = *strip.runtime();
        let now = strip.now_ms();

        let beat1 = beatsin16_phase(self.beat_freq1, 0, BEAT88_MAX + BEAT88_MAX / 5, 0, 0, now);
        let beat2 = beatsin16_phase(self.beat_freq2, 0, BEAT88_MAX + BEAT88_MAX / 6, 0, 0, now);
        if beat1 == 0 {
            self.counter = self.counter.wrapping_add(1);
        }
        let triangular_offset = triwave8(self.counter);
        let brightness_mod = 255 - beatsin8(self.beat_freq2.saturating_sub(self.beat_freq1).max(1), 0, 255, 0, now);

        let start_led = beatsin16_phase(
            self.beat_freq1 / 2,
            rt.start,
            rt.stop.saturating_sub(self.min_leds).max(rt.start),
            0,
            beat1.wrapping_add(u16::from(triangular_offset)),
            now,
        );
        let span = rt.length - (start_led - rt.start);
        let num_leds = beatsin16_phase(
            self.beat_freq2 / 2,
            self.min_leds.min(span),
            span,
            0,
            beat2,
            now,
        )
        .min(span);

        let delta = strip.distribution_delta_hue();
        let start_index =
            (helper::safe_map_u16(start_led, rt.start, rt.stop, 0, 255) as u8).wrapping_add(rt.base_hue);

        let (a, b) = (rt.start as usize, rt.stop as usize);
        fade_to_black_by(&mut strip.leds_mut()[a..=b], 128);

        let pal = *strip.current_palette();
        let blend = strip.segment().blend_type;
        let from = start_led as usize;
        let to = (from + num_leds as usize).min(b + 1);
        fill_palette(
            &mut strip.leds_mut()[from..to],
            &pal,
            start_index,
            delta,
            255,
            blend,
        );

        // ripple the brightness over the lit window
        let freq = ((self.beat_freq2.saturating_sub(self.beat_freq1)) / 2).max(1);
        for i in a..b {
            let scale = beatsin8(freq, 128, 255, u32::from(brightness_mod) + i as u32, now);
            let px = strip.leds_mut();
            px[i] = nscale8(px[i], scale);
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::EaseBar
    }
}
