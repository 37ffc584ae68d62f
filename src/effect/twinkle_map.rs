//! Twinkle over the palette base color.
//!
//! The whole segment shows a dim palette base; individual pixels brighten
//! to a peak and dim back. Per-pixel state is a single byte: bit0 selects
//! the brighten/dim phase and the byte value doubles as the blend weight
//! between base and peak color.

use super::{Effect, Mode};
use crate::color::{Rgb, add_to_rgb, blend_colors, nscale8_video};
use crate::helper::{self, ScratchBuffer};
use crate::segment::{BEAT88_MAX, BEAT88_MIN};
use crate::strip::Strip;

#[derive(Default)]
pub struct TwinkleMapEffect {
    pixel_states: ScratchBuffer<u8>,
    initialized: bool,
}

impl TwinkleMapEffect {
    fn base_color(strip: &Strip, led_index: u16) -> Rgb {
        let index = helper::color_index(
            strip,
            (strip.runtime().start + led_index) * 16,
            strip.runtime().base_hue,
        );
        nscale8_video(strip.color_from_palette(index, 255), 32)
    }

    fn peak_color(strip: &Strip, led_index: u16) -> Rgb {
        let index = helper::color_index(
            strip,
            (strip.runtime().start + led_index) * 16,
            strip.runtime().base_hue,
        );
        add_to_rgb(strip.color_from_palette(index, 255), 4)
    }

    fn clamped_add(value: u8, add: u8, limit: u8) -> u8 {
        let sum = value.saturating_add(add);
        if sum > limit { limit } else { sum }
    }
}

impl Effect for TwinkleMapEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !helper::validate(strip) {
            return false;
        }
        let length = strip.runtime().length as usize;
        if !self.pixel_states.ensure(length) {
            return false;
        }
        self.pixel_states.fill(0);
        for i in 0..strip.runtime().length {
            let base = Self::base_color(strip, i);
            let at = (strip.runtime().start + i) as usize;
            strip.leds_mut()[at] = base;
        }
        self.initialized = true;
        strip.runtime_mut().modeinit = false;
        true
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }
        let length = strip.runtime().length as usize;
        if !self.initialized || self.pixel_states.len() != length {
            // retry allocation every frame; a failed one skips the frame
            if !self.init(strip) {
                return strip.min_delay();
            }
        }

        let seg = strip.segment();
        let beat = seg.beat88();
        let density = seg.twinkle_density;
        let speed_up = helper::safe_map_u16(beat, BEAT88_MIN, BEAT88_MAX, 4, 64) as u8;
        let speed_down = speed_up / 2;
        let rt = *strip.runtime();

        for i in 0..rt.length {
            let base = Self::base_color(strip, i);
            let peak = Self::peak_color(strip, i);
            let at = (rt.start + i) as usize;
            let state = self.pixel_states.as_slice()[i as usize];

            let (new_state, color) = if state == 0 {
                let threshold = if density < 3 { 1 } else { density - 2 };
                let ignite = strip.random8() < threshold;
                (if ignite { 1 } else { 0 }, base)
            } else if state & 0x01 == 0x01 {
                // brightening phase, odd values
                if state == 255 {
                    (2, blend_colors(base, peak, state))
                } else {
                    let next = 0x01 | Self::clamped_add(state, speed_up, 255);
                    (next, blend_colors(base, peak, state))
                }
            } else {
                // dimming phase, even values
                if state == 254 {
                    (0, base)
                } else {
                    let next = 0xFE & Self::clamped_add(state, speed_down, 254);
                    (next, blend_colors(peak, base, state))
                }
            };

            self.pixel_states.as_mut_slice()[i as usize] = new_state;
            strip.leds_mut()[at] = color;
        }

        let min_delay = u32::from(strip.min_delay());
        let calculated = u32::from(BEAT88_MAX - beat) / 1800;
        min_delay.max(calculated) as u16
    }

    fn mode_id(&self) -> Mode {
        Mode::TwinkleMap
    }

    fn cleanup(&mut self) {
        self.pixel_states.release();
        self.initialized = false;
    }
}
