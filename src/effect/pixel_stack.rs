//! Pixel stack: carries pixels from the lower half to the top, one by one.
//!
//! Alternates between an "up" phase (a runner takes the topmost remaining
//! pixel of the lower half to the top of the strip) and a "down" phase
//! that unstacks them again. Wrap detection of the mapped beat position is
//! what advances the stack counter.

use super::{Effect, Mode};
use crate::helper;
use crate::strip::Strip;
use crate::wave::beat88;

#[derive(Default)]
pub struct PixelStackEffect {
    up: bool,
    leds_moved: u16,
    ppos16: u16,
    initialized: bool,
}

impl PixelStackEffect {
    fn effect_speed(strip: &Strip) -> u16 {
        let seg = strip.segment();
        let max_beat = 20000 / u16::from(seg.segments());
        let clamped = seg.beat88().min(max_beat);
        helper::safe_map_u16(clamped, 0, max_beat, 0, 65535)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn stack_color_index(position: u16, n_leds: u16, base_hue: u8) -> u8 {
        (helper::safe_map_u16(position, 0, n_leds.max(2) - 1, 0, 255) as u8).wrapping_add(base_hue)
    }
}

impl Effect for PixelStackEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !helper::validate(strip) {
            return false;
        }
        self.up = true;
        self.leds_moved = 0;
        self.ppos16 = 0;
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

        let rt = *strip.runtime();
        let speed = Self::effect_speed(strip);
        let n_leds = rt.length / 2;
        if n_leds < 2 {
            return helper::SAFE_DELAY_MS;
        }
        let base_hue = rt.base_hue;
        let brightness = strip.segment().brightness();

        let fade = ((speed >> 8) as u8).max(2);
        strip.fade_out(fade);

        // static parts: remaining lower stack and the parked upper stack
        for i in 0..n_leds {
            if i < n_leds - self.leds_moved {
                let color =
                    strip.color_from_palette(Self::stack_color_index(i, n_leds, base_hue), brightness);
                strip.leds_mut()[(rt.start + i) as usize] = color;
            }
        }
        for i in 0..self.leds_moved {
            let color = strip.color_from_palette(
                Self::stack_color_index(n_leds - i - 1, n_leds, base_hue),
                brightness,
            );
            strip.leds_mut()[(rt.start + rt.length - 1 - i) as usize] = color;
        }

        let beat_position = beat88(speed, 0, strip.now_ms());
        let pal = *strip.current_palette();

        if self.up {
            let start_pos = 16 * (n_leds - self.leds_moved);
            let end_pos = (16 * (rt.length - 1 - self.leds_moved)).saturating_sub(16);
            let pos16 = helper::safe_map_u16(beat_position, 0, 65535, start_pos, end_pos);

            if self.ppos16 > pos16 {
                // wrapped: the runner arrived at the top
                self.ppos16 = 0;
                if self.leds_moved == n_leds {
                    self.leds_moved -= 1;
                    self.up = false;
                    self.ppos16 = 65535;
                    return strip.min_delay();
                }
                self.leds_moved += 1;
            } else {
                // start one pixel into the active LED to avoid flicker
                let draw_pos = if pos16 > 16 { pos16 - 16 } else { pos16 };
                let index = Self::stack_color_index(n_leds - self.leds_moved, n_leds, base_hue);
                strip.draw_fractional_bar(
                    i32::from(rt.start * 16 + draw_pos),
                    2,
                    &pal,
                    index,
                    255,
                    true,
                    1,
                );
                self.ppos16 = pos16;
            }
        } else {
            let start_pos = (16 * (rt.length - 1 - self.leds_moved)).saturating_sub(16);
            let end_pos = 16 * (n_leds - self.leds_moved);
            let pos16 = helper::safe_map_u16(beat_position, 0, 65535, start_pos, end_pos);

            if self.ppos16 < pos16 {
                self.ppos16 = 65535;
                if self.leds_moved == 0 {
                    self.leds_moved += 1;
                    self.up = true;
                    self.ppos16 = 0;
                    return strip.min_delay();
                }
                self.leds_moved -= 1;
            } else {
                let index = Self::stack_color_index(n_leds - self.leds_moved, n_leds, base_hue);
                strip.draw_fractional_bar(
                    i32::from(rt.start * 16 + pos16),
                    2,
                    &pal,
                    index,
                    255,
                    true,
                    1,
                );
                self.ppos16 = pos16;
            }
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::PixelStack
    }
}
