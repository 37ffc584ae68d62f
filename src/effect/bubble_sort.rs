//! Bubble sort, visualized one comparison per frame.
//!
//! A random hue per pixel; the classic algorithm runs with the inner
//! comparison advanced once per rendered frame. A swap triggers a
//! "walk down" animation of the swapped value before comparing resumes.
//! When the array is sorted it reseeds and starts over.

use super::{Effect, Mode};
use crate::helper::{self, ScratchBuffer};
use crate::segment::BEAT88_MAX;
use crate::strip::Strip;

#[derive(Default)]
pub struct BubbleSortEffect {
    hues: ScratchBuffer<u8>,
    ci: u16,
    co: u16,
    cd: u16,
    movedown: bool,
    initialized: bool,
}

impl BubbleSortEffect {
    fn seed_hues(&mut self, strip: &mut Strip) {
        let len = self.hues.len();
        if len == 0 {
            return;
        }
        let first = strip.random8();
        self.hues.as_mut_slice()[0] = first;
        for i in 1..len {
            let prev = self.hues.as_slice()[i - 1];
            let hue = strip.random_wheel_index(prev, 48);
            self.hues.as_mut_slice()[i] = hue;
        }
        self.co = 0;
        self.ci = 0;
        self.movedown = false;
    }

    fn draw_all(&self, strip: &mut Strip) {
        let rt = *strip.runtime();
        let brightness = strip.segment().brightness();
        for (i, &hue) in self.hues.as_slice().iter().enumerate() {
            let color = strip.color_from_palette(hue, brightness);
            strip.leds_mut()[rt.start as usize + i] = color;
        }
    }

    fn highlight(&self, strip: &mut Strip, index: u16) {
        let rt = *strip.runtime();
        if (index as usize) < self.hues.len() {
            let hue = self.hues.as_slice()[self.ci.min(self.hues.len() as u16 - 1) as usize];
            let color = strip.color_from_palette(hue, strip.segment().brightness());
            strip.leds_mut()[(rt.start + index) as usize] = color;
        }
    }

    /// One comparison per frame, not per pass, so the delay scales with
    /// speed and strip length.
    #[allow(clippy::cast_possible_truncation)]
    fn frame_delay(strip: &Strip) -> u16 {
        let speed_delay =
            helper::safe_map_u16(strip.segment().beat88(), 0, BEAT88_MAX, 50, 0);
        let length_delay = helper::safe_map_u16(strip.runtime().length, 0, 300, 25, 0);
        speed_delay + length_delay
    }
}

impl Effect for BubbleSortEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !helper::validate(strip) {
            return false;
        }
        let length = strip.runtime().length as usize;
        self.movedown = false;
        self.ci = 0;
        self.co = 0;
        self.cd = 0;
        self.initialized = self.hues.ensure(length);
        if self.initialized {
            self.seed_hues(strip);
        }
        strip.runtime_mut().modeinit = false;
        self.initialized
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.initialized || self.hues.is_empty() {
            // allocation failed before: render nothing, retry
            if !self.init(strip) {
                return strip.min_delay();
            }
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }
        let length = strip.runtime().length;
        if self.hues.len() != length as usize && !self.init(strip) {
            return strip.min_delay();
        }

        let framedelay = Self::frame_delay(strip);

        if self.movedown {
            self.draw_all(strip);
            self.highlight(strip, self.co);
            self.highlight(strip, self.cd);
            if self.cd == self.co {
                self.movedown = false;
            } else if self.cd > 0 {
                self.cd -= 1;
            } else {
                self.movedown = false;
            }
            return framedelay;
        }

        if self.co < length {
            if self.ci < length - 1 {
                let hues = self.hues.as_mut_slice();
                if hues[self.ci as usize] > hues[self.ci as usize + 1] {
                    hues.swap(self.ci as usize, self.ci as usize + 1);
                    self.cd = self.ci;
                    self.movedown = true;
                }
                self.ci += 1;
            } else {
                self.co += 1;
                self.ci = 0;
            }
        } else {
            // fully sorted: reseed and restart
            self.seed_hues(strip);
            return strip.min_delay();
        }

        self.draw_all(strip);
        self.highlight(strip, self.ci.min(length - 1));
        self.highlight(strip, self.co.min(length - 1));

        framedelay
    }

    fn mode_id(&self) -> Mode {
        Mode::BubbleSort
    }

    fn cleanup(&mut self) {
        self.hues.release();
        self.initialized = false;
    }
}
