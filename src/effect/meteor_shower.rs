//! Meteors falling from the segment end toward the start.
//!
//! A fixed pool of meteor slots; new meteors only spawn when the entry
//! area has gone dark and a random gate passes, so trails never overlap
//! at birth.

use super::{Effect, Mode};
use crate::color::{blur1d, is_lit};
use crate::helper;
use crate::strip::Strip;
use crate::wave::beat88;

const MAX_METEORS: usize = 10;
const METEOR_WIDTH: u16 = 3;
const FADE_INTERVAL_MS: u32 = 20;
const SPAWN_INTERVAL_MS: u32 = 100;

#[derive(Default)]
pub struct MeteorShowerEffect {
    timebase: [u32; MAX_METEORS],
    actives: [bool; MAX_METEORS],
    cind: [u8; MAX_METEORS],
    last_fade: u32,
    last_spawn: u32,
    initialized: bool,
}

impl MeteorShowerEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn meteor_pos16(strip: &Strip, timebase: u32) -> u16 {
        let rt = strip.runtime();
        let beat = beat88(
            strip.segment().beat88().saturating_mul(3),
            timebase,
            strip.now_ms(),
        );
        // inverted mapping: phase 0 is the top of the segment
        helper::safe_map_u16(beat, 0, 65535, rt.stop * 16, rt.start * 16)
    }

    fn draw_meteor(&self, strip: &mut Strip, pos16: u16, color_index: u8) {
        let base_hue = strip.runtime().base_hue;
        let pal = *strip.current_palette();
        strip.draw_fractional_bar(
            i32::from(pos16),
            METEOR_WIDTH,
            &pal,
            base_hue.wrapping_add(color_index),
            255,
            true,
            0,
        );
    }

    fn spawn_area_clear(strip: &Strip, min_distance: u16) -> bool {
        let rt = strip.runtime();
        for i in 0..min_distance.min(rt.length) {
            if is_lit(strip.leds()[(rt.stop - i) as usize]) {
                return false;
            }
        }
        true
    }
}

impl Effect for MeteorShowerEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !helper::validate(strip) {
            return false;
        }
        let now = strip.now_ms();
        for i in 0..MAX_METEORS {
            self.timebase[i] = 0;
            self.actives[i] = false;
            self.cind[i] = strip.random8();
        }
        self.last_fade = now;
        self.last_spawn = now;
        if strip.segment().num_bars() > 0 {
            self.timebase[0] = now;
            self.actives[0] = true;
        }
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
        let now = strip.now_ms();
        let num_bars = (strip.segment().num_bars() as usize).min(MAX_METEORS);

        if now - self.last_fade >= FADE_INTERVAL_MS {
            let fade = helper::safe_map_u16(strip.segment().beat88(), 100, 7968, 3, 255) as u8;
            strip.fade_out(fade);
            self.last_fade = now;
        }

        for i in 0..num_bars {
            if self.actives[i] {
                let pos16 = Self::meteor_pos16(strip, self.timebase[i]);
                self.draw_meteor(strip, pos16, self.cind[i]);
                if pos16 / 16 <= rt.start {
                    self.actives[i] = false;
                }
            }
        }

        if now - self.last_spawn >= SPAWN_INTERVAL_MS {
            let min_distance = (rt.length / 12).max(1);
            if Self::spawn_area_clear(strip, min_distance) {
                if let Some(slot) = self.actives[..num_bars].iter().position(|a| !a) {
                    if strip.random8_below(4) == 0 {
                        self.actives[slot] = true;
                        self.timebase[slot] = now;
                        self.cind[slot] = strip.random_wheel_index(self.cind[slot], 42);
                        let pos16 = Self::meteor_pos16(strip, now);
                        self.draw_meteor(strip, pos16, self.cind[slot]);
                    }
                }
            }
            self.last_spawn = now;
        }

        // soften the freshly drawn heads a little
        let (a, b) = (rt.start as usize, rt.stop as usize);
        blur1d(&mut strip.leds_mut()[a..=b], 16);

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::MeteorShower
    }
}
