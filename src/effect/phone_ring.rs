//! Phone-ring cadence: bursts of on/off flashes separated by a long pause.

use super::{Effect, Mode};
use crate::color::{BLACK, fade_to_black_by, fill_solid};
use crate::helper;
use crate::strip::Strip;

const ON_TIME_MS: u32 = 50;
const OFF_TIME_MS: u32 = 100;
const RUN_TIME_MS: u32 = 1500;
const PAUSE_TIME_MS: u32 = 2000;

#[derive(Default)]
pub struct PhoneRingEffect {
    is_on: bool,
    is_pause: bool,
    next_flank: u32,
    pause_started: u32,
    initialized: bool,
}

impl Effect for PhoneRingEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !helper::validate(strip) {
            return false;
        }
        self.is_on = true;
        self.is_pause = false;
        self.next_flank = 0;
        self.pause_started = strip.now_ms() + 10;
        self.initialized = true;
        strip.runtime_mut().modeinit = false;
        true
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }

        let now = strip.now_ms();
        let rt = *strip.runtime();
        let (a, b) = (rt.start as usize, rt.stop as usize);

        if self.is_pause {
            fade_to_black_by(&mut strip.leds_mut()[a..=b], 32);
            if now > self.pause_started + PAUSE_TIME_MS {
                self.pause_started = now;
                self.is_pause = false;
            }
        } else {
            if self.is_on {
                let base_hue = rt.base_hue;
                let delta = strip.distribution_delta_hue();
                strip.fill_palette_segment(base_hue, delta, 255);
                if now > self.next_flank + ON_TIME_MS {
                    self.next_flank = now;
                    self.is_on = false;
                }
            } else {
                fill_solid(&mut strip.leds_mut()[a..=b], BLACK);
                if now > self.next_flank + OFF_TIME_MS {
                    self.next_flank = now;
                    self.is_on = true;
                }
            }
            if now > self.pause_started + RUN_TIME_MS {
                self.pause_started = now;
                self.is_pause = true;
            }
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::PhoneRing
    }
}
