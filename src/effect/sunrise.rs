//! Sunrise and sunset: the bezier color curve walked over many minutes.
//!
//! A step counter advances (or retreats) once per computed interval so the
//! full ramp takes `sunrise_time` minutes. Each frame dithers between the
//! current and the neighbouring step, and a low-weight noise layer
//! refreshed every 100 ms adds ember-like flicker. A finishing sunset
//! powers the strip off and hands control back to the static mode.

use super::{Effect, Mode};
use crate::color::{ColorCurve, fill_solid, luma, nblend, nscale8_video};
use crate::helper::{self, ScratchBuffer};
use crate::segment::{AutoplayMode, DEFAULT_SUNRISE_STEPS};
use crate::strip::Strip;

const NOISE_REFRESH_MS: u32 = 100;
const NOISE_BLEND_WEIGHT: u8 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunDirection {
    Rising,
    Setting,
}

pub struct SunriseEffect {
    direction: SunDirection,
    curve: ColorCurve,
    current_step: u16,
    next_step_time: u32,
    alternate_toggle: bool,
    last_noise_update: u32,
    noise: ScratchBuffer<u8>,
    initialized: bool,
}

impl SunriseEffect {
    pub fn new(direction: SunDirection) -> Self {
        Self {
            direction,
            curve: ColorCurve::sunrise(),
            current_step: 0,
            next_step_time: 0,
            alternate_toggle: false,
            last_noise_update: 0,
            noise: ScratchBuffer::new(),
            initialized: false,
        }
    }

    fn step_interval_ms(strip: &Strip) -> u32 {
        u32::from(strip.segment().sunrise_time_min()) * 60_000 / u32::from(DEFAULT_SUNRISE_STEPS)
    }

    /// Pick the sunset start step matching the current strip brightness,
    /// so dimming from an already-dim state does not jump.
    fn initial_setting_step(&self, strip: &Strip) -> u16 {
        let rt = strip.runtime();
        let mut total: u32 = 0;
        for i in rt.start..=rt.stop {
            total += u32::from(luma(strip.leds()[i as usize]));
        }
        let mut average = if rt.length > 0 && total > 0 {
            #[allow(clippy::cast_possible_truncation)]
            {
                (total / u32::from(rt.length)).min(255) as u8
            }
        } else {
            255
        };
        average = average.max(96);

        for step in (1..=DEFAULT_SUNRISE_STEPS).rev() {
            if luma(self.curve.color_at(i32::from(step))) <= average {
                return step;
            }
        }
        DEFAULT_SUNRISE_STEPS
    }

    fn refresh_noise(&mut self, strip: &mut Strip) {
        let now = strip.now_ms();
        if now.wrapping_sub(self.last_noise_update) >= NOISE_REFRESH_MS {
            self.last_noise_update = now;
            for v in self.noise.as_mut_slice() {
                *v = strip.rng().random8_below(185);
            }
        }
    }

    fn draw_step(&mut self, strip: &mut Strip) {
        let effective_step = match self.direction {
            SunDirection::Rising => {
                if self.alternate_toggle {
                    self.current_step + 1
                } else {
                    self.current_step
                }
            }
            SunDirection::Setting => {
                if self.alternate_toggle {
                    self.current_step.saturating_sub(1)
                } else {
                    self.current_step
                }
            }
        };
        self.alternate_toggle = !self.alternate_toggle;

        let base_color = self.curve.color_at(i32::from(effective_step));
        let rt = *strip.runtime();
        let (a, b) = (rt.start as usize, rt.stop as usize);
        fill_solid(&mut strip.leds_mut()[a..=b], base_color);

        // a finished sunrise is steady daylight, the flicker stops
        if self.direction == SunDirection::Rising && self.current_step >= DEFAULT_SUNRISE_STEPS {
            return;
        }

        self.refresh_noise(strip);
        let max_noise_index = self.noise.len().saturating_sub(1);
        for i in 0..rt.length as usize {
            let noise_value = self.noise.as_slice()[i.min(max_noise_index)];
            let leds = strip.leds_mut();
            let flickered = nscale8_video(leds[a + i], noise_value);
            nblend(&mut leds[a + i], flickered, NOISE_BLEND_WEIGHT);
        }
    }
}

impl Effect for SunriseEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !helper::validate(strip) {
            return false;
        }
        if !self.noise.ensure(strip.runtime().length as usize) {
            return false;
        }
        self.noise.fill(0);
        self.next_step_time = strip.now_ms();
        self.alternate_toggle = false;
        self.last_noise_update = 0;
        self.current_step = match self.direction {
            SunDirection::Rising => 0,
            SunDirection::Setting => self.initial_setting_step(strip),
        };

        // a running sun ramp owns the strip: no autoplay, no background
        strip.segment_mut().autoplay = AutoplayMode::Off;
        strip.segment_mut().background_bri = 0;
        if self.direction == SunDirection::Rising {
            strip.segment_mut().set_target_brightness(255);
        }

        self.initialized = true;
        strip.runtime_mut().modeinit = false;
        true
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        let step_interval = Self::step_interval_ms(strip);
        self.draw_step(strip);

        let now = strip.now_ms();
        if now >= self.next_step_time {
            self.next_step_time = now + step_interval;
            match self.direction {
                SunDirection::Rising => {
                    if self.current_step < DEFAULT_SUNRISE_STEPS {
                        self.current_step += 1;
                    }
                }
                SunDirection::Setting => {
                    if self.current_step > 0 {
                        self.current_step -= 1;
                    } else {
                        strip.request_mode(Mode::Static);
                        strip.request_power(false);
                    }
                }
            }
        }

        // tightest cadence: the dither and flicker want every frame
        0
    }

    fn mode_id(&self) -> Mode {
        match self.direction {
            SunDirection::Rising => Mode::Sunrise,
            SunDirection::Setting => Mode::Sunset,
        }
    }

    fn cleanup(&mut self) {
        self.noise.release();
        self.initialized = false;
    }
}
