//! Color wipes: a moving boundary between the current and previous color.
//!
//! The boundary position comes from one of four wave shapes; a direction
//! flip of the wave picks a new random color and starts a short index
//! interpolation so the change does not snap.

use super::{Effect, EffectCore, Mode};
use crate::color::fill_solid;
use crate::helper;
use crate::math8::lerp8by8;
use crate::strip::Strip;
use crate::wave::{beat88, beatsin16, quadwave16, triwave16};

const TRANSITION_FRAMES: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipeWave {
    Sawtooth,
    Sine,
    Quad,
    Triwave,
}

pub struct ColorWipeEffect {
    core: EffectCore,
    wave: WipeWave,
    current_color_index: u8,
    previous_color_index: u8,
    target_color_index: u8,
    transition_step: u8,
    previous_wave_position: u16,
    moving_up: bool,
    need_new_color: bool,
}

impl ColorWipeEffect {
    pub const fn new(wave: WipeWave) -> Self {
        Self {
            core: EffectCore {
                timebase: 0,
                initialized: false,
            },
            wave,
            current_color_index: 0,
            previous_color_index: 0,
            target_color_index: 0,
            transition_step: 0,
            previous_wave_position: 0,
            moving_up: true,
            need_new_color: true,
        }
    }

    fn wipe_position(&self, strip: &Strip) -> u16 {
        let beat = strip.segment().beat88();
        let now = strip.now_ms();
        match self.wave {
            WipeWave::Sawtooth => beat88(beat.saturating_mul(4), self.core.timebase, now),
            WipeWave::Sine => beatsin16(
                beat.saturating_mul(2),
                0,
                65535,
                self.core.timebase,
                now,
            ),
            WipeWave::Quad => quadwave16(beat88(
                beat.saturating_mul(2),
                self.core.timebase,
                now,
            )),
            WipeWave::Triwave => triwave16(beat88(
                beat.saturating_mul(2),
                self.core.timebase,
                now,
            )),
        }
    }

    fn update_color_indices(&mut self, strip: &mut Strip) {
        if self.need_new_color {
            self.previous_color_index = self.current_color_index;
            self.target_color_index = strip.random_wheel_index(self.current_color_index, 32);
            self.transition_step = 0;
            self.need_new_color = false;
        }
        if self.transition_step < TRANSITION_FRAMES {
            self.transition_step += 1;
            let progress = helper::safe_map_u16(
                u16::from(self.transition_step),
                0,
                u16::from(TRANSITION_FRAMES),
                0,
                255,
            );
            #[allow(clippy::cast_possible_truncation)]
            {
                self.current_color_index = lerp8by8(
                    self.previous_color_index,
                    self.target_color_index,
                    progress as u8,
                );
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn fill_wipe(&self, strip: &mut Strip, wave_position: u16) {
        let rt = *strip.runtime();
        if rt.length == 0 {
            return;
        }
        let brightness = strip.segment().target_brightness();
        let base_hue = strip.runtime().base_hue;

        let color_new =
            strip.color_from_palette(self.current_color_index.wrapping_add(base_hue), brightness);
        let color_old =
            strip.color_from_palette(self.previous_color_index.wrapping_add(base_hue), brightness);

        let bar_width = (rt.length / 8).clamp(1, 3);
        let lo16 = rt.start * 16;
        let hi16 = (rt.stop * 16).saturating_sub(bar_width * 16).max(lo16);
        let pos16 = helper::safe_map_u16(wave_position, 0, 65535, lo16, hi16);
        let center = (pos16 / 16).clamp(rt.start, rt.stop.max(1) - 1);

        let (a, b) = (rt.start as usize, rt.stop as usize);
        fill_solid(&mut strip.leds_mut()[a..=b], color_old);
        if self.moving_up {
            if center > rt.start {
                fill_solid(&mut strip.leds_mut()[a..center as usize], color_new);
            }
        } else if center < rt.stop {
            fill_solid(&mut strip.leds_mut()[center as usize..=b], color_new);
        }

        let pal = *strip.current_palette();
        strip.draw_fractional_bar(
            i32::from(pos16),
            bar_width,
            &pal,
            self.current_color_index.wrapping_add(base_hue),
            brightness,
            false,
            1,
        );
    }
}

impl Effect for ColorWipeEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !self.core.standard_init(strip) {
            return false;
        }
        self.current_color_index = strip.random_wheel_index(0, 32);
        self.previous_color_index = strip.random_wheel_index(self.current_color_index, 32);
        self.target_color_index = self.current_color_index;
        self.previous_wave_position = 0;
        self.transition_step = 0;
        self.moving_up = true;
        self.need_new_color = true;
        true
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        let wave_position = self.wipe_position(strip);
        let flipped = (wave_position > self.previous_wave_position && !self.moving_up)
            || (wave_position < self.previous_wave_position && self.moving_up);
        if flipped {
            self.moving_up = !self.moving_up;
            self.need_new_color = true;
        }

        self.update_color_indices(strip);
        self.fill_wipe(strip, wave_position);
        self.previous_wave_position = wave_position;

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        match self.wave {
            WipeWave::Sawtooth => Mode::ColorWipeSawtooth,
            WipeWave::Sine => Mode::ColorWipeSine,
            WipeWave::Quad => Mode::ColorWipeQuad,
            WipeWave::Triwave => Mode::ColorWipeTriwave,
        }
    }
}
