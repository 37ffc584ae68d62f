//! Theater chase: every third pixel lit, the lit set rotating with the beat.

use super::{Effect, EffectCore, Mode};
use crate::color::BLACK;
use crate::helper;
use crate::strip::Strip;
use crate::wave::beat88;

const CHASE_PATTERN_SIZE: u16 = 3;
const BACKGROUND_BRIGHTNESS: u8 = 64;
const PALETTE_OFFSET: u8 = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaseStyle {
    /// Lit pixels from the palette, the rest dark
    Palette,
    /// Dim offset-palette background behind the chase
    DualPalette,
    /// One cycling color for the whole chase
    Rainbow,
}

pub struct TheaterChaseEffect {
    core: EffectCore,
    style: ChaseStyle,
    color_counter: u8,
}

impl TheaterChaseEffect {
    pub const fn new(style: ChaseStyle) -> Self {
        Self {
            core: EffectCore {
                timebase: 0,
                initialized: false,
            },
            style,
            color_counter: 0,
        }
    }
}

impl Effect for TheaterChaseEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        self.color_counter = 0;
        self.core.standard_init(strip)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        let rt = *strip.runtime();
        let beat = strip.segment().beat88();
        let beat_position = beat88(beat / 2, self.core.timebase, strip.now_ms());
        let chase_offset =
            helper::safe_map_u16(beat_position, 0, 65535, 0, 255) % CHASE_PATTERN_SIZE;

        self.color_counter = self.color_counter.wrapping_add(1);
        let rainbow_color = strip.color_from_palette(self.color_counter, 255);

        for i in 0..rt.length {
            let led_index = (rt.start + i) as usize;
            let base_index = (helper::safe_map_u16(i, 0, rt.length.max(2) - 1, 0, 255) as u8)
                .wrapping_add(rt.base_hue);

            if i % CHASE_PATTERN_SIZE == chase_offset {
                strip.leds_mut()[led_index] = match self.style {
                    ChaseStyle::Palette | ChaseStyle::DualPalette => {
                        strip.color_from_palette(base_index, 255)
                    }
                    ChaseStyle::Rainbow => rainbow_color,
                };
            } else {
                strip.leds_mut()[led_index] = match self.style {
                    ChaseStyle::DualPalette => strip.color_from_palette(
                        base_index.wrapping_add(PALETTE_OFFSET),
                        BACKGROUND_BRIGHTNESS,
                    ),
                    ChaseStyle::Palette | ChaseStyle::Rainbow => BLACK,
                };
            }
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        match self.style {
            ChaseStyle::Palette => Mode::TheaterChase,
            ChaseStyle::DualPalette => Mode::TheaterChaseDualPalette,
            ChaseStyle::Rainbow => Mode::TheaterChaseRainbow,
        }
    }
}
