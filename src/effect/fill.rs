//! Beat-modulated palette fills.
//!
//! Three variants over the same idea, a whole-segment palette fill whose
//! hue and brightness ride on beat oscillators:
//! - `Beat`: per-pixel brightness phase plus a wandering color index
//! - `Wave`: synchronized hue/brightness waves over the distribution
//! - `Bright`: slow full-palette walk with a long brightness swell

use super::{Effect, EffectCore, Mode};
use crate::color::nblend;
use crate::helper;
use crate::math8::{qadd8, triwave8};
use crate::strip::Strip;
use crate::wave::{beat8, beat88, beatsin8, beatsin88, beatsin88_phase};

const BASE_BLEND_AMOUNT: u8 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillVariant {
    Beat,
    Wave,
    Bright,
}

pub struct FillEffect {
    core: EffectCore,
    variant: FillVariant,
}

impl FillEffect {
    pub const fn new(variant: FillVariant) -> Self {
        Self {
            core: EffectCore {
                timebase: 0,
                initialized: false,
            },
            variant,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update_beat(&mut self, strip: &mut Strip) -> u16 {
        let now = strip.now_ms();
        let seg = strip.segment();
        let beat = seg.beat88();
        let rt = *strip.runtime();
        let reduced_beat = (beat >> 8) as u8;

        for k in rt.start..rt.stop {
            let brightness = beatsin88_phase(beat, 32, 255, now, (k - rt.start) * 2, now) as u8;
            let base_tri = triwave8(beat8(u16::from(reduced_beat), 0, now));
            let oscillation = beatsin8(u16::from(reduced_beat), 0, 20, 0, now);
            let position =
                helper::safe_map_u16(k, rt.start, rt.stop, 0, 255) as u8;
            let color_index = base_tri
                .wrapping_add(oscillation)
                .wrapping_add(position);

            let new_color = strip.color_from_palette(color_index, brightness);
            let blend_amount = qadd8(reduced_beat, BASE_BLEND_AMOUNT);
            nblend(&mut strip.leds_mut()[k as usize], new_color, blend_amount);
        }

        strip.min_delay()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update_wave(&mut self, strip: &mut Strip) -> u16 {
        let now = strip.now_ms();
        let seg = strip.segment();
        let beat = seg.beat88();
        let target_brightness = seg.target_brightness();
        let base_hue = strip.runtime().base_hue;

        let hue_offset = base_hue.wrapping_add(beatsin88(
            beat.saturating_mul(2),
            0,
            255,
            self.core.timebase,
            now,
        ) as u8);
        let delta = strip.distribution_delta_hue();
        let brightness = beatsin88(
            beat.max(1),
            u16::from(target_brightness / 10),
            255,
            self.core.timebase,
            now,
        ) as u8;

        strip.fill_palette_segment(hue_offset, delta, brightness);
        strip.min_delay()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update_bright(&mut self, strip: &mut Strip) -> u16 {
        let now = strip.now_ms();
        let beat = strip.segment().beat88();

        let hue_speed = (beat / 10).max(1);
        let hue_position = (beat88(hue_speed, self.core.timebase, now) >> 8) as u8;
        let delta = strip.distribution_delta_hue();
        let brightness_speed = (beat / 7).max(1);
        let brightness = beatsin88(brightness_speed, 24, 255, self.core.timebase, now) as u8;

        strip.fill_palette_segment(hue_position, delta, brightness);
        strip.min_delay()
    }
}

impl Effect for FillEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        self.core.standard_init(strip)
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        match self.variant {
            FillVariant::Beat => self.update_beat(strip),
            FillVariant::Wave => self.update_wave(strip),
            FillVariant::Bright => self.update_bright(strip),
        }
    }

    fn mode_id(&self) -> Mode {
        match self.variant {
            FillVariant::Beat => Mode::FillBeat,
            FillVariant::Wave => Mode::FillWave,
            FillVariant::Bright => Mode::FillBright,
        }
    }
}
