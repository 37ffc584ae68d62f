//! Bouncing dots, each with its own randomized speed and wave shape.
//!
//! Bars cycle through triangle/quad/cubic shaping by index. Whenever a bar
//! returns to the origin its speed and color are re-rolled, so the dots
//! drift out of phase over time. The `ColorWipe` style reuses the same
//! machinery without the background fade.

use super::{Effect, EffectCore, Mode};
use crate::helper;
use crate::segment::MAX_NUM_BARS;
use crate::strip::Strip;
use crate::wave::{beat88, cubicwave16, quadwave16, triwave16};

const FADE_AMOUNT: u8 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotStyle {
    Beat,
    ColorWipe,
}

#[derive(Debug, Clone, Copy, Default)]
struct BarState {
    beat: u16,
    timebase: u32,
    color_offset: u8,
    new_base: bool,
}

pub struct DotBeatEffect {
    core: EffectCore,
    style: DotStyle,
    bars: [BarState; MAX_NUM_BARS as usize],
    num_bars: u8,
    last_beat88: u16,
}

impl DotBeatEffect {
    pub const fn new(style: DotStyle) -> Self {
        Self {
            core: EffectCore {
                timebase: 0,
                initialized: false,
            },
            style,
            bars: [BarState {
                beat: 0,
                timebase: 0,
                color_offset: 0,
                new_base: false,
            }; MAX_NUM_BARS as usize],
            num_bars: 0,
            last_beat88: 0,
        }
    }

    const fn bar_width(&self) -> u16 {
        match self.style {
            DotStyle::Beat => 2,
            DotStyle::ColorWipe => 3,
        }
    }

    fn roll_speed(strip: &mut Strip) -> u16 {
        let seg_beat = strip.segment().beat88();
        let divisor = u16::from(strip.random8_range(2, 6));
        let multiplier = u16::from(strip.random8_range(1, 4));
        ((seg_beat / divisor).saturating_mul(multiplier)).max(seg_beat)
    }

    fn seed_bars(&mut self, strip: &mut Strip) {
        self.num_bars = strip.segment().num_bars().clamp(1, MAX_NUM_BARS);
        let now = strip.now_ms();
        for i in 0..self.num_bars as usize {
            let beat = Self::roll_speed(strip);
            #[allow(clippy::cast_possible_truncation)]
            let lo = (i as u16 * (255 / u16::from(self.num_bars))) as u8;
            let color_offset = strip.random8_range(lo, lo.saturating_add(self.num_bars).max(lo + 1));
            self.bars[i] = BarState {
                beat,
                timebase: now,
                color_offset,
                new_base: false,
            };
        }
        self.last_beat88 = strip.segment().beat88();
    }

    fn reroll_speeds(&mut self, strip: &mut Strip) {
        for i in 0..self.num_bars as usize {
            self.bars[i].beat = Self::roll_speed(strip);
        }
        self.last_beat88 = strip.segment().beat88();
    }

    fn wave_position(&self, strip: &Strip, bar: usize) -> u16 {
        let beat = beat88(self.bars[bar].beat, self.bars[bar].timebase, strip.now_ms());
        match bar % 3 {
            0 => triwave16(beat),
            1 => quadwave16(beat),
            _ => cubicwave16(beat),
        }
    }

    /// Origin-crossing bookkeeping: re-anchor the timebase, nudge the speed
    /// and pick a fresh color whenever the bar returns home.
    fn on_position(&mut self, strip: &mut Strip, bar: usize, position: u16) {
        let rt = *strip.runtime();
        if position == rt.start * 16 {
            if self.bars[bar].new_base {
                self.bars[bar].timebase = strip.now_ms();
                self.bars[bar].new_base = false;
            }
            let delta = 256 - i32::from(strip.random16_below(512));
            let seg_beat = strip.segment().beat88();
            let adjusted = i32::from(self.bars[bar].beat) + delta;
            self.bars[bar].beat = adjusted.clamp(i32::from(seg_beat).max(256), 65535 - 512) as u16;
            let offset = self.bars[bar].color_offset;
            self.bars[bar].color_offset = strip.random_wheel_index(offset, 64);
        } else {
            self.bars[bar].new_base = true;
        }
    }
}

impl Effect for DotBeatEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !self.core.standard_init(strip) {
            return false;
        }
        self.seed_bars(strip);
        true
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        if self.num_bars != strip.segment().num_bars() {
            self.seed_bars(strip);
        }
        if self.last_beat88 != strip.segment().beat88() {
            self.reroll_speeds(strip);
        }

        if self.style == DotStyle::Beat {
            strip.fade_out(FADE_AMOUNT);
        }

        let width = self.bar_width();
        let pal = *strip.current_palette();
        for i in 0..self.num_bars as usize {
            let wave = self.wave_position(strip, i);
            let position = helper::map_to_strip16(strip, wave, width);
            self.on_position(strip, i, position);
            strip.draw_fractional_bar(
                i32::from(position),
                width,
                &pal,
                self.bars[i].color_offset,
                255,
                false,
                1,
            );
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        match self.style {
            DotStyle::Beat => Mode::DotBeat,
            DotStyle::ColorWipe => Mode::DotColWipe,
        }
    }
}
