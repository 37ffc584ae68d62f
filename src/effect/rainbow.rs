//! Rainbow sweeps.
//!
//! `Solid` shifts one palette color across the whole segment; `Cycle`
//! distributes the palette spatially and rotates it.

use super::{Effect, EffectCore, Mode};
use crate::helper;
use crate::strip::Strip;
use crate::wave::beat88;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainbowStyle {
    Solid,
    Cycle,
}

pub struct RainbowEffect {
    core: EffectCore,
    style: RainbowStyle,
}

impl RainbowEffect {
    pub const fn new(style: RainbowStyle) -> Self {
        Self {
            core: EffectCore {
                timebase: 0,
                initialized: false,
            },
            style,
        }
    }
}

impl Effect for RainbowEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
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

        let seg = strip.segment();
        let beat = beat88(seg.beat88(), self.core.timebase, strip.now_ms());
        let palette_index = (beat >> 8) as u8;
        let brightness = seg.brightness();

        match self.style {
            RainbowStyle::Solid => {
                let color = strip.color_from_palette(palette_index, brightness);
                let (a, b) = (strip.runtime().start as usize, strip.runtime().stop as usize);
                crate::color::fill_solid(&mut strip.leds_mut()[a..=b], color);
            }
            RainbowStyle::Cycle => {
                let delta = strip.distribution_delta_hue();
                strip.fill_palette_segment(palette_index, delta, 255);
            }
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        match self.style {
            RainbowStyle::Solid => Mode::Rainbow,
            RainbowStyle::Cycle => Mode::RainbowCycle,
        }
    }
}
