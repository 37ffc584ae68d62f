//! Static palette fill.
//!
//! No time dependence beyond the global base-hue drift: the palette is
//! spread once across the segment according to the distribution setting.

use super::{Effect, EffectCore, Mode};
use crate::strip::Strip;

#[derive(Default)]
pub struct StaticEffect {
    core: EffectCore,
}

impl Effect for StaticEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        self.core.standard_init(strip)
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized && !self.init(strip) {
            return crate::helper::SAFE_DELAY_MS;
        }

        let base_hue = strip.runtime().base_hue;
        let delta = strip.distribution_delta_hue();
        strip.fill_palette_segment(base_hue, delta, 255);

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::Static
    }
}
