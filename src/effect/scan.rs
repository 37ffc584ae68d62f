//! Scanning bars over a cleared background.
//!
//! `Single` sweeps one bar back and forth; `Dual` adds a second bar
//! mirrored from the other end.

use super::{Effect, EffectCore, Mode};
use crate::helper;
use crate::strip::Strip;

const BAR_WIDTH: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStyle {
    Single,
    Dual,
}

pub struct ScanEffect {
    core: EffectCore,
    style: ScanStyle,
}

impl ScanEffect {
    pub const fn new(style: ScanStyle) -> Self {
        Self {
            core: EffectCore {
                timebase: 0,
                initialized: false,
            },
            style,
        }
    }
}

impl Effect for ScanEffect {
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

        let rt = *strip.runtime();
        let triangular = helper::triangle_position(strip, self.core.timebase, 1);
        let max_offset = (rt.length * 16).saturating_sub(BAR_WIDTH * 16);
        let offset = helper::safe_map_u16(triangular, 0, 65535, 0, max_offset);

        strip.clear_segment();

        let pal = *strip.current_palette();
        let forward_index = ((offset / 16) as u8).wrapping_add(rt.base_hue);
        strip.draw_fractional_bar(
            i32::from(rt.start * 16 + offset),
            BAR_WIDTH,
            &pal,
            forward_index,
            255,
            true,
            1,
        );

        if self.style == ScanStyle::Dual {
            let reverse_index = (255 - (offset / 16) as u8).wrapping_add(rt.base_hue);
            strip.draw_fractional_bar(
                i32::from(rt.stop * 16) - i32::from(offset) - i32::from(BAR_WIDTH * 16),
                BAR_WIDTH,
                &pal,
                reverse_index,
                255,
                true,
                1,
            );
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        match self.style {
            ScanStyle::Single => Mode::Scan,
            ScanStyle::Dual => Mode::DualScan,
        }
    }
}
