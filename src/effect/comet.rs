//! Comet-style fading bars.
//!
//! A proportional-width bar swept along the segment over a fading
//! background. The two modes differ only in the wave shaping: `Sawtooth`
//! wraps around (comet), `Triangle` bounces (Larson scanner).

use super::{Effect, EffectCore, Mode};
use crate::helper;
use crate::strip::Strip;
use crate::wave::{beat88, triwave16};

const FADE_AMOUNT: u8 = 96;
const SPEED_MULTIPLIER: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CometMotion {
    Sawtooth,
    Triangle,
}

pub struct CometEffect {
    core: EffectCore,
    motion: CometMotion,
}

impl CometEffect {
    pub const fn new(motion: CometMotion) -> Self {
        Self {
            core: EffectCore {
                timebase: 0,
                initialized: false,
            },
            motion,
        }
    }
}

impl Effect for CometEffect {
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

        let width = helper::proportional_width(strip, 15, 1);
        strip.fade_out(FADE_AMOUNT);

        let rt = *strip.runtime();
        let beat = beat88(
            strip.segment().beat88().saturating_mul(SPEED_MULTIPLIER),
            self.core.timebase,
            strip.now_ms(),
        );
        // the comet runs off the end of the segment (the draw call clips),
        // the scanner turns around before its bar would leave it
        let pos16 = match self.motion {
            CometMotion::Sawtooth => {
                rt.start * 16 + helper::safe_map_u16(beat, 0, 65535, 0, rt.length * 16)
            }
            CometMotion::Triangle => helper::map_to_strip16(strip, triwave16(beat), width),
        };
        let color_index = helper::color_index(strip, pos16, 0);

        let pal = *strip.current_palette();
        strip.draw_fractional_bar(i32::from(pos16), width, &pal, color_index, 255, true, 1);

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        match self.motion {
            CometMotion::Sawtooth => Mode::Comet,
            CometMotion::Triangle => Mode::LarsonScanner,
        }
    }
}
