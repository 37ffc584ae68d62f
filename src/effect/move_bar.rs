//! Half-width bar pushed across the segment by different wave shapes.

use super::{Effect, EffectCore, Mode};
use crate::helper;
use crate::strip::Strip;
use crate::wave::{beat88, beatsin16, ease16_in_out_cubic, ease16_in_out_quad, triwave16};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveBarWave {
    Sine,
    Quad,
    Cubic,
    Sawtooth,
}

pub struct MoveBarEffect {
    core: EffectCore,
    wave: MoveBarWave,
}

impl MoveBarEffect {
    pub const fn new(wave: MoveBarWave) -> Self {
        Self {
            core: EffectCore {
                timebase: 0,
                initialized: false,
            },
            wave,
        }
    }

    /// Beat speed normalized against the segment count so multi-segment
    /// setups do not overspeed the bar.
    fn normalized_speed(strip: &Strip) -> u16 {
        let seg = strip.segment();
        let cap = 20000 / u16::from(seg.segments());
        let constrained = seg.beat88().min(cap);
        helper::safe_map_u16(constrained, 0, cap, 0, 65535)
    }
}

impl Effect for MoveBarEffect {
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
        let width = helper::proportional_width(strip, 2, 1);
        let speed = Self::normalized_speed(strip);

        let fade = helper::safe_map_u16(speed, 0, 65535, 64, 255) as u8;
        strip.fade_out(fade);

        let now = strip.now_ms();
        let pos16 = match self.wave {
            MoveBarWave::Sine => beatsin16(speed / 2, 0, width * 16, self.core.timebase, now),
            MoveBarWave::Quad => {
                let tri = triwave16(beat88(speed / 2, self.core.timebase, now));
                helper::safe_map_u16(ease16_in_out_quad(tri), 0, 65535, 0, width * 16)
            }
            MoveBarWave::Cubic => {
                let tri = triwave16(beat88(speed / 2, self.core.timebase, now));
                helper::safe_map_u16(ease16_in_out_cubic(tri), 0, 65535, 0, width * 16)
            }
            MoveBarWave::Sawtooth => {
                let tri = triwave16(beat88(speed / 2, self.core.timebase, now));
                helper::safe_map_u16(tri, 0, 65535, 0, width * 16)
            }
        };

        let color_increment = (255 / width.max(1)).max(1) as u8;
        let pal = *strip.current_palette();
        strip.draw_fractional_bar(
            i32::from(rt.start * 16 + pos16),
            width,
            &pal,
            rt.base_hue,
            255,
            false,
            color_increment,
        );

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        match self.wave {
            MoveBarWave::Sine => Mode::MoveBarSin,
            MoveBarWave::Quad => Mode::MoveBarQuad,
            MoveBarWave::Cubic => Mode::MoveBarCube,
            MoveBarWave::Sawtooth => Mode::MoveBarSawtooth,
        }
    }
}
