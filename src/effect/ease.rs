//! Dual eased bars meeting in the middle.
//!
//! Two mirrored bars ride a sine between the segment ends. Whenever a bar
//! crosses the center the speed is re-rolled around the configured beat,
//! which keeps the motion from looking mechanical. Re-anchoring the
//! timebase on that event can jump the position by a few sub-pixels.

use super::{Effect, EffectCore, Mode};
use crate::helper;
use crate::strip::Strip;
use crate::wave::beatsin88;

const WIDTH: u16 = 3;

#[derive(Default)]
pub struct EaseEffect {
    core: EffectCore,
    beat: u16,
    oldbeat: u16,
    p_lerp: u16,
    trigger: bool,
}

impl Effect for EaseEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !helper::validate(strip) {
            return false;
        }
        if self.core.initialized {
            return true;
        }
        let seg = strip.segment();
        self.beat = seg.beat88();
        self.oldbeat = seg.beat88();
        self.p_lerp = 0;
        self.trigger = false;
        self.core.standard_init(strip)
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        let rt = *strip.runtime();
        let seg_beat = strip.segment().beat88();
        strip.fade_out((seg_beat >> 5).min(255) as u8);

        let lerp_val = beatsin88(
            self.beat,
            rt.start * 16,
            (rt.stop * 16).saturating_sub(WIDTH * 16).max(rt.start * 16),
            self.core.timebase,
            strip.now_ms(),
        );

        if lerp_val == (rt.length * 16) / 2 {
            if self.trigger {
                if self.oldbeat != seg_beat {
                    self.beat = seg_beat;
                    self.oldbeat = seg_beat;
                }
                self.trigger = false;
                self.core.timebase = strip.now_ms();
                let jitter = strip.random8();
                if self.beat < 255 {
                    self.beat = self.beat.saturating_add(2 * u16::from(jitter));
                } else {
                    self.beat = self
                        .beat
                        .wrapping_add_signed(2 * (128 - i16::from(jitter)));
                }
            }
        } else if lerp_val != self.p_lerp {
            self.trigger = true;
        }
        self.p_lerp = lerp_val;

        #[allow(clippy::cast_possible_truncation)]
        let color_index = ((lerp_val / 16).wrapping_sub(rt.start) as u8).wrapping_add(rt.base_hue);
        let pal = *strip.current_palette();
        strip.draw_fractional_bar(i32::from(lerp_val), WIDTH, &pal, color_index, 255, true, 1);
        strip.draw_fractional_bar(
            i32::from(rt.stop * 16) - i32::from(lerp_val),
            WIDTH,
            &pal,
            color_index,
            255,
            true,
            1,
        );

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::Ease
    }
}
