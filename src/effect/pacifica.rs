//! Pacifica: layered ocean waves (after Kriegsman's pacifica).
//!
//! Four independently-phased palette walks are added onto a dim deep-blue
//! base, then whitecaps brighten wherever the layers align and a final
//! pass re-deepens the blues. Layer compositing, not a single wave, is
//! what gives the water its depth.

use super::{Effect, Mode};
use crate::color::{Palette16, Rgb, fill_solid};
use crate::helper;
use crate::strip::Strip;
use crate::wave::{beat16, beatsin8, beatsin16, beatsin88};

#[derive(Default)]
pub struct PacificaEffect {
    ci_start1: u16,
    ci_start2: u16,
    ci_start3: u16,
    ci_start4: u16,
    last_ms: u32,
    initialized: bool,
}

impl PacificaEffect {
    /// The effect falls apart below a floor speed, clamp there
    fn effective_speed(beat88: u16) -> u16 {
        beat88.max(780)
    }
}

impl Effect for PacificaEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !helper::validate(strip) {
            return false;
        }
        self.ci_start1 = strip.random16();
        self.ci_start2 = strip.random16();
        self.ci_start3 = strip.random16();
        self.ci_start4 = strip.random16();
        self.last_ms = strip.now_ms().saturating_sub(u32::from(strip.min_delay()));
        self.initialized = true;
        strip.runtime_mut().modeinit = false;
        true
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        let now = strip.now_ms();
        let delta = now.wrapping_sub(self.last_ms);
        self.last_ms = now;
        let speed = Self::effective_speed(strip.segment().beat88());

        let speed_factor1 = beatsin16((speed / 333).max(2), 179, 269, 0, now);
        let speed_factor2 = beatsin16((speed / 250).max(2), 179, 269, 0, now);
        let delta1 = (delta * u32::from(speed_factor1)) / 256;
        let delta2 = (delta * u32::from(speed_factor2)) / 256;
        let delta21 = (delta1 + delta2) / 2;

        self.ci_start1 = self
            .ci_start1
            .wrapping_add((delta1 * u32::from(beatsin88(speed, 10, 13, 0, now))) as u16);
        self.ci_start2 = self
            .ci_start2
            .wrapping_sub((delta21 * u32::from(beatsin88((speed * 2) / 3, 8, 11, 0, now))) as u16);
        self.ci_start3 = self
            .ci_start3
            .wrapping_sub((delta1 * u32::from(beatsin88(speed / 2, 5, 7, 0, now))) as u16);
        self.ci_start4 = self
            .ci_start4
            .wrapping_sub((delta2 * u32::from(beatsin88(speed / 4, 4, 6, 0, now))) as u16);

        let rt = *strip.runtime();
        let (a, b) = (rt.start as usize, rt.stop as usize);
        fill_solid(&mut strip.leds_mut()[a..=b], Rgb { r: 2, g: 6, b: 10 });

        let p1 = Palette16::pacifica(1);
        let p2 = Palette16::pacifica(2);
        let p3 = Palette16::pacifica(3);

        strip.pacifica_layer(
            &p1,
            self.ci_start1,
            beatsin16((speed / 333).max(2), 11 * 256, 14 * 256, 0, now),
            beatsin8(10, 70, 130, 0, now),
            0u16.wrapping_sub(beat16((speed / 3).max(2), 0, now)),
        );
        strip.pacifica_layer(
            &p2,
            self.ci_start2,
            beatsin16((speed / 240).max(2), 6 * 256, 9 * 256, 0, now),
            beatsin8(17, 40, 80, 0, now),
            beat16(((speed * 2) / 5).max(2), 0, now),
        );
        strip.pacifica_layer(
            &p3,
            self.ci_start3,
            (speed / 166).max(2).saturating_mul(256),
            beatsin8(9, 10, 38, 0, now),
            0u16.wrapping_sub(beat16((speed / 2).max(2), 0, now)),
        );
        strip.pacifica_layer(
            &p3,
            self.ci_start4,
            (speed / 200).max(2).saturating_mul(256),
            beatsin8(8, 10, 28, 0, now),
            beat16(((speed * 3) / 5).max(2), 0, now),
        );

        strip.pacifica_add_whitecaps();
        strip.pacifica_deepen_colors();

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::Pacifica
    }
}
