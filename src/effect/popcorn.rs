//! Popping kernels: damped ballistic bounces.
//!
//! Each kernel falls back to the ground, loses energy through the damping
//! setting and occasionally re-pops to a random fraction of full height.

use super::{Effect, EffectCore, Mode};
use crate::helper;
use crate::segment::MAX_NUM_BARS;
use crate::strip::Strip;

#[derive(Debug, Clone, Copy, Default)]
struct Kernel {
    timebase: u32,
    v0: f64,
    damp: u8,
    color_index: u8,
}

pub struct PopcornEffect {
    core: EffectCore,
    kernels: [Kernel; MAX_NUM_BARS as usize],
    num_kernels: u8,
}

impl Default for PopcornEffect {
    fn default() -> Self {
        Self {
            core: EffectCore::default(),
            kernels: [Kernel::default(); MAX_NUM_BARS as usize],
            num_kernels: 0,
        }
    }
}

impl PopcornEffect {
    fn gravity(strip: &Strip) -> f64 {
        let g = -9.6 * f64::from(strip.segment().beat88()) / 1_000_000.0;
        if g == 0.0 { -0.001 } else { g }
    }

    fn max_velocity(strip: &Strip) -> f64 {
        let length16 = f64::from(strip.runtime().length) * 16.0;
        libm::sqrt(2.0 * libm::fabs(Self::gravity(strip)) * length16)
    }

    fn bounce(&mut self, i: usize, strip: &mut Strip, max_velocity: f64) {
        let damping_percent = strip.segment().damping.min(100);
        let kernel = &mut self.kernels[i];
        if damping_percent < 100 {
            kernel.v0 = kernel.v0 * f64::from(kernel.damp) / 100.0 - 0.02;
        }
        kernel.timebase = strip.now_ms();

        if kernel.v0 < 0.01 && strip.random8() < 1 {
            let pop = f64::from(strip.random8_range(80, 100)) / 100.0;
            let kernel = &mut self.kernels[i];
            kernel.v0 = pop * max_velocity;
            let color_index = kernel.color_index;
            let new_index = strip.random_wheel_index(color_index, 32);
            let damp = if damping_percent < 100 {
                (u16::from(strip.random8_range(90, 100)) * u16::from(damping_percent) / 100) as u8
            } else {
                100
            };
            let kernel = &mut self.kernels[i];
            kernel.color_index = new_index;
            kernel.damp = damp;
        }
    }
}

impl Effect for PopcornEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !self.core.standard_init(strip) {
            return false;
        }
        self.num_kernels = strip.segment().num_bars().min(MAX_NUM_BARS);
        let max_velocity = Self::max_velocity(strip);
        let now = strip.now_ms();
        let n = self.num_kernels.max(1);
        for i in 0..self.num_kernels as usize {
            #[allow(clippy::cast_possible_truncation)]
            let base_index = ((255 / u16::from(n)) * i as u16) as u8;
            let color_index = strip.random_wheel_index(base_index, 32);
            self.kernels[i] = Kernel {
                timebase: now,
                v0: max_velocity / (f64::from(i as u8) + 1.1),
                damp: 100,
                color_index,
            };
        }
        true
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        strip.clear_segment();

        let gravity = Self::gravity(strip);
        let max_velocity = Self::max_velocity(strip);
        let rt = *strip.runtime();
        let now = strip.now_ms();
        let pal = *strip.current_palette();

        for i in 0..self.num_kernels as usize {
            let kernel = self.kernels[i];
            let dt = f64::from(now.wrapping_sub(kernel.timebase));
            let mut position = (gravity / 2.0 * dt + kernel.v0) * dt;
            if position < 0.0 {
                self.bounce(i, strip, max_velocity);
                position = 0.0;
            }

            let pos16 = position.min(f64::from(rt.length) * 16.0 - 32.0).max(0.0) as u16;
            strip.draw_fractional_bar(
                i32::from(rt.start * 16 + pos16),
                1,
                &pal,
                self.kernels[i].color_index,
                255,
                true,
                0,
            );
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::Popcorn
    }
}
