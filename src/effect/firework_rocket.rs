//! Firework rockets with ballistic physics.
//!
//! Each rocket launches with 85-99% of the velocity that would exactly
//! reach the segment top under the speed-derived gravity, then explodes
//! once it slows below a randomized fraction of its launch velocity. The
//! explosion renders in three phases (bright burst with blur, dimming,
//! residual fade) before the rocket becomes eligible to relaunch.

use super::{Effect, EffectCore, Mode};
use crate::color::{Palette16, add_to_rgb, or_rgb, nscale8};
use crate::helper;
use crate::segment::MAX_NUM_BARS;
use crate::strip::Strip;

#[derive(Debug, Clone, Copy, Default)]
struct Rocket {
    timebase: u32,
    pos: f64,
    v0: f64,
    v: f64,
    v_explode: f64,
    prev_pos: u16,
    explode_time: u16,
    color_index: u8,
    brightness: u8,
}

pub struct FireworkRocketEffect {
    core: EffectCore,
    rockets: [Rocket; MAX_NUM_BARS as usize],
    num_rockets: u8,
}

impl Default for FireworkRocketEffect {
    fn default() -> Self {
        Self {
            core: EffectCore::default(),
            rockets: [Rocket::default(); MAX_NUM_BARS as usize],
            num_rockets: 0,
        }
    }
}

impl FireworkRocketEffect {
    /// Gravity in sixteenth-pixels per ms^2, derived from the speed setting
    fn gravity(strip: &Strip) -> f64 {
        let g = -9.6 * f64::from(strip.segment().beat88()) / 1_000_000.0;
        if g == 0.0 { -0.001 } else { g }
    }

    fn segment_length16(strip: &Strip) -> f64 {
        f64::from(strip.runtime().length) * 16.0
    }

    /// Launch velocity that would exactly reach the top: `v = sqrt(2 g h)`
    fn max_velocity(gravity: f64, length16: f64) -> f64 {
        libm::sqrt(2.0 * libm::fabs(gravity) * length16)
    }

    fn launch(&mut self, i: usize, strip: &mut Strip, max_velocity: f64) {
        let percent = f64::from(strip.rng().random16_range(850, 990)) / 1000.0;
        let rocket = &mut self.rockets[i];
        rocket.v0 = max_velocity * percent;
        rocket.v = rocket.v0;
        rocket.pos = 0.0;
        rocket.prev_pos = 0;
        rocket.timebase = strip.now_ms();
        rocket.explode_time = 0;
        let color_index = rocket.color_index;
        let explode_fraction = f64::from(strip.random8_range(20, 40)) / 100.0;
        let rocket = &mut self.rockets[i];
        rocket.color_index = strip.random_wheel_index(color_index, 32);
        rocket.brightness = strip.random8_range(12, 48);
        rocket.v_explode = rocket.v0 * explode_fraction;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn step_physics(&mut self, i: usize, strip: &mut Strip, gravity: f64, length16: f64) {
        let now = strip.now_ms();
        let rocket = &mut self.rockets[i];
        let dt = f64::from(now.wrapping_sub(rocket.timebase));
        rocket.pos = rocket.v0 * dt + gravity * dt * dt / 2.0;
        rocket.v = rocket.v0 + gravity * dt;

        if rocket.v < rocket.v_explode || rocket.pos >= length16 {
            if rocket.explode_time == 0 {
                rocket.explode_time = 80 + u16::from(strip.rng().random8_below(80));
            }
            let rocket = &mut self.rockets[i];
            rocket.v0 = 0.0;
            rocket.v = 0.0;
            rocket.timebase = now;
            if rocket.pos > length16 {
                rocket.pos = length16;
            }
        }
        let rocket = &mut self.rockets[i];
        if rocket.pos < 0.0 {
            rocket.pos = 0.0;
            rocket.v0 = 0.0;
            rocket.v = 0.0;
            rocket.prev_pos = 0;
            rocket.timebase = now;
            rocket.explode_time = 0;
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render_launch(&mut self, i: usize, strip: &mut Strip) {
        let rocket = self.rockets[i];
        let frac_pos = rocket.pos.max(0.0) as u16;
        let width = if rocket.prev_pos == 0 {
            1
        } else {
            (u16::from(frac_pos.abs_diff(rocket.prev_pos)) / 16).clamp(1, 5)
        };
        self.rockets[i].prev_pos = frac_pos;

        let heat = Palette16::heat();
        strip.draw_fractional_bar(
            i32::from(frac_pos),
            width,
            &heat,
            64,
            rocket.brightness,
            true,
            1,
        );
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render_explosion(&mut self, i: usize, strip: &mut Strip, max_blend_width: u16) {
        let rocket = self.rockets[i];
        let rt = *strip.runtime();
        let frac_pos = rocket.pos.max(0.0) as u16;
        let center = (frac_pos / 16).min(rt.stop);

        let mut blend_width = max_blend_width.saturating_sub(3).max(2);
        if rt.stop.saturating_sub(center) < blend_width / 2 + 3 {
            blend_width = rt.stop.saturating_sub(center) * 2;
        }
        if center < blend_width / 2 {
            blend_width = center * 2;
        }

        let render_brightness =
            helper::safe_map_u16(u16::from(rocket.brightness), 0, 48, 0, 255) as u8;
        let pal = *strip.current_palette();

        if rocket.explode_time > 10 {
            // burst: palette core, white-lifted center, sparks, wide blur
            strip.draw_fractional_bar(
                i32::from(frac_pos),
                3,
                &pal,
                rocket.color_index,
                255,
                true,
                0,
            );
            let center_color = add_to_rgb(strip.leds()[center as usize], 0x20);
            let center_pal = Palette16::solid(center_color);
            strip.draw_fractional_bar(i32::from(frac_pos), 3, &center_pal, 0, 255, true, 0);
            self.add_sparks(i, strip, frac_pos, blend_width / 4);
            Self::blur_span(strip, center + 1, blend_width, 172);
        } else if rocket.explode_time > 0 {
            strip.draw_fractional_bar(
                i32::from(frac_pos),
                3,
                &pal,
                rocket.color_index,
                render_brightness,
                true,
                0,
            );
            Self::blur_span(strip, center, blend_width, 128);
        } else {
            strip.draw_fractional_bar(
                i32::from(frac_pos),
                3,
                &pal,
                rocket.color_index,
                render_brightness,
                true,
                0,
            );
            Self::blur_span(strip, center, blend_width, 64);
        }
    }

    fn blur_span(strip: &mut Strip, from: u16, width: u16, amount: u8) {
        let rt = *strip.runtime();
        let lo = from.max(rt.start) as usize;
        let hi = (from + width).min(rt.stop) as usize;
        if hi > lo {
            crate::color::blur1d(&mut strip.leds_mut()[lo..=hi], amount);
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn add_sparks(&mut self, i: usize, strip: &mut Strip, explosion_pos16: u16, spark_radius: u16) {
        let rocket = self.rockets[i];
        let rt = *strip.runtime();
        let num_sparks = strip.random8_range(1, 3);
        for _ in 0..num_sparks {
            let offset =
                i32::from(strip.random16_below(spark_radius * 2 + 1)) - i32::from(spark_radius);
            let raw = i32::from(explosion_pos16 / 16) + offset;
            let led_index = raw.clamp(i32::from(rt.start), i32::from(rt.stop)) as usize;

            let spark_brightness = strip.random8_range(76, 206);
            let spark_index = rocket
                .color_index
                .wrapping_add(strip.random8_below(128))
                .wrapping_sub(64);
            let spark = strip.color_from_palette(spark_index, spark_brightness);
            strip.leds_mut()[led_index] = or_rgb(strip.leds()[led_index], spark);

            if strip.random8() < 64 {
                let white = nscale8(
                    crate::color::rgb_from_u32(0xFFFFFF),
                    spark_brightness / 2,
                );
                strip.leds_mut()[led_index] = or_rgb(strip.leds()[led_index], white);
            }
        }
    }
}

impl Effect for FireworkRocketEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !self.core.standard_init(strip) {
            return false;
        }
        self.num_rockets = strip.segment().num_bars().min(MAX_NUM_BARS);
        let now = strip.now_ms();
        let n = u16::from(self.num_rockets.max(1)) - 1;
        for (i, rocket) in self.rockets.iter_mut().enumerate().take(self.num_rockets as usize) {
            *rocket = Rocket {
                timebase: now,
                #[allow(clippy::cast_possible_truncation)]
                color_index: helper::safe_map_u16(i as u16, 0, n.max(1), 0, 255) as u8,
                ..Rocket::default()
            };
        }
        true
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.core.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        #[allow(clippy::cast_possible_truncation)]
        let fade = helper::safe_map_u16(strip.segment().beat88(), 0, 6000, 24, 255) as u8;
        strip.fade_out(fade);

        let gravity = Self::gravity(strip);
        let length16 = Self::segment_length16(strip);
        let max_velocity = Self::max_velocity(gravity, length16);
        let max_blend_width = helper::proportional_width(strip, 2, 1);

        for i in 0..self.num_rockets as usize {
            let rocket = self.rockets[i];
            if rocket.pos <= 0.0 && rocket.explode_time == 0 {
                // relaunch gate: grounded, spent, and a random pass
                if rocket.v0 == 0.0 && strip.random8() < 2 {
                    self.launch(i, strip, max_velocity);
                }
            }

            let rocket = self.rockets[i];
            if rocket.pos > 0.0 && rocket.explode_time == 0 {
                self.step_physics(i, strip, gravity, length16);
                let rocket = self.rockets[i];
                if rocket.v > rocket.v_explode {
                    self.render_launch(i, strip);
                } else {
                    self.render_explosion(i, strip, max_blend_width);
                }
            } else if rocket.explode_time > 0 {
                self.render_explosion(i, strip, max_blend_width);
                self.rockets[i].explode_time -= 1;
            }
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::FireworkRocket
    }
}
