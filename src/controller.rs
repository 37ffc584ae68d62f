//! The strip controller: scheduling, transitions, compositing, output.
//!
//! One `service()` call runs a fixed sequence: drain commands, advance the
//! hue/palette/autoplay timers, render the active effect into the front
//! buffer when its delay elapsed, then composite front into back
//! (transition blend, segment mirroring, reverse/inverse mapping) and push
//! the corrected frame to the output driver. Single-threaded by
//! construction; effects never observe a half-composited back buffer.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{
    BLACK, Hsv, PaletteId, Rgb, fade_to_black_by, hsv_to_rgb, invert_rgb, kelvin_to_rgb, luma,
    nblend, nscale8, or_rgb,
};
use crate::command::{Command, CommandReceiver};
use crate::effect::{Effect, Mode, create_effect};
use crate::fields::{self, FieldId};
use crate::helper;
use crate::OutputDriver;
use crate::segment::AutoplayMode;
use crate::strip::Strip;

const TRANSITION_STEP_MS: u32 = 20;
const BRIGHTNESS_STEP_MS: u32 = 5;
const PALETTE_BLEND_MS: u32 = 12;
const PALETTE_BLEND_STEP: u8 = 8;
const BACKGROUND_STEP_MS: u32 = 20;
const POWER_OFF_FADE: u8 = 16;

pub struct StripController<O: OutputDriver> {
    strip: Strip,
    driver: O,
    effect: Option<Box<dyn Effect>>,

    transition: bool,
    blend: u8,
    triggered: bool,

    next_blend_ms: u32,
    next_brightness_ms: u32,
    next_palette_blend_ms: u32,
    next_background_ms: u32,

    effect_speeds: [u16; Mode::COUNT as usize],
    old_segments: u8,

    // smoothed background color state
    bck_hue: u8,
    bck_sat: u8,
    bck_bri: u8,

    correction: Rgb,
    correction_kelvin: u16,

    out: Vec<Rgb>,
}

impl<O: OutputDriver> StripController<O> {
    pub fn new(led_count: u16, seed: u16, driver: O) -> Self {
        let strip = Strip::new(led_count, seed);
        let correction_kelvin = strip.segment().color_temp_k;
        Self {
            strip,
            driver,
            effect: None,
            transition: false,
            blend: 0,
            triggered: false,
            next_blend_ms: 0,
            next_brightness_ms: 0,
            next_palette_blend_ms: 0,
            next_background_ms: 0,
            effect_speeds: [0; Mode::COUNT as usize],
            old_segments: 1,
            bck_hue: 0,
            bck_sat: 0,
            bck_bri: 0,
            correction: kelvin_to_rgb(correction_kelvin),
            correction_kelvin,
            out: vec![BLACK; led_count as usize],
        }
    }

    pub fn strip(&self) -> &Strip {
        &self.strip
    }

    pub fn strip_mut(&mut self) -> &mut Strip {
        &mut self.strip
    }

    pub const fn in_transition(&self) -> bool {
        self.transition
    }

    pub const fn blend_weight(&self) -> u8 {
        self.blend
    }

    pub fn active_mode(&self) -> Mode {
        self.strip.segment().mode()
    }

    /// The composited frame written to the driver on the last service call
    pub fn frame(&self) -> &[Rgb] {
        &self.out
    }

    // --- user-facing state changes --------------------------------------

    /// Switch the active effect, remembering the outgoing mode's speed and
    /// starting a crossfade transition.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.strip.segment().mode() {
            return;
        }
        #[cfg(feature = "esp32-log")]
        println!("[StripController] mode {} -> {}", self.active_mode().as_str(), mode.as_str());

        let old_mode = self.strip.segment().mode();
        self.effect_speeds[old_mode as usize] = self.strip.segment().beat88();

        if !self.transition && old_mode != Mode::Void {
            self.strip.clear_all();
        }

        self.strip.segment_mut().set_mode(mode);
        self.strip.runtime_mut().modeinit = true;

        let stored = self.effect_speeds[mode as usize];
        if stored != 0 {
            self.strip.segment_mut().set_beat88(stored);
        }

        self.start_transition();
    }

    pub fn set_power(&mut self, on: bool) {
        self.strip.segment_mut().power = on;
        if on {
            self.start_transition();
        }
    }

    pub fn set_speed(&mut self, beat88: u16) {
        self.strip.segment_mut().set_beat88(beat88);
    }

    pub fn set_brightness(&mut self, brightness: u8) {
        self.strip.segment_mut().set_target_brightness(brightness);
    }

    pub fn set_target_palette(&mut self, id: PaletteId) {
        self.strip.set_target_palette(id);
    }

    /// Render the next frame as soon as possible
    pub fn trigger(&mut self) {
        self.triggered = true;
    }

    /// Persisted form of the current configuration
    pub fn snapshot(&self) -> crate::segment::SegmentSnapshot {
        self.strip.segment().snapshot()
    }

    /// Re-apply a stored configuration, e.g. at boot. Returns `false` and
    /// changes nothing when the record's CRC does not match.
    pub fn restore_snapshot(&mut self, snap: &crate::segment::SegmentSnapshot) -> bool {
        if !snap.is_valid() {
            return false;
        }
        self.strip.segment_mut().restore(snap);
        self.strip.sync_runtime();
        if let Some(palette) = PaletteId::from_raw(snap.target_palette_num) {
            self.strip.set_target_palette(palette);
        }
        self.strip.runtime_mut().modeinit = true;
        if let Some(mut old) = self.effect.take() {
            old.cleanup();
        }
        self.old_segments = self.strip.segment().segments();
        true
    }

    fn start_transition(&mut self) {
        self.transition = true;
        self.blend = 0;
        let now = self.strip.now_ms();
        self.strip.runtime_mut().timebase = now;
    }

    // --- reflected fields ----------------------------------------------

    pub fn field_get(&self, id: FieldId) -> u32 {
        let seg = self.strip.segment();
        match id {
            FieldId::Power => u32::from(seg.power),
            FieldId::Mode => u32::from(seg.mode() as u8),
            FieldId::Speed => u32::from(seg.beat88()),
            FieldId::Brightness => u32::from(seg.target_brightness()),
            FieldId::TargetPalette => u32::from(self.strip.target_palette_id() as u8),
            FieldId::BlendType => u32::from(matches!(
                seg.blend_type,
                crate::color::BlendType::LinearBlend
            )),
            FieldId::Reverse => u32::from(seg.reverse),
            FieldId::Inverse => u32::from(seg.inverse),
            FieldId::NumBars => u32::from(seg.num_bars()),
            FieldId::Segments => u32::from(seg.segments()),
            FieldId::HueTime => u32::from(seg.hue_time),
            FieldId::DeltaHue => u32::from(seg.delta_hue),
            FieldId::Autoplay => seg.autoplay as u32,
            FieldId::AutoplayDuration => u32::from(seg.autoplay_duration_s),
            FieldId::AutoPal => seg.auto_pal as u32,
            FieldId::AutoPalDuration => u32::from(seg.auto_pal_duration_s),
            FieldId::Cooling => u32::from(seg.cooling),
            FieldId::Sparking => u32::from(seg.sparking),
            FieldId::TwinkleSpeed => u32::from(seg.twinkle_speed),
            FieldId::TwinkleDensity => u32::from(seg.twinkle_density),
            FieldId::PaletteDistribution => u32::from(seg.palette_distribution()),
            FieldId::Damping => u32::from(seg.damping),
            FieldId::SunriseTime => u32::from(seg.sunrise_time_min()),
            FieldId::ColorTemp => u32::from(seg.color_temp_k),
            FieldId::BackgroundHue => u32::from(seg.background_hue),
            FieldId::BackgroundSat => u32::from(seg.background_sat),
            FieldId::BackgroundBri => u32::from(seg.background_bri),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn field_set(&mut self, id: FieldId, raw: u32) {
        let value = fields::clamp_value(id, raw);
        match id {
            FieldId::Power => self.set_power(value != 0),
            FieldId::Mode => {
                if let Some(mode) = Mode::from_raw(value as u8) {
                    self.set_mode(mode);
                }
            }
            FieldId::Speed => self.set_speed(value as u16),
            FieldId::Brightness => self.set_brightness(value as u8),
            FieldId::TargetPalette => {
                if let Some(id) = PaletteId::from_raw(value as u8) {
                    self.set_target_palette(id);
                }
            }
            FieldId::BlendType => {
                self.strip.segment_mut().blend_type = if value != 0 {
                    crate::color::BlendType::LinearBlend
                } else {
                    crate::color::BlendType::NoBlend
                };
            }
            FieldId::Reverse => self.strip.segment_mut().reverse = value != 0,
            FieldId::Inverse => self.strip.segment_mut().inverse = value != 0,
            FieldId::NumBars => self.strip.segment_mut().set_num_bars(value as u8),
            FieldId::Segments => self.strip.segment_mut().set_segments(value as u8),
            FieldId::HueTime => self.strip.segment_mut().hue_time = value as u16,
            FieldId::DeltaHue => self.strip.segment_mut().delta_hue = value as u8,
            FieldId::Autoplay => {
                self.strip.segment_mut().autoplay = fields::autoplay_from_value(value);
            }
            FieldId::AutoplayDuration => {
                self.strip.segment_mut().autoplay_duration_s = (value as u16).max(1);
            }
            FieldId::AutoPal => {
                self.strip.segment_mut().auto_pal = fields::autoplay_from_value(value);
            }
            FieldId::AutoPalDuration => {
                self.strip.segment_mut().auto_pal_duration_s = (value as u16).max(1);
            }
            FieldId::Cooling => self.strip.segment_mut().cooling = value as u8,
            FieldId::Sparking => self.strip.segment_mut().sparking = value as u8,
            FieldId::TwinkleSpeed => self.strip.segment_mut().twinkle_speed = value as u8,
            FieldId::TwinkleDensity => self.strip.segment_mut().twinkle_density = value as u8,
            FieldId::PaletteDistribution => {
                self.strip.segment_mut().set_palette_distribution(value as u8);
            }
            FieldId::Damping => self.strip.segment_mut().damping = value as u8,
            FieldId::SunriseTime => self.strip.segment_mut().set_sunrise_time_min(value as u8),
            FieldId::ColorTemp => {
                self.strip.segment_mut().color_temp_k = (value as u16).clamp(1000, 40000);
            }
            FieldId::BackgroundHue => self.strip.segment_mut().background_hue = value as u8,
            FieldId::BackgroundSat => self.strip.segment_mut().background_sat = value as u8,
            FieldId::BackgroundBri => self.strip.segment_mut().background_bri = value as u8,
        }
    }

    /// Drain every pending command before the frame
    pub fn drain_commands<const N: usize>(&mut self, rx: &CommandReceiver<'_, N>) {
        while let Some(command) = rx.try_receive() {
            self.apply_command(command);
        }
    }

    pub fn apply_command(&mut self, command: Command) {
        match command {
            Command::SetMode(mode) => self.set_mode(mode),
            Command::SetSpeed(speed) => self.set_speed(speed),
            Command::SetBrightness(brightness) => self.set_brightness(brightness),
            Command::SetTargetPalette(id) => self.set_target_palette(id),
            Command::SetPower(on) => self.set_power(on),
            Command::SetAutoplay(mode) => self.strip.segment_mut().autoplay = mode,
            Command::SetAutoPal(mode) => self.strip.segment_mut().auto_pal = mode,
            Command::SetField(id, value) => self.field_set(id, value),
            Command::Trigger => self.trigger(),
        }
    }

    // --- autoplay ------------------------------------------------------

    fn next_mode(&mut self, autoplay: AutoplayMode) {
        let current = self.strip.segment().mode();
        if current as u8 >= Mode::FIRST_SPECIAL as u8 {
            return;
        }
        let last_auto = Mode::FIRST_SPECIAL as u8 - 1;
        match autoplay {
            AutoplayMode::Off => {}
            AutoplayMode::Up => {
                let next = if current as u8 == last_auto {
                    Mode::Static
                } else {
                    Mode::from_raw(current as u8 + 1).unwrap_or(Mode::Static)
                };
                self.set_mode(next);
            }
            AutoplayMode::Down => {
                let next = if current as u8 == 0 {
                    Mode::from_raw(last_auto).unwrap_or(Mode::Static)
                } else {
                    Mode::from_raw(current as u8 - 1).unwrap_or(Mode::Static)
                };
                self.set_mode(next);
            }
            AutoplayMode::Random => {
                let mut next = current as u8;
                while next == current as u8 {
                    next = self.strip.random8_below(Mode::FIRST_SPECIAL as u8);
                }
                if let Some(mode) = Mode::from_raw(next) {
                    self.set_mode(mode);
                }
            }
        }
    }

    fn next_palette(&mut self, autoplay: AutoplayMode) {
        let current = self.strip.target_palette_id() as u8;
        let count = PaletteId::COUNT;
        match autoplay {
            AutoplayMode::Off => {}
            AutoplayMode::Up => {
                let next = if current + 1 >= count { 0 } else { current + 1 };
                if let Some(id) = PaletteId::from_raw(next) {
                    self.strip.set_target_palette(id);
                }
            }
            AutoplayMode::Down => {
                let next = if current == 0 { count - 1 } else { current - 1 };
                if let Some(id) = PaletteId::from_raw(next) {
                    self.strip.set_target_palette(id);
                }
            }
            AutoplayMode::Random => {
                let mut next = current;
                while next == current {
                    next = self.strip.random8_below(count - 1);
                }
                if let Some(id) = PaletteId::from_raw(next) {
                    self.strip.set_target_palette(id);
                }
            }
        }
    }

    // --- the service loop ----------------------------------------------

    /// Run one engine step. Call at least at the configured frame rate;
    /// cheaper calls in between are fine, the internal timestamps gate all
    /// work.
    pub fn service(&mut self, now: Instant) {
        self.strip.set_now(now);
        let now_ms = self.strip.now_ms();

        self.handle_segment_count_change();

        if self.strip.runtime().modeinit {
            self.strip.clear_all();
            self.start_transition();
            self.strip.runtime_mut().modeinit = false;
        }

        self.advance_timers(now_ms);

        if !self.strip.segment().power {
            self.render_powered_off(now_ms);
            return;
        }
        if !self.strip.segment().is_running && !self.triggered {
            return;
        }

        if now_ms >= self.strip.runtime().next_time || self.triggered {
            self.ensure_effect();
            let delay = if let Some(mut effect) = self.effect.take() {
                let delay = effect.update(&mut self.strip);
                self.effect = Some(effect);
                delay
            } else {
                helper::SAFE_DELAY_MS
            };
            self.strip.runtime_mut().next_time = now_ms + u32::from(delay);
        }
        self.triggered = false;

        // effect-requested switches (sunset finishing, void parking)
        if let Some(mode) = self.strip.take_pending_mode() {
            self.set_mode(mode);
        }
        if let Some(power) = self.strip.take_pending_power() {
            self.set_power(power);
        }

        self.step_transition(now_ms);

        if now_ms >= self.next_brightness_ms {
            self.strip.segment_mut().step_brightness();
            self.next_brightness_ms = now_ms + BRIGHTNESS_STEP_MS;
        }

        if self.strip.segment().mode() == Mode::Void {
            // void freezes the composited buffer, external writers own it
            self.push_frame();
            return;
        }

        self.composite();
        self.apply_background(now_ms);
        self.push_frame();
    }

    #[allow(clippy::cast_possible_truncation)]
    fn handle_segment_count_change(&mut self) {
        let segments = self.strip.segment().segments();
        self.strip.sync_runtime();
        if segments != self.old_segments {
            let max_bars = (self.strip.runtime().length / 15).clamp(1, 255);
            if u16::from(self.strip.segment().num_bars()) > max_bars {
                self.strip.segment_mut().set_num_bars(max_bars as u8);
            }
            // remove distribution artifacts from the previous layout
            self.strip.clear_all();
            self.start_transition();
            self.old_segments = segments;
        }
    }

    fn advance_timers(&mut self, now_ms: u32) {
        // hue drift
        let (hue_time, delta_hue) = {
            let seg = self.strip.segment();
            (seg.hue_time, seg.delta_hue)
        };
        if now_ms >= self.strip.runtime().next_hue {
            let rt = self.strip.runtime_mut();
            if hue_time == 0 {
                rt.base_hue = delta_hue;
            } else {
                rt.base_hue = rt.base_hue.wrapping_add(1);
            }
            rt.next_hue = now_ms + u32::from(hue_time);
        }

        // palette blending toward the target
        if now_ms >= self.next_palette_blend_ms {
            self.strip.blend_palette_tick(PALETTE_BLEND_STEP);
            self.next_palette_blend_ms = now_ms + PALETTE_BLEND_MS;
        }

        // autoplay of modes and palettes, suspended during transitions
        let autoplay = self.strip.segment().autoplay;
        if now_ms >= self.strip.runtime().next_auto {
            if !self.transition {
                self.next_mode(autoplay);
                let duration = u32::from(self.strip.segment().autoplay_duration_s) * 1000;
                self.strip.runtime_mut().next_auto = now_ms + duration;
            }
        }

        let auto_pal = self.strip.segment().auto_pal;
        if now_ms >= self.strip.runtime().next_palette {
            if !self.transition {
                self.next_palette(auto_pal);
                let duration = u32::from(self.strip.segment().auto_pal_duration_s) * 1000;
                self.strip.runtime_mut().next_palette = now_ms + duration;
            }
        }
    }

    fn ensure_effect(&mut self) {
        let mode = self.strip.segment().mode();
        let needs_new = match &self.effect {
            Some(effect) => effect.mode_id() != mode,
            None => true,
        };
        if !needs_new {
            return;
        }

        if let Some(mut old) = self.effect.take() {
            old.cleanup();
        }

        // registry miss falls back to the static effect rather than dying
        let mut effect = create_effect(mode).or_else(|| create_effect(Mode::Static));
        if let Some(instance) = effect.as_mut() {
            instance.init(&mut self.strip);
            if !instance.supports_transition() {
                self.transition = false;
                self.blend = 255;
            }
        }
        self.effect = effect;
    }

    fn step_transition(&mut self, now_ms: u32) {
        if self.transition {
            if now_ms >= self.next_blend_ms {
                self.blend = self.blend.saturating_add(1);
                self.next_blend_ms = now_ms + TRANSITION_STEP_MS;
            }
            if self.blend == 255 {
                self.transition = false;
            }
        }
    }

    /// Blend the effect buffer into the back buffer, applying transition
    /// weight, segment repetition with mirroring, and the reverse/inverse
    /// flags.
    fn composite(&mut self) {
        let seg_blur = self.strip.segment().blur;
        let l_blend = if self.transition {
            self.blend.min(seg_blur)
        } else {
            seg_blur
        };

        let (reverse, inverse, segments) = {
            let seg = self.strip.segment();
            (seg.reverse, seg.inverse, u16::from(seg.segments()))
        };
        let rt = *self.strip.runtime();
        let led_count = self.strip.leds.len();

        // bleed residual artifacts out of the back buffer
        fade_to_black_by(&mut self.strip.bleds, 1);

        for j in 0..segments {
            let mirrored = j & 0x01 == 1;
            for i in 0..rt.length {
                let dest = (j * rt.length + i) as usize;
                if dest >= led_count {
                    break;
                }
                // odd segments mirror, reverse flips again
                let src = if mirrored != reverse {
                    rt.stop - i
                } else {
                    rt.start + i
                };
                let mut color = self.strip.leds[src as usize];
                if inverse {
                    color = invert_rgb(color);
                }
                nblend(&mut self.strip.bleds[dest], color, l_blend);
            }
        }
    }

    fn apply_background(&mut self, now_ms: u32) {
        let seg = self.strip.segment();
        let (target_hue, target_sat, target_bri) =
            (seg.background_hue, seg.background_sat, seg.background_bri);

        if now_ms >= self.next_background_ms {
            self.bck_hue = step_toward(self.bck_hue, target_hue);
            self.bck_sat = step_toward(self.bck_sat, target_sat);
            self.bck_bri = step_toward(self.bck_bri, target_bri);
            self.next_background_ms = now_ms + BACKGROUND_STEP_MS;
        }

        if target_bri == 0 || self.bck_bri == 0 {
            return;
        }

        let background = hsv_to_rgb(Hsv {
            hue: self.bck_hue,
            sat: self.bck_sat,
            val: self.bck_bri,
        });
        let bg_luma = u16::from(luma(background));
        if bg_luma == 0 {
            return;
        }

        for px in &mut self.strip.bleds {
            let px_luma = u16::from(luma(*px)) * 3;
            if self.transition {
                *px = or_rgb(*px, background);
            } else if px_luma < bg_luma {
                // darker pixels take more background
                let weight = helper::safe_map_u16(px_luma, 0, bg_luma, 255, 0);
                #[allow(clippy::cast_possible_truncation)]
                nblend(px, background, weight as u8);
            }
        }
    }

    fn push_frame(&mut self) {
        let brightness = self.strip.segment().brightness();
        let kelvin = self.strip.segment().color_temp_k;
        if kelvin != self.correction_kelvin {
            self.correction = kelvin_to_rgb(kelvin);
            self.correction_kelvin = kelvin;
        }
        let correction = self.correction;

        for (out, src) in self.out.iter_mut().zip(&self.strip.bleds) {
            let scaled = nscale8(*src, brightness);
            *out = Rgb {
                r: crate::math8::scale8(scaled.r, correction.r),
                g: crate::math8::scale8(scaled.g, correction.g),
                b: crate::math8::scale8(scaled.b, correction.b),
            };
        }
        self.driver.write(&self.out);
    }

    fn render_powered_off(&mut self, now_ms: u32) {
        // keep writing while anything is lit, then go quiet
        if now_ms >= self.strip.runtime().next_time {
            let min_delay = u32::from(self.strip.min_delay());
            self.strip.runtime_mut().next_time = now_ms + min_delay;

            let lit = self.strip.bleds.iter().any(|c| crate::color::is_lit(*c))
                || self.strip.leds.iter().any(|c| crate::color::is_lit(*c));
            if lit {
                fade_to_black_by(&mut self.strip.bleds, POWER_OFF_FADE);
                fade_to_black_by(&mut self.strip.leds, POWER_OFF_FADE);
            }
            self.push_frame();
        }
    }
}

const fn step_toward(current: u8, target: u8) -> u8 {
    if current < target {
        current + 1
    } else if current > target {
        current - 1
    } else {
        current
    }
}
