//! The strip state every effect renders against.
//!
//! Owns the two pixel buffers, the segment configuration, the palette pair
//! and the RNG. Everything an effect is allowed to touch goes through this
//! type; the controller layers scheduling and compositing on top.

use alloc::vec;
use alloc::vec::Vec;

use embassy_time::Instant;

use crate::color::{
    BLACK, BlendType, Palette16, PaletteId, Rgb, blend_palette_toward, fade_to_black_by,
    fill_palette, fill_solid, nblend, or_rgb, qadd_rgb,
};
use crate::effect::Mode;
use crate::math8::{qadd8, scale8, sin8};
use crate::random::Random16;
use crate::segment::{Segment, SegmentRuntime};
use crate::wave::{beat8, beatsin8, scale16, sin16};

pub struct Strip {
    seg: Segment,
    rt: SegmentRuntime,
    /// Effect-authored front buffer
    pub(crate) leds: Vec<Rgb>,
    /// Composited back buffer, what actually reaches the hardware
    pub(crate) bleds: Vec<Rgb>,

    current_palette: Palette16,
    current_palette_id: PaletteId,
    target_palette: Palette16,
    target_palette_id: PaletteId,

    rng: Random16,
    now_ms: u32,

    // Effect-requested state changes, applied by the controller after the
    // frame (sunset powers off, void disables autoplay, ...)
    pending_mode: Option<Mode>,
    pending_power: Option<bool>,
}

impl Strip {
    pub fn new(led_count: u16, seed: u16) -> Self {
        let seg = Segment::new(led_count);
        let led_count = seg.led_count();
        let mut rt = SegmentRuntime::default();
        rt.sync_from(&seg);
        let mut rng = Random16::new(seed);
        let current_palette = PaletteId::Rainbow.build(&mut rng);
        Self {
            rt,
            leds: vec![BLACK; led_count as usize],
            bleds: vec![BLACK; led_count as usize],
            current_palette,
            current_palette_id: PaletteId::Rainbow,
            target_palette: current_palette,
            target_palette_id: PaletteId::Rainbow,
            rng,
            now_ms: 0,
            pending_mode: None,
            pending_power: None,
            seg,
        }
    }

    // --- segment / runtime access -------------------------------------

    pub fn segment(&self) -> &Segment {
        &self.seg
    }

    pub fn segment_mut(&mut self) -> &mut Segment {
        &mut self.seg
    }

    pub fn runtime(&self) -> &SegmentRuntime {
        &self.rt
    }

    pub fn runtime_mut(&mut self) -> &mut SegmentRuntime {
        &mut self.rt
    }

    pub fn sync_runtime(&mut self) {
        self.rt.sync_from(&self.seg);
    }

    /// Timestamp of the current frame in milliseconds
    pub const fn now_ms(&self) -> u32 {
        self.now_ms
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn set_now(&mut self, now: Instant) {
        self.now_ms = now.as_millis() as u32;
    }

    /// Minimum useful delay between frames, the default `update()` return
    pub const fn min_delay(&self) -> u16 {
        self.seg.min_frame_delay_ms()
    }

    // --- randomness ----------------------------------------------------

    pub fn rng(&mut self) -> &mut Random16 {
        &mut self.rng
    }

    pub fn random8(&mut self) -> u8 {
        self.rng.random8()
    }

    pub fn random8_below(&mut self, limit: u8) -> u8 {
        self.rng.random8_below(limit)
    }

    pub fn random8_range(&mut self, low: u8, high: u8) -> u8 {
        self.rng.random8_range(low, high)
    }

    pub fn random16(&mut self) -> u16 {
        self.rng.random16()
    }

    pub fn random16_below(&mut self, limit: u16) -> u16 {
        self.rng.random16_below(limit)
    }

    pub fn random_wheel_index(&mut self, pos: u8, dist: u8) -> u8 {
        self.rng.random_wheel_index(pos, dist)
    }

    // --- pixel buffer --------------------------------------------------

    pub fn leds(&self) -> &[Rgb] {
        &self.leds
    }

    pub fn leds_mut(&mut self) -> &mut [Rgb] {
        &mut self.leds
    }

    /// The composited frame, valid after `StripController::service`
    pub fn frame(&self) -> &[Rgb] {
        &self.bleds
    }

    /// Fade the segment toward black by `amount / 256`
    pub fn fade_out(&mut self, amount: u8) {
        let (a, b) = (self.rt.start as usize, self.rt.stop as usize);
        fade_to_black_by(&mut self.leds[a..=b], amount);
    }

    pub fn clear_segment(&mut self) {
        let (a, b) = (self.rt.start as usize, self.rt.stop as usize);
        fill_solid(&mut self.leds[a..=b], BLACK);
    }

    pub(crate) fn clear_all(&mut self) {
        fill_solid(&mut self.leds, BLACK);
    }

    // --- palettes ------------------------------------------------------

    pub fn current_palette(&self) -> &Palette16 {
        &self.current_palette
    }

    pub const fn current_palette_id(&self) -> PaletteId {
        self.current_palette_id
    }

    pub const fn target_palette_id(&self) -> PaletteId {
        self.target_palette_id
    }

    /// Select the palette the current one blends toward
    pub fn set_target_palette(&mut self, id: PaletteId) {
        self.target_palette = id.build(&mut self.rng);
        self.target_palette_id = id;
        self.seg.target_palette_num = id as u8;
    }

    /// Replace the blend target with a caller-provided table
    pub fn set_target_palette_custom(&mut self, pal: Palette16) {
        self.target_palette = pal;
        self.target_palette_id = PaletteId::Custom;
    }

    /// Swap in a caller-provided table immediately, no blending
    pub fn set_current_palette_custom(&mut self, pal: Palette16) {
        self.current_palette = pal;
        self.current_palette_id = PaletteId::Custom;
        self.target_palette = pal;
        self.target_palette_id = PaletteId::Custom;
    }

    /// Skip blending and swap the palette immediately
    pub fn set_current_palette(&mut self, id: PaletteId) {
        self.current_palette = id.build(&mut self.rng);
        self.current_palette_id = id;
        self.target_palette = self.current_palette;
        self.target_palette_id = id;
    }

    /// One palette blend tick; the id snaps over exactly when the last byte
    /// reaches its target. A completed `Random` target re-rolls.
    pub(crate) fn blend_palette_tick(&mut self, step: u8) {
        if blend_palette_toward(&mut self.current_palette, &self.target_palette, step) {
            let arrived = self.target_palette_id;
            self.current_palette_id = arrived;
            if arrived == PaletteId::Random {
                self.target_palette = PaletteId::Random.build(&mut self.rng);
            }
        }
    }

    /// Palette lookup with the segment's distribution setting applied:
    /// 100% spreads the table once across the index range, 200% twice.
    #[allow(clippy::cast_possible_truncation)]
    pub fn color_from_palette(&self, index: u8, brightness: u8) -> Rgb {
        let adjusted =
            ((u16::from(index) * u16::from(self.seg.palette_distribution())) / 100) as u8;
        self.current_palette
            .color_at(adjusted, brightness, self.seg.blend_type)
    }

    /// Same lookup against an explicit palette
    #[allow(clippy::cast_possible_truncation)]
    pub fn color_from(&self, pal: &Palette16, index: u8, brightness: u8) -> Rgb {
        let adjusted =
            ((u16::from(index) * u16::from(self.seg.palette_distribution())) / 100) as u8;
        pal.color_at(adjusted, brightness, self.seg.blend_type)
    }

    /// Fill the whole segment from the current palette
    pub fn fill_palette_segment(&mut self, start_index: u8, delta: u8, brightness: u8) {
        let (a, b) = (self.rt.start as usize, self.rt.stop as usize);
        fill_palette(
            &mut self.leds[a..=b],
            &self.current_palette,
            start_index,
            delta,
            brightness,
            self.seg.blend_type,
        );
    }

    /// Palette step so the distribution covers the segment exactly once
    #[allow(clippy::cast_possible_truncation)]
    pub fn distribution_delta_hue(&self) -> u8 {
        let len = u32::from(self.rt.length).max(1);
        let dist = u32::from(self.seg.palette_distribution());
        ((256 * 100 / (len * dist)).max(1)).min(255) as u8
    }

    // --- fractional bar -------------------------------------------------

    /// Draw an anti-aliased bar of `width` whole pixels at a position in
    /// sixteenths of a pixel.
    ///
    /// The first touched pixel gets `255 - frac * 16` brightness, the pixel
    /// past the bar gets the complement, so a moving bar hands brightness
    /// from one edge pixel to the next without flicker. Writes outside
    /// `[start, stop]` are dropped.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn draw_fractional_bar(
        &mut self,
        pos16: i32,
        width: u16,
        pal: &Palette16,
        cindex: u8,
        max_bright: u8,
        mix_colors: bool,
        inc_index: u8,
    ) {
        let mut i = pos16 >> 4;
        let frac = (pos16 & 0x0F) as u8;

        let firstpixelbrightness = scale8(255 - frac * 16, max_bright);
        let lastpixelbrightness = scale8(255 - firstpixelbrightness, max_bright);

        let mut mix = true;
        // A bar of width N touches N+1 pixel positions; a zero-width
        // "point" still needs its leading and trailing edge.
        let span = width.max(1);
        for n in 0..=span {
            let index = cindex.wrapping_add((n as u8).wrapping_mul(inc_index));
            let bright;
            let mut new_color;
            if n == 0 {
                bright = firstpixelbrightness;
                new_color = self.color_from(pal, index, bright);
            } else if n == span {
                bright = lastpixelbrightness;
                new_color = self.color_from(pal, index, bright);
            } else {
                bright = max_bright;
                mix = false;
                new_color = self.color_from(pal, index, bright);
                if inc_index != 0 && self.seg.blend_type == BlendType::LinearBlend {
                    // smooth the index stepping across the bar interior
                    let prev = self.color_from(pal, index.wrapping_sub(inc_index), bright);
                    let next = self.color_from(pal, index.wrapping_add(inc_index), bright);
                    let mut edge_mix = prev;
                    nblend(&mut edge_mix, next, firstpixelbrightness);
                    nblend(&mut new_color, edge_mix, 128);
                }
            }

            if i >= i32::from(self.rt.start) && i <= i32::from(self.rt.stop) {
                let px = &mut self.leds[i as usize];
                if mix_colors || mix {
                    *px = or_rgb(*px, new_color);
                } else {
                    *px = new_color;
                }
            }
            i += 1;
        }
    }

    // --- pacifica ocean helpers ----------------------------------------

    /// One rolling ocean layer: a wave-modulated walk through the palette,
    /// added onto the existing pixels.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pacifica_layer(
        &mut self,
        pal: &Palette16,
        cistart: u16,
        wavescale: u16,
        bri: u8,
        ioff: u16,
    ) {
        let mut ci = cistart;
        let mut waveangle = ioff;
        let wavescale_half = (wavescale / 2) + 20;
        let (a, len) = (self.rt.start as usize, self.rt.length as usize);
        for led in self.leds[a..a + len].iter_mut() {
            waveangle = waveangle.wrapping_add(250);
            let s16 = (sin16(waveangle) as i32 + 32768) as u16;
            let cs = scale16(s16, wavescale_half) + wavescale_half;
            ci = ci.wrapping_add(cs);
            let sindex16 = (sin16(ci) as i32 + 32768) as u16;
            let sindex8 = scale16(sindex16, 240) as u8;
            let c = pal.color_at(sindex8, bri, BlendType::LinearBlend);
            *led = qadd_rgb(*led, c);
        }
    }

    /// Brighten pixels where the wave layers happened to align
    pub fn pacifica_add_whitecaps(&mut self) {
        let basethreshold = beatsin8(9, 55, 65, 0, self.now_ms);
        let mut wave = beat8(7, 0, self.now_ms);
        let (a, len) = (self.rt.start as usize, self.rt.length as usize);
        for led in self.leds[a..a + len].iter_mut() {
            let threshold = scale8(sin8(wave), 20) + basethreshold;
            wave = wave.wrapping_add(7);
            let l = crate::color::average_light(*led);
            if l > threshold {
                let overage = l - threshold;
                let overage2 = qadd8(overage, overage);
                *led = qadd_rgb(
                    *led,
                    Rgb {
                        r: overage,
                        g: overage2,
                        b: qadd8(overage2, overage2),
                    },
                );
            }
        }
    }

    /// Push the whole field toward deep blue-green
    pub fn pacifica_deepen_colors(&mut self) {
        let (a, len) = (self.rt.start as usize, self.rt.length as usize);
        for led in self.leds[a..a + len].iter_mut() {
            led.b = scale8(led.b, 145);
            led.g = scale8(led.g, 200);
            *led = or_rgb(*led, Rgb { r: 2, g: 5, b: 7 });
        }
    }

    // --- effect-requested state changes --------------------------------

    /// Ask the controller to switch modes after this frame
    pub fn request_mode(&mut self, mode: Mode) {
        self.pending_mode = Some(mode);
    }

    /// Ask the controller to change power state after this frame
    pub fn request_power(&mut self, on: bool) {
        self.pending_power = Some(on);
    }

    pub(crate) fn take_pending_mode(&mut self) -> Option<Mode> {
        self.pending_mode.take()
    }

    pub(crate) fn take_pending_power(&mut self) -> Option<bool> {
        self.pending_power.take()
    }
}
