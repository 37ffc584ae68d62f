//! Segment configuration and per-frame runtime state.
//!
//! The [`Segment`] is the single shared parameter block every effect renders
//! from. All range-limited fields are clamped in their setters, so a read
//! anywhere in the engine always sees a valid value.

use crate::color::{BlendType, PaletteId};
use crate::effect::Mode;

pub const BEAT88_MIN: u16 = 1;
pub const BEAT88_MAX: u16 = 10000;

pub const BRIGHTNESS_MIN: u8 = 0;
pub const BRIGHTNESS_MAX: u8 = 255;

/// Upper bound for per-bar state arrays (rockets, glow elements, dots)
pub const MAX_NUM_BARS: u8 = 32;

pub const DEFAULT_SUNRISE_STEPS: u16 = 1024;

pub const DEFAULT_SPEED: u16 = 1000;
pub const DEFAULT_BRIGHTNESS: u8 = 200;
pub const DEFAULT_COOLING: u8 = 128;
pub const DEFAULT_SPARKING: u8 = 128;
pub const DEFAULT_TWINKLE_SPEED: u8 = 4;
pub const DEFAULT_TWINKLE_DENSITY: u8 = 4;
pub const DEFAULT_DAMPING: u8 = 90;
pub const DEFAULT_SUNRISE_TIME: u8 = 15;
pub const DEFAULT_HUE_TIME: u16 = 500;
pub const DEFAULT_AUTO_DURATION_S: u16 = 60;
pub const DEFAULT_COLOR_TEMP_K: u16 = 6600;
pub const DEFAULT_FPS: u8 = 60;

/// Automatic mode / palette stepping behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AutoplayMode {
    #[default]
    Off = 0,
    Up,
    Down,
    Random,
}

impl AutoplayMode {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Off,
            1 => Self::Up,
            2 => Self::Down,
            3 => Self::Random,
            _ => return None,
        })
    }
}

/// The shared effect configuration
#[derive(Debug, Clone)]
pub struct Segment {
    led_count: u16,

    mode: Mode,
    beat88: u16,
    brightness: u8,
    target_brightness: u8,
    start: u16,
    stop: u16,

    pub blend_type: BlendType,
    pub reverse: bool,
    pub inverse: bool,
    pub power: bool,
    pub is_running: bool,

    num_bars: u8,
    segments: u8,

    pub hue_time: u16,
    pub delta_hue: u8,

    pub autoplay: AutoplayMode,
    pub autoplay_duration_s: u16,
    pub auto_pal: AutoplayMode,
    pub auto_pal_duration_s: u16,

    pub cooling: u8,
    pub sparking: u8,
    pub twinkle_speed: u8,
    pub twinkle_density: u8,
    palette_distribution: u8,
    pub damping: u8,
    sunrise_time_min: u8,
    pub color_temp_k: u16,
    pub target_palette_num: u8,

    /// Ceiling for the transition blend weight
    pub blur: u8,
    fps: u8,

    pub background_hue: u8,
    pub background_sat: u8,
    pub background_bri: u8,
}

impl Segment {
    pub fn new(led_count: u16) -> Self {
        // 16ths-of-a-pixel positions must fit u16, capping the strip at 4096
        let led_count = led_count.clamp(1, 4096);
        Self {
            led_count,
            mode: Mode::Static,
            beat88: DEFAULT_SPEED,
            brightness: DEFAULT_BRIGHTNESS,
            target_brightness: DEFAULT_BRIGHTNESS,
            start: 0,
            stop: led_count - 1,
            blend_type: BlendType::LinearBlend,
            reverse: false,
            inverse: false,
            power: true,
            is_running: true,
            num_bars: u8::try_from((led_count / 40).clamp(1, u16::from(MAX_NUM_BARS)))
                .unwrap_or(MAX_NUM_BARS),
            segments: 1,
            hue_time: DEFAULT_HUE_TIME,
            delta_hue: 0,
            autoplay: AutoplayMode::Off,
            autoplay_duration_s: DEFAULT_AUTO_DURATION_S,
            auto_pal: AutoplayMode::Off,
            auto_pal_duration_s: DEFAULT_AUTO_DURATION_S,
            cooling: DEFAULT_COOLING,
            sparking: DEFAULT_SPARKING,
            twinkle_speed: DEFAULT_TWINKLE_SPEED,
            twinkle_density: DEFAULT_TWINKLE_DENSITY,
            palette_distribution: 100,
            damping: DEFAULT_DAMPING,
            sunrise_time_min: DEFAULT_SUNRISE_TIME,
            color_temp_k: DEFAULT_COLOR_TEMP_K,
            target_palette_num: 0,
            blur: 255,
            fps: DEFAULT_FPS,
            background_hue: 0,
            background_sat: 0,
            background_bri: 0,
        }
    }

    pub const fn led_count(&self) -> u16 {
        self.led_count
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Only the controller switches modes; effects request a switch through
    /// the strip instead.
    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub const fn beat88(&self) -> u16 {
        self.beat88
    }

    pub fn set_beat88(&mut self, value: u16) {
        self.beat88 = value.clamp(BEAT88_MIN, BEAT88_MAX);
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    pub const fn target_brightness(&self) -> u8 {
        self.target_brightness
    }

    /// Sets the brightness goal; the actual brightness ramps there one step
    /// per smoothing tick.
    pub fn set_target_brightness(&mut self, value: u8) {
        self.target_brightness = value.clamp(BRIGHTNESS_MIN, BRIGHTNESS_MAX);
    }

    pub(crate) fn step_brightness(&mut self) {
        if self.target_brightness > self.brightness {
            self.brightness += 1;
        } else if self.target_brightness < self.brightness {
            self.brightness -= 1;
        }
    }

    pub const fn start(&self) -> u16 {
        self.start
    }

    pub const fn stop(&self) -> u16 {
        self.stop
    }

    /// Set the rendered pixel range. Values are clamped so that
    /// `start <= stop < led_count` always holds.
    pub fn set_range(&mut self, start: u16, stop: u16) {
        let stop = stop.min(self.led_count - 1);
        self.start = start.min(stop);
        self.stop = stop;
    }

    pub const fn num_bars(&self) -> u8 {
        self.num_bars
    }

    pub fn set_num_bars(&mut self, value: u8) {
        self.num_bars = value.clamp(1, MAX_NUM_BARS);
    }

    pub const fn segments(&self) -> u8 {
        self.segments
    }

    pub fn set_segments(&mut self, value: u8) {
        let max_segs = u8::try_from((self.led_count / 8).max(1)).unwrap_or(u8::MAX);
        self.segments = value.clamp(1, max_segs);
    }

    pub const fn palette_distribution(&self) -> u8 {
        self.palette_distribution
    }

    /// Percentage of the palette spread across the segment: 100 shows it
    /// once, 200 twice, 50 the first half.
    pub fn set_palette_distribution(&mut self, value: u8) {
        self.palette_distribution = value.clamp(1, 255);
    }

    pub const fn sunrise_time_min(&self) -> u8 {
        self.sunrise_time_min
    }

    pub fn set_sunrise_time_min(&mut self, value: u8) {
        self.sunrise_time_min = value.clamp(1, 120);
    }

    pub const fn fps(&self) -> u8 {
        self.fps
    }

    pub fn set_fps(&mut self, value: u8) {
        self.fps = value.clamp(10, 120);
    }

    /// Minimum useful delay between two frames in milliseconds
    pub const fn min_frame_delay_ms(&self) -> u16 {
        let d = 1000 / self.fps as u16;
        if d < 2 { 2 } else { d }
    }

    pub fn snapshot(&self) -> SegmentSnapshot {
        let mut snap = SegmentSnapshot {
            crc: 0,
            mode: self.mode as u8,
            beat88: self.beat88,
            brightness: self.target_brightness,
            blend_type: matches!(self.blend_type, BlendType::LinearBlend),
            reverse: self.reverse,
            inverse: self.inverse,
            num_bars: self.num_bars,
            segments: self.segments,
            hue_time: self.hue_time,
            delta_hue: self.delta_hue,
            autoplay: self.autoplay as u8,
            autoplay_duration_s: self.autoplay_duration_s,
            auto_pal: self.auto_pal as u8,
            auto_pal_duration_s: self.auto_pal_duration_s,
            cooling: self.cooling,
            sparking: self.sparking,
            twinkle_speed: self.twinkle_speed,
            twinkle_density: self.twinkle_density,
            palette_distribution: self.palette_distribution,
            damping: self.damping,
            sunrise_time_min: self.sunrise_time_min,
            color_temp_k: self.color_temp_k,
            target_palette_num: self.target_palette_num,
            power: self.power,
        };
        snap.crc = snap.compute_crc();
        snap
    }

    /// Re-apply a stored configuration. Every value passes through the
    /// clamping setters, so a corrupted record degrades to valid settings.
    pub fn restore(&mut self, snap: &SegmentSnapshot) {
        self.set_mode(Mode::from_raw(snap.mode).unwrap_or(Mode::Static));
        self.set_beat88(snap.beat88);
        self.set_target_brightness(snap.brightness);
        self.blend_type = if snap.blend_type {
            BlendType::LinearBlend
        } else {
            BlendType::NoBlend
        };
        self.reverse = snap.reverse;
        self.inverse = snap.inverse;
        self.set_num_bars(snap.num_bars);
        self.set_segments(snap.segments);
        self.hue_time = snap.hue_time;
        self.delta_hue = snap.delta_hue;
        self.autoplay = AutoplayMode::from_raw(snap.autoplay).unwrap_or_default();
        self.autoplay_duration_s = snap.autoplay_duration_s.max(1);
        self.auto_pal = AutoplayMode::from_raw(snap.auto_pal).unwrap_or_default();
        self.auto_pal_duration_s = snap.auto_pal_duration_s.max(1);
        self.cooling = snap.cooling;
        self.sparking = snap.sparking;
        self.twinkle_speed = snap.twinkle_speed.min(8);
        self.twinkle_density = snap.twinkle_density.min(8);
        self.set_palette_distribution(snap.palette_distribution);
        self.damping = snap.damping.min(100);
        self.set_sunrise_time_min(snap.sunrise_time_min);
        self.color_temp_k = snap.color_temp_k.clamp(1000, 40000);
        self.target_palette_num = snap.target_palette_num % PaletteId::COUNT;
        self.power = snap.power;
    }
}

/// Derived and scheduling state the controller recomputes while running.
///
/// Effects may read all of it and clear `modeinit` after consuming it; only
/// the controller sets `modeinit` and owns the timestamps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentRuntime {
    /// The active effect must re-initialize before rendering
    pub modeinit: bool,
    /// Slowly drifting global hue offset
    pub base_hue: u8,
    pub start: u16,
    pub stop: u16,
    pub length: u16,
    /// Scheduling timestamps, all in milliseconds
    pub next_time: u32,
    pub next_hue: u32,
    pub next_auto: u32,
    pub next_palette: u32,
    /// Time anchor reset on transitions
    pub timebase: u32,
}

impl SegmentRuntime {
    pub(crate) fn sync_from(&mut self, seg: &Segment) {
        if seg.segments() > 1 {
            // multi-segment: render one sub-strip, the composite step
            // repeats (and mirrors) it across the others
            self.start = 0;
            self.length = (seg.led_count() / u16::from(seg.segments())).max(1);
        } else {
            self.start = seg.start();
            self.length = seg.stop() - seg.start() + 1;
        }
        self.stop = self.start + self.length - 1;
    }
}

/// Flat persisted form of a [`Segment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSnapshot {
    pub crc: u16,
    pub mode: u8,
    pub beat88: u16,
    pub brightness: u8,
    pub blend_type: bool,
    pub reverse: bool,
    pub inverse: bool,
    pub num_bars: u8,
    pub segments: u8,
    pub hue_time: u16,
    pub delta_hue: u8,
    pub autoplay: u8,
    pub autoplay_duration_s: u16,
    pub auto_pal: u8,
    pub auto_pal_duration_s: u16,
    pub cooling: u8,
    pub sparking: u8,
    pub twinkle_speed: u8,
    pub twinkle_density: u8,
    pub palette_distribution: u8,
    pub damping: u8,
    pub sunrise_time_min: u8,
    pub color_temp_k: u16,
    pub target_palette_num: u8,
    pub power: bool,
}

impl SegmentSnapshot {
    /// CRC-16/CCITT over every field except the CRC itself
    pub fn compute_crc(&self) -> u16 {
        let words = [
            u16::from(self.mode),
            self.beat88,
            u16::from(self.brightness),
            u16::from(u8::from(self.blend_type))
                | (u16::from(u8::from(self.reverse)) << 1)
                | (u16::from(u8::from(self.inverse)) << 2)
                | (u16::from(u8::from(self.power)) << 3),
            u16::from(self.num_bars),
            u16::from(self.segments),
            self.hue_time,
            u16::from(self.delta_hue),
            u16::from(self.autoplay),
            self.autoplay_duration_s,
            u16::from(self.auto_pal),
            self.auto_pal_duration_s,
            u16::from(self.cooling),
            u16::from(self.sparking),
            u16::from(self.twinkle_speed),
            u16::from(self.twinkle_density),
            u16::from(self.palette_distribution),
            u16::from(self.damping),
            u16::from(self.sunrise_time_min),
            self.color_temp_k,
            u16::from(self.target_palette_num),
        ];
        let mut crc: u16 = 0xFFFF;
        for word in words {
            for byte in word.to_le_bytes() {
                crc ^= u16::from(byte) << 8;
                for _ in 0..8 {
                    crc = if crc & 0x8000 != 0 {
                        (crc << 1) ^ 0x1021
                    } else {
                        crc << 1
                    };
                }
            }
        }
        crc
    }

    pub fn is_valid(&self) -> bool {
        self.crc == self.compute_crc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beat88_is_clamped_on_write() {
        let mut seg = Segment::new(100);
        seg.set_beat88(0);
        assert_eq!(seg.beat88(), BEAT88_MIN);
        seg.set_beat88(60000);
        assert_eq!(seg.beat88(), BEAT88_MAX);
        seg.set_beat88(500);
        assert_eq!(seg.beat88(), 500);
    }

    #[test]
    fn range_invariant_holds() {
        let mut seg = Segment::new(30);
        seg.set_range(10, 300);
        assert_eq!(seg.stop(), 29);
        assert_eq!(seg.start(), 10);
        seg.set_range(50, 20);
        assert!(seg.start() <= seg.stop());
        assert!(seg.stop() < 30);
    }

    #[test]
    fn snapshot_roundtrip_reproduces_config() {
        let mut seg = Segment::new(60);
        seg.set_beat88(4321);
        seg.set_target_brightness(77);
        seg.reverse = true;
        seg.set_num_bars(5);
        let snap = seg.snapshot();
        assert!(snap.is_valid());

        let mut restored = Segment::new(60);
        restored.restore(&snap);
        assert_eq!(restored.beat88(), 4321);
        assert_eq!(restored.target_brightness(), 77);
        assert!(restored.reverse);
        assert_eq!(restored.num_bars(), 5);
    }
}
