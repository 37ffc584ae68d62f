//! Double-pulse heartbeat propagating outward from the center.

use super::{Effect, Mode};
use crate::color::{fade_to_black_by, fill_solid};
use crate::helper;
use crate::strip::Strip;

#[derive(Default)]
pub struct HeartBeatEffect {
    last_beat: u32,
    ms_per_beat: u32,
    second_beat_ms: u32,
    second_beat_active: bool,
    size: u16,
    center_offset: u16,
    shift_count: u16,
    initialized: bool,
}

impl HeartBeatEffect {
    fn ms_per_beat(speed: u16) -> u32 {
        let effective = if speed > 20 { u32::from(speed) / 20 } else { 1 };
        60_000 / effective
    }

    fn pulse_size(strip_length: u16) -> u16 {
        helper::safe_map_u16(strip_length, 25, 300, 1, 6).max(1)
    }
}

impl Effect for HeartBeatEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        if !helper::validate(strip) {
            return false;
        }
        let rt = strip.runtime();
        let seg = strip.segment();
        self.last_beat = 0;
        self.second_beat_active = false;
        self.ms_per_beat = Self::ms_per_beat(seg.beat88());
        self.second_beat_ms = self.ms_per_beat / 3;
        self.size = Self::pulse_size(rt.length);
        self.center_offset = rt.length / 2;
        self.shift_count = self.center_offset.saturating_sub(self.size);
        self.initialized = true;
        strip.runtime_mut().modeinit = false;
        true
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        if !self.initialized && !self.init(strip) {
            return helper::SAFE_DELAY_MS;
        }
        if !helper::validate(strip) {
            return helper::SAFE_DELAY_MS;
        }

        let rt = *strip.runtime();
        let seg_beat = strip.segment().beat88();
        self.ms_per_beat = Self::ms_per_beat(seg_beat);
        self.second_beat_ms = self.ms_per_beat / 3;

        // shift the wave outward: lower half left, upper half right
        let a = rt.start as usize;
        for i in 0..self.shift_count as usize {
            let leds = strip.leds_mut();
            leds[a + i] = leds[a + i + self.size as usize];
            let upper_dst = a + i + (self.center_offset + self.size) as usize;
            let upper_src = a + i + self.center_offset as usize;
            if upper_dst <= rt.stop as usize {
                leds[upper_dst] = leds[upper_src];
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let fade_amount = ((seg_beat >> 8) as u8) | 32;
        fade_to_black_by(&mut strip.leds_mut()[a..=rt.stop as usize], fade_amount);

        let now = strip.now_ms();
        let beat_timer = now - self.last_beat;

        let pulse_from = a + (self.center_offset - self.size.min(self.center_offset)) as usize;
        let pulse_to = (pulse_from + 2 * self.size as usize).min(rt.stop as usize + 1);

        if beat_timer > self.second_beat_ms && !self.second_beat_active {
            let color = strip.color_from_palette(rt.base_hue, strip.segment().brightness());
            fill_solid(&mut strip.leds_mut()[pulse_from..pulse_to], color);
            self.second_beat_active = true;
        }

        if beat_timer > self.ms_per_beat {
            let color = strip.color_from_palette(rt.base_hue, strip.segment().brightness());
            fill_solid(&mut strip.leds_mut()[pulse_from..pulse_to], color);
            self.second_beat_active = false;
            self.last_beat = now;
        }

        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::HeartBeat
    }
}
