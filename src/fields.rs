//! Settings reflection for the external control surfaces.
//!
//! A flat descriptor table of every user-facing segment field: name,
//! label, kind and bounds. A web layer renders its UI from
//! [`field_descriptors`] and reads/writes values by [`FieldId`] through the
//! controller, without knowing anything about the segment struct.

use crate::color::PaletteId;
use crate::effect::Mode;
use crate::segment::{AutoplayMode, BEAT88_MAX, BEAT88_MIN, MAX_NUM_BARS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Power,
    Mode,
    Speed,
    Brightness,
    TargetPalette,
    BlendType,
    Reverse,
    Inverse,
    NumBars,
    Segments,
    HueTime,
    DeltaHue,
    Autoplay,
    AutoplayDuration,
    AutoPal,
    AutoPalDuration,
    Cooling,
    Sparking,
    TwinkleSpeed,
    TwinkleDensity,
    PaletteDistribution,
    Damping,
    SunriseTime,
    ColorTemp,
    BackgroundHue,
    BackgroundSat,
    BackgroundBri,
}

/// Value type of a reflected field, with bounds for UI sliders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number { min: u32, max: u32 },
    Boolean,
    /// Index into a list of named options; `count` options exist
    Select { count: u32 },
}

pub struct FieldDescriptor {
    pub id: FieldId,
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

#[rustfmt::skip]
static FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor { id: FieldId::Power, name: "power", label: "On / Off", kind: FieldKind::Boolean },
    FieldDescriptor { id: FieldId::Mode, name: "mode", label: "Effect", kind: FieldKind::Select { count: Mode::COUNT as u32 } },
    FieldDescriptor { id: FieldId::Speed, name: "speed", label: "Speed (beat88)", kind: FieldKind::Number { min: BEAT88_MIN as u32, max: BEAT88_MAX as u32 } },
    FieldDescriptor { id: FieldId::Brightness, name: "brightness", label: "Brightness", kind: FieldKind::Number { min: 0, max: 255 } },
    FieldDescriptor { id: FieldId::TargetPalette, name: "palette", label: "Color palette", kind: FieldKind::Select { count: PaletteId::COUNT as u32 } },
    FieldDescriptor { id: FieldId::BlendType, name: "blend_type", label: "Palette blending", kind: FieldKind::Boolean },
    FieldDescriptor { id: FieldId::Reverse, name: "reverse", label: "Reverse direction", kind: FieldKind::Boolean },
    FieldDescriptor { id: FieldId::Inverse, name: "inverse", label: "Invert colors", kind: FieldKind::Boolean },
    FieldDescriptor { id: FieldId::NumBars, name: "num_bars", label: "Number of bars", kind: FieldKind::Number { min: 1, max: MAX_NUM_BARS as u32 } },
    FieldDescriptor { id: FieldId::Segments, name: "segments", label: "Segment count", kind: FieldKind::Number { min: 1, max: 255 } },
    FieldDescriptor { id: FieldId::HueTime, name: "hue_time", label: "Hue change interval", kind: FieldKind::Number { min: 0, max: 65535 } },
    FieldDescriptor { id: FieldId::DeltaHue, name: "delta_hue", label: "Hue offset", kind: FieldKind::Number { min: 0, max: 255 } },
    FieldDescriptor { id: FieldId::Autoplay, name: "autoplay", label: "Effect autoplay", kind: FieldKind::Select { count: 4 } },
    FieldDescriptor { id: FieldId::AutoplayDuration, name: "autoplay_duration", label: "Autoplay interval (s)", kind: FieldKind::Number { min: 1, max: 65535 } },
    FieldDescriptor { id: FieldId::AutoPal, name: "auto_pal", label: "Palette autoplay", kind: FieldKind::Select { count: 4 } },
    FieldDescriptor { id: FieldId::AutoPalDuration, name: "auto_pal_duration", label: "Palette interval (s)", kind: FieldKind::Number { min: 1, max: 65535 } },
    FieldDescriptor { id: FieldId::Cooling, name: "cooling", label: "Fire cooling", kind: FieldKind::Number { min: 0, max: 255 } },
    FieldDescriptor { id: FieldId::Sparking, name: "sparking", label: "Fire sparking", kind: FieldKind::Number { min: 0, max: 255 } },
    FieldDescriptor { id: FieldId::TwinkleSpeed, name: "twinkle_speed", label: "Twinkle speed", kind: FieldKind::Number { min: 0, max: 8 } },
    FieldDescriptor { id: FieldId::TwinkleDensity, name: "twinkle_density", label: "Twinkle density", kind: FieldKind::Number { min: 0, max: 8 } },
    FieldDescriptor { id: FieldId::PaletteDistribution, name: "palette_distribution", label: "Palette distribution (%)", kind: FieldKind::Number { min: 1, max: 255 } },
    FieldDescriptor { id: FieldId::Damping, name: "damping", label: "Damping (%)", kind: FieldKind::Number { min: 0, max: 100 } },
    FieldDescriptor { id: FieldId::SunriseTime, name: "sunrise_time", label: "Sunrise duration (min)", kind: FieldKind::Number { min: 1, max: 120 } },
    FieldDescriptor { id: FieldId::ColorTemp, name: "color_temp", label: "Color temperature (K)", kind: FieldKind::Number { min: 1000, max: 40000 } },
    FieldDescriptor { id: FieldId::BackgroundHue, name: "background_hue", label: "Background hue", kind: FieldKind::Number { min: 0, max: 255 } },
    FieldDescriptor { id: FieldId::BackgroundSat, name: "background_sat", label: "Background saturation", kind: FieldKind::Number { min: 0, max: 255 } },
    FieldDescriptor { id: FieldId::BackgroundBri, name: "background_bri", label: "Background brightness", kind: FieldKind::Number { min: 0, max: 255 } },
];

/// Every reflected field, in UI order
pub fn field_descriptors() -> &'static [FieldDescriptor] {
    FIELDS
}

pub fn descriptor(id: FieldId) -> &'static FieldDescriptor {
    FIELDS.iter().find(|d| d.id == id).unwrap_or(&FIELDS[0])
}

/// Parse a wire name back into a field id
pub fn field_by_name(name: &str) -> Option<FieldId> {
    FIELDS.iter().find(|d| d.name == name).map(|d| d.id)
}

/// Clamp a raw wire value into the field's documented range
pub fn clamp_value(id: FieldId, value: u32) -> u32 {
    match descriptor(id).kind {
        FieldKind::Number { min, max } => value.clamp(min, max),
        FieldKind::Boolean => u32::from(value != 0),
        FieldKind::Select { count } => value.min(count.saturating_sub(1)),
    }
}

/// Convert an `AutoplayMode` wire value
pub fn autoplay_from_value(value: u32) -> AutoplayMode {
    #[allow(clippy::cast_possible_truncation)]
    AutoplayMode::from_raw(value.min(3) as u8).unwrap_or(AutoplayMode::Off)
}
