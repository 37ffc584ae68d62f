//! Effect interface and mode registry.
//!
//! Every animation implements [`Effect`] and registers a factory in the
//! static [`EFFECTS`] table. The controller looks effects up by [`Mode`]
//! with a linear scan; an unknown id falls back to [`Mode::Static`] instead
//! of failing.

mod beatsin_glow;
mod breath;
mod bubble_sort;
mod color_waves;
mod color_wipe;
mod comet;
mod dot_beat;
mod ease;
mod ease_bar;
mod fade;
mod fill;
mod fire;
mod fire_flicker;
mod firework;
mod firework_rocket;
mod heartbeat;
mod juggle;
mod meteor_shower;
mod move_bar;
mod multi_dynamic;
mod noise_mover;
mod pacifica;
mod phone_ring;
mod pixel_stack;
mod plasma;
mod popcorn;
mod pride;
mod rainbow;
mod running_lights;
mod scan;
mod shooting_star;
mod static_color;
mod sunrise;
mod theater_chase;
mod to_inner;
mod twinkle_fade;
mod twinkle_fox;
mod twinkle_map;
mod void_effect;

use alloc::boxed::Box;

pub use beatsin_glow::BeatsinGlowEffect;
pub use breath::BreathEffect;
pub use bubble_sort::BubbleSortEffect;
pub use color_waves::ColorWavesEffect;
pub use color_wipe::{ColorWipeEffect, WipeWave};
pub use comet::{CometEffect, CometMotion};
pub use dot_beat::{DotBeatEffect, DotStyle};
pub use ease::EaseEffect;
pub use ease_bar::EaseBarEffect;
pub use fade::FadeEffect;
pub use fill::{FillEffect, FillVariant};
pub use fire::Fire2012Effect;
pub use fire_flicker::FireFlickerEffect;
pub use firework::FireworkEffect;
pub use firework_rocket::FireworkRocketEffect;
pub use heartbeat::HeartBeatEffect;
pub use juggle::JuggleEffect;
pub use meteor_shower::MeteorShowerEffect;
pub use move_bar::{MoveBarEffect, MoveBarWave};
pub use multi_dynamic::MultiDynamicEffect;
pub use noise_mover::NoiseMoverEffect;
pub use pacifica::PacificaEffect;
pub use phone_ring::PhoneRingEffect;
pub use pixel_stack::PixelStackEffect;
pub use popcorn::PopcornEffect;
pub use plasma::PlasmaEffect;
pub use pride::PrideEffect;
pub use rainbow::{RainbowEffect, RainbowStyle};
pub use running_lights::RunningLightsEffect;
pub use scan::{ScanEffect, ScanStyle};
pub use shooting_star::ShootingStarEffect;
pub use static_color::StaticEffect;
pub use sunrise::{SunriseEffect, SunDirection};
pub use theater_chase::{TheaterChaseEffect, ChaseStyle};
pub use to_inner::ToInnerEffect;
pub use twinkle_fade::TwinkleFadeEffect;
pub use twinkle_fox::TwinkleFoxEffect;
pub use twinkle_map::TwinkleMapEffect;
pub use void_effect::VoidEffect;

use crate::helper;
use crate::strip::Strip;

/// Selectable animation modes. The numeric order is the autoplay order;
/// everything from [`Mode::Void`] on is never entered automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    Static = 0,
    Ease,
    NoiseMover,
    Plasma,
    JugglePal,
    FillBeat,
    FillWave,
    DotBeat,
    DotColWipe,
    ColorWipeSawtooth,
    ColorWipeSine,
    ColorWipeQuad,
    ColorWipeTriwave,
    ToInner,
    Breath,
    MultiDynamic,
    Rainbow,
    RainbowCycle,
    Pride,
    Scan,
    DualScan,
    Fade,
    TheaterChase,
    TheaterChaseDualPalette,
    TheaterChaseRainbow,
    RunningLights,
    TwinkleFade,
    TwinkleFox,
    FillBright,
    Firework,
    Fire2012,
    LarsonScanner,
    Comet,
    FireFlickerIntense,
    BubbleSort,
    ShootingStar,
    BeatsinGlow,
    PixelStack,
    MoveBarSin,
    MoveBarQuad,
    MoveBarCube,
    MoveBarSawtooth,
    Popcorn,
    FireworkRocket,
    HeartBeat,
    MeteorShower,
    EaseBar,
    Pacifica,
    ColorWaves,
    TwinkleMap,
    Void,
    PhoneRing,
    Sunrise,
    Sunset,
}

impl Mode {
    pub const COUNT: u8 = 54;

    /// First mode excluded from autoplay cycling
    pub const FIRST_SPECIAL: Mode = Mode::Void;

    pub fn from_raw(value: u8) -> Option<Self> {
        if value >= Self::COUNT {
            return None;
        }
        EFFECTS.iter().map(|d| d.mode).find(|m| *m as u8 == value)
    }

    pub fn as_str(self) -> &'static str {
        EFFECTS
            .iter()
            .find(|d| d.mode == self)
            .map_or("Unknown", |d| d.name)
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        EFFECTS.iter().find(|d| d.name == s).map(|d| d.mode)
    }
}

/// One frame-rendering animation.
///
/// `update` writes exactly one frame into `leds[start..=stop]` and returns
/// the minimum number of milliseconds before calling it again is useful
/// (0 = as fast as the driver allows). `init` must tolerate being called
/// twice; `update` lazily calls it when needed.
pub trait Effect {
    fn init(&mut self, strip: &mut Strip) -> bool;

    fn update(&mut self, strip: &mut Strip) -> u16;

    fn name(&self) -> &'static str {
        self.mode_id().as_str()
    }

    fn mode_id(&self) -> Mode;

    /// Release dynamically-sized state; called before the instance is
    /// discarded on a mode switch.
    fn cleanup(&mut self) {}

    /// Whether switching to this effect crossfades from the previous one
    fn supports_transition(&self) -> bool {
        true
    }
}

/// Shared per-effect boilerplate: a time anchor and the lazy-init flag
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectCore {
    pub timebase: u32,
    pub initialized: bool,
}

impl EffectCore {
    /// The standard init pattern: record the time anchor and consume the
    /// controller's `modeinit` flag. Safe to call repeatedly.
    pub fn standard_init(&mut self, strip: &mut Strip) -> bool {
        if !helper::validate(strip) {
            return false;
        }
        if self.initialized {
            return true;
        }
        self.timebase = strip.now_ms();
        strip.runtime_mut().modeinit = false;
        self.initialized = true;
        true
    }

    pub fn reset(&mut self) {
        self.initialized = false;
    }
}

pub struct EffectDescriptor {
    pub mode: Mode,
    pub name: &'static str,
    pub build: fn() -> Box<dyn Effect>,
}

/// The static mode registry, one entry per selectable effect
#[rustfmt::skip]
pub static EFFECTS: &[EffectDescriptor] = &[
    EffectDescriptor { mode: Mode::Static, name: "Static", build: || Box::new(StaticEffect::default()) },
    EffectDescriptor { mode: Mode::Ease, name: "Ease", build: || Box::new(EaseEffect::default()) },
    EffectDescriptor { mode: Mode::NoiseMover, name: "iNoise8", build: || Box::new(NoiseMoverEffect::default()) },
    EffectDescriptor { mode: Mode::Plasma, name: "Plasma", build: || Box::new(PlasmaEffect::default()) },
    EffectDescriptor { mode: Mode::JugglePal, name: "Juggle", build: || Box::new(JuggleEffect::default()) },
    EffectDescriptor { mode: Mode::FillBeat, name: "Fill Beat", build: || Box::new(FillEffect::new(FillVariant::Beat)) },
    EffectDescriptor { mode: Mode::FillWave, name: "Fill Wave", build: || Box::new(FillEffect::new(FillVariant::Wave)) },
    EffectDescriptor { mode: Mode::DotBeat, name: "Dots", build: || Box::new(DotBeatEffect::new(DotStyle::Beat)) },
    EffectDescriptor { mode: Mode::DotColWipe, name: "Dot Color Wipe", build: || Box::new(DotBeatEffect::new(DotStyle::ColorWipe)) },
    EffectDescriptor { mode: Mode::ColorWipeSawtooth, name: "Color Wipe Sawtooth", build: || Box::new(ColorWipeEffect::new(WipeWave::Sawtooth)) },
    EffectDescriptor { mode: Mode::ColorWipeSine, name: "Color Wipe Sine", build: || Box::new(ColorWipeEffect::new(WipeWave::Sine)) },
    EffectDescriptor { mode: Mode::ColorWipeQuad, name: "Color Wipe Quad", build: || Box::new(ColorWipeEffect::new(WipeWave::Quad)) },
    EffectDescriptor { mode: Mode::ColorWipeTriwave, name: "Color Wipe Triwave", build: || Box::new(ColorWipeEffect::new(WipeWave::Triwave)) },
    EffectDescriptor { mode: Mode::ToInner, name: "To Center", build: || Box::new(ToInnerEffect::default()) },
    EffectDescriptor { mode: Mode::Breath, name: "Breath", build: || Box::new(BreathEffect::default()) },
    EffectDescriptor { mode: Mode::MultiDynamic, name: "Multi Dynamic", build: || Box::new(MultiDynamicEffect::default()) },
    EffectDescriptor { mode: Mode::Rainbow, name: "Rainbow", build: || Box::new(RainbowEffect::new(RainbowStyle::Solid)) },
    EffectDescriptor { mode: Mode::RainbowCycle, name: "Rainbow Cycle", build: || Box::new(RainbowEffect::new(RainbowStyle::Cycle)) },
    EffectDescriptor { mode: Mode::Pride, name: "Pride", build: || Box::new(PrideEffect::default()) },
    EffectDescriptor { mode: Mode::Scan, name: "Scan", build: || Box::new(ScanEffect::new(ScanStyle::Single)) },
    EffectDescriptor { mode: Mode::DualScan, name: "Dual Scan", build: || Box::new(ScanEffect::new(ScanStyle::Dual)) },
    EffectDescriptor { mode: Mode::Fade, name: "Fade", build: || Box::new(FadeEffect::default()) },
    EffectDescriptor { mode: Mode::TheaterChase, name: "Theater Chase", build: || Box::new(TheaterChaseEffect::new(ChaseStyle::Palette)) },
    EffectDescriptor { mode: Mode::TheaterChaseDualPalette, name: "Theater Chase Dual", build: || Box::new(TheaterChaseEffect::new(ChaseStyle::DualPalette)) },
    EffectDescriptor { mode: Mode::TheaterChaseRainbow, name: "Theater Chase Rainbow", build: || Box::new(TheaterChaseEffect::new(ChaseStyle::Rainbow)) },
    EffectDescriptor { mode: Mode::RunningLights, name: "Running Lights", build: || Box::new(RunningLightsEffect::default()) },
    EffectDescriptor { mode: Mode::TwinkleFade, name: "Twinkle Fade", build: || Box::new(TwinkleFadeEffect::default()) },
    EffectDescriptor { mode: Mode::TwinkleFox, name: "Twinkle Fox", build: || Box::new(TwinkleFoxEffect::default()) },
    EffectDescriptor { mode: Mode::FillBright, name: "Fill Bright", build: || Box::new(FillEffect::new(FillVariant::Bright)) },
    EffectDescriptor { mode: Mode::Firework, name: "Firework", build: || Box::new(FireworkEffect::default()) },
    EffectDescriptor { mode: Mode::Fire2012, name: "Fire 2012", build: || Box::new(Fire2012Effect::default()) },
    EffectDescriptor { mode: Mode::LarsonScanner, name: "Larson Scanner", build: || Box::new(CometEffect::new(CometMotion::Triangle)) },
    EffectDescriptor { mode: Mode::Comet, name: "Comet", build: || Box::new(CometEffect::new(CometMotion::Sawtooth)) },
    EffectDescriptor { mode: Mode::FireFlickerIntense, name: "Fire Flicker", build: || Box::new(FireFlickerEffect::default()) },
    EffectDescriptor { mode: Mode::BubbleSort, name: "Bubble Sort", build: || Box::new(BubbleSortEffect::default()) },
    EffectDescriptor { mode: Mode::ShootingStar, name: "Shooting Star", build: || Box::new(ShootingStarEffect::default()) },
    EffectDescriptor { mode: Mode::BeatsinGlow, name: "Beatsin Glow", build: || Box::new(BeatsinGlowEffect::default()) },
    EffectDescriptor { mode: Mode::PixelStack, name: "Pixel Stack", build: || Box::new(PixelStackEffect::default()) },
    EffectDescriptor { mode: Mode::MoveBarSin, name: "Move Bar Sine", build: || Box::new(MoveBarEffect::new(MoveBarWave::Sine)) },
    EffectDescriptor { mode: Mode::MoveBarQuad, name: "Move Bar Quad", build: || Box::new(MoveBarEffect::new(MoveBarWave::Quad)) },
    EffectDescriptor { mode: Mode::MoveBarCube, name: "Move Bar Cubic", build: || Box::new(MoveBarEffect::new(MoveBarWave::Cubic)) },
    EffectDescriptor { mode: Mode::MoveBarSawtooth, name: "Move Bar Sawtooth", build: || Box::new(MoveBarEffect::new(MoveBarWave::Sawtooth)) },
    EffectDescriptor { mode: Mode::Popcorn, name: "Popcorn", build: || Box::new(PopcornEffect::default()) },
    EffectDescriptor { mode: Mode::FireworkRocket, name: "Firework Rocket", build: || Box::new(FireworkRocketEffect::default()) },
    EffectDescriptor { mode: Mode::HeartBeat, name: "Heartbeat", build: || Box::new(HeartBeatEffect::default()) },
    EffectDescriptor { mode: Mode::MeteorShower, name: "Meteor Shower", build: || Box::new(MeteorShowerEffect::default()) },
    EffectDescriptor { mode: Mode::EaseBar, name: "Ease Bar", build: || Box::new(EaseBarEffect::default()) },
    EffectDescriptor { mode: Mode::Pacifica, name: "Pacifica", build: || Box::new(PacificaEffect::default()) },
    EffectDescriptor { mode: Mode::ColorWaves, name: "Color Waves", build: || Box::new(ColorWavesEffect::default()) },
    EffectDescriptor { mode: Mode::TwinkleMap, name: "Twinkle Base Color", build: || Box::new(TwinkleMapEffect::default()) },
    EffectDescriptor { mode: Mode::Void, name: "Void", build: || Box::new(VoidEffect::default()) },
    EffectDescriptor { mode: Mode::PhoneRing, name: "Phone Ring", build: || Box::new(PhoneRingEffect::default()) },
    EffectDescriptor { mode: Mode::Sunrise, name: "Sunrise", build: || Box::new(SunriseEffect::new(SunDirection::Rising)) },
    EffectDescriptor { mode: Mode::Sunset, name: "Sunset", build: || Box::new(SunriseEffect::new(SunDirection::Setting)) },
];

/// Instantiate the effect registered for `mode`, `None` for unknown ids
pub fn create_effect(mode: Mode) -> Option<Box<dyn Effect>> {
    EFFECTS
        .iter()
        .find(|d| d.mode == mode)
        .map(|d| (d.build)())
}
