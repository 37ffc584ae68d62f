#![no_std]

extern crate alloc;

pub mod color;
pub mod command;
pub mod controller;
pub mod effect;
pub mod fields;
pub mod frame_scheduler;
pub mod helper;
pub mod math8;
pub mod noise;
pub mod random;
pub mod segment;
pub mod strip;
pub mod wave;

pub use color::{BlendType, ColorCurve, Hsv, Palette16, PaletteId, Rgb};
pub use command::{Command, CommandChannel, CommandReceiver, CommandSender};
pub use controller::StripController;
pub use effect::{Effect, EffectDescriptor, Mode, create_effect};
pub use fields::{FieldDescriptor, FieldId, FieldKind, field_descriptors};
pub use frame_scheduler::{FrameResult, FrameScheduler};
pub use segment::{AutoplayMode, Segment, SegmentRuntime, SegmentSnapshot};
pub use strip::Strip;

pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The controller is generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
