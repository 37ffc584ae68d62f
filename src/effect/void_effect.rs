//! Void: renders nothing and parks autoplay.
//!
//! While active the controller leaves the back buffer untouched, so
//! external writers can paint pixels directly.

use super::{Effect, Mode};
use crate::segment::AutoplayMode;
use crate::strip::Strip;

#[derive(Default)]
pub struct VoidEffect;

impl Effect for VoidEffect {
    fn init(&mut self, strip: &mut Strip) -> bool {
        strip.segment_mut().autoplay = AutoplayMode::Off;
        strip.runtime_mut().modeinit = false;
        true
    }

    fn update(&mut self, strip: &mut Strip) -> u16 {
        strip.min_delay()
    }

    fn mode_id(&self) -> Mode {
        Mode::Void
    }

    fn supports_transition(&self) -> bool {
        false
    }
}
