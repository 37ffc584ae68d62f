//! Command channel between the control surfaces and the engine.
//!
//! A bounded, critical-section guarded queue: web handlers, buttons or
//! persistence restore push [`Command`] values from wherever they run, and
//! the controller drains everything pending at the start of each
//! `service()` call. Senders are lightweight `Copy` handles.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use crate::color::PaletteId;
use crate::effect::Mode;
use crate::fields::FieldId;
use crate::segment::AutoplayMode;

/// A single state-change request for the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetMode(Mode),
    SetSpeed(u16),
    SetBrightness(u8),
    SetTargetPalette(PaletteId),
    SetPower(bool),
    SetAutoplay(AutoplayMode),
    SetAutoPal(AutoplayMode),
    /// Generic write to any reflected segment field
    SetField(FieldId, u32),
    /// Force the next frame to render immediately
    Trigger,
}

/// Error returned when trying to send to a full channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError(pub Command);

/// A bounded, thread-safe command queue.
///
/// Uses critical sections for synchronization, making it safe to push from
/// interrupt or network context while the render loop drains it.
pub struct CommandChannel<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<Command, SIZE>>>,
}

impl<const SIZE: usize> CommandChannel<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Get a sender handle for this channel.
    ///
    /// Multiple senders can coexist; they share access to the same queue.
    pub const fn sender(&self) -> CommandSender<'_, SIZE> {
        CommandSender { channel: self }
    }

    /// Get a receiver handle for this channel.
    pub const fn receiver(&self) -> CommandReceiver<'_, SIZE> {
        CommandReceiver { channel: self }
    }

    fn try_send(&self, command: Command) -> Result<(), TrySendError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(command).map_err(TrySendError)
        })
    }

    fn try_receive(&self) -> Option<Command> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front()
        })
    }
}

impl<const SIZE: usize> Default for CommandChannel<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sender handle for a [`CommandChannel`].
#[derive(Clone, Copy)]
pub struct CommandSender<'a, const SIZE: usize> {
    channel: &'a CommandChannel<SIZE>,
}

impl<const SIZE: usize> CommandSender<'_, SIZE> {
    /// Try to send a command.
    ///
    /// Returns `Err(TrySendError(command))` if the channel is full.
    pub fn try_send(&self, command: Command) -> Result<(), TrySendError> {
        self.channel.try_send(command)
    }
}

/// A receiver handle for a [`CommandChannel`].
#[derive(Clone, Copy)]
pub struct CommandReceiver<'a, const SIZE: usize> {
    channel: &'a CommandChannel<SIZE>,
}

impl<const SIZE: usize> CommandReceiver<'_, SIZE> {
    /// Take the next pending command, if any (non-blocking).
    pub fn try_receive(&self) -> Option<Command> {
        self.channel.try_receive()
    }
}
