//! User-visible notifications.
//!
//! The simulation reports player-facing events (construction finished,
//! insufficient resources, ship lost) through a [`NotificationSink`] handed
//! in by the driver. Programmer errors go to the `log` facade instead.

use std::cell::RefCell;
use std::rc::Rc;

pub trait NotificationSink {
    /// Show a message to the player. Never blocks.
    fn notify(&mut self, message: &str);

    /// The galaxy layout changed (new system, ship jumped); redraw views.
    fn refresh_view(&mut self) {}
}

/// Discards every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _message: &str) {}
}

impl<F: FnMut(&str)> NotificationSink for F {
    fn notify(&mut self, message: &str) {
        self(message)
    }
}

/// Collects notifications in memory.
///
/// Clones share the same buffer, so the driver can keep one handle and give
/// the other to a session.
#[derive(Debug, Default, Clone)]
pub struct MessageLog {
    messages: Rc<RefCell<Vec<String>>>,
    refreshes: Rc<RefCell<u32>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    /// Take every message received so far.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }

    /// Number of `refresh_view` requests received
    pub fn refreshes(&self) -> u32 {
        *self.refreshes.borrow()
    }
}

impl NotificationSink for MessageLog {
    fn notify(&mut self, message: &str) {
        log::debug!("notify: {}", message);
        self.messages.borrow_mut().push(message.to_string());
    }

    fn refresh_view(&mut self) {
        *self.refreshes.borrow_mut() += 1;
    }
}
