//! Async load lifecycle.
//!
//! Loaders run as futures off the frame path. They never touch the scene:
//! they deliver exactly one result through a [`Completer`], and the frame
//! loop polls the matching [`Pending`] at the top of each frame. Dropping the
//! `Pending` (view teardown) makes any later delivery a no-op.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

/// Progress of an asynchronously loaded resource.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoadState::Loading => "loading",
            LoadState::Ready(_) => "ready",
            LoadState::Failed(_) => "unavailable",
        }
    }
}

/// Creates a single-shot handoff for one load.
pub fn handoff<T>(label: &'static str) -> (Completer<T>, Pending<T>) {
    let slot = Rc::new(RefCell::new(None));
    (
        Completer {
            label,
            slot: Rc::downgrade(&slot),
        },
        Pending { label, slot },
    )
}

/// Loader side of a handoff. Consumed on delivery, so a load resolves once.
#[derive(Debug)]
pub struct Completer<T> {
    label: &'static str,
    slot: Weak<RefCell<Option<T>>>,
}

impl<T> Completer<T> {
    /// Delivers the result. Returns `false` if the receiving view is gone and
    /// the value was discarded.
    pub fn complete(self, value: T) -> bool {
        match self.slot.upgrade() {
            Some(slot) => {
                *slot.borrow_mut() = Some(value);
                true
            }
            None => {
                debug!(load = self.label, "discarding result delivered after teardown");
                false
            }
        }
    }

    /// Whether a receiver still exists. Loaders may check this to skip work.
    pub fn is_cancelled(&self) -> bool {
        self.slot.strong_count() == 0
    }
}

/// Frame-loop side of a handoff.
#[derive(Debug)]
pub struct Pending<T> {
    label: &'static str,
    slot: Rc<RefCell<Option<T>>>,
}

impl<T> Pending<T> {
    /// Takes the delivered result, if any. Returns `Some` at most once.
    pub fn take(&self) -> Option<T> {
        self.slot.borrow_mut().take()
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}
