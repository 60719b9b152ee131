//! Teardown signalling for view models.
//!
//! Each view model owns a [`ViewScope`]. The shell keeps a [`TeardownHandle`]
//! and fires it when the user navigates away; any request still in flight is
//! then abandoned and its result is never applied to the view's state.

use std::future::Future;

use tokio::sync::watch;

use crate::error::{Error, Result};

/// Lifetime of a single view.
#[derive(Debug)]
pub struct ViewScope {
    sender: watch::Sender<bool>,
    receiver: watch::Receiver<bool>,
}

/// Clonable handle that tears a view down.
#[derive(Debug, Clone)]
pub struct TeardownHandle {
    sender: watch::Sender<bool>,
}

impl ViewScope {
    pub fn new() -> Self {
        let (sender, receiver) = watch::channel(false);
        Self { sender, receiver }
    }

    pub fn handle(&self) -> TeardownHandle {
        TeardownHandle {
            sender: self.sender.clone(),
        }
    }

    pub fn is_torn_down(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Runs `request` unless the view is torn down first.
    ///
    /// Returns [`Error::ViewClosed`] when the teardown wins the race, or when
    /// it already happened before the call.
    pub async fn run<T, F>(&self, request: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_torn_down() {
            return Err(Error::ViewClosed);
        }

        let mut receiver = self.receiver.clone();
        let result = tokio::select! {
            result = request => result,
            _ = receiver.wait_for(|closed| *closed) => return Err(Error::ViewClosed),
        };

        // The signal may have landed while the response was being decoded.
        if self.is_torn_down() {
            return Err(Error::ViewClosed);
        }
        result
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TeardownHandle {
    pub fn teardown(&self) {
        self.sender.send_replace(true);
    }
}
