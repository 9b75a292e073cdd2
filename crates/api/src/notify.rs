// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification gateway for guardian OTP dispatch.
//!
//! Dispatch is fire-and-forget: a delivery failure is logged and never
//! rolls back the transition that triggered it.

use tracing::{info, warn};

/// A notification delivery failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Notification dispatch failed: {0}")]
pub struct NotifyError(pub String);

/// Outbound messaging to guardians.
pub trait NotificationGateway {
    /// Sends a message to a contact address.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails.
    fn send(&self, contact: &str, message: &str) -> Result<(), NotifyError>;
}

/// Gateway that records dispatches in the log without delivering.
///
/// Used in tests and in deployments without a messaging provider.
pub struct LogOnlyGateway;

impl NotificationGateway for LogOnlyGateway {
    fn send(&self, contact: &str, message: &str) -> Result<(), NotifyError> {
        info!("notification to {contact}: {message}");
        Ok(())
    }
}

/// Dispatches a message, logging any failure instead of returning it.
pub fn dispatch_best_effort(gateway: &dyn NotificationGateway, contact: &str, message: &str) {
    if let Err(e) = gateway.send(contact, message) {
        warn!("dropping undeliverable notification to {contact}: {e}");
    }
}
