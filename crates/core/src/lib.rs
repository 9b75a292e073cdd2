// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

use gate_pass_domain::{ApprovalStatus, DomainError};

// Re-export public types and functions
pub use apply::{apply, apply_bulk, apply_submit, apply_submit_bulk};
pub use command::{BulkCommand, Command};
pub use error::CoreError;
pub use state::{
    BulkOutingRequest, BulkTransitionResult, IncomingQr, OtpCode, PassRequest, TransitionResult,
};

/// Validates that a request is eligible for gate activity.
///
/// This is a read-only validation that does not create audit events.
/// Gate scanners call it before attempting to record a visit.
///
/// # Arguments
///
/// * `request` - The request to check
///
/// # Returns
///
/// * `Ok(())` if the request is fully approved and not yet closed
/// * `Err(DomainError)` otherwise
///
/// # Errors
///
/// Returns an error if the request is not `Approved` or its gate
/// verification has already reached a terminal state.
pub fn validate_gate_eligibility(request: &PassRequest) -> Result<(), DomainError> {
    if request.approval_status != ApprovalStatus::Approved {
        return Err(DomainError::VerificationBeforeApproval {
            status: request.approval_status.to_string(),
        });
    }
    if request.verification_status.is_terminal() {
        return Err(DomainError::InvalidVerificationTransition {
            from: request.verification_status.to_string(),
            to: request.verification_status.to_string(),
            reason: String::from("gate verification already closed"),
        });
    }
    Ok(())
}
