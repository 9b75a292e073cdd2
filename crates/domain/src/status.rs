// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Approval and gate-verification status tracking.
//!
//! A request carries two orthogonal status axes:
//!
//! - [`ApprovalStatus`] tracks administrative sign-off progress.
//! - [`VerificationStatus`] tracks physical gate verification.
//!
//! Keeping the axes separate rules out illegal combined states such as
//! "Rejected but Verified". Status transitions are actor-initiated only;
//! the system never advances status based on time alone.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The kind of application a student submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationType {
    /// Multi-day leave with an overnight absence.
    Leave,
    /// Same-day permission to leave and return.
    Permission,
}

impl ApplicationType {
    /// Returns the string representation used for persistence and API
    /// serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Leave => "leave",
            Self::Permission => "permission",
        }
    }

    /// Returns the approval flow this application type follows.
    ///
    /// Leave requests require dual sign-off (warden, then principal).
    /// Permission requests complete with a single sign-off.
    #[must_use]
    pub const fn flow(&self) -> ApprovalFlow {
        match self {
            Self::Leave => ApprovalFlow::DualSignOff,
            Self::Permission => ApprovalFlow::SingleSignOff,
        }
    }
}

impl FromStr for ApplicationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "leave" => Ok(Self::Leave),
            "permission" => Ok(Self::Permission),
            _ => Err(DomainError::InvalidApplicationType(s.to_string())),
        }
    }
}

impl std::fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How many distinct sign-offs a request needs after OTP verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalFlow {
    /// OTP verification advances straight to `Approved`.
    SingleSignOff,
    /// OTP verification advances to `WardenVerified`; a separate
    /// principal action advances to `Approved`.
    DualSignOff,
}

/// Administrative approval states for a request.
///
/// Progression is monotonic forward except the explicit `Rejected`
/// transition, which is terminal and reachable from any non-terminal
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Submitted; awaiting guardian OTP verification.
    PendingOtp,
    /// OTP verified by the warden; awaiting principal sign-off.
    WardenVerified,
    /// Fully approved; eligible for gate verification.
    Approved,
    /// Rejected with a recorded reason. Terminal.
    Rejected,
}

impl ApprovalStatus {
    /// Returns the string representation used for persistence and API
    /// serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PendingOtp => "pending_otp",
            Self::WardenVerified => "warden_verified",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from its string representation.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending_otp" => Ok(Self::PendingOtp),
            "warden_verified" => Ok(Self::WardenVerified),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidApprovalStatus(s.to_string())),
        }
    }

    /// Returns true if this status is terminal.
    ///
    /// `Approved` is not terminal on this axis: the gate workflow still
    /// mutates the verification axis afterwards. `Rejected` is.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected)
    }

    /// Validates a transition from this status to another.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition
    /// is not permitted by the approval lifecycle rules.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        let valid = match self {
            Self::PendingOtp => matches!(
                new_status,
                Self::WardenVerified | Self::Approved | Self::Rejected
            ),
            Self::WardenVerified => matches!(new_status, Self::Approved | Self::Rejected),
            Self::Approved => matches!(new_status, Self::Rejected),
            Self::Rejected => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by approval lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Physical gate-verification states for a request.
///
/// This axis is independent of approval progress, with one coupling
/// rule: it may not advance past `NotVerified` unless the approval
/// status is `Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// No gate verification has occurred.
    #[default]
    NotVerified,
    /// Outgoing verification complete; student is off premises.
    Verified,
    /// Incoming verification complete; the cycle is closed. Terminal.
    Completed,
    /// The request lapsed without completing verification. Terminal.
    Expired,
}

impl VerificationStatus {
    /// Returns the string representation used for persistence and API
    /// serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotVerified => "not_verified",
            Self::Verified => "verified",
            Self::Completed => "completed",
            Self::Expired => "expired",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "not_verified" => Ok(Self::NotVerified),
            "verified" => Ok(Self::Verified),
            "completed" => Ok(Self::Completed),
            "expired" => Ok(Self::Expired),
            _ => Err(DomainError::InvalidVerificationStatus(s.to_string())),
        }
    }

    /// Returns true if this verification status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Expired)
    }

    /// Validates a transition from this verification status to another,
    /// given the current approval status.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the current verification status is terminal
    /// - the target is not reachable from the current status
    /// - the approval status is not `Approved` (the coupling rule)
    pub fn validate_transition(
        &self,
        new_status: Self,
        approval: ApprovalStatus,
    ) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidVerificationTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        if approval != ApprovalStatus::Approved {
            return Err(DomainError::VerificationBeforeApproval {
                status: approval.as_str().to_string(),
            });
        }

        let valid = match self {
            Self::NotVerified => matches!(new_status, Self::Verified | Self::Expired),
            Self::Verified => matches!(new_status, Self::Completed | Self::Expired),
            Self::Completed | Self::Expired => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidVerificationTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by verification lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for VerificationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Approval states for bulk outings.
///
/// Bulk outings skip the OTP step entirely, so their approval axis is
/// a plain three-state decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BulkOutingStatus {
    /// Submitted; awaiting a decision.
    #[default]
    Pending,
    /// Approved. Terminal.
    Approved,
    /// Rejected with a recorded reason. Terminal.
    Rejected,
}

impl BulkOutingStatus {
    /// Returns the string representation used for persistence and API
    /// serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidApprovalStatus(s.to_string())),
        }
    }

    /// Returns true if a decision has been recorded.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Validates a transition from this status to another.
    ///
    /// # Errors
    ///
    /// Returns an error if a decision has already been recorded.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() || new_status == Self::Pending {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "bulk outing decisions are final".to_string(),
            });
        }
        Ok(())
    }
}

impl FromStr for BulkOutingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_status_string_round_trip() {
        let statuses = vec![
            ApprovalStatus::PendingOtp,
            ApprovalStatus::WardenVerified,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
        ];

        for status in statuses {
            let s = status.as_str();
            match ApprovalStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_approval_status_string() {
        let result = ApprovalStatus::parse_str("resolved");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejected_is_only_terminal_approval_state() {
        assert!(!ApprovalStatus::PendingOtp.is_terminal());
        assert!(!ApprovalStatus::WardenVerified.is_terminal());
        assert!(!ApprovalStatus::Approved.is_terminal());
        assert!(ApprovalStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_pending_otp_transitions() {
        let current = ApprovalStatus::PendingOtp;

        assert!(
            current
                .validate_transition(ApprovalStatus::WardenVerified)
                .is_ok()
        );
        assert!(current.validate_transition(ApprovalStatus::Approved).is_ok());
        assert!(current.validate_transition(ApprovalStatus::Rejected).is_ok());
    }

    #[test]
    fn test_warden_verified_cannot_return_to_pending() {
        let current = ApprovalStatus::WardenVerified;

        assert!(
            current
                .validate_transition(ApprovalStatus::PendingOtp)
                .is_err()
        );
        assert!(current.validate_transition(ApprovalStatus::Approved).is_ok());
    }

    #[test]
    fn test_no_transitions_from_rejected() {
        let current = ApprovalStatus::Rejected;

        for target in [
            ApprovalStatus::PendingOtp,
            ApprovalStatus::WardenVerified,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
        ] {
            assert!(current.validate_transition(target).is_err());
        }
    }

    #[test]
    fn test_verification_blocked_before_approval() {
        let result = VerificationStatus::NotVerified
            .validate_transition(VerificationStatus::Verified, ApprovalStatus::WardenVerified);

        assert!(matches!(
            result.unwrap_err(),
            DomainError::VerificationBeforeApproval { .. }
        ));
    }

    #[test]
    fn test_verification_happy_path() {
        assert!(
            VerificationStatus::NotVerified
                .validate_transition(VerificationStatus::Verified, ApprovalStatus::Approved)
                .is_ok()
        );
        assert!(
            VerificationStatus::Verified
                .validate_transition(VerificationStatus::Completed, ApprovalStatus::Approved)
                .is_ok()
        );
    }

    #[test]
    fn test_verification_cannot_skip_to_completed() {
        let result = VerificationStatus::NotVerified
            .validate_transition(VerificationStatus::Completed, ApprovalStatus::Approved);

        assert!(result.is_err());
    }

    #[test]
    fn test_no_verification_transitions_from_terminal_states() {
        for terminal in [VerificationStatus::Completed, VerificationStatus::Expired] {
            assert!(
                terminal
                    .validate_transition(VerificationStatus::Verified, ApprovalStatus::Approved)
                    .is_err()
            );
        }
    }

    #[test]
    fn test_application_type_flow_binding() {
        assert_eq!(ApplicationType::Leave.flow(), ApprovalFlow::DualSignOff);
        assert_eq!(
            ApplicationType::Permission.flow(),
            ApprovalFlow::SingleSignOff
        );
    }

    #[test]
    fn test_bulk_outing_decisions_are_final() {
        assert!(
            BulkOutingStatus::Pending
                .validate_transition(BulkOutingStatus::Approved)
                .is_ok()
        );
        assert!(
            BulkOutingStatus::Approved
                .validate_transition(BulkOutingStatus::Rejected)
                .is_err()
        );
        assert!(
            BulkOutingStatus::Rejected
                .validate_transition(BulkOutingStatus::Approved)
                .is_err()
        );
    }
}
