// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Request reason is empty or invalid.
    InvalidReason(String),
    /// Rejection reason is empty or invalid.
    InvalidRejectionReason(String),
    /// Request window fields are inconsistent.
    InvalidWindow {
        /// Description of the window violation.
        reason: String,
    },
    /// Student reference is empty or invalid.
    InvalidStudentRef(String),
    /// Scanner identity for a gate event is empty or invalid.
    InvalidScanner(String),
    /// Gate location for a gate event is empty or invalid.
    InvalidLocation(String),
    /// One-time code is not exactly four ASCII digits.
    InvalidOtpFormat(String),
    /// Application type string is not recognized.
    InvalidApplicationType(String),
    /// Approval status string is not recognized.
    InvalidApprovalStatus(String),
    /// Verification status string is not recognized.
    InvalidVerificationStatus(String),
    /// Approval status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is not permitted.
        reason: String,
    },
    /// Gate verification status transition is not permitted.
    InvalidVerificationTransition {
        /// The current verification status.
        from: String,
        /// The requested verification status.
        to: String,
        /// Why the transition is not permitted.
        reason: String,
    },
    /// Gate verification attempted before the request reached final approval.
    VerificationBeforeApproval {
        /// The approval status at the time of the attempt.
        status: String,
    },
    /// Timezone name is not a recognized IANA identifier.
    InvalidTimezone(String),
    /// Failed to parse a date or datetime from a stored string.
    DateParseError {
        /// The invalid value.
        value: String,
        /// The parsing error message.
        error: String,
    },
    /// Visit ceiling configuration is invalid.
    InvalidVisitCeiling {
        /// The invalid ceiling value.
        count: u32,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReason(msg) => write!(f, "Invalid reason: {msg}"),
            Self::InvalidRejectionReason(msg) => {
                write!(f, "Invalid rejection reason: {msg}")
            }
            Self::InvalidWindow { reason } => write!(f, "Invalid request window: {reason}"),
            Self::InvalidStudentRef(msg) => write!(f, "Invalid student reference: {msg}"),
            Self::InvalidScanner(msg) => write!(f, "Invalid scanner identity: {msg}"),
            Self::InvalidLocation(msg) => write!(f, "Invalid gate location: {msg}"),
            Self::InvalidOtpFormat(msg) => write!(f, "Invalid one-time code: {msg}"),
            Self::InvalidApplicationType(s) => {
                write!(f, "Unknown application type: {s}")
            }
            Self::InvalidApprovalStatus(s) => write!(f, "Unknown approval status: {s}"),
            Self::InvalidVerificationStatus(s) => {
                write!(f, "Unknown verification status: {s}")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(
                    f,
                    "Invalid status transition from '{from}' to '{to}': {reason}"
                )
            }
            Self::InvalidVerificationTransition { from, to, reason } => {
                write!(
                    f,
                    "Invalid verification transition from '{from}' to '{to}': {reason}"
                )
            }
            Self::VerificationBeforeApproval { status } => {
                write!(
                    f,
                    "Gate verification is not available while approval status is '{status}'"
                )
            }
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::DateParseError { value, error } => {
                write!(f, "Failed to parse date '{value}': {error}")
            }
            Self::InvalidVisitCeiling { count } => {
                write!(f, "Invalid visit ceiling: {count}. Must be greater than 0")
            }
        }
    }
}

impl std::error::Error for DomainError {}
