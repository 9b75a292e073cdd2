// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.
//!
//! Domain, core, and persistence errors never cross the API boundary
//! directly; each is translated into an [`ApiError`] whose
//! [`ErrorKind`] names the contract-level failure category carried in
//! the response envelope.

use gate_pass::CoreError;
use gate_pass_domain::DomainError;
use gate_pass_persistence::PersistenceError;
use serde::Serialize;

/// Contract-level failure categories exposed in the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input failed validation.
    ValidationError,
    /// The addressed resource does not exist.
    NotFound,
    /// The operator lacks permission for this action.
    Forbidden,
    /// The action is not valid in the record's current state.
    InvalidStateTransition,
    /// A concurrent writer committed first, or a duplicate scan
    /// arrived inside the debounce interval.
    Conflict,
    /// The visit ceiling for the scanned direction is reached.
    VisitLimitReached,
    /// The return QR token is outside its validity window.
    QrExpired,
    /// The presented code or token does not match the active one.
    InvalidCode,
    /// No one-time code is currently active on the request.
    NoActiveCode,
    /// A backing service failed; the request may be retried.
    Unavailable,
}

impl ErrorKind {
    /// Returns the snake_case string carried in the envelope.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::InvalidStateTransition => "invalid_state_transition",
            Self::Conflict => "conflict",
            Self::VisitLimitReached => "visit_limit_reached",
            Self::QrExpired => "qr_expired",
            Self::InvalidCode => "invalid_code",
            Self::NoActiveCode => "no_active_code",
            Self::Unavailable => "unavailable",
        }
    }
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Input failed validation.
    #[error("Invalid input for field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource} not found: {message}")]
    NotFound {
        /// The type of resource that was not found.
        resource: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The operator does not have permission for this action.
    #[error("Forbidden: '{action}' requires {required} access")]
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// The permission level required for this action.
        required: String,
    },
    /// The action is not valid in the record's current state.
    #[error("Invalid state transition: {message}")]
    InvalidStateTransition {
        /// A human-readable description of the violation.
        message: String,
    },
    /// A concurrent update or duplicate scan was detected.
    #[error("Conflict: {message}")]
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The visit ceiling for the scanned direction is reached.
    #[error("The {direction} visit limit of {limit} is reached")]
    VisitLimitReached {
        /// The direction that hit its ceiling.
        direction: String,
        /// The configured ceiling.
        limit: u32,
    },
    /// The return QR token is outside its validity window.
    #[error("The return QR token is outside its validity window")]
    QrExpired,
    /// The presented code or token does not match the active one.
    #[error("Invalid code: {message}")]
    InvalidCode {
        /// A human-readable description of the mismatch.
        message: String,
    },
    /// No one-time code is currently active on the request.
    #[error("No one-time code is currently active")]
    NoActiveCode,
    /// A backing service failed.
    #[error("Service unavailable: {message}")]
    Unavailable {
        /// A description of the failure.
        message: String,
    },
}

impl ApiError {
    /// Returns the envelope category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::ValidationError,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::InvalidStateTransition { .. } => ErrorKind::InvalidStateTransition,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::VisitLimitReached { .. } => ErrorKind::VisitLimitReached,
            Self::QrExpired => ErrorKind::QrExpired,
            Self::InvalidCode { .. } => ErrorKind::InvalidCode,
            Self::NoActiveCode => ErrorKind::NoActiveCode,
            Self::Unavailable { .. } => ErrorKind::Unavailable,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidReason(message) => Self::Validation {
                field: String::from("reason"),
                message,
            },
            DomainError::InvalidRejectionReason(message) => Self::Validation {
                field: String::from("rejection_reason"),
                message,
            },
            DomainError::InvalidWindow { reason } => Self::Validation {
                field: String::from("window"),
                message: reason,
            },
            DomainError::InvalidStudentRef(message) => Self::Validation {
                field: String::from("student_ref"),
                message,
            },
            DomainError::InvalidScanner(message) => Self::Validation {
                field: String::from("scanner"),
                message,
            },
            DomainError::InvalidLocation(message) => Self::Validation {
                field: String::from("location"),
                message,
            },
            DomainError::InvalidOtpFormat(message) => Self::Validation {
                field: String::from("code"),
                message,
            },
            DomainError::InvalidApplicationType(value) => Self::Validation {
                field: String::from("application_type"),
                message: format!("unknown application type '{value}'"),
            },
            DomainError::InvalidApprovalStatus(value) => Self::Validation {
                field: String::from("approval_status"),
                message: format!("unknown approval status '{value}'"),
            },
            DomainError::InvalidVerificationStatus(value) => Self::Validation {
                field: String::from("verification_status"),
                message: format!("unknown verification status '{value}'"),
            },
            DomainError::InvalidTimezone(value) => Self::Validation {
                field: String::from("timezone"),
                message: format!("unknown timezone '{value}'"),
            },
            DomainError::DateParseError { value, error } => Self::Validation {
                field: String::from("date"),
                message: format!("failed to parse '{value}': {error}"),
            },
            DomainError::InvalidVisitCeiling { count } => Self::Validation {
                field: String::from("visit_ceiling"),
                message: format!("invalid visit ceiling {count}"),
            },
            DomainError::InvalidStatusTransition { .. }
            | DomainError::InvalidVerificationTransition { .. }
            | DomainError::VerificationBeforeApproval { .. } => Self::InvalidStateTransition {
                message: err.to_string(),
            },
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DomainViolation(domain_err) => domain_err.into(),
            CoreError::NoActiveCode => Self::NoActiveCode,
            CoreError::InvalidCode => Self::InvalidCode {
                message: String::from("the presented code does not match the active code"),
            },
            CoreError::InvalidQrToken => Self::InvalidCode {
                message: String::from("the presented QR token is not recognized"),
            },
            CoreError::RequestLocked => Self::InvalidStateTransition {
                message: String::from("the request is locked against updates"),
            },
            CoreError::QrNotGenerated => Self::InvalidStateTransition {
                message: String::from("no return QR token has been activated for this request"),
            },
            CoreError::DecisionAlreadyMade { status } => Self::InvalidStateTransition {
                message: format!("the bulk outing already has a final decision: {status}"),
            },
            CoreError::DuplicateScan { seconds_since_last } => Self::Conflict {
                message: format!(
                    "duplicate scan: previous outgoing scan was {seconds_since_last} seconds ago"
                ),
            },
            CoreError::VisitLimitReached { direction, limit } => {
                Self::VisitLimitReached { direction, limit }
            }
            CoreError::QrExpired => Self::QrExpired,
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::RequestNotFound(public_id) => Self::NotFound {
                resource: String::from("Request"),
                message: format!("no request with id '{public_id}'"),
            },
            PersistenceError::BulkOutingNotFound(public_id) => Self::NotFound {
                resource: String::from("Bulk outing"),
                message: format!("no bulk outing with id '{public_id}'"),
            },
            PersistenceError::EventNotFound(event_id) => Self::NotFound {
                resource: String::from("Audit event"),
                message: format!("no audit event with id {event_id}"),
            },
            PersistenceError::VersionConflict {
                public_id,
                expected_version,
            } => Self::Conflict {
                message: format!(
                    "concurrent update on '{public_id}' (derived from version {expected_version})"
                ),
            },
            other => Self::Unavailable {
                message: other.to_string(),
            },
        }
    }
}
