// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gate_pass_domain::DomainError;

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A code was presented but no code is currently active.
    NoActiveCode,
    /// The presented code does not match the active code.
    InvalidCode,
    /// The request is locked against detail updates.
    RequestLocked,
    /// A repeat outgoing scan arrived inside the debounce interval.
    DuplicateScan {
        /// Seconds elapsed since the previous outgoing scan.
        seconds_since_last: i64,
    },
    /// The visit ceiling for this direction is already reached.
    VisitLimitReached {
        /// The direction that hit its ceiling.
        direction: String,
        /// The configured ceiling.
        limit: u32,
    },
    /// An incoming scan arrived before any outgoing scan activated a
    /// QR token.
    QrNotGenerated,
    /// The presented QR token does not match the active token.
    InvalidQrToken,
    /// The active QR token is outside its validity window.
    QrExpired,
    /// A decision was attempted on a bulk outing that already has one.
    DecisionAlreadyMade {
        /// The status the outing is already in.
        status: String,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::NoActiveCode => write!(f, "No one-time code is currently active"),
            Self::InvalidCode => write!(f, "The presented code does not match the active code"),
            Self::RequestLocked => write!(f, "The request is locked against updates"),
            Self::DuplicateScan { seconds_since_last } => {
                write!(
                    f,
                    "Duplicate scan: previous outgoing scan was {seconds_since_last} seconds ago"
                )
            }
            Self::VisitLimitReached { direction, limit } => {
                write!(f, "The {direction} visit limit of {limit} is reached")
            }
            Self::QrNotGenerated => {
                write!(f, "No return QR token has been activated for this request")
            }
            Self::InvalidQrToken => write!(f, "The presented QR token is not recognized"),
            Self::QrExpired => write!(f, "The return QR token is outside its validity window"),
            Self::DecisionAlreadyMade { status } => {
                write!(f, "The bulk outing already has a final decision: {status}")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
