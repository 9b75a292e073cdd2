// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gate_pass_audit::{AuditEvent, StateSnapshot};
use gate_pass_domain::{
    ApplicationType, ApprovalStatus, BulkOutingStatus, DomainError, RequestWindow, StudentRef,
    VerificationStatus, validate_otp_format, validate_reason,
};
use time::OffsetDateTime;

/// The active one-time code on a request.
///
/// The cleartext is held while the code is active so the issuing
/// warden can re-read it; consumption clears it permanently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCode {
    /// The four-digit code.
    pub code: String,
    /// When the code was issued.
    pub issued_at: OffsetDateTime,
}

impl OtpCode {
    /// Creates a new active code, validating its shape.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidOtpFormat` if the code is not
    /// exactly four ASCII digits.
    pub fn new(code: &str, issued_at: OffsetDateTime) -> Result<Self, DomainError> {
        validate_otp_format(code)?;
        Ok(Self {
            code: code.to_string(),
            issued_at,
        })
    }
}

/// The incoming (return) QR token activated by the first outgoing
/// scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingQr {
    /// The opaque token encoded in the QR.
    pub token: String,
    /// When the token was activated. The validity window is measured
    /// from this instant.
    pub generated_at: OffsetDateTime,
}

/// A leave or permission request and its full lifecycle state.
///
/// Values of this type are immutable from the caller's perspective;
/// every change goes through [`crate::apply`] and yields a new value
/// plus an audit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassRequest {
    /// Public identifier, stable across the request's lifetime.
    pub public_id: String,
    /// The student this request belongs to.
    pub student: StudentRef,
    /// Leave or permission.
    pub application_type: ApplicationType,
    /// Free-text reason supplied at submission.
    pub reason: String,
    /// The requested time window.
    pub window: RequestWindow,
    /// Administrative approval progress.
    pub approval_status: ApprovalStatus,
    /// Physical gate verification progress.
    pub verification_status: VerificationStatus,
    /// The mandatory reason recorded with a rejection.
    pub rejection_reason: Option<String>,
    /// The currently active one-time code, if any.
    pub otp: Option<OtpCode>,
    /// Whether a code has ever been consumed on this request.
    pub otp_consumed: bool,
    /// The active incoming QR token, if any.
    pub incoming_qr: Option<IncomingQr>,
    /// Count of recorded outgoing gate scans.
    pub outgoing_visits: u32,
    /// Count of recorded incoming gate scans.
    pub incoming_visits: u32,
    /// Instant of the most recent outgoing scan, for debounce.
    pub last_outgoing_scan_at: Option<OffsetDateTime>,
    /// Whether the request is locked against detail updates.
    pub is_locked_for_updates: bool,
    /// Storage version for optimistic concurrency control.
    pub row_version: i64,
}

impl PassRequest {
    /// Creates a freshly submitted request.
    ///
    /// The request starts awaiting OTP verification with no gate
    /// activity recorded.
    ///
    /// # Arguments
    ///
    /// * `public_id` - The stable public identifier
    /// * `student` - The owning student
    /// * `application_type` - Leave or permission
    /// * `reason` - The free-text reason
    /// * `window` - The requested time window
    ///
    /// # Errors
    ///
    /// Returns an error if the reason fails validation. The window is
    /// validated at its own construction.
    pub fn submit(
        public_id: String,
        student: StudentRef,
        application_type: ApplicationType,
        reason: &str,
        window: RequestWindow,
    ) -> Result<Self, DomainError> {
        validate_reason(reason)?;
        Ok(Self {
            public_id,
            student,
            application_type,
            reason: reason.trim().to_string(),
            window,
            approval_status: ApprovalStatus::PendingOtp,
            verification_status: VerificationStatus::NotVerified,
            rejection_reason: None,
            otp: None,
            otp_consumed: false,
            incoming_qr: None,
            outgoing_visits: 0,
            incoming_visits: 0,
            last_outgoing_scan_at: None,
            is_locked_for_updates: false,
            row_version: 0,
        })
    }

    /// Converts the request's status pair to a snapshot for audit
    /// purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(format!(
            "approval={},verification={}",
            self.approval_status, self.verification_status
        ))
    }
}

/// A bulk outing request covering a group of students.
///
/// Bulk outings skip the OTP step; a single decision finalizes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutingRequest {
    /// Public identifier, stable across the outing's lifetime.
    pub public_id: String,
    /// Purpose of the outing.
    pub purpose: String,
    /// The outing window. Always a same-day permission shape.
    pub window: RequestWindow,
    /// Who submitted the outing.
    pub requested_by: String,
    /// The decision state.
    pub status: BulkOutingStatus,
    /// Snapshot of covered students, captured at approval time.
    ///
    /// `None` until the outing is approved; the roster is deliberately
    /// not resolved at submission.
    pub students: Option<Vec<StudentRef>>,
    /// The mandatory reason recorded with a rejection.
    pub rejection_reason: Option<String>,
    /// When the decision was recorded, if any.
    pub decided_at: Option<OffsetDateTime>,
    /// Storage version for optimistic concurrency control.
    pub row_version: i64,
}

impl BulkOutingRequest {
    /// Creates a freshly submitted bulk outing.
    ///
    /// # Errors
    ///
    /// Returns an error if the purpose fails reason validation.
    pub fn submit(
        public_id: String,
        purpose: &str,
        window: RequestWindow,
        requested_by: &str,
    ) -> Result<Self, DomainError> {
        validate_reason(purpose)?;
        Ok(Self {
            public_id,
            purpose: purpose.trim().to_string(),
            window,
            requested_by: requested_by.to_string(),
            status: BulkOutingStatus::Pending,
            students: None,
            rejection_reason: None,
            decided_at: None,
            row_version: 0,
        })
    }

    /// Converts the outing's decision state to a snapshot for audit
    /// purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new(format!(
            "bulk_status={},students_count={}",
            self.status.as_str(),
            self.students.as_ref().map_or(0, Vec::len)
        ))
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail
/// without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new request state after the transition.
    pub new_state: PassRequest,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// The result of a successful bulk outing transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkTransitionResult {
    /// The new outing state after the transition.
    pub new_state: BulkOutingRequest,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
