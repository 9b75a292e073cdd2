// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! DTOs carry civil datetimes as strings in the storage format
//! (`2026-03-02T09:00:00`); handlers parse and validate them at the
//! boundary. These types are distinct from domain types and represent
//! the API contract.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Uniform response envelope for every API operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The payload, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// The failure category, present on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    /// Human-readable outcome description.
    pub message: String,
}

impl<T> ApiResponse<T> {
    /// Wraps a successful payload.
    #[must_use]
    pub const fn ok(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            error_kind: None,
            message,
        }
    }

    /// Wraps a failure.
    #[must_use]
    pub fn err(error: &ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error_kind: Some(error.kind().as_str()),
            message: error.to_string(),
        }
    }
}

/// The time window of a request as carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum WindowPayload {
    /// Multi-day leave window.
    Leave {
        /// Civil datetime the leave begins.
        start_at: String,
        /// Civil datetime the leave ends.
        end_at: String,
        /// Civil datetime the student passes the gate.
        gate_pass_at: String,
    },
    /// Same-day permission window.
    Permission {
        /// Calendar day of the permission (`2026-03-02`).
        permission_date: String,
        /// Time the student leaves (`14:00:00`).
        out_time: String,
        /// Time the student returns.
        in_time: String,
    },
}

/// API request to submit a leave or permission request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitRequestRequest {
    /// Public identifier assigned by the caller.
    pub public_id: String,
    /// Directory reference of the student.
    pub student_ref: String,
    /// `leave` or `permission`.
    pub application_type: String,
    /// Free-text reason.
    pub reason: String,
    /// The requested window.
    pub window: WindowPayload,
}

/// API request to replace the editable details of a request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateDetailsRequest {
    /// The new free-text reason.
    pub reason: String,
    /// The new window.
    pub window: WindowPayload,
}

/// Full request view returned by reads and mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestView {
    /// Public identifier.
    pub public_id: String,
    /// Directory reference of the student.
    pub student_ref: String,
    /// `leave` or `permission`.
    pub application_type: String,
    /// Free-text reason.
    pub reason: String,
    /// The requested window.
    pub window: WindowPayload,
    /// Administrative approval progress.
    pub approval_status: String,
    /// Physical gate verification progress.
    pub verification_status: String,
    /// Recorded rejection reason, if rejected.
    pub rejection_reason: Option<String>,
    /// Whether an unconsumed one-time code is active.
    pub has_active_code: bool,
    /// Count of recorded outgoing scans.
    pub outgoing_visits: u32,
    /// Count of recorded incoming scans.
    pub incoming_visits: u32,
    /// Whether the request is locked against detail updates.
    pub is_locked_for_updates: bool,
    /// Storage version for optimistic concurrency.
    pub row_version: i64,
}

/// One row of a bucketed request listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestSummary {
    /// Public identifier.
    pub public_id: String,
    /// Directory reference of the student.
    pub student_ref: String,
    /// `leave` or `permission`.
    pub application_type: String,
    /// Civil datetime the absence begins.
    pub start_at: String,
    /// Display bucket derived from the start instant.
    pub bucket: String,
    /// Administrative approval progress.
    pub approval_status: String,
    /// Physical gate verification progress.
    pub verification_status: String,
    /// Unverified and starting within the next 30 minutes.
    pub urgent: bool,
    /// Unverified with a start instant already in the past.
    pub overdue: bool,
}

/// API response revealing the active one-time code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevealOtpResponse {
    /// Public identifier of the request.
    pub public_id: String,
    /// The active code cleartext.
    pub code: String,
    /// When the code was issued (RFC 3339).
    pub issued_at: String,
}

/// API request to verify a supplied one-time code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyOtpRequest {
    /// The code the guardian read back.
    pub code: String,
}

/// API request to reject a request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RejectRequest {
    /// The mandatory rejection reason.
    pub reason: String,
}

/// API request to record an outgoing gate scan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutgoingScanRequest {
    /// Identity of the scanning device or guard.
    pub scanner: String,
    /// Gate location of the scan.
    pub location: String,
}

/// API response for a recorded outgoing scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingScanResponse {
    /// The updated request.
    pub request: RequestView,
    /// The return QR token to present on re-entry.
    pub qr_token: String,
}

/// API request to record an incoming gate scan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IncomingScanRequest {
    /// Identity of the scanning device or guard.
    pub scanner: String,
    /// Gate location of the scan.
    pub location: String,
    /// The QR token presented by the student.
    pub token: String,
}

/// API request to set a verification outcome directly.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SetVerificationRequest {
    /// The target verification status.
    pub new_status: String,
}

/// API response for a direct verification status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationUpdateResponse {
    /// The updated request.
    pub request: RequestView,
    /// The return QR token, when the change marked a leave verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_token: Option<String>,
}

/// API request to submit a bulk outing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitBulkOutingRequest {
    /// Public identifier assigned by the caller.
    pub public_id: String,
    /// Purpose of the outing.
    pub purpose: String,
    /// Who is organizing the outing.
    pub requested_by: String,
    /// The outing window.
    pub window: WindowPayload,
}

/// API request to decide a pending bulk outing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DecideBulkOutingRequest {
    /// `approve` or `reject`.
    pub decision: String,
    /// Mandatory reason when rejecting.
    pub reason: Option<String>,
    /// Roster snapshot captured with an approval.
    pub students: Option<Vec<String>>,
}

/// Bulk outing view returned by reads and mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkOutingView {
    /// Public identifier.
    pub public_id: String,
    /// Purpose of the outing.
    pub purpose: String,
    /// Who submitted the outing.
    pub requested_by: String,
    /// The decision state.
    pub status: String,
    /// Number of students in the approval snapshot.
    pub student_count: usize,
    /// Recorded rejection reason, if rejected.
    pub rejection_reason: Option<String>,
    /// When the decision was recorded (RFC 3339), if any.
    pub decided_at: Option<String>,
    /// Storage version for optimistic concurrency.
    pub row_version: i64,
}

/// API response listing the students covered by a bulk outing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkOutingStudentsResponse {
    /// Public identifier of the outing.
    pub public_id: String,
    /// The decision state.
    pub status: String,
    /// The roster snapshot; empty while the outing is pending.
    pub students: Vec<String>,
}
