// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Serialization mirrors for stored JSON columns and row-to-domain
//! reconstruction.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::PersistenceError;
use gate_pass::{BulkOutingRequest, IncomingQr, OtpCode, PassRequest};
use gate_pass_domain::{RequestWindow, StudentRef};

/// Serialized form of an audit actor.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serialized form of an audit cause.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serialized form of an audit action.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serialized form of a state snapshot.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SnapshotData {
    pub data: String,
}

/// Formats an absolute instant for storage.
pub(crate) fn format_instant(instant: OffsetDateTime) -> Result<String, PersistenceError> {
    instant
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Parses a stored absolute instant.
pub(crate) fn parse_instant(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
        PersistenceError::ReconstructionError(format!("invalid stored instant '{value}': {e}"))
    })
}

/// A request row that could not be reconstructed into its domain form.
///
/// Listings surface these instead of failing, so one corrupt row does
/// not hide every other request from the gate. The raw column values
/// are carried as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedRow {
    /// Public identifier of the damaged row.
    pub public_id: String,
    /// The stored student reference.
    pub student_ref: String,
    /// The stored application type.
    pub application_type: String,
    /// The stored start instant, as written.
    pub start_at: String,
    /// The stored approval status.
    pub approval_status: String,
    /// The stored verification status.
    pub verification_status: String,
    /// Why reconstruction failed.
    pub error: String,
}

/// The outcome of a listing query: the rows that reconstructed cleanly
/// plus the ones that did not.
#[derive(Debug, Default)]
pub struct RequestListing {
    /// Requests reconstructed into their domain form, in query order.
    pub requests: Vec<PassRequest>,
    /// Rows whose stored data failed reconstruction.
    pub flagged: Vec<FlaggedRow>,
}

/// A raw row from the `requests` table.
#[derive(Debug)]
pub(crate) struct RequestRow {
    pub public_id: String,
    pub student_ref: String,
    pub application_type: String,
    pub reason: String,
    pub window_json: String,
    pub start_at: String,
    pub approval_status: String,
    pub verification_status: String,
    pub rejection_reason: Option<String>,
    pub otp_code: Option<String>,
    pub otp_issued_at: Option<String>,
    pub otp_consumed: bool,
    pub qr_token: Option<String>,
    pub qr_generated_at: Option<String>,
    pub outgoing_visits: u32,
    pub incoming_visits: u32,
    pub last_outgoing_scan_at: Option<String>,
    pub is_locked_for_updates: bool,
    pub row_version: i64,
}

impl RequestRow {
    /// Captures the identifying columns of this row for flagging.
    ///
    /// The error is filled in by the caller once reconstruction has
    /// actually failed.
    pub(crate) fn identity(&self) -> FlaggedRow {
        FlaggedRow {
            public_id: self.public_id.clone(),
            student_ref: self.student_ref.clone(),
            application_type: self.application_type.clone(),
            start_at: self.start_at.clone(),
            approval_status: self.approval_status.clone(),
            verification_status: self.verification_status.clone(),
            error: String::new(),
        }
    }

    /// Reconstructs the domain request from this row.
    pub(crate) fn into_request(self) -> Result<PassRequest, PersistenceError> {
        let window: RequestWindow = serde_json::from_str(&self.window_json)?;
        let student: StudentRef = StudentRef::new(&self.student_ref)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

        let otp: Option<OtpCode> = match (self.otp_code, self.otp_issued_at) {
            (Some(code), Some(issued_at)) => Some(OtpCode {
                code,
                issued_at: parse_instant(&issued_at)?,
            }),
            _ => None,
        };

        let incoming_qr: Option<IncomingQr> = match (self.qr_token, self.qr_generated_at) {
            (Some(token), Some(generated_at)) => Some(IncomingQr {
                token,
                generated_at: parse_instant(&generated_at)?,
            }),
            _ => None,
        };

        let last_outgoing_scan_at: Option<OffsetDateTime> = self
            .last_outgoing_scan_at
            .as_deref()
            .map(parse_instant)
            .transpose()?;

        Ok(PassRequest {
            public_id: self.public_id,
            student,
            application_type: self
                .application_type
                .parse()
                .map_err(|e: gate_pass_domain::DomainError| {
                    PersistenceError::ReconstructionError(e.to_string())
                })?,
            reason: self.reason,
            window,
            approval_status: self.approval_status.parse().map_err(
                |e: gate_pass_domain::DomainError| {
                    PersistenceError::ReconstructionError(e.to_string())
                },
            )?,
            verification_status: self.verification_status.parse().map_err(
                |e: gate_pass_domain::DomainError| {
                    PersistenceError::ReconstructionError(e.to_string())
                },
            )?,
            rejection_reason: self.rejection_reason,
            otp,
            otp_consumed: self.otp_consumed,
            incoming_qr,
            outgoing_visits: self.outgoing_visits,
            incoming_visits: self.incoming_visits,
            last_outgoing_scan_at,
            is_locked_for_updates: self.is_locked_for_updates,
            row_version: self.row_version,
        })
    }
}

/// A raw row from the `bulk_outings` table.
#[derive(Debug)]
pub(crate) struct BulkOutingRow {
    pub public_id: String,
    pub purpose: String,
    pub window_json: String,
    pub requested_by: String,
    pub status: String,
    pub students_json: Option<String>,
    pub rejection_reason: Option<String>,
    pub decided_at: Option<String>,
    pub row_version: i64,
}

impl BulkOutingRow {
    /// Reconstructs the domain bulk outing from this row.
    pub(crate) fn into_outing(self) -> Result<BulkOutingRequest, PersistenceError> {
        let window: RequestWindow = serde_json::from_str(&self.window_json)?;
        let students: Option<Vec<StudentRef>> = self
            .students_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        let decided_at: Option<OffsetDateTime> =
            self.decided_at.as_deref().map(parse_instant).transpose()?;

        Ok(BulkOutingRequest {
            public_id: self.public_id,
            purpose: self.purpose,
            window,
            requested_by: self.requested_by,
            status: self
                .status
                .parse()
                .map_err(|e: gate_pass_domain::DomainError| {
                    PersistenceError::ReconstructionError(e.to_string())
                })?,
            students,
            rejection_reason: self.rejection_reason,
            decided_at,
            row_version: self.row_version,
        })
    }
}
