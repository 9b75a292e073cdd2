// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rusqlite::{Transaction, params};
use tracing::{debug, info};

use gate_pass::{BulkTransitionResult, PassRequest, TransitionResult};
use gate_pass_audit::{AuditEvent, VisitEvent};
use gate_pass_domain::format_civil;

use crate::error::PersistenceError;
use crate::models::{ActionData, ActorData, CauseData, SnapshotData, format_instant};

/// Persists an audit event, returning its assigned event ID.
///
/// # Arguments
///
/// * `tx` - The active database transaction
/// * `subject_public_id` - The public id of the request or outing the
///   event belongs to
/// * `event` - The audit event to persist
///
/// # Errors
///
/// Returns an error if persistence fails.
pub(crate) fn persist_audit_event(
    tx: &Transaction<'_>,
    subject_public_id: &str,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let actor_json: String = serde_json::to_string(&ActorData {
        id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
    })?;
    let cause_json: String = serde_json::to_string(&CauseData {
        id: event.cause.id.clone(),
        description: event.cause.description.clone(),
    })?;
    let action_json: String = serde_json::to_string(&ActionData {
        name: event.action.name.clone(),
        details: event.action.details.clone(),
    })?;
    let before_json: String = serde_json::to_string(&SnapshotData {
        data: event.before.data.clone(),
    })?;
    let after_json: String = serde_json::to_string(&SnapshotData {
        data: event.after.data.clone(),
    })?;

    tx.execute(
        "INSERT INTO audit_events (subject_public_id, actor_json, cause_json, action_json,
                before_snapshot_json, after_snapshot_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            subject_public_id,
            actor_json,
            cause_json,
            action_json,
            before_json,
            after_json
        ],
    )?;

    Ok(tx.last_insert_rowid())
}

/// Column values shared by request insert and update.
struct RequestColumns {
    window_json: String,
    start_at: String,
    otp_code: Option<String>,
    otp_issued_at: Option<String>,
    qr_token: Option<String>,
    qr_generated_at: Option<String>,
    last_outgoing_scan_at: Option<String>,
}

fn request_columns(request: &PassRequest) -> Result<RequestColumns, PersistenceError> {
    Ok(RequestColumns {
        window_json: serde_json::to_string(&request.window)?,
        start_at: format_civil(request.window.start_instant()),
        otp_code: request.otp.as_ref().map(|o| o.code.clone()),
        otp_issued_at: request
            .otp
            .as_ref()
            .map(|o| format_instant(o.issued_at))
            .transpose()?,
        qr_token: request.incoming_qr.as_ref().map(|q| q.token.clone()),
        qr_generated_at: request
            .incoming_qr
            .as_ref()
            .map(|q| format_instant(q.generated_at))
            .transpose()?,
        last_outgoing_scan_at: request
            .last_outgoing_scan_at
            .map(format_instant)
            .transpose()?,
    })
}

/// Inserts a freshly submitted request and its submission audit event.
///
/// # Arguments
///
/// * `tx` - The active database transaction
/// * `result` - The submission transition to persist
///
/// # Returns
///
/// The event ID assigned to the submission audit event.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub(crate) fn insert_request(
    tx: &Transaction<'_>,
    result: &TransitionResult,
) -> Result<i64, PersistenceError> {
    let request: &PassRequest = &result.new_state;
    let cols: RequestColumns = request_columns(request)?;

    tx.execute(
        "INSERT INTO requests (public_id, student_ref, application_type, reason, window_json,
                start_at, approval_status, verification_status, rejection_reason,
                otp_code, otp_issued_at, otp_consumed, qr_token, qr_generated_at,
                outgoing_visits, incoming_visits, last_outgoing_scan_at,
                is_locked_for_updates, row_version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                ?15, ?16, ?17, ?18, ?19)",
        params![
            request.public_id,
            request.student.value(),
            request.application_type.as_str(),
            request.reason,
            cols.window_json,
            cols.start_at,
            request.approval_status.as_str(),
            request.verification_status.as_str(),
            request.rejection_reason,
            cols.otp_code,
            cols.otp_issued_at,
            request.otp_consumed,
            cols.qr_token,
            cols.qr_generated_at,
            request.outgoing_visits,
            request.incoming_visits,
            cols.last_outgoing_scan_at,
            request.is_locked_for_updates,
            request.row_version,
        ],
    )?;
    debug!(public_id = %request.public_id, "Inserted request");

    let event_id: i64 = persist_audit_event(tx, &request.public_id, &result.audit_event)?;
    info!(event_id, public_id = %request.public_id, "Persisted submission");

    Ok(event_id)
}

/// Persists a transition on an existing request.
///
/// The update is guarded by the row version the transition was derived
/// from; a concurrent writer that committed first makes this call fail
/// with `VersionConflict` and nothing is written.
///
/// # Arguments
///
/// * `tx` - The active database transaction
/// * `result` - The transition result to persist
/// * `visit` - The gate visit to append, for scan transitions
///
/// # Returns
///
/// The event ID assigned to the persisted audit event.
///
/// # Errors
///
/// Returns an error if the row version check fails or persistence
/// fails.
pub(crate) fn persist_transition(
    tx: &Transaction<'_>,
    result: &TransitionResult,
    visit: Option<&VisitEvent>,
) -> Result<i64, PersistenceError> {
    let request: &PassRequest = &result.new_state;
    let cols: RequestColumns = request_columns(request)?;
    let expected_version: i64 = request.row_version;

    let updated: usize = tx.execute(
        "UPDATE requests
             SET reason = ?1, window_json = ?2, start_at = ?3, approval_status = ?4,
                 verification_status = ?5, rejection_reason = ?6, otp_code = ?7,
                 otp_issued_at = ?8, otp_consumed = ?9, qr_token = ?10, qr_generated_at = ?11,
                 outgoing_visits = ?12, incoming_visits = ?13, last_outgoing_scan_at = ?14,
                 is_locked_for_updates = ?15, row_version = row_version + 1
             WHERE public_id = ?16 AND row_version = ?17",
        params![
            request.reason,
            cols.window_json,
            cols.start_at,
            request.approval_status.as_str(),
            request.verification_status.as_str(),
            request.rejection_reason,
            cols.otp_code,
            cols.otp_issued_at,
            request.otp_consumed,
            cols.qr_token,
            cols.qr_generated_at,
            request.outgoing_visits,
            request.incoming_visits,
            cols.last_outgoing_scan_at,
            request.is_locked_for_updates,
            request.public_id,
            expected_version,
        ],
    )?;

    if updated == 0 {
        return Err(PersistenceError::VersionConflict {
            public_id: request.public_id.clone(),
            expected_version,
        });
    }

    if let Some(visit) = visit {
        tx.execute(
            "INSERT INTO visit_events (request_public_id, direction, scanned_at, scanner, location)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                request.public_id,
                visit.direction.as_str(),
                format_instant(visit.scanned_at)?,
                visit.scanner,
                visit.location,
            ],
        )?;
        debug!(
            public_id = %request.public_id,
            direction = visit.direction.as_str(),
            "Appended visit event"
        );
    }

    let event_id: i64 = persist_audit_event(tx, &request.public_id, &result.audit_event)?;
    info!(event_id, public_id = %request.public_id, "Persisted transition");

    Ok(event_id)
}

/// Inserts a freshly submitted bulk outing and its audit event.
///
/// # Errors
///
/// Returns an error if persistence fails.
pub(crate) fn insert_bulk_outing(
    tx: &Transaction<'_>,
    result: &BulkTransitionResult,
) -> Result<i64, PersistenceError> {
    let outing = &result.new_state;

    tx.execute(
        "INSERT INTO bulk_outings (public_id, purpose, window_json, requested_by, status,
                students_json, rejection_reason, decided_at, row_version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            outing.public_id,
            outing.purpose,
            serde_json::to_string(&outing.window)?,
            outing.requested_by,
            outing.status.as_str(),
            outing
                .students
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            outing.rejection_reason,
            outing.decided_at.map(format_instant).transpose()?,
            outing.row_version,
        ],
    )?;
    debug!(public_id = %outing.public_id, "Inserted bulk outing");

    let event_id: i64 = persist_audit_event(tx, &outing.public_id, &result.audit_event)?;
    info!(event_id, public_id = %outing.public_id, "Persisted bulk submission");

    Ok(event_id)
}

/// Persists a decision on an existing bulk outing, guarded by its row
/// version.
///
/// # Errors
///
/// Returns an error if the row version check fails or persistence
/// fails.
pub(crate) fn persist_bulk_transition(
    tx: &Transaction<'_>,
    result: &BulkTransitionResult,
) -> Result<i64, PersistenceError> {
    let outing = &result.new_state;
    let expected_version: i64 = outing.row_version;

    let updated: usize = tx.execute(
        "UPDATE bulk_outings
             SET status = ?1, students_json = ?2, rejection_reason = ?3, decided_at = ?4,
                 row_version = row_version + 1
             WHERE public_id = ?5 AND row_version = ?6",
        params![
            outing.status.as_str(),
            outing
                .students
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            outing.rejection_reason,
            outing.decided_at.map(format_instant).transpose()?,
            outing.public_id,
            expected_version,
        ],
    )?;

    if updated == 0 {
        return Err(PersistenceError::VersionConflict {
            public_id: outing.public_id.clone(),
            expected_version,
        });
    }

    let event_id: i64 = persist_audit_event(tx, &outing.public_id, &result.audit_event)?;
    info!(event_id, public_id = %outing.public_id, "Persisted bulk decision");

    Ok(event_id)
}
