// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rusqlite::{Connection, Result as SqliteResult, Row, params};
use tracing::warn;

use gate_pass::{BulkOutingRequest, PassRequest};
use gate_pass_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot, VisitDirection, VisitEvent};

use crate::error::PersistenceError;
use crate::models::{
    ActionData, ActorData, BulkOutingRow, CauseData, FlaggedRow, RequestListing, RequestRow,
    SnapshotData, parse_instant,
};

const REQUEST_COLUMNS: &str = "public_id, student_ref, application_type, reason, window_json,
        start_at, approval_status, verification_status, rejection_reason, otp_code, otp_issued_at,
        otp_consumed, qr_token, qr_generated_at, outgoing_visits, incoming_visits,
        last_outgoing_scan_at, is_locked_for_updates, row_version";

fn read_request_row(row: &Row<'_>) -> SqliteResult<RequestRow> {
    Ok(RequestRow {
        public_id: row.get(0)?,
        student_ref: row.get(1)?,
        application_type: row.get(2)?,
        reason: row.get(3)?,
        window_json: row.get(4)?,
        start_at: row.get(5)?,
        approval_status: row.get(6)?,
        verification_status: row.get(7)?,
        rejection_reason: row.get(8)?,
        otp_code: row.get(9)?,
        otp_issued_at: row.get(10)?,
        otp_consumed: row.get(11)?,
        qr_token: row.get(12)?,
        qr_generated_at: row.get(13)?,
        outgoing_visits: row.get(14)?,
        incoming_visits: row.get(15)?,
        last_outgoing_scan_at: row.get(16)?,
        is_locked_for_updates: row.get(17)?,
        row_version: row.get(18)?,
    })
}

/// Retrieves a request by its public id.
///
/// # Errors
///
/// Returns `RequestNotFound` if no such request exists, or a
/// reconstruction error if stored data is malformed.
pub(crate) fn get_request(
    conn: &Connection,
    public_id: &str,
) -> Result<PassRequest, PersistenceError> {
    let row_result: SqliteResult<RequestRow> = conn.query_row(
        &format!("SELECT {REQUEST_COLUMNS} FROM requests WHERE public_id = ?1"),
        params![public_id],
        read_request_row,
    );

    match row_result {
        Ok(row) => row.into_request(),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(PersistenceError::RequestNotFound(public_id.to_string()))
        }
        Err(e) => Err(PersistenceError::DatabaseError(e.to_string())),
    }
}

/// Collects reconstructed requests, flagging rows whose stored data is
/// malformed instead of failing the whole listing.
fn collect_listing(
    rows: impl Iterator<Item = SqliteResult<RequestRow>>,
) -> Result<RequestListing, PersistenceError> {
    let mut listing: RequestListing = RequestListing::default();
    for row_result in rows {
        let row: RequestRow = row_result?;
        let identity: FlaggedRow = row.identity();
        match row.into_request() {
            Ok(request) => listing.requests.push(request),
            Err(e) => {
                warn!(
                    public_id = %identity.public_id,
                    error = %e,
                    "Flagging unreadable request row in listing"
                );
                listing.flagged.push(FlaggedRow {
                    error: e.to_string(),
                    ..identity
                });
            }
        }
    }
    Ok(listing)
}

/// Lists all requests ordered by their start instant.
///
/// Display ordering (today first, unverified first) is computed by the
/// caller, which knows the current time and timezone. Rows whose
/// stored data cannot be reconstructed land in the flagged bucket.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub(crate) fn list_requests(conn: &Connection) -> Result<RequestListing, PersistenceError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REQUEST_COLUMNS} FROM requests ORDER BY start_at ASC, request_id ASC"
    ))?;

    let rows = stmt.query_map([], read_request_row)?;
    collect_listing(rows)
}

/// Lists all requests belonging to one student, newest start first.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub(crate) fn list_requests_for_student(
    conn: &Connection,
    student_ref: &str,
) -> Result<RequestListing, PersistenceError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REQUEST_COLUMNS} FROM requests
             WHERE student_ref = ?1
             ORDER BY start_at DESC, request_id DESC"
    ))?;

    let rows = stmt.query_map(params![student_ref], read_request_row)?;
    collect_listing(rows)
}

/// Retrieves the visit ledger for a request, in scan order.
///
/// # Errors
///
/// Returns an error if the database cannot be queried or stored data
/// is malformed.
pub(crate) fn get_visit_events(
    conn: &Connection,
    public_id: &str,
) -> Result<Vec<VisitEvent>, PersistenceError> {
    let mut stmt = conn.prepare(
        "SELECT direction, scanned_at, scanner, location
             FROM visit_events
             WHERE request_public_id = ?1
             ORDER BY visit_id ASC",
    )?;

    let rows = stmt.query_map(params![public_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut events: Vec<VisitEvent> = Vec::new();
    for row_result in rows {
        let (direction, scanned_at, scanner, location) = row_result?;
        let direction: VisitDirection = VisitDirection::parse_str(&direction)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        let event: VisitEvent =
            VisitEvent::new(direction, parse_instant(&scanned_at)?, &scanner, &location)
                .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
        events.push(event);
    }
    Ok(events)
}

/// Retrieves the audit trail for a request or outing, oldest first.
///
/// # Errors
///
/// Returns an error if the database cannot be queried or stored data
/// is malformed.
pub(crate) fn get_audit_trail(
    conn: &Connection,
    subject_public_id: &str,
) -> Result<Vec<(i64, AuditEvent)>, PersistenceError> {
    let mut stmt = conn.prepare(
        "SELECT event_id, actor_json, cause_json, action_json,
                before_snapshot_json, after_snapshot_json
             FROM audit_events
             WHERE subject_public_id = ?1
             ORDER BY event_id ASC",
    )?;

    let rows = stmt.query_map(params![subject_public_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut events: Vec<(i64, AuditEvent)> = Vec::new();
    for row_result in rows {
        let (event_id, actor_json, cause_json, action_json, before_json, after_json) = row_result?;
        let actor_data: ActorData = serde_json::from_str(&actor_json)?;
        let cause_data: CauseData = serde_json::from_str(&cause_json)?;
        let action_data: ActionData = serde_json::from_str(&action_json)?;
        let before_data: SnapshotData = serde_json::from_str(&before_json)?;
        let after_data: SnapshotData = serde_json::from_str(&after_json)?;

        events.push((
            event_id,
            AuditEvent::new(
                Actor::new(actor_data.id, actor_data.actor_type),
                Cause::new(cause_data.id, cause_data.description),
                Action::new(action_data.name, action_data.details),
                StateSnapshot::new(before_data.data),
                StateSnapshot::new(after_data.data),
            ),
        ));
    }
    Ok(events)
}

/// Retrieves a bulk outing by its public id.
///
/// # Errors
///
/// Returns `BulkOutingNotFound` if no such outing exists.
pub(crate) fn get_bulk_outing(
    conn: &Connection,
    public_id: &str,
) -> Result<BulkOutingRequest, PersistenceError> {
    let row_result: SqliteResult<BulkOutingRow> = conn.query_row(
        "SELECT public_id, purpose, window_json, requested_by, status, students_json,
                rejection_reason, decided_at, row_version
             FROM bulk_outings
             WHERE public_id = ?1",
        params![public_id],
        |row| {
            Ok(BulkOutingRow {
                public_id: row.get(0)?,
                purpose: row.get(1)?,
                window_json: row.get(2)?,
                requested_by: row.get(3)?,
                status: row.get(4)?,
                students_json: row.get(5)?,
                rejection_reason: row.get(6)?,
                decided_at: row.get(7)?,
                row_version: row.get(8)?,
            })
        },
    );

    match row_result {
        Ok(row) => row.into_outing(),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(PersistenceError::BulkOutingNotFound(public_id.to_string()))
        }
        Err(e) => Err(PersistenceError::DatabaseError(e.to_string())),
    }
}

/// Lists all bulk outings, newest first.
///
/// # Errors
///
/// Returns an error if the database cannot be queried or stored data
/// is malformed.
pub(crate) fn list_bulk_outings(
    conn: &Connection,
) -> Result<Vec<BulkOutingRequest>, PersistenceError> {
    let mut stmt = conn.prepare(
        "SELECT public_id, purpose, window_json, requested_by, status, students_json,
                rejection_reason, decided_at, row_version
             FROM bulk_outings
             ORDER BY outing_id DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(BulkOutingRow {
            public_id: row.get(0)?,
            purpose: row.get(1)?,
            window_json: row.get(2)?,
            requested_by: row.get(3)?,
            status: row.get(4)?,
            students_json: row.get(5)?,
            rejection_reason: row.get(6)?,
            decided_at: row.get(7)?,
            row_version: row.get(8)?,
        })
    })?;

    let mut outings: Vec<BulkOutingRequest> = Vec::new();
    for row_result in rows {
        outings.push(row_result?.into_outing()?);
    }
    Ok(outings)
}
