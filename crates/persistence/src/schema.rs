// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rusqlite::Connection;
use tracing::info;

use crate::error::PersistenceError;

/// Initializes the database schema.
///
/// # Arguments
///
/// * `conn` - The database connection to initialize
///
/// # Errors
///
/// Returns an error if schema creation fails.
pub fn initialize_schema(conn: &Connection) -> Result<(), PersistenceError> {
    info!("Initializing database schema");

    // Enable foreign key enforcement
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute_batch(
        "
        -- Pass requests: one row per leave or permission request.
        -- start_at is denormalized from window_json for listing order.
        CREATE TABLE IF NOT EXISTS requests (
            request_id INTEGER PRIMARY KEY AUTOINCREMENT,
            public_id TEXT NOT NULL UNIQUE,
            student_ref TEXT NOT NULL,
            application_type TEXT NOT NULL CHECK(application_type IN ('leave', 'permission')),
            reason TEXT NOT NULL,
            window_json TEXT NOT NULL,
            start_at TEXT NOT NULL,
            approval_status TEXT NOT NULL
                CHECK(approval_status IN ('pending_otp', 'warden_verified', 'approved', 'rejected')),
            verification_status TEXT NOT NULL
                CHECK(verification_status IN ('not_verified', 'verified', 'completed', 'expired')),
            rejection_reason TEXT,
            otp_code TEXT,
            otp_issued_at TEXT,
            otp_consumed INTEGER NOT NULL DEFAULT 0 CHECK(otp_consumed IN (0, 1)),
            qr_token TEXT,
            qr_generated_at TEXT,
            outgoing_visits INTEGER NOT NULL DEFAULT 0,
            incoming_visits INTEGER NOT NULL DEFAULT 0,
            last_outgoing_scan_at TEXT,
            is_locked_for_updates INTEGER NOT NULL DEFAULT 0 CHECK(is_locked_for_updates IN (0, 1)),
            row_version INTEGER NOT NULL DEFAULT 0,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_requests_student
            ON requests(student_ref);

        CREATE INDEX IF NOT EXISTS idx_requests_start
            ON requests(start_at);

        -- Append-only gate visit ledger.
        CREATE TABLE IF NOT EXISTS visit_events (
            visit_id INTEGER PRIMARY KEY AUTOINCREMENT,
            request_public_id TEXT NOT NULL,
            direction TEXT NOT NULL CHECK(direction IN ('outgoing', 'incoming')),
            scanned_at TEXT NOT NULL,
            scanner TEXT NOT NULL,
            location TEXT NOT NULL,
            FOREIGN KEY(request_public_id) REFERENCES requests(public_id)
        );

        CREATE INDEX IF NOT EXISTS idx_visit_events_request
            ON visit_events(request_public_id, visit_id);

        -- Audit log: one event per successful transition.
        CREATE TABLE IF NOT EXISTS audit_events (
            event_id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_public_id TEXT NOT NULL,
            actor_json TEXT NOT NULL,
            cause_json TEXT NOT NULL,
            action_json TEXT NOT NULL,
            before_snapshot_json TEXT NOT NULL,
            after_snapshot_json TEXT NOT NULL,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_audit_events_subject
            ON audit_events(subject_public_id, event_id);

        -- Bulk outing requests.
        CREATE TABLE IF NOT EXISTS bulk_outings (
            outing_id INTEGER PRIMARY KEY AUTOINCREMENT,
            public_id TEXT NOT NULL UNIQUE,
            purpose TEXT NOT NULL,
            window_json TEXT NOT NULL,
            requested_by TEXT NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('pending', 'approved', 'rejected')),
            students_json TEXT,
            rejection_reason TEXT,
            decided_at TEXT,
            row_version INTEGER NOT NULL DEFAULT 0,
            created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        ",
    )?;

    Ok(())
}

/// Verifies that foreign key enforcement is enabled.
///
/// # Arguments
///
/// * `conn` - The database connection to check
///
/// # Errors
///
/// Returns an error if foreign key enforcement is not enabled.
pub fn verify_foreign_key_enforcement(conn: &Connection) -> Result<(), PersistenceError> {
    let foreign_keys_enabled: i32 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;

    if foreign_keys_enabled == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    info!("Foreign key enforcement is enabled");
    Ok(())
}
