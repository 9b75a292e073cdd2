// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the hostel gate pass system.
//!
//! This crate provides `SQLite` persistence for pass requests, the
//! append-only gate visit ledger, audit events, and bulk outings.
//!
//! Concurrency control is optimistic: every mutable row carries a
//! `row_version` column, updates are guarded by the version the
//! transition was derived from, and a lost race surfaces as
//! [`PersistenceError::VersionConflict`] with nothing written. All
//! writes for one transition (row update, ledger append, audit event)
//! commit in a single transaction.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

use rusqlite::Connection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use gate_pass::{BulkOutingRequest, BulkTransitionResult, PassRequest, TransitionResult};
use gate_pass_audit::{AuditEvent, VisitEvent};

mod error;
mod models;
mod mutations;
mod queries;
mod schema;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use models::{FlaggedRow, RequestListing};
pub use schema::{initialize_schema, verify_foreign_key_enforcement};

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for pass requests, the visit ledger, audit
/// events, and bulk outings.
pub struct Persistence {
    conn: Connection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives a unique database instance via atomic
    /// counter, ensuring deterministic test isolation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let conn: Connection = Connection::open(shared_memory_url)
            .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;
        schema::initialize_schema(&conn)?;
        schema::verify_foreign_key_enforcement(&conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or
    /// initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open(path)
            .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

        // WAL mode for better read concurrency
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| PersistenceError::InitializationError(e.to_string()))?;

        schema::initialize_schema(&conn)?;
        schema::verify_foreign_key_enforcement(&conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Request Mutations
    // ========================================================================

    /// Persists a freshly submitted request and its audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn insert_request(&mut self, result: &TransitionResult) -> Result<i64, PersistenceError> {
        let tx = self.conn.transaction()?;
        let event_id: i64 = mutations::insert_request(&tx, result)?;
        tx.commit()?;
        Ok(event_id)
    }

    /// Persists a transition on an existing request.
    ///
    /// The row update, the optional visit ledger append, and the audit
    /// event commit atomically; a version conflict aborts all three.
    ///
    /// # Arguments
    ///
    /// * `result` - The transition result to persist
    /// * `visit` - The gate visit to append, for scan transitions
    ///
    /// # Errors
    ///
    /// Returns `VersionConflict` if a concurrent writer committed
    /// first, or another error if persistence fails.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
        visit: Option<&VisitEvent>,
    ) -> Result<i64, PersistenceError> {
        let tx = self.conn.transaction()?;
        let event_id: i64 = mutations::persist_transition(&tx, result, visit)?;
        tx.commit()?;
        Ok(event_id)
    }

    // ========================================================================
    // Request Queries
    // ========================================================================

    /// Retrieves a request by its public id.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` if no such request exists.
    pub fn get_request(&self, public_id: &str) -> Result<PassRequest, PersistenceError> {
        queries::get_request(&self.conn, public_id)
    }

    /// Lists all requests ordered by their start instant.
    ///
    /// Rows whose stored data cannot be reconstructed do not fail the
    /// listing; they are returned in the flagged bucket alongside the
    /// readable requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_requests(&self) -> Result<RequestListing, PersistenceError> {
        queries::list_requests(&self.conn)
    }

    /// Lists all requests belonging to one student, newest start
    /// first. Unreadable rows land in the flagged bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_requests_for_student(
        &self,
        student_ref: &str,
    ) -> Result<RequestListing, PersistenceError> {
        queries::list_requests_for_student(&self.conn, student_ref)
    }

    /// Retrieves the visit ledger for a request, in scan order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn get_visit_events(&self, public_id: &str) -> Result<Vec<VisitEvent>, PersistenceError> {
        queries::get_visit_events(&self.conn, public_id)
    }

    /// Retrieves the audit trail for a request or outing, oldest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn get_audit_trail(
        &self,
        subject_public_id: &str,
    ) -> Result<Vec<(i64, AuditEvent)>, PersistenceError> {
        queries::get_audit_trail(&self.conn, subject_public_id)
    }

    // ========================================================================
    // Bulk Outings
    // ========================================================================

    /// Persists a freshly submitted bulk outing and its audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn insert_bulk_outing(
        &mut self,
        result: &BulkTransitionResult,
    ) -> Result<i64, PersistenceError> {
        let tx = self.conn.transaction()?;
        let event_id: i64 = mutations::insert_bulk_outing(&tx, result)?;
        tx.commit()?;
        Ok(event_id)
    }

    /// Persists a decision on an existing bulk outing.
    ///
    /// # Errors
    ///
    /// Returns `VersionConflict` if a concurrent writer committed
    /// first, or another error if persistence fails.
    pub fn persist_bulk_transition(
        &mut self,
        result: &BulkTransitionResult,
    ) -> Result<i64, PersistenceError> {
        let tx = self.conn.transaction()?;
        let event_id: i64 = mutations::persist_bulk_transition(&tx, result)?;
        tx.commit()?;
        Ok(event_id)
    }

    /// Retrieves a bulk outing by its public id.
    ///
    /// # Errors
    ///
    /// Returns `BulkOutingNotFound` if no such outing exists.
    pub fn get_bulk_outing(&self, public_id: &str) -> Result<BulkOutingRequest, PersistenceError> {
        queries::get_bulk_outing(&self.conn, public_id)
    }

    /// Lists all bulk outings, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_bulk_outings(&self) -> Result<Vec<BulkOutingRequest>, PersistenceError> {
        queries::list_bulk_outings(&self.conn)
    }
}
