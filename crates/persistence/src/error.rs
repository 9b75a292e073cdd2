// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested pass request was not found.
    RequestNotFound(String),
    /// The requested bulk outing was not found.
    BulkOutingNotFound(String),
    /// The requested audit event was not found.
    EventNotFound(i64),
    /// A concurrent writer updated the row first.
    VersionConflict {
        /// The public id of the contested row.
        public_id: String,
        /// The row version the writer expected.
        expected_version: i64,
    },
    /// A stored value could not be reconstructed into a domain type.
    ReconstructionError(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::RequestNotFound(id) => write!(f, "Request not found: {id}"),
            Self::BulkOutingNotFound(id) => write!(f, "Bulk outing not found: {id}"),
            Self::EventNotFound(id) => write!(f, "Event not found: {id}"),
            Self::VersionConflict {
                public_id,
                expected_version,
            } => {
                write!(
                    f,
                    "Version conflict on {public_id}: expected row_version {expected_version}"
                )
            }
            Self::ReconstructionError(msg) => write!(f, "State reconstruction error: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => {
                Self::QueryFailed("Record not found".to_string())
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
