// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request time windows.
//!
//! Leave and Permission requests share one lifecycle but carry
//! different window shapes. All window fields are civil wall-clock
//! values in the configured hostel timezone; no offsets are stored.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};

/// Storage format for civil datetimes (`2026-03-02T09:00:00`).
const CIVIL_DATETIME: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Formats a civil datetime for persistence and API payloads.
#[must_use]
pub fn format_civil(dt: PrimitiveDateTime) -> String {
    dt.format(CIVIL_DATETIME)
        .unwrap_or_else(|_| dt.to_string())
}

/// Parses a civil datetime from its stored representation.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the value does not match
/// the storage format.
pub fn parse_civil(value: &str) -> Result<PrimitiveDateTime, DomainError> {
    PrimitiveDateTime::parse(value, CIVIL_DATETIME).map_err(|e| DomainError::DateParseError {
        value: value.to_string(),
        error: e.to_string(),
    })
}

/// The time window of a request.
///
/// Invariants are enforced at construction: the window end is strictly
/// after its start, and a leave's gate-pass instant lies within the
/// leave span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RequestWindow {
    /// Multi-day leave window.
    Leave {
        /// When the leave begins.
        start_at: PrimitiveDateTime,
        /// When the leave ends. Strictly after `start_at`.
        end_at: PrimitiveDateTime,
        /// When the student is expected to pass the gate.
        gate_pass_at: PrimitiveDateTime,
    },
    /// Same-day permission window.
    Permission {
        /// The calendar day of the permission.
        permission_date: Date,
        /// Time the student leaves. Strictly before `in_time`.
        out_time: Time,
        /// Time the student returns.
        in_time: Time,
    },
}

impl RequestWindow {
    /// Creates a leave window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidWindow` if `end_at` is not strictly
    /// after `start_at`, or if `gate_pass_at` falls outside the span.
    pub fn leave(
        start_at: PrimitiveDateTime,
        end_at: PrimitiveDateTime,
        gate_pass_at: PrimitiveDateTime,
    ) -> Result<Self, DomainError> {
        if end_at <= start_at {
            return Err(DomainError::InvalidWindow {
                reason: format!(
                    "leave end {} must be strictly after start {}",
                    format_civil(end_at),
                    format_civil(start_at)
                ),
            });
        }
        if gate_pass_at < start_at || gate_pass_at > end_at {
            return Err(DomainError::InvalidWindow {
                reason: format!(
                    "gate pass instant {} must lie within the leave span",
                    format_civil(gate_pass_at)
                ),
            });
        }
        Ok(Self::Leave {
            start_at,
            end_at,
            gate_pass_at,
        })
    }

    /// Creates a permission window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidWindow` if `in_time` is not
    /// strictly after `out_time`.
    pub fn permission(
        permission_date: Date,
        out_time: Time,
        in_time: Time,
    ) -> Result<Self, DomainError> {
        if in_time <= out_time {
            return Err(DomainError::InvalidWindow {
                reason: format!("in time {in_time} must be strictly after out time {out_time}"),
            });
        }
        Ok(Self::Permission {
            permission_date,
            out_time,
            in_time,
        })
    }

    /// The instant the absence begins: the gate-pass instant for a
    /// leave, the out time for a permission.
    ///
    /// Classification, urgency, and listing order all key on this
    /// instant.
    #[must_use]
    pub const fn start_instant(&self) -> PrimitiveDateTime {
        match self {
            Self::Leave { gate_pass_at, .. } => *gate_pass_at,
            Self::Permission {
                permission_date,
                out_time,
                ..
            } => PrimitiveDateTime::new(*permission_date, *out_time),
        }
    }

    /// The instant the absence ends.
    #[must_use]
    pub const fn end_instant(&self) -> PrimitiveDateTime {
        match self {
            Self::Leave { end_at, .. } => *end_at,
            Self::Permission {
                permission_date,
                in_time,
                ..
            } => PrimitiveDateTime::new(*permission_date, *in_time),
        }
    }
}
