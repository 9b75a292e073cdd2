// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::Duration;

/// Reference to a student owned by the external directory service.
///
/// The lifecycle engine never owns student data; it holds only this
/// opaque reference and resolves display fields at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentRef {
    /// The directory identifier for the student.
    value: String,
}

impl StudentRef {
    /// Creates a new `StudentRef`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStudentRef` if the identifier is
    /// empty or whitespace.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidStudentRef(String::from(
                "identifier cannot be empty",
            )));
        }
        Ok(Self {
            value: trimmed.to_string(),
        })
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for StudentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A course or branch field as stored upstream.
///
/// Upstream records carry a mix of canonical ids, legacy `sql_N`
/// tokens, and already-resolved display names. The label is classified
/// once here and resolved at the directory-service boundary, never
/// re-interpreted ad hoc at call sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CourseLabel {
    /// A canonical directory id that still needs resolution.
    RawId(String),
    /// A legacy `sql_N` token from the pre-migration schema.
    LegacyId(String),
    /// A display name that needs no further resolution.
    ResolvedName(String),
}

impl CourseLabel {
    /// Classifies a stored course/branch field.
    ///
    /// Numeric values and 24-hex-character values are treated as
    /// directory ids; `sql_N` tokens as legacy ids; anything else as an
    /// already-resolved display name.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let trimmed: &str = raw.trim();
        if trimmed.starts_with("sql_") {
            return Self::LegacyId(trimmed.to_string());
        }
        let looks_like_id: bool = !trimmed.is_empty()
            && (trimmed.chars().all(|c| c.is_ascii_digit())
                || (trimmed.len() == 24 && trimmed.chars().all(|c| c.is_ascii_hexdigit())));
        if looks_like_id {
            Self::RawId(trimmed.to_string())
        } else {
            Self::ResolvedName(trimmed.to_string())
        }
    }

    /// Returns the display value to use when resolution fails or is
    /// unnecessary: the resolved name, or the raw token as a fallback.
    #[must_use]
    pub fn fallback_display(&self) -> &str {
        match self {
            Self::RawId(v) | Self::LegacyId(v) | Self::ResolvedName(v) => v,
        }
    }
}

/// Engine configuration for gate verification and classification.
///
/// Defaults mirror the deployed hostel policy: two outgoing scans, one
/// incoming scan, a 60 second duplicate-scan debounce, a 24 hour
/// incoming-QR validity window, and the IST civil calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Maximum outgoing gate scans per request.
    pub max_outgoing_visits: u32,
    /// Maximum incoming gate scans per request.
    pub max_incoming_visits: u32,
    /// Repeat outgoing scans within this interval are rejected as
    /// duplicates.
    pub scan_debounce: Duration,
    /// Validity window of the incoming-QR token, measured from the
    /// moment outgoing verification is recorded.
    pub incoming_qr_window: Duration,
    /// IANA timezone used for civil-day classification.
    pub timezone: String,
}

impl GateConfig {
    /// Creates a configuration, validating ceilings and timezone.
    ///
    /// # Errors
    ///
    /// Returns an error if either visit ceiling is zero or the timezone
    /// is not a recognized IANA identifier.
    pub fn new(
        max_outgoing_visits: u32,
        max_incoming_visits: u32,
        scan_debounce: Duration,
        incoming_qr_window: Duration,
        timezone: &str,
    ) -> Result<Self, DomainError> {
        if max_outgoing_visits == 0 {
            return Err(DomainError::InvalidVisitCeiling {
                count: max_outgoing_visits,
            });
        }
        if max_incoming_visits == 0 {
            return Err(DomainError::InvalidVisitCeiling {
                count: max_incoming_visits,
            });
        }
        if timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(DomainError::InvalidTimezone(timezone.to_string()));
        }
        Ok(Self {
            max_outgoing_visits,
            max_incoming_visits,
            scan_debounce,
            incoming_qr_window,
            timezone: timezone.to_string(),
        })
    }

    /// Returns the parsed timezone.
    ///
    /// The timezone string is validated at construction, so this cannot
    /// fail for a config built through [`GateConfig::new`] or
    /// [`GateConfig::default`].
    #[must_use]
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone
            .parse()
            .unwrap_or(chrono_tz::Tz::Asia__Kolkata)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            max_outgoing_visits: 2,
            max_incoming_visits: 1,
            scan_debounce: Duration::seconds(60),
            incoming_qr_window: Duration::hours(24),
            timezone: String::from("Asia/Kolkata"),
        }
    }
}
