// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Directory service adapter with read-through caching.
//!
//! Student, course, and branch data live in an external directory; the
//! engine stores only opaque references. Stored course/branch fields
//! are a mix of canonical ids, legacy `sql_N` tokens, and display
//! names; [`CourseLabel`] classifies them once and this adapter
//! resolves ids to names, falling back to the raw token whenever the
//! directory cannot answer.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use gate_pass_domain::CourseLabel;
use tracing::warn;

/// A directory lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Directory lookup failed: {0}")]
pub struct DirectoryError(pub String);

/// Student display data owned by the external directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentProfile {
    /// The directory identifier.
    pub student_ref: String,
    /// Display name.
    pub name: String,
    /// Guardian contact for OTP dispatch, if on file.
    pub guardian_contact: Option<String>,
    /// Course field as stored upstream (id, legacy token, or name).
    pub course: String,
    /// Branch field as stored upstream (id, legacy token, or name).
    pub branch: String,
}

/// External directory lookups.
pub trait DirectoryService {
    /// Fetches a student's profile by directory reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be reached.
    fn get_student(&self, student_ref: &str) -> Result<Option<StudentProfile>, DirectoryError>;

    /// Resolves a course id to its display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be reached.
    fn get_course_name(&self, course_id: &str) -> Result<Option<String>, DirectoryError>;

    /// Resolves a branch id to its display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be reached.
    fn get_branch_name(&self, branch_id: &str) -> Result<Option<String>, DirectoryError>;
}

/// Cached name entry with its fetch instant.
struct CachedName {
    value: String,
    fetched_at: Instant,
}

/// Read-through cache over a [`DirectoryService`].
///
/// Resolution never fails: a directory error or an unknown id falls
/// back to the raw stored token so listings keep rendering.
pub struct CachedDirectory<D: DirectoryService> {
    inner: D,
    ttl: Duration,
    courses: HashMap<String, CachedName>,
    branches: HashMap<String, CachedName>,
}

impl<D: DirectoryService> CachedDirectory<D> {
    /// Creates a cache over `inner` whose entries expire after `ttl`.
    #[must_use]
    pub fn new(inner: D, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            courses: HashMap::new(),
            branches: HashMap::new(),
        }
    }

    /// Drops all cached entries so the next lookup refetches.
    pub fn refresh(&mut self) {
        self.courses.clear();
        self.branches.clear();
    }

    /// Fetches a student's profile, passing through to the directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be reached.
    pub fn get_student(
        &self,
        student_ref: &str,
    ) -> Result<Option<StudentProfile>, DirectoryError> {
        self.inner.get_student(student_ref)
    }

    /// Resolves a stored course field to a display string.
    ///
    /// Already-resolved names pass through; ids and legacy tokens are
    /// looked up through the cache and fall back to the raw token.
    pub fn resolve_course(&mut self, raw: &str) -> String {
        let label: CourseLabel = CourseLabel::classify(raw);
        match &label {
            CourseLabel::ResolvedName(name) => name.clone(),
            CourseLabel::RawId(id) | CourseLabel::LegacyId(id) => {
                let id: String = id.clone();
                Self::resolve_cached(&mut self.courses, self.ttl, &label, &id, |key| {
                    self.inner.get_course_name(key)
                })
            }
        }
    }

    /// Resolves a stored branch field to a display string.
    pub fn resolve_branch(&mut self, raw: &str) -> String {
        let label: CourseLabel = CourseLabel::classify(raw);
        match &label {
            CourseLabel::ResolvedName(name) => name.clone(),
            CourseLabel::RawId(id) | CourseLabel::LegacyId(id) => {
                let id: String = id.clone();
                Self::resolve_cached(&mut self.branches, self.ttl, &label, &id, |key| {
                    self.inner.get_branch_name(key)
                })
            }
        }
    }

    fn resolve_cached(
        cache: &mut HashMap<String, CachedName>,
        ttl: Duration,
        label: &CourseLabel,
        id: &str,
        fetch: impl FnOnce(&str) -> Result<Option<String>, DirectoryError>,
    ) -> String {
        if let Some(entry) = cache.get(id)
            && entry.fetched_at.elapsed() < ttl
        {
            return entry.value.clone();
        }

        match fetch(id) {
            Ok(Some(name)) => {
                cache.insert(
                    id.to_string(),
                    CachedName {
                        value: name.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                name
            }
            Ok(None) => label.fallback_display().to_string(),
            Err(e) => {
                warn!("directory lookup for '{id}' failed, using raw token: {e}");
                label.fallback_display().to_string()
            }
        }
    }
}
