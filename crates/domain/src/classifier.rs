// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Temporal classification of requests for display bucketing.
//!
//! Classification is a pure function of `(now, start instant)` in a
//! declared timezone. Comparisons use the civil calendar day only;
//! time-of-day never changes a bucket, so listings do not flicker
//! across day boundaries.
//!
//! ## Invariants
//!
//! - Classification is recomputed per read and never stored.
//! - A malformed stored date classifies as `NeedsReview`; the listing
//!   must keep rendering.
//! - Urgency and overdue flags are display-only and never drive a
//!   state transition.

use crate::window::parse_civil;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use time::{OffsetDateTime, PrimitiveDateTime};

/// How far in the future a start instant counts as urgent.
const URGENT_LEAD_SECONDS: i64 = 30 * 60;

/// Display bucket for a request, derived from its start instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucket {
    /// Start instant falls on the current civil day.
    Today,
    /// Start instant fell on the previous civil day.
    Yesterday,
    /// Start instant falls on a future civil day.
    Upcoming,
    /// Start instant fell two or more civil days ago.
    RecentExpired,
    /// Stored window data is malformed; flagged for manual review.
    NeedsReview,
}

impl TimeBucket {
    /// Returns the string representation used in API payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::Upcoming => "upcoming",
            Self::RecentExpired => "recent_expired",
            Self::NeedsReview => "needs_review",
        }
    }
}

/// Converts `now` (an absolute instant) to a civil date in the
/// declared timezone.
fn civil_today(now: OffsetDateTime, tz: Tz) -> NaiveDate {
    let utc = Utc
        .timestamp_opt(now.unix_timestamp(), 0)
        .single()
        .unwrap_or_default();
    utc.with_timezone(&tz).date_naive()
}

/// Converts a civil wall-clock datetime to a chrono `NaiveDateTime`.
fn to_naive(start: PrimitiveDateTime) -> Option<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(
        start.year(),
        u32::from(u8::from(start.month())),
        u32::from(start.day()),
    )?;
    let time = NaiveTime::from_hms_opt(
        u32::from(start.hour()),
        u32::from(start.minute()),
        u32::from(start.second()),
    )?;
    Some(date.and_time(time))
}

/// Classifies a start instant into a display bucket.
///
/// The start instant is a civil wall-clock value in the declared
/// timezone; only its calendar date participates in the comparison.
#[must_use]
pub fn classify(now: OffsetDateTime, start: PrimitiveDateTime, tz: Tz) -> TimeBucket {
    let Some(start_naive) = to_naive(start) else {
        return TimeBucket::NeedsReview;
    };
    let today: NaiveDate = civil_today(now, tz);
    let delta_days: i64 = (start_naive.date() - today).num_days();

    match delta_days {
        0 => TimeBucket::Today,
        -1 => TimeBucket::Yesterday,
        d if d > 0 => TimeBucket::Upcoming,
        _ => TimeBucket::RecentExpired,
    }
}

/// Classifies a stored start instant, tolerating malformed data.
///
/// An unparseable value classifies as `NeedsReview` rather than
/// failing the listing.
#[must_use]
pub fn classify_stored(now: OffsetDateTime, stored_start: &str, tz: Tz) -> TimeBucket {
    match parse_civil(stored_start) {
        Ok(start) => classify(now, start, tz),
        Err(_) => TimeBucket::NeedsReview,
    }
}

/// Converts a civil start instant to an absolute Unix timestamp.
///
/// DST gaps resolve to the earliest valid instant; an unresolvable
/// instant yields `None` and the caller treats the flag as unset.
fn start_timestamp(start: PrimitiveDateTime, tz: Tz) -> Option<i64> {
    let naive: NaiveDateTime = to_naive(start)?;
    let resolved = tz
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&naive).latest())?;
    Some(resolved.timestamp())
}

/// Returns true if an unverified request starts within the next 30
/// minutes. Display prioritization only.
#[must_use]
pub fn is_urgent(now: OffsetDateTime, start: PrimitiveDateTime, tz: Tz, verified: bool) -> bool {
    if verified {
        return false;
    }
    let Some(start_ts) = start_timestamp(start, tz) else {
        return false;
    };
    let lead: i64 = start_ts - now.unix_timestamp();
    (0..=URGENT_LEAD_SECONDS).contains(&lead)
}

/// Returns true if an unverified request's start instant is already in
/// the past. Display prioritization only.
#[must_use]
pub fn is_overdue(now: OffsetDateTime, start: PrimitiveDateTime, tz: Tz, verified: bool) -> bool {
    if verified {
        return false;
    }
    let Some(start_ts) = start_timestamp(start, tz) else {
        return false;
    };
    start_ts < now.unix_timestamp()
}

/// Sort key for request listings.
///
/// Order: today's items first, then unverified before verified, then
/// earliest start instant first. Malformed starts (`None`) sort last
/// within their group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingKey {
    /// Whether the request classifies as `Today`.
    pub is_today: bool,
    /// Whether gate verification has progressed past `NotVerified`.
    pub is_verified: bool,
    /// The parsed start instant, if the stored value was well-formed.
    pub start: Option<PrimitiveDateTime>,
}

impl ListingKey {
    /// Compares two listing keys per the display ordering contract.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        // today first
        other
            .is_today
            .cmp(&self.is_today)
            // unverified before verified
            .then_with(|| self.is_verified.cmp(&other.is_verified))
            // earliest start first; malformed starts last
            .then_with(|| match (self.start, other.start) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    }
}
