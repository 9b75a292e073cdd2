// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bucketed, sorted request listings through the API layer.

use std::cmp::Ordering;

use gate_pass_domain::GateConfig;
use gate_pass_persistence::{FlaggedRow, Persistence};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::handlers::{flagged_row_entry, list_requests, record_outgoing_visit, submit_request};
use crate::request_response::{
    OutgoingScanRequest, RequestSummary, SubmitRequestRequest, WindowPayload,
};

use super::helpers::{approve_leave, full_operator, submit_leave, test_cause};

/// 2026-03-02 12:00 IST expressed as a UTC instant.
fn noon_ist_march_2() -> OffsetDateTime {
    datetime!(2026-03-02 06:30 UTC)
}

fn submit_custom_leave(
    persistence: &mut Persistence,
    public_id: &str,
    start_at: &str,
    end_at: &str,
    gate_pass_at: &str,
) {
    submit_request(
        persistence,
        SubmitRequestRequest {
            public_id: public_id.to_string(),
            student_ref: String::from("stu-1042"),
            application_type: String::from("leave"),
            reason: String::from("Family function at home"),
            window: WindowPayload::Leave {
                start_at: start_at.to_string(),
                end_at: end_at.to_string(),
                gate_pass_at: gate_pass_at.to_string(),
            },
        },
        &full_operator(),
        test_cause(),
    )
    .unwrap();
}

fn find<'a>(rows: &'a [RequestSummary], public_id: &str) -> &'a RequestSummary {
    rows.iter()
        .find(|summary| summary.public_id == public_id)
        .unwrap()
}

#[test]
fn test_listing_buckets_by_civil_day() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let config = GateConfig::default();
    submit_custom_leave(
        &mut persistence,
        "req-today",
        "2026-03-02T09:00:00",
        "2026-03-02T18:00:00",
        "2026-03-02T09:30:00",
    );
    submit_custom_leave(
        &mut persistence,
        "req-yesterday",
        "2026-03-01T10:00:00",
        "2026-03-01T18:00:00",
        "2026-03-01T10:30:00",
    );
    submit_custom_leave(
        &mut persistence,
        "req-upcoming",
        "2026-03-10T09:00:00",
        "2026-03-10T18:00:00",
        "2026-03-10T09:30:00",
    );
    submit_custom_leave(
        &mut persistence,
        "req-old",
        "2026-02-20T09:00:00",
        "2026-02-20T18:00:00",
        "2026-02-20T09:30:00",
    );

    let rows =
        list_requests(&persistence, &config, &full_operator(), noon_ist_march_2()).unwrap();

    assert_eq!(rows.len(), 4);
    assert_eq!(find(&rows, "req-today").bucket, "today");
    assert_eq!(find(&rows, "req-yesterday").bucket, "yesterday");
    assert_eq!(find(&rows, "req-upcoming").bucket, "upcoming");
    assert_eq!(find(&rows, "req-old").bucket, "recent_expired");
}

#[test]
fn test_listing_orders_today_first_then_unverified_then_start() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let config = GateConfig::default();

    // Today, verified at the gate this morning.
    submit_leave(&mut persistence, "req-verified");
    approve_leave(&mut persistence, "req-verified");
    record_outgoing_visit(
        &mut persistence,
        "req-verified",
        OutgoingScanRequest {
            scanner: String::from("guard-station-1"),
            location: String::from("Main Gate"),
        },
        &config,
        &full_operator(),
        test_cause(),
        datetime!(2026-03-02 04:00 UTC),
    )
    .unwrap();

    // Today, still unverified, starting later than the verified one.
    submit_custom_leave(
        &mut persistence,
        "req-late",
        "2026-03-02T15:00:00",
        "2026-03-02T20:00:00",
        "2026-03-02T15:30:00",
    );
    submit_custom_leave(
        &mut persistence,
        "req-yesterday",
        "2026-03-01T10:00:00",
        "2026-03-01T18:00:00",
        "2026-03-01T10:30:00",
    );
    submit_custom_leave(
        &mut persistence,
        "req-upcoming",
        "2026-03-10T09:00:00",
        "2026-03-10T18:00:00",
        "2026-03-10T09:30:00",
    );

    let rows =
        list_requests(&persistence, &config, &full_operator(), noon_ist_march_2()).unwrap();

    let order: Vec<&str> = rows.iter().map(|s| s.public_id.as_str()).collect();
    assert_eq!(
        order,
        vec!["req-late", "req-verified", "req-yesterday", "req-upcoming"]
    );
}

#[test]
fn test_urgency_and_overdue_flags() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let config = GateConfig::default();

    // Leaves at 12:15 IST; now is noon IST.
    submit_request(
        &mut persistence,
        SubmitRequestRequest {
            public_id: String::from("req-soon"),
            student_ref: String::from("stu-1043"),
            application_type: String::from("permission"),
            reason: String::from("Library visit in town"),
            window: WindowPayload::Permission {
                permission_date: String::from("2026-03-02"),
                out_time: String::from("12:15:00"),
                in_time: String::from("17:00:00"),
            },
        },
        &full_operator(),
        test_cause(),
    )
    .unwrap();
    submit_leave(&mut persistence, "req-past");
    submit_custom_leave(
        &mut persistence,
        "req-upcoming",
        "2026-03-10T09:00:00",
        "2026-03-10T18:00:00",
        "2026-03-10T09:30:00",
    );

    let rows =
        list_requests(&persistence, &config, &full_operator(), noon_ist_march_2()).unwrap();

    let soon = find(&rows, "req-soon");
    assert!(soon.urgent);
    assert!(!soon.overdue);

    let past = find(&rows, "req-past");
    assert!(past.overdue);
    assert!(!past.urgent);

    let upcoming = find(&rows, "req-upcoming");
    assert!(!upcoming.urgent);
    assert!(!upcoming.overdue);
}

#[test]
fn test_unreadable_rows_surface_in_the_needs_review_bucket() {
    let row = FlaggedRow {
        public_id: String::from("req-damaged"),
        student_ref: String::from("stu-1042"),
        application_type: String::from("leave"),
        start_at: String::from("2026-03-02T09:30:00"),
        approval_status: String::from("approved"),
        verification_status: String::from("verified"),
        error: String::from("invalid window data"),
    };

    let (key, summary) = flagged_row_entry(&row);
    assert_eq!(summary.bucket, "needs_review");
    assert_eq!(summary.public_id, "req-damaged");
    assert!(!summary.urgent);
    assert!(!summary.overdue);
    assert!(!key.is_today);
    assert!(key.start.is_some());

    // A row whose stored start is also garbage sorts after one that
    // still has a readable start.
    let garbled = FlaggedRow {
        start_at: String::from("not-a-date"),
        ..row
    };
    let (garbled_key, _) = flagged_row_entry(&garbled);
    assert!(garbled_key.start.is_none());
    assert_eq!(key.compare(&garbled_key), Ordering::Less);
}

#[test]
fn test_verified_rows_carry_no_display_flags() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let config = GateConfig::default();
    submit_leave(&mut persistence, "req-1");
    approve_leave(&mut persistence, "req-1");
    record_outgoing_visit(
        &mut persistence,
        "req-1",
        OutgoingScanRequest {
            scanner: String::from("guard-station-1"),
            location: String::from("Main Gate"),
        },
        &config,
        &full_operator(),
        test_cause(),
        datetime!(2026-03-02 04:00 UTC),
    )
    .unwrap();

    let rows =
        list_requests(&persistence, &config, &full_operator(), noon_ist_march_2()).unwrap();
    let row = find(&rows, "req-1");

    assert_eq!(row.verification_status, "verified");
    assert!(!row.urgent);
    assert!(!row.overdue);
}
