// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk outing submission and decision flow through the API layer.

use gate_pass_persistence::Persistence;
use time::macros::datetime;

use crate::error::ErrorKind;
use crate::handlers::{
    decide_bulk_outing, get_bulk_outing, get_bulk_outing_students, list_bulk_outings,
    submit_bulk_outing,
};
use crate::request_response::{BulkOutingView, DecideBulkOutingRequest, SubmitBulkOutingRequest};

use super::helpers::{full_operator, permission_payload, test_cause};

fn submit_outing(persistence: &mut Persistence, public_id: &str) -> BulkOutingView {
    submit_bulk_outing(
        persistence,
        SubmitBulkOutingRequest {
            public_id: public_id.to_string(),
            purpose: String::from("Inter-hostel cricket tournament"),
            requested_by: String::from("warden-7"),
            window: permission_payload(),
        },
        &full_operator(),
        test_cause(),
    )
    .unwrap()
}

fn approve(students: Vec<&str>) -> DecideBulkOutingRequest {
    DecideBulkOutingRequest {
        decision: String::from("approve"),
        reason: None,
        students: Some(students.into_iter().map(String::from).collect()),
    }
}

#[test]
fn test_submitted_outing_is_pending_with_empty_roster() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let view = submit_outing(&mut persistence, "out-1");

    assert_eq!(view.status, "pending");
    assert_eq!(view.student_count, 0);
    assert!(view.decided_at.is_none());
    assert_eq!(view.row_version, 0);

    let students = get_bulk_outing_students(&persistence, "out-1", &full_operator()).unwrap();
    assert!(students.students.is_empty());
}

#[test]
fn test_approval_snapshots_the_roster() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    submit_outing(&mut persistence, "out-1");

    let view = decide_bulk_outing(
        &mut persistence,
        "out-1",
        approve(vec!["stu-1042", "stu-1043"]),
        &full_operator(),
        test_cause(),
        datetime!(2026-03-01 15:00 UTC),
    )
    .unwrap();

    assert_eq!(view.status, "approved");
    assert_eq!(view.student_count, 2);
    assert!(view.decided_at.is_some());
    assert_eq!(view.row_version, 1);

    let students = get_bulk_outing_students(&persistence, "out-1", &full_operator()).unwrap();
    assert_eq!(students.students, vec!["stu-1042", "stu-1043"]);
}

#[test]
fn test_approval_without_roster_is_a_validation_error() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    submit_outing(&mut persistence, "out-1");

    let err = decide_bulk_outing(
        &mut persistence,
        "out-1",
        DecideBulkOutingRequest {
            decision: String::from("approve"),
            reason: None,
            students: None,
        },
        &full_operator(),
        test_cause(),
        datetime!(2026-03-01 15:00 UTC),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);
}

#[test]
fn test_rejection_requires_a_reason() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    submit_outing(&mut persistence, "out-1");

    let err = decide_bulk_outing(
        &mut persistence,
        "out-1",
        DecideBulkOutingRequest {
            decision: String::from("reject"),
            reason: None,
            students: None,
        },
        &full_operator(),
        test_cause(),
        datetime!(2026-03-01 15:00 UTC),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);
}

#[test]
fn test_rejection_records_the_reason() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    submit_outing(&mut persistence, "out-1");

    let view = decide_bulk_outing(
        &mut persistence,
        "out-1",
        DecideBulkOutingRequest {
            decision: String::from("reject"),
            reason: Some(String::from("Clashes with mid-term examinations")),
            students: None,
        },
        &full_operator(),
        test_cause(),
        datetime!(2026-03-01 15:00 UTC),
    )
    .unwrap();

    assert_eq!(view.status, "rejected");
    assert_eq!(
        view.rejection_reason.as_deref(),
        Some("Clashes with mid-term examinations")
    );
    assert_eq!(view.student_count, 0);
}

#[test]
fn test_decision_is_final() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    submit_outing(&mut persistence, "out-1");
    decide_bulk_outing(
        &mut persistence,
        "out-1",
        approve(vec!["stu-1042"]),
        &full_operator(),
        test_cause(),
        datetime!(2026-03-01 15:00 UTC),
    )
    .unwrap();

    let err = decide_bulk_outing(
        &mut persistence,
        "out-1",
        DecideBulkOutingRequest {
            decision: String::from("reject"),
            reason: Some(String::from("Changed plans")),
            students: None,
        },
        &full_operator(),
        test_cause(),
        datetime!(2026-03-01 16:00 UTC),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidStateTransition);

    let view = get_bulk_outing(&persistence, "out-1", &full_operator()).unwrap();
    assert_eq!(view.status, "approved");
}

#[test]
fn test_unknown_decision_verb_is_rejected() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    submit_outing(&mut persistence, "out-1");

    let err = decide_bulk_outing(
        &mut persistence,
        "out-1",
        DecideBulkOutingRequest {
            decision: String::from("defer"),
            reason: None,
            students: None,
        },
        &full_operator(),
        test_cause(),
        datetime!(2026-03-01 15:00 UTC),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationError);
}

#[test]
fn test_unknown_outing_maps_to_not_found() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    let err = decide_bulk_outing(
        &mut persistence,
        "out-404",
        approve(vec!["stu-1042"]),
        &full_operator(),
        test_cause(),
        datetime!(2026-03-01 15:00 UTC),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_listing_returns_every_outing() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    submit_outing(&mut persistence, "out-1");
    submit_outing(&mut persistence, "out-2");

    let outings = list_bulk_outings(&persistence, &full_operator()).unwrap();
    assert_eq!(outings.len(), 2);
}
