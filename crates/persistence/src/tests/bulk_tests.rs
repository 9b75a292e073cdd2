// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence tests for bulk outing requests.

use crate::{Persistence, PersistenceError};
use gate_pass::{BulkCommand, BulkTransitionResult, apply_bulk, apply_submit_bulk};
use gate_pass_domain::{BulkOutingStatus, StudentRef};
use time::macros::datetime;

use super::helpers::{create_test_actor, create_test_cause, leave_window};

fn persisted_outing(public_id: &str) -> (Persistence, BulkTransitionResult) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let result: BulkTransitionResult = apply_submit_bulk(
        public_id.to_string(),
        "Inter-hostel cricket tournament",
        leave_window(),
        "warden-7",
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persistence.insert_bulk_outing(&result).unwrap();
    (persistence, result)
}

#[test]
fn test_insert_and_load_round_trip() {
    let (persistence, result) = persisted_outing("outing-1");

    let loaded = persistence.get_bulk_outing("outing-1").unwrap();
    assert_eq!(loaded, result.new_state);
    assert_eq!(loaded.status, BulkOutingStatus::Pending);
    assert!(loaded.students.is_none());
    assert_eq!(loaded.row_version, 0);
}

#[test]
fn test_missing_outing_is_not_found() {
    let (persistence, _) = persisted_outing("outing-1");

    assert!(matches!(
        persistence.get_bulk_outing("outing-nope").unwrap_err(),
        PersistenceError::BulkOutingNotFound(_)
    ));
}

#[test]
fn test_approval_persists_the_student_roster() {
    let (mut persistence, result) = persisted_outing("outing-1");

    let students: Vec<StudentRef> = vec![
        StudentRef::new("stu-1042").unwrap(),
        StudentRef::new("stu-1043").unwrap(),
        StudentRef::new("stu-1044").unwrap(),
    ];
    let decided = apply_bulk(
        &result.new_state,
        BulkCommand::Approve {
            students,
            decided_at: datetime!(2026-03-01 15:00 UTC),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persistence.persist_bulk_transition(&decided).unwrap();

    let loaded = persistence.get_bulk_outing("outing-1").unwrap();
    assert_eq!(loaded.status, BulkOutingStatus::Approved);
    assert_eq!(loaded.students.as_ref().unwrap().len(), 3);
    assert_eq!(loaded.decided_at, Some(datetime!(2026-03-01 15:00 UTC)));
    assert_eq!(loaded.row_version, 1);

    let trail = persistence.get_audit_trail("outing-1").unwrap();
    assert_eq!(trail.len(), 2);
    assert_eq!(trail[1].1.action.name, "ApproveBulkOuting");
}

#[test]
fn test_stale_decision_conflicts() {
    let (mut persistence, result) = persisted_outing("outing-1");

    let approve = apply_bulk(
        &result.new_state,
        BulkCommand::Approve {
            students: vec![StudentRef::new("stu-1042").unwrap()],
            decided_at: datetime!(2026-03-01 15:00 UTC),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    let reject = apply_bulk(
        &result.new_state,
        BulkCommand::Reject {
            reason: String::from("Transport unavailable"),
            decided_at: datetime!(2026-03-01 15:01 UTC),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    persistence.persist_bulk_transition(&approve).unwrap();

    assert!(matches!(
        persistence.persist_bulk_transition(&reject).unwrap_err(),
        PersistenceError::VersionConflict { .. }
    ));

    let loaded = persistence.get_bulk_outing("outing-1").unwrap();
    assert_eq!(loaded.status, BulkOutingStatus::Approved);
}

#[test]
fn test_listing_returns_all_outings() {
    let (mut persistence, _) = persisted_outing("outing-1");

    let second = apply_submit_bulk(
        String::from("outing-2"),
        "Industrial visit",
        leave_window(),
        "warden-7",
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persistence.insert_bulk_outing(&second).unwrap();

    let all = persistence.list_bulk_outings().unwrap();
    assert_eq!(all.len(), 2);
}
