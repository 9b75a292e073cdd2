// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the gate visit ledger: scan ceilings, debounce, and the
//! incoming QR token window.

use crate::{Command, CoreError, PassRequest, apply};
use gate_pass_domain::{DomainError, VerificationStatus};
use time::OffsetDateTime;
use time::macros::datetime;

use super::helpers::{
    approved_leave_request, approved_permission_request, create_leave_request, create_test_actor,
    create_test_cause, create_test_config,
};

fn outgoing(scanned_at: OffsetDateTime) -> Command {
    Command::RecordOutgoingVisit {
        scanned_at,
        scanner: String::from("guard-station-1"),
        location: String::from("Main Gate"),
        qr_token: String::from("qr-token-abc"),
    }
}

fn incoming(scanned_at: OffsetDateTime, token: &str) -> Command {
    Command::RecordIncomingVisit {
        scanned_at,
        scanner: String::from("guard-station-1"),
        location: String::from("Main Gate"),
        presented_token: token.to_string(),
    }
}

/// Records the first outgoing scan on an approved leave.
fn gate_verified_request() -> PassRequest {
    let approved = approved_leave_request();
    apply(
        &approved,
        outgoing(datetime!(2026-03-02 04:00 UTC)),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    )
    .unwrap()
    .new_state
}

#[test]
fn test_outgoing_scan_requires_final_approval() {
    let pending = create_leave_request();

    let result = apply(
        &pending,
        outgoing(datetime!(2026-03-02 04:00 UTC)),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::VerificationBeforeApproval { .. })
    ));
}

#[test]
fn test_first_outgoing_scan_verifies_and_activates_qr() {
    let request = gate_verified_request();

    assert_eq!(request.verification_status, VerificationStatus::Verified);
    assert_eq!(request.outgoing_visits, 1);

    let qr = request.incoming_qr.as_ref().unwrap();
    assert_eq!(qr.token, "qr-token-abc");
    assert_eq!(qr.generated_at, datetime!(2026-03-02 04:00 UTC));
}

#[test]
fn test_second_outgoing_scan_keeps_the_original_token() {
    let request = gate_verified_request();

    let second = apply(
        &request,
        Command::RecordOutgoingVisit {
            scanned_at: datetime!(2026-03-02 06:00 UTC),
            scanner: String::from("guard-station-2"),
            location: String::from("Main Gate"),
            qr_token: String::from("qr-token-other"),
        },
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    )
    .unwrap();

    assert_eq!(second.new_state.outgoing_visits, 2);
    assert_eq!(
        second.new_state.incoming_qr.as_ref().unwrap().token,
        "qr-token-abc"
    );
}

#[test]
fn test_outgoing_ceiling_is_two() {
    let request = gate_verified_request();

    let second = apply(
        &request,
        outgoing(datetime!(2026-03-02 06:00 UTC)),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    )
    .unwrap();

    let third = apply(
        &second.new_state,
        outgoing(datetime!(2026-03-02 08:00 UTC)),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    );

    assert!(matches!(
        third.unwrap_err(),
        CoreError::VisitLimitReached { limit: 2, .. }
    ));
}

#[test]
fn test_repeat_scan_inside_debounce_is_rejected() {
    let request = gate_verified_request();

    // 45 seconds after the first scan, inside the 60 second window.
    let result = apply(
        &request,
        outgoing(datetime!(2026-03-02 04:00:45 UTC)),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DuplicateScan {
            seconds_since_last: 45
        }
    ));
}

#[test]
fn test_scan_outside_debounce_is_accepted() {
    let request = gate_verified_request();

    let result = apply(
        &request,
        outgoing(datetime!(2026-03-02 04:01:30 UTC)),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    );

    assert!(result.is_ok());
}

#[test]
fn test_incoming_scan_completes_the_cycle() {
    let request = gate_verified_request();

    let result = apply(
        &request,
        incoming(datetime!(2026-03-02 12:00 UTC), "qr-token-abc"),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    )
    .unwrap();

    assert_eq!(
        result.new_state.verification_status,
        VerificationStatus::Completed
    );
    assert_eq!(result.new_state.incoming_visits, 1);
}

#[test]
fn test_incoming_scan_requires_matching_token() {
    let request = gate_verified_request();

    let result = apply(
        &request,
        incoming(datetime!(2026-03-02 12:00 UTC), "qr-token-forged"),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    );

    assert!(matches!(result.unwrap_err(), CoreError::InvalidQrToken));
}

#[test]
fn test_incoming_scan_without_outgoing_fails() {
    let approved = approved_leave_request();

    let result = apply(
        &approved,
        incoming(datetime!(2026-03-02 12:00 UTC), "qr-token-abc"),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    );

    // NotVerified -> Completed is not a legal verification step.
    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::InvalidVerificationTransition { .. })
    ));
}

#[test]
fn test_qr_token_expires_after_its_window() {
    let request = gate_verified_request();

    // 25 hours after activation, past the 24 hour window.
    let result = apply(
        &request,
        incoming(datetime!(2026-03-03 05:00 UTC), "qr-token-abc"),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    );

    assert!(matches!(result.unwrap_err(), CoreError::QrExpired));
}

#[test]
fn test_incoming_ceiling_is_one() {
    let request = gate_verified_request();

    let completed = apply(
        &request,
        incoming(datetime!(2026-03-02 12:00 UTC), "qr-token-abc"),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    )
    .unwrap();

    let again = apply(
        &completed.new_state,
        incoming(datetime!(2026-03-02 12:05 UTC), "qr-token-abc"),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    );

    assert!(matches!(
        again.unwrap_err(),
        CoreError::VisitLimitReached { limit: 1, .. }
    ));
}

#[test]
fn test_operator_can_expire_an_open_request() {
    let request = gate_verified_request();

    let expired = apply(
        &request,
        Command::SetVerificationStatus {
            new_status: VerificationStatus::Expired,
            changed_at: datetime!(2026-03-05 08:00 UTC),
            qr_token: String::new(),
        },
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    )
    .unwrap();

    assert_eq!(
        expired.new_state.verification_status,
        VerificationStatus::Expired
    );

    // No gate activity after expiry.
    let scan = apply(
        &expired.new_state,
        outgoing(datetime!(2026-03-05 09:00 UTC)),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    );
    assert!(scan.is_err());
}

#[test]
fn test_desk_verification_marks_leave_and_activates_qr() {
    let approved = approved_leave_request();

    let verified = apply(
        &approved,
        Command::SetVerificationStatus {
            new_status: VerificationStatus::Verified,
            changed_at: datetime!(2026-03-02 04:30 UTC),
            qr_token: String::from("qr-token-desk"),
        },
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    )
    .unwrap();

    assert_eq!(
        verified.new_state.verification_status,
        VerificationStatus::Verified
    );
    let qr = verified.new_state.incoming_qr.as_ref().unwrap();
    assert_eq!(qr.token, "qr-token-desk");
    assert_eq!(qr.generated_at, datetime!(2026-03-02 04:30 UTC));

    // The return scan accepts the desk-issued token.
    let returned = apply(
        &verified.new_state,
        incoming(datetime!(2026-03-02 12:00 UTC), "qr-token-desk"),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    )
    .unwrap();
    assert_eq!(
        returned.new_state.verification_status,
        VerificationStatus::Completed
    );
}

#[test]
fn test_reaffirming_verified_keeps_the_scan_token() {
    let request = gate_verified_request();

    // An operator marking the request verified after the gate scan is
    // a no-op, not an error.
    let reaffirmed = apply(
        &request,
        Command::SetVerificationStatus {
            new_status: VerificationStatus::Verified,
            changed_at: datetime!(2026-03-02 04:30 UTC),
            qr_token: String::from("qr-token-other"),
        },
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    )
    .unwrap();

    assert_eq!(
        reaffirmed.new_state.verification_status,
        VerificationStatus::Verified
    );
    assert_eq!(
        reaffirmed.new_state.incoming_qr.as_ref().unwrap().token,
        "qr-token-abc"
    );
}

#[test]
fn test_permission_scans_carry_no_return_token() {
    let approved = approved_permission_request();

    let out = apply(
        &approved,
        outgoing(datetime!(2026-03-02 09:00 UTC)),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    )
    .unwrap();

    assert_eq!(out.new_state.verification_status, VerificationStatus::Verified);
    assert!(out.new_state.incoming_qr.is_none());

    // The return scan matches the student, not a token.
    let back = apply(
        &out.new_state,
        incoming(datetime!(2026-03-02 11:30 UTC), ""),
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    )
    .unwrap();

    assert_eq!(
        back.new_state.verification_status,
        VerificationStatus::Completed
    );
    assert_eq!(back.new_state.incoming_visits, 1);
}

#[test]
fn test_operator_cannot_skip_to_completed() {
    let approved = approved_leave_request();

    let result = apply(
        &approved,
        Command::SetVerificationStatus {
            new_status: VerificationStatus::Completed,
            changed_at: datetime!(2026-03-02 08:00 UTC),
            qr_token: String::new(),
        },
        create_test_actor(),
        create_test_cause(),
        &create_test_config(),
    );

    assert!(matches!(
        result.unwrap_err(),
        CoreError::DomainViolation(DomainError::InvalidVerificationTransition { .. })
    ));
}
