// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Command, PassRequest, apply};
use gate_pass_audit::{Actor, Cause};
use gate_pass_domain::{ApplicationType, GateConfig, RequestWindow, StudentRef};
use time::OffsetDateTime;
use time::macros::{date, datetime, time};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("warden-7"), String::from("warden"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Test request"))
}

pub fn create_test_config() -> GateConfig {
    GateConfig::default()
}

pub fn leave_window() -> RequestWindow {
    RequestWindow::leave(
        datetime!(2026-03-02 09:00),
        datetime!(2026-03-04 18:00),
        datetime!(2026-03-02 09:30),
    )
    .unwrap()
}

pub fn permission_window() -> RequestWindow {
    RequestWindow::permission(date!(2026 - 03 - 02), time!(14:00), time!(17:00)).unwrap()
}

pub fn create_leave_request() -> PassRequest {
    PassRequest::submit(
        String::from("req-leave-1"),
        StudentRef::new("stu-1042").unwrap(),
        ApplicationType::Leave,
        "Family function at home",
        leave_window(),
    )
    .unwrap()
}

pub fn create_permission_request() -> PassRequest {
    PassRequest::submit(
        String::from("req-perm-1"),
        StudentRef::new("stu-1042").unwrap(),
        ApplicationType::Permission,
        "Medical appointment",
        permission_window(),
    )
    .unwrap()
}

/// Walks a leave request through issue, verify, and principal approval.
pub fn approved_leave_request() -> PassRequest {
    let request: PassRequest = create_leave_request();
    let config: GateConfig = create_test_config();
    let issued_at: OffsetDateTime = datetime!(2026-03-01 10:00 UTC);

    let issued = apply(
        &request,
        Command::IssueOtp {
            code: String::from("4821"),
            issued_at,
        },
        create_test_actor(),
        create_test_cause(),
        &config,
    )
    .unwrap();

    let verified = apply(
        &issued.new_state,
        Command::VerifyOtp {
            code: String::from("4821"),
            verified_at: datetime!(2026-03-01 10:05 UTC),
        },
        create_test_actor(),
        create_test_cause(),
        &config,
    )
    .unwrap();

    let approved = apply(
        &verified.new_state,
        Command::PrincipalApprove {
            approved_at: datetime!(2026-03-01 12:00 UTC),
        },
        create_test_actor(),
        create_test_cause(),
        &config,
    )
    .unwrap();

    approved.new_state
}

/// Walks a permission request through issue and verify; the warden's
/// sign-off alone finalizes approval.
pub fn approved_permission_request() -> PassRequest {
    let request: PassRequest = create_permission_request();
    let config: GateConfig = create_test_config();

    let issued = apply(
        &request,
        Command::IssueOtp {
            code: String::from("4821"),
            issued_at: datetime!(2026-03-01 10:00 UTC),
        },
        create_test_actor(),
        create_test_cause(),
        &config,
    )
    .unwrap();

    let verified = apply(
        &issued.new_state,
        Command::VerifyOtp {
            code: String::from("4821"),
            verified_at: datetime!(2026-03-01 10:05 UTC),
        },
        create_test_actor(),
        create_test_cause(),
        &config,
    )
    .unwrap();

    verified.new_state
}
