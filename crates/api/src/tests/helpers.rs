// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::time::Duration;

use gate_pass_audit::Cause;
use gate_pass_domain::GateConfig;
use gate_pass_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::directory::{CachedDirectory, DirectoryError, DirectoryService, StudentProfile};
use crate::handlers::{issue_otp, principal_approve, reveal_otp, submit_request, verify_otp};
use crate::notify::LogOnlyGateway;
use crate::request_response::{RequestView, SubmitRequestRequest, WindowPayload};
use crate::{AuthenticatedOperator, PermissionLevel};

/// Directory stub with a guardian contact on file for every student.
pub struct StubDirectory;

impl DirectoryService for StubDirectory {
    fn get_student(&self, student_ref: &str) -> Result<Option<StudentProfile>, DirectoryError> {
        Ok(Some(StudentProfile {
            student_ref: student_ref.to_string(),
            name: String::from("A Student"),
            guardian_contact: Some(String::from("+91-90000-00000")),
            course: String::from("B.Tech CSE"),
            branch: String::from("CSE"),
        }))
    }

    fn get_course_name(&self, _course_id: &str) -> Result<Option<String>, DirectoryError> {
        Ok(None)
    }

    fn get_branch_name(&self, _branch_id: &str) -> Result<Option<String>, DirectoryError> {
        Ok(None)
    }
}

pub fn full_operator() -> AuthenticatedOperator {
    AuthenticatedOperator::new(String::from("warden-7"), PermissionLevel::Full)
}

pub fn view_operator() -> AuthenticatedOperator {
    AuthenticatedOperator::new(String::from("guard-1"), PermissionLevel::View)
}

pub fn none_operator() -> AuthenticatedOperator {
    AuthenticatedOperator::new(String::from("stranger"), PermissionLevel::None)
}

pub fn test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

/// The day before the leave window opens.
pub fn submission_instant() -> OffsetDateTime {
    datetime!(2026-03-01 10:00 UTC)
}

pub fn leave_payload() -> WindowPayload {
    WindowPayload::Leave {
        start_at: String::from("2026-03-02T09:00:00"),
        end_at: String::from("2026-03-04T18:00:00"),
        gate_pass_at: String::from("2026-03-02T09:30:00"),
    }
}

pub fn permission_payload() -> WindowPayload {
    WindowPayload::Permission {
        permission_date: String::from("2026-03-02"),
        out_time: String::from("14:00:00"),
        in_time: String::from("17:00:00"),
    }
}

pub fn submit_leave(persistence: &mut Persistence, public_id: &str) -> RequestView {
    submit_request(
        persistence,
        SubmitRequestRequest {
            public_id: public_id.to_string(),
            student_ref: String::from("stu-1042"),
            application_type: String::from("leave"),
            reason: String::from("Family function at home"),
            window: leave_payload(),
        },
        &full_operator(),
        test_cause(),
    )
    .unwrap()
}

pub fn submit_permission(persistence: &mut Persistence, public_id: &str) -> RequestView {
    submit_request(
        persistence,
        SubmitRequestRequest {
            public_id: public_id.to_string(),
            student_ref: String::from("stu-1043"),
            application_type: String::from("permission"),
            reason: String::from("Library visit in town"),
            window: permission_payload(),
        },
        &full_operator(),
        test_cause(),
    )
    .unwrap()
}

/// Issues a code and returns its revealed cleartext.
pub fn issue_and_reveal(
    persistence: &mut Persistence,
    public_id: &str,
    now: OffsetDateTime,
) -> String {
    let directory = CachedDirectory::new(StubDirectory, Duration::from_secs(60));
    issue_otp(
        persistence,
        &directory,
        &LogOnlyGateway,
        public_id,
        &GateConfig::default(),
        &full_operator(),
        test_cause(),
        now,
    )
    .unwrap();
    reveal_otp(persistence, public_id, &full_operator())
        .unwrap()
        .code
}

/// Walks a leave request to full approval through the API.
pub fn approve_leave(persistence: &mut Persistence, public_id: &str) {
    let now = submission_instant();
    let config = GateConfig::default();
    let code = issue_and_reveal(persistence, public_id, now);
    verify_otp(
        persistence,
        public_id,
        crate::request_response::VerifyOtpRequest { code },
        &config,
        &full_operator(),
        test_cause(),
        now,
    )
    .unwrap();
    principal_approve(
        persistence,
        public_id,
        &config,
        &full_operator(),
        test_cause(),
        now,
    )
    .unwrap();
}
