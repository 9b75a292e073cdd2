// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;
use gate_pass::{TransitionResult, apply_submit};
use gate_pass_audit::{Actor, Cause};
use gate_pass_domain::{ApplicationType, RequestWindow, StudentRef};
use time::macros::datetime;

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("warden-7"), String::from("warden"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Test request"))
}

pub fn leave_window() -> RequestWindow {
    RequestWindow::leave(
        datetime!(2026-03-02 09:00),
        datetime!(2026-03-04 18:00),
        datetime!(2026-03-02 09:30),
    )
    .unwrap()
}

/// Submits and inserts a leave request, returning the persistence
/// handle and the submission result.
pub fn persisted_leave(public_id: &str) -> (Persistence, TransitionResult) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let result: TransitionResult = apply_submit(
        public_id.to_string(),
        StudentRef::new("stu-1042").unwrap(),
        ApplicationType::Leave,
        "Family function at home",
        leave_window(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persistence.insert_request(&result).unwrap();
    (persistence, result)
}
