// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CourseLabel, DomainError, GateConfig, StudentRef};
use time::Duration;

#[test]
fn test_student_ref_trims_and_rejects_empty() {
    let student = StudentRef::new("  stu-1042  ").unwrap();
    assert_eq!(student.value(), "stu-1042");

    assert!(matches!(
        StudentRef::new("   ").unwrap_err(),
        DomainError::InvalidStudentRef(_)
    ));
}

#[test]
fn test_course_label_classification() {
    assert_eq!(
        CourseLabel::classify("sql_17"),
        CourseLabel::LegacyId(String::from("sql_17"))
    );
    assert_eq!(
        CourseLabel::classify("1042"),
        CourseLabel::RawId(String::from("1042"))
    );
    assert_eq!(
        CourseLabel::classify("5f184e2a9c3b1d4e6a7b8c9d"),
        CourseLabel::RawId(String::from("5f184e2a9c3b1d4e6a7b8c9d"))
    );
    assert_eq!(
        CourseLabel::classify("B.Tech CSE"),
        CourseLabel::ResolvedName(String::from("B.Tech CSE"))
    );
}

#[test]
fn test_course_label_fallback_display_never_loses_the_token() {
    let label = CourseLabel::classify("sql_17");
    assert_eq!(label.fallback_display(), "sql_17");
}

#[test]
fn test_gate_config_defaults_match_hostel_policy() {
    let config = GateConfig::default();
    assert_eq!(config.max_outgoing_visits, 2);
    assert_eq!(config.max_incoming_visits, 1);
    assert_eq!(config.scan_debounce, Duration::seconds(60));
    assert_eq!(config.incoming_qr_window, Duration::hours(24));
    assert_eq!(config.tz(), chrono_tz::Tz::Asia__Kolkata);
}

#[test]
fn test_gate_config_rejects_zero_ceilings_and_bad_timezone() {
    assert!(matches!(
        GateConfig::new(
            0,
            1,
            Duration::seconds(60),
            Duration::hours(24),
            "Asia/Kolkata"
        )
        .unwrap_err(),
        DomainError::InvalidVisitCeiling { count: 0 }
    ));
    assert!(matches!(
        GateConfig::new(
            2,
            1,
            Duration::seconds(60),
            Duration::hours(24),
            "Mars/Olympus"
        )
        .unwrap_err(),
        DomainError::InvalidTimezone(_)
    ));
}
