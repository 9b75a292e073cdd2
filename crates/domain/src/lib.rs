// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod classifier;
mod error;
mod status;
mod types;
mod validation;
mod window;

#[cfg(test)]
mod tests;

pub use classifier::{ListingKey, TimeBucket, classify, classify_stored, is_overdue, is_urgent};
pub use types::{CourseLabel, GateConfig, StudentRef};
pub use window::{RequestWindow, format_civil, parse_civil};

// Re-export public types
pub use error::DomainError;
pub use status::{
    ApplicationType, ApprovalFlow, ApprovalStatus, BulkOutingStatus, VerificationStatus,
};
pub use validation::{
    validate_location, validate_otp_format, validate_reason, validate_rejection_reason,
    validate_scanner,
};
