// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the hostel gate pass system.
//!
//! Translates wire DTOs into pure core commands, enforces
//! capability-based authorization, adapts the external directory and
//! notification services, and maps every internal error onto the
//! response-envelope contract.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod auth;
mod directory;
mod error;
mod handlers;
mod notify;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthenticatedOperator, AuthorizationService, GateCapability, PermissionLevel,
    PermissionService, StaticPermissionService,
};
pub use directory::{CachedDirectory, DirectoryError, DirectoryService, StudentProfile};
pub use error::{ApiError, ErrorKind};
pub use handlers::{
    decide_bulk_outing, generate_otp_code, generate_qr_token, get_bulk_outing,
    get_bulk_outing_students, get_request, issue_otp, list_bulk_outings, list_requests,
    principal_approve, record_incoming_visit, record_outgoing_visit, reject_request, reveal_otp,
    set_verification_status, submit_bulk_outing, submit_request, update_request_details,
    verify_otp,
};
pub use notify::{LogOnlyGateway, NotificationGateway, NotifyError, dispatch_best_effort};
pub use request_response::{
    ApiResponse, BulkOutingStudentsResponse, BulkOutingView, DecideBulkOutingRequest,
    IncomingScanRequest, OutgoingScanRequest, OutgoingScanResponse, RejectRequest, RequestSummary,
    RequestView, RevealOtpResponse, SetVerificationRequest, SubmitBulkOutingRequest,
    SubmitRequestRequest, UpdateDetailsRequest, VerificationUpdateResponse, VerifyOtpRequest,
    WindowPayload,
};
