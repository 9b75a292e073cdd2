// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every mutation follows the same shape: authorize, load, apply the
//! pure transition, persist under optimistic concurrency. Handlers
//! never hold clocks; `now` always arrives as an argument so the HTTP
//! layer owns time.

use rand::Rng;
use rand::distr::Alphanumeric;
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};
use tracing::{info, warn};

use gate_pass::{
    BulkCommand, BulkOutingRequest, BulkTransitionResult, Command, PassRequest, TransitionResult,
    apply, apply_bulk, apply_submit, apply_submit_bulk,
};
use gate_pass_audit::{Cause, VisitDirection, VisitEvent};
use gate_pass_domain::{
    ApplicationType, GateConfig, ListingKey, RequestWindow, StudentRef, TimeBucket,
    VerificationStatus, classify, format_civil, is_overdue, is_urgent, parse_civil,
};
use gate_pass_persistence::{FlaggedRow, Persistence};

use crate::auth::{AuthenticatedOperator, AuthorizationService, GateCapability};
use crate::directory::{CachedDirectory, DirectoryService};
use crate::error::ApiError;
use crate::notify::{NotificationGateway, dispatch_best_effort};
use crate::request_response::{
    BulkOutingStudentsResponse, BulkOutingView, DecideBulkOutingRequest, IncomingScanRequest,
    OutgoingScanRequest, OutgoingScanResponse, RejectRequest, RequestSummary, RequestView,
    RevealOtpResponse, SetVerificationRequest, SubmitBulkOutingRequest, SubmitRequestRequest,
    UpdateDetailsRequest, VerificationUpdateResponse, VerifyOtpRequest, WindowPayload,
};

/// Length of generated incoming-QR tokens.
const QR_TOKEN_LENGTH: usize = 32;

/// Wire format for calendar days (`2026-03-02`).
const CIVIL_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Wire format for times of day (`14:00:00`).
const CIVIL_TIME: &[BorrowedFormatItem<'_>] = format_description!("[hour]:[minute]:[second]");

/// Generates a fresh four-digit one-time code.
#[must_use]
pub fn generate_otp_code() -> String {
    let value: u16 = rand::rng().random_range(0..=9999);
    format!("{value:04}")
}

/// Generates a fresh opaque incoming-QR token.
#[must_use]
pub fn generate_qr_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(QR_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

fn format_instant(instant: OffsetDateTime) -> String {
    instant
        .format(&Rfc3339)
        .unwrap_or_else(|_| instant.to_string())
}

fn parse_window(payload: &WindowPayload) -> Result<RequestWindow, ApiError> {
    match payload {
        WindowPayload::Leave {
            start_at,
            end_at,
            gate_pass_at,
        } => {
            let window: RequestWindow = RequestWindow::leave(
                parse_civil(start_at)?,
                parse_civil(end_at)?,
                parse_civil(gate_pass_at)?,
            )?;
            Ok(window)
        }
        WindowPayload::Permission {
            permission_date,
            out_time,
            in_time,
        } => {
            let date: Date =
                Date::parse(permission_date, CIVIL_DATE).map_err(|e| ApiError::Validation {
                    field: String::from("permission_date"),
                    message: e.to_string(),
                })?;
            let out: Time = Time::parse(out_time, CIVIL_TIME).map_err(|e| ApiError::Validation {
                field: String::from("out_time"),
                message: e.to_string(),
            })?;
            let in_t: Time = Time::parse(in_time, CIVIL_TIME).map_err(|e| ApiError::Validation {
                field: String::from("in_time"),
                message: e.to_string(),
            })?;
            let window: RequestWindow = RequestWindow::permission(date, out, in_t)?;
            Ok(window)
        }
    }
}

fn window_payload(window: &RequestWindow) -> WindowPayload {
    match window {
        RequestWindow::Leave {
            start_at,
            end_at,
            gate_pass_at,
        } => WindowPayload::Leave {
            start_at: format_civil(*start_at),
            end_at: format_civil(*end_at),
            gate_pass_at: format_civil(*gate_pass_at),
        },
        RequestWindow::Permission {
            permission_date,
            out_time,
            in_time,
        } => WindowPayload::Permission {
            permission_date: permission_date
                .format(CIVIL_DATE)
                .unwrap_or_else(|_| permission_date.to_string()),
            out_time: out_time
                .format(CIVIL_TIME)
                .unwrap_or_else(|_| out_time.to_string()),
            in_time: in_time
                .format(CIVIL_TIME)
                .unwrap_or_else(|_| in_time.to_string()),
        },
    }
}

fn request_view(request: &PassRequest) -> RequestView {
    RequestView {
        public_id: request.public_id.clone(),
        student_ref: request.student.value().to_string(),
        application_type: request.application_type.as_str().to_string(),
        reason: request.reason.clone(),
        window: window_payload(&request.window),
        approval_status: request.approval_status.as_str().to_string(),
        verification_status: request.verification_status.as_str().to_string(),
        rejection_reason: request.rejection_reason.clone(),
        has_active_code: request.otp.is_some(),
        outgoing_visits: request.outgoing_visits,
        incoming_visits: request.incoming_visits,
        is_locked_for_updates: request.is_locked_for_updates,
        row_version: request.row_version,
    }
}

fn bulk_outing_view(outing: &BulkOutingRequest) -> BulkOutingView {
    BulkOutingView {
        public_id: outing.public_id.clone(),
        purpose: outing.purpose.clone(),
        requested_by: outing.requested_by.clone(),
        status: outing.status.as_str().to_string(),
        student_count: outing.students.as_ref().map_or(0, Vec::len),
        rejection_reason: outing.rejection_reason.clone(),
        decided_at: outing.decided_at.map(format_instant),
        row_version: outing.row_version,
    }
}

/// Submits a new leave or permission request.
///
/// # Errors
///
/// Returns an error if the operator lacks permission, a field fails
/// validation, or persistence fails.
pub fn submit_request(
    persistence: &mut Persistence,
    request: SubmitRequestRequest,
    operator: &AuthenticatedOperator,
    cause: Cause,
) -> Result<RequestView, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::SubmitRequest)?;

    let student: StudentRef = StudentRef::new(&request.student_ref)?;
    let application_type: ApplicationType = request.application_type.parse()?;
    let window: RequestWindow = parse_window(&request.window)?;

    let result: TransitionResult = apply_submit(
        request.public_id,
        student,
        application_type,
        &request.reason,
        window,
        operator.to_audit_actor(),
        cause,
    )?;
    persistence.insert_request(&result)?;

    info!(
        "submitted {} request {}",
        result.new_state.application_type, result.new_state.public_id
    );
    Ok(request_view(&result.new_state))
}

/// Replaces the editable details of a request that has not yet entered
/// the sign-off chain.
///
/// # Errors
///
/// Returns an error if the operator lacks permission, the request is
/// locked or past the editable stage, a field fails validation, or
/// persistence fails.
pub fn update_request_details(
    persistence: &mut Persistence,
    public_id: &str,
    request: UpdateDetailsRequest,
    config: &GateConfig,
    operator: &AuthenticatedOperator,
    cause: Cause,
) -> Result<RequestView, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::UpdateDetails)?;

    let window: RequestWindow = parse_window(&request.window)?;
    let current: PassRequest = persistence.get_request(public_id)?;
    let result: TransitionResult = apply(
        &current,
        Command::UpdateDetails {
            reason: request.reason,
            window,
        },
        operator.to_audit_actor(),
        cause,
        config,
    )?;
    persistence.persist_transition(&result, None)?;

    info!("details updated on request {public_id}");
    Ok(request_view(&result.new_state))
}

/// Issues (or re-issues) a one-time code and dispatches it to the
/// guardian contact on file.
///
/// Dispatch is fire-and-forget; a delivery or directory failure is
/// logged and never rolls back issuance.
///
/// # Errors
///
/// Returns an error if the operator lacks permission, the request is
/// not awaiting verification, or persistence fails.
pub fn issue_otp<D: DirectoryService>(
    persistence: &mut Persistence,
    directory: &CachedDirectory<D>,
    gateway: &dyn NotificationGateway,
    public_id: &str,
    config: &GateConfig,
    operator: &AuthenticatedOperator,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<RequestView, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::IssueOtp)?;

    let current: PassRequest = persistence.get_request(public_id)?;
    let code: String = generate_otp_code();
    let result: TransitionResult = apply(
        &current,
        Command::IssueOtp {
            code: code.clone(),
            issued_at: now,
        },
        operator.to_audit_actor(),
        cause,
        config,
    )?;
    persistence.persist_transition(&result, None)?;

    match directory.get_student(current.student.value()) {
        Ok(Some(profile)) => {
            if let Some(contact) = profile.guardian_contact {
                let message: String =
                    format!("Gate pass verification code for {}: {code}", profile.name);
                dispatch_best_effort(gateway, &contact, &message);
            } else {
                warn!("no guardian contact on file for {}", current.student);
            }
        }
        Ok(None) => warn!("student {} not found in directory", current.student),
        Err(e) => warn!("directory unavailable during code dispatch: {e}"),
    }

    info!("issued code for request {public_id}");
    Ok(request_view(&result.new_state))
}

/// Reveals the active one-time code to a privileged operator.
///
/// # Errors
///
/// Returns an error if the operator lacks permission, the request does
/// not exist, or no code is active.
pub fn reveal_otp(
    persistence: &Persistence,
    public_id: &str,
    operator: &AuthenticatedOperator,
) -> Result<RevealOtpResponse, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::RevealOtp)?;

    let request: PassRequest = persistence.get_request(public_id)?;
    let Some(otp) = request.otp else {
        return Err(ApiError::NoActiveCode);
    };

    Ok(RevealOtpResponse {
        public_id: request.public_id,
        code: otp.code,
        issued_at: format_instant(otp.issued_at),
    })
}

/// Verifies a supplied one-time code, advancing the approval status
/// per the request's sign-off flow.
///
/// # Errors
///
/// Returns an error if the operator lacks permission, no code is
/// active, the code does not match, or persistence fails.
pub fn verify_otp(
    persistence: &mut Persistence,
    public_id: &str,
    request: VerifyOtpRequest,
    config: &GateConfig,
    operator: &AuthenticatedOperator,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<RequestView, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::VerifyOtp)?;

    let current: PassRequest = persistence.get_request(public_id)?;
    let result: TransitionResult = apply(
        &current,
        Command::VerifyOtp {
            code: request.code,
            verified_at: now,
        },
        operator.to_audit_actor(),
        cause,
        config,
    )?;
    persistence.persist_transition(&result, None)?;

    info!(
        "request {public_id} advanced to {}",
        result.new_state.approval_status
    );
    Ok(request_view(&result.new_state))
}

/// Records the principal's final approval on a warden-verified leave.
///
/// # Errors
///
/// Returns an error if the operator lacks permission, the request is
/// not warden-verified, or persistence fails.
pub fn principal_approve(
    persistence: &mut Persistence,
    public_id: &str,
    config: &GateConfig,
    operator: &AuthenticatedOperator,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<RequestView, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::PrincipalApprove)?;

    let current: PassRequest = persistence.get_request(public_id)?;
    let result: TransitionResult = apply(
        &current,
        Command::PrincipalApprove { approved_at: now },
        operator.to_audit_actor(),
        cause,
        config,
    )?;
    persistence.persist_transition(&result, None)?;

    info!("request {public_id} approved");
    Ok(request_view(&result.new_state))
}

/// Rejects a request with a mandatory reason.
///
/// # Errors
///
/// Returns an error if the operator lacks permission, the reason is
/// blank, the request is already terminal, or persistence fails.
pub fn reject_request(
    persistence: &mut Persistence,
    public_id: &str,
    request: RejectRequest,
    config: &GateConfig,
    operator: &AuthenticatedOperator,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<RequestView, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::Reject)?;

    let current: PassRequest = persistence.get_request(public_id)?;
    let result: TransitionResult = apply(
        &current,
        Command::Reject {
            reason: request.reason,
            rejected_at: now,
        },
        operator.to_audit_actor(),
        cause,
        config,
    )?;
    persistence.persist_transition(&result, None)?;

    info!("request {public_id} rejected");
    Ok(request_view(&result.new_state))
}

/// Records an outgoing gate scan, activating the return QR token on
/// the first scan.
///
/// View-level gate staff may perform this operation.
///
/// # Errors
///
/// Returns an error if the operator lacks permission, the request is
/// not eligible, the scan is a duplicate or over the ceiling, or
/// persistence fails.
pub fn record_outgoing_visit(
    persistence: &mut Persistence,
    public_id: &str,
    scan: OutgoingScanRequest,
    config: &GateConfig,
    operator: &AuthenticatedOperator,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<OutgoingScanResponse, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::RecordOutgoingVisit)?;

    let current: PassRequest = persistence.get_request(public_id)?;
    let result: TransitionResult = apply(
        &current,
        Command::RecordOutgoingVisit {
            scanned_at: now,
            scanner: scan.scanner.clone(),
            location: scan.location.clone(),
            qr_token: generate_qr_token(),
        },
        operator.to_audit_actor(),
        cause,
        config,
    )?;
    let visit: VisitEvent =
        VisitEvent::new(VisitDirection::Outgoing, now, &scan.scanner, &scan.location)?;
    persistence.persist_transition(&result, Some(&visit))?;

    let qr_token: String = result
        .new_state
        .incoming_qr
        .as_ref()
        .map(|qr| qr.token.clone())
        .unwrap_or_default();

    info!(
        "outgoing scan {} recorded for request {public_id}",
        result.new_state.outgoing_visits
    );
    Ok(OutgoingScanResponse {
        request: request_view(&result.new_state),
        qr_token,
    })
}

/// Records an incoming gate scan against the active return QR token,
/// closing the verification cycle.
///
/// # Errors
///
/// Returns an error if the operator lacks permission, the token is
/// wrong or expired, the ceiling is reached, or persistence fails.
pub fn record_incoming_visit(
    persistence: &mut Persistence,
    public_id: &str,
    scan: IncomingScanRequest,
    config: &GateConfig,
    operator: &AuthenticatedOperator,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<RequestView, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::RecordIncomingVisit)?;

    let current: PassRequest = persistence.get_request(public_id)?;
    let result: TransitionResult = apply(
        &current,
        Command::RecordIncomingVisit {
            scanned_at: now,
            scanner: scan.scanner.clone(),
            location: scan.location.clone(),
            presented_token: scan.token,
        },
        operator.to_audit_actor(),
        cause,
        config,
    )?;
    let visit: VisitEvent =
        VisitEvent::new(VisitDirection::Incoming, now, &scan.scanner, &scan.location)?;
    persistence.persist_transition(&result, Some(&visit))?;

    info!("incoming scan recorded for request {public_id}");
    Ok(request_view(&result.new_state))
}

/// Sets a verification outcome directly, for operator corrections
/// such as marking a leave verified at the desk or expiring a lapsed
/// request.
///
/// Marking a leave verified activates its return QR token exactly as
/// an outgoing scan would; the token is echoed in the response so the
/// operator can hand it over.
///
/// # Errors
///
/// Returns an error if the operator lacks permission, the transition
/// is not permitted, or persistence fails.
pub fn set_verification_status(
    persistence: &mut Persistence,
    public_id: &str,
    request: SetVerificationRequest,
    config: &GateConfig,
    operator: &AuthenticatedOperator,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<VerificationUpdateResponse, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::SetVerificationStatus)?;

    let new_status: VerificationStatus = request.new_status.parse()?;
    let current: PassRequest = persistence.get_request(public_id)?;
    let result: TransitionResult = apply(
        &current,
        Command::SetVerificationStatus {
            new_status,
            changed_at: now,
            qr_token: generate_qr_token(),
        },
        operator.to_audit_actor(),
        cause,
        config,
    )?;
    persistence.persist_transition(&result, None)?;

    let qr_token: Option<String> = if result.new_state.verification_status
        == VerificationStatus::Verified
    {
        result
            .new_state
            .incoming_qr
            .as_ref()
            .map(|qr| qr.token.clone())
    } else {
        None
    };

    Ok(VerificationUpdateResponse {
        request: request_view(&result.new_state),
        qr_token,
    })
}

/// Retrieves a single request.
///
/// # Errors
///
/// Returns an error if the operator lacks permission or the request
/// does not exist.
pub fn get_request(
    persistence: &Persistence,
    public_id: &str,
    operator: &AuthenticatedOperator,
) -> Result<RequestView, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::ViewRequests)?;

    let request: PassRequest = persistence.get_request(public_id)?;
    Ok(request_view(&request))
}

/// Converts a flagged storage row into its listing entry.
///
/// Flagged rows carry no parseable window, so they never count as
/// today's items and sort by whatever start instant the row still
/// holds, if any.
pub(crate) fn flagged_row_entry(row: &FlaggedRow) -> (ListingKey, RequestSummary) {
    let key: ListingKey = ListingKey {
        is_today: false,
        is_verified: row.verification_status != "not_verified",
        start: parse_civil(&row.start_at).ok(),
    };
    let summary: RequestSummary = RequestSummary {
        public_id: row.public_id.clone(),
        student_ref: row.student_ref.clone(),
        application_type: row.application_type.clone(),
        start_at: row.start_at.clone(),
        bucket: TimeBucket::NeedsReview.as_str().to_string(),
        approval_status: row.approval_status.clone(),
        verification_status: row.verification_status.clone(),
        urgent: false,
        overdue: false,
    };
    (key, summary)
}

/// Lists all requests, bucketed and sorted for display.
///
/// Order: today's items first, then unverified before verified, then
/// earliest start first. Urgency and overdue flags are display-only.
/// Rows whose stored data could not be reconstructed appear in the
/// needs-review bucket rather than hiding the listing.
///
/// # Errors
///
/// Returns an error if the operator lacks permission or the database
/// cannot be queried.
pub fn list_requests(
    persistence: &Persistence,
    config: &GateConfig,
    operator: &AuthenticatedOperator,
    now: OffsetDateTime,
) -> Result<Vec<RequestSummary>, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::ViewRequests)?;

    let tz = config.tz();
    let listing = persistence.list_requests()?;
    let mut rows: Vec<(ListingKey, RequestSummary)> = listing
        .requests
        .iter()
        .map(|request| {
            let start = request.window.start_instant();
            let bucket: TimeBucket = classify(now, start, tz);
            let verified: bool = request.verification_status != VerificationStatus::NotVerified;
            let key: ListingKey = ListingKey {
                is_today: bucket == TimeBucket::Today,
                is_verified: verified,
                start: Some(start),
            };
            let summary: RequestSummary = RequestSummary {
                public_id: request.public_id.clone(),
                student_ref: request.student.value().to_string(),
                application_type: request.application_type.as_str().to_string(),
                start_at: format_civil(start),
                bucket: bucket.as_str().to_string(),
                approval_status: request.approval_status.as_str().to_string(),
                verification_status: request.verification_status.as_str().to_string(),
                urgent: is_urgent(now, start, tz, verified),
                overdue: is_overdue(now, start, tz, verified),
            };
            (key, summary)
        })
        .collect();
    rows.extend(listing.flagged.iter().map(flagged_row_entry));

    rows.sort_by(|(a, _), (b, _)| a.compare(b));
    Ok(rows.into_iter().map(|(_, summary)| summary).collect())
}

/// Submits a new bulk outing.
///
/// # Errors
///
/// Returns an error if the operator lacks permission, a field fails
/// validation, or persistence fails.
pub fn submit_bulk_outing(
    persistence: &mut Persistence,
    request: SubmitBulkOutingRequest,
    operator: &AuthenticatedOperator,
    cause: Cause,
) -> Result<BulkOutingView, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::SubmitBulkOuting)?;

    let window: RequestWindow = parse_window(&request.window)?;
    let result: BulkTransitionResult = apply_submit_bulk(
        request.public_id,
        &request.purpose,
        window,
        &request.requested_by,
        operator.to_audit_actor(),
        cause,
    )?;
    persistence.insert_bulk_outing(&result)?;

    info!("submitted bulk outing {}", result.new_state.public_id);
    Ok(bulk_outing_view(&result.new_state))
}

/// Decides a pending bulk outing.
///
/// An approval captures the covered roster as an immutable snapshot;
/// a rejection records a mandatory reason. Either way the decision is
/// final.
///
/// # Errors
///
/// Returns an error if the operator lacks permission, the decision
/// verb is unknown, a required field is missing, the outing already
/// has a decision, or persistence fails.
pub fn decide_bulk_outing(
    persistence: &mut Persistence,
    public_id: &str,
    request: DecideBulkOutingRequest,
    operator: &AuthenticatedOperator,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<BulkOutingView, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::DecideBulkOuting)?;

    let command: BulkCommand = match request.decision.as_str() {
        "approve" => {
            let Some(roster) = request.students else {
                return Err(ApiError::Validation {
                    field: String::from("students"),
                    message: String::from("an approval must carry the covered student roster"),
                });
            };
            let students: Vec<StudentRef> = roster
                .iter()
                .map(|id| StudentRef::new(id))
                .collect::<Result<_, _>>()?;
            BulkCommand::Approve {
                students,
                decided_at: now,
            }
        }
        "reject" => BulkCommand::Reject {
            reason: request.reason.unwrap_or_default(),
            decided_at: now,
        },
        other => {
            return Err(ApiError::Validation {
                field: String::from("decision"),
                message: format!("unknown decision '{other}', expected 'approve' or 'reject'"),
            });
        }
    };

    let current: BulkOutingRequest = persistence.get_bulk_outing(public_id)?;
    let result: BulkTransitionResult =
        apply_bulk(&current, command, operator.to_audit_actor(), cause)?;
    persistence.persist_bulk_transition(&result)?;

    info!(
        "bulk outing {public_id} decided: {}",
        result.new_state.status.as_str()
    );
    Ok(bulk_outing_view(&result.new_state))
}

/// Retrieves a single bulk outing.
///
/// # Errors
///
/// Returns an error if the operator lacks permission or the outing
/// does not exist.
pub fn get_bulk_outing(
    persistence: &Persistence,
    public_id: &str,
    operator: &AuthenticatedOperator,
) -> Result<BulkOutingView, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::ViewRequests)?;

    let outing: BulkOutingRequest = persistence.get_bulk_outing(public_id)?;
    Ok(bulk_outing_view(&outing))
}

/// Lists all bulk outings, newest first.
///
/// # Errors
///
/// Returns an error if the operator lacks permission or the database
/// cannot be queried.
pub fn list_bulk_outings(
    persistence: &Persistence,
    operator: &AuthenticatedOperator,
) -> Result<Vec<BulkOutingView>, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::ViewRequests)?;

    Ok(persistence
        .list_bulk_outings()?
        .iter()
        .map(bulk_outing_view)
        .collect())
}

/// Retrieves the student roster snapshot of a bulk outing.
///
/// The roster is captured at approval time; a pending outing returns
/// an empty list.
///
/// # Errors
///
/// Returns an error if the operator lacks permission or the outing
/// does not exist.
pub fn get_bulk_outing_students(
    persistence: &Persistence,
    public_id: &str,
    operator: &AuthenticatedOperator,
) -> Result<BulkOutingStudentsResponse, ApiError> {
    AuthorizationService::authorize(operator, GateCapability::ViewRequests)?;

    let outing: BulkOutingRequest = persistence.get_bulk_outing(public_id)?;
    let students: Vec<String> = outing
        .students
        .as_ref()
        .map(|roster| roster.iter().map(|s| s.value().to_string()).collect())
        .unwrap_or_default();

    Ok(BulkOutingStudentsResponse {
        public_id: outing.public_id,
        status: outing.status.as_str().to_string(),
        students,
    })
}
