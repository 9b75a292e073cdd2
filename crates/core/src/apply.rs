// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{BulkCommand, Command};
use crate::error::CoreError;
use crate::state::{
    BulkOutingRequest, BulkTransitionResult, IncomingQr, OtpCode, PassRequest, TransitionResult,
};
use gate_pass_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use gate_pass_domain::{
    ApplicationType, ApprovalFlow, ApprovalStatus, BulkOutingStatus, GateConfig, RequestWindow,
    StudentRef, VerificationStatus, validate_rejection_reason,
};

/// Creates a freshly submitted request, producing its initial state
/// and the submission audit event.
///
/// Submission is modeled separately from [`apply`] because there is no
/// prior state to transition from.
///
/// # Arguments
///
/// * `public_id` - The stable public identifier
/// * `student` - The owning student
/// * `application_type` - Leave or permission
/// * `reason` - The free-text reason
/// * `window` - The requested time window
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if the reason or window violates domain rules.
pub fn apply_submit(
    public_id: String,
    student: StudentRef,
    application_type: ApplicationType,
    reason: &str,
    window: RequestWindow,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let request: PassRequest = PassRequest::submit(
        public_id.clone(),
        student,
        application_type,
        reason,
        window,
    )?;

    let before: StateSnapshot = StateSnapshot::new(String::from("absent"));
    let after: StateSnapshot = request.to_snapshot();
    let action: Action = Action::new(
        String::from("SubmitRequest"),
        Some(format!(
            "Submitted {} request {public_id}",
            application_type.as_str()
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(actor, cause, action, before, after);

    Ok(TransitionResult {
        new_state: request,
        audit_event,
    })
}

/// Applies a command to a request, producing a new request state and
/// audit event.
///
/// The current state is never mutated. The function is pure: time
/// enters only through the instants carried by the command, so
/// replaying a command sequence is deterministic.
///
/// # Arguments
///
/// * `request` - The current request state (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `config` - Gate policy (visit ceilings, debounce, QR window)
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state and audit event
/// * `Err(CoreError)` if the command is invalid in the current state
///
/// # Errors
///
/// Returns an error if the command violates domain rules, presents a
/// wrong or missing code or token, or exceeds a gate ceiling.
#[allow(clippy::too_many_lines)]
pub fn apply(
    request: &PassRequest,
    command: Command,
    actor: Actor,
    cause: Cause,
    config: &GateConfig,
) -> Result<TransitionResult, CoreError> {
    let before: StateSnapshot = request.to_snapshot();

    match command {
        Command::UpdateDetails { reason, window } => {
            if request.is_locked_for_updates {
                return Err(CoreError::RequestLocked);
            }
            // Details are editable only before the sign-off chain starts.
            if request.approval_status != ApprovalStatus::PendingOtp {
                return Err(CoreError::RequestLocked);
            }

            let mut new_state: PassRequest = PassRequest::submit(
                request.public_id.clone(),
                request.student.clone(),
                request.application_type,
                &reason,
                window,
            )?;
            new_state.otp = request.otp.clone();
            new_state.row_version = request.row_version;

            let action: Action = Action::new(
                String::from("UpdateDetails"),
                Some(format!("Updated details of request {}", request.public_id)),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, new_state.to_snapshot());

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::IssueOtp { code, issued_at } => {
            // Codes only exist while the warden sign-off is pending.
            if request.approval_status != ApprovalStatus::PendingOtp {
                return Err(CoreError::DomainViolation(
                    gate_pass_domain::DomainError::InvalidStatusTransition {
                        from: request.approval_status.to_string(),
                        to: request.approval_status.to_string(),
                        reason: String::from("codes are only issued while awaiting verification"),
                    },
                ));
            }

            let reissued: bool = request.otp.is_some();
            let mut new_state: PassRequest = request.clone();
            new_state.otp = Some(OtpCode::new(&code, issued_at)?);

            let detail: String = if reissued {
                format!("Re-issued code for request {}", request.public_id)
            } else {
                format!("Issued code for request {}", request.public_id)
            };
            let action: Action = Action::new(String::from("IssueOtp"), Some(detail));
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, new_state.to_snapshot());

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::VerifyOtp { code, verified_at } => {
            let Some(active) = request.otp.as_ref() else {
                return Err(CoreError::NoActiveCode);
            };
            if active.code != code {
                return Err(CoreError::InvalidCode);
            }

            // A permission completes on the warden's sign-off; a leave
            // still needs the principal.
            let target: ApprovalStatus = match request.application_type.flow() {
                ApprovalFlow::SingleSignOff => ApprovalStatus::Approved,
                ApprovalFlow::DualSignOff => ApprovalStatus::WardenVerified,
            };
            request.approval_status.validate_transition(target)?;

            let mut new_state: PassRequest = request.clone();
            new_state.approval_status = target;
            new_state.otp = None;
            new_state.otp_consumed = true;
            if target == ApprovalStatus::Approved {
                new_state.is_locked_for_updates = true;
            }

            let action: Action = Action::new(
                String::from("VerifyOtp"),
                Some(format!(
                    "Code verified for request {} at {verified_at}",
                    request.public_id
                )),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, new_state.to_snapshot());

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::PrincipalApprove { approved_at } => {
            // The PendingOtp -> Approved edge belongs to the single
            // sign-off flow via VerifyOtp; the principal only acts on a
            // warden-verified leave.
            if request.approval_status != ApprovalStatus::WardenVerified {
                return Err(CoreError::DomainViolation(
                    gate_pass_domain::DomainError::InvalidStatusTransition {
                        from: request.approval_status.to_string(),
                        to: ApprovalStatus::Approved.to_string(),
                        reason: String::from("principal approval requires warden verification"),
                    },
                ));
            }
            request
                .approval_status
                .validate_transition(ApprovalStatus::Approved)?;

            let mut new_state: PassRequest = request.clone();
            new_state.approval_status = ApprovalStatus::Approved;
            new_state.is_locked_for_updates = true;

            let action: Action = Action::new(
                String::from("PrincipalApprove"),
                Some(format!(
                    "Request {} approved at {approved_at}",
                    request.public_id
                )),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, new_state.to_snapshot());

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::Reject {
            reason,
            rejected_at,
        } => {
            validate_rejection_reason(&reason)?;
            request
                .approval_status
                .validate_transition(ApprovalStatus::Rejected)?;

            let mut new_state: PassRequest = request.clone();
            new_state.approval_status = ApprovalStatus::Rejected;
            new_state.rejection_reason = Some(reason.trim().to_string());
            new_state.otp = None;
            new_state.is_locked_for_updates = true;

            let action: Action = Action::new(
                String::from("Reject"),
                Some(format!(
                    "Request {} rejected at {rejected_at}",
                    request.public_id
                )),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, new_state.to_snapshot());

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::RecordOutgoingVisit {
            scanned_at,
            scanner,
            location,
            qr_token,
        } => {
            // First scan advances verification; later scans only append
            // to the ledger. Both paths require final approval.
            if request.verification_status == VerificationStatus::NotVerified {
                request
                    .verification_status
                    .validate_transition(VerificationStatus::Verified, request.approval_status)?;
            } else if request.verification_status.is_terminal() {
                return Err(CoreError::DomainViolation(
                    gate_pass_domain::DomainError::InvalidVerificationTransition {
                        from: request.verification_status.to_string(),
                        to: VerificationStatus::Verified.to_string(),
                        reason: String::from("gate verification already closed"),
                    },
                ));
            }

            if request.outgoing_visits >= config.max_outgoing_visits {
                return Err(CoreError::VisitLimitReached {
                    direction: String::from("outgoing"),
                    limit: config.max_outgoing_visits,
                });
            }

            if let Some(last) = request.last_outgoing_scan_at {
                let elapsed = scanned_at - last;
                if elapsed < config.scan_debounce {
                    return Err(CoreError::DuplicateScan {
                        seconds_since_last: elapsed.whole_seconds(),
                    });
                }
            }

            gate_pass_domain::validate_scanner(&scanner)?;
            gate_pass_domain::validate_location(&location)?;

            let mut new_state: PassRequest = request.clone();
            new_state.verification_status = VerificationStatus::Verified;
            new_state.outgoing_visits = request.outgoing_visits + 1;
            new_state.last_outgoing_scan_at = Some(scanned_at);
            // Only leaves carry a return token. The token activated by
            // the first scan stays authoritative.
            if request.application_type == ApplicationType::Leave
                && new_state.incoming_qr.is_none()
            {
                new_state.incoming_qr = Some(IncomingQr {
                    token: qr_token,
                    generated_at: scanned_at,
                });
            }

            let action: Action = Action::new(
                String::from("RecordOutgoingVisit"),
                Some(format!(
                    "Outgoing scan {} of {} at {location} by {scanner}",
                    new_state.outgoing_visits, config.max_outgoing_visits
                )),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, new_state.to_snapshot());

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::RecordIncomingVisit {
            scanned_at,
            scanner,
            location,
            presented_token,
        } => {
            // The ceiling is reported before any transition or token
            // error so a second scan names the real cause.
            if request.incoming_visits >= config.max_incoming_visits {
                return Err(CoreError::VisitLimitReached {
                    direction: String::from("incoming"),
                    limit: config.max_incoming_visits,
                });
            }

            request
                .verification_status
                .validate_transition(VerificationStatus::Completed, request.approval_status)?;

            // Permissions carry no return token; the guard matches the
            // student against the listing instead.
            if request.application_type == ApplicationType::Leave {
                let Some(qr) = request.incoming_qr.as_ref() else {
                    return Err(CoreError::QrNotGenerated);
                };
                if qr.token != presented_token {
                    return Err(CoreError::InvalidQrToken);
                }
                if scanned_at - qr.generated_at > config.incoming_qr_window {
                    return Err(CoreError::QrExpired);
                }
            }

            gate_pass_domain::validate_scanner(&scanner)?;
            gate_pass_domain::validate_location(&location)?;

            let mut new_state: PassRequest = request.clone();
            new_state.verification_status = VerificationStatus::Completed;
            new_state.incoming_visits = request.incoming_visits + 1;

            let action: Action = Action::new(
                String::from("RecordIncomingVisit"),
                Some(format!(
                    "Incoming scan at {location} by {scanner} ({scanned_at})"
                )),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, new_state.to_snapshot());

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::SetVerificationStatus {
            new_status,
            changed_at,
            qr_token,
        } => {
            // Re-marking an already verified request succeeds without
            // change, so a gate scan and an operator edit can land in
            // either order.
            let reaffirmed: bool = new_status == VerificationStatus::Verified
                && request.verification_status == VerificationStatus::Verified;
            if !reaffirmed {
                request
                    .verification_status
                    .validate_transition(new_status, request.approval_status)?;
            }

            let mut new_state: PassRequest = request.clone();
            new_state.verification_status = new_status;
            // Marking a leave verified activates its return token, same
            // as the first outgoing scan would.
            if new_status == VerificationStatus::Verified
                && request.application_type == ApplicationType::Leave
                && new_state.incoming_qr.is_none()
            {
                new_state.incoming_qr = Some(IncomingQr {
                    token: qr_token,
                    generated_at: changed_at,
                });
            }

            let action: Action = Action::new(
                String::from("SetVerificationStatus"),
                Some(format!(
                    "Verification set to {new_status} at {changed_at} on request {}",
                    request.public_id
                )),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, new_state.to_snapshot());

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
    }
}

/// Creates a freshly submitted bulk outing and its submission audit
/// event.
///
/// # Errors
///
/// Returns an error if the purpose or window violates domain rules.
pub fn apply_submit_bulk(
    public_id: String,
    purpose: &str,
    window: RequestWindow,
    requested_by: &str,
    actor: Actor,
    cause: Cause,
) -> Result<BulkTransitionResult, CoreError> {
    let outing: BulkOutingRequest =
        BulkOutingRequest::submit(public_id.clone(), purpose, window, requested_by)?;

    let before: StateSnapshot = StateSnapshot::new(String::from("absent"));
    let after: StateSnapshot = outing.to_snapshot();
    let action: Action = Action::new(
        String::from("SubmitBulkOuting"),
        Some(format!("Submitted bulk outing {public_id}")),
    );
    let audit_event: AuditEvent = AuditEvent::new(actor, cause, action, before, after);

    Ok(BulkTransitionResult {
        new_state: outing,
        audit_event,
    })
}

/// Applies a decision to a bulk outing.
///
/// Decisions are final; a second decision of either kind fails.
///
/// # Errors
///
/// Returns `CoreError::DecisionAlreadyMade` if the outing already has
/// a final decision, or a domain violation for an invalid rejection
/// reason.
pub fn apply_bulk(
    outing: &BulkOutingRequest,
    command: BulkCommand,
    actor: Actor,
    cause: Cause,
) -> Result<BulkTransitionResult, CoreError> {
    if outing.status.is_terminal() {
        return Err(CoreError::DecisionAlreadyMade {
            status: outing.status.as_str().to_string(),
        });
    }

    let before: StateSnapshot = outing.to_snapshot();

    match command {
        BulkCommand::Approve {
            students,
            decided_at,
        } => {
            outing
                .status
                .validate_transition(BulkOutingStatus::Approved)?;

            let mut new_state: BulkOutingRequest = outing.clone();
            new_state.status = BulkOutingStatus::Approved;
            new_state.students = Some(students);
            new_state.decided_at = Some(decided_at);

            let action: Action = Action::new(
                String::from("ApproveBulkOuting"),
                Some(format!(
                    "Bulk outing {} approved covering {} students",
                    outing.public_id,
                    new_state.students.as_ref().map_or(0, Vec::len)
                )),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, new_state.to_snapshot());

            Ok(BulkTransitionResult {
                new_state,
                audit_event,
            })
        }
        BulkCommand::Reject { reason, decided_at } => {
            validate_rejection_reason(&reason)?;
            outing
                .status
                .validate_transition(BulkOutingStatus::Rejected)?;

            let mut new_state: BulkOutingRequest = outing.clone();
            new_state.status = BulkOutingStatus::Rejected;
            new_state.rejection_reason = Some(reason.trim().to_string());
            new_state.decided_at = Some(decided_at);

            let action: Action = Action::new(
                String::from("RejectBulkOuting"),
                Some(format!("Bulk outing {} rejected", outing.public_id)),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, new_state.to_snapshot());

            Ok(BulkTransitionResult {
                new_state,
                audit_event,
            })
        }
    }
}
