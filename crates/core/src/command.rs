// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use gate_pass_domain::{RequestWindow, StudentRef, VerificationStatus};
use time::OffsetDateTime;

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request state changes on a pass
/// request. Applying a command never mutates in place; it produces a
/// new request value plus an audit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the editable details of a request that has not yet
    /// entered the sign-off chain.
    UpdateDetails {
        /// The new reason text.
        reason: String,
        /// The new time window.
        window: RequestWindow,
    },
    /// Issue (or re-issue) the warden's one-time code.
    ///
    /// At most one code is active at a time; issuing replaces any
    /// previously active code.
    IssueOtp {
        /// The four-digit code to activate.
        code: String,
        /// When the code was issued.
        issued_at: OffsetDateTime,
    },
    /// Consume the active one-time code, recording the warden sign-off.
    ///
    /// For a permission this is the only sign-off and finalizes
    /// approval; for a leave it advances to the principal's queue.
    VerifyOtp {
        /// The code presented by the warden.
        code: String,
        /// When verification happened.
        verified_at: OffsetDateTime,
    },
    /// Record the principal's sign-off on a warden-verified leave.
    PrincipalApprove {
        /// When the approval was recorded.
        approved_at: OffsetDateTime,
    },
    /// Reject the request. Terminal.
    Reject {
        /// The mandatory rejection reason.
        reason: String,
        /// When the rejection was recorded.
        rejected_at: OffsetDateTime,
    },
    /// Record an outgoing gate scan.
    ///
    /// The first outgoing scan marks the request gate-verified and
    /// activates the incoming QR token supplied here.
    RecordOutgoingVisit {
        /// When the scan was recorded.
        scanned_at: OffsetDateTime,
        /// Identity of the scanning station or guard.
        scanner: String,
        /// Physical gate location.
        location: String,
        /// Token to activate for the return scan. Ignored when a token
        /// is already active.
        qr_token: String,
    },
    /// Record an incoming (return) gate scan against the active QR
    /// token. Completes gate verification.
    RecordIncomingVisit {
        /// When the scan was recorded.
        scanned_at: OffsetDateTime,
        /// Identity of the scanning station or guard.
        scanner: String,
        /// Physical gate location.
        location: String,
        /// The token presented at the gate.
        presented_token: String,
    },
    /// Directly set the gate verification status.
    ///
    /// Operator-only path; `Expired` can only be reached this way.
    SetVerificationStatus {
        /// The requested verification status.
        new_status: VerificationStatus,
        /// When the change was recorded.
        changed_at: OffsetDateTime,
        /// Token to activate when this change marks a leave as verified
        /// and no token is active yet. Ignored otherwise.
        qr_token: String,
    },
}

/// A command targeting a bulk outing request.
///
/// Bulk outings carry no one-time code and a single decision that is
/// final once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkCommand {
    /// Approve the outing, capturing the covered students.
    Approve {
        /// Snapshot of the students covered by this outing, captured
        /// at decision time.
        students: Vec<StudentRef>,
        /// When the decision was recorded.
        decided_at: OffsetDateTime,
    },
    /// Reject the outing. Terminal.
    Reject {
        /// The mandatory rejection reason.
        reason: String,
        /// When the decision was recorded.
        decided_at: OffsetDateTime,
    },
}
