// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Permission levels and capability-based authorization.
//!
//! Operators are hostel staff and gate personnel, never students.
//! Each operator carries one [`PermissionLevel`]; every API operation
//! names the [`GateCapability`] it exercises, and authorization is a
//! pure function of the two.

use std::collections::HashMap;

use gate_pass_audit::Actor;

use crate::error::ApiError;

/// Access level assigned to an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionLevel {
    /// No access at all.
    None,
    /// Read access plus outgoing gate scans.
    ///
    /// Gate staff on view level can send students out but cannot
    /// close the verification cycle or touch approvals.
    View,
    /// Full access to every capability.
    Full,
}

impl PermissionLevel {
    /// Returns the string representation used in audit attribution.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::View => "view",
            Self::Full => "full",
        }
    }

    /// Returns true if this level permits the given capability.
    #[must_use]
    pub const fn permits(self, capability: GateCapability) -> bool {
        match self {
            Self::None => false,
            Self::Full => true,
            Self::View => matches!(
                capability,
                GateCapability::ViewRequests | GateCapability::RecordOutgoingVisit
            ),
        }
    }
}

/// The distinct actions the API surface exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateCapability {
    /// Read requests, listings, and bulk outings.
    ViewRequests,
    /// Submit a new request on a student's behalf.
    SubmitRequest,
    /// Replace the editable details of a pending request.
    UpdateDetails,
    /// Issue or re-issue a one-time code.
    IssueOtp,
    /// Read the cleartext of the active one-time code.
    RevealOtp,
    /// Verify a supplied one-time code.
    VerifyOtp,
    /// Grant the principal's final approval.
    PrincipalApprove,
    /// Reject a request.
    Reject,
    /// Record an outgoing gate scan.
    RecordOutgoingVisit,
    /// Record an incoming gate scan.
    RecordIncomingVisit,
    /// Set a verification outcome directly.
    SetVerificationStatus,
    /// Submit a bulk outing.
    SubmitBulkOuting,
    /// Decide a pending bulk outing.
    DecideBulkOuting,
}

impl GateCapability {
    /// Returns the action name used in forbidden-error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ViewRequests => "view_requests",
            Self::SubmitRequest => "submit_request",
            Self::UpdateDetails => "update_details",
            Self::IssueOtp => "issue_otp",
            Self::RevealOtp => "reveal_otp",
            Self::VerifyOtp => "verify_otp",
            Self::PrincipalApprove => "principal_approve",
            Self::Reject => "reject",
            Self::RecordOutgoingVisit => "record_outgoing_visit",
            Self::RecordIncomingVisit => "record_incoming_visit",
            Self::SetVerificationStatus => "set_verification_status",
            Self::SubmitBulkOuting => "submit_bulk_outing",
            Self::DecideBulkOuting => "decide_bulk_outing",
        }
    }
}

/// An authenticated operator with an assigned permission level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedOperator {
    /// The unique identifier for this operator.
    pub id: String,
    /// The permission level assigned to this operator.
    pub level: PermissionLevel,
}

impl AuthenticatedOperator {
    /// Creates a new authenticated operator.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this operator
    /// * `level` - The permission level assigned to this operator
    #[must_use]
    pub const fn new(id: String, level: PermissionLevel) -> Self {
        Self { id, level }
    }

    /// Converts this operator into an audit Actor.
    ///
    /// This is used when recording audit events to attribute actions
    /// to the operator.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), String::from(self.level.as_str()))
    }
}

/// Source of permission levels for operator ids.
///
/// The static implementation below covers tests and single-node
/// deployments; an identity-provider-backed implementation slots in
/// behind the same trait.
pub trait PermissionService {
    /// Returns the permission level assigned to an operator id.
    fn level_for(&self, operator_id: &str) -> PermissionLevel;
}

/// In-memory permission table with a default level for unknown ids.
#[derive(Debug, Clone)]
pub struct StaticPermissionService {
    levels: HashMap<String, PermissionLevel>,
    default_level: PermissionLevel,
}

impl StaticPermissionService {
    /// Creates a permission table where unknown ids receive
    /// `default_level`.
    #[must_use]
    pub fn new(default_level: PermissionLevel) -> Self {
        Self {
            levels: HashMap::new(),
            default_level,
        }
    }

    /// Assigns a level to an operator id, replacing any prior grant.
    pub fn grant(&mut self, operator_id: &str, level: PermissionLevel) {
        self.levels.insert(operator_id.to_string(), level);
    }
}

impl PermissionService for StaticPermissionService {
    fn level_for(&self, operator_id: &str) -> PermissionLevel {
        self.levels
            .get(operator_id)
            .copied()
            .unwrap_or(self.default_level)
    }
}

/// Authorization service enforcing capability checks.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that an operator's level permits a capability.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Forbidden` naming the attempted action if
    /// the operator's level does not permit it.
    pub fn authorize(
        operator: &AuthenticatedOperator,
        capability: GateCapability,
    ) -> Result<(), ApiError> {
        if operator.level.permits(capability) {
            Ok(())
        } else {
            Err(ApiError::Forbidden {
                action: String::from(capability.as_str()),
                required: String::from(
                    match capability {
                        GateCapability::ViewRequests | GateCapability::RecordOutgoingVisit => {
                            PermissionLevel::View
                        }
                        _ => PermissionLevel::Full,
                    }
                    .as_str(),
                ),
            })
        }
    }
}
