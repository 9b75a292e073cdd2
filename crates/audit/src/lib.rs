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
    clippy::all
)]

use gate_pass_domain::{DomainError, validate_location, validate_scanner};
use time::OffsetDateTime;

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change:
/// a student, a warden, a gate scanner, or the system itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "student", "warden", "gate", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// Represents the reason or trigger for an action.
///
/// A cause describes why a state change was initiated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID, scan ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`IssueOtp`", "`PrincipalApprove`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A snapshot of observable state at a point in time.
///
/// Producers format the fields that matter for their transition (for a
/// pass request, both status axes) so an audit event always shows the
/// full observable state around a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `data` - A string representation of the state
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful state change must produce exactly one audit event.
/// Audit events are immutable once created and capture:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The state before the transition (before)
/// - The state after the transition (after)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            actor,
            cause,
            action,
            before,
            after,
        }
    }
}

/// Direction of a physical gate crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitDirection {
    /// Student leaving the campus.
    Outgoing,
    /// Student returning to the campus.
    Incoming,
}

impl VisitDirection {
    /// Returns the string representation used in storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Outgoing => "outgoing",
            Self::Incoming => "incoming",
        }
    }

    /// Parses a stored direction string.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidScanner` with the offending value if
    /// the direction is not recognized.
    pub fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "outgoing" => Ok(Self::Outgoing),
            "incoming" => Ok(Self::Incoming),
            other => Err(DomainError::InvalidScanner(format!(
                "Unknown visit direction: {other}"
            ))),
        }
    }
}

/// One entry in the append-only gate visit ledger.
///
/// Visit events are never updated or deleted; counters on the owning
/// request are derived by counting them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitEvent {
    /// The direction of the crossing.
    pub direction: VisitDirection,
    /// When the scan was recorded.
    pub scanned_at: OffsetDateTime,
    /// Identity of the scanning station or guard.
    pub scanner: String,
    /// Physical gate location.
    pub location: String,
}

impl VisitEvent {
    /// Creates a new `VisitEvent`, validating its recorded fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the scanner identity or the gate location is
    /// empty.
    pub fn new(
        direction: VisitDirection,
        scanned_at: OffsetDateTime,
        scanner: &str,
        location: &str,
    ) -> Result<Self, DomainError> {
        validate_scanner(scanner)?;
        validate_location(location)?;
        Ok(Self {
            direction,
            scanned_at,
            scanner: scanner.trim().to_string(),
            location: location.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_actor_creation_requires_all_fields() {
        let actor: Actor = Actor::new(String::from("warden-7"), String::from("warden"));

        assert_eq!(actor.id, "warden-7");
        assert_eq!(actor.actor_type, "warden");
    }

    #[test]
    fn test_cause_creation_requires_all_fields() {
        let cause: Cause = Cause::new(String::from("req-456"), String::from("Warden approval"));

        assert_eq!(cause.id, "req-456");
        assert_eq!(cause.description, "Warden approval");
    }

    #[test]
    fn test_action_creation_with_and_without_details() {
        let bare: Action = Action::new(String::from("IssueOtp"), None);
        assert_eq!(bare.name, "IssueOtp");
        assert_eq!(bare.details, None);

        let detailed: Action = Action::new(
            String::from("Reject"),
            Some(String::from("Pending dues")),
        );
        assert_eq!(detailed.details, Some(String::from("Pending dues")));
    }

    #[test]
    fn test_state_snapshot_creation() {
        let snapshot: StateSnapshot =
            StateSnapshot::new(String::from("approval=approved,verification=verified"));

        assert_eq!(snapshot.data, "approval=approved,verification=verified");
    }

    #[test]
    fn test_audit_event_creation_requires_all_fields() {
        let actor: Actor = Actor::new(String::from("warden-7"), String::from("warden"));
        let cause: Cause = Cause::new(String::from("req-456"), String::from("Warden approval"));
        let action: Action = Action::new(String::from("PrincipalApprove"), None);
        let before: StateSnapshot = StateSnapshot::new(String::from(
            "approval=warden_verified,verification=not_verified",
        ));
        let after: StateSnapshot =
            StateSnapshot::new(String::from("approval=approved,verification=not_verified"));

        let event: AuditEvent = AuditEvent::new(
            actor.clone(),
            cause.clone(),
            action.clone(),
            before.clone(),
            after.clone(),
        );

        assert_eq!(event.actor, actor);
        assert_eq!(event.cause, cause);
        assert_eq!(event.action, action);
        assert_eq!(event.before, before);
        assert_eq!(event.after, after);
    }

    #[test]
    fn test_visit_direction_round_trip() {
        assert_eq!(VisitDirection::Outgoing.as_str(), "outgoing");
        assert_eq!(
            VisitDirection::parse_str("incoming").ok(),
            Some(VisitDirection::Incoming)
        );
        assert!(VisitDirection::parse_str("sideways").is_err());
    }

    #[test]
    fn test_visit_event_validates_fields() {
        let at = datetime!(2026-03-02 03:30 UTC);
        let event =
            VisitEvent::new(VisitDirection::Outgoing, at, " guard-station-1 ", "Main Gate")
                .ok()
                .unwrap();
        assert_eq!(event.scanner, "guard-station-1");
        assert_eq!(event.location, "Main Gate");

        assert!(VisitEvent::new(VisitDirection::Outgoing, at, "", "Main Gate").is_err());
        assert!(VisitEvent::new(VisitDirection::Incoming, at, "guard", "  ").is_err());
    }
}
