//! Route-guard decisions, kept pure so the same logic serves HTTP
//! middleware and tests alike. The caller resolves the session first; a
//! failed session lookup is passed in as `None` (fail closed).

use serde::Serialize;
use tripway_domain::{Session, UserRole};

/// What a route demands before it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRequirement {
    /// Anyone, signed in or not.
    Public,
    /// Any signed-in user.
    Authenticated,
    /// A signed-in user holding this exact role.
    Role(UserRole),
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "decision")]
pub enum GuardDecision {
    Allow,
    /// Send to the login page, remembering where the user was headed.
    RedirectToLogin { return_to: String },
    /// Signed in, wrong role: send to that role's own landing route.
    RedirectTo { route: String },
}

pub fn decide(
    session: Option<&Session>,
    route: &str,
    requirement: RouteRequirement,
) -> GuardDecision {
    match requirement {
        RouteRequirement::Public => GuardDecision::Allow,
        RouteRequirement::Authenticated => match session {
            Some(_) => GuardDecision::Allow,
            None => GuardDecision::RedirectToLogin { return_to: route.to_string() },
        },
        RouteRequirement::Role(required) => match session {
            None => GuardDecision::RedirectToLogin { return_to: route.to_string() },
            Some(s) if s.role == required => GuardDecision::Allow,
            Some(s) => GuardDecision::RedirectTo { route: s.role.landing_route().to_string() },
        },
    }
}
