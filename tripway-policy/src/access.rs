//! Role and permission tables.
//!
//! Permissions are flat strings (`"booking:cancel:own"`); each role owns a
//! static slice, so the set a role holds is checked exhaustively at compile
//! time by the `match`. Route access is OR-of-any-one: holding a single
//! permission from a route's requirement list is enough.

use serde::Deserialize;
use tripway_domain::UserRole;

const CLIENT_PERMISSIONS: &[&str] = &[
    "booking:create",
    "booking:view:own",
    "booking:cancel:own",
    "payment:make",
    "profile:edit",
];

const DRIVER_PERMISSIONS: &[&str] = &[
    "booking:create",
    "booking:view:own",
    "booking:view:assigned",
    "booking:cancel:own",
    "payment:make",
    "profile:edit",
    "car:manage",
    "availability:manage",
];

const ADMIN_PERMISSIONS: &[&str] = &[
    "admin:access",
    "booking:view:all",
    "booking:manage",
    "booking:cancel:any",
    "driver:verify",
    "user:manage",
    "hotel:manage",
    "car:manage",
    "report:view",
];

/// The static permission set for a role.
pub fn role_permissions(role: UserRole) -> &'static [&'static str] {
    match role {
        UserRole::Client => CLIENT_PERMISSIONS,
        UserRole::Driver => DRIVER_PERMISSIONS,
        UserRole::Admin => ADMIN_PERMISSIONS,
    }
}

pub fn has_permission(role: UserRole, permission: &str) -> bool {
    role_permissions(role).contains(&permission)
}

/// What `RoutePolicy` does when no rule matches a route.
///
/// The platform historically let unmatched routes through (only routes that
/// name a permission are gated), so `Allow` is the shipped default. Deploys
/// that want a closed perimeter flip this to `Deny` in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessDefault {
    #[default]
    Allow,
    Deny,
}

#[derive(Debug, Clone)]
struct RouteRule {
    prefix: &'static str,
    /// Any one of these grants access.
    required: &'static [&'static str],
}

/// Route-level access table. A route matches a rule when it equals the
/// rule's prefix or sits underneath it (`/admin/drivers` matches `/admin`);
/// the most specific matching rule wins.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    default: AccessDefault,
    rules: Vec<RouteRule>,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::new(AccessDefault::Allow)
    }
}

impl RoutePolicy {
    pub fn new(default: AccessDefault) -> Self {
        Self {
            default,
            rules: vec![
                RouteRule { prefix: "/admin/drivers", required: &["driver:verify"] },
                RouteRule { prefix: "/admin", required: &["admin:access"] },
                RouteRule { prefix: "/driver", required: &["car:manage", "booking:view:assigned"] },
                RouteRule { prefix: "/bookings", required: &["booking:view:own", "booking:view:all"] },
                RouteRule { prefix: "/checkout", required: &["payment:make"] },
            ],
        }
    }

    fn matching_rule(&self, route: &str) -> Option<&RouteRule> {
        self.rules
            .iter()
            .filter(|rule| {
                route == rule.prefix
                    || (route.starts_with(rule.prefix)
                        && route.as_bytes().get(rule.prefix.len()) == Some(&b'/'))
            })
            .max_by_key(|rule| rule.prefix.len())
    }

    /// Permission list gating `route`, if any rule matches it.
    pub fn required_permissions(&self, route: &str) -> Option<&'static [&'static str]> {
        self.matching_rule(route).map(|rule| rule.required)
    }

    pub fn default_allows(&self) -> bool {
        self.default == AccessDefault::Allow
    }

    /// True iff `role` holds at least one of the matched rule's permissions.
    /// Unmatched routes follow the configured default.
    pub fn can_access(&self, role: UserRole, route: &str) -> bool {
        match self.matching_rule(route) {
            Some(rule) => rule.required.iter().any(|p| has_permission(role, p)),
            None => self.default == AccessDefault::Allow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_can_verify_drivers() {
        assert!(has_permission(UserRole::Admin, "driver:verify"));
        assert!(!has_permission(UserRole::Client, "driver:verify"));
        assert!(!has_permission(UserRole::Driver, "driver:verify"));
    }

    #[test]
    fn test_booking_management_is_admin_only() {
        assert!(has_permission(UserRole::Admin, "booking:manage"));
        assert!(!has_permission(UserRole::Client, "booking:manage"));
        assert!(!has_permission(UserRole::Driver, "booking:manage"));
    }

    #[test]
    fn test_unknown_permission_is_denied() {
        assert!(!has_permission(UserRole::Admin, "booking:teleport"));
    }

    #[test]
    fn test_has_permission_is_pure() {
        // same inputs, same answer
        assert_eq!(
            has_permission(UserRole::Driver, "car:manage"),
            has_permission(UserRole::Driver, "car:manage"),
        );
    }

    #[test]
    fn test_route_requires_any_one_permission() {
        let policy = RoutePolicy::default();
        // /bookings wants view:own OR view:all; clients hold the former
        assert!(policy.can_access(UserRole::Client, "/bookings"));
        assert!(policy.can_access(UserRole::Admin, "/bookings"));
    }

    #[test]
    fn test_admin_routes_gated() {
        let policy = RoutePolicy::default();
        assert!(policy.can_access(UserRole::Admin, "/admin"));
        assert!(!policy.can_access(UserRole::Client, "/admin"));
        assert!(!policy.can_access(UserRole::Driver, "/admin/drivers"));
    }

    #[test]
    fn test_most_specific_rule_wins() {
        let policy = RoutePolicy::default();
        // /admin/drivers requires driver:verify specifically, which only
        // admins hold; /admin/reports falls back to the /admin rule.
        assert!(policy.can_access(UserRole::Admin, "/admin/drivers/123"));
        assert!(policy.can_access(UserRole::Admin, "/admin/reports"));
    }

    #[test]
    fn test_unmatched_route_follows_default() {
        let open = RoutePolicy::new(AccessDefault::Allow);
        assert!(open.can_access(UserRole::Client, "/unknown/route"));

        let closed = RoutePolicy::new(AccessDefault::Deny);
        assert!(!closed.can_access(UserRole::Client, "/unknown/route"));
        // gated routes behave the same under either default
        assert!(closed.can_access(UserRole::Admin, "/admin"));
    }

    #[test]
    fn test_prefix_must_match_on_segment_boundary() {
        let policy = RoutePolicy::new(AccessDefault::Deny);
        // /administrator is not under /admin
        assert!(!policy.can_access(UserRole::Admin, "/administrator"));
    }
}
