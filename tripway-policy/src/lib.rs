pub mod access;
pub mod cancellation;
pub mod guard;

pub use access::{has_permission, role_permissions, AccessDefault, RoutePolicy};
pub use cancellation::{can_cancel, can_cancel_str, refund_amount, refund_percent};
pub use guard::{decide, GuardDecision, RouteRequirement};
