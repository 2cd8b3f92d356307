use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Client,
    Driver,
    Admin,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Client => "CLIENT",
            UserRole::Driver => "DRIVER",
            UserRole::Admin => "ADMIN",
        }
    }

    /// Where a logged-in user lands when they hit a route their role
    /// cannot access: admins and drivers go to their dashboards, everyone
    /// else to the public home page.
    pub fn landing_route(self) -> &'static str {
        match self {
            UserRole::Admin => "/admin",
            UserRole::Driver => "/driver",
            UserRole::Client => "/",
        }
    }
}

/// Unknown role strings do not parse. Callers treat a parse failure as a
/// role holding no permissions at all.
impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLIENT" => Ok(UserRole::Client),
            "DRIVER" => Ok(UserRole::Driver),
            "ADMIN" => Ok(UserRole::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    /// Set by an admin once the driver's documents check out.
    pub driver_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// The resolved identity behind a request. Built from a validated token;
/// immutable and passed by value to permission and guard checks so there is
/// no process-wide session singleton.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
}
