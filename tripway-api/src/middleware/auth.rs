use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::state::AppState;
use tripway_domain::Session;

// ============================================================================
// JWT Claims
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}

/// The session attached to the current request, if any. Every handler can
/// extract this; guards decide what absence means for their route.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<Session>);

/// Build a session from a bearer token. Anything wrong with the token
/// (bad signature, expired, unknown role, malformed subject) collapses to
/// `None`: an unverifiable caller is an anonymous caller.
pub fn session_from_token(token: &str, secret: &str) -> Option<Session> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| debug!("Token rejected: {}", e))
    .ok()?;

    let claims = token_data.claims;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|e| debug!("Token subject rejected: {}", e))
        .ok()?;
    let role = claims
        .role
        .parse()
        .map_err(|e| debug!("Token role rejected: {}", e))
        .ok()?;

    Some(Session { user_id, email: claims.email, role })
}

/// Resolve the Authorization header into a `CurrentSession` extension.
/// Never rejects by itself; route guards downstream do the enforcement.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let session = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .and_then(|token| session_from_token(token, &state.auth.secret));

    req.extensions_mut().insert(CurrentSession(session));

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use tripway_domain::UserRole;

    const SECRET: &str = "test-secret";

    fn make_token(sub: &str, role: &str, exp_offset: Duration) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            email: "user@example.com".to_string(),
            role: role.to_string(),
            exp: (Utc::now() + exp_offset).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    #[test]
    fn test_valid_token_yields_session() {
        let id = Uuid::new_v4();
        let token = make_token(&id.to_string(), "DRIVER", Duration::hours(1));

        let session = session_from_token(&token, SECRET).unwrap();
        assert_eq!(session.user_id, id);
        assert_eq!(session.role, UserRole::Driver);
    }

    #[test]
    fn test_expired_token_fails_closed() {
        let token = make_token(&Uuid::new_v4().to_string(), "CLIENT", Duration::hours(-1));
        assert!(session_from_token(&token, SECRET).is_none());
    }

    #[test]
    fn test_wrong_secret_fails_closed() {
        let token = make_token(&Uuid::new_v4().to_string(), "CLIENT", Duration::hours(1));
        assert!(session_from_token(&token, "other-secret").is_none());
    }

    #[test]
    fn test_unknown_role_fails_closed() {
        let token = make_token(&Uuid::new_v4().to_string(), "SUPER_ADMIN", Duration::hours(1));
        assert!(session_from_token(&token, SECRET).is_none());
    }

    #[test]
    fn test_garbage_subject_fails_closed() {
        let token = make_token("not-a-uuid", "CLIENT", Duration::hours(1));
        assert!(session_from_token(&token, SECRET).is_none());
    }
}
