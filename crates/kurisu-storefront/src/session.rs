//! # Session
//!
//! The signed-in shopper or seller. Passed explicitly to anything that talks
//! to authenticated endpoints.

use kurisu_core::seller::{Role, User};
use serde::Deserialize;
use tracing::debug;

use crate::error::{StorefrontError, StorefrontResult};

/// A signed-in account together with its bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// The login endpoint's response body.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: LoginUser,
}

#[derive(Debug, Deserialize)]
struct LoginUser {
    id: i64,
    user_name: String,
    email: String,
    rol_id: i64,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Session {
            token: token.into(),
            user,
        }
    }

    /// Builds a session from the login endpoint's JSON body.
    pub fn from_login_response(body: &str) -> StorefrontResult<Self> {
        let response: LoginResponse = serde_json::from_str(body)?;
        let user = User {
            id: response.user.id,
            user_name: response.user.user_name,
            email: response.user.email,
            role: Role::from_rol_id(response.user.rol_id),
        };
        debug!(user_id = user.id, role = ?user.role, "Session established");
        Ok(Session::new(response.token, user))
    }

    /// The `Authorization` header value for this session.
    pub fn bearer_header(&self) -> StorefrontResult<String> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(StorefrontError::Unauthenticated);
        }
        Ok(format!("Bearer {}", token))
    }
}

/// Unwraps an optional session, failing with `Unauthenticated` when absent.
pub fn require_session(session: Option<&Session>) -> StorefrontResult<&Session> {
    session.ok_or(StorefrontError::Unauthenticated)
}
