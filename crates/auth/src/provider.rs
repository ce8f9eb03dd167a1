//! Identity provider boundary.
//!
//! Authentication is injected: the service never embeds credential literals
//! in handlers. Swapping the trait implementation moves the deployment to a
//! directory or database without touching the API layer.

use thiserror::Error;

use crate::{PrincipalId, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
}

/// An authenticated identity with its role claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub principal_id: PrincipalId,
    pub username: String,
    pub display_name: String,
    pub roles: Vec<Role>,
}

pub trait IdentityProvider: Send + Sync {
    fn authenticate(&self, username: &str, password: &str)
        -> Result<AuthenticatedUser, AuthError>;
}

/// One configured account for the static provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
    pub display_name: String,
    pub roles: Vec<Role>,
}

/// In-memory provider over an injected account list.
///
/// Suitable for single-box deployments with a handful of accounts.
pub struct StaticIdentityProvider {
    users: Vec<(PrincipalId, UserRecord)>,
}

impl StaticIdentityProvider {
    pub fn new(users: Vec<UserRecord>) -> Self {
        // Principal ids are minted once at construction so a user keeps the
        // same identity across logins within a process lifetime.
        Self {
            users: users
                .into_iter()
                .map(|user| (PrincipalId::new(), user))
                .collect(),
        }
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        self.users
            .iter()
            .find(|(_, user)| user.username == username && user.password == password)
            .map(|(principal_id, user)| AuthenticatedUser {
                principal_id: *principal_id,
                username: user.username.clone(),
                display_name: user.display_name.clone(),
                roles: user.roles.clone(),
            })
            .ok_or(AuthError::InvalidCredentials)
    }
}
