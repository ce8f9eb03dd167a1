//! `depot-auth` — authentication/authorization boundary.
//!
//! Intentionally decoupled from HTTP and storage: the API layer injects an
//! [`IdentityProvider`] and a [`SessionCodec`], and route handlers call the
//! pure [`authorize`] policy check.

pub mod authorize;
pub mod claims;
pub mod permissions;
pub mod principal;
pub mod provider;
pub mod roles;
pub mod token;

pub use authorize::{authorize, role_permissions, AuthzError, Principal};
pub use claims::{validate_claims, SessionClaims, TokenValidationError};
pub use permissions::Permission;
pub use principal::PrincipalId;
pub use provider::{
    AuthError, AuthenticatedUser, IdentityProvider, StaticIdentityProvider, UserRecord,
};
pub use roles::Role;
pub use token::{Hs256SessionCodec, SessionCodec, TokenError};
