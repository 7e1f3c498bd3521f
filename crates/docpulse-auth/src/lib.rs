//! Authentication for the docpulse backend
//!
//! Session tokens are JWTs signed with a shared HMAC secret; account
//! passwords are stored as Argon2id hashes.

pub mod jwt;
pub mod password;

pub use jwt::{JwtClaims, JwtError, JwtValidator, PrincipalKind, SESSION_TOKEN_TYPE};
pub use password::{hash_password, verify_password, PasswordError};
