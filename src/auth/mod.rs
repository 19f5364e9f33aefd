//! # Auth Module
//!
//! Bearer-credential parsing and identity verification. A request's verified
//! identity is the email attested by an [`IdentityVerifier`]; the bundled
//! implementation validates HS256 JWTs.

pub mod errors;
pub mod identity;
pub mod jwt;

pub use errors::{AuthError, AuthResult};
pub use identity::{parse_bearer, IdentityVerifier, VerifiedIdentity};
pub use jwt::{JwtClaims, JwtConfig, JwtVerifier};
