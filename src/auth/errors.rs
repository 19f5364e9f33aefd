//! # Auth Errors
//!
//! Error types for bearer-credential verification.

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Identity verification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    // ==================
    // Credential Errors
    // ==================
    /// No `Authorization` header on the request
    #[error("Missing authorization header")]
    MissingCredential,

    /// Header present but not a bearer credential
    #[error("Malformed authorization header")]
    MalformedCredential,

    // ==================
    // Token Errors
    // ==================
    /// Token is not a decodable JWT
    #[error("Malformed token")]
    MalformedToken,

    /// Token has expired
    #[error("Token expired")]
    TokenExpired,

    /// Token signature is invalid
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token lacks an email claim
    #[error("Token carries no email")]
    MissingEmail,

    /// Identity provider marked the email as unverified
    #[error("Email not verified")]
    EmailNotVerified,

    // ==================
    // Internal Errors
    // ==================
    /// Token generation failed
    #[error("Internal error: token generation failed")]
    TokenGenerationFailed,
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::TokenGenerationFailed => 500,
            _ => 401,
        }
    }
}
