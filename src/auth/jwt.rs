//! # JWT Identity Verifier
//!
//! HS256 JSON Web Token validation. The verified identity is the token's
//! `email` claim.
//!
//! Validation is stateless: signature, expiry, issuer and audience are checked
//! without any store lookup.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};
use super::identity::{IdentityVerifier, VerifiedIdentity};

/// JWT claims for bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user identifier at the identity provider)
    pub sub: String,

    /// User's email
    #[serde(default)]
    pub email: Option<String>,

    /// Issued at timestamp (Unix epoch seconds)
    pub iat: i64,

    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,

    /// Audience
    pub aud: String,

    /// Issuer
    pub iss: String,

    /// Whether the provider verified the email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_verified: Option<bool>,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared signing secret
    pub secret: String,

    /// Lifetime of tokens minted by `issue_token`
    pub token_ttl: Duration,

    /// Issuer identifier
    pub issuer: String,

    /// Audience identifier
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "CHANGE_THIS_SECRET_IN_PRODUCTION".to_string(),
            token_ttl: Duration::hours(1),
            issuer: "foodlovers".to_string(),
            audience: "foodlovers".to_string(),
        }
    }
}

/// Verifies (and, for local tooling, issues) HS256 bearer tokens
#[derive(Clone)]
pub struct JwtVerifier {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtVerifier {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Mint a token attesting `email`
    pub fn issue_token(&self, email: &str) -> AuthResult<String> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.config.token_ttl)
            .ok_or(AuthError::TokenGenerationFailed)?;

        let claims = JwtClaims {
            sub: email.to_string(),
            email: Some(email.to_string()),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            aud: self.config.audience.clone(),
            iss: self.config.issuer.clone(),
            email_verified: Some(true),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)
    }

    /// Validate a token and extract its claims
    pub fn validate_token(&self, token: &str) -> AuthResult<JwtClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);

        let token_data =
            decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AuthError::InvalidSignature
                    }
                    _ => AuthError::MalformedToken,
                }
            })?;

        Ok(token_data.claims)
    }
}

impl IdentityVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> AuthResult<VerifiedIdentity> {
        let claims = self.validate_token(token)?;

        if claims.email_verified == Some(false) {
            return Err(AuthError::EmailNotVerified);
        }

        match claims.email {
            Some(email) if !email.trim().is_empty() => Ok(VerifiedIdentity::new(email)),
            _ => Err(AuthError::MissingEmail),
        }
    }
}
