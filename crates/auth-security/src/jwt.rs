//! JWT token handling
//!
//! [`TokenCodec`] is the only place that knows the wire form of [`Claims`]:
//! a compact HS256 JWT (`header.payload.signature`). Every check takes the
//! current time as an argument so decoding stays a pure function of
//! (token, secret, now).

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use auth_shared::constants::MIN_SECRET_BYTES;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Signing secret is {actual} bytes, at least {minimum} required")]
    WeakSecret { actual: usize, minimum: usize },
    #[error("Token lifetime must be positive, got {0}s")]
    InvalidLifetime(i64),
    #[error("Token is malformed")]
    Malformed,
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Token expired")]
    Expired,
    #[error("Token creation failed: {0}")]
    CreationError(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            // Segment count, base64, utf-8, JSON, missing claims.
            _ => TokenError::Malformed,
        }
    }
}

/// Claims carried by both access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    pub email: String,
    /// Epoch seconds of the login (or refresh) that started this session.
    pub session_start: i64,
    pub iat: i64,
    /// Cryptographic expiry, epoch seconds.
    pub exp: i64,
}

impl Claims {
    pub fn new(subject: &str, email: &str, lifetime_secs: i64, now: i64) -> Result<Self, TokenError> {
        if lifetime_secs <= 0 {
            return Err(TokenError::InvalidLifetime(lifetime_secs));
        }
        let exp = now
            .checked_add(lifetime_secs)
            .ok_or(TokenError::InvalidLifetime(lifetime_secs))?;

        Ok(Self {
            sub: subject.to_string(),
            email: email.to_string(),
            session_start: now,
            iat: now,
            exp,
        })
    }
}

/// Signs and verifies tokens with one shared HMAC secret.
#[derive(Clone)]
pub struct TokenCodec {
    header: Header,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Fails when the secret is shorter than HS256's 256-bit key size.
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        let key = secret.as_bytes();
        if key.len() < MIN_SECRET_BYTES {
            return Err(TokenError::WeakSecret {
                actual: key.len(),
                minimum: MIN_SECRET_BYTES,
            });
        }

        // Expiry is checked against the caller's clock in `decode`, not the system one.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            header: Header::new(ALGORITHM),
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            validation,
        })
    }

    /// Issue a token whose session starts now and whose signature expires
    /// `lifetime_secs` from now.
    pub fn issue(
        &self,
        subject: &str,
        email: &str,
        lifetime_secs: i64,
        now: i64,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(subject, email, lifetime_secs, now)?;
        self.encode(&claims)
    }

    /// Sign an arbitrary claim set.
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&self.header, claims, &self.encoding_key)
            .map_err(|e| TokenError::CreationError(e.to_string()))
    }

    /// Verify the signature and structure, then the cryptographic expiry:
    /// a token is expired once `now > exp`.
    pub fn decode(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if claims.exp < claims.session_start {
            return Err(TokenError::Malformed);
        }
        if now > claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.header.alg)
            .finish_non_exhaustive()
    }
}
