use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, MAX_TOKEN_TTL_SECS},
    error::ApiError,
    models::Role,
};

/// Principal
///
/// The authenticated identity of a request, rebuilt from the credential on
/// every call. Nothing about it is stored server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub subject_id: Uuid,
    pub role: Role,
}

impl Principal {
    pub fn new(subject_id: Uuid, role: Role) -> Self {
        Self { subject_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Claims
///
/// Payload signed into every credential.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id.
    pub sub: Uuid,
    /// Role at issuance time. Roles never change after registration.
    pub role: Role,
    /// Expiration, seconds since the epoch.
    pub exp: i64,
    /// Issued at, seconds since the epoch.
    pub iat: i64,
}

/// TokenCodec
///
/// Issues and verifies HS256 credentials with the process-wide secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    /// `ttl_secs` is clamped to `1..=MAX_TOKEN_TTL_SECS`.
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs.clamp(1, MAX_TOKEN_TTL_SECS)),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_secs)
    }

    /// Issues a credential for `principal`, valid for the configured TTL from now.
    pub fn issue(&self, principal: &Principal) -> Result<String, ApiError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issues a credential as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        principal: &Principal,
        issued_at: DateTime<Utc>,
    ) -> Result<String, ApiError> {
        let claims = Claims {
            sub: principal.subject_id,
            role: principal.role,
            iat: issued_at.timestamp(),
            exp: issued_at
                .checked_add_signed(self.ttl)
                .ok_or_else(|| ApiError::Store("credential expiry out of range".to_string()))?
                .timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            ApiError::Store(format!("credential signing failed: {e}"))
        })
    }

    /// Verifies signature and expiry and returns the encoded principal.
    ///
    /// Every failure (malformed, tampered, wrong key, expired) collapses into
    /// `InvalidCredential` so callers cannot tell them apart.
    pub fn verify(&self, credential: &str) -> Result<Principal, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        match decode::<Claims>(credential, &self.decoding, &validation) {
            Ok(data) => Ok(Principal::new(data.claims.sub, data.claims.role)),
            Err(e) => {
                tracing::debug!(kind = ?e.kind(), "credential rejected");
                Err(ApiError::InvalidCredential)
            }
        }
    }
}

/// bearer_token
///
/// Pulls the credential out of `Authorization: Bearer <credential>`.
/// An absent, non-ASCII, wrongly-prefixed or empty header is `MissingCredential`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::MissingCredential)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::MissingCredential)
}

/// authenticate
///
/// The whole session check: extract, then verify.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenCodec) -> Result<Principal, ApiError> {
    let credential = bearer_token(headers)?;
    tokens.verify(credential)
}

/// require_session
///
/// Middleware guarding the authenticated and admin routers. On success the
/// principal is attached to the request extensions for the handlers.
pub async fn require_session(
    State(tokens): State<TokenCodec>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = authenticate(request.headers(), &tokens)?;
    tracing::debug!(subject = %principal.subject_id, role = ?principal.role, "session verified");
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Principal Extractor Implementation
///
/// Lets handlers take `Principal` as an argument. Reuses the principal attached
/// by `require_session` when present, otherwise verifies the header itself.
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
    TokenCodec: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(*principal);
        }

        let tokens = TokenCodec::from_ref(state);
        authenticate(&parts.headers, &tokens)
    }
}
