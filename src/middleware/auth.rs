use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use axum_extra::TypedHeader;
use chrono::Utc;
use headers::Authorization;
use headers::authorization::Bearer;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::db::models::DbAccount;
use crate::error::CareError;
use crate::router::CareState;
use crate::types::account::Role;

/// The account behind a valid `Authorization: Bearer <session token>`.
#[derive(Debug, Clone)]
pub struct SessionAccount {
    pub token: String,
    pub account: DbAccount,
}

impl SessionAccount {
    pub fn role(&self) -> Option<Role> {
        self.account.role()
    }

    /// Reject sessions whose account is not of `role`.
    pub fn require_role(&self, role: Role, msg: &str) -> Result<(), CareError> {
        if self.role() == Some(role) {
            Ok(())
        } else {
            Err(CareError::forbidden(msg))
        }
    }
}

/// Bearer token from the `Authorization` header, `None` when the header is absent.
async fn bearer_token(parts: &mut Parts) -> Result<Option<String>, CareError> {
    let header = parts
        .extract::<Option<TypedHeader<Authorization<Bearer>>>>()
        .await
        .map_err(|_| CareError::unauthorized("Invalid authorization header"))?;
    Ok(header.map(|TypedHeader(Authorization(bearer))| bearer.token().to_string()))
}

/// The live session behind `token`; `None` for unknown or expired tokens.
async fn lookup_session(
    state: &CareState,
    token: String,
) -> Result<Option<SessionAccount>, CareError> {
    let Some(session) = state.storage.find_session(&token).await? else {
        return Ok(None);
    };
    if session.expires_at <= Utc::now() {
        if let Err(e) = state.storage.delete_session(&token).await {
            warn!(account_id = %session.account_id, error = %e, "failed to drop expired session");
        }
        return Ok(None);
    }
    let account = state.storage.find_account_by_id(&session.account_id).await?;
    Ok(account.map(|account| SessionAccount { token, account }))
}

impl FromRequestParts<CareState> for SessionAccount {
    type Rejection = CareError;

    async fn from_request_parts(parts: &mut Parts, state: &CareState) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts).await? else {
            return Err(CareError::unauthorized("Authentication required"));
        };
        lookup_session(state, token)
            .await?
            .ok_or_else(|| CareError::unauthorized("Invalid or expired session"))
    }
}

/// Optional session for endpoints that also accept body-only callers.
///
/// Without `auth.require_session`, a bearer that is not a live session (such
/// as a project anon key) counts as no session. With it, the rules of
/// [`SessionAccount`] apply.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<SessionAccount>);

impl FromRequestParts<CareState> for MaybeSession {
    type Rejection = CareError;

    async fn from_request_parts(parts: &mut Parts, state: &CareState) -> Result<Self, Self::Rejection> {
        if state.config.auth.require_session {
            return SessionAccount::from_request_parts(parts, state)
                .await
                .map(|s| Self(Some(s)));
        }
        let Ok(Some(token)) = bearer_token(parts).await else {
            return Ok(Self(None));
        };
        Ok(Self(lookup_session(state, token).await?))
    }
}

/// Check a request against the configured service key.
/// Accepts `apikey: <key>` or `Authorization: Bearer <key>`.
pub fn ensure_service_key(headers: &HeaderMap, expected: &str) -> Result<(), CareError> {
    let matches = |candidate: &str| bool::from(candidate.as_bytes().ct_eq(expected.as_bytes()));

    if let Some(hv) = headers.get("apikey").and_then(|v| v.to_str().ok())
        && matches(hv.trim())
    {
        return Ok(());
    }

    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        let auth = auth.trim();
        if let Some(token) = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            && matches(token)
        {
            return Ok(());
        }
    }

    Err(CareError::unauthorized("Invalid or missing service key"))
}

/// Guard for internal endpoints.
#[derive(Debug, Clone, Copy)]
pub struct RequireServiceKey;

impl FromRequestParts<CareState> for RequireServiceKey {
    type Rejection = CareError;

    async fn from_request_parts(parts: &mut Parts, state: &CareState) -> Result<Self, Self::Rejection> {
        ensure_service_key(&parts.headers, &state.config.basic.service_key)?;
        Ok(Self)
    }
}
