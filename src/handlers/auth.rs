use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, TimeDelta, Utc};
use subtle::ConstantTimeEq;
use tracing::{error, info};
use uuid::Uuid;

use crate::db::accounts::NewAccount;
use crate::db::models::DbAccount;
use crate::middleware::{CareJson, SessionAccount};
use crate::router::CareState;
use crate::service::password::{hash_password, verify_password};
use crate::service::validate::{is_valid_email, normalize_email, present};
use crate::service::verification::{generate_code, is_expired, verification_mail};
use crate::types::account::Role;
use crate::types::auth::{
    AuthUser, LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse,
    ResendVerificationRequest, VerifyEmailRequest, VerifyEmailResponse,
};
use crate::CareError;

pub(crate) fn auth_user(account: &DbAccount) -> Result<AuthUser, CareError> {
    account.to_auth_user().ok_or_else(|| {
        CareError::Internal(format!(
            "account {} has unknown role `{}`",
            account.id, account.role
        ))
    })
}

fn queue_verification_mail(state: &CareState, email: &str, role: Role, code: &str) {
    let mail = verification_mail(
        &state.config.mail.from,
        email,
        role.as_str(),
        code,
        state.config.auth.verification_ttl(),
    );
    state.mailer.dispatch(mail);
}

/// POST /register -> creates an unverified account and mails a verification code.
pub async fn register(
    State(state): State<CareState>,
    CareJson(req): CareJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), CareError> {
    let email = present(&req.email);
    let password = req.password.as_deref().filter(|p| !p.is_empty());
    let role = present(&req.role);
    let (Some(email), Some(password), Some(role)) = (email, password, role) else {
        return Err(CareError::validation(
            "Email, password, and role are required",
        ));
    };

    if !is_valid_email(email) {
        return Err(CareError::validation("Invalid email format"));
    }

    let min_len = state.config.auth.min_password_len;
    if password.chars().count() < min_len {
        return Err(CareError::validation(format!(
            "Password must be at least {min_len} characters long"
        )));
    }

    let role: Role = role
        .parse()
        .map_err(|_| CareError::validation("Role must be either Donor or Orphanage"))?;

    let email = normalize_email(email);
    if state.storage.find_account_by_email(&email).await?.is_some() {
        return Err(CareError::conflict("Email already registered"));
    }

    let code = generate_code();
    let password_hash = hash_password(password);
    let id = Uuid::new_v4().to_string();
    let account = state
        .storage
        .create_account(NewAccount {
            id: &id,
            email: &email,
            password_hash: &password_hash,
            role,
            verification_code: &code,
            now: Utc::now(),
        })
        .await?;

    queue_verification_mail(&state, &email, role, &code);
    info!(account_id = %account.id, role = %role, "account registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Account created successfully. Please check your email for verification code."
                .to_string(),
            account_id: account.id,
        }),
    ))
}

/// POST /verify-email -> marks the account verified when the code matches and is fresh.
pub async fn verify_email(
    State(state): State<CareState>,
    CareJson(req): CareJson<VerifyEmailRequest>,
) -> Result<Json<VerifyEmailResponse>, CareError> {
    let (Some(email), Some(code)) = (present(&req.email), present(&req.verification_code)) else {
        return Err(CareError::validation(
            "Email and verification code are required",
        ));
    };
    let email = normalize_email(email);

    if !state.verify_limiter.check(&email) {
        return Err(CareError::RateLimited);
    }

    let invalid = || CareError::validation("Invalid verification code or email");
    let account = state
        .storage
        .find_account_by_email(&email)
        .await?
        .ok_or_else(invalid)?;

    // email and code must match before anything about the account is revealed
    let stored = account.verification_code.as_deref().ok_or_else(invalid)?;
    if !bool::from(stored.as_bytes().ct_eq(code.as_bytes())) {
        return Err(invalid());
    }

    if account.is_verified {
        return Err(CareError::validation("Account is already verified"));
    }

    if is_expired(
        account.verification_sent_at,
        Utc::now(),
        state.config.auth.verification_ttl(),
    ) {
        return Err(CareError::validation("Verification code has expired"));
    }

    state.storage.mark_verified(&account.id).await?;
    info!(account_id = %account.id, "email verified");

    let user = auth_user(&account)?;
    Ok(Json(VerifyEmailResponse {
        message: "Email verified successfully".to_string(),
        account_id: account.id,
        role: user.role,
    }))
}

/// POST /resend-verification -> issues a fresh code and restarts its expiry window.
pub async fn resend_verification(
    State(state): State<CareState>,
    CareJson(req): CareJson<ResendVerificationRequest>,
) -> Result<Json<MessageResponse>, CareError> {
    let Some(email) = present(&req.email) else {
        return Err(CareError::validation("Email is required"));
    };
    let email = normalize_email(email);

    if !state.verify_limiter.check(&format!("resend:{email}")) {
        return Err(CareError::RateLimited);
    }

    let account = state
        .storage
        .find_account_by_email(&email)
        .await?
        .ok_or_else(|| CareError::not_found("Account not found"))?;
    if account.is_verified {
        return Err(CareError::validation("Account is already verified"));
    }
    let user = auth_user(&account)?;

    let code = generate_code();
    state
        .storage
        .replace_verification_code(&account.id, &code, Utc::now())
        .await?;
    queue_verification_mail(&state, &email, user.role, &code);
    info!(account_id = %account.id, "verification code reissued");

    Ok(Json(MessageResponse::new(
        "Verification code resent. Please check your email.",
    )))
}

fn session_expiry(now: DateTime<Utc>, ttl_secs: u64) -> DateTime<Utc> {
    let ttl = i64::try_from(ttl_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX);
    now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// POST /login -> opens a session for a verified account.
pub async fn login(
    State(state): State<CareState>,
    CareJson(req): CareJson<LoginRequest>,
) -> Result<Json<LoginResponse>, CareError> {
    let email = present(&req.email);
    let password = req.password.as_deref().filter(|p| !p.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(CareError::validation("Email and password are required"));
    };
    let email = normalize_email(email);

    let account = match state.storage.find_account_by_email(&email).await? {
        Some(account) if verify_password(password, &account.password) => account,
        _ => return Err(CareError::unauthorized("Invalid email or password")),
    };

    if !account.is_verified {
        return Err(CareError::unauthorized(
            "Please verify your email before logging in",
        ));
    }
    let user = auth_user(&account)?;

    let now = Utc::now();
    let token = Uuid::new_v4().to_string();
    let expires_at = session_expiry(now, state.config.auth.session_ttl_secs);
    state
        .storage
        .create_session(&token, &account.id, now, expires_at)
        .await?;
    state.storage.touch_last_login(&account.id, now).await?;

    let orphanages = match state.storage.find_orphanage_by_account(&account.id).await {
        Ok(found) => found.into_iter().collect(),
        Err(e) => {
            error!(account_id = %account.id, error = %e, "failed to fetch orphanages");
            Vec::new()
        }
    };

    info!(account_id = %account.id, "login succeeded");
    Ok(Json(LoginResponse {
        user,
        orphanages,
        token,
    }))
}

/// POST /logout -> drops the caller's session.
pub async fn logout(
    State(state): State<CareState>,
    session: SessionAccount,
) -> Result<Json<MessageResponse>, CareError> {
    state.storage.delete_session(&session.token).await?;
    info!(account_id = %session.account.id, "logged out");
    Ok(Json(MessageResponse::new("Logged out")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_expiry_saturates() {
        let now = Utc::now();
        assert_eq!(session_expiry(now, 60), now + TimeDelta::seconds(60));
        assert_eq!(session_expiry(now, u64::MAX), DateTime::<Utc>::MAX_UTC);
    }
}
