use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::CareError;
use crate::middleware::{CareJson, RequireServiceKey};
use crate::router::CareState;
use crate::service::validate::all_present;
use crate::service::verification::verification_mail;
use crate::types::auth::{MessageResponse, SendVerificationEmailRequest};

/// POST /send-verification-email -> renders and delivers a verification mail.
/// Internal: callers present the service key.
pub async fn send_verification_email(
    State(state): State<CareState>,
    _key: RequireServiceKey,
    CareJson(req): CareJson<SendVerificationEmailRequest>,
) -> Result<Response, CareError> {
    let Some([email, code, role]) = all_present([&req.email, &req.verification_code, &req.role])
    else {
        return Err(CareError::validation(
            "Email, verification code, and role are required",
        ));
    };

    let mail = verification_mail(
        &state.config.mail.from,
        email,
        role,
        code,
        state.config.auth.verification_ttl(),
    );

    match state.mailer.deliver(mail).await {
        Ok(()) => Ok(Json(MessageResponse::new("Verification email sent successfully")).into_response()),
        Err(e) => {
            error!(to = %email, error = %e, "email sending error");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to send verification email" })),
            )
                .into_response())
        }
    }
}
