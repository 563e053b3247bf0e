use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::config::Config;
use crate::db::CareStorage;
use crate::handlers::{auth, donations, mail, orphanages, profile, requirements};
use crate::middleware::cors::cors;
use crate::service::mail_actor::MailerHandle;
use crate::service::rate_limit::VerifyLimiter;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct CareState {
    pub storage: CareStorage,
    pub mailer: MailerHandle,
    pub verify_limiter: Arc<VerifyLimiter>,
    pub config: Arc<Config>,
}

impl CareState {
    pub fn new(storage: CareStorage, mailer: MailerHandle, config: Config) -> Self {
        let verify_limiter = Arc::new(VerifyLimiter::per_minute(
            config.auth.verify_attempts_per_minute,
        ));
        Self {
            storage,
            mailer,
            verify_limiter,
            config: Arc::new(config),
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn care_router(state: CareState) -> Router {
    let body_limit = state.config.basic.body_limit_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/register", post(auth::register))
        .route("/verify-email", post(auth::verify_email))
        .route("/resend-verification", post(auth::resend_verification))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/send-verification-email", post(mail::send_verification_email))
        .route("/profile", get(profile::get_profile))
        .route(
            "/complete-donor-profile",
            post(profile::complete_donor_profile).put(profile::complete_donor_profile),
        )
        .route(
            "/complete-orphanage-profile",
            post(profile::complete_orphanage_profile).put(profile::complete_orphanage_profile),
        )
        .route("/orphanages", get(orphanages::list_orphanages))
        .route("/orphanages/{id}", get(orphanages::get_orphanage))
        .route(
            "/orphanages/{id}/requirements",
            get(requirements::list_requirements).post(requirements::add_requirement),
        )
        .route(
            "/orphanages/{id}/requirements/{requirement_id}",
            delete(requirements::delete_requirement),
        )
        .route(
            "/orphanages/{id}/donation-requests",
            post(donations::submit_donation_request),
        )
        .route("/donation-requests", get(donations::list_incoming))
        .route("/my/donation-requests", get(donations::list_mine))
        .route("/donation-requests/{id}/approve", post(donations::approve))
        .route("/donation-requests/{id}/reject", post(donations::reject))
        .route("/donation-requests/{id}/complete", post(donations::complete))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(cors))
        .with_state(state)
}
