#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

use orphancare::config::Config;
use orphancare::db::CareStorage;
use orphancare::service::{mail_actor, mailer::MailTransport};
use orphancare::{CareState, care_router};

pub const PASSWORD: &str = "s3cret-pass";
pub const SERVICE_KEY: &str = "test-service-key";

static COUNTER: AtomicUsize = AtomicUsize::new(0);

pub struct TestApp {
    pub app: Router,
    pub state: CareState,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let _ = fs::remove_file(format!("{}{suffix}", self.db_path.display()));
        }
    }
}

fn temp_db_path() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "orphancare-test-{}-{}-{}.sqlite",
        std::process::id(),
        nanos,
        COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    path
}

pub fn test_config() -> Config {
    let mut cfg = Config::default();
    cfg.basic.service_key = SERVICE_KEY.to_string();
    cfg
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(test_config()).await
}

pub async fn spawn_app_with(cfg: Config) -> TestApp {
    let db_path = temp_db_path();
    let database_url = format!("sqlite:{}", db_path.display());
    let storage = CareStorage::connect(&database_url)
        .await
        .expect("failed to open test database");
    let transport = MailTransport::from_config(&cfg.mail).expect("mail transport");
    let mailer = mail_actor::spawn(transport).await.expect("mailer actor");
    let state = CareState::new(storage, mailer, cfg);
    let app = care_router(state.clone());
    TestApp {
        app,
        state,
        db_path,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        let resp = self.app.clone().oneshot(req).await.expect("request failed");
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body was not JSON")
        };
        (status, value)
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body), None).await
    }

    pub async fn post_as(&self, uri: &str, body: Value, token: &str) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body), Some(token)).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, token).await
    }

    pub async fn pending_code(&self, email: &str) -> String {
        self.state
            .storage
            .find_account_by_email(email)
            .await
            .expect("lookup failed")
            .and_then(|a| a.verification_code)
            .expect("no pending verification code")
    }

    /// Move the code's issue time back, as if it had been sent at `at`.
    pub async fn backdate_code(&self, email: &str, at: DateTime<Utc>) {
        sqlx::query("UPDATE accounts SET verification_sent_at = ? WHERE email = ?")
            .bind(at)
            .bind(email)
            .execute(self.state.storage.pool())
            .await
            .expect("backdate failed");
    }

    pub async fn register(&self, email: &str, role: &str) -> String {
        let (status, body) = self
            .post(
                "/register",
                json!({ "email": email, "password": PASSWORD, "role": role }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["accountId"].as_str().expect("accountId").to_string()
    }

    pub async fn register_verified(&self, email: &str, role: &str) -> String {
        let id = self.register(email, role).await;
        let code = self.pending_code(email).await;
        let (status, body) = self
            .post(
                "/verify-email",
                json!({ "email": email, "verificationCode": code }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "verify failed: {body}");
        id
    }

    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .post("/login", json!({ "email": email, "password": PASSWORD }))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token").to_string()
    }

    pub async fn create_orphanage(&self, email: &str, name: &str, location: &str) -> (String, i64, String) {
        let account_id = self.register_verified(email, "Orphanage").await;
        let (status, body) = self
            .post(
                "/complete-orphanage-profile",
                orphanage_body(&account_id, name, location, "0012345678"),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "orphanage profile failed: {body}");
        let orphanage_id = body["orphanage"]["id"].as_i64().expect("orphanage id");
        let token = self.login(email).await;
        (account_id, orphanage_id, token)
    }

    pub async fn create_donor(&self, email: &str, name: &str) -> (String, String) {
        let account_id = self.register_verified(email, "Donor").await;
        let (status, body) = self
            .post(
                "/complete-donor-profile",
                json!({
                    "accountId": account_id,
                    "donorName": name,
                    "phoneNumber": "+91 9876543210",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "donor profile failed: {body}");
        let token = self.login(email).await;
        (account_id, token)
    }
}

pub fn orphanage_body(account_id: &str, name: &str, location: &str, account_number: &str) -> Value {
    json!({
        "accountId": account_id,
        "orphanageName": name,
        "location": location,
        "capacity": 40,
        "establishedDate": "1995-06-01",
        "maleCount": 12,
        "femaleCount": 15,
        "bankDetails": {
            "accountName": "Trust Account",
            "accountType": "Savings",
            "accountHolderName": name,
            "accountNumber": account_number,
            "ifscCode": "SBIN0001234",
        }
    })
}
