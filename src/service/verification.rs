use crate::service::mailer::OutgoingMail;
use chrono::{DateTime, Utc};
use rand::Rng;
use std::time::Duration;

/// Five-digit numeric code in `10000..=99999`.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(10000..=99999).to_string()
}

/// A code issued at `sent_at` is expired once more than `ttl` has elapsed.
pub fn is_expired(sent_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    match chrono::Duration::from_std(ttl) {
        Ok(ttl) => now - sent_at > ttl,
        // TTL too large to represent; nothing expires
        Err(_) => false,
    }
}

/// Build the verification email sent after registration or on resend.
pub fn verification_mail(
    from: &str,
    to: &str,
    role: &str,
    code: &str,
    ttl: Duration,
) -> OutgoingMail {
    let minutes = (ttl.as_secs() / 60).max(1);
    let html = format!(
        r#"<h2>Welcome to OrphanCare Network!</h2>
<p>Thank you for registering as a {role}. Please verify your email using the code below:</p>
<h1 style="color:#800033;">{code}</h1>
<p>This code expires in {minutes} minutes.</p>"#
    );
    OutgoingMail {
        from: from.to_string(),
        to: to.to_string(),
        subject: "Verify Your Email - OrphanCare Network".to_string(),
        html,
    }
}
