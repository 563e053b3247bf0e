use crate::config::MailConfig;
use crate::error::CareError;
use serde::Serialize;
use std::time::Duration;
use tracing::info;
use url::Url;

/// A rendered email ready for delivery.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Where outgoing mail goes.
#[derive(Debug, Clone)]
pub enum MailTransport {
    /// Log the mail instead of sending it.
    Log,
    /// POST the mail as JSON to a transactional-email relay.
    Relay {
        client: reqwest::Client,
        url: Url,
        token: Option<String>,
    },
}

impl MailTransport {
    pub fn from_config(cfg: &MailConfig) -> Result<Self, CareError> {
        let Some(url) = cfg.relay_url.clone() else {
            return Ok(Self::Log);
        };
        let client = reqwest::Client::builder()
            .user_agent("orphancare-mailer/1.0")
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self::Relay {
            client,
            url,
            token: cfg.relay_token.clone(),
        })
    }

    pub async fn send(&self, mail: &OutgoingMail) -> Result<(), CareError> {
        match self {
            Self::Log => {
                info!(to = %mail.to, subject = %mail.subject, body = %mail.html, "mail relay not configured; logging mail");
                Ok(())
            }
            Self::Relay { client, url, token } => {
                let mut req = client.post(url.clone()).json(mail);
                if let Some(token) = token {
                    req = req.bearer_auth(token);
                }
                let resp = req.send().await?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(CareError::MailDelivery(format!(
                        "relay responded with status {status}"
                    )));
                }
                info!(to = %mail.to, subject = %mail.subject, "mail handed to relay");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_relay_url_logs_only() {
        let transport = MailTransport::from_config(&MailConfig::default()).unwrap();
        assert!(matches!(transport, MailTransport::Log));
    }

    #[test]
    fn relay_url_selects_http_transport() {
        let cfg = MailConfig {
            relay_url: Some(Url::parse("http://127.0.0.1:9/send").unwrap()),
            relay_token: Some("t".into()),
            ..MailConfig::default()
        };
        let transport = MailTransport::from_config(&cfg).unwrap();
        assert!(matches!(transport, MailTransport::Relay { token: Some(_), .. }));
    }
}
