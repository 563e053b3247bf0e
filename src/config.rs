use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

/// Path of the optional on-disk configuration file.
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix for environment overrides, e.g. `CARE_BASIC__LISTEN_ADDR`.
pub const ENV_PREFIX: &str = "CARE_";

/// Process-wide configuration, loaded on first access.
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| match Config::load() {
    Ok(cfg) => cfg,
    Err(e) => panic!("invalid configuration: {e}"),
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub auth: AuthConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Shared secret for internal endpoints such as `/send-verification-email`.
    pub service_key: String,
    pub body_limit_bytes: usize,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:orphancare.db".to_string(),
            loglevel: "info".to_string(),
            service_key: "change-me".to_string(),
            body_limit_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub verification_ttl_secs: u64,
    pub session_ttl_secs: u64,
    pub verify_attempts_per_minute: u32,
    /// When set, profile completion must carry a session owned by `accountId`.
    pub require_session: bool,
    pub min_password_len: usize,
    /// How often expired sessions and idle rate-limit entries are purged.
    pub sweep_interval_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            verification_ttl_secs: 10 * 60,
            session_ttl_secs: 7 * 24 * 60 * 60,
            verify_attempts_per_minute: 5,
            require_session: false,
            min_password_len: 8,
            sweep_interval_secs: 5 * 60,
        }
    }
}

impl AuthConfig {
    pub fn verification_ttl(&self) -> Duration {
        Duration::from_secs(self.verification_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// HTTP relay accepting `{from, to, subject, html}`; mails are only logged when unset.
    pub relay_url: Option<Url>,
    pub relay_token: Option<String>,
    pub from: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay_url: None,
            relay_token: None,
            from: "OrphanCare Network <no-reply@orphancare.local>".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `config.toml`, then `CARE_*` environment variables.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.basic.listen_addr, "0.0.0.0:8000");
        assert_eq!(cfg.auth.verification_ttl(), Duration::from_secs(600));
        assert_eq!(cfg.auth.min_password_len, 8);
        assert!(!cfg.auth.require_session);
        assert!(cfg.mail.relay_url.is_none());
    }

    #[test]
    fn nested_values_override_defaults() {
        let cfg: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r#"
                [basic]
                listen_addr = "127.0.0.1:9000"

                [auth]
                require_session = true
                verification_ttl_secs = 60
                "#,
            ))
            .extract()
            .expect("config should extract");
        assert_eq!(cfg.basic.listen_addr, "127.0.0.1:9000");
        assert_eq!(cfg.basic.loglevel, "info");
        assert!(cfg.auth.require_session);
        assert_eq!(cfg.auth.verification_ttl_secs, 60);
    }
}
