pub mod housekeeping;
pub mod mail_actor;
pub mod mailer;
pub mod password;
pub mod rate_limit;
pub mod validate;
pub mod verification;
