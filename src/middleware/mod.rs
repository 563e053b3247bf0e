pub mod auth;
pub mod cors;
pub mod json_body;

pub use auth::{MaybeSession, RequireServiceKey, SessionAccount};
pub use json_body::CareJson;
