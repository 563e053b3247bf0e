pub mod auth;
pub mod donations;
pub mod mail;
pub mod orphanages;
pub mod profile;
pub mod requirements;
