//! Request/response payloads and small domain enums shared by handlers and storage.

pub mod account;
pub mod auth;
pub mod donation;
pub mod profile;

pub use account::Role;
pub use donation::{Category, DonationStatus, Unit};
