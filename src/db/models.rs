use crate::types::account::Role;
use crate::types::auth::AuthUser;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Row of `accounts`. Not `Serialize`: it carries the password hash.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbAccount {
    pub id: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub is_verified: bool,
    pub verification_code: Option<String>,
    pub verification_sent_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl DbAccount {
    /// Stored role; `None` only if the row was written by something else.
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    pub fn to_auth_user(&self) -> Option<AuthUser> {
        Some(AuthUser {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role()?,
            is_verified: self.is_verified,
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct DbDonor {
    pub id: i64,
    pub account_id: String,
    pub donor_name: String,
    pub phone_number: String,
    pub donation_pref: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct DbOrphanage {
    pub id: i64,
    pub account_id: String,
    pub orphanage_name: String,
    pub location: String,
    pub capacity: Option<i64>,
    pub established_date: Option<NaiveDate>,
    pub male_count: Option<i64>,
    pub female_count: Option<i64>,
    pub bank_details_id: i64,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbSession {
    pub token: String,
    pub account_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbRequirement {
    pub id: i64,
    pub orphanage_id: i64,
    pub category: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub created_at: DateTime<Utc>,
}

/// A donation request joined with the orphanage name and donor contact details.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbDonationRequest {
    pub id: i64,
    pub orphanage_id: i64,
    pub orphanage_name: String,
    pub donor_account_id: String,
    pub donor_email: String,
    pub donor_name: Option<String>,
    pub donor_phone: Option<String>,
    pub category: String,
    pub items: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
