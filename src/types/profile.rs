use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::auth::AuthUser;
use super::donation::RequirementView;
use crate::db::models::{DbDonor, DbOrphanage};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfileRequest {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub donor_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub donation_pref: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanageProfileRequest {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub orphanage_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub established_date: Option<String>,
    #[serde(default)]
    pub male_count: Option<i64>,
    #[serde(default)]
    pub female_count: Option<i64>,
    #[serde(default)]
    pub bank_details: Option<BankDetailsInput>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetailsInput {
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub account_holder_name: Option<String>,
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub ifsc_code: Option<String>,
}

/// Bank details after validation; every field present and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankDetails {
    pub account_name: String,
    pub account_type: String,
    pub account_holder_name: String,
    pub account_number: String,
    pub ifsc_code: String,
}

#[derive(Debug, Serialize)]
pub struct DonorProfileResponse {
    pub message: String,
    pub donor: DbDonor,
}

#[derive(Debug, Serialize)]
pub struct OrphanageProfileResponse {
    pub message: String,
    pub orphanage: DbOrphanage,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub user: AuthUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donor: Option<DbDonor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orphanage: Option<DbOrphanage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OrphanageSearch {
    #[serde(default)]
    pub q: Option<String>,
}

/// Public listing entry; bank details and account linkage stay private.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanageSummary {
    pub id: i64,
    pub orphanage_name: String,
    pub location: String,
    pub capacity: Option<i64>,
    pub established_date: Option<NaiveDate>,
    pub male_count: Option<i64>,
    pub female_count: Option<i64>,
}

impl From<DbOrphanage> for OrphanageSummary {
    fn from(o: DbOrphanage) -> Self {
        Self {
            id: o.id,
            orphanage_name: o.orphanage_name,
            location: o.location,
            capacity: o.capacity,
            established_date: o.established_date,
            male_count: o.male_count,
            female_count: o.female_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrphanageDetail {
    #[serde(flatten)]
    pub orphanage: OrphanageSummary,
    pub requirements: Vec<RequirementView>,
}
