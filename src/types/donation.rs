use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::db::models::{DbDonationRequest, DbRequirement};

/// What a requirement or donation is about.
/// Parsed through `FromStr`, which also accepts the `stationary` spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Groceries,
    Stationery,
    Books,
    Bedding,
    Food,
    Clothes,
    EducationalOthers,
    General,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Groceries,
        Category::Stationery,
        Category::Books,
        Category::Bedding,
        Category::Food,
        Category::Clothes,
        Category::EducationalOthers,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Groceries => "groceries",
            Category::Stationery => "stationery",
            Category::Books => "books",
            Category::Bedding => "bedding",
            Category::Food => "food",
            Category::Clothes => "clothes",
            Category::EducationalOthers => "educational-others",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        if matches!(normalized.as_str(), "stationary" | "stationaries") {
            return Ok(Category::Stationery);
        }
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Kgs,
    Litres,
    Pcs,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kgs => "kgs",
            Unit::Litres => "litres",
            Unit::Pcs => "pcs",
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kgs" => Ok(Unit::Kgs),
            "litres" => Ok(Unit::Litres),
            "pcs" => Ok(Unit::Pcs),
            other => Err(format!("Unknown unit: {other}")),
        }
    }
}

/// Lifecycle of a donation request as seen by the receiving orphanage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonationStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Approved => "approved",
            DonationStatus::Rejected => "rejected",
            DonationStatus::Completed => "completed",
        }
    }

    /// pending -> approved | rejected, approved -> completed.
    pub fn can_transition_to(self, next: DonationStatus) -> bool {
        matches!(
            (self, next),
            (DonationStatus::Pending, DonationStatus::Approved)
                | (DonationStatus::Pending, DonationStatus::Rejected)
                | (DonationStatus::Approved, DonationStatus::Completed)
        )
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DonationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(DonationStatus::Pending),
            "approved" => Ok(DonationStatus::Approved),
            "rejected" => Ok(DonationStatus::Rejected),
            "completed" => Ok(DonationStatus::Completed),
            other => Err(format!("Unknown status: {other}")),
        }
    }
}

/// Quantity as typed into a form: either a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(f64),
    Text(String),
}

impl QuantityInput {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            QuantityInput::Number(n) => Some(*n),
            QuantityInput::Text(s) if s.trim().is_empty() => None,
            QuantityInput::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RequirementRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantity: Option<QuantityInput>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementView {
    pub id: i64,
    pub orphanage_id: i64,
    pub category: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbRequirement> for RequirementView {
    fn from(r: DbRequirement) -> Self {
        Self {
            id: r.id,
            orphanage_id: r.orphanage_id,
            category: r.category,
            name: r.name,
            quantity: r.quantity,
            unit: r.unit,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DonationRequestInput {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequestView {
    pub id: i64,
    pub orphanage_id: i64,
    pub orphanage_name: String,
    pub donor_name: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub category: String,
    pub status: String,
    pub items: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbDonationRequest> for DonationRequestView {
    type Error = serde_json::Error;

    fn try_from(r: DbDonationRequest) -> Result<Self, Self::Error> {
        let items: Vec<String> = serde_json::from_str(&r.items)?;
        Ok(Self {
            id: r.id,
            orphanage_id: r.orphanage_id,
            orphanage_name: r.orphanage_name,
            donor_name: r.donor_name,
            phone: r.donor_phone,
            email: r.donor_email,
            category: r.category,
            status: r.status,
            items,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}
