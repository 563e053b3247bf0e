use crate::db::models::{DbDonationRequest, DbRequirement};
use crate::db::sqlite::CareStorage;
use crate::error::CareError;
use crate::types::donation::{Category, DonationStatus, Unit};
use chrono::{DateTime, Utc};

const DONATION_SELECT: &str = r#"
    SELECT dr.id, dr.orphanage_id, o.orphanage_name, dr.donor_account_id,
           a.email AS donor_email, d.donor_name, d.phone_number AS donor_phone,
           dr.category, dr.items, dr.status, dr.created_at, dr.updated_at
    FROM donation_requests dr
    JOIN orphanages o ON o.id = dr.orphanage_id
    JOIN accounts a ON a.id = dr.donor_account_id
    LEFT JOIN donors d ON d.account_id = dr.donor_account_id
"#;

pub struct NewRequirement<'a> {
    pub orphanage_id: i64,
    pub category: Category,
    pub name: &'a str,
    pub quantity: f64,
    pub unit: Unit,
}

impl CareStorage {
    pub async fn insert_requirement(
        &self,
        new: NewRequirement<'_>,
        now: DateTime<Utc>,
    ) -> Result<DbRequirement, CareError> {
        let id = sqlx::query(
            r#"INSERT INTO requirements (orphanage_id, category, name, quantity, unit, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(new.orphanage_id)
        .bind(new.category.as_str())
        .bind(new.name)
        .bind(new.quantity)
        .bind(new.unit.as_str())
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        let row = sqlx::query_as::<_, DbRequirement>(
            "SELECT id, orphanage_id, category, name, quantity, unit, created_at FROM requirements WHERE id = ?",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list_requirements(
        &self,
        orphanage_id: i64,
        category: Option<Category>,
    ) -> Result<Vec<DbRequirement>, CareError> {
        let rows = sqlx::query_as::<_, DbRequirement>(
            r#"SELECT id, orphanage_id, category, name, quantity, unit, created_at
               FROM requirements
               WHERE orphanage_id = ? AND (? IS NULL OR category = ?)
               ORDER BY id"#,
        )
        .bind(orphanage_id)
        .bind(category.map(|c| c.as_str()))
        .bind(category.map(|c| c.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Returns whether a requirement belonging to `orphanage_id` was removed.
    pub async fn delete_requirement(&self, orphanage_id: i64, id: i64) -> Result<bool, CareError> {
        let res = sqlx::query("DELETE FROM requirements WHERE id = ? AND orphanage_id = ?")
            .bind(id)
            .bind(orphanage_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn insert_donation_request(
        &self,
        orphanage_id: i64,
        donor_account_id: &str,
        category: Category,
        items: &[String],
        now: DateTime<Utc>,
    ) -> Result<DbDonationRequest, CareError> {
        let items_json = serde_json::to_string(items)?;
        let id = sqlx::query(
            r#"INSERT INTO donation_requests (
                orphanage_id, donor_account_id, category, items, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(orphanage_id)
        .bind(donor_account_id)
        .bind(category.as_str())
        .bind(items_json)
        .bind(DonationStatus::Pending.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        self.find_donation_request(id)
            .await?
            .ok_or_else(|| CareError::not_found("Donation request not found"))
    }

    pub async fn find_donation_request(&self, id: i64) -> Result<Option<DbDonationRequest>, CareError> {
        let sql = format!("{DONATION_SELECT} WHERE dr.id = ?");
        let row = sqlx::query_as::<_, DbDonationRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Requests addressed to one orphanage, newest first.
    pub async fn list_donations_for_orphanage(
        &self,
        orphanage_id: i64,
        status: Option<DonationStatus>,
    ) -> Result<Vec<DbDonationRequest>, CareError> {
        let sql = format!(
            "{DONATION_SELECT} WHERE dr.orphanage_id = ? AND (? IS NULL OR dr.status = ?) ORDER BY dr.id DESC"
        );
        let rows = sqlx::query_as::<_, DbDonationRequest>(&sql)
            .bind(orphanage_id)
            .bind(status.map(|s| s.as_str()))
            .bind(status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Requests a donor has submitted, newest first.
    pub async fn list_donations_for_donor(
        &self,
        donor_account_id: &str,
    ) -> Result<Vec<DbDonationRequest>, CareError> {
        let sql = format!("{DONATION_SELECT} WHERE dr.donor_account_id = ? ORDER BY dr.id DESC");
        let rows = sqlx::query_as::<_, DbDonationRequest>(&sql)
            .bind(donor_account_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Compare-and-set on `status`; returns false when the row was not in `from`.
    pub async fn transition_donation_status(
        &self,
        id: i64,
        from: DonationStatus,
        to: DonationStatus,
        now: DateTime<Utc>,
    ) -> Result<bool, CareError> {
        let res = sqlx::query(
            "UPDATE donation_requests SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(to.as_str())
        .bind(now)
        .bind(id)
        .bind(from.as_str())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() > 0)
    }
}
