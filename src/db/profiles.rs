use crate::db::models::{DbDonor, DbOrphanage};
use crate::db::sqlite::CareStorage;
use crate::error::CareError;
use crate::types::profile::BankDetails;
use chrono::NaiveDate;

const ORPHANAGE_COLUMNS: &str = "id, account_id, orphanage_name, location, capacity, \
     established_date, male_count, female_count, bank_details_id";

pub struct DonorProfile<'a> {
    pub donor_name: &'a str,
    pub phone_number: &'a str,
    pub donation_pref: Option<&'a str>,
}

pub struct OrphanageProfile<'a> {
    pub orphanage_name: &'a str,
    pub location: &'a str,
    pub capacity: Option<i64>,
    pub established_date: Option<NaiveDate>,
    pub male_count: Option<i64>,
    pub female_count: Option<i64>,
    pub bank_details: &'a BankDetails,
}

/// Whether a profile write created a new row or updated the existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    Created,
    Updated,
}

/// Escape `%`, `_` and `\` so user input matches literally inside `LIKE ... ESCAPE '\'`.
fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for ch in term.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

impl CareStorage {
    pub async fn find_donor_by_account(&self, account_id: &str) -> Result<Option<DbDonor>, CareError> {
        let row = sqlx::query_as::<_, DbDonor>(
            "SELECT id, account_id, donor_name, phone_number, donation_pref FROM donors WHERE account_id = ?",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Insert or update the donor row keyed by `account_id`.
    pub async fn upsert_donor(
        &self,
        account_id: &str,
        profile: DonorProfile<'_>,
    ) -> Result<(DbDonor, Saved), CareError> {
        let existed = self.find_donor_by_account(account_id).await?.is_some();
        sqlx::query(
            r#"
            INSERT INTO donors (account_id, donor_name, phone_number, donation_pref)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(account_id) DO UPDATE SET
                donor_name=excluded.donor_name,
                phone_number=excluded.phone_number,
                donation_pref=excluded.donation_pref
            "#,
        )
        .bind(account_id)
        .bind(profile.donor_name)
        .bind(profile.phone_number)
        .bind(profile.donation_pref)
        .execute(&self.pool)
        .await?;

        let donor = self
            .find_donor_by_account(account_id)
            .await?
            .ok_or_else(|| CareError::not_found("Donor profile not found"))?;
        let saved = if existed { Saved::Updated } else { Saved::Created };
        Ok((donor, saved))
    }

    /// Write bank details and the orphanage row in one transaction.
    pub async fn save_orphanage_profile(
        &self,
        account_id: &str,
        profile: OrphanageProfile<'_>,
    ) -> Result<(DbOrphanage, Saved), CareError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(i64, i64)> =
            sqlx::query_as("SELECT id, bank_details_id FROM orphanages WHERE account_id = ?")
                .bind(account_id)
                .fetch_optional(&mut *tx)
                .await?;

        let bank = profile.bank_details;
        let saved = match existing {
            Some((orphanage_id, bank_details_id)) => {
                sqlx::query(
                    r#"UPDATE bank_details SET
                        account_name = ?,
                        account_type = ?,
                        account_holder_name = ?,
                        account_number = ?,
                        ifsc_code = ?
                      WHERE id = ?"#,
                )
                .bind(&bank.account_name)
                .bind(&bank.account_type)
                .bind(&bank.account_holder_name)
                .bind(&bank.account_number)
                .bind(&bank.ifsc_code)
                .bind(bank_details_id)
                .execute(&mut *tx)
                .await?;

                sqlx::query(
                    r#"UPDATE orphanages SET
                        orphanage_name = ?,
                        location = ?,
                        capacity = ?,
                        established_date = ?,
                        male_count = ?,
                        female_count = ?
                      WHERE id = ?"#,
                )
                .bind(profile.orphanage_name)
                .bind(profile.location)
                .bind(profile.capacity)
                .bind(profile.established_date)
                .bind(profile.male_count)
                .bind(profile.female_count)
                .bind(orphanage_id)
                .execute(&mut *tx)
                .await?;
                Saved::Updated
            }
            None => {
                let bank_details_id = sqlx::query(
                    r#"INSERT INTO bank_details (
                        account_name, account_type, account_holder_name, account_number, ifsc_code
                    ) VALUES (?, ?, ?, ?, ?)"#,
                )
                .bind(&bank.account_name)
                .bind(&bank.account_type)
                .bind(&bank.account_holder_name)
                .bind(&bank.account_number)
                .bind(&bank.ifsc_code)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid();

                sqlx::query(
                    r#"INSERT INTO orphanages (
                        account_id, orphanage_name, location, capacity, established_date,
                        male_count, female_count, bank_details_id
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
                )
                .bind(account_id)
                .bind(profile.orphanage_name)
                .bind(profile.location)
                .bind(profile.capacity)
                .bind(profile.established_date)
                .bind(profile.male_count)
                .bind(profile.female_count)
                .bind(bank_details_id)
                .execute(&mut *tx)
                .await?;
                Saved::Created
            }
        };

        let sql = format!("SELECT {ORPHANAGE_COLUMNS} FROM orphanages WHERE account_id = ?");
        let orphanage = sqlx::query_as::<_, DbOrphanage>(&sql)
            .bind(account_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((orphanage, saved))
    }

    pub async fn find_orphanage_by_account(
        &self,
        account_id: &str,
    ) -> Result<Option<DbOrphanage>, CareError> {
        let sql = format!("SELECT {ORPHANAGE_COLUMNS} FROM orphanages WHERE account_id = ?");
        let row = sqlx::query_as::<_, DbOrphanage>(&sql)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_orphanage_by_id(&self, id: i64) -> Result<Option<DbOrphanage>, CareError> {
        let sql = format!("SELECT {ORPHANAGE_COLUMNS} FROM orphanages WHERE id = ?");
        let row = sqlx::query_as::<_, DbOrphanage>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// All orphanage profiles, optionally filtered on name or location (case-insensitive).
    pub async fn list_orphanages(&self, search: Option<&str>) -> Result<Vec<DbOrphanage>, CareError> {
        let rows = match search.map(str::trim).filter(|s| !s.is_empty()) {
            Some(term) => {
                let pattern = like_pattern(term);
                let sql = format!(
                    "SELECT {ORPHANAGE_COLUMNS} FROM orphanages \
                     WHERE lower(orphanage_name) LIKE ? ESCAPE '\\' \
                        OR lower(location) LIKE ? ESCAPE '\\' \
                     ORDER BY id"
                );
                sqlx::query_as::<_, DbOrphanage>(&sql)
                    .bind(&pattern)
                    .bind(&pattern)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("SELECT {ORPHANAGE_COLUMNS} FROM orphanages ORDER BY id");
                sqlx::query_as::<_, DbOrphanage>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    pub async fn count_bank_details(&self) -> Result<i64, CareError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bank_details")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Hope"), "%hope%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
