use crate::db::models::{DbAccount, DbSession};
use crate::db::sqlite::CareStorage;
use crate::error::CareError;
use crate::types::account::Role;
use chrono::{DateTime, Utc};

const ACCOUNT_COLUMNS: &str = "id, email, password, role, is_verified, verification_code, \
     verification_sent_at, created_at, last_login";

/// Fields required to insert a fresh, unverified account.
pub struct NewAccount<'a> {
    pub id: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub verification_code: &'a str,
    pub now: DateTime<Utc>,
}

impl CareStorage {
    /// Insert a new account. A duplicate email surfaces as `CareError::Conflict`.
    pub async fn create_account(&self, new: NewAccount<'_>) -> Result<DbAccount, CareError> {
        let res = sqlx::query(
            r#"INSERT INTO accounts (
                id, email, password, role, is_verified,
                verification_code, verification_sent_at, created_at
            ) VALUES (?, ?, ?, ?, 0, ?, ?, ?)"#,
        )
        .bind(new.id)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.role.as_str())
        .bind(new.verification_code)
        .bind(new.now)
        .bind(new.now)
        .execute(&self.pool)
        .await
        .map_err(CareError::from);

        match res {
            Ok(_) => {}
            Err(e) if e.is_unique_violation() => {
                return Err(CareError::conflict("Email already registered"));
            }
            Err(e) => return Err(e),
        }

        self.find_account_by_id(new.id)
            .await?
            .ok_or_else(|| CareError::not_found("Account not found"))
    }

    pub async fn find_account_by_id(&self, id: &str) -> Result<Option<DbAccount>, CareError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?");
        let row = sqlx::query_as::<_, DbAccount>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_account_by_email(&self, email: &str) -> Result<Option<DbAccount>, CareError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?");
        let row = sqlx::query_as::<_, DbAccount>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Flip the account to verified. The code stays so a repeated verify
    /// with the same code reports "already verified".
    pub async fn mark_verified(&self, id: &str) -> Result<(), CareError> {
        sqlx::query("UPDATE accounts SET is_verified = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Store a fresh verification code and restart its expiry window.
    pub async fn replace_verification_code(
        &self,
        id: &str,
        code: &str,
        sent_at: DateTime<Utc>,
    ) -> Result<(), CareError> {
        sqlx::query(
            "UPDATE accounts SET verification_code = ?, verification_sent_at = ? WHERE id = ?",
        )
        .bind(code)
        .bind(sent_at)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> Result<(), CareError> {
        sqlx::query("UPDATE accounts SET last_login = ? WHERE id = ?")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn create_session(
        &self,
        token: &str,
        account_id: &str,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<(), CareError> {
        sqlx::query(
            "INSERT INTO sessions (token, account_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(token)
        .bind(account_id)
        .bind(created_at)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_session(&self, token: &str) -> Result<Option<DbSession>, CareError> {
        let row = sqlx::query_as::<_, DbSession>(
            "SELECT token, account_id, created_at, expires_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Returns whether a session row was removed.
    pub async fn delete_session(&self, token: &str) -> Result<bool, CareError> {
        let res = sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    /// Drop every session that expired at or before `now`; returns how many went.
    pub async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, CareError> {
        let res = sqlx::query("DELETE FROM sessions WHERE julianday(expires_at) <= julianday(?)")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}
