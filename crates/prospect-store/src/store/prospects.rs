//! Active phone list — set semantics over insertion order.

use super::Store;
use prospect_core::ProspectError;

impl Store {
    /// Add a canonical number if absent. Returns `true` when inserted,
    /// `false` when the number was already on the list.
    pub async fn add_prospect(&self, phone: &str) -> Result<bool, ProspectError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO prospects (phone, position) \
             SELECT ?, COALESCE(MAX(position), -1) + 1 FROM prospects",
        )
        .bind(phone)
        .execute(&self.pool)
        .await
        .map_err(|e| ProspectError::Store(format!("insert failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Add a batch of canonical numbers, returning how many were new.
    pub async fn add_prospects(&self, phones: &[String]) -> Result<usize, ProspectError> {
        let mut added = 0;
        for phone in phones {
            if self.add_prospect(phone).await? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// The active list, in first-seen order.
    pub async fn list_prospects(&self) -> Result<Vec<String>, ProspectError> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT phone FROM prospects ORDER BY position ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| ProspectError::Store(format!("query failed: {e}")))?;

        Ok(rows.into_iter().map(|(p,)| p).collect())
    }

    /// Remove one number. Returns `true` if it was on the list.
    pub async fn remove_prospect(&self, phone: &str) -> Result<bool, ProspectError> {
        let result = sqlx::query("DELETE FROM prospects WHERE phone = ?")
            .bind(phone)
            .execute(&self.pool)
            .await
            .map_err(|e| ProspectError::Store(format!("delete failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Empty the list. Returns how many numbers were removed.
    pub async fn clear_prospects(&self) -> Result<u64, ProspectError> {
        let result = sqlx::query("DELETE FROM prospects")
            .execute(&self.pool)
            .await
            .map_err(|e| ProspectError::Store(format!("delete failed: {e}")))?;

        Ok(result.rows_affected())
    }
}
