//! Transfer records.

use super::Store;
use chrono::{DateTime, Utc};
use prospect_core::{
    record::{TransferItem, TransferKind},
    ProspectError,
};

impl Store {
    pub async fn record_transfer(&self, item: &TransferItem) -> Result<(), ProspectError> {
        sqlx::query(
            "INSERT INTO transfers (id, user_id, kind, name, url, size_bytes, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&item.id)
        .bind(&item.user_id)
        .bind(item.kind.as_str())
        .bind(&item.name)
        .bind(&item.url)
        .bind(item.size_bytes as i64)
        .bind(item.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| ProspectError::Store(format!("insert failed: {e}")))?;

        Ok(())
    }

    /// A user's transfers, newest first.
    pub async fn list_transfers(&self, user_id: &str) -> Result<Vec<TransferItem>, ProspectError> {
        type Row = (String, String, String, String, i64, String);
        let rows: Vec<Row> = sqlx::query_as(
            "SELECT id, kind, name, url, size_bytes, created_at \
             FROM transfers WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProspectError::Store(format!("query failed: {e}")))?;

        rows.into_iter()
            .map(|(id, kind, name, url, size_bytes, created_at)| {
                Ok(TransferItem {
                    id,
                    user_id: user_id.to_string(),
                    kind: TransferKind::parse(&kind).ok_or_else(|| {
                        ProspectError::Store(format!("unknown transfer kind: {kind}"))
                    })?,
                    name,
                    url,
                    size_bytes: size_bytes as u64,
                    created_at: DateTime::parse_from_rfc3339(&created_at)
                        .map_err(|e| ProspectError::Store(format!("bad created_at: {e}")))?
                        .with_timezone(&Utc),
                })
            })
            .collect()
    }

    /// Delete one transfer record. Returns `true` if it existed.
    pub async fn delete_transfer(&self, id: &str, user_id: &str) -> Result<bool, ProspectError> {
        let result = sqlx::query("DELETE FROM transfers WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| ProspectError::Store(format!("delete failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}
