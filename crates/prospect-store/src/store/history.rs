//! Append-only send history.

use super::Store;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use prospect_core::{
    record::{SendKind, SendRecord, SendStatus},
    traits::SendLog,
    ProspectError,
};
use uuid::Uuid;

impl Store {
    /// Append one send record, stamped `sent` at the current time.
    pub async fn append_send(
        &self,
        user_id: &str,
        phone_number: &str,
        message: &str,
        kind: SendKind,
        contact_name: Option<&str>,
        contact_email: Option<&str>,
    ) -> Result<SendRecord, ProspectError> {
        let record = SendRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            phone_number: phone_number.to_string(),
            message: message.to_string(),
            kind,
            status: SendStatus::Sent,
            contact_name: contact_name.map(str::to_string),
            contact_email: contact_email.map(str::to_string),
            sent_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO send_history \
             (id, user_id, phone_number, message, kind, status, contact_name, contact_email, sent_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.phone_number)
        .bind(&record.message)
        .bind(record.kind.as_str())
        .bind(record.status.as_str())
        .bind(&record.contact_name)
        .bind(&record.contact_email)
        .bind(record.sent_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| ProspectError::Store(format!("history append failed: {e}")))?;

        Ok(record)
    }

    /// Newest-first history for a user.
    pub async fn get_history(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<SendRecord>, ProspectError> {
        type Row = (
            String,
            String,
            String,
            String,
            String,
            Option<String>,
            Option<String>,
            String,
        );
        let rows: Vec<Row> = sqlx::query_as(
            "SELECT id, phone_number, message, kind, status, contact_name, contact_email, sent_at \
             FROM send_history WHERE user_id = ? ORDER BY sent_at DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ProspectError::Store(format!("query failed: {e}")))?;

        rows.into_iter()
            .map(
                |(id, phone_number, message, kind, status, contact_name, contact_email, sent_at)| {
                    Ok(SendRecord {
                        id,
                        user_id: user_id.to_string(),
                        phone_number,
                        message,
                        kind: SendKind::parse(&kind).ok_or_else(|| {
                            ProspectError::Store(format!("unknown send kind: {kind}"))
                        })?,
                        status: SendStatus::parse(&status).ok_or_else(|| {
                            ProspectError::Store(format!("unknown send status: {status}"))
                        })?,
                        contact_name,
                        contact_email,
                        sent_at: DateTime::parse_from_rfc3339(&sent_at)
                            .map_err(|e| {
                                ProspectError::Store(format!("bad sent_at timestamp: {e}"))
                            })?
                            .with_timezone(&Utc),
                    })
                },
            )
            .collect()
    }

    /// Delete a user's whole history. Returns how many rows went.
    pub async fn clear_history(&self, user_id: &str) -> Result<u64, ProspectError> {
        let result = sqlx::query("DELETE FROM send_history WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| ProspectError::Store(format!("delete failed: {e}")))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SendLog for Store {
    async fn record_send(
        &self,
        user_id: &str,
        phone_number: &str,
        message: &str,
        kind: SendKind,
        contact_name: Option<&str>,
        contact_email: Option<&str>,
    ) -> Result<SendRecord, ProspectError> {
        self.append_send(user_id, phone_number, message, kind, contact_name, contact_email)
            .await
    }
}
