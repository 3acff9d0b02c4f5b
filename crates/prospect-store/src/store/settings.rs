//! Key/value user settings.
//!
//! Loaded once at startup into a [`Settings`] snapshot and written back
//! key-by-key on change. Keys mirror the persisted client state of the
//! original web app: theme, CRM token, CRM enabled flag.

use super::Store;
use prospect_core::ProspectError;

pub const THEME_KEY: &str = "theme";
pub const RDSTATION_ENABLED_KEY: &str = "rdstation_enabled";
pub const RDSTATION_TOKEN_KEY: &str = "rdstation_token";

/// Typed snapshot of the settings table.
#[derive(Debug, Clone)]
pub struct Settings {
    /// `light` or `dark`.
    pub theme: String,
    pub rdstation_enabled: bool,
    pub rdstation_token: String,
}

impl Settings {
    /// Read the snapshot used for the rest of the invocation.
    pub async fn load(store: &Store) -> Result<Self, ProspectError> {
        Ok(Self {
            theme: store
                .get_setting(THEME_KEY)
                .await?
                .unwrap_or_else(|| "light".to_string()),
            rdstation_enabled: store
                .get_setting(RDSTATION_ENABLED_KEY)
                .await?
                .as_deref()
                == Some("true"),
            rdstation_token: store
                .get_setting(RDSTATION_TOKEN_KEY)
                .await?
                .unwrap_or_default(),
        })
    }
}

impl Store {
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>, ProspectError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM settings WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| ProspectError::Store(format!("query failed: {e}")))?;

        Ok(row.map(|(v,)| v))
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<(), ProspectError> {
        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| ProspectError::Store(format!("upsert failed: {e}")))?;

        Ok(())
    }

    pub async fn set_theme(&self, theme: &str) -> Result<(), ProspectError> {
        self.set_setting(THEME_KEY, theme).await
    }

    pub async fn set_rdstation_enabled(&self, enabled: bool) -> Result<(), ProspectError> {
        self.set_setting(RDSTATION_ENABLED_KEY, if enabled { "true" } else { "false" })
            .await
    }

    /// Store the CRM token. A non-empty token also switches the
    /// integration on, matching how configuring a token behaves in the
    /// original client.
    pub async fn set_rdstation_token(&self, token: &str) -> Result<(), ProspectError> {
        self.set_setting(RDSTATION_TOKEN_KEY, token).await?;
        if !token.is_empty() {
            self.set_rdstation_enabled(true).await?;
        }
        Ok(())
    }
}
