//! Persistent key/value settings backed by the `setting` table.
//!
//! Every key has a declared type and default. Reading a key that was never
//! written stores its default, so the table always reflects what the app uses.

use crate::review::DEFAULT_LEARNED_THRESHOLD;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePool;
use thiserror::Error;

pub const DEFAULT_BLOCK_SIZE: u32 = 10;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Setting {key} holds {value:?}, which is not a valid number")]
    InvalidValue { key: &'static str, value: String },
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    LearnedThreshold,
    BlockSize,
}

impl SettingKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::LearnedThreshold => "learned_threshold",
            SettingKey::BlockSize => "block_size",
        }
    }

    pub fn default_value(self) -> u32 {
        match self {
            SettingKey::LearnedThreshold => DEFAULT_LEARNED_THRESHOLD,
            SettingKey::BlockSize => DEFAULT_BLOCK_SIZE,
        }
    }
}

/// All settings, as returned by `GET /api/settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub learned_threshold: u32,
    pub block_size: u32,
}

pub struct DbSettingsStore {
    db_pool: SqlitePool,
}

impl DbSettingsStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db_pool: db }
    }

    /// Returns the stored value, writing the key's default first if absent.
    pub async fn get(&self, key: SettingKey) -> Result<u32, SettingsError> {
        sqlx::query("INSERT INTO setting (key, value) VALUES ($1, $2) ON CONFLICT (key) DO NOTHING")
            .bind(key.as_str())
            .bind(key.default_value().to_string())
            .execute(&self.db_pool)
            .await?;

        let value: String = sqlx::query_scalar("SELECT value FROM setting WHERE key = $1")
            .bind(key.as_str())
            .fetch_one(&self.db_pool)
            .await?;

        value
            .trim()
            .parse()
            .map_err(|_| SettingsError::InvalidValue {
                key: key.as_str(),
                value,
            })
    }

    /// Upserts without range checks; callers validate.
    pub async fn set(&self, key: SettingKey, value: u32) -> Result<(), SettingsError> {
        sqlx::query(
            "
INSERT INTO setting (key, value) VALUES ($1, $2)
ON CONFLICT (key) DO UPDATE SET value = excluded.value
",
        )
        .bind(key.as_str())
        .bind(value.to_string())
        .execute(&self.db_pool)
        .await?;
        log::info!("setting {} updated to {value}", key.as_str());
        Ok(())
    }

    pub async fn snapshot(&self) -> Result<Settings, SettingsError> {
        Ok(Settings {
            learned_threshold: self.get(SettingKey::LearnedThreshold).await?,
            block_size: self.get(SettingKey::BlockSize).await?,
        })
    }
}
