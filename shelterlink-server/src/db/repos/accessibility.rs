//! Per-user accessibility preferences
//!
//! One row per user. Reads of a user without a row yield the defaults; writes
//! upsert, so repeating a PUT leaves the same state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::db::{Db, DbError, Statement};
use crate::models::ValidationError;

const COLUMNS: &str = "user_id, font_size, high_contrast, reduce_motion, screen_reader, updated_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    ExtraLarge,
}

impl FontSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::ExtraLarge => "extra-large",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            "extra-large" => Ok(Self::ExtraLarge),
            _ => Err(ValidationError::InvalidFormat {
                field: "fontSize",
                reason: "must be one of small, medium, large, extra-large",
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilitySettings {
    pub user_id: i64,
    pub font_size: String,
    pub high_contrast: bool,
    pub reduce_motion: bool,
    pub screen_reader: bool,
    /// `None` when the user has never saved settings.
    pub updated_at: Option<DateTime<Utc>>,
}

impl AccessibilitySettings {
    pub fn defaults_for(user_id: i64) -> Self {
        Self {
            user_id,
            font_size: FontSize::default().as_str().to_string(),
            high_contrast: false,
            reduce_motion: false,
            screen_reader: false,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsInput {
    pub font_size: FontSize,
    pub high_contrast: bool,
    pub reduce_motion: bool,
    pub screen_reader: bool,
}

pub struct AccessibilityRepo<'a> {
    db: &'a Db,
}

impl<'a> AccessibilityRepo<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    pub async fn get(&self, user_id: i64) -> Result<AccessibilitySettings, DbError> {
        let stmt = Statement::new(format!(
            "SELECT {COLUMNS} FROM user_accessibility_settings WHERE user_id = $1"
        ))
        .bind(user_id);

        Ok(self
            .db
            .query_optional(&stmt)
            .await?
            .unwrap_or_else(|| AccessibilitySettings::defaults_for(user_id)))
    }

    pub async fn upsert(
        &self,
        user_id: i64,
        input: SettingsInput,
    ) -> Result<AccessibilitySettings, DbError> {
        let stmt = Statement::new(format!(
            "INSERT INTO user_accessibility_settings \
             (user_id, font_size, high_contrast, reduce_motion, screen_reader) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id) DO UPDATE SET font_size = EXCLUDED.font_size, \
             high_contrast = EXCLUDED.high_contrast, reduce_motion = EXCLUDED.reduce_motion, \
             screen_reader = EXCLUDED.screen_reader, updated_at = NOW() \
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(input.font_size.as_str())
        .bind(input.high_contrast)
        .bind(input.reduce_motion)
        .bind(input.screen_reader);

        self.db.query_one(&stmt).await
    }
}
