//! Accessibility settings endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::db::repos::{AccessibilityRepo, AccessibilitySettings, FontSize, SettingsInput};
use crate::http::envelope::{ApiResponse, ApiResult};
use crate::http::extractors::{JsonBody, PathId};
use crate::http::server::AppState;
use crate::models::ValidationError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    pub font_size: Option<String>,
    pub high_contrast: Option<bool>,
    pub reduce_motion: Option<bool>,
    pub screen_reader: Option<bool>,
}

impl SettingsRequest {
    /// Omitted fields take their defaults, so a PUT is a full replacement.
    fn validate(self) -> Result<SettingsInput, ValidationError> {
        Ok(SettingsInput {
            font_size: self
                .font_size
                .as_deref()
                .map(FontSize::parse)
                .transpose()?
                .unwrap_or_default(),
            high_contrast: self.high_contrast.unwrap_or(false),
            reduce_motion: self.reduce_motion.unwrap_or(false),
            screen_reader: self.screen_reader.unwrap_or(false),
        })
    }
}

/// GET /api/accessibility-settings/{userId}
async fn get_settings(
    State(state): State<Arc<AppState>>,
    PathId(user_id): PathId,
) -> ApiResult<AccessibilitySettings> {
    Ok(ApiResponse::ok(AccessibilityRepo::new(&state.db).get(user_id).await?))
}

/// PUT /api/accessibility-settings/{userId}
async fn put_settings(
    State(state): State<Arc<AppState>>,
    PathId(user_id): PathId,
    JsonBody(req): JsonBody<SettingsRequest>,
) -> ApiResult<AccessibilitySettings> {
    let input = req.validate()?;
    let saved = AccessibilityRepo::new(&state.db).upsert(user_id, input).await?;
    Ok(ApiResponse::ok(saved))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/accessibility-settings/{user_id}",
        get(get_settings).put(put_settings),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omitted_fields_reset_to_defaults() {
        let req: SettingsRequest = serde_json::from_value(json!({"highContrast": true})).unwrap();
        let input = req.validate().unwrap();
        assert_eq!(input.font_size, FontSize::Medium);
        assert!(input.high_contrast);
        assert!(!input.screen_reader);
    }

    #[test]
    fn unknown_font_size_is_rejected() {
        let req: SettingsRequest = serde_json::from_value(json!({"fontSize": "huge"})).unwrap();
        assert!(req.validate().is_err());
    }
}
