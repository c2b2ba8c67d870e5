use crate::{
    error::ApiError,
    storage::{DbSettingsStore, SettingKey},
};
use actix_web::{HttpResponse, get, put, web};
use serde::Deserialize;
use serde_json::Value;

#[get("/api/settings")]
pub(crate) async fn get_settings(
    settings: web::Data<DbSettingsStore>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(settings.snapshot().await?))
}

/// Values may arrive as numbers or numeric strings.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SettingsForm {
    learned_threshold: Option<Value>,
    block_size: Option<Value>,
}

/// Positive integers only; anything else is ignored rather than rejected.
fn positive(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|n| *n > 0)
}

#[put("/api/settings")]
pub(crate) async fn update_settings(
    settings: web::Data<DbSettingsStore>,
    form: web::Json<SettingsForm>,
) -> Result<HttpResponse, ApiError> {
    let updates = [
        (SettingKey::LearnedThreshold, &form.learned_threshold),
        (SettingKey::BlockSize, &form.block_size),
    ];
    for (key, value) in updates {
        if let Some(value) = value.as_ref().and_then(positive) {
            settings.set(key, value).await?;
        }
    }
    let body = serde_json::json!({ "message": "Settings updated successfully" });
    Ok(HttpResponse::Ok().json(body))
}
