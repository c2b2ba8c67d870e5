use crate::{
    db::{self, CardArgs, CreateOutcome, DbCard},
    error::ApiError,
    models::{CardStatus, Translation, UnknownStatus},
    review::Feedback,
    storage::{DbSettingsStore, SettingKey},
};
use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePool;

/// Cards handed out per review round when the client sends no usable limit.
const DEFAULT_REVIEW_LIMIT: u32 = 10;

/// The post body for creating a card, usually a search result the user kept.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct CardForm {
    turkish_word: Option<String>,
    translations: Option<Vec<Translation>>,
}

impl CardForm {
    fn into_args(self) -> Result<CardArgs, ApiError> {
        let turkish_word = self
            .turkish_word
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty());
        let translations = self.translations.filter(|t| !t.is_empty());
        let (Some(turkish_word), Some(translations)) = (turkish_word, translations) else {
            return Err(ApiError::Validation(
                "Turkish word and translations are required".to_string(),
            ));
        };
        if translations.iter().any(|t| t.ukrainian.trim().is_empty()) {
            return Err(ApiError::Validation(
                "Every translation needs a Ukrainian meaning".to_string(),
            ));
        }
        Ok(CardArgs {
            turkish_word,
            translations,
        })
    }
}

#[post("/api/cards")]
pub(crate) async fn create_card(
    db_pool: web::ThinData<SqlitePool>,
    form: web::Json<CardForm>,
) -> Result<HttpResponse, ApiError> {
    let args = form.into_inner().into_args()?;
    match DbCard::create(args, &db_pool).await? {
        CreateOutcome::Created(card) => {
            log::info!("created card {} for {:?}", card.id, card.turkish_word);
            Ok(HttpResponse::Created().json(card))
        }
        CreateOutcome::Duplicate => Err(ApiError::Conflict("Card already exists".to_string())),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewQuery {
    limit: Option<String>,
}

impl ReviewQuery {
    /// Anything that does not parse as a `u32` falls back to the default. That
    /// covers non-numeric input as well as out-of-range values such as negatives
    /// or anything above `u32::MAX`.
    fn limit(&self) -> u32 {
        self.limit
            .as_deref()
            .and_then(|l| l.trim().parse().ok())
            .unwrap_or(DEFAULT_REVIEW_LIMIT)
    }
}

#[get("/api/cards/review")]
pub(crate) async fn cards_for_review(
    db_pool: web::ThinData<SqlitePool>,
    query: web::Query<ReviewQuery>,
) -> Result<HttpResponse, ApiError> {
    let cards = DbCard::pick_for_review(query.limit(), &db_pool).await?;
    Ok(HttpResponse::Ok().json(cards))
}

#[get("/api/cards/list/{status}")]
pub(crate) async fn cards_by_status(
    db_pool: web::ThinData<SqlitePool>,
    status: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let status: CardStatus = status.parse().map_err(|err: UnknownStatus| {
        log::debug!("rejected card status {:?}", err.0);
        ApiError::Validation("Invalid status".to_string())
    })?;
    let cards = DbCard::list_by_status(status, &db_pool).await?;
    Ok(HttpResponse::Ok().json(cards))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewForm {
    feedback: Option<String>,
}

#[put("/api/cards/{card_id}/review")]
pub(crate) async fn review_card(
    db_pool: web::ThinData<SqlitePool>,
    settings: web::Data<DbSettingsStore>,
    card_id: web::Path<i64>,
    form: web::Json<ReviewForm>,
) -> Result<HttpResponse, ApiError> {
    let feedback = form
        .feedback
        .as_deref()
        .ok_or_else(|| ApiError::Validation("Feedback is required".to_string()))?
        .parse::<Feedback>()
        .map_err(|err| ApiError::Validation(err.to_string()))?;

    let threshold = settings.get(SettingKey::LearnedThreshold).await?;
    match DbCard::apply_review(card_id.into_inner(), feedback, threshold, &db_pool).await? {
        Some(reviewed) => Ok(HttpResponse::Ok().json(reviewed)),
        None => Err(ApiError::NotFound("Card not found".to_string())),
    }
}

#[get("/api/stats")]
pub(crate) async fn stats(db_pool: web::ThinData<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let stats = db::CardStats::current(&db_pool).await?;
    Ok(HttpResponse::Ok().json(stats))
}
