use crate::{error::ApiError, lookup::TranslationLookup, models::Translation};
use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct SearchForm {
    word: Option<String>,
}

#[derive(Debug, Serialize)]
struct SearchResult {
    turkish_word: String,
    translations: Vec<Translation>,
}

/// Looks a word up without saving it; the client posts the result to
/// `/api/cards` if the user keeps it.
#[post("/api/words/search")]
pub(crate) async fn search_word(
    lookup: web::Data<dyn TranslationLookup>,
    form: web::Json<SearchForm>,
) -> Result<HttpResponse, ApiError> {
    let Some(word) = form
        .into_inner()
        .word
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
    else {
        return Err(ApiError::Validation("Word is required".to_string()));
    };

    let translations = lookup.lookup(&word).await?;
    Ok(HttpResponse::Ok().json(SearchResult {
        turkish_word: word,
        translations,
    }))
}
