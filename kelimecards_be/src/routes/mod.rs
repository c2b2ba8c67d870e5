pub(crate) mod cards;
pub(crate) mod settings;
pub(crate) mod words;

use crate::error::ApiError;
use actix_web::web;

/// Registers every JSON API endpoint. Malformed JSON bodies become 400s with
/// the same error shape as the handlers' own validation errors.
pub(crate) fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid JSON body: {err}")).into()
    }))
    .service(words::search_word)
    .service(cards::create_card)
    .service(cards::cards_for_review)
    .service(cards::cards_by_status)
    .service(cards::review_card)
    .service(cards::stats)
    .service(settings::get_settings)
    .service(settings::update_settings);
}
