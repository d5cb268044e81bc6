use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/api/health", get(handlers::health_check))
        // Stories and translations
        .route("/api/stories", get(handlers::list_stories).post(handlers::create_story))
        .route(
            "/api/stories/:id",
            get(handlers::get_story)
                .put(handlers::update_story)
                .delete(handlers::delete_story),
        )
        .route(
            "/api/stories/:id/translations",
            get(handlers::get_story_translations).post(handlers::add_story_translation),
        )
        // Favorites
        .route("/api/stories/:id/favorite", post(handlers::toggle_favorite))
        .route("/api/favorites/:user_id", get(handlers::list_favorite_stories))
        // Banners and quotes
        .route("/api/banners", get(handlers::list_banners).post(handlers::create_banner))
        .route("/api/banners/active", get(handlers::get_active_banner))
        .route("/api/banners/:id", put(handlers::update_banner).delete(handlers::delete_banner))
        .route("/api/quotes", get(handlers::list_quotes).post(handlers::create_quote))
        .route("/api/quotes/active", get(handlers::get_active_quote))
        .route("/api/quotes/:id", put(handlers::update_quote).delete(handlers::delete_quote))
        // Word/phrase translation
        .route("/api/translate", post(handlers::translate_text))
        // Translation drafts
        .route(
            "/api/stories/:id/drafts",
            get(handlers::list_drafts).post(handlers::save_draft),
        )
        .route(
            "/api/stories/:id/drafts/:draft_id",
            get(handlers::get_draft).delete(handlers::delete_draft),
        )
        // Translation sessions (AI assistant)
        .route("/api/sessions", post(handlers::create_session))
        .route("/api/sessions/:id", get(handlers::get_session).delete(handlers::close_session))
        .route("/api/sessions/:id/input", post(handlers::session_input))
        .route("/api/sessions/:id/ai-mode", post(handlers::set_ai_mode))
        .route("/api/sessions/:id/assess", post(handlers::refresh_assessment))
        .route("/api/sessions/:id/alternatives", post(handlers::generate_alternatives))
        .route("/api/sessions/:id/apply-alternative", post(handlers::apply_alternative))
        .route("/api/sessions/:id/apply-suggestion", post(handlers::apply_suggestion))
        .route("/api/sessions/:id/autocomplete", post(handlers::autocomplete))
}
