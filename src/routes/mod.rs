mod health;
mod learning;
mod progress;
mod words;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::Router;

use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .route("/api/learning/words", get(learning::due_words))
        .route("/api/learning/submit", post(learning::submit_answer))
        .route("/api/learning/quiz", get(learning::quiz))
        .route("/api/learning/quiz/submit", post(learning::submit_quiz))
        .route(
            "/api/progress/daily",
            get(progress::daily).post(progress::update_daily),
        )
        .route("/api/progress/history", get(progress::history))
        .route("/api/progress/stats", get(progress::stats))
        .route("/api/progress/goals", put(progress::update_goals))
        .route("/api/words", get(words::list_words).post(words::create_word))
        .route(
            "/api/words/:id",
            get(words::get_word).delete(words::delete_word),
        )
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "route not found").into_response()
}
