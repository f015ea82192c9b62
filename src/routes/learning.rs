use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::db::operations::vocabulary::Difficulty;
use crate::response::{db_error, AppError};
use crate::services::quiz::{self, QuizAnswer, QuizError};
use crate::services::session::{self, SessionError};
use crate::state::AppState;

#[derive(Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueWordsQuery {
    difficulty: Option<String>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    word_id: String,
    correct: bool,
    #[serde(default)]
    time_spent: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuery {
    difficulty: Option<String>,
    count: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    answers: Vec<QuizAnswer>,
    #[serde(default)]
    time_spent: Option<i64>,
}

fn parse_difficulty(raw: Option<&str>) -> Result<Difficulty, AppError> {
    match raw {
        None => Ok(Difficulty::Beginner),
        Some(value) => Difficulty::parse(value).ok_or_else(|| {
            AppError::validation("difficulty must be beginner, intermediate or advanced")
        }),
    }
}

pub async fn due_words(
    State(state): State<AppState>,
    Query(query): Query<DueWordsQuery>,
) -> Response {
    let difficulty = match parse_difficulty(query.difficulty.as_deref()) {
        Ok(d) => d,
        Err(err) => return err.into_response(),
    };
    let limit = query.limit.unwrap_or(10);
    if !(1..=100).contains(&limit) {
        return AppError::validation("limit must be between 1 and 100").into_response();
    }

    match session::words_due_for_practice(state.storage(), difficulty, limit).await {
        Ok(words) => Json(SuccessResponse {
            success: true,
            data: words,
        })
        .into_response(),
        Err(err) => db_error("due words lookup", err).into_response(),
    }
}

pub async fn submit_answer(
    State(state): State<AppState>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Response {
    if payload.word_id.trim().is_empty() {
        return AppError::validation("wordId is required").into_response();
    }
    let time_spent = payload.time_spent.unwrap_or(0);
    if time_spent < 0 {
        return AppError::validation("timeSpent must be non-negative").into_response();
    }

    match session::submit_answer(state.storage(), &payload.word_id, payload.correct, time_spent)
        .await
    {
        Ok(status) => Json(SuccessResponse {
            success: true,
            data: status,
        })
        .into_response(),
        Err(SessionError::WordNotFound) => {
            AppError::not_found("word not found").into_response()
        }
        Err(SessionError::Db(err)) => db_error("submit answer", err).into_response(),
    }
}

pub async fn quiz(State(state): State<AppState>, Query(query): Query<QuizQuery>) -> Response {
    let difficulty = match parse_difficulty(query.difficulty.as_deref()) {
        Ok(d) => d,
        Err(err) => return err.into_response(),
    };
    let count = query.count.unwrap_or(10);
    if !(1..=100).contains(&count) {
        return AppError::validation("count must be between 1 and 100").into_response();
    }

    let mut rng = StdRng::from_os_rng();
    match quiz::generate_quiz(state.storage(), difficulty, count as usize, &mut rng).await {
        Ok(questions) => Json(SuccessResponse {
            success: true,
            data: questions,
        })
        .into_response(),
        Err(err) => db_error("quiz generation", err).into_response(),
    }
}

pub async fn submit_quiz(
    State(state): State<AppState>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Response {
    let time_spent = payload.time_spent.unwrap_or(0);
    if time_spent < 0 {
        return AppError::validation("timeSpent must be non-negative").into_response();
    }

    match quiz::grade_quiz(
        state.storage(),
        &payload.answers,
        time_spent,
        state.quiz_mastery_feedback(),
    )
    .await
    {
        Ok(grade) => Json(SuccessResponse {
            success: true,
            data: grade,
        })
        .into_response(),
        Err(QuizError::EmptyAnswers) => {
            AppError::validation("answers array is required").into_response()
        }
        Err(QuizError::Db(err)) => db_error("quiz grading", err).into_response(),
    }
}
