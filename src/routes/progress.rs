use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::operations::daily_progress::DATE_FORMAT;
use crate::response::{db_error, AppError};
use crate::services::progress::{self, DailyDelta};
use crate::state::AppState;

#[derive(Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyQuery {
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyUpdateRequest {
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    words_learned: Vec<String>,
    #[serde(default)]
    words_reviewed: Vec<String>,
    #[serde(default)]
    time_spent: Option<i64>,
    #[serde(default)]
    quiz_score: Option<i64>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    days: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsRequest {
    #[serde(default)]
    weekly_goal: Option<i64>,
    #[serde(default)]
    monthly_goal: Option<i64>,
}

fn parse_date(raw: Option<&str>) -> Result<NaiveDate, AppError> {
    match raw {
        None => Ok(progress::today()),
        Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map_err(|_| AppError::validation("date must be formatted YYYY-MM-DD")),
    }
}

pub async fn daily(State(state): State<AppState>, Query(query): Query<DailyQuery>) -> Response {
    let date = match parse_date(query.date.as_deref()) {
        Ok(date) => date,
        Err(err) => return err.into_response(),
    };

    match progress::get_daily(state.storage(), date).await {
        Ok(record) => Json(SuccessResponse {
            success: true,
            data: record,
        })
        .into_response(),
        Err(err) => db_error("daily progress lookup", err).into_response(),
    }
}

pub async fn update_daily(
    State(state): State<AppState>,
    Json(payload): Json<DailyUpdateRequest>,
) -> Response {
    let date = match parse_date(payload.date.as_deref()) {
        Ok(date) => date,
        Err(err) => return err.into_response(),
    };
    let time_spent = payload.time_spent.unwrap_or(0);
    if time_spent < 0 {
        return AppError::validation("timeSpent must be non-negative").into_response();
    }
    if let Some(score) = payload.quiz_score {
        if !(0..=100).contains(&score) {
            return AppError::validation("quizScore must be between 0 and 100").into_response();
        }
    }

    let delta = DailyDelta {
        words_learned: payload.words_learned,
        words_reviewed: payload.words_reviewed,
        time_spent,
        quiz_score: payload.quiz_score,
        notes: payload.notes,
    };

    match progress::apply_daily_update(state.storage(), date, delta).await {
        Ok(record) => Json(SuccessResponse {
            success: true,
            data: record,
        })
        .into_response(),
        Err(err) => db_error("daily progress update", err).into_response(),
    }
}

pub async fn history(State(state): State<AppState>, Query(query): Query<HistoryQuery>) -> Response {
    let days = query.days.unwrap_or(30);
    if !(1..=365).contains(&days) {
        return AppError::validation("days must be between 1 and 365").into_response();
    }

    match progress::history(state.storage(), days as u64).await {
        Ok(records) => Json(SuccessResponse {
            success: true,
            data: records,
        })
        .into_response(),
        Err(err) => db_error("progress history lookup", err).into_response(),
    }
}

pub async fn stats(State(state): State<AppState>) -> Response {
    match progress::get_stats(state.storage()).await {
        Ok(stats) => Json(SuccessResponse {
            success: true,
            data: stats,
        })
        .into_response(),
        Err(err) => db_error("user stats lookup", err).into_response(),
    }
}

pub async fn update_goals(
    State(state): State<AppState>,
    Json(payload): Json<GoalsRequest>,
) -> Response {
    for goal in [payload.weekly_goal, payload.monthly_goal].into_iter().flatten() {
        if goal <= 0 {
            return AppError::validation("goals must be positive").into_response();
        }
    }

    match progress::update_goals(state.storage(), payload.weekly_goal, payload.monthly_goal).await {
        Ok(stats) => Json(SuccessResponse {
            success: true,
            data: stats,
        })
        .into_response(),
        Err(err) => db_error("goals update", err).into_response(),
    }
}
