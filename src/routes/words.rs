use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::operations::vocabulary::{self, Difficulty, EntryFilter, NewVocabularyEntry};
use crate::response::{db_error, AppError};
use crate::state::AppState;

#[derive(Serialize)]
struct SuccessResponse<T> {
    success: bool,
    data: T,
}

#[derive(Serialize)]
struct MessageResponse {
    success: bool,
    message: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWordsQuery {
    difficulty: Option<String>,
    category: Option<String>,
    search: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWordRequest {
    word: String,
    #[serde(default)]
    pronunciation: Option<String>,
    #[serde(default)]
    part_of_speech: Option<String>,
    definition: String,
    #[serde(default)]
    example: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
}

pub async fn list_words(
    State(state): State<AppState>,
    Query(query): Query<ListWordsQuery>,
) -> Response {
    let difficulty = match query.difficulty.as_deref() {
        None => None,
        Some(raw) => match Difficulty::parse(raw) {
            Some(d) => Some(d),
            None => {
                return AppError::validation(
                    "difficulty must be beginner, intermediate or advanced",
                )
                .into_response()
            }
        },
    };

    let filter = EntryFilter {
        difficulty,
        category: query.category,
        search: query.search,
    };

    match vocabulary::list_entries(state.storage(), &filter).await {
        Ok(entries) => Json(SuccessResponse {
            success: true,
            data: entries,
        })
        .into_response(),
        Err(err) => db_error("word listing", err).into_response(),
    }
}

pub async fn create_word(
    State(state): State<AppState>,
    Json(payload): Json<CreateWordRequest>,
) -> Response {
    if payload.word.trim().is_empty() {
        return AppError::validation("word is required").into_response();
    }
    if payload.definition.trim().is_empty() {
        return AppError::validation("definition is required").into_response();
    }
    let difficulty = match payload.difficulty.as_deref() {
        None => Difficulty::Beginner,
        Some(raw) => match Difficulty::parse(raw) {
            Some(d) => d,
            None => {
                return AppError::validation(
                    "difficulty must be beginner, intermediate or advanced",
                )
                .into_response()
            }
        },
    };

    let word = payload.word.trim().to_string();
    match vocabulary::find_by_word(state.storage(), &word).await {
        Ok(Some(_)) => return AppError::conflict("word already exists").into_response(),
        Ok(None) => {}
        Err(err) => return db_error("duplicate word check", err).into_response(),
    }

    let new_entry = NewVocabularyEntry {
        word,
        pronunciation: payload.pronunciation.unwrap_or_default(),
        part_of_speech: payload.part_of_speech.unwrap_or_default(),
        definition: payload.definition,
        example: payload.example.unwrap_or_default(),
        difficulty,
        category: payload.category.unwrap_or_default(),
        synonyms: payload.synonyms,
        antonyms: payload.antonyms,
    };

    match vocabulary::insert_entry(state.storage(), new_entry).await {
        Ok(entry) => (
            StatusCode::CREATED,
            Json(SuccessResponse {
                success: true,
                data: entry,
            }),
        )
            .into_response(),
        Err(err) => db_error("word creation", err).into_response(),
    }
}

pub async fn get_word(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match vocabulary::find_by_id(state.storage(), &id).await {
        Ok(Some(entry)) => Json(SuccessResponse {
            success: true,
            data: entry,
        })
        .into_response(),
        Ok(None) => AppError::not_found("word not found").into_response(),
        Err(err) => db_error("word lookup", err).into_response(),
    }
}

pub async fn delete_word(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match vocabulary::delete_entry(state.storage(), &id).await {
        Ok(true) => Json(MessageResponse {
            success: true,
            message: "word deleted",
        })
        .into_response(),
        Ok(false) => AppError::not_found("word not found").into_response(),
        Err(err) => db_error("word deletion", err).into_response(),
    }
}
