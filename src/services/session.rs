//! Learning sessions: serving due words and recording answer outcomes.

use chrono::Utc;
use thiserror::Error;

use crate::db::operations::vocabulary::{self, Difficulty, VocabularyEntry};
use crate::db::operations::word_status::{self, WordStatus};
use crate::db::Storage;
use crate::services::progress::{self, DailyDelta};
use crate::services::review_policy;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("word not found")]
    WordNotFound,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Words of one difficulty that are due for practice: never attempted, still
/// `new`/`learning`, or past their next review date. Oldest entries first,
/// at most `limit`.
pub async fn words_due_for_practice(
    storage: &Storage,
    difficulty: Difficulty,
    limit: i64,
) -> Result<Vec<VocabularyEntry>, sqlx::Error> {
    vocabulary::find_due_for_practice(storage, difficulty, Utc::now(), limit).await
}

/// Records one answer: loads or defaults the word's state, runs the review
/// policy, persists the result, and attributes the attempt to today's
/// progress. The word must exist in the catalog.
pub async fn submit_answer(
    storage: &Storage,
    word_id: &str,
    correct: bool,
    time_spent: i64,
) -> Result<WordStatus, SessionError> {
    if vocabulary::find_by_id(storage, word_id).await?.is_none() {
        return Err(SessionError::WordNotFound);
    }

    let prior = word_status::get_word_status(storage, word_id).await?;
    let first_attempt = prior.is_none();
    let updated = review_policy::record_attempt(prior, word_id, correct, Utc::now());
    word_status::upsert_word_status(storage, &updated).await?;

    let mut delta = DailyDelta {
        time_spent: time_spent.max(0),
        ..Default::default()
    };
    if first_attempt {
        delta.words_learned.push(word_id.to_string());
    } else {
        delta.words_reviewed.push(word_id.to_string());
    }
    progress::apply_daily_update(storage, progress::today(), delta).await?;

    Ok(updated)
}
