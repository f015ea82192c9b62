use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

use crate::db::{format_timestamp, parse_timestamp, Storage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningStatus {
    New,
    Learning,
    Reviewing,
    Mastered,
}

impl LearningStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningStatus::New => "new",
            LearningStatus::Learning => "learning",
            LearningStatus::Reviewing => "reviewing",
            LearningStatus::Mastered => "mastered",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(LearningStatus::New),
            "learning" => Some(LearningStatus::Learning),
            "reviewing" => Some(LearningStatus::Reviewing),
            "mastered" => Some(LearningStatus::Mastered),
            _ => None,
        }
    }
}

/// Per-word learning history. The `status` field is derived by the review
/// policy; nothing else in the crate writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStatus {
    pub word_id: String,
    pub status: LearningStatus,
    pub correct_answers: i64,
    pub total_attempts: i64,
    pub mastery_score: i64,
    pub last_review_date: DateTime<Utc>,
    pub next_review_date: DateTime<Utc>,
}

impl WordStatus {
    /// State of a word that has never been attempted.
    pub fn new_for(word_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            word_id: word_id.to_string(),
            status: LearningStatus::New,
            correct_answers: 0,
            total_attempts: 0,
            mastery_score: 0,
            last_review_date: now,
            next_review_date: now,
        }
    }
}

pub async fn get_word_status(
    storage: &Storage,
    word_id: &str,
) -> Result<Option<WordStatus>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM "word_status" WHERE "wordId" = ? LIMIT 1"#)
        .bind(word_id)
        .fetch_optional(storage.pool())
        .await?;
    Ok(row.map(|r| map_word_status(&r)))
}

pub async fn upsert_word_status(storage: &Storage, status: &WordStatus) -> Result<(), sqlx::Error> {
    let now = format_timestamp(Utc::now());

    sqlx::query(
        r#"
        INSERT INTO "word_status"
            ("wordId", "status", "correctAnswers", "totalAttempts", "masteryScore",
             "lastReviewDate", "nextReviewDate", "createdAt", "updatedAt")
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT("wordId") DO UPDATE SET
            "status" = excluded."status",
            "correctAnswers" = excluded."correctAnswers",
            "totalAttempts" = excluded."totalAttempts",
            "masteryScore" = excluded."masteryScore",
            "lastReviewDate" = excluded."lastReviewDate",
            "nextReviewDate" = excluded."nextReviewDate",
            "updatedAt" = excluded."updatedAt"
        "#,
    )
    .bind(&status.word_id)
    .bind(status.status.as_str())
    .bind(status.correct_answers)
    .bind(status.total_attempts)
    .bind(status.mastery_score)
    .bind(format_timestamp(status.last_review_date))
    .bind(format_timestamp(status.next_review_date))
    .bind(&now)
    .bind(&now)
    .execute(storage.pool())
    .await?;
    Ok(())
}

fn map_word_status(row: &sqlx::sqlite::SqliteRow) -> WordStatus {
    let status_raw: String = row.try_get("status").unwrap_or_default();
    let last_raw: String = row.try_get("lastReviewDate").unwrap_or_default();
    let next_raw: String = row.try_get("nextReviewDate").unwrap_or_default();

    WordStatus {
        word_id: row.try_get("wordId").unwrap_or_default(),
        status: LearningStatus::parse(&status_raw).unwrap_or(LearningStatus::New),
        correct_answers: row.try_get("correctAnswers").unwrap_or(0),
        total_attempts: row.try_get("totalAttempts").unwrap_or(0),
        mastery_score: row.try_get("masteryScore").unwrap_or(0),
        last_review_date: parse_timestamp(&last_raw).unwrap_or_else(Utc::now),
        next_review_date: parse_timestamp(&next_raw).unwrap_or_else(Utc::now),
    }
}
