use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

use crate::db::{format_timestamp, Storage};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub date: String,
    pub words_learned: Vec<String>,
    pub words_reviewed: Vec<String>,
    pub time_spent: i64,
    pub quiz_score: i64,
    pub streak_count: i64,
    pub notes: String,
}

impl DailyProgress {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date: format_date(date),
            words_learned: Vec::new(),
            words_reviewed: Vec::new(),
            time_spent: 0,
            quiz_score: 0,
            streak_count: 0,
            notes: String::new(),
        }
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub async fn get_daily_progress(
    storage: &Storage,
    date: NaiveDate,
) -> Result<Option<DailyProgress>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM "daily_progress" WHERE "date" = ? LIMIT 1"#)
        .bind(format_date(date))
        .fetch_optional(storage.pool())
        .await?;
    Ok(row.map(|r| map_daily_progress(&r)))
}

/// Upserts one day's record. The word-id sets arrive pre-merged (union of the
/// stored sets and the delta), which makes them last-write-wins under
/// concurrent writers; `timeSpent` accumulates atomically inside the store so
/// concurrent time increments are never dropped. `quizScore` and `notes` are
/// only overwritten when the caller provided a value.
#[allow(clippy::too_many_arguments)]
pub async fn upsert_daily_progress(
    storage: &Storage,
    date: NaiveDate,
    words_learned: &[String],
    words_reviewed: &[String],
    time_delta: i64,
    quiz_score: Option<i64>,
    notes: Option<&str>,
    streak_count: i64,
) -> Result<(), sqlx::Error> {
    let now = format_timestamp(Utc::now());
    let learned_json = serde_json::to_string(words_learned).unwrap_or_else(|_| "[]".to_string());
    let reviewed_json = serde_json::to_string(words_reviewed).unwrap_or_else(|_| "[]".to_string());

    sqlx::query(
        r#"
        INSERT INTO "daily_progress"
            ("date", "wordsLearned", "wordsReviewed", "timeSpent", "quizScore",
             "streakCount", "notes", "createdAt", "updatedAt")
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT("date") DO UPDATE SET
            "wordsLearned" = excluded."wordsLearned",
            "wordsReviewed" = excluded."wordsReviewed",
            "timeSpent" = "daily_progress"."timeSpent" + ?,
            "quizScore" = CASE WHEN ? THEN excluded."quizScore" ELSE "daily_progress"."quizScore" END,
            "streakCount" = excluded."streakCount",
            "notes" = CASE WHEN ? THEN excluded."notes" ELSE "daily_progress"."notes" END,
            "updatedAt" = excluded."updatedAt"
        "#,
    )
    .bind(format_date(date))
    .bind(&learned_json)
    .bind(&reviewed_json)
    .bind(time_delta)
    .bind(quiz_score.unwrap_or(0))
    .bind(streak_count)
    .bind(notes.unwrap_or(""))
    .bind(&now)
    .bind(&now)
    .bind(time_delta)
    .bind(quiz_score.is_some())
    .bind(notes.is_some())
    .execute(storage.pool())
    .await?;
    Ok(())
}

/// Records between two dates inclusive, newest first.
pub async fn range_daily_progress(
    storage: &Storage,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DailyProgress>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT * FROM "daily_progress"
        WHERE "date" >= ? AND "date" <= ?
        ORDER BY "date" DESC
        "#,
    )
    .bind(format_date(start))
    .bind(format_date(end))
    .fetch_all(storage.pool())
    .await?;
    Ok(rows.iter().map(map_daily_progress).collect())
}

/// Mean of all recorded quiz scores, skipping days without a quiz
/// (`quizScore = 0`). Full scan by design; the aggregate is tiny.
pub async fn average_quiz_score(storage: &Storage) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"SELECT AVG("quizScore") AS "avgScore" FROM "daily_progress" WHERE "quizScore" > 0"#,
    )
    .fetch_one(storage.pool())
    .await?;
    let average: Option<f64> = row.try_get("avgScore").unwrap_or(None);
    Ok(average.map(|v| v.round() as i64).unwrap_or(0))
}

fn map_daily_progress(row: &sqlx::sqlite::SqliteRow) -> DailyProgress {
    let learned_raw: String = row.try_get("wordsLearned").unwrap_or_default();
    let reviewed_raw: String = row.try_get("wordsReviewed").unwrap_or_default();

    DailyProgress {
        date: row.try_get("date").unwrap_or_default(),
        words_learned: serde_json::from_str(&learned_raw).unwrap_or_default(),
        words_reviewed: serde_json::from_str(&reviewed_raw).unwrap_or_default(),
        time_spent: row.try_get("timeSpent").unwrap_or(0),
        quiz_score: row.try_get("quizScore").unwrap_or(0),
        streak_count: row.try_get("streakCount").unwrap_or(0),
        notes: row.try_get("notes").unwrap_or_default(),
    }
}
