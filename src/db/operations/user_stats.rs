use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::Row;

use crate::db::{format_timestamp, Storage};

/// Fixed key for the single process-wide stats row. A keyed record with a
/// well-known id rather than a language-level global.
pub const USER_STATS_KEY: &str = "default";

pub const DEFAULT_WEEKLY_GOAL: i64 = 50;
pub const DEFAULT_MONTHLY_GOAL: i64 = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_words_learned: i64,
    pub total_time_spent: i64,
    pub current_streak: i64,
    pub longest_streak: i64,
    pub average_quiz_score: i64,
    pub weekly_goal: i64,
    pub monthly_goal: i64,
    pub last_active_date: String,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            total_words_learned: 0,
            total_time_spent: 0,
            current_streak: 0,
            longest_streak: 0,
            average_quiz_score: 0,
            weekly_goal: DEFAULT_WEEKLY_GOAL,
            monthly_goal: DEFAULT_MONTHLY_GOAL,
            last_active_date: String::new(),
        }
    }
}

pub async fn get_user_stats(storage: &Storage) -> Result<Option<UserStats>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM "user_stats" WHERE "id" = ? LIMIT 1"#)
        .bind(USER_STATS_KEY)
        .fetch_optional(storage.pool())
        .await?;
    Ok(row.map(|r| map_user_stats(&r)))
}

/// Rolls learning/quiz activity into the singleton row. Counters accumulate
/// inside the store (`+=` and `MAX` in SQL) so concurrent events do not drop
/// increments; `averageQuizScore` is a freshly computed full aggregate and is
/// simply overwritten.
pub async fn apply_stats_update(
    storage: &Storage,
    words_learned_delta: i64,
    time_spent_delta: i64,
    current_streak: i64,
    average_quiz_score: i64,
    last_active_date: &str,
) -> Result<(), sqlx::Error> {
    let now = format_timestamp(Utc::now());

    sqlx::query(
        r#"
        INSERT INTO "user_stats"
            ("id", "totalWordsLearned", "totalTimeSpent", "currentStreak", "longestStreak",
             "averageQuizScore", "weeklyGoal", "monthlyGoal", "lastActiveDate",
             "createdAt", "updatedAt")
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT("id") DO UPDATE SET
            "totalWordsLearned" = "user_stats"."totalWordsLearned" + ?,
            "totalTimeSpent" = "user_stats"."totalTimeSpent" + ?,
            "currentStreak" = excluded."currentStreak",
            "longestStreak" = MAX("user_stats"."longestStreak", excluded."currentStreak"),
            "averageQuizScore" = excluded."averageQuizScore",
            "lastActiveDate" = excluded."lastActiveDate",
            "updatedAt" = excluded."updatedAt"
        "#,
    )
    .bind(USER_STATS_KEY)
    .bind(words_learned_delta)
    .bind(time_spent_delta)
    .bind(current_streak)
    .bind(current_streak)
    .bind(average_quiz_score)
    .bind(DEFAULT_WEEKLY_GOAL)
    .bind(DEFAULT_MONTHLY_GOAL)
    .bind(last_active_date)
    .bind(&now)
    .bind(&now)
    .bind(words_learned_delta)
    .bind(time_spent_delta)
    .execute(storage.pool())
    .await?;
    Ok(())
}

pub async fn update_goals(
    storage: &Storage,
    weekly_goal: Option<i64>,
    monthly_goal: Option<i64>,
) -> Result<(), sqlx::Error> {
    let now = format_timestamp(Utc::now());

    sqlx::query(
        r#"
        INSERT INTO "user_stats"
            ("id", "weeklyGoal", "monthlyGoal", "lastActiveDate", "createdAt", "updatedAt")
        VALUES (?, ?, ?, '', ?, ?)
        ON CONFLICT("id") DO UPDATE SET
            "weeklyGoal" = CASE WHEN ? THEN excluded."weeklyGoal" ELSE "user_stats"."weeklyGoal" END,
            "monthlyGoal" = CASE WHEN ? THEN excluded."monthlyGoal" ELSE "user_stats"."monthlyGoal" END,
            "updatedAt" = excluded."updatedAt"
        "#,
    )
    .bind(USER_STATS_KEY)
    .bind(weekly_goal.unwrap_or(DEFAULT_WEEKLY_GOAL))
    .bind(monthly_goal.unwrap_or(DEFAULT_MONTHLY_GOAL))
    .bind(&now)
    .bind(&now)
    .bind(weekly_goal.is_some())
    .bind(monthly_goal.is_some())
    .execute(storage.pool())
    .await?;
    Ok(())
}

fn map_user_stats(row: &sqlx::sqlite::SqliteRow) -> UserStats {
    UserStats {
        total_words_learned: row.try_get("totalWordsLearned").unwrap_or(0),
        total_time_spent: row.try_get("totalTimeSpent").unwrap_or(0),
        current_streak: row.try_get("currentStreak").unwrap_or(0),
        longest_streak: row.try_get("longestStreak").unwrap_or(0),
        average_quiz_score: row.try_get("averageQuizScore").unwrap_or(0),
        weekly_goal: row.try_get("weeklyGoal").unwrap_or(DEFAULT_WEEKLY_GOAL),
        monthly_goal: row.try_get("monthlyGoal").unwrap_or(DEFAULT_MONTHLY_GOAL),
        last_active_date: row.try_get("lastActiveDate").unwrap_or_default(),
    }
}
