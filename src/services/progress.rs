//! Daily-progress and user-stats aggregation.
//!
//! Every write to a day recomputes the streak from the previous day's record;
//! the streak is never carried incrementally anywhere else.

use chrono::{Days, NaiveDate, Utc};

use crate::db::operations::daily_progress::{self, DailyProgress};
use crate::db::operations::user_stats::{self, UserStats};
use crate::db::Storage;

/// Partial update applied to one day's record. Word-id sets are unioned with
/// what is already stored; `time_spent` accumulates; `quiz_score` and `notes`
/// overwrite only when provided.
#[derive(Debug, Default, Clone)]
pub struct DailyDelta {
    pub words_learned: Vec<String>,
    pub words_reviewed: Vec<String>,
    pub time_spent: i64,
    pub quiz_score: Option<i64>,
    pub notes: Option<String>,
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub async fn apply_daily_update(
    storage: &Storage,
    date: NaiveDate,
    delta: DailyDelta,
) -> Result<DailyProgress, sqlx::Error> {
    let streak_count = match date.checked_sub_days(Days::new(1)) {
        Some(yesterday) => daily_progress::get_daily_progress(storage, yesterday)
            .await?
            .map(|p| p.streak_count + 1)
            .unwrap_or(1),
        None => 1,
    };

    let existing = daily_progress::get_daily_progress(storage, date).await?;
    let (prior_learned, prior_reviewed) = existing
        .map(|p| (p.words_learned, p.words_reviewed))
        .unwrap_or_default();

    let prior_learned_count = prior_learned.len();
    let words_learned = union(prior_learned, &delta.words_learned);
    let words_reviewed = union(prior_reviewed, &delta.words_reviewed);
    let newly_learned = (words_learned.len() - prior_learned_count) as i64;

    let time_delta = delta.time_spent.max(0);
    daily_progress::upsert_daily_progress(
        storage,
        date,
        &words_learned,
        &words_reviewed,
        time_delta,
        delta.quiz_score,
        delta.notes.as_deref(),
        streak_count,
    )
    .await?;

    // Stats roll up after the day's record is durable, so the quiz-score
    // average already sees the new value.
    let average_quiz_score = daily_progress::average_quiz_score(storage).await?;
    user_stats::apply_stats_update(
        storage,
        newly_learned,
        time_delta,
        streak_count,
        average_quiz_score,
        &daily_progress::format_date(date),
    )
    .await?;

    let record = daily_progress::get_daily_progress(storage, date).await?;
    Ok(record.unwrap_or_else(|| DailyProgress::empty(date)))
}

pub async fn get_daily(storage: &Storage, date: NaiveDate) -> Result<DailyProgress, sqlx::Error> {
    let record = daily_progress::get_daily_progress(storage, date).await?;
    Ok(record.unwrap_or_else(|| DailyProgress::empty(date)))
}

/// The last `days` days of records, today inclusive, newest first.
pub async fn history(storage: &Storage, days: u64) -> Result<Vec<DailyProgress>, sqlx::Error> {
    let end = today();
    let start = end.checked_sub_days(Days::new(days)).unwrap_or(end);
    daily_progress::range_daily_progress(storage, start, end).await
}

/// Stats row, materialized with defaults on first access.
pub async fn get_stats(storage: &Storage) -> Result<UserStats, sqlx::Error> {
    if let Some(stats) = user_stats::get_user_stats(storage).await? {
        return Ok(stats);
    }
    user_stats::update_goals(storage, None, None).await?;
    Ok(user_stats::get_user_stats(storage)
        .await?
        .unwrap_or_default())
}

pub async fn update_goals(
    storage: &Storage,
    weekly_goal: Option<i64>,
    monthly_goal: Option<i64>,
) -> Result<UserStats, sqlx::Error> {
    user_stats::update_goals(storage, weekly_goal, monthly_goal).await?;
    get_stats(storage).await
}

/// Append-only union preserving insertion order of first appearance.
fn union(mut base: Vec<String>, additions: &[String]) -> Vec<String> {
    for item in additions {
        if !base.iter().any(|existing| existing == item) {
            base.push(item.clone());
        }
    }
    base
}
