use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Row};
use uuid::Uuid;

use crate::db::{format_timestamp, Storage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    pub id: String,
    pub word: String,
    pub pronunciation: String,
    pub part_of_speech: String,
    pub definition: String,
    pub example: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewVocabularyEntry {
    pub word: String,
    pub pronunciation: String,
    pub part_of_speech: String,
    pub definition: String,
    pub example: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}

#[derive(Debug, Default, Clone)]
pub struct EntryFilter {
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
    pub search: Option<String>,
}

pub async fn insert_entry(
    storage: &Storage,
    new: NewVocabularyEntry,
) -> Result<VocabularyEntry, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = format_timestamp(Utc::now());

    sqlx::query(
        r#"
        INSERT INTO "vocabulary_entries"
            ("id", "word", "pronunciation", "partOfSpeech", "definition", "example",
             "difficulty", "category", "synonyms", "antonyms", "createdAt", "updatedAt")
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new.word)
    .bind(&new.pronunciation)
    .bind(&new.part_of_speech)
    .bind(&new.definition)
    .bind(&new.example)
    .bind(new.difficulty.as_str())
    .bind(&new.category)
    .bind(serde_json::to_string(&new.synonyms).unwrap_or_else(|_| "[]".to_string()))
    .bind(serde_json::to_string(&new.antonyms).unwrap_or_else(|_| "[]".to_string()))
    .bind(&now)
    .bind(&now)
    .execute(storage.pool())
    .await?;

    Ok(VocabularyEntry {
        id,
        word: new.word,
        pronunciation: new.pronunciation,
        part_of_speech: new.part_of_speech,
        definition: new.definition,
        example: new.example,
        difficulty: new.difficulty,
        category: new.category,
        synonyms: new.synonyms,
        antonyms: new.antonyms,
        created_at: now.clone(),
        updated_at: now,
    })
}

pub async fn find_by_id(
    storage: &Storage,
    id: &str,
) -> Result<Option<VocabularyEntry>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM "vocabulary_entries" WHERE "id" = ? LIMIT 1"#)
        .bind(id)
        .fetch_optional(storage.pool())
        .await?;
    Ok(row.map(|r| map_entry(&r)))
}

pub async fn find_by_word(
    storage: &Storage,
    word: &str,
) -> Result<Option<VocabularyEntry>, sqlx::Error> {
    let row = sqlx::query(r#"SELECT * FROM "vocabulary_entries" WHERE "word" = ? LIMIT 1"#)
        .bind(word)
        .fetch_optional(storage.pool())
        .await?;
    Ok(row.map(|r| map_entry(&r)))
}

/// All entries of one difficulty, oldest first. The quiz generator samples
/// from this pool in memory so randomness stays injectable.
pub async fn find_by_difficulty(
    storage: &Storage,
    difficulty: Difficulty,
) -> Result<Vec<VocabularyEntry>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT * FROM "vocabulary_entries"
        WHERE "difficulty" = ?
        ORDER BY "createdAt" ASC, "rowid" ASC
        "#,
    )
    .bind(difficulty.as_str())
    .fetch_all(storage.pool())
    .await?;
    Ok(rows.iter().map(map_entry).collect())
}

/// Entries of one difficulty that are due for practice: never attempted,
/// still in `new`/`learning`, or past their next review date.
pub async fn find_due_for_practice(
    storage: &Storage,
    difficulty: Difficulty,
    now: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<VocabularyEntry>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT v.* FROM "vocabulary_entries" v
        LEFT JOIN "word_status" s ON s."wordId" = v."id"
        WHERE v."difficulty" = ?
          AND (
            s."wordId" IS NULL
            OR s."status" IN ('new', 'learning')
            OR s."nextReviewDate" <= ?
          )
        ORDER BY v."createdAt" ASC, v."rowid" ASC
        LIMIT ?
        "#,
    )
    .bind(difficulty.as_str())
    .bind(format_timestamp(now))
    .bind(limit)
    .fetch_all(storage.pool())
    .await?;
    Ok(rows.iter().map(map_entry).collect())
}

pub async fn list_entries(
    storage: &Storage,
    filter: &EntryFilter,
) -> Result<Vec<VocabularyEntry>, sqlx::Error> {
    let mut builder = QueryBuilder::new(r#"SELECT * FROM "vocabulary_entries" WHERE 1 = 1"#);

    if let Some(difficulty) = filter.difficulty {
        builder.push(r#" AND "difficulty" = "#);
        builder.push_bind(difficulty.as_str());
    }
    if let Some(category) = filter.category.as_deref() {
        builder.push(r#" AND "category" = "#);
        builder.push_bind(category);
    }
    if let Some(search) = filter.search.as_deref() {
        let pattern = format!("%{search}%");
        builder.push(r#" AND ("word" LIKE "#);
        builder.push_bind(pattern.clone());
        builder.push(r#" OR "definition" LIKE "#);
        builder.push_bind(pattern);
        builder.push(")");
    }
    builder.push(r#" ORDER BY "createdAt" ASC, "rowid" ASC"#);

    let rows = builder.build().fetch_all(storage.pool()).await?;
    Ok(rows.iter().map(map_entry).collect())
}

pub async fn delete_entry(storage: &Storage, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(r#"DELETE FROM "vocabulary_entries" WHERE "id" = ?"#)
        .bind(id)
        .execute(storage.pool())
        .await?;
    Ok(result.rows_affected() > 0)
}

fn map_entry(row: &sqlx::sqlite::SqliteRow) -> VocabularyEntry {
    let synonyms_raw: String = row.try_get("synonyms").unwrap_or_default();
    let antonyms_raw: String = row.try_get("antonyms").unwrap_or_default();
    let difficulty_raw: String = row.try_get("difficulty").unwrap_or_default();

    VocabularyEntry {
        id: row.try_get("id").unwrap_or_default(),
        word: row.try_get("word").unwrap_or_default(),
        pronunciation: row.try_get("pronunciation").unwrap_or_default(),
        part_of_speech: row.try_get("partOfSpeech").unwrap_or_default(),
        definition: row.try_get("definition").unwrap_or_default(),
        example: row.try_get("example").unwrap_or_default(),
        difficulty: Difficulty::parse(&difficulty_raw).unwrap_or(Difficulty::Beginner),
        category: row.try_get("category").unwrap_or_default(),
        synonyms: serde_json::from_str(&synonyms_raw).unwrap_or_default(),
        antonyms: serde_json::from_str(&antonyms_raw).unwrap_or_default(),
        created_at: row.try_get("createdAt").unwrap_or_default(),
        updated_at: row.try_get("updatedAt").unwrap_or_default(),
    }
}
