//! Multiple-choice quiz generation and grading.
//!
//! All sampling and shuffling goes through a caller-supplied `Rng` so tests
//! can drive the quiz deterministically with a seeded generator.

use chrono::Utc;
use rand::seq::{index, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::operations::vocabulary::{self, Difficulty, VocabularyEntry};
use crate::db::operations::word_status;
use crate::db::Storage;
use crate::services::progress::{self, DailyDelta};
use crate::services::review_policy;

pub const MAX_DISTRACTORS: usize = 3;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("answers array is required")]
    EmptyAnswers,
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Ephemeral quiz question; never persisted. The correct answer rides along
/// as text for server-side grading, its position in `options` is random.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub word: String,
    pub part_of_speech: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub word_id: String,
    pub selected_answer: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub word_id: String,
    pub correct: bool,
    pub selected_answer: String,
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizGrade {
    pub score: i64,
    pub correct_count: i64,
    pub total_questions: i64,
    pub results: Vec<AnswerResult>,
}

pub async fn generate_quiz<R: Rng + ?Sized>(
    storage: &Storage,
    difficulty: Difficulty,
    count: usize,
    rng: &mut R,
) -> Result<Vec<QuizQuestion>, sqlx::Error> {
    let pool = vocabulary::find_by_difficulty(storage, difficulty).await?;
    Ok(build_questions(&pool, count, rng))
}

/// Builds up to `count` questions from a word pool of one difficulty: a
/// uniform sample without replacement, each question pairing the word's
/// definition with up to three distractor definitions drawn from the rest of
/// the pool. Words without a single available distractor are skipped; a
/// short pool yields a short quiz rather than an error.
pub fn build_questions<R: Rng + ?Sized>(
    pool: &[VocabularyEntry],
    count: usize,
    rng: &mut R,
) -> Vec<QuizQuestion> {
    if pool.is_empty() {
        return Vec::new();
    }

    let take = count.min(pool.len());
    let mut picked: Vec<usize> = index::sample(rng, pool.len(), take).into_iter().collect();
    picked.sort_unstable();

    let mut questions = Vec::with_capacity(take);
    for word_idx in picked {
        let word = &pool[word_idx];
        let candidates: Vec<usize> = (0..pool.len()).filter(|&i| i != word_idx).collect();
        if candidates.is_empty() {
            continue;
        }

        let distractor_count = candidates.len().min(MAX_DISTRACTORS);
        let mut options: Vec<String> = index::sample(rng, candidates.len(), distractor_count)
            .into_iter()
            .map(|i| pool[candidates[i]].definition.clone())
            .collect();
        options.push(word.definition.clone());
        options.shuffle(rng);

        questions.push(QuizQuestion {
            id: word.id.clone(),
            word: word.word.clone(),
            part_of_speech: word.part_of_speech.clone(),
            options,
            correct_answer: word.definition.clone(),
        });
    }

    questions
}

/// Grades a submitted quiz. Correctness is exact string equality against the
/// word's definition; unknown word ids grade as incorrect. When
/// `mastery_feedback` is set, each answer for a known word also runs the
/// review policy, so quizzes feed the same mastery model as learning
/// sessions. That makes grading non-idempotent: grade each submission once.
pub async fn grade_quiz(
    storage: &Storage,
    answers: &[QuizAnswer],
    time_spent: i64,
    mastery_feedback: bool,
) -> Result<QuizGrade, QuizError> {
    if answers.is_empty() {
        return Err(QuizError::EmptyAnswers);
    }

    let mut correct_count = 0i64;
    let mut results = Vec::with_capacity(answers.len());

    for answer in answers {
        let entry = vocabulary::find_by_id(storage, &answer.word_id).await?;
        let correct = entry
            .as_ref()
            .map(|e| e.definition == answer.selected_answer)
            .unwrap_or(false);
        if correct {
            correct_count += 1;
        }

        if mastery_feedback && entry.is_some() {
            let prior = word_status::get_word_status(storage, &answer.word_id).await?;
            let updated =
                review_policy::record_attempt(prior, &answer.word_id, correct, Utc::now());
            word_status::upsert_word_status(storage, &updated).await?;
        }

        results.push(AnswerResult {
            word_id: answer.word_id.clone(),
            correct,
            selected_answer: answer.selected_answer.clone(),
            correct_answer: entry.map(|e| e.definition),
        });
    }

    let total = answers.len() as i64;
    let score = (100.0 * correct_count as f64 / total as f64).round() as i64;

    let delta = DailyDelta {
        time_spent: time_spent.max(0),
        quiz_score: Some(score),
        ..Default::default()
    };
    progress::apply_daily_update(storage, progress::today(), delta).await?;

    Ok(QuizGrade {
        score,
        correct_count,
        total_questions: total,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entry(id: &str, word: &str, definition: &str) -> VocabularyEntry {
        VocabularyEntry {
            id: id.to_string(),
            word: word.to_string(),
            pronunciation: String::new(),
            part_of_speech: "noun".to_string(),
            definition: definition.to_string(),
            example: String::new(),
            difficulty: Difficulty::Beginner,
            category: String::new(),
            synonyms: Vec::new(),
            antonyms: Vec::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn pool(n: usize) -> Vec<VocabularyEntry> {
        (0..n)
            .map(|i| entry(&format!("id{i}"), &format!("word{i}"), &format!("def{i}")))
            .collect()
    }

    #[test]
    fn question_contains_its_own_definition() {
        let mut rng = StdRng::seed_from_u64(7);
        let questions = build_questions(&pool(10), 5, &mut rng);
        assert_eq!(questions.len(), 5);
        for q in &questions {
            assert!(q.options.contains(&q.correct_answer));
            assert_eq!(q.options.len(), 1 + MAX_DISTRACTORS);
        }
    }

    #[test]
    fn short_pool_returns_all_words() {
        let mut rng = StdRng::seed_from_u64(7);
        let questions = build_questions(&pool(3), 10, &mut rng);
        assert_eq!(questions.len(), 3);
        // only 2 distractors available per word
        assert!(questions.iter().all(|q| q.options.len() == 3));
    }

    #[test]
    fn single_word_pool_yields_no_questions() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(build_questions(&pool(1), 5, &mut rng).is_empty());
        assert!(build_questions(&[], 5, &mut rng).is_empty());
    }

    #[test]
    fn distractors_never_duplicate_the_correct_answer() {
        let mut rng = StdRng::seed_from_u64(42);
        for q in build_questions(&pool(20), 20, &mut rng) {
            let matches = q
                .options
                .iter()
                .filter(|o| **o == q.correct_answer)
                .count();
            assert_eq!(matches, 1);
        }
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let words = pool(12);
        let a = build_questions(&words, 6, &mut StdRng::seed_from_u64(99));
        let b = build_questions(&words, 6, &mut StdRng::seed_from_u64(99));
        let ids_a: Vec<_> = a.iter().map(|q| q.id.clone()).collect();
        let ids_b: Vec<_> = b.iter().map(|q| q.id.clone()).collect();
        assert_eq!(ids_a, ids_b);
        assert_eq!(a[0].options, b[0].options);
    }
}
