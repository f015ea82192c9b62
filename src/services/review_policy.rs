//! Spaced-repetition review policy.
//!
//! Pure with respect to its inputs apart from the injected `now`; persistence
//! of the returned state is the caller's job.

use chrono::{DateTime, Duration, Utc};

use crate::db::operations::word_status::{LearningStatus, WordStatus};

const MASTERED_MIN_SCORE: i64 = 90;
const MASTERED_MIN_ATTEMPTS: i64 = 3;
const REVIEWING_MIN_SCORE: i64 = 70;

/// Applies one attempt to a word's learning state. Missing state means this
/// is the word's first attempt and defaults are used.
pub fn record_attempt(
    status: Option<WordStatus>,
    word_id: &str,
    correct: bool,
    now: DateTime<Utc>,
) -> WordStatus {
    let mut next = status.unwrap_or_else(|| WordStatus::new_for(word_id, now));

    next.total_attempts += 1;
    if correct {
        next.correct_answers += 1;
    }
    next.mastery_score = mastery_score(next.correct_answers, next.total_attempts);
    next.status = classify(next.mastery_score, next.total_attempts);

    let offset = next_review_offset_days(next.mastery_score, next.total_attempts);
    next.last_review_date = now;
    next.next_review_date = now + Duration::days(offset);
    next
}

pub fn mastery_score(correct_answers: i64, total_attempts: i64) -> i64 {
    if total_attempts == 0 {
        return 0;
    }
    (100.0 * correct_answers as f64 / total_attempts as f64).round() as i64
}

/// A word can never be classified `new` again once attempted.
pub fn classify(mastery_score: i64, total_attempts: i64) -> LearningStatus {
    if mastery_score >= MASTERED_MIN_SCORE && total_attempts >= MASTERED_MIN_ATTEMPTS {
        LearningStatus::Mastered
    } else if mastery_score >= REVIEWING_MIN_SCORE {
        LearningStatus::Reviewing
    } else {
        LearningStatus::Learning
    }
}

/// Days until the next review. Well-known words stretch out with the attempt
/// count, capped at a month; shaky words come back within a day or two.
pub fn next_review_offset_days(mastery_score: i64, total_attempts: i64) -> i64 {
    if mastery_score >= 90 {
        (total_attempts * 3).min(30)
    } else if mastery_score >= 70 {
        total_attempts.min(7)
    } else if mastery_score >= 50 {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2024-05-01T10:00:00Z".parse().unwrap()
    }

    fn run_attempts(outcomes: &[bool]) -> WordStatus {
        let mut status = None;
        for &correct in outcomes {
            status = Some(record_attempt(status, "w1", correct, now()));
        }
        status.unwrap()
    }

    #[test]
    fn first_attempt_initializes_defaults() {
        let status = record_attempt(None, "w1", true, now());
        assert_eq!(status.word_id, "w1");
        assert_eq!(status.total_attempts, 1);
        assert_eq!(status.correct_answers, 1);
        assert_eq!(status.mastery_score, 100);
        assert_ne!(status.status, LearningStatus::New);
    }

    #[test]
    fn mastered_at_90_with_three_attempts_offset_nine_days() {
        // 3 attempts, all correct: score 100 >= 90, offset min(30, 9) = 9.
        let status = run_attempts(&[true, true, true]);
        assert_eq!(status.status, LearningStatus::Mastered);
        assert_eq!(
            status.next_review_date - status.last_review_date,
            Duration::days(9)
        );
    }

    #[test]
    fn two_attempts_cannot_be_mastered() {
        let status = run_attempts(&[true, true]);
        assert_eq!(status.mastery_score, 100);
        assert_eq!(status.status, LearningStatus::Reviewing);
    }

    #[test]
    fn reviewing_band_offset_capped_by_attempts() {
        // score 75 with 2 attempts: reviewing, offset min(7, 2) = 2.
        assert_eq!(classify(75, 2), LearningStatus::Reviewing);
        assert_eq!(next_review_offset_days(75, 2), 2);
        assert_eq!(next_review_offset_days(75, 10), 7);
    }

    #[test]
    fn low_score_always_one_day() {
        assert_eq!(classify(40, 100), LearningStatus::Learning);
        assert_eq!(next_review_offset_days(40, 1), 1);
        assert_eq!(next_review_offset_days(40, 100), 1);
    }

    #[test]
    fn moderate_score_two_days() {
        assert_eq!(next_review_offset_days(50, 4), 2);
        assert_eq!(next_review_offset_days(69, 4), 2);
    }

    #[test]
    fn end_to_end_two_of_three() {
        // score 67 lands in the 50-69 band, so the word comes back in 2 days.
        let status = run_attempts(&[true, true, false]);
        assert_eq!(status.total_attempts, 3);
        assert_eq!(status.correct_answers, 2);
        assert_eq!(status.mastery_score, 67);
        assert_eq!(status.status, LearningStatus::Learning);
        assert_eq!(next_review_offset_days(67, 3), 2);
        assert_eq!(
            status.next_review_date - status.last_review_date,
            Duration::days(2)
        );
    }

    #[test]
    fn mastered_offset_caps_at_thirty_days() {
        assert_eq!(next_review_offset_days(95, 20), 30);
    }

    #[test]
    fn next_review_never_before_last_review() {
        for outcomes in [&[false, false][..], &[true][..], &[false, true, true][..]] {
            let status = run_attempts(outcomes);
            assert!(status.next_review_date >= status.last_review_date);
        }
    }

    #[test]
    fn mastery_score_zero_without_attempts() {
        assert_eq!(mastery_score(0, 0), 0);
    }
}
