use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use vocabook_backend::db::operations::daily_progress;
use vocabook_backend::db::operations::word_status;
use vocabook_backend::services::progress;

mod common;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn submit(ctx: &common::TestApp, word_id: &str, correct: bool) -> Value {
    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/learning/submit",
            json!({ "wordId": word_id, "correct": correct, "timeSpent": 5 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn due_words_returns_unattempted_entries_oldest_first() {
    let ctx = common::create_test_app().await;
    let seeded = common::seed_beginner_words(&ctx.storage, 5).await;

    let response = ctx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/learning/words?difficulty=beginner&limit=3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let words = body["data"].as_array().unwrap();
    assert_eq!(words.len(), 3);
    assert_eq!(words[0]["id"], seeded[0].id.as_str());
}

#[tokio::test]
async fn due_words_rejects_bad_limit() {
    let ctx = common::create_test_app().await;

    let response = ctx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/learning/words?limit=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn submit_answer_unknown_word_is_not_found() {
    let ctx = common::create_test_app().await;

    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/learning/submit",
            json!({ "wordId": "ghost", "correct": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn three_attempts_two_correct_leaves_word_learning() {
    let ctx = common::create_test_app().await;
    let seeded = common::seed_beginner_words(&ctx.storage, 2).await;
    let id = seeded[0].id.as_str();

    submit(&ctx, id, true).await;
    submit(&ctx, id, true).await;
    let body = submit(&ctx, id, false).await;

    assert_eq!(body["data"]["totalAttempts"], 3);
    assert_eq!(body["data"]["correctAnswers"], 2);
    assert_eq!(body["data"]["masteryScore"], 67);
    assert_eq!(body["data"]["status"], "learning");

    // first attempt lands in wordsLearned, later ones in wordsReviewed
    let record = daily_progress::get_daily_progress(&ctx.storage, progress::today())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.words_learned, vec![id.to_string()]);
    assert_eq!(record.words_reviewed, vec![id.to_string()]);
    assert_eq!(record.time_spent, 15);
}

#[tokio::test]
async fn mastered_word_drops_out_of_due_list() {
    let ctx = common::create_test_app().await;
    let seeded = common::seed_beginner_words(&ctx.storage, 3).await;
    let id = seeded[0].id.as_str();

    submit(&ctx, id, true).await;
    submit(&ctx, id, true).await;
    let body = submit(&ctx, id, true).await;
    assert_eq!(body["data"]["status"], "mastered");

    let response = ctx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/learning/words?difficulty=beginner&limit=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["id"].as_str().unwrap())
        .collect();
    assert!(!ids.contains(&id));
    assert_eq!(ids.len(), 2);
}

#[tokio::test]
async fn quiz_questions_carry_shuffled_options() {
    let ctx = common::create_test_app().await;
    common::seed_beginner_words(&ctx.storage, 8).await;

    let response = ctx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/learning/quiz?difficulty=beginner&count=4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let questions = body["data"].as_array().unwrap();
    assert_eq!(questions.len(), 4);
    for q in questions {
        let options = q["options"].as_array().unwrap();
        assert_eq!(options.len(), 4);
        let correct = q["correctAnswer"].as_str().unwrap();
        assert!(options.iter().any(|o| o.as_str() == Some(correct)));
    }
}

#[tokio::test]
async fn quiz_on_empty_catalog_is_empty_not_an_error() {
    let ctx = common::create_test_app().await;

    let response = ctx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/learning/quiz?difficulty=advanced&count=5")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn grading_scores_and_records_daily_progress() {
    let ctx = common::create_test_app().await;
    let seeded = common::seed_beginner_words(&ctx.storage, 4).await;

    let answers = json!({
        "answers": [
            { "wordId": seeded[0].id, "selectedAnswer": seeded[0].definition },
            { "wordId": seeded[1].id, "selectedAnswer": seeded[1].definition },
            { "wordId": seeded[2].id, "selectedAnswer": "wrong answer" },
        ],
        "timeSpent": 42
    });

    let response = ctx
        .app
        .clone()
        .oneshot(json_request("POST", "/api/learning/quiz/submit", answers))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["score"], 67);
    assert_eq!(body["data"]["correctCount"], 2);
    assert_eq!(body["data"]["totalQuestions"], 3);
    let results = body["data"]["results"].as_array().unwrap();
    assert_eq!(results[0]["correct"], true);
    assert_eq!(results[2]["correct"], false);
    assert_eq!(
        results[2]["correctAnswer"].as_str().unwrap(),
        seeded[2].definition
    );

    let record = daily_progress::get_daily_progress(&ctx.storage, progress::today())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.quiz_score, 67);
    assert_eq!(record.time_spent, 42);

    // graded answers feed the mastery model by default
    let status = word_status::get_word_status(&ctx.storage, &seeded[0].id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(status.total_attempts, 1);
    assert_eq!(status.correct_answers, 1);
}

#[tokio::test]
async fn grading_with_feedback_disabled_leaves_mastery_untouched() {
    let ctx = common::create_test_app_with_feedback(false).await;
    let seeded = common::seed_beginner_words(&ctx.storage, 2).await;

    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/learning/quiz/submit",
            json!({
                "answers": [
                    { "wordId": seeded[0].id, "selectedAnswer": seeded[0].definition },
                ],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["score"], 100);

    let status = word_status::get_word_status(&ctx.storage, &seeded[0].id)
        .await
        .unwrap();
    assert!(status.is_none());
}

#[tokio::test]
async fn unknown_word_in_answers_grades_as_incorrect() {
    let ctx = common::create_test_app().await;
    let seeded = common::seed_beginner_words(&ctx.storage, 2).await;

    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/learning/quiz/submit",
            json!({
                "answers": [
                    { "wordId": seeded[0].id, "selectedAnswer": seeded[0].definition },
                    { "wordId": "ghost", "selectedAnswer": "anything" },
                ],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["score"], 50);
    let results = body["data"]["results"].as_array().unwrap();
    assert_eq!(results[1]["correct"], false);
    assert!(results[1]["correctAnswer"].is_null());
}

#[tokio::test]
async fn empty_answers_are_rejected() {
    let ctx = common::create_test_app().await;

    let response = ctx
        .app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/learning/quiz/submit",
            json!({ "answers": [] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
