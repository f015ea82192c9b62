#![allow(dead_code)]

use tempfile::TempDir;

use vocabook_backend::create_app_with;
use vocabook_backend::db::operations::vocabulary::{
    self, Difficulty, NewVocabularyEntry, VocabularyEntry,
};
use vocabook_backend::db::Storage;
use vocabook_backend::state::AppState;

pub struct TestApp {
    pub app: axum::Router,
    pub storage: Storage,
    _dir: TempDir,
}

pub async fn create_storage() -> (Storage, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("test.db").display()
    );
    let storage = Storage::connect(&url).await.expect("open test database");
    (storage, dir)
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with_feedback(true).await
}

pub async fn create_test_app_with_feedback(quiz_mastery_feedback: bool) -> TestApp {
    let (storage, dir) = create_storage().await;
    TestApp {
        app: create_app_with(AppState::new(storage.clone(), quiz_mastery_feedback)),
        storage,
        _dir: dir,
    }
}

pub async fn seed_word(
    storage: &Storage,
    word: &str,
    definition: &str,
    difficulty: Difficulty,
) -> VocabularyEntry {
    vocabulary::insert_entry(
        storage,
        NewVocabularyEntry {
            word: word.to_string(),
            pronunciation: String::new(),
            part_of_speech: "noun".to_string(),
            definition: definition.to_string(),
            example: format!("An example with {word}."),
            difficulty,
            category: "general".to_string(),
            synonyms: Vec::new(),
            antonyms: Vec::new(),
        },
    )
    .await
    .expect("seed word")
}

pub async fn seed_beginner_words(storage: &Storage, count: usize) -> Vec<VocabularyEntry> {
    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        entries.push(
            seed_word(
                storage,
                &format!("word{i}"),
                &format!("definition {i}"),
                Difficulty::Beginner,
            )
            .await,
        );
    }
    entries
}
