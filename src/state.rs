use std::time::Instant;

use crate::db::Storage;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    storage: Storage,
    quiz_mastery_feedback: bool,
}

impl AppState {
    pub fn new(storage: Storage, quiz_mastery_feedback: bool) -> Self {
        Self {
            started_at: Instant::now(),
            storage,
            quiz_mastery_feedback,
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn quiz_mastery_feedback(&self) -> bool {
        self.quiz_mastery_feedback
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
