pub mod daily_progress;
pub mod user_stats;
pub mod vocabulary;
pub mod word_status;
