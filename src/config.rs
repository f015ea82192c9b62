use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://vocabook.db?mode=rwc";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    /// Directory for daily-rolling log files; `None` leaves file logging off.
    pub log_dir: Option<String>,
    pub database_url: String,
    /// Whether graded quiz answers feed the mastery model. Kept as a switch
    /// because grading re-runs the review policy per answer with no
    /// de-duplication against same-day learning submissions.
    pub quiz_mastery_feedback: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let log_dir = file_log_dir(
            std::env::var("ENABLE_FILE_LOGS").ok(),
            std::env::var("LOG_DIR").ok(),
        );

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let quiz_mastery_feedback = std::env::var("QUIZ_MASTERY_FEEDBACK")
            .map(|value| value != "false" && value != "0")
            .unwrap_or(true);

        Self {
            host,
            port,
            log_level,
            log_dir,
            database_url,
            quiz_mastery_feedback,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn file_log_dir(enabled: Option<String>, dir: Option<String>) -> Option<String> {
    let enabled = enabled
        .map(|value| value == "true" || value == "1")
        .unwrap_or(false);
    enabled.then(|| dir.unwrap_or_else(|| "./logs".to_string()))
}
