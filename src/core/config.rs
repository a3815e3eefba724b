use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_path: String,
    pub db_path: String,
    // Upper bound on a single lesson store round trip
    pub fetch_timeout_secs: u64,
    // How long the client offset cookie is kept
    pub offset_cookie_days: i64,
}

impl AppConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("TUTOR_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = format!("{}/db", storage_path);
        let fetch_timeout_secs = env::var("TUTOR_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        let offset_cookie_days = env::var("TUTOR_OFFSET_COOKIE_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(365);

        Self {
            storage_path,
            db_path,
            fetch_timeout_secs,
            offset_cookie_days,
        }
    }
}
