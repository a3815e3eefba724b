use std::sync::Arc;

use tokio_rusqlite::Connection;

use crate::core::AppConfig;
use crate::schedule::{Clock, SystemClock};
use crate::students::{LessonStore, SqliteLessonStore};

pub struct AppState {
    pub store: Arc<dyn LessonStore>,
    pub config: AppConfig,
    // Only read per request; offsets are never cached here
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(db: Connection, config: AppConfig) -> Self {
        Self {
            store: Arc::new(SqliteLessonStore::new(db)),
            config,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_store(mut self, store: impl LessonStore + 'static) -> Self {
        self.store = Arc::new(store);
        self
    }
}
