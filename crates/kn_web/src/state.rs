use std::sync::Arc;
use kn_core::ResultStorage;
use kn_scrapers::NewsManager;

pub struct AppState {
    pub manager: Arc<NewsManager>,
}

impl AppState {
    pub fn new(manager: Arc<NewsManager>) -> Self {
        Self { manager }
    }

    pub fn storage(&self) -> Arc<dyn ResultStorage> {
        self.manager.storage()
    }
}
