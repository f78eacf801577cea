use crate::dates::Period;
use crate::storage::FileStorage;
use crate::store::HabitStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<HabitStore<FileStorage>>>,
    pub period: Arc<Mutex<Period>>,
}

impl AppState {
    pub fn new(store: HabitStore<FileStorage>, period: Period) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            period: Arc::new(Mutex::new(period)),
        }
    }
}
