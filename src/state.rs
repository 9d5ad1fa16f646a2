use crate::advice::{AdviceProvider, GeminiAdviceProvider, PlaceholderAdviceProvider, TagVocabulary};
use crate::config::Config;
use crate::models::{AppData, RecordBook, ShiftRecord};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data: Arc<Mutex<AppData>>,
    pub advisor: Arc<dyn AdviceProvider>,
    pub placeholder: Arc<PlaceholderAdviceProvider>,
    pub vocabulary: TagVocabulary,
    pub capacity: u32,
}

impl AppState {
    pub fn new(config: &Config, records: Vec<ShiftRecord>) -> Self {
        let advisor = Arc::new(GeminiAdviceProvider::new(&config.advice));
        Self::with_advisor(config, records, advisor)
    }

    pub fn with_advisor(
        config: &Config,
        records: Vec<ShiftRecord>,
        advisor: Arc<dyn AdviceProvider>,
    ) -> Self {
        let vocabulary = config.advice.vocabulary;
        Self {
            data: Arc::new(Mutex::new(AppData {
                book: RecordBook::new(records),
                location: config.location.clone(),
                target_date: config.target_date,
                footfall_multiplier: 1.0,
            })),
            advisor,
            placeholder: Arc::new(PlaceholderAdviceProvider::new(vocabulary)),
            vocabulary,
            capacity: config.capacity,
        }
    }
}
