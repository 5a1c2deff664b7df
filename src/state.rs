use std::sync::Arc;

use crate::classifier::{self, Classifier};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(classifier::from_settings(&config.classifier))
    }
}
