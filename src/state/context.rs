//! Application context
//!
//! Everything a handler needs, injected through the dispatcher's dependency
//! map instead of module-level globals.

use std::sync::Arc;

use crate::card::{CardGenerator, Extrapolator};
use crate::config::Settings;
use crate::middleware::{Guard, LoggingMiddleware};
use crate::state::storage::StateStorage;

/// Application-wide context containing services and settings
#[derive(Clone)]
pub struct AppContext {
    pub settings: Arc<Settings>,
    pub storage: Arc<StateStorage>,
    pub guard: Guard,
    pub logging: LoggingMiddleware,
    pub generator: CardGenerator,
    pub extrapolator: Extrapolator,
}

impl AppContext {
    /// Build the context from settings and an already connected storage
    pub fn new(settings: Settings, storage: Arc<StateStorage>) -> Self {
        let generator = CardGenerator::new(settings.generator.limits());
        let extrapolator = Extrapolator::new(
            generator.clone(),
            settings.generator.extrapolate_keep_digits,
        );
        let guard = Guard::from_settings(&settings);

        Self {
            settings: Arc::new(settings),
            storage,
            guard,
            logging: LoggingMiddleware::default(),
            generator,
            extrapolator,
        }
    }
}
