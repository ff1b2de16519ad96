//! Application state and composition.

use std::sync::Arc;

use crate::entities::Catalog;
use crate::infrastructure::{
    catalog::InMemoryCatalog,
    clock::{SystemClock, SystemRandom},
    ports::{CatalogRepo, ClockPort, LocaleTextRepo, RandomPort},
    settings::EngineSettings,
};
use crate::stores::GameTaskQueueStore;
use crate::use_cases;

/// Main application state.
///
/// Holds the catalog ports, the per-game queue store and all use cases.
pub struct App {
    pub repositories: Repositories,
    pub stores: Stores,
    pub use_cases: UseCases,
    pub settings: EngineSettings,
}

/// Container for the catalog ports.
pub struct Repositories {
    pub catalog: Arc<dyn CatalogRepo>,
    pub locale_text: Arc<dyn LocaleTextRepo>,
}

/// Container for in-memory runtime state.
pub struct Stores {
    pub game_tasks: Arc<GameTaskQueueStore>,
}

/// Container for all use cases.
pub struct UseCases {
    pub game_tasks: use_cases::GameTaskUseCases,
}

impl App {
    /// Create a new App using the system clock and random source.
    pub fn new(
        catalog: Arc<dyn CatalogRepo>,
        locale_text: Arc<dyn LocaleTextRepo>,
        settings: EngineSettings,
    ) -> Self {
        Self::with_ports(
            catalog,
            locale_text,
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
            settings,
        )
    }

    /// Create an App serving both catalog ports from one in-memory catalog.
    pub fn in_memory(catalog: Arc<InMemoryCatalog>, settings: EngineSettings) -> Self {
        let catalog_port: Arc<dyn CatalogRepo> = catalog.clone();
        let locale_port: Arc<dyn LocaleTextRepo> = catalog;
        Self::new(catalog_port, locale_port, settings)
    }

    /// Create an App with every port supplied by the caller.
    pub fn with_ports(
        catalog: Arc<dyn CatalogRepo>,
        locale_text: Arc<dyn LocaleTextRepo>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        settings: EngineSettings,
    ) -> Self {
        let queues = Arc::new(GameTaskQueueStore::new());
        let catalog_entity = Arc::new(Catalog::new(catalog.clone()));
        let locales = Arc::new(use_cases::game_task::LocaleVariants::new(
            locale_text.clone(),
            queues.clone(),
        ));

        let game_tasks = use_cases::GameTaskUseCases::new(
            Arc::new(use_cases::game_task::GenerateGameTasks::new(
                catalog_entity,
                queues.clone(),
                clock,
                random.clone(),
            )),
            Arc::new(use_cases::game_task::CurrentGameTask::new(
                queues.clone(),
                locales.clone(),
                random.clone(),
                settings.default_locale.clone(),
            )),
            Arc::new(use_cases::game_task::AdvanceGameTask::new(
                queues.clone(),
                locales,
                random,
                settings.default_locale.clone(),
            )),
            queues.clone(),
        );

        Self {
            repositories: Repositories {
                catalog,
                locale_text,
            },
            stores: Stores { game_tasks: queues },
            use_cases: UseCases { game_tasks },
            settings,
        }
    }
}
