//! Locale variant preparation.
//!
//! Looks up translations for a game's cached catalog entries before any
//! queue lock is taken, so rendering itself never waits on storage.

use std::sync::Arc;

use taskgame_domain::{GameId, Locale};

use crate::infrastructure::ports::{LocaleTextRepo, RepoError};
use crate::stores::GameTaskQueueStore;

pub struct LocaleVariants {
    locale_text: Arc<dyn LocaleTextRepo>,
    queues: Arc<GameTaskQueueStore>,
}

impl LocaleVariants {
    pub fn new(locale_text: Arc<dyn LocaleTextRepo>, queues: Arc<GameTaskQueueStore>) -> Self {
        Self {
            locale_text,
            queues,
        }
    }

    /// Make sure every entry of the game has been checked for `locale`.
    pub async fn prepare(&self, game_id: &GameId, locale: &Locale) -> Result<(), RepoError> {
        let missing = self.queues.entries_missing_locale(game_id, locale).await;
        if missing.is_empty() {
            return Ok(());
        }

        let mut variants = Vec::with_capacity(missing.len());
        for task_id in missing {
            match self.locale_text.lookup_locale_text(task_id, locale).await {
                Ok(template) => variants.push((task_id, template)),
                // Entry left the catalog after generation; its snapshot still renders.
                Err(e) if e.is_not_found() => {
                    tracing::debug!(
                        game_id = %game_id,
                        task_id = %task_id,
                        locale = %locale,
                        "Catalog entry gone, keeping fallback text"
                    );
                    variants.push((task_id, None));
                }
                Err(e) => return Err(e),
            }
        }

        let found = variants.iter().filter(|(_, t)| t.is_some()).count();
        tracing::debug!(
            game_id = %game_id,
            locale = %locale,
            checked = variants.len(),
            found,
            "Registered locale variants"
        );
        self.queues
            .register_locale_variants(game_id, locale, variants)
            .await;
        Ok(())
    }
}
