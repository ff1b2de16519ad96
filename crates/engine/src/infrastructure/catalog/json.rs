//! JSON catalog files.
//!
//! A catalog file is an array of entries:
//!
//! ```json
//! [
//!   {
//!     "task": "{player_c} dares {player_1}",
//!     "type": "DUO",
//!     "repeat": "PER_PLAYER",
//!     "frequency": 2,
//!     "timer": { "enabled": true, "durationSeconds": 30 },
//!     "locales": { "sk": "{player_c} vyzýva {player_1}" }
//!   }
//! ]
//! ```
//!
//! `task` and locale texts are either one string or an array of fragments.
//! Omitted fields take the catalog defaults. Entries that fail validation are
//! logged and skipped; a file that is not a JSON array fails as a whole.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use uuid::Uuid;

use taskgame_domain::{
    Locale, Price, RepeatPolicy, Task, TaskId, TaskType, Template, Timer,
};

use crate::infrastructure::ports::RepoError;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Fragments {
    One(String),
    Many(Vec<String>),
}

impl Fragments {
    fn into_template(self) -> Result<Template, String> {
        let result = match self {
            Self::One(text) => Template::parse(&text),
            Self::Many(parts) => Template::from_fragments(parts),
        };
        result.map_err(|e| e.to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CatalogFileEntry {
    #[serde(default)]
    id: Option<Uuid>,
    task: Fragments,
    #[serde(rename = "type", default)]
    task_type: TaskType,
    #[serde(default)]
    repeat: RepeatPolicy,
    #[serde(default = "default_frequency")]
    frequency: u16,
    #[serde(default = "default_timer")]
    timer: Option<Timer>,
    #[serde(default = "default_price")]
    price: Option<Price>,
    #[serde(default)]
    locales: BTreeMap<String, Fragments>,
}

fn default_frequency() -> u16 {
    1
}

fn default_timer() -> Option<Timer> {
    Some(Timer::default())
}

fn default_price() -> Option<Price> {
    Some(Price::default())
}

impl CatalogFileEntry {
    fn into_task(self, fallback_locale: &Locale) -> Result<Task, String> {
        let mut builder = Task::builder(fallback_locale.clone(), self.task.into_template()?)
            .task_type(self.task_type)
            .repeat(self.repeat)
            .frequency(self.frequency)
            .timer(self.timer)
            .price(self.price);
        if let Some(id) = self.id {
            builder = builder.id(TaskId::from_uuid(id));
        }
        for (code, text) in self.locales {
            let locale = Locale::new(&code).map_err(|e| e.to_string())?;
            let template = text
                .into_template()
                .map_err(|e| format!("locale {}: {}", locale, e))?;
            builder = builder.locale(locale, template);
        }
        builder.build().map_err(|e| e.to_string())
    }
}

/// Parse catalog JSON. Invalid entries and repeated ids are logged and skipped.
pub fn parse_catalog(json: &str, fallback_locale: &Locale) -> Result<Vec<Task>, RepoError> {
    let raw: Vec<serde_json::Value> =
        serde_json::from_str(json).map_err(RepoError::serialization)?;

    let mut tasks = Vec::with_capacity(raw.len());
    let mut seen = HashSet::with_capacity(raw.len());
    for (index, value) in raw.into_iter().enumerate() {
        let parsed = serde_json::from_value::<CatalogFileEntry>(value)
            .map_err(|e| e.to_string())
            .and_then(|entry| entry.into_task(fallback_locale))
            .and_then(|task| {
                if seen.insert(task.id) {
                    Ok(task)
                } else {
                    Err(format!("duplicate id {}", task.id))
                }
            });
        match parsed {
            Ok(task) => tasks.push(task),
            Err(reason) => {
                tracing::warn!(entry = index, reason = %reason, "Rejected catalog entry");
            }
        }
    }
    Ok(tasks)
}

/// Read and parse a catalog file.
pub async fn load_catalog_file(
    path: impl AsRef<Path>,
    fallback_locale: &Locale,
) -> Result<Vec<Task>, RepoError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| RepoError::database("load_catalog_file", format!("{}: {}", path.display(), e)))?;
    let tasks = parse_catalog(&json, fallback_locale)?;
    tracing::info!(path = %path.display(), entries = tasks.len(), "Loaded catalog file");
    Ok(tasks)
}
