//! Task entity - a catalog entry
//!
//! A task is a reusable prompt template plus the metadata that governs how
//! many copies a game gets and what happens to a copy once it has been played.
//! Tasks are read-only to the game core; catalog management owns them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::DomainError;
use crate::ids::TaskId;
use crate::value_objects::{Locale, LocalizedTemplates, Template};

/// Number of hex digits kept from the template digest
const TASK_KEY_HEX_LEN: usize = 16;

/// How many distinct players a task addresses (informational, used for filtering)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    #[default]
    Single,
    Duo,
    All,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "SINGLE"),
            Self::Duo => write!(f, "DUO"),
            Self::All => write!(f, "ALL"),
        }
    }
}

impl FromStr for TaskType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SINGLE" => Ok(Self::Single),
            "DUO" => Ok(Self::Duo),
            "ALL" => Ok(Self::All),
            _ => Err(DomainError::parse(format!("Unknown task type: {}", s))),
        }
    }
}

/// What happens to a task instance after it has been played
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepeatPolicy {
    /// One-shot: the instance is removed once played
    #[default]
    Never,
    /// The instance goes back to the pool and may be served again to anyone
    Always,
    /// The instance goes back to the pool until every player has had it
    PerPlayer,
}

impl fmt::Display for RepeatPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Never => write!(f, "NEVER"),
            Self::Always => write!(f, "ALWAYS"),
            Self::PerPlayer => write!(f, "PER_PLAYER"),
        }
    }
}

impl FromStr for RepeatPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NEVER" => Ok(Self::Never),
            "ALWAYS" => Ok(Self::Always),
            "PER_PLAYER" | "PERPLAYER" => Ok(Self::PerPlayer),
            _ => Err(DomainError::parse(format!("Unknown repeat policy: {}", s))),
        }
    }
}

/// Optional countdown shown with a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub enabled: bool,
    pub duration_seconds: u32,
}

impl Default for Timer {
    fn default() -> Self {
        Self {
            enabled: false,
            duration_seconds: 60,
        }
    }
}

/// Optional price (e.g. drinks) attached to skipping a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub enabled: bool,
    pub cost: u32,
}

impl Default for Price {
    fn default() -> Self {
        Self {
            enabled: true,
            cost: 1,
        }
    }
}

/// Stable identifier derived from a task's canonical fallback text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskKey(String);

impl TaskKey {
    pub fn from_template(template: &Template) -> Self {
        let digest = Sha256::digest(template.canonical_text().as_bytes());
        let hex = hex::encode(digest);
        Self(format!("task_{}", &hex[..TASK_KEY_HEX_LEN]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub templates: LocalizedTemplates,
    pub task_type: TaskType,
    pub repeat: RepeatPolicy,
    /// Number of instances generated per game (>= 1)
    pub frequency: u16,
    pub timer: Option<Timer>,
    pub price: Option<Price>,
}

impl Task {
    /// Start building a task from its fallback template.
    pub fn builder(fallback_locale: Locale, template: Template) -> TaskBuilder {
        TaskBuilder::new(fallback_locale, template)
    }

    /// Key derived from the fallback template text.
    pub fn key(&self) -> TaskKey {
        TaskKey::from_template(self.templates.fallback())
    }

    /// Re-check the invariants a catalog entry must satisfy.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.frequency == 0 {
            return Err(DomainError::validation(format!(
                "Task {} frequency must be at least 1",
                self.id
            )));
        }
        Ok(())
    }

    /// Register a translation of this task.
    pub fn add_locale(&mut self, locale: Locale, template: Template) {
        self.templates.insert_variant(locale, template);
    }
}

/// Builder carrying the catalog defaults (single target, never repeated,
/// one copy per game, price enabled at 1, timer disabled at 60 seconds).
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    id: TaskId,
    templates: LocalizedTemplates,
    task_type: TaskType,
    repeat: RepeatPolicy,
    frequency: u16,
    timer: Option<Timer>,
    price: Option<Price>,
}

impl TaskBuilder {
    fn new(fallback_locale: Locale, template: Template) -> Self {
        Self {
            id: TaskId::new(),
            templates: LocalizedTemplates::new(fallback_locale, template),
            task_type: TaskType::default(),
            repeat: RepeatPolicy::default(),
            frequency: 1,
            timer: Some(Timer::default()),
            price: Some(Price::default()),
        }
    }

    pub fn id(mut self, id: TaskId) -> Self {
        self.id = id;
        self
    }

    pub fn task_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    pub fn repeat(mut self, repeat: RepeatPolicy) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn frequency(mut self, frequency: u16) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn timer(mut self, timer: Option<Timer>) -> Self {
        self.timer = timer;
        self
    }

    pub fn price(mut self, price: Option<Price>) -> Self {
        self.price = price;
        self
    }

    pub fn locale(mut self, locale: Locale, template: Template) -> Self {
        self.templates.insert_variant(locale, template);
        self
    }

    /// Build the task.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `frequency` is 0.
    pub fn build(self) -> Result<Task, DomainError> {
        let task = Task {
            id: self.id,
            templates: self.templates,
            task_type: self.task_type,
            repeat: self.repeat,
            frequency: self.frequency,
            timer: self.timer,
            price: self.price,
        };
        task.validate()?;
        Ok(task)
    }
}
