//! Game task queue aggregate
//!
//! Owns every task instance of one game plus the "current" pointer and the
//! resolution context bound to it. All transitions of the per-game state
//! machine happen here:
//!
//! - `generate` wipes the game and materializes `frequency` instances per entry
//! - `current` returns the bound instance, or binds a random eligible one
//! - `advance` retires the bound instance according to its repeat policy and
//!   binds the next one
//!
//! Every mutating operation either fully applies or leaves the queue untouched:
//! the next instance is rendered before anything is committed.
//!
//! Randomness is injected via `pick(upper) -> index in 0..upper`.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::entities::{GameTask, GameTaskState, RepeatPolicy, Task};
use crate::error::{DomainError, ResolutionError};
use crate::ids::{GameTaskId, TaskId};
use crate::resolver;
use crate::value_objects::{GameId, Locale, PlayerName, RenderedTask, ResolutionContext, Template};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// What happened to the previously current instance during `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetiredInstance {
    /// Fully consumed and deleted from the pool
    Removed(GameTaskId),
    /// Back in the pool as `UNRESOLVED`
    Returned(GameTaskId),
}

impl RetiredInstance {
    pub fn id(&self) -> GameTaskId {
        match self {
            Self::Removed(id) | Self::Returned(id) => *id,
        }
    }
}

/// Result of `advance`: the retirement it applied and the newly bound task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceOutcome {
    pub retired: Option<RetiredInstance>,
    pub next: Option<RenderedTask>,
}

/// The instance currently in play and the context it was first served with
#[derive(Debug, Clone, PartialEq, Eq)]
struct CurrentBinding {
    instance_id: GameTaskId,
    context: ResolutionContext,
}

/// What `advance` does with the instance it leaves behind
#[derive(Debug, Clone, PartialEq, Eq)]
enum Retirement {
    Remove(GameTaskId),
    Return {
        id: GameTaskId,
        answered_by: BTreeSet<PlayerName>,
    },
}

impl Retirement {
    fn outcome(&self) -> RetiredInstance {
        match self {
            Self::Remove(id) => RetiredInstance::Removed(*id),
            Self::Return { id, .. } => RetiredInstance::Returned(*id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameTaskQueue {
    game_id: GameId,
    instances: Vec<GameTask>,
    /// Snapshots of the catalog entries the instances were generated from
    entries: HashMap<TaskId, Task>,
    current: Option<CurrentBinding>,
    /// (entry, locale) pairs already looked up in the locale store
    checked_locales: HashSet<(TaskId, Locale)>,
    generated_at: Option<DateTime<Utc>>,
}

impl GameTaskQueue {
    pub fn new(game_id: GameId) -> Self {
        Self {
            game_id,
            instances: Vec::new(),
            entries: HashMap::new(),
            current: None,
            checked_locales: HashSet::new(),
            generated_at: None,
        }
    }

    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    pub fn instances(&self) -> &[GameTask] {
        &self.instances
    }

    /// Number of instances still in the pool (including the current one).
    pub fn pool_size(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated_at
    }

    pub fn entry(&self, task_id: TaskId) -> Option<&Task> {
        self.entries.get(&task_id)
    }

    pub fn current_instance(&self) -> Option<&GameTask> {
        let binding = self.current.as_ref()?;
        self.instances.iter().find(|i| i.id == binding.instance_id)
    }

    /// Instances for one catalog entry.
    pub fn instances_of(&self, task_id: TaskId) -> impl Iterator<Item = &GameTask> {
        self.instances.iter().filter(move |i| i.task_id == task_id)
    }

    // =========================================================================
    // Generation
    // =========================================================================

    /// Destructive reset: drop every instance of this game and create
    /// `frequency` fresh `UNRESOLVED` instances per entry. An entry whose id
    /// was already seen in `entries` is skipped.
    ///
    /// Returns the number of instances created.
    pub fn generate(
        &mut self,
        entries: Vec<Task>,
        mut next_id: impl FnMut() -> GameTaskId,
        now: DateTime<Utc>,
    ) -> usize {
        self.instances.clear();
        self.entries.clear();
        self.current = None;
        self.checked_locales.clear();
        self.generated_at = Some(now);

        for entry in entries {
            // frequency >= 1 is validated on load; zero simply yields nothing
            if entry.frequency == 0 {
                continue;
            }
            // Ids are unique per catalog; a repeated id keeps the first entry
            if self.entries.contains_key(&entry.id) {
                continue;
            }
            for _ in 0..entry.frequency {
                self.instances
                    .push(GameTask::new(self.game_id.clone(), next_id(), entry.id));
            }
            self.entries.insert(entry.id, entry);
        }
        self.instances.len()
    }

    // =========================================================================
    // Serving
    // =========================================================================

    /// Re-render the bound current instance in `locale`, if there is one.
    ///
    /// The bound context decides the player names; only the locale follows the caller.
    pub fn render_current(&self, locale: &Locale) -> Result<Option<RenderedTask>, QueueError> {
        let Some(binding) = &self.current else {
            return Ok(None);
        };
        let instance = self.find_instance(binding.instance_id)?;
        let context = binding.context.with_locale(locale.clone());
        self.render_instance(instance, &context).map(Some)
    }

    /// Return the current task, binding a new one when none is in play.
    ///
    /// `None` means the pool holds nothing eligible for this player.
    pub fn current(
        &mut self,
        context: &ResolutionContext,
        pick: impl FnMut(usize) -> usize,
    ) -> Result<Option<RenderedTask>, QueueError> {
        self.ensure_same_game(context)?;
        if let Some(rendered) = self.render_current(context.locale())? {
            return Ok(Some(rendered));
        }
        self.select_next(context, None, pick)
    }

    /// Retire the current task according to its repeat policy and bind the next.
    ///
    /// With nothing in play this behaves like [`Self::current`].
    pub fn advance(
        &mut self,
        context: &ResolutionContext,
        pick: impl FnMut(usize) -> usize,
    ) -> Result<AdvanceOutcome, QueueError> {
        self.ensure_same_game(context)?;
        let retirement = self.plan_retirement(context)?;
        let retired = retirement.as_ref().map(Retirement::outcome);
        let next = self.select_next(context, retirement, pick)?;
        Ok(AdvanceOutcome { retired, next })
    }

    fn ensure_same_game(&self, context: &ResolutionContext) -> Result<(), DomainError> {
        if context.game_id() != &self.game_id {
            return Err(DomainError::validation(format!(
                "Resolution context for game {} used on game {}",
                context.game_id(),
                self.game_id
            )));
        }
        Ok(())
    }

    fn plan_retirement(
        &self,
        context: &ResolutionContext,
    ) -> Result<Option<Retirement>, QueueError> {
        let Some(binding) = &self.current else {
            return Ok(None);
        };
        let instance = self.find_instance(binding.instance_id)?;
        let entry = self.find_entry(instance.task_id)?;

        let retirement = match entry.repeat {
            RepeatPolicy::Never => Retirement::Remove(instance.id),
            RepeatPolicy::Always => Retirement::Return {
                id: instance.id,
                answered_by: instance.answered_by.clone(),
            },
            RepeatPolicy::PerPlayer => {
                let mut answered_by = instance.answered_by.clone();
                answered_by.insert(context.current_player().clone());
                if context.is_roster_covered_by(&answered_by) {
                    Retirement::Remove(instance.id)
                } else {
                    Retirement::Return {
                        id: instance.id,
                        answered_by,
                    }
                }
            }
        };
        Ok(Some(retirement))
    }

    fn select_next(
        &mut self,
        context: &ResolutionContext,
        retirement: Option<Retirement>,
        mut pick: impl FnMut(usize) -> usize,
    ) -> Result<Option<RenderedTask>, QueueError> {
        let player = context.current_player();
        let candidates: Vec<usize> = self
            .instances
            .iter()
            .enumerate()
            .filter(|(_, instance)| {
                let Some(entry) = self.entries.get(&instance.task_id) else {
                    return false;
                };
                match &retirement {
                    Some(Retirement::Remove(id)) if *id == instance.id => false,
                    Some(Retirement::Return { id, answered_by }) if *id == instance.id => {
                        entry.repeat != RepeatPolicy::PerPlayer || !answered_by.contains(player)
                    }
                    _ => instance.is_eligible_for(player, entry.repeat),
                }
            })
            .map(|(index, _)| index)
            .collect();

        if candidates.is_empty() {
            if let Some(retirement) = retirement {
                self.apply_retirement(retirement)?;
            }
            return Ok(None);
        }

        let chosen = candidates[pick(candidates.len()) % candidates.len()];
        let chosen_id = self.instances[chosen].id;
        let rendered = self.render_instance(&self.instances[chosen], context)?;

        // Commit: nothing above mutated the queue.
        if let Some(retirement) = retirement {
            self.apply_retirement(retirement)?;
        }
        let instance = self
            .instances
            .iter_mut()
            .find(|i| i.id == chosen_id)
            .ok_or_else(|| DomainError::not_found("GameTask", chosen_id.to_string()))?;
        instance.mark_current()?;
        self.current = Some(CurrentBinding {
            instance_id: chosen_id,
            context: context.clone(),
        });
        Ok(Some(rendered))
    }

    fn apply_retirement(&mut self, retirement: Retirement) -> Result<(), DomainError> {
        self.current = None;
        match retirement {
            Retirement::Remove(id) => {
                let position = self
                    .instances
                    .iter()
                    .position(|i| i.id == id)
                    .ok_or_else(|| DomainError::not_found("GameTask", id.to_string()))?;
                self.instances[position].resolve()?;
                self.instances.remove(position);
            }
            Retirement::Return { id, answered_by } => {
                let instance = self
                    .instances
                    .iter_mut()
                    .find(|i| i.id == id)
                    .ok_or_else(|| DomainError::not_found("GameTask", id.to_string()))?;
                instance.return_to_pool()?;
                instance.answered_by = answered_by;
            }
        }
        Ok(())
    }

    fn find_instance(&self, id: GameTaskId) -> Result<&GameTask, DomainError> {
        self.instances
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| DomainError::not_found("GameTask", id.to_string()))
    }

    fn find_entry(&self, task_id: TaskId) -> Result<&Task, DomainError> {
        self.entries
            .get(&task_id)
            .ok_or_else(|| DomainError::not_found("Task", task_id.to_string()))
    }

    fn render_instance(
        &self,
        instance: &GameTask,
        context: &ResolutionContext,
    ) -> Result<RenderedTask, QueueError> {
        let entry = self.find_entry(instance.task_id)?;
        let rendered = resolver::render(&entry.templates, context)?;
        Ok(RenderedTask::new(instance.id, entry, rendered))
    }

    // =========================================================================
    // Locale variants
    // =========================================================================

    /// Entries that have neither a variant for `locale` nor a recorded lookup.
    pub fn entries_missing_locale(&self, locale: &Locale) -> Vec<TaskId> {
        let mut missing: Vec<TaskId> = self
            .entries
            .values()
            .filter(|entry| {
                entry.templates.fallback_locale() != locale
                    && !entry.templates.has_variant(locale)
                    && !self.checked_locales.contains(&(entry.id, locale.clone()))
            })
            .map(|entry| entry.id)
            .collect();
        missing.sort();
        missing
    }

    /// Record lookup results for `locale`; `None` means no translation exists.
    pub fn register_locale_variants(
        &mut self,
        locale: &Locale,
        variants: Vec<(TaskId, Option<Template>)>,
    ) {
        for (task_id, template) in variants {
            let Some(entry) = self.entries.get_mut(&task_id) else {
                continue;
            };
            if let Some(template) = template {
                entry.add_locale(locale.clone(), template);
            }
            self.checked_locales.insert((task_id, locale.clone()));
        }
    }

    /// Count instances per state.
    pub fn state_counts(&self) -> HashMap<GameTaskState, usize> {
        let mut counts = HashMap::new();
        for instance in &self.instances {
            *counts.entry(instance.state).or_insert(0) += 1;
        }
        counts
    }
}
