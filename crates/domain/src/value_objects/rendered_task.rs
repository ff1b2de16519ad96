//! The shape handed back to callers for one served task

use serde::{Deserialize, Serialize};

use crate::entities::{Price, Task, TaskKey, Timer};
use crate::ids::{GameTaskId, TaskId};
use crate::resolver::RenderedText;

use super::Locale;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedTask {
    /// Instance that was served; not part of the wire shape
    #[serde(skip)]
    pub instance_id: GameTaskId,
    #[serde(skip)]
    pub task_id: TaskId,
    pub key: TaskKey,
    pub text: String,
    pub locale: Locale,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<Timer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
}

impl RenderedTask {
    pub fn new(instance_id: GameTaskId, task: &Task, rendered: RenderedText) -> Self {
        Self {
            instance_id,
            task_id: task.id,
            key: task.key(),
            text: rendered.text,
            locale: rendered.locale,
            timer: task.timer,
            price: task.price,
        }
    }
}
