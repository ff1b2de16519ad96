//! Value objects - immutable, validated by construction

mod names;
mod rendered_task;
mod resolution_context;
mod template;

pub use names::{GameId, Locale, PlayerName, DEFAULT_LOCALE};
pub use rendered_task::RenderedTask;
pub use resolution_context::{ResolutionContext, ResolutionContextBuilder};
pub use template::{
    LocalizedTemplates, Placeholder, Segment, Template, TemplateError,
};
