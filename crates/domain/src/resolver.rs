//! Placeholder resolver
//!
//! Turns a catalog entry's localized templates into text for one resolution
//! context. Rendering is pure: all randomness lives in the context's shuffle.

use std::fmt::Write;

use crate::error::ResolutionError;
use crate::value_objects::{
    Locale, LocalizedTemplates, Placeholder, ResolutionContext, Segment, Template,
};

/// Text produced by rendering a template, with the locale actually used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedText {
    pub text: String,
    pub locale: Locale,
}

/// Render the variant for `context.locale()` (or the fallback) against `context`.
pub fn render(
    templates: &LocalizedTemplates,
    context: &ResolutionContext,
) -> Result<RenderedText, ResolutionError> {
    let (template, used_locale) = templates.select(context.locale());
    let text = render_template(template, context)?;
    Ok(RenderedText {
        text,
        locale: used_locale.clone(),
    })
}

/// Render one template variant.
///
/// Fails with `InsufficientPlayers` before producing any text when the template
/// needs more other players than the context has.
pub fn render_template(
    template: &Template,
    context: &ResolutionContext,
) -> Result<String, ResolutionError> {
    let required = template.required_other_players();
    let available = context.other_players_shuffled().len();
    if required > available {
        return Err(ResolutionError::InsufficientPlayers {
            required,
            available,
        });
    }

    let mut rendered = Vec::with_capacity(template.fragments().len());
    for fragment in template.fragments() {
        let mut text = String::new();
        for segment in fragment {
            match segment {
                Segment::Literal(literal) => text.push_str(literal),
                Segment::Placeholder(placeholder) => {
                    substitute(&mut text, *placeholder, context)?
                }
            }
        }
        rendered.push(text);
    }
    Ok(rendered.join(" "))
}

/// Parse raw template text and render it in one step.
///
/// Used for text that did not pass catalog validation; a bad token surfaces as
/// `MalformedTemplate`.
pub fn render_source(source: &str, context: &ResolutionContext) -> Result<String, ResolutionError> {
    let template = Template::parse(source)?;
    render_template(&template, context)
}

fn substitute(
    out: &mut String,
    placeholder: Placeholder,
    context: &ResolutionContext,
) -> Result<(), ResolutionError> {
    match placeholder {
        Placeholder::CurrentPlayer => out.push_str(context.current_player().as_str()),
        Placeholder::OtherPlayer(n) => out.push_str(context.other_player(n)?.as_str()),
        Placeholder::Timer(seconds) => {
            // Writing to a String cannot fail.
            let _ = write!(out, "{}s", seconds);
        }
    }
    Ok(())
}
