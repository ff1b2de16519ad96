//! Task templates and placeholder parsing
//!
//! A template is an ordered sequence of fragments. Each fragment is literal text with
//! embedded placeholder tokens:
//!
//! - `{player_c}` - the player the task is rendered for
//! - `{player_<n>}` (n >= 1) - the n-th "other" player of the resolution context
//! - `{timer_<seconds>}` - a duration, rendered as `<seconds>s`
//!
//! Parsing validates every token, so a `Template` that exists is well-formed.
//! Fragments are joined with a single space when rendered.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Locale;

const CURRENT_PLAYER_TOKEN: &str = "player_c";
const PLAYER_PREFIX: &str = "player_";
const TIMER_PREFIX: &str = "timer_";

/// Error when parsing a template
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template has no fragments
    #[error("Template sequence cannot be empty")]
    EmptySequence,
    /// A `{` without a matching `}`
    #[error("Unterminated placeholder starting at position {position}")]
    Unterminated { position: usize },
    /// `{}` with nothing inside
    #[error("Empty placeholder at position {position}")]
    EmptyPlaceholder { position: usize },
    /// A token that is not one of the supported shapes
    #[error("Unknown placeholder: '{0}'")]
    UnknownPlaceholder(String),
    /// `player_<n>` where n is not a positive integer
    #[error("Invalid player index in placeholder: '{0}'")]
    InvalidPlayerIndex(String),
    /// `timer_<n>` where n is not a non-negative integer
    #[error("Invalid timer duration in placeholder: '{0}'")]
    InvalidTimer(String),
}

/// A placeholder token inside a template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// `player_c`
    CurrentPlayer,
    /// `player_<n>`, 1-based index into the shuffled other players
    OtherPlayer(usize),
    /// `timer_<seconds>`
    Timer(u32),
}

impl Placeholder {
    /// Parse the inside of a `{...}` token.
    pub fn parse(token: &str) -> Result<Self, TemplateError> {
        if token == CURRENT_PLAYER_TOKEN {
            return Ok(Self::CurrentPlayer);
        }
        if let Some(index) = token.strip_prefix(PLAYER_PREFIX) {
            if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
                return Err(TemplateError::UnknownPlaceholder(token.to_string()));
            }
            return match index.parse::<usize>() {
                Ok(n) if n >= 1 => Ok(Self::OtherPlayer(n)),
                _ => Err(TemplateError::InvalidPlayerIndex(token.to_string())),
            };
        }
        if let Some(seconds) = token.strip_prefix(TIMER_PREFIX) {
            if seconds.is_empty() || !seconds.chars().all(|c| c.is_ascii_digit()) {
                return Err(TemplateError::InvalidTimer(token.to_string()));
            }
            return seconds
                .parse::<u32>()
                .map(Self::Timer)
                .map_err(|_| TemplateError::InvalidTimer(token.to_string()));
        }
        Err(TemplateError::UnknownPlaceholder(token.to_string()))
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentPlayer => write!(f, "{{{}}}", CURRENT_PLAYER_TOKEN),
            Self::OtherPlayer(n) => write!(f, "{{{}{}}}", PLAYER_PREFIX, n),
            Self::Timer(seconds) => write!(f, "{{{}{}}}", TIMER_PREFIX, seconds),
        }
    }
}

/// One piece of a parsed fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// A parsed, validated template (one locale variant)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Template {
    /// The fragments exactly as authored
    source: Vec<String>,
    /// Parsed segments per fragment
    fragments: Vec<Vec<Segment>>,
}

impl Template {
    /// Parse a template consisting of a single fragment.
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        Self::from_fragments([text])
    }

    /// Parse a template from an ordered sequence of fragments.
    pub fn from_fragments<I, S>(fragments: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let source: Vec<String> = fragments.into_iter().map(Into::into).collect();
        if source.is_empty() {
            return Err(TemplateError::EmptySequence);
        }
        let fragments = source
            .iter()
            .map(|fragment| parse_fragment(fragment))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { source, fragments })
    }

    /// The fragments as authored.
    pub fn source(&self) -> &[String] {
        &self.source
    }

    /// Canonical single-string form (fragments joined with a space).
    pub fn canonical_text(&self) -> String {
        self.source.join(" ")
    }

    /// Parsed segments, one vector per fragment.
    pub fn fragments(&self) -> &[Vec<Segment>] {
        &self.fragments
    }

    /// Iterate over every placeholder in the template, in order.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.fragments.iter().flatten().filter_map(|segment| match segment {
            Segment::Placeholder(placeholder) => Some(*placeholder),
            Segment::Literal(_) => None,
        })
    }

    /// Highest `player_<n>` index referenced, i.e. the number of other players required.
    pub fn required_other_players(&self) -> usize {
        self.placeholders()
            .filter_map(|placeholder| match placeholder {
                Placeholder::OtherPlayer(n) => Some(n),
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_text())
    }
}

impl TryFrom<Vec<String>> for Template {
    type Error = TemplateError;

    fn try_from(fragments: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_fragments(fragments)
    }
}

impl From<Template> for Vec<String> {
    fn from(template: Template) -> Vec<String> {
        template.source
    }
}

fn parse_fragment(fragment: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = fragment;
    let mut offset = 0;

    while let Some(open) = rest.find('{') {
        literal.push_str(&rest[..open]);
        let position = offset + open;
        let after_open = &rest[open + 1..];
        let close = after_open
            .find('}')
            .ok_or(TemplateError::Unterminated { position })?;
        let token = &after_open[..close];
        if token.is_empty() {
            return Err(TemplateError::EmptyPlaceholder { position });
        }
        let placeholder = Placeholder::parse(token)?;
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Placeholder(placeholder));

        let consumed = open + 1 + close + 1;
        offset += consumed;
        rest = &rest[consumed..];
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

// ============================================================================
// Localized templates
// ============================================================================

/// All locale variants of one catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedTemplates {
    /// Locale reported when the fallback variant is rendered
    fallback_locale: Locale,
    fallback: Template,
    variants: BTreeMap<Locale, Template>,
}

impl LocalizedTemplates {
    pub fn new(fallback_locale: Locale, fallback: Template) -> Self {
        Self {
            fallback_locale,
            fallback,
            variants: BTreeMap::new(),
        }
    }

    /// Builder-style helper to add a locale variant.
    pub fn with_variant(mut self, locale: Locale, template: Template) -> Self {
        self.insert_variant(locale, template);
        self
    }

    /// Add or replace a locale variant.
    pub fn insert_variant(&mut self, locale: Locale, template: Template) {
        self.variants.insert(locale, template);
    }

    pub fn fallback(&self) -> &Template {
        &self.fallback
    }

    pub fn fallback_locale(&self) -> &Locale {
        &self.fallback_locale
    }

    /// Whether a dedicated variant exists for `locale`.
    pub fn has_variant(&self, locale: &Locale) -> bool {
        self.variants.contains_key(locale)
    }

    /// Select the variant for `locale`, falling back to the default variant.
    ///
    /// Returns the template together with the locale actually used.
    pub fn select(&self, locale: &Locale) -> (&Template, &Locale) {
        match self.variants.get_key_value(locale) {
            Some((used, template)) => (template, used),
            None => (&self.fallback, &self.fallback_locale),
        }
    }

    /// Locales with a dedicated variant.
    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.variants.keys()
    }
}
