//! The sub-validator contract and the kind registry.
//!
//! A conditional rule never inspects field values itself; it delegates to
//! validator instances constructed from [`RuleSpec`](crate::RuleSpec)s by a
//! [`Registry`]. Custom kinds implement [`Validate`] and register a
//! constructor function under a kind identifier.
//!
//! Client check fragments follow one convention: the text runs inside a
//! form-validation handler where `value` holds the field's current value and
//! `messages` collects violation text, e.g.
//! `if (value != 1) { messages.push("type must be 1"); }`. The conditional
//! synthesizer extracts the parenthesized condition from that shape when
//! composing the guard expression.

mod compare;
mod length;
mod pattern;
mod required;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::types::{ConfigError, Options, Record};

/// A constructed validator instance bound to one or more attributes.
pub trait Validate: Send + Sync {
    /// The kind identifier this instance was registered under.
    fn kind(&self) -> &str;

    /// Bound attribute names, in declaration order.
    fn attributes(&self) -> &[String];

    /// Check the record and add a violation message for every bound
    /// attribute that fails.
    fn validate(&self, record: &mut Record);

    /// The client-side check fragment for one bound attribute, or `None`
    /// when the kind has no client rendition.
    fn client_check(&self, record: &Record, attribute: &str) -> Option<String>;
}

/// Constructor signature for a validator kind.
///
/// Receives the record being validated (for kinds whose construction depends
/// on it), the bound attributes, and the rule's options.
pub type Constructor =
    fn(&Record, Vec<String>, &Options) -> Result<Arc<dyn Validate>, ConfigError>;

/// Maps validator-kind identifiers to their constructors.
pub struct Registry {
    kinds: BTreeMap<String, Constructor>,
}

impl Registry {
    /// A registry with no kinds at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            kinds: BTreeMap::new(),
        }
    }

    /// A registry pre-loaded with the built-in kinds:
    /// `compare`, `match`, `length`, `required`.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("compare", compare::construct);
        registry.register("match", pattern::construct);
        registry.register("length", length::construct);
        registry.register("required", required::construct);
        registry
    }

    /// Register a kind, replacing any previous constructor for it.
    pub fn register(&mut self, kind: &str, constructor: Constructor) {
        self.kinds.insert(kind.to_owned(), constructor);
    }

    pub(crate) fn construct(
        &self,
        kind: &str,
        record: &Record,
        attributes: Vec<String>,
        options: &Options,
    ) -> Result<Arc<dyn Validate>, ConfigError> {
        let constructor = self.kinds.get(kind).ok_or_else(|| ConfigError::UnknownKind {
            kind: kind.to_owned(),
        })?;
        constructor(record, attributes, options)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kinds", &self.kinds.keys().collect::<Vec<_>>())
            .finish()
    }
}
