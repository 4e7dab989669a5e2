use std::collections::BTreeMap;

use super::Value;

/// A named, flat attribute map carrying its own validation error state.
///
/// The name identifies the record type in diagnostics and in rendered
/// form-field element ids (a `Profile` record's `phone` attribute renders as
/// the element id `Profile_phone`).
#[derive(Debug, Clone, Default)]
pub struct Record {
    name: String,
    fields: BTreeMap<String, Value>,
    errors: ErrorBag,
}

impl Record {
    /// Create an empty record of the given type name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
            errors: ErrorBag::default(),
        }
    }

    /// Set an attribute value, builder style.
    #[must_use]
    pub fn set(mut self, attribute: &str, value: impl Into<Value>) -> Self {
        self.insert(attribute, value.into());
        self
    }

    /// Insert an attribute value (mutable reference version).
    pub fn insert(&mut self, attribute: &str, value: Value) {
        self.fields.insert(attribute.to_owned(), value);
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.fields.get(attribute)
    }

    /// The record's type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute values, in deterministic (sorted) order.
    pub(crate) fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// The current error state.
    #[must_use]
    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    /// Record a violation message against an attribute.
    pub fn add_error(&mut self, attribute: &str, message: impl Into<String>) {
        self.errors.add(attribute, message);
    }

    /// Merge another error collection into this record's, appending messages.
    pub fn add_errors(&mut self, other: ErrorBag) {
        self.errors.merge(other);
    }

    /// Whether the attribute currently has at least one violation.
    #[must_use]
    pub fn has_errors(&self, attribute: &str) -> bool {
        self.errors.has(attribute)
    }

    /// Discard all recorded violations.
    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    /// Open a scoped error transaction: the current error state is moved into
    /// the returned [`ErrorScope`] and the record starts from a clean bag.
    ///
    /// Call [`ErrorScope::commit`] to keep newly added errors (the snapshot
    /// is unioned back in) or [`ErrorScope::discard`] to restore the snapshot
    /// exactly. Dropping the scope without either call behaves like
    /// `discard`, so an early return can never leak errors added inside the
    /// scope.
    pub fn isolate_errors(&mut self) -> ErrorScope<'_> {
        let saved = std::mem::take(&mut self.errors);
        ErrorScope {
            record: self,
            saved: Some(saved),
        }
    }
}

/// Attribute → violation-message collection owned by a [`Record`].
///
/// Iteration order is deterministic (attributes sorted, messages in insertion
/// order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBag {
    map: BTreeMap<String, Vec<String>>,
}

impl ErrorBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, attribute: &str, message: impl Into<String>) {
        self.map
            .entry(attribute.to_owned())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn has(&self, attribute: &str) -> bool {
        self.map.get(attribute).is_some_and(|m| !m.is_empty())
    }

    /// The messages recorded against an attribute, oldest first.
    #[must_use]
    pub fn get(&self, attribute: &str) -> &[String] {
        self.map.get(attribute).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.values().all(Vec::is_empty)
    }

    /// Number of attributes with at least one violation.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.values().filter(|m| !m.is_empty()).count()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Union another bag into this one, appending its messages after any
    /// already present for the same attribute.
    pub fn merge(&mut self, other: ErrorBag) {
        for (attribute, messages) in other.map {
            self.map.entry(attribute).or_default().extend(messages);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.map
            .iter()
            .filter(|(_, m)| !m.is_empty())
            .map(|(a, m)| (a.as_str(), m.as_slice()))
    }
}

/// A scoped error transaction over one [`Record`].
///
/// Created by [`Record::isolate_errors`]. Holds the pre-scope error snapshot
/// while validators run against a clean bag; exactly one of
/// [`commit`](Self::commit) or [`discard`](Self::discard) decides what the
/// record sees afterwards. Drop without a decision restores the snapshot.
#[derive(Debug)]
pub struct ErrorScope<'a> {
    record: &'a mut Record,
    saved: Option<ErrorBag>,
}

impl ErrorScope<'_> {
    /// The record, for running validators inside the scope.
    pub fn record(&mut self) -> &mut Record {
        self.record
    }

    /// Whether any violation was added inside the scope so far.
    #[must_use]
    pub fn has_new_errors(&self) -> bool {
        !self.record.errors.is_empty()
    }

    /// Keep the errors added inside the scope and union the snapshot back in.
    pub fn commit(mut self) {
        if let Some(saved) = self.saved.take() {
            self.record.errors.merge(saved);
        }
    }

    /// Drop the errors added inside the scope and restore the snapshot.
    pub fn discard(mut self) {
        if let Some(saved) = self.saved.take() {
            self.record.errors = saved;
        }
    }
}

impl Drop for ErrorScope<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.record.errors = saved;
        }
    }
}
