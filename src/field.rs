//! Seams to the host page: the input field a session is attached to, and
//! the lookup used to follow bound references to other elements.

use std::collections::BTreeMap;

/// The text input a picker session is bound to
pub trait InputField {
    /// Current text of the field
    fn value(&self) -> String;

    fn set_value(&mut self, value: &str);

    fn attribute(&self, name: &str) -> Option<String>;

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Called after the session wrote a new value
    fn notify_change(&mut self) {}
}

impl<T: InputField + ?Sized> InputField for &mut T {
    fn value(&self) -> String {
        (**self).value()
    }

    fn set_value(&mut self, value: &str) {
        (**self).set_value(value);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        (**self).attribute(name)
    }

    fn has_attribute(&self, name: &str) -> bool {
        (**self).has_attribute(name)
    }

    fn notify_change(&mut self) {
        (**self).notify_change();
    }
}

/// Resolves a selector to the current value of the element it names.
/// Values are read on every call, never cached.
pub trait Document {
    fn query_value(&self, selector: &str) -> Option<String>;
}

impl<F> Document for F
where
    F: Fn(&str) -> Option<String>,
{
    fn query_value(&self, selector: &str) -> Option<String> {
        self(selector)
    }
}

/// A document with no other elements
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDocument;

impl Document for NoDocument {
    fn query_value(&self, _selector: &str) -> Option<String> {
        None
    }
}

/// In-memory input field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    attributes: BTreeMap<String, String>,
    changes: usize,
}

impl TextField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    /// How many change notifications the field received
    pub const fn changes(&self) -> usize {
        self.changes
    }
}

impl InputField for TextField {
    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        value.clone_into(&mut self.value);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn notify_change(&mut self) {
        self.changes += 1;
    }
}
