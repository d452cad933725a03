use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Mutex, MutexGuard},
};

use crate::FormState;

#[derive(Debug, Default)]
struct Field {
    value: Option<String>,
    checked: bool,
    required: bool,
}

#[derive(Debug, Default)]
struct FormInner {
    fields: BTreeMap<String, Field>,
    choice_groups: BTreeMap<String, Vec<String>>,
    selections: BTreeMap<String, String>,
    hidden_sections: BTreeSet<String>,
    busy: bool,
}

/// Headless form model implementing [`FormState`]. Stands in for the
/// real rendered form when embedding the controller or testing it.
#[derive(Debug, Default)]
pub struct InMemoryFormState {
    inner: Mutex<FormInner>,
}

impl InMemoryFormState {
    pub fn new() -> Self {
        Self::default()
    }

    fn inner(&self) -> MutexGuard<'_, FormInner> {
        self.inner.lock().expect("form state mutex poisoned")
    }

    pub fn set_value(&self, field_id: &str, value: impl Into<String>) {
        self.inner().fields.entry(field_id.to_string()).or_default().value = Some(value.into());
    }

    pub fn set_checked(&self, field_id: &str, checked: bool) {
        self.inner().fields.entry(field_id.to_string()).or_default().checked = checked;
    }

    /// Registers one question's option group. Re-registering a group
    /// replaces its options and clears any selection.
    pub fn add_choice_group(&self, group: &str, options: &[&str]) {
        let mut inner = self.inner();
        inner.choice_groups.insert(
            group.to_string(),
            options.iter().map(|option| option.to_string()).collect(),
        );
        inner.selections.remove(group);
    }

    /// Marks one option of a group as checked, as a radio click would.
    /// Selecting an unknown group or option is a no-op.
    pub fn select_choice(&self, group: &str, value: &str) {
        let mut inner = self.inner();
        let known = inner
            .choice_groups
            .get(group)
            .is_some_and(|options| options.iter().any(|option| option.as_str() == value));
        if known {
            inner.selections.insert(group.to_string(), value.to_string());
        }
    }

    pub fn is_required(&self, field_id: &str) -> bool {
        self.inner()
            .fields
            .get(field_id)
            .is_some_and(|field| field.required)
    }

    pub fn is_visible(&self, section_id: &str) -> bool {
        !self.inner().hidden_sections.contains(section_id)
    }

    pub fn is_busy(&self) -> bool {
        self.inner().busy
    }
}

impl FormState for InMemoryFormState {
    fn is_checked(&self, field_id: &str) -> bool {
        self.inner()
            .fields
            .get(field_id)
            .is_some_and(|field| field.checked)
    }

    fn value(&self, field_id: &str) -> Option<String> {
        self.inner()
            .fields
            .get(field_id)
            .and_then(|field| field.value.clone())
    }

    fn set_required(&self, field_id: &str, required: bool) {
        self.inner()
            .fields
            .entry(field_id.to_string())
            .or_default()
            .required = required;
    }

    fn set_visible(&self, section_id: &str, visible: bool) {
        let mut inner = self.inner();
        if visible {
            inner.hidden_sections.remove(section_id);
        } else {
            inner.hidden_sections.insert(section_id.to_string());
        }
    }

    fn set_busy(&self, busy: bool) {
        self.inner().busy = busy;
    }

    fn choice_groups(&self) -> Vec<String> {
        self.inner().choice_groups.keys().cloned().collect()
    }

    fn checked_choices(&self) -> Vec<(String, String)> {
        self.inner()
            .selections
            .iter()
            .map(|(group, value)| (group.clone(), value.clone()))
            .collect()
    }
}
