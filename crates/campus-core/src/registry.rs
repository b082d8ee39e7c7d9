//! Scene registry - named models with at most one visible at a time
//!
//! Entries are kept in insertion order. Visibility is not stored per entry:
//! the registry holds a single selected index, so two models can never be
//! visible at once.

use tracing::{debug, info, warn};

/// Outcome of a registration attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Added, hidden
    Registered,
    /// Added and made the visible model
    RegisteredVisible,
    /// Label already present; nothing changed
    Duplicate,
}

/// Borrowed view of a registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelEntry<'a, H> {
    pub label: &'a str,
    pub handle: &'a H,
    pub visible: bool,
}

#[derive(Debug, Clone)]
struct Slot<H> {
    label: String,
    handle: H,
}

/// Insertion-ordered mapping from label to loaded model handle
#[derive(Debug, Clone)]
pub struct SceneRegistry<H> {
    slots: Vec<Slot<H>>,
    selected: Option<usize>,
}

impl<H> Default for SceneRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> SceneRegistry<H> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            selected: None,
        }
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.label == label)
    }

    fn insert(&mut self, label: String, handle: H) -> Option<usize> {
        if self.index_of(&label).is_some() {
            warn!(label = %label, "Ignoring duplicate model registration");
            return None;
        }
        self.slots.push(Slot { label, handle });
        Some(self.slots.len() - 1)
    }

    /// Add a hidden model. Re-registering an existing label is ignored.
    pub fn register(&mut self, label: impl Into<String>, handle: H) -> Registration {
        let label = label.into();
        match self.insert(label, handle) {
            Some(index) => {
                debug!(label = %self.slots[index].label, "Model registered");
                Registration::Registered
            }
            None => Registration::Duplicate,
        }
    }

    /// Add the home model.
    ///
    /// It becomes visible only if nothing is selected yet, so a user choice
    /// made while the home model was still loading is kept.
    pub fn register_default(&mut self, label: impl Into<String>, handle: H) -> Registration {
        let label = label.into();
        let Some(index) = self.insert(label, handle) else {
            return Registration::Duplicate;
        };

        if self.selected.is_none() {
            self.selected = Some(index);
            info!(label = %self.slots[index].label, "Default model registered and shown");
            Registration::RegisteredVisible
        } else {
            debug!(
                label = %self.slots[index].label,
                "Default model registered hidden, a selection is already active"
            );
            Registration::Registered
        }
    }

    /// Show only `label`, hiding every other model in one step.
    ///
    /// Returns the handle of the now-visible model, or `None` (with no state
    /// change) when the label is unknown, e.g. its model has not loaded yet.
    pub fn select(&mut self, label: &str) -> Option<&H> {
        let Some(index) = self.index_of(label) else {
            debug!(label = %label, "Selection ignored, label not registered");
            return None;
        };
        self.selected = Some(index);
        Some(&self.slots[index].handle)
    }

    /// The visible entry, if any
    pub fn currently_visible(&self) -> Option<ModelEntry<'_, H>> {
        self.selected.map(|index| self.entry(index))
    }

    /// Label of the visible entry
    pub fn selected_label(&self) -> Option<&str> {
        self.selected.map(|index| self.slots[index].label.as_str())
    }

    pub fn is_visible(&self, label: &str) -> bool {
        self.selected_label() == Some(label)
    }

    pub fn get(&self, label: &str) -> Option<ModelEntry<'_, H>> {
        self.index_of(label).map(|index| self.entry(index))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = ModelEntry<'_, H>> {
        (0..self.slots.len()).map(move |index| self.entry(index))
    }

    fn entry(&self, index: usize) -> ModelEntry<'_, H> {
        let slot = &self.slots[index];
        ModelEntry {
            label: &slot.label,
            handle: &slot.handle,
            visible: self.selected == Some(index),
        }
    }
}
