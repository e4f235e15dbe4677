use indexmap::IndexMap;
use tracing::trace;

use crate::ObjectId;

/// One step in an area's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    pub object: ObjectId,
    /// Position as requested by the caller, if any.
    pub position: Option<String>,
    pub area: String,
    /// First entry of a popup area; going back past it closes the popup.
    pub opened_as_popup: bool,
    /// Area that was active when the popup opened.
    pub opened_from: Option<String>,
}

impl NavigationEntry {
    pub fn new(object: ObjectId, position: Option<String>, area: impl Into<String>) -> Self {
        Self {
            object,
            position,
            area: area.into(),
            opened_as_popup: false,
            opened_from: None,
        }
    }

    pub fn opened_as_popup(mut self, opened_from: Option<String>) -> Self {
        self.opened_as_popup = true;
        self.opened_from = opened_from;
        self
    }

    fn same_step(&self, other: &NavigationEntry) -> bool {
        self.object == other.object && self.position == other.position
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed,
    /// Same object and position as the top entry; nothing was pushed.
    Refreshed,
}

/// Per-area stacks of a single session.
#[derive(Debug, Clone, Default)]
pub struct NavigationHistory {
    stacks: IndexMap<String, Vec<NavigationEntry>>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: NavigationEntry) -> PushOutcome {
        let stack = self.stacks.entry(entry.area.clone()).or_default();
        if stack.last().is_some_and(|top| top.same_step(&entry)) {
            trace!(object = %entry.object, area = %entry.area, "history refresh");
            return PushOutcome::Refreshed;
        }
        trace!(object = %entry.object, area = %entry.area, depth = stack.len() + 1, "history push");
        stack.push(entry);
        PushOutcome::Pushed
    }

    pub fn pop(&mut self, area: &str) -> Option<NavigationEntry> {
        self.stacks.get_mut(area)?.pop()
    }

    pub fn top(&self, area: &str) -> Option<&NavigationEntry> {
        self.stacks.get(area)?.last()
    }

    pub fn depth(&self, area: &str) -> usize {
        self.stacks.get(area).map_or(0, Vec::len)
    }

    /// Entries of `area`, bottom first.
    pub fn entries(&self, area: &str) -> &[NavigationEntry] {
        self.stacks.get(area).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, area: &str, object: ObjectId) -> bool {
        self.entries(area).iter().any(|e| e.object == object)
    }

    pub fn contains_anywhere(&self, object: ObjectId) -> bool {
        self.stacks
            .values()
            .flatten()
            .any(|entry| entry.object == object)
    }

    /// Pop entries of `area` until `object` is on top.
    ///
    /// Returns the popped entries, top first, or `None` without touching the stack when
    /// `object` is not in it.
    pub fn back_until(&mut self, area: &str, object: ObjectId) -> Option<Vec<NavigationEntry>> {
        if !self.contains(area, object) {
            return None;
        }
        let stack = self.stacks.get_mut(area)?;
        let mut popped = Vec::new();
        while stack.last().is_some_and(|top| top.object != object) {
            popped.extend(stack.pop());
        }
        Some(popped)
    }

    /// Pop every entry of every area, top first per area.
    pub fn drain(&mut self) -> Vec<NavigationEntry> {
        let mut drained = Vec::new();
        for stack in self.stacks.values_mut() {
            while let Some(entry) = stack.pop() {
                drained.push(entry);
            }
        }
        self.stacks.clear();
        drained
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.values().all(Vec::is_empty)
    }

    pub fn areas(&self) -> impl Iterator<Item = &str> {
        self.stacks
            .iter()
            .filter(|(_, stack)| !stack.is_empty())
            .map(|(area, _)| area.as_str())
    }
}
