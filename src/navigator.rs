use crate::routing::{DestinationId, PresentationId};

/// Tracks the ordered path of destinations inside a stack.
///
/// Forward navigation pushes onto the path and back navigation pops from it.
/// `current_presentation_id` remembers which request produced the element that
/// was most recently popped so a delayed completion can be correlated with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    path: Vec<DestinationId>,
    current_presentation_id: Option<PresentationId>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &[DestinationId] {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn current_presentation_id(&self) -> Option<PresentationId> {
        self.current_presentation_id
    }

    /// Appends a destination to the end of the path.
    pub fn add_path_element(&mut self, id: DestinationId) {
        self.path.push(id);
    }

    /// Pops the last element and records `previous_presentation_id`.
    pub fn back_to_previous_path_element(
        &mut self,
        previous_presentation_id: PresentationId,
    ) -> Option<DestinationId> {
        let removed = self.path.pop();
        self.current_presentation_id = Some(previous_presentation_id);
        removed
    }

    /// The element that becomes current after one pop, without mutating the path.
    pub fn previous_path_element(&self) -> Option<DestinationId> {
        self.path.len().checked_sub(2).map(|index| self.path[index])
    }

    pub fn current_path_element(&self) -> Option<DestinationId> {
        self.path.last().copied()
    }

    /// Removes an element wherever it sits in the path.
    pub fn remove_path_element(&mut self, id: DestinationId) -> bool {
        let before = self.path.len();
        self.path.retain(|element| *element != id);
        before != self.path.len()
    }

    /// Drops `id` and everything pushed after it. Returns the dropped elements, bottom first.
    pub fn truncate_at(&mut self, id: DestinationId) -> Vec<DestinationId> {
        match self.path.iter().position(|element| *element == id) {
            Some(index) => self.path.split_off(index),
            None => Vec::new(),
        }
    }

    pub fn contains(&self, id: DestinationId) -> bool {
        self.path.contains(&id)
    }
}
