use super::{GroupCoordinator, GroupState};
use crate::error::NavigationError;
use crate::navigator::Navigator;
use crate::routing::{DestinationId, PresentationId};

/// A push/pop group. Its current child is always the most recently pushed live child.
#[derive(Debug, Clone, Default)]
pub struct StackGroup {
    state: GroupState,
    navigator: Navigator,
}

impl StackGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn root(&self) -> Option<DestinationId> {
        self.state.children().first().copied()
    }

    pub fn top(&self) -> Option<DestinationId> {
        self.state.last()
    }

    /// The child that becomes the top after one pop.
    pub fn previous(&self) -> Option<DestinationId> {
        self.navigator.previous_path_element()
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Pops the top child, recording the presentation that asked for it.
    ///
    /// The root is never popped; `None` is returned when only the root is left.
    pub fn pop(&mut self, presentation_id: PresentationId) -> Option<DestinationId> {
        if self.state.len() < 2 {
            return None;
        }
        let top = self.navigator.back_to_previous_path_element(presentation_id)?;
        self.state.remove(top);
        self.refocus_top();
        Some(top)
    }

    fn refocus_top(&mut self) {
        match self.state.last() {
            Some(top) => {
                let _ = self.state.set_current(top);
            }
            None => self.state.clear_current(),
        }
    }
}

impl GroupCoordinator for StackGroup {
    fn state(&self) -> &GroupState {
        &self.state
    }

    /// Pushing always brings the new child to the front, whatever `should_set_current` says.
    fn add_child(&mut self, child: DestinationId, _should_set_current: bool) -> Result<(), NavigationError> {
        self.state.push(child);
        if !self.navigator.contains(child) {
            self.navigator.add_path_element(child);
        }
        self.state.set_current(child)
    }

    fn remove_child(&mut self, id: DestinationId) -> Result<(), NavigationError> {
        if !self.state.remove(id) {
            return Err(NavigationError::ChildDestinationNotFound(id));
        }
        self.navigator.remove_path_element(id);
        self.refocus_top();
        Ok(())
    }

    /// Truncates the stack at `current` and pushes `replacement`.
    ///
    /// When `current` is the top this is a pop followed by a push. When it is
    /// deeper, everything pushed above it is displaced as well.
    fn replace_child(
        &mut self,
        current: DestinationId,
        replacement: DestinationId,
    ) -> Result<Vec<DestinationId>, NavigationError> {
        if !self.state.contains(current) {
            return Err(NavigationError::ChildDestinationNotFound(current));
        }
        let displaced = self.navigator.truncate_at(current);
        for id in &displaced {
            self.state.remove(*id);
        }
        self.add_child(replacement, true)?;
        Ok(displaced)
    }

    fn update_current_destination(&mut self, id: DestinationId) -> Result<(), NavigationError> {
        if self.state.last() != Some(id) {
            return Err(NavigationError::ChildDestinationNotFound(id));
        }
        self.state.set_current(id)
    }
}
