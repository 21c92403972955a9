use super::{GroupCoordinator, GroupState};
use crate::error::NavigationError;
use crate::routing::{DestinationId, Routing};

/// One tab of a tab set and the destination at its root, if any.
#[derive(Debug, Clone)]
pub struct TabSlot<R: Routing> {
    pub tab: R::TabType,
    pub root: Option<DestinationId>,
}

/// A set of tabs, each owning an independent root destination.
///
/// Switching tabs never touches another tab's root, so whatever navigation
/// happened inside a tab (usually a nested stack) survives the switch.
#[derive(Debug, Clone)]
pub struct TabGroup<R: Routing> {
    state: GroupState,
    tabs: Vec<TabSlot<R>>,
    selected_tab: R::TabType,
}

impl<R: Routing> TabGroup<R> {
    /// Creates a tab set. `selected` must be one of `tabs`.
    pub fn new(tabs: Vec<R::TabType>, selected: R::TabType) -> Result<Self, NavigationError> {
        if !tabs.contains(&selected) {
            return Err(NavigationError::TabNotFound(format!("{:?}", selected)));
        }
        let tabs = tabs
            .into_iter()
            .map(|tab| TabSlot { tab, root: None })
            .collect();
        Ok(Self {
            state: GroupState::new(),
            tabs,
            selected_tab: selected,
        })
    }

    pub fn tabs(&self) -> &[TabSlot<R>] {
        &self.tabs
    }

    pub fn selected_tab(&self) -> &R::TabType {
        &self.selected_tab
    }

    pub fn has_tab(&self, tab: &R::TabType) -> bool {
        self.tabs.iter().any(|slot| &slot.tab == tab)
    }

    pub fn root_for(&self, tab: &R::TabType) -> Result<Option<DestinationId>, NavigationError> {
        self.slot(tab).map(|slot| slot.root)
    }

    pub fn tab_for_child(&self, id: DestinationId) -> Option<&R::TabType> {
        self.tabs
            .iter()
            .find(|slot| slot.root == Some(id))
            .map(|slot| &slot.tab)
    }

    /// Switches the selected tab. The tab's root, if any, becomes the current child.
    pub fn select_tab(&mut self, tab: &R::TabType) -> Result<(), NavigationError> {
        let root = self.slot(tab)?.root;
        self.selected_tab = tab.clone();
        match root {
            Some(root) => self.state.set_current(root)?,
            None => self.state.clear_current(),
        }
        Ok(())
    }

    /// Installs `id` as the root of `tab`, returning the root it displaced.
    pub fn set_root(
        &mut self,
        tab: &R::TabType,
        id: DestinationId,
    ) -> Result<Option<DestinationId>, NavigationError> {
        let index = self.index_of(tab)?;
        let displaced = self.tabs[index].root.replace(id);
        match displaced.and_then(|old| self.state.position(old)) {
            Some(position) => {
                if let Some(old) = displaced {
                    self.state.remove(old);
                }
                self.state.insert(position, id);
            }
            None => self.state.push(id),
        }
        if &self.selected_tab == tab {
            self.state.set_current(id)?;
        }
        Ok(displaced)
    }

    fn slot(&self, tab: &R::TabType) -> Result<&TabSlot<R>, NavigationError> {
        self.tabs
            .iter()
            .find(|slot| &slot.tab == tab)
            .ok_or_else(|| NavigationError::TabNotFound(format!("{:?}", tab)))
    }

    fn index_of(&self, tab: &R::TabType) -> Result<usize, NavigationError> {
        self.tabs
            .iter()
            .position(|slot| &slot.tab == tab)
            .ok_or_else(|| NavigationError::TabNotFound(format!("{:?}", tab)))
    }
}

impl<R: Routing> GroupCoordinator for TabGroup<R> {
    fn state(&self) -> &GroupState {
        &self.state
    }

    /// Fills the first tab that has no root yet.
    fn add_child(&mut self, child: DestinationId, should_set_current: bool) -> Result<(), NavigationError> {
        let tab = self
            .tabs
            .iter()
            .find(|slot| slot.root.is_none())
            .map(|slot| slot.tab.clone())
            .ok_or_else(|| NavigationError::TabNotFound("<no empty tab>".to_string()))?;
        self.set_root(&tab, child)?;
        if should_set_current {
            self.select_tab(&tab)?;
        }
        Ok(())
    }

    /// Empties the tab the child was rooted in. No other tab is selected in its place.
    fn remove_child(&mut self, id: DestinationId) -> Result<(), NavigationError> {
        if !self.state.remove(id) {
            return Err(NavigationError::ChildDestinationNotFound(id));
        }
        for slot in self.tabs.iter_mut().filter(|slot| slot.root == Some(id)) {
            slot.root = None;
        }
        Ok(())
    }

    fn replace_child(
        &mut self,
        current: DestinationId,
        replacement: DestinationId,
    ) -> Result<Vec<DestinationId>, NavigationError> {
        let tab = self
            .tab_for_child(current)
            .cloned()
            .ok_or(NavigationError::ChildDestinationNotFound(current))?;
        Ok(self.set_root(&tab, replacement)?.into_iter().collect())
    }

    fn update_current_destination(&mut self, id: DestinationId) -> Result<(), NavigationError> {
        let tab = self
            .tab_for_child(id)
            .cloned()
            .ok_or(NavigationError::ChildDestinationNotFound(id))?;
        self.select_tab(&tab)
    }
}
