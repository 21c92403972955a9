use crate::error::NavigationError;
use crate::routing::{DestinationId, Routing};
use serde::{Deserialize, Serialize};
use std::fmt;

mod columns;
mod stack;
mod tabs;

pub use columns::ColumnGroup;
pub use stack::StackGroup;
pub use tabs::{TabGroup, TabSlot};

/// Ordered children of a group plus the child that currently has focus.
///
/// `current_child` is always `None` or a member of `children`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupState {
    children: Vec<DestinationId>,
    current_child: Option<DestinationId>,
}

impl GroupState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(&self) -> &[DestinationId] {
        &self.children
    }

    pub fn current_child(&self) -> Option<DestinationId> {
        self.current_child
    }

    pub fn contains(&self, id: DestinationId) -> bool {
        self.children.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn last(&self) -> Option<DestinationId> {
        self.children.last().copied()
    }

    pub(crate) fn push(&mut self, id: DestinationId) {
        if !self.contains(id) {
            self.children.push(id);
        }
    }

    pub(crate) fn insert(&mut self, index: usize, id: DestinationId) {
        if !self.contains(id) {
            let index = index.min(self.children.len());
            self.children.insert(index, id);
        }
    }

    pub(crate) fn position(&self, id: DestinationId) -> Option<usize> {
        self.children.iter().position(|child| *child == id)
    }

    /// Removes a child, clearing `current_child` if it pointed at it.
    pub(crate) fn remove(&mut self, id: DestinationId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.children.remove(index);
        if self.current_child == Some(id) {
            self.current_child = None;
        }
        true
    }

    pub(crate) fn set_current(&mut self, id: DestinationId) -> Result<(), NavigationError> {
        if !self.contains(id) {
            return Err(NavigationError::ChildDestinationNotFound(id));
        }
        self.current_child = Some(id);
        Ok(())
    }

    pub(crate) fn clear_current(&mut self) {
        self.current_child = None;
    }
}

/// The contract every group specialization fulfils.
pub trait GroupCoordinator {
    fn state(&self) -> &GroupState;

    /// Adds a child. Whether it takes focus is up to the specialization's policy.
    fn add_child(&mut self, child: DestinationId, should_set_current: bool) -> Result<(), NavigationError>;

    /// Removes a child. Stacks refocus their new top; tabs and columns leave focus empty.
    fn remove_child(&mut self, id: DestinationId) -> Result<(), NavigationError>;

    /// Puts `replacement` where `current` was. Returns every child displaced by the swap.
    fn replace_child(
        &mut self,
        current: DestinationId,
        replacement: DestinationId,
    ) -> Result<Vec<DestinationId>, NavigationError>;

    fn update_current_destination(&mut self, id: DestinationId) -> Result<(), NavigationError>;

    fn child_for_identifier(&self, id: DestinationId) -> Option<DestinationId> {
        self.state().contains(id).then_some(id)
    }

    fn current_child(&self) -> Option<DestinationId> {
        self.state().current_child()
    }

    fn children(&self) -> &[DestinationId] {
        self.state().children()
    }
}

/// The closed set of group specializations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Stack,
    Tabs,
    Columns,
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKind::Stack => write!(f, "stack"),
            GroupKind::Tabs => write!(f, "tabs"),
            GroupKind::Columns => write!(f, "columns"),
        }
    }
}

/// A group coordinator owned by a destination.
#[derive(Debug, Clone)]
pub enum Group<R: Routing> {
    Stack(StackGroup),
    Tabs(TabGroup<R>),
    Columns(ColumnGroup),
}

// Forwards a `GroupCoordinator` call to whichever specialization is inside.
macro_rules! delegate {
    ($self:ident, $group:ident => $call:expr) => {
        match $self {
            Group::Stack($group) => $call,
            Group::Tabs($group) => $call,
            Group::Columns($group) => $call,
        }
    };
}

impl<R: Routing> Group<R> {
    pub fn kind(&self) -> GroupKind {
        match self {
            Group::Stack(_) => GroupKind::Stack,
            Group::Tabs(_) => GroupKind::Tabs,
            Group::Columns(_) => GroupKind::Columns,
        }
    }

    pub fn as_stack(&self) -> Option<&StackGroup> {
        match self {
            Group::Stack(stack) => Some(stack),
            _ => None,
        }
    }

    pub fn as_stack_mut(&mut self) -> Option<&mut StackGroup> {
        match self {
            Group::Stack(stack) => Some(stack),
            _ => None,
        }
    }

    pub fn as_tabs(&self) -> Option<&TabGroup<R>> {
        match self {
            Group::Tabs(tabs) => Some(tabs),
            _ => None,
        }
    }

    pub fn as_tabs_mut(&mut self) -> Option<&mut TabGroup<R>> {
        match self {
            Group::Tabs(tabs) => Some(tabs),
            _ => None,
        }
    }

    pub fn as_columns(&self) -> Option<&ColumnGroup> {
        match self {
            Group::Columns(columns) => Some(columns),
            _ => None,
        }
    }

    pub fn as_columns_mut(&mut self) -> Option<&mut ColumnGroup> {
        match self {
            Group::Columns(columns) => Some(columns),
            _ => None,
        }
    }
}

impl<R: Routing> GroupCoordinator for Group<R> {
    fn state(&self) -> &GroupState {
        delegate!(self, group => group.state())
    }

    fn add_child(&mut self, child: DestinationId, should_set_current: bool) -> Result<(), NavigationError> {
        delegate!(self, group => group.add_child(child, should_set_current))
    }

    fn remove_child(&mut self, id: DestinationId) -> Result<(), NavigationError> {
        delegate!(self, group => group.remove_child(id))
    }

    fn replace_child(
        &mut self,
        current: DestinationId,
        replacement: DestinationId,
    ) -> Result<Vec<DestinationId>, NavigationError> {
        delegate!(self, group => group.replace_child(current, replacement))
    }

    fn update_current_destination(&mut self, id: DestinationId) -> Result<(), NavigationError> {
        delegate!(self, group => group.update_current_destination(id))
    }
}

impl<R: Routing> From<StackGroup> for Group<R> {
    fn from(stack: StackGroup) -> Self {
        Group::Stack(stack)
    }
}

impl<R: Routing> From<TabGroup<R>> for Group<R> {
    fn from(tabs: TabGroup<R>) -> Self {
        Group::Tabs(tabs)
    }
}

impl<R: Routing> From<ColumnGroup> for Group<R> {
    fn from(columns: ColumnGroup) -> Self {
        Group::Columns(columns)
    }
}
