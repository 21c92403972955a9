use super::{GroupCoordinator, GroupState};
use crate::error::NavigationError;
use crate::presentation::SplitColumn;
use crate::routing::DestinationId;

/// A split view with sidebar, content and (optionally) detail columns.
#[derive(Debug, Clone)]
pub struct ColumnGroup {
    state: GroupState,
    columns: Vec<SplitColumn>,
    roots: [Option<DestinationId>; 3],
}

impl ColumnGroup {
    /// A two-column layout with sidebar and content.
    pub fn two_column() -> Self {
        Self::with_columns(vec![SplitColumn::Sidebar, SplitColumn::Content])
    }

    /// The full three-column layout.
    pub fn three_column() -> Self {
        Self::with_columns(SplitColumn::ALL.to_vec())
    }

    pub fn with_columns(mut columns: Vec<SplitColumn>) -> Self {
        columns.sort();
        columns.dedup();
        Self {
            state: GroupState::new(),
            columns,
            roots: [None; 3],
        }
    }

    pub fn columns(&self) -> &[SplitColumn] {
        &self.columns
    }

    pub fn root_for(&self, column: SplitColumn) -> Result<Option<DestinationId>, NavigationError> {
        self.check(column)?;
        Ok(self.roots[column as usize])
    }

    pub fn column_for_child(&self, id: DestinationId) -> Option<SplitColumn> {
        self.columns
            .iter()
            .copied()
            .find(|column| self.roots[*column as usize] == Some(id))
    }

    /// The column whose root currently has focus.
    pub fn focused_column(&self) -> Option<SplitColumn> {
        self.state
            .current_child()
            .and_then(|id| self.column_for_child(id))
    }

    /// Installs `id` as the root of `column`, returning the root it displaced.
    pub fn set_root(
        &mut self,
        column: SplitColumn,
        id: DestinationId,
        should_set_current: bool,
    ) -> Result<Option<DestinationId>, NavigationError> {
        self.check(column)?;
        let displaced = self.roots[column as usize].replace(id);
        let was_current = displaced.is_some() && self.state.current_child() == displaced;
        if let Some(old) = displaced {
            self.state.remove(old);
        }
        let position = self
            .columns
            .iter()
            .take_while(|c| **c != column)
            .filter(|c| self.roots[**c as usize].is_some())
            .count();
        self.state.insert(position, id);
        if should_set_current || was_current {
            self.state.set_current(id)?;
        }
        Ok(displaced)
    }

    pub fn focus_column(&mut self, column: SplitColumn) -> Result<(), NavigationError> {
        match self.root_for(column)? {
            Some(root) => self.state.set_current(root),
            None => Err(NavigationError::IncompatibleType {
                operation: format!("focus column {}", column),
                expected: "a column with a root destination".to_string(),
            }),
        }
    }

    fn check(&self, column: SplitColumn) -> Result<(), NavigationError> {
        if self.columns.contains(&column) {
            Ok(())
        } else {
            Err(NavigationError::IncompatibleType {
                operation: format!("present in column {}", column),
                expected: format!("one of {:?}", self.columns),
            })
        }
    }
}

impl GroupCoordinator for ColumnGroup {
    fn state(&self) -> &GroupState {
        &self.state
    }

    /// Fills the first visible column that has no root yet.
    fn add_child(&mut self, child: DestinationId, should_set_current: bool) -> Result<(), NavigationError> {
        let column = self
            .columns
            .iter()
            .copied()
            .find(|column| self.roots[*column as usize].is_none())
            .ok_or_else(|| NavigationError::IncompatibleType {
                operation: "add column child".to_string(),
                expected: "an empty column".to_string(),
            })?;
        self.set_root(column, child, should_set_current)?;
        Ok(())
    }

    fn remove_child(&mut self, id: DestinationId) -> Result<(), NavigationError> {
        if !self.state.remove(id) {
            return Err(NavigationError::ChildDestinationNotFound(id));
        }
        for root in self.roots.iter_mut().filter(|root| **root == Some(id)) {
            *root = None;
        }
        Ok(())
    }

    fn replace_child(
        &mut self,
        current: DestinationId,
        replacement: DestinationId,
    ) -> Result<Vec<DestinationId>, NavigationError> {
        let column = self
            .column_for_child(current)
            .ok_or(NavigationError::ChildDestinationNotFound(current))?;
        Ok(self.set_root(column, replacement, true)?.into_iter().collect())
    }

    fn update_current_destination(&mut self, id: DestinationId) -> Result<(), NavigationError> {
        self.state.set_current(id)
    }
}
