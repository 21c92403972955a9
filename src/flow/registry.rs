use crate::destination::Destination;
use crate::error::NavigationError;
use crate::group::{Group, GroupCoordinator, GroupKind};
use crate::routing::{DestinationId, Routing};
use ahash::AHashMap;

/// Every destination a flow knows about, attached or not, keyed by id.
///
/// Parent links are plain ids; the registry is the only place they are
/// resolved. Iteration follows registration order.
pub struct Registry<R: Routing> {
    destinations: AHashMap<DestinationId, Destination<R>>,
    order: Vec<DestinationId>,
}

impl<R: Routing> Default for Registry<R> {
    fn default() -> Self {
        Self {
            destinations: AHashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<R: Routing> Registry<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: DestinationId) -> bool {
        self.destinations.contains_key(&id)
    }

    pub fn get(&self, id: DestinationId) -> Option<&Destination<R>> {
        self.destinations.get(&id)
    }

    pub fn get_mut(&mut self, id: DestinationId) -> Option<&mut Destination<R>> {
        self.destinations.get_mut(&id)
    }

    pub fn ids(&self) -> &[DestinationId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination<R>> {
        self.order.iter().filter_map(|id| self.destinations.get(id))
    }

    pub(crate) fn insert(&mut self, destination: Destination<R>) -> DestinationId {
        let id = destination.id();
        if self.destinations.insert(id, destination).is_none() {
            self.order.push(id);
        }
        id
    }

    pub(crate) fn remove(&mut self, id: DestinationId) -> Option<Destination<R>> {
        let mut destination = self.destinations.remove(&id)?;
        self.order.retain(|other| *other != id);
        destination.clear_bindings();
        Some(destination)
    }

    pub fn require(&self, id: DestinationId) -> Result<&Destination<R>, NavigationError> {
        self.get(id).ok_or(NavigationError::DestinationNotFound(id))
    }

    pub fn require_mut(&mut self, id: DestinationId) -> Result<&mut Destination<R>, NavigationError> {
        self.get_mut(id).ok_or(NavigationError::DestinationNotFound(id))
    }

    pub fn group(&self, id: DestinationId) -> Option<&Group<R>> {
        self.get(id).and_then(|destination| destination.group())
    }

    pub fn group_mut(&mut self, id: DestinationId) -> Option<&mut Group<R>> {
        self.get_mut(id).and_then(|destination| destination.group_mut())
    }

    pub fn kind_of(&self, id: DestinationId) -> Option<GroupKind> {
        self.group(id).map(|group| group.kind())
    }

    pub fn parent_of(&self, id: DestinationId) -> Option<DestinationId> {
        self.get(id).and_then(|destination| destination.parent_id())
    }

    /// Direct children through parent links, in registration order.
    pub fn children_of(&self, id: DestinationId) -> Vec<DestinationId> {
        self.iter()
            .filter(|destination| destination.parent_id() == Some(id))
            .map(|destination| destination.id())
            .collect()
    }

    /// All descendants of `id`, deepest first. `id` itself is not included.
    pub fn descendants(&self, id: DestinationId) -> Vec<DestinationId> {
        let mut out = Vec::new();
        for child in self.children_of(id) {
            out.extend(self.descendants(child));
            out.push(child);
        }
        out
    }

    /// `id` followed by every descendant, parents before children.
    pub fn subtree(&self, id: DestinationId) -> Vec<DestinationId> {
        let mut out = vec![id];
        for child in self.children_of(id) {
            out.extend(self.subtree(child));
        }
        out
    }

    /// `id` and its ancestors, nearest first.
    pub fn ancestors(&self, id: DestinationId) -> Vec<DestinationId> {
        let mut out = Vec::new();
        let mut next = self.contains(id).then_some(id);
        while let Some(current) = next {
            if out.contains(&current) {
                break;
            }
            out.push(current);
            next = self.parent_of(current);
        }
        out
    }

    /// The group of `kind` nearest to `from`.
    ///
    /// Looks at `from` itself and the groups focused beneath it first, then
    /// walks up through its ancestors. The walk stops at a sheet: groups behind
    /// a presented sheet never host requests made from inside it.
    pub fn nearest_group(&self, from: DestinationId, kind: GroupKind) -> Option<DestinationId> {
        let mut below = Some(from);
        while let Some(id) = below {
            let Some(group) = self.group(id) else {
                break;
            };
            if group.kind() == kind {
                return Some(id);
            }
            below = group.current_child();
        }
        for id in self.ancestors(from) {
            if self.kind_of(id) == Some(kind) {
                return Some(id);
            }
            if self.sheet_presenter(id).is_some() {
                break;
            }
        }
        None
    }

    /// Follows presented sheets and focused group children down from `id`.
    pub fn deepest_current(&self, id: DestinationId) -> DestinationId {
        let mut deepest = id;
        let mut seen = vec![id];
        loop {
            let Some(destination) = self.get(deepest) else {
                return deepest;
            };
            let next = destination
                .presented_sheet()
                .filter(|sheet| self.contains(*sheet))
                .or_else(|| destination.group().and_then(|group| group.current_child()));
            match next {
                Some(next) if !seen.contains(&next) => {
                    seen.push(next);
                    deepest = next;
                }
                _ => return deepest,
            }
        }
    }

    /// The destination that presented `id` as a sheet, if it is one.
    pub fn sheet_presenter(&self, id: DestinationId) -> Option<DestinationId> {
        let parent = self.parent_of(id)?;
        (self.get(parent)?.presented_sheet() == Some(id)).then_some(parent)
    }

    pub fn set_parent(&mut self, child: DestinationId, parent: Option<DestinationId>) -> Result<(), NavigationError> {
        self.require_mut(child)?.set_parent(parent);
        Ok(())
    }

    /// Unhooks `id` from its parent's group and sheet slot. The parent link on `id` is left alone.
    pub(crate) fn detach(&mut self, id: DestinationId) {
        let Some(parent) = self.parent_of(id) else {
            return;
        };
        let Some(parent) = self.get_mut(parent) else {
            return;
        };
        if parent.presented_sheet() == Some(id) {
            parent.set_presented_sheet(None);
        }
        if let Some(group) = parent.group_mut() {
            if group.state().contains(id) {
                let _ = group.remove_child(id);
            }
        }
    }
}
