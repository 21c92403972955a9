use super::Flow;
use crate::adapter::Transition;
use crate::error::NavigationError;
use crate::group::{Group, GroupCoordinator, GroupKind};
use crate::presentation::{
    CustomPresentation, CustomPresentationContext, PresentationConfiguration, PresentationType,
    SplitColumn,
};
use crate::routing::{DestinationId, PresentationId, Routing};

/// One structural change to the graph.
pub(crate) enum GraphMutation<R: Routing> {
    InstallRoot {
        new: DestinationId,
    },
    ReplaceRoot {
        old: DestinationId,
        new: DestinationId,
    },
    ReplaceInGroup {
        host: DestinationId,
        old: DestinationId,
        new: DestinationId,
    },
    ReplaceInPlace {
        parent: DestinationId,
        old: DestinationId,
        new: DestinationId,
    },
    AddChild {
        parent: DestinationId,
        new: DestinationId,
    },
    Push {
        stack: DestinationId,
        new: DestinationId,
    },
    Pop {
        stack: DestinationId,
        top: DestinationId,
    },
    SetTabRoot {
        tabs: DestinationId,
        tab: R::TabType,
        new: DestinationId,
    },
    SelectTab {
        tabs: DestinationId,
        tab: R::TabType,
    },
    PresentSheet {
        presenting: DestinationId,
        new: DestinationId,
    },
    DismissSheet {
        presenting: DestinationId,
        sheet: DestinationId,
    },
    SetColumnRoot {
        columns: DestinationId,
        column: SplitColumn,
        new: DestinationId,
        focus: bool,
    },
    Custom {
        handler: CustomPresentation<R>,
    },
}

/// Where the flow's current destination goes once a plan is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Keep,
    /// The deepest focused descendant of the given destination.
    DeepestOf(DestinationId),
}

/// The validated outcome of dispatching one configuration, applied on success.
pub(crate) struct Plan<R: Routing> {
    pub(crate) mutations: Vec<GraphMutation<R>>,
    pub(crate) focus: Focus,
    pub(crate) source: Option<DestinationId>,
    pub(crate) target: Option<DestinationId>,
    pub(crate) host: Option<DestinationId>,
}

impl<R: Routing> Plan<R> {
    fn new(mutation: GraphMutation<R>, focus: Focus) -> Self {
        Self {
            mutations: vec![mutation],
            focus,
            source: None,
            target: None,
            host: None,
        }
    }

    fn between(mut self, source: Option<DestinationId>, target: Option<DestinationId>, host: Option<DestinationId>) -> Self {
        self.source = source;
        self.target = target;
        self.host = host;
        self
    }

    pub(crate) fn involves(&self, id: DestinationId) -> bool {
        [self.source, self.target, self.host].contains(&Some(id))
    }

    pub(crate) fn transition(&self, configuration: &PresentationConfiguration<R>) -> Transition<R> {
        Transition {
            presentation_id: configuration.id,
            kind: configuration.kind(),
            action_type: configuration.action_type,
            source: self.source,
            target: self.target,
            host: self.host,
            destination_type: configuration.destination_type.clone(),
        }
    }
}

/// A dispatched request waiting for its completion.
pub(crate) struct PendingPresentation<R: Routing> {
    pub(crate) configuration: PresentationConfiguration<R>,
    pub(crate) plan: Plan<R>,
    pub(crate) built: Option<DestinationId>,
    /// Dispatch order, so pending requests can be listed oldest first.
    pub(crate) sequence: u64,
}

fn no_host(configuration: &PresentationConfiguration<impl Routing>) -> NavigationError {
    NavigationError::NoHostGroup {
        presentation: configuration.kind().to_string(),
    }
}

impl<R: Routing> Flow<R> {
    /// The destination a request is resolved from: its target or invoking
    /// destination when that is live, otherwise the flow's current, otherwise the root.
    fn resolve_anchor(&self, configuration: &PresentationConfiguration<R>) -> Option<DestinationId> {
        configuration
            .anchor()
            .filter(|id| self.is_active(*id))
            .or(self.current)
            .or(self.root)
    }

    pub(crate) fn plan(
        &self,
        configuration: &PresentationConfiguration<R>,
        built: Option<DestinationId>,
    ) -> Result<Plan<R>, NavigationError> {
        let requires_built = || {
            built.ok_or_else(|| NavigationError::IncompatibleType {
                operation: configuration.kind().to_string(),
                expected: "a configuration with a destination type".to_string(),
            })
        };
        let focus_on = |id: DestinationId| {
            if configuration.should_set_as_current {
                Focus::DeepestOf(id)
            } else {
                Focus::Keep
            }
        };

        let Some(anchor) = self.resolve_anchor(configuration) else {
            // Empty graph: whatever gets built first becomes the root.
            return match built {
                Some(new) => Ok(Plan::new(GraphMutation::InstallRoot { new }, Focus::DeepestOf(new))
                    .between(None, Some(new), None)),
                None => Err(no_host(configuration)),
            };
        };

        let plan = match &configuration.presentation_type {
            PresentationType::ReplaceCurrent => {
                let new = requires_built()?;
                let parent = self.registry.parent_of(anchor);
                let grouped = parent.is_some_and(|host| {
                    self.registry
                        .group(host)
                        .is_some_and(|group| group.children().contains(&anchor))
                });
                let mutation = match parent {
                    None => GraphMutation::ReplaceRoot { old: anchor, new },
                    Some(host) if grouped => GraphMutation::ReplaceInGroup {
                        host,
                        old: anchor,
                        new,
                    },
                    // A sheet hangs off its presenter, not off the presenter's group.
                    Some(parent) => GraphMutation::ReplaceInPlace {
                        parent,
                        old: anchor,
                        new,
                    },
                };
                Plan::new(mutation, focus_on(new)).between(Some(anchor), Some(new), parent)
            }
            PresentationType::AddToCurrent => {
                let new = requires_built()?;
                let mutation = match self.registry.group(anchor) {
                    Some(Group::Stack(_)) => GraphMutation::Push { stack: anchor, new },
                    Some(Group::Tabs(tabs)) => self.plan_in_tab(anchor, tabs.selected_tab().clone(), new)?,
                    Some(Group::Columns(columns)) => {
                        let column = columns
                            .columns()
                            .iter()
                            .copied()
                            .find(|column| matches!(columns.root_for(*column), Ok(None)))
                            .or_else(|| columns.columns().last().copied())
                            .ok_or_else(|| no_host(configuration))?;
                        self.plan_in_column(anchor, column, new, configuration.should_set_as_current)?
                    }
                    None => GraphMutation::AddChild { parent: anchor, new },
                };
                Plan::new(mutation, focus_on(new)).between(Some(anchor), Some(new), Some(anchor))
            }
            PresentationType::PushInStack => {
                let new = requires_built()?;
                let stack = self
                    .registry
                    .nearest_group(anchor, GroupKind::Stack)
                    .ok_or_else(|| no_host(configuration))?;
                Plan::new(GraphMutation::Push { stack, new }, focus_on(new)).between(
                    Some(anchor),
                    Some(new),
                    Some(stack),
                )
            }
            PresentationType::PopInStack => {
                let stack = self
                    .registry
                    .nearest_group(anchor, GroupKind::Stack)
                    .ok_or_else(|| no_host(configuration))?;
                let group = self
                    .registry
                    .group(stack)
                    .and_then(|group| group.as_stack())
                    .ok_or_else(|| no_host(configuration))?;
                let top = match group.top() {
                    Some(top) if group.len() >= 2 => top,
                    _ => return Err(NavigationError::NothingToPop(stack)),
                };
                Plan::new(GraphMutation::Pop { stack, top }, focus_on(stack)).between(
                    Some(top),
                    group.previous(),
                    Some(stack),
                )
            }
            PresentationType::SelectTab(tab) => match built {
                Some(new) => self.plan_present_tab(configuration, anchor, tab, new, true)?,
                None => {
                    let tabs = self.tab_host(configuration, anchor, tab)?;
                    let root = self
                        .registry
                        .group(tabs)
                        .and_then(|group| group.as_tabs())
                        .and_then(|group| group.root_for(tab).ok().flatten());
                    Plan::new(
                        GraphMutation::SelectTab {
                            tabs,
                            tab: tab.clone(),
                        },
                        Focus::DeepestOf(tabs),
                    )
                    .between(Some(anchor), root, Some(tabs))
                }
            },
            PresentationType::PresentTab(tab) => {
                let new = requires_built()?;
                self.plan_present_tab(configuration, anchor, tab, new, false)?
            }
            PresentationType::PresentSheet => {
                let new = requires_built()?;
                Plan::new(
                    GraphMutation::PresentSheet {
                        presenting: anchor,
                        new,
                    },
                    focus_on(new),
                )
                .between(Some(anchor), Some(new), Some(anchor))
            }
            PresentationType::DismissSheet => {
                let sheet = self
                    .registry
                    .ancestors(anchor)
                    .into_iter()
                    .find(|id| self.registry.sheet_presenter(*id).is_some())
                    .or_else(|| self.registry.get(anchor).and_then(|d| d.presented_sheet()))
                    .ok_or(NavigationError::ChildDestinationNotFound(anchor))?;
                let presenting = self
                    .registry
                    .sheet_presenter(sheet)
                    .ok_or(NavigationError::ChildDestinationNotFound(sheet))?;
                Plan::new(GraphMutation::DismissSheet { presenting, sheet }, focus_on(presenting)).between(
                    Some(sheet),
                    Some(presenting),
                    Some(presenting),
                )
            }
            PresentationType::PresentInColumn(column) => {
                let new = requires_built()?;
                let columns = self
                    .registry
                    .nearest_group(anchor, GroupKind::Columns)
                    .ok_or_else(|| no_host(configuration))?;
                let mutation = self.plan_in_column(columns, *column, new, configuration.should_set_as_current)?;
                Plan::new(mutation, focus_on(new)).between(Some(anchor), Some(new), Some(columns))
            }
            PresentationType::PresentPath(_) => {
                return Err(NavigationError::IncompatibleType {
                    operation: "plan present-path".to_string(),
                    expected: "a single-step presentation".to_string(),
                });
            }
            PresentationType::Custom(handler) => Plan::new(
                GraphMutation::Custom {
                    handler: handler.clone(),
                },
                Focus::Keep,
            )
            .between(Some(anchor), built, None),
        };
        Ok(plan)
    }

    fn tab_host(
        &self,
        configuration: &PresentationConfiguration<R>,
        anchor: DestinationId,
        tab: &R::TabType,
    ) -> Result<DestinationId, NavigationError> {
        let tabs = self
            .registry
            .nearest_group(anchor, GroupKind::Tabs)
            .ok_or_else(|| no_host(configuration))?;
        let known = self
            .registry
            .group(tabs)
            .and_then(|group| group.as_tabs())
            .is_some_and(|group| group.has_tab(tab));
        if !known {
            return Err(NavigationError::TabNotFound(format!("{:?}", tab)));
        }
        Ok(tabs)
    }

    fn plan_present_tab(
        &self,
        configuration: &PresentationConfiguration<R>,
        anchor: DestinationId,
        tab: &R::TabType,
        new: DestinationId,
        force_selection: bool,
    ) -> Result<Plan<R>, NavigationError> {
        let tabs = self.tab_host(configuration, anchor, tab)?;
        let select = force_selection || configuration.should_set_as_current;
        let mut plan = Plan::new(
            self.plan_in_tab(tabs, tab.clone(), new)?,
            if select { Focus::DeepestOf(tabs) } else { Focus::Keep },
        );
        if select {
            plan.mutations.push(GraphMutation::SelectTab {
                tabs,
                tab: tab.clone(),
            });
        }
        Ok(plan.between(Some(anchor), Some(new), Some(tabs)))
    }

    /// Pushes onto the tab's stack when its root is one, otherwise replaces the root.
    fn plan_in_tab(
        &self,
        tabs: DestinationId,
        tab: R::TabType,
        new: DestinationId,
    ) -> Result<GraphMutation<R>, NavigationError> {
        let root = self
            .registry
            .group(tabs)
            .and_then(|group| group.as_tabs())
            .ok_or(NavigationError::DestinationNotFound(tabs))?
            .root_for(&tab)?;
        Ok(match root {
            Some(stack) if self.registry.kind_of(stack) == Some(GroupKind::Stack) => {
                GraphMutation::Push { stack, new }
            }
            _ => GraphMutation::SetTabRoot { tabs, tab, new },
        })
    }

    /// Pushes onto the column's stack when its root is one, otherwise replaces the root.
    fn plan_in_column(
        &self,
        columns: DestinationId,
        column: SplitColumn,
        new: DestinationId,
        focus: bool,
    ) -> Result<GraphMutation<R>, NavigationError> {
        let root = self
            .registry
            .group(columns)
            .and_then(|group| group.as_columns())
            .ok_or(NavigationError::DestinationNotFound(columns))?
            .root_for(column)?;
        Ok(match root {
            Some(stack) if self.registry.kind_of(stack) == Some(GroupKind::Stack) => {
                GraphMutation::Push { stack, new }
            }
            _ => GraphMutation::SetColumnRoot {
                columns,
                column,
                new,
                focus,
            },
        })
    }

    /// Applies a plan's mutations in order. Returns the focus a custom handler asked for.
    pub(crate) fn apply(
        &mut self,
        plan: &Plan<R>,
        built: Option<DestinationId>,
        presentation_id: PresentationId,
    ) -> Result<Option<DestinationId>, NavigationError> {
        let mut requested_focus = None;
        for mutation in &plan.mutations {
            if let Some(focus) = self.apply_mutation(mutation, built, presentation_id)? {
                requested_focus = Some(focus);
            }
        }
        Ok(requested_focus)
    }

    fn apply_mutation(
        &mut self,
        mutation: &GraphMutation<R>,
        built: Option<DestinationId>,
        presentation_id: PresentationId,
    ) -> Result<Option<DestinationId>, NavigationError> {
        match mutation {
            GraphMutation::InstallRoot { new } => {
                if self.root.is_some() {
                    return Err(NavigationError::IncompatibleType {
                        operation: "install root".to_string(),
                        expected: "a flow without a root".to_string(),
                    });
                }
                self.registry.set_parent(*new, None)?;
                self.root = Some(*new);
            }
            GraphMutation::ReplaceRoot { old, new } => {
                if self.root != Some(*old) {
                    return Err(NavigationError::DestinationNotFound(*old));
                }
                self.registry.set_parent(*new, None)?;
                self.remove_destination(*old);
                self.root = Some(*new);
            }
            GraphMutation::ReplaceInGroup { host, old, new } => {
                self.registry.require(*new)?;
                let displaced = self
                    .registry
                    .group_mut(*host)
                    .ok_or(NavigationError::DestinationNotFound(*host))?
                    .replace_child(*old, *new)?;
                self.registry.set_parent(*new, Some(*host))?;
                for id in displaced {
                    self.remove_destination(id);
                }
            }
            GraphMutation::ReplaceInPlace { parent, old, new } => {
                if self.registry.parent_of(*old) != Some(*parent) {
                    return Err(NavigationError::ChildDestinationNotFound(*old));
                }
                let was_sheet = self.registry.sheet_presenter(*old).is_some();
                self.registry.set_parent(*new, Some(*parent))?;
                self.remove_destination(*old);
                if was_sheet {
                    self.registry.require_mut(*parent)?.set_presented_sheet(Some(*new));
                }
            }
            GraphMutation::AddChild { parent, new } => {
                self.registry.require(*parent)?;
                self.registry.set_parent(*new, Some(*parent))?;
            }
            GraphMutation::Push { stack, new } => {
                self.registry.require(*new)?;
                self.registry
                    .group_mut(*stack)
                    .and_then(|group| group.as_stack_mut())
                    .ok_or(NavigationError::DestinationNotFound(*stack))?
                    .add_child(*new, true)?;
                self.registry.set_parent(*new, Some(*stack))?;
            }
            GraphMutation::Pop { stack, top } => {
                let group = self
                    .registry
                    .group_mut(*stack)
                    .and_then(|group| group.as_stack_mut())
                    .ok_or(NavigationError::DestinationNotFound(*stack))?;
                if group.top() != Some(*top) {
                    return Err(NavigationError::ChildDestinationNotFound(*top));
                }
                group
                    .pop(presentation_id)
                    .ok_or(NavigationError::NothingToPop(*stack))?;
                self.remove_destination(*top);
            }
            GraphMutation::SetTabRoot { tabs, tab, new } => {
                self.registry.require(*new)?;
                let displaced = self
                    .registry
                    .group_mut(*tabs)
                    .and_then(|group| group.as_tabs_mut())
                    .ok_or(NavigationError::DestinationNotFound(*tabs))?
                    .set_root(tab, *new)?;
                self.registry.set_parent(*new, Some(*tabs))?;
                if let Some(old) = displaced {
                    self.remove_destination(old);
                }
            }
            GraphMutation::SelectTab { tabs, tab } => {
                self.registry
                    .group_mut(*tabs)
                    .and_then(|group| group.as_tabs_mut())
                    .ok_or(NavigationError::DestinationNotFound(*tabs))?
                    .select_tab(tab)?;
            }
            GraphMutation::PresentSheet { presenting, new } => {
                self.registry.require(*new)?;
                if let Some(old) = self.registry.require(*presenting)?.presented_sheet() {
                    self.remove_destination(old);
                }
                self.registry.set_parent(*new, Some(*presenting))?;
                self.registry
                    .require_mut(*presenting)?
                    .set_presented_sheet(Some(*new));
            }
            GraphMutation::DismissSheet { presenting, sheet } => {
                if self.registry.require(*presenting)?.presented_sheet() != Some(*sheet) {
                    return Err(NavigationError::ChildDestinationNotFound(*sheet));
                }
                self.remove_destination(*sheet);
            }
            GraphMutation::SetColumnRoot {
                columns,
                column,
                new,
                focus,
            } => {
                self.registry.require(*new)?;
                let displaced = self
                    .registry
                    .group_mut(*columns)
                    .and_then(|group| group.as_columns_mut())
                    .ok_or(NavigationError::DestinationNotFound(*columns))?
                    .set_root(*column, *new, *focus)?;
                self.registry.set_parent(*new, Some(*columns))?;
                if let Some(old) = displaced {
                    self.remove_destination(old);
                }
            }
            GraphMutation::Custom { handler } => {
                let mut context = CustomPresentationContext {
                    registry: &mut self.registry,
                    target: built,
                    current: self.current,
                    focus: None,
                };
                if !handler(&mut context)? {
                    return Err(NavigationError::CustomPresentationRejected);
                }
                return Ok(context.focus);
            }
        }
        Ok(None)
    }
}
