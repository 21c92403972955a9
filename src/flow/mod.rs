//! The top-level coordinator.
//!
//! A `Flow` owns every destination through its `Registry`, tracks which ones
//! are active and which one is current, and turns `PresentationConfiguration`s
//! into graph changes.
//!
//! Each request goes through the same steps:
//!
//! 1. the matching `Provider` builds the new destination, which is registered
//!    but left detached;
//! 2. the request is planned against the live graph, which either fails
//!    (nothing changes) or yields a `Plan`;
//! 3. the `PresentationAdapter` performs the transition;
//! 4. once the transition completes (immediately or through
//!    `activate_completion_closure`) the plan is applied, the new destinations
//!    become active and the completion closure fires.
//!
//! A failed completion removes whatever was built, so a request either lands
//! completely or not at all.

mod builder;
mod dispatch;
mod path;
mod registry;

pub use builder::FlowBuilder;
pub use registry::Registry;

use crate::adapter::{PresentationAdapter, Transition, TransitionOutcome};
use crate::config::FlowOptions;
use crate::destination::{Destination, InterfaceOutcome, SystemNavigationOptions};
use crate::error::NavigationError;
use crate::group::{Group, GroupCoordinator, GroupKind};
use crate::logging::{LogCategory, NavigationLogger};
use crate::presentation::{PresentationConfiguration, PresentationType, SystemNavigationType};
use crate::provider::Provider;
use crate::routing::{DestinationId, PresentationId, Routing};
use ahash::AHashMap;
use dispatch::{Focus, PendingPresentation};
use itertools::Itertools;
use path::PathQueue;
use std::sync::Arc;
use tokio::sync::oneshot;

pub struct Flow<R: Routing> {
    registry: Registry<R>,
    active: Vec<DestinationId>,
    current: Option<DestinationId>,
    root: Option<DestinationId>,
    providers: AHashMap<R::DestinationType, Arc<dyn Provider<R>>>,
    fallback_provider: Option<Arc<dyn Provider<R>>>,
    adapter: Box<dyn PresentationAdapter<R>>,
    options: FlowOptions,
    logger: NavigationLogger,
    starting: Option<PresentationConfiguration<R>>,
    pending: AHashMap<PresentationId, PendingPresentation<R>>,
    signals: AHashMap<PresentationId, oneshot::Sender<bool>>,
    path: PathQueue<R>,
    pumping: bool,
    sequence: u64,
}

impl<R: Routing> Flow<R> {
    pub fn builder() -> FlowBuilder<R> {
        FlowBuilder::new()
    }

    /// Presents the starting destination or path the flow was built with.
    ///
    /// `None` means there is nothing to show, usually because no provider
    /// matched the starting type.
    pub fn start(&mut self) -> Option<DestinationId> {
        let Some(starting) = self.starting.clone() else {
            self.logger
                .debug(LogCategory::Flow, "start called without a starting presentation");
            return None;
        };
        self.logger
            .debug(LogCategory::Flow, format!("starting with {}", starting.kind()));
        self.present_destination(starting)
    }

    /// Dispatches a single presentation request.
    ///
    /// Returns the destination the request put (or will put) in front: the
    /// newly built one, or the one a removal reveals. Requests that arrive
    /// while a path is running are held behind it and return `None`.
    pub fn present_destination(&mut self, configuration: PresentationConfiguration<R>) -> Option<DestinationId> {
        if let PresentationType::PresentPath(steps) = &configuration.presentation_type {
            let steps = steps.clone();
            let accepted = !steps.is_empty();
            let first = self.present_destination_path(steps);
            configuration.complete(accepted);
            return first;
        }
        let configuration = self.unique(configuration);
        if self.path.is_active() && self.options.serialize_requests_during_path {
            self.logger.debug(
                LogCategory::Path,
                format!("holding {} [{}] behind the running path", configuration.kind(), configuration.id),
            );
            self.path.hold(configuration);
            return None;
        }
        self.dispatch(configuration)
    }

    /// Queues `steps` and presents them one at a time, in order.
    ///
    /// Each step is dispatched only after the previous one finalized. When a
    /// path is already running the steps are appended to it.
    pub fn present_destination_path(&mut self, steps: Vec<PresentationConfiguration<R>>) -> Option<DestinationId> {
        if steps.is_empty() {
            self.logger
                .error(LogCategory::Path, "present path", &NavigationError::EmptyPath);
            return None;
        }
        let was_active = self.path.is_active();
        let steps: Vec<_> = steps.into_iter().map(|step| self.unique(step)).collect();
        self.logger
            .debug(LogCategory::Path, format!("queued {} path steps", steps.len()));
        self.path.extend(steps);
        if was_active {
            return None;
        }
        self.pump()
    }

    /// Removes `id` and everything beneath it. Returns `false` if it was already gone.
    ///
    /// Removing the current destination leaves the flow without one; nothing
    /// is promoted in its place.
    pub fn remove_destination(&mut self, id: DestinationId) -> bool {
        if !self.registry.contains(id) {
            self.logger
                .trace(LogCategory::Flow, format!("{} already removed", id));
            return false;
        }
        let mut doomed = self.registry.descendants(id);
        doomed.push(id);
        self.registry.detach(id);
        for removed in &doomed {
            self.active.retain(|active| active != removed);
            if self.current == Some(*removed) {
                self.current = None;
            }
            if self.root == Some(*removed) {
                self.root = None;
            }
            self.registry.remove(*removed);
        }
        self.logger.debug(
            LogCategory::Flow,
            format!("removed {} with {} descendants", id, doomed.len() - 1),
        );
        true
    }

    /// Marks a registered destination active. A no-op when it already is.
    pub fn update_active_destinations(&mut self, id: DestinationId) -> bool {
        if self.active.contains(&id) {
            return false;
        }
        let Some(destination) = self.registry.get(id) else {
            self.logger.error(
                LogCategory::Flow,
                "activate",
                &NavigationError::DestinationNotFound(id),
            );
            return false;
        };
        if let Some(parent) = destination.parent_id() {
            if !self.active.contains(&parent) {
                self.logger.error(
                    LogCategory::Flow,
                    format!("activate {}", id),
                    &NavigationError::DestinationNotFound(parent),
                );
                return false;
            }
        }
        self.active.push(id);
        true
    }

    /// Finalizes a deferred presentation. Returns `false` when nothing was waiting on it.
    ///
    /// Each presentation finalizes at most once; later calls for the same id
    /// are ignored. A call whose `is_system_navigation` disagrees with the
    /// pending request is rejected and leaves it pending.
    pub fn activate_completion_closure(
        &mut self,
        destination_id: DestinationId,
        presentation_id: PresentationId,
        success: bool,
        is_system_navigation: bool,
    ) -> bool {
        let Some(pending) = self.pending.get(&presentation_id) else {
            self.logger.trace(
                LogCategory::Flow,
                format!("no pending presentation {}", presentation_id),
            );
            return false;
        };
        if !pending.plan.involves(destination_id) && pending.built != Some(destination_id) {
            self.logger.error(
                LogCategory::Flow,
                format!("completing {}", presentation_id),
                &NavigationError::ChildDestinationNotFound(destination_id),
            );
            return false;
        }
        let expected = pending.configuration.action_type.is_system_navigation();
        if expected != is_system_navigation {
            self.logger.error(
                LogCategory::Flow,
                format!("completing {}", presentation_id),
                &NavigationError::IncompatibleType {
                    operation: "activate completion".to_string(),
                    expected: if expected { "a system navigation" } else { "a presentation" }.to_string(),
                },
            );
            return false;
        }
        self.finalize(presentation_id, success);
        true
    }

    /// Resolves once presentation `id` finalizes.
    ///
    /// Ask for the signal before dispatching, or while the presentation is
    /// still pending; a signal requested after finalization never resolves.
    /// Signals whose receiver was dropped are pruned on the next request.
    pub fn transition_signal(&mut self, id: PresentationId) -> oneshot::Receiver<bool> {
        self.signals.retain(|_, sender| !sender.is_closed());
        let (sender, receiver) = oneshot::channel();
        self.signals.insert(id, sender);
        receiver
    }

    /// Runs the binding for `interaction` on destination `id` and presents what it produced.
    pub fn perform_interface_action(
        &mut self,
        id: DestinationId,
        interaction: &R::InteractionType,
        content: Option<R::ContentType>,
    ) -> Result<Option<DestinationId>, NavigationError> {
        let logger = self.logger.clone();
        let outcome = self
            .registry
            .require_mut(id)?
            .perform_interface_action(interaction, content)
            .inspect_err(|error| {
                logger.error(LogCategory::Destination, format!("interaction {:?}", interaction), error)
            })?;
        match outcome {
            InterfaceOutcome::Present(configuration) => Ok(self.present_destination(configuration)),
            InterfaceOutcome::Handled => Ok(None),
        }
    }

    /// Fires the system event `navigation_type` on destination `id`.
    ///
    /// Returns the id of the dispatched presentation; hosts pass it back to
    /// `activate_completion_closure` when the platform transition ends.
    pub fn perform_system_navigation(
        &mut self,
        id: DestinationId,
        navigation_type: SystemNavigationType,
        options: SystemNavigationOptions,
    ) -> Result<PresentationId, NavigationError> {
        let configuration = self
            .registry
            .require_mut(id)?
            .perform_system_navigation_action(navigation_type, options)?;
        let presentation_id = configuration.id;
        self.present_destination(configuration);
        Ok(presentation_id)
    }

    /// Moves focus to an active destination, selecting the tabs and columns on its way up.
    pub fn set_current_destination(&mut self, id: DestinationId) -> Result<(), NavigationError> {
        if !self.is_active(id) {
            return Err(NavigationError::DestinationNotFound(id));
        }
        self.current = Some(id);
        let chain = self.registry.ancestors(id);
        for pair in chain.windows(2) {
            let (child, parent) = (pair[0], pair[1]);
            let result = match self.registry.group_mut(parent) {
                Some(Group::Tabs(tabs)) if tabs.tab_for_child(child).is_some() => {
                    tabs.update_current_destination(child)
                }
                Some(Group::Columns(columns)) if columns.column_for_child(child).is_some() => {
                    columns.update_current_destination(child)
                }
                _ => Ok(()),
            };
            if let Err(error) = result {
                self.logger
                    .error(LogCategory::Group, format!("revealing {}", id), &error);
            }
        }
        self.logger
            .trace(LogCategory::Flow, format!("current is now {}", id));
        Ok(())
    }

    pub fn current_destination(&self) -> Option<&Destination<R>> {
        self.current.and_then(|id| self.registry.get(id))
    }

    pub fn current_destination_id(&self) -> Option<DestinationId> {
        self.current
    }

    pub fn root_destination(&self) -> Option<&Destination<R>> {
        self.root.and_then(|id| self.registry.get(id))
    }

    pub fn root_destination_id(&self) -> Option<DestinationId> {
        self.root
    }

    /// Active destinations in activation order.
    pub fn active_destinations(&self) -> &[DestinationId] {
        &self.active
    }

    pub fn is_active(&self, id: DestinationId) -> bool {
        self.active.contains(&id)
    }

    pub fn destination(&self, id: DestinationId) -> Option<&Destination<R>> {
        self.registry.get(id)
    }

    pub fn destination_mut(&mut self, id: DestinationId) -> Option<&mut Destination<R>> {
        self.registry.get_mut(id)
    }

    /// The deepest live destination inside `tab`, resolved through nested groups.
    pub fn current_destination_for_tab(&self, tab: &R::TabType) -> Option<DestinationId> {
        let from_focus = [self.current, self.root]
            .into_iter()
            .flatten()
            .find_map(|id| self.registry.nearest_group(id, GroupKind::Tabs));
        let tabs = from_focus
            .into_iter()
            .chain(
                self.registry
                    .iter()
                    .filter(|destination| self.is_active(destination.id()))
                    .filter(|destination| destination.group().is_some_and(|g| g.kind() == GroupKind::Tabs))
                    .map(|destination| destination.id()),
            )
            .find(|id| {
                self.registry
                    .group(*id)
                    .and_then(|group| group.as_tabs())
                    .is_some_and(|group| group.has_tab(tab))
            })?;
        let root = self
            .registry
            .group(tabs)
            .and_then(|group| group.as_tabs())
            .and_then(|group| group.root_for(tab).ok().flatten())?;
        Some(self.registry.deepest_current(root))
    }

    pub fn registry(&self) -> &Registry<R> {
        &self.registry
    }

    /// Ids of presentations waiting for a completion, oldest first.
    pub fn pending_presentations(&self) -> Vec<PresentationId> {
        self.pending
            .iter()
            .sorted_by_key(|(_, pending)| pending.sequence)
            .map(|(id, _)| *id)
            .collect()
    }

    /// The transition a pending presentation handed to the adapter.
    pub fn pending_transition(&self, id: PresentationId) -> Option<Transition<R>> {
        self.pending
            .get(&id)
            .map(|pending| pending.plan.transition(&pending.configuration))
    }

    pub fn is_pending(&self, id: PresentationId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Transition signals still waiting for their presentation to finalize.
    pub fn waiting_signals(&self) -> usize {
        self.signals.len()
    }

    pub fn is_path_active(&self) -> bool {
        self.path.is_active()
    }

    /// Path steps not yet dispatched.
    pub fn queued_path_steps(&self) -> usize {
        self.path.remaining()
    }

    /// Requests held until the running path drains.
    pub fn held_requests(&self) -> usize {
        self.path.held()
    }

    pub fn options(&self) -> &FlowOptions {
        &self.options
    }

    pub fn logger(&self) -> &NavigationLogger {
        &self.logger
    }

    // A configuration reused while its first dispatch is still pending gets a fresh id.
    fn unique(&self, configuration: PresentationConfiguration<R>) -> PresentationConfiguration<R> {
        if self.pending.contains_key(&configuration.id) || self.path.in_flight() == Some(configuration.id) {
            self.logger.trace(
                LogCategory::Flow,
                format!("presentation {} is already in flight, forking", configuration.id),
            );
            configuration.fork()
        } else {
            configuration
        }
    }

    fn dispatch(&mut self, configuration: PresentationConfiguration<R>) -> Option<DestinationId> {
        let kind = configuration.kind();
        self.logger.debug(
            LogCategory::Flow,
            format!("dispatch {} [{}]", kind, configuration.id),
        );

        let built = match self.build(&configuration) {
            Ok(built) => built,
            Err(error) => {
                self.logger
                    .error(LogCategory::Flow, format!("building for {}", kind), &error);
                self.conclude(&configuration, None, false);
                return None;
            }
        };
        let plan = match self.plan(&configuration, built) {
            Ok(plan) => plan,
            Err(error) => {
                self.logger
                    .error(LogCategory::Flow, format!("planning {}", kind), &error);
                self.conclude(&configuration, built, false);
                return None;
            }
        };

        let transition = plan.transition(&configuration);
        let result = built.or(plan.target);
        let id = configuration.id;
        let delayed = configuration.should_delay_completion_activation
            || (configuration.action_type.is_system_navigation() && self.options.delay_system_navigation);
        self.sequence += 1;
        self.pending.insert(
            id,
            PendingPresentation {
                configuration,
                plan,
                built,
                sequence: self.sequence,
            },
        );

        match self.adapter.perform_transition(&transition) {
            TransitionOutcome::Finished(false) => self.finalize(id, false),
            TransitionOutcome::Finished(true) if !delayed => self.finalize(id, true),
            _ => self
                .logger
                .trace(LogCategory::Flow, format!("{} [{}] awaits completion", kind, id)),
        }
        result.filter(|id| self.registry.contains(*id))
    }

    /// Builds and registers the destination a request names, if it names one.
    fn build(&mut self, configuration: &PresentationConfiguration<R>) -> Result<Option<DestinationId>, NavigationError> {
        if configuration.kind().is_removal() {
            return Ok(None);
        }
        let Some(destination_type) = &configuration.destination_type else {
            return Ok(None);
        };
        let provider = self
            .providers
            .get(destination_type)
            .or(self.fallback_provider.as_ref())
            .cloned()
            .ok_or_else(|| NavigationError::MissingProvider(format!("{:?}", destination_type)))?;
        let destination = provider.build_destination(configuration, &self.logger)?;
        Ok(Some(self.register(destination, configuration.id)))
    }

    /// Registers a built destination and the children it carries, detached from the graph.
    fn register(&mut self, mut destination: Destination<R>, presentation_id: PresentationId) -> DestinationId {
        let id = destination.id();
        let children = destination.take_pending_children();
        destination.set_presentation_id(presentation_id);
        for navigation_type in [SystemNavigationType::NavigateBackInStack, SystemNavigationType::DismissSheet] {
            if !destination.has_system_navigation_action(navigation_type) {
                destination.bind_system_navigation(
                    navigation_type,
                    PresentationConfiguration::system_navigation(navigation_type, id),
                );
            }
        }
        self.registry.insert(destination);
        self.logger.trace(LogCategory::Flow, format!("registered {}", id));

        for (slot, child) in children {
            let child_id = self.register(child, presentation_id);
            if let Some(child) = self.registry.get_mut(child_id) {
                child.set_parent(Some(id));
            }
            let attached = match self.registry.get_mut(id) {
                Some(parent) => parent.attach_child(&slot, child_id),
                None => Err(NavigationError::DestinationNotFound(id)),
            };
            if let Err(error) = attached {
                self.logger
                    .error(LogCategory::Group, format!("attaching {} to {}", child_id, id), &error);
                self.remove_destination(child_id);
            }
        }
        id
    }

    fn finalize(&mut self, id: PresentationId, success: bool) {
        let Some(PendingPresentation {
            configuration,
            plan,
            built,
            ..
        }) = self.pending.remove(&id)
        else {
            return;
        };
        let mut success = success;
        if success {
            match self.apply(&plan, built, id) {
                Ok(requested_focus) => {
                    self.activate_built(built);
                    self.focus(requested_focus.map_or(plan.focus, Focus::DeepestOf));
                    self.logger.debug(
                        LogCategory::Flow,
                        format!("{} [{}] applied", configuration.kind(), id),
                    );
                }
                Err(error) => {
                    self.logger
                        .error(LogCategory::Flow, format!("applying {}", configuration.kind()), &error);
                    success = false;
                }
            }
        } else {
            self.logger.debug(
                LogCategory::Flow,
                format!("{} [{}] was rejected", configuration.kind(), id),
            );
        }
        self.conclude(&configuration, built, success);
    }

    /// Activates a built destination and its subtree once it is attached.
    fn activate_built(&mut self, built: Option<DestinationId>) {
        let Some(new) = built.filter(|id| self.registry.contains(*id)) else {
            return;
        };
        let attached = self.root == Some(new)
            || self
                .registry
                .parent_of(new)
                .is_some_and(|parent| self.is_active(parent));
        if !attached {
            self.logger
                .debug(LogCategory::Flow, format!("{} was left detached, discarding", new));
            self.remove_destination(new);
            return;
        }
        for id in self.registry.subtree(new) {
            self.update_active_destinations(id);
        }
    }

    fn focus(&mut self, focus: Focus) {
        let Focus::DeepestOf(id) = focus else {
            return;
        };
        let target = self.registry.deepest_current(id);
        if let Err(error) = self.set_current_destination(target) {
            self.logger.error(LogCategory::Flow, "focus", &error);
        }
    }

    /// Everything that happens after a request finished, whichever way it went.
    fn conclude(
        &mut self,
        configuration: &PresentationConfiguration<R>,
        built: Option<DestinationId>,
        success: bool,
    ) {
        if !success {
            if let Some(built) = built {
                self.remove_destination(built);
            }
        }
        if configuration.action_type.is_system_navigation() {
            if let Some(source) = configuration
                .current_destination_id
                .and_then(|id| self.registry.get_mut(id))
            {
                source.set_system_navigating(false);
            }
        }
        configuration.complete(success);
        if let Some(signal) = self.signals.remove(&configuration.id) {
            let _ = signal.send(success);
        }
        if self.path.settle(configuration.id) && !success {
            if self.options.abort_path_on_failure {
                let dropped = self.path.abort();
                self.logger.debug(
                    LogCategory::Path,
                    format!("step [{}] failed, dropped {} remaining steps", configuration.id, dropped),
                );
            } else {
                self.logger.debug(
                    LogCategory::Path,
                    format!("step [{}] failed, skipping it", configuration.id),
                );
            }
        }
        self.pump();
    }

    /// Dispatches queued path steps, then held requests, until something has to wait.
    fn pump(&mut self) -> Option<DestinationId> {
        if self.pumping {
            return None;
        }
        self.pumping = true;
        let mut first = None;
        loop {
            if let Some(step) = self.path.next_step() {
                self.logger.debug(
                    LogCategory::Path,
                    format!("path step {} ({} left)", step.kind(), self.path.remaining()),
                );
                let result = self.dispatch(step);
                first = first.or(result);
                continue;
            }
            if let Some(held) = self.path.next_held() {
                self.present_destination(held);
                continue;
            }
            break;
        }
        self.pumping = false;
        first
    }
}
