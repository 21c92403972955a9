use crate::error::NavigationError;
use crate::group::{ColumnGroup, Group, GroupCoordinator, StackGroup, TabGroup};
use crate::logging::{LogCategory, NavigationLogger};
use crate::presentation::{PresentationConfiguration, SplitColumn, SystemNavigationType};
use crate::routing::{DestinationId, PresentationId, Routing};
use ahash::AHashMap;
use std::fmt;
use std::sync::Arc;

mod assistant;
mod interactor;
mod interface;

pub use assistant::{DefaultActionAssistant, InteractorAssistant, InterfaceActionAssistant};
pub use interactor::{
    AsyncInteractorHandle, AsyncRequestHandler, Interactor, InteractorRegistry, RequestHandler,
};
pub use interface::{AssistantKind, InteractionClosure, InterfaceAction, InterfaceActionKind, InterfaceOutcome};

/// Where a child attached at build time goes inside its parent's group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildSlot<R: Routing> {
    /// Pushed onto the parent's stack.
    Stack,
    /// Installed as the root of a tab.
    Tab(R::TabType),
    /// Installed as the root of a column.
    Column(SplitColumn),
}

/// Extra inputs for `Destination::perform_system_navigation_action`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNavigationOptions {
    /// The destination the system event targets, when it is not the invoking one.
    pub target: Option<DestinationId>,
    /// Overrides whether the request waits for an explicit completion activation.
    pub delay_completion: Option<bool>,
}

/// A node in the navigation graph.
///
/// The parent is stored by id and resolved through the flow's registry; a
/// destination never owns a pointer back to its parent.
pub struct Destination<R: Routing> {
    id: DestinationId,
    destination_type: R::DestinationType,
    parent_id: Option<DestinationId>,
    content: Option<R::ContentType>,
    presentation_id: Option<PresentationId>,
    interface_actions: AHashMap<R::InteractionType, InterfaceAction<R>>,
    action_assistants: AHashMap<R::InteractionType, Arc<dyn InterfaceActionAssistant<R>>>,
    interactor_assistants: AHashMap<R::InteractionType, Arc<dyn InteractorAssistant<R>>>,
    system_navigation_actions: AHashMap<SystemNavigationType, PresentationConfiguration<R>>,
    interactors: InteractorRegistry<R>,
    group: Option<Group<R>>,
    presented_sheet: Option<DestinationId>,
    is_system_navigating: bool,
    pending_children: Vec<(ChildSlot<R>, Destination<R>)>,
    logger: NavigationLogger,
}

impl<R: Routing> Destination<R> {
    pub fn new(destination_type: R::DestinationType, logger: NavigationLogger) -> Self {
        Self {
            id: DestinationId::new(),
            destination_type,
            parent_id: None,
            content: None,
            presentation_id: None,
            interface_actions: AHashMap::new(),
            action_assistants: AHashMap::new(),
            interactor_assistants: AHashMap::new(),
            system_navigation_actions: AHashMap::new(),
            interactors: InteractorRegistry::new(),
            group: None,
            presented_sheet: None,
            is_system_navigating: false,
            pending_children: Vec::new(),
            logger,
        }
    }

    /// A destination that coordinates a navigation stack.
    pub fn stack(destination_type: R::DestinationType, logger: NavigationLogger) -> Self {
        Self::new(destination_type, logger).with_group(StackGroup::new())
    }

    /// A destination that coordinates a tab set.
    pub fn tabs(destination_type: R::DestinationType, tabs: TabGroup<R>, logger: NavigationLogger) -> Self {
        Self::new(destination_type, logger).with_group(tabs)
    }

    /// A destination that coordinates split columns.
    pub fn columns(destination_type: R::DestinationType, columns: ColumnGroup, logger: NavigationLogger) -> Self {
        Self::new(destination_type, logger).with_group(columns)
    }

    pub fn with_group(mut self, group: impl Into<Group<R>>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_content(mut self, content: Option<R::ContentType>) -> Self {
        self.content = content;
        self
    }

    /// Attaches a child that the flow registers together with this destination.
    pub fn with_child(mut self, slot: ChildSlot<R>, child: Destination<R>) -> Self {
        self.pending_children.push((slot, child));
        self
    }

    pub fn id(&self) -> DestinationId {
        self.id
    }

    pub fn destination_type(&self) -> &R::DestinationType {
        &self.destination_type
    }

    pub fn parent_id(&self) -> Option<DestinationId> {
        self.parent_id
    }

    pub fn content(&self) -> Option<&R::ContentType> {
        self.content.as_ref()
    }

    /// The request that produced this destination.
    pub fn presentation_id(&self) -> Option<PresentationId> {
        self.presentation_id
    }

    pub fn group(&self) -> Option<&Group<R>> {
        self.group.as_ref()
    }

    pub fn group_mut(&mut self) -> Option<&mut Group<R>> {
        self.group.as_mut()
    }

    pub fn is_group(&self) -> bool {
        self.group.is_some()
    }

    pub fn presented_sheet(&self) -> Option<DestinationId> {
        self.presented_sheet
    }

    /// True between a system navigation request and its completion.
    pub fn is_system_navigating(&self) -> bool {
        self.is_system_navigating
    }

    pub fn logger(&self) -> &NavigationLogger {
        &self.logger
    }

    pub fn interactors(&self) -> &InteractorRegistry<R> {
        &self.interactors
    }

    pub fn interface_action(&self, interaction: &R::InteractionType) -> Option<&InterfaceAction<R>> {
        self.interface_actions.get(interaction)
    }

    pub fn has_system_navigation_action(&self, navigation_type: SystemNavigationType) -> bool {
        self.system_navigation_actions.contains_key(&navigation_type)
    }

    pub(crate) fn set_parent(&mut self, parent: Option<DestinationId>) {
        self.parent_id = parent;
    }

    pub(crate) fn set_presentation_id(&mut self, id: PresentationId) {
        self.presentation_id = Some(id);
    }

    pub(crate) fn set_presented_sheet(&mut self, sheet: Option<DestinationId>) {
        self.presented_sheet = sheet;
    }

    pub(crate) fn set_system_navigating(&mut self, navigating: bool) {
        self.is_system_navigating = navigating;
    }

    pub(crate) fn take_pending_children(&mut self) -> Vec<(ChildSlot<R>, Destination<R>)> {
        std::mem::take(&mut self.pending_children)
    }

    /// Puts a freshly registered child into this destination's group.
    pub(crate) fn attach_child(&mut self, slot: &ChildSlot<R>, child: DestinationId) -> Result<(), NavigationError> {
        let group = self.group.as_mut().ok_or_else(|| NavigationError::IncompatibleType {
            operation: "attach child".to_string(),
            expected: "a group destination".to_string(),
        })?;
        match (slot, group) {
            (ChildSlot::Stack, Group::Stack(stack)) => stack.add_child(child, true),
            (ChildSlot::Tab(tab), Group::Tabs(tabs)) => tabs.set_root(tab, child).map(|_| ()),
            (ChildSlot::Column(column), Group::Columns(columns)) => {
                let focus = columns.state().current_child().is_none();
                columns.set_root(*column, child, focus).map(|_| ())
            }
            (slot, group) => Err(NavigationError::IncompatibleType {
                operation: format!("attach child to {:?}", slot),
                expected: format!("a slot of a {} group", group.kind()),
            }),
        }
    }

    /// Binds an action to an interaction. Bindings are write-once per destination.
    pub fn add_interface_action(&mut self, action: InterfaceAction<R>) -> Result<(), NavigationError> {
        if self.interface_actions.contains_key(action.interaction()) {
            let error =
                NavigationError::DuplicateUserInteractionTypeUsed(format!("{:?}", action.interaction()));
            self.logger
                .error(LogCategory::Destination, format!("binding on {}", self.id), &error);
            return Err(error);
        }
        self.logger.trace(
            LogCategory::Destination,
            format!("{} bound {:?}", self.id, action.interaction()),
        );
        self.interface_actions.insert(action.interaction().clone(), action);
        Ok(())
    }

    pub fn assign_action_assistant(
        &mut self,
        interaction: R::InteractionType,
        assistant: Arc<dyn InterfaceActionAssistant<R>>,
    ) {
        self.action_assistants.insert(interaction, assistant);
    }

    pub fn assign_interactor_assistant(
        &mut self,
        interaction: R::InteractionType,
        assistant: Arc<dyn InteractorAssistant<R>>,
    ) {
        self.interactor_assistants.insert(interaction, assistant);
    }

    /// Runs the action bound to `interaction`.
    ///
    /// Presentation bindings never hand out their stored configuration: the
    /// assistant returns a stamped copy, and that copy is what gets presented.
    pub fn perform_interface_action(
        &mut self,
        interaction: &R::InteractionType,
        content: Option<R::ContentType>,
    ) -> Result<InterfaceOutcome<R>, NavigationError> {
        let action = self
            .interface_actions
            .get(interaction)
            .cloned()
            .ok_or_else(|| NavigationError::MissingInterfaceAction(format!("{:?}", interaction)))?;

        match action.kind() {
            InterfaceActionKind::Presentation(configuration) => {
                let configured = match action.assistant() {
                    AssistantKind::Custom => {
                        let assistant = self.action_assistants.get(interaction).ok_or_else(|| {
                            NavigationError::MissingInterfaceActionAssistant {
                                interaction: format!("{:?}", interaction),
                                kind: "presentation",
                            }
                        })?;
                        assistant.configure(configuration, interaction, self, content)
                    }
                    _ => DefaultActionAssistant.configure(configuration, interaction, self, content),
                };
                self.logger.debug(
                    LogCategory::Destination,
                    format!("{} interaction {:?} -> {}", self.id, interaction, configured.kind()),
                );
                Ok(InterfaceOutcome::Present(configured))
            }
            InterfaceActionKind::Interactor => {
                let assistant = self
                    .interactor_assistants
                    .get(interaction)
                    .cloned()
                    .ok_or_else(|| NavigationError::MissingInterfaceActionAssistant {
                        interaction: format!("{:?}", interaction),
                        kind: "interactor",
                    })?;
                assistant.handle(self, content)?;
                Ok(InterfaceOutcome::Handled)
            }
            InterfaceActionKind::Closure(closure) => {
                closure(interaction, content);
                Ok(InterfaceOutcome::Handled)
            }
        }
    }

    /// Binds a system event (back, dismiss) to a configuration. Later bindings replace earlier ones.
    pub fn bind_system_navigation(
        &mut self,
        navigation_type: SystemNavigationType,
        configuration: PresentationConfiguration<R>,
    ) {
        self.system_navigation_actions.insert(navigation_type, configuration);
    }

    /// Marks the destination as navigating and returns the configuration to dispatch.
    pub fn perform_system_navigation_action(
        &mut self,
        navigation_type: SystemNavigationType,
        options: SystemNavigationOptions,
    ) -> Result<PresentationConfiguration<R>, NavigationError> {
        let bound = self
            .system_navigation_actions
            .get(&navigation_type)
            .ok_or_else(|| NavigationError::MissingInterfaceAction(navigation_type.to_string()))?;
        let mut configuration = bound.fork();
        configuration.action_type = crate::presentation::ActionType::SystemNavigation(navigation_type);
        configuration.current_destination_id = Some(self.id);
        configuration.action_target_id = options.target.or(Some(self.id));
        if let Some(delay) = options.delay_completion {
            configuration.should_delay_completion_activation = delay;
        }
        self.is_system_navigating = true;
        self.logger.debug(
            LogCategory::Destination,
            format!("{} system navigation {}", self.id, navigation_type),
        );
        Ok(configuration)
    }

    pub fn register_interactor<Req, Out>(&mut self, tag: R::InteractorType, interactor: Interactor<Req, Out>)
    where
        Req: Send + 'static,
        Out: Send + 'static,
    {
        if self.interactors.register(tag.clone(), interactor) {
            self.logger.debug(
                LogCategory::Interactor,
                format!("{} replaced interactor {:?}", self.id, tag),
            );
        }
    }

    /// Sends `request` to a blocking interactor; the result arrives through `completion`.
    pub fn perform_request<Req, Out, C>(
        &mut self,
        tag: &R::InteractorType,
        request: Req,
        completion: C,
    ) -> Result<(), NavigationError>
    where
        Req: Send + 'static,
        Out: Send + 'static,
        C: FnOnce(Result<Out, NavigationError>),
    {
        self.logger
            .trace(LogCategory::Interactor, format!("{} request -> {:?}", self.id, tag));
        self.interactors
            .perform_blocking(tag, request, completion)
            .inspect_err(|error| {
                self.logger
                    .error(LogCategory::Interactor, format!("request to {:?}", tag), error)
            })
    }

    /// Sends `request` to an awaited interactor.
    pub async fn perform_request_async<Req, Out>(
        &self,
        tag: &R::InteractorType,
        request: Req,
    ) -> Result<Out, NavigationError>
    where
        Req: Send + 'static,
        Out: Send + 'static,
    {
        let handle = self.async_interactor::<Req, Out>(tag)?;
        self.logger
            .trace(LogCategory::Interactor, format!("{} async request -> {:?}", self.id, tag));
        handle.perform(request).await
    }

    /// A handle onto an awaited interactor that outlives this borrow.
    pub fn async_interactor<Req, Out>(
        &self,
        tag: &R::InteractorType,
    ) -> Result<AsyncInteractorHandle<Req, Out>, NavigationError>
    where
        Req: Send + 'static,
        Out: Send + 'static,
    {
        self.interactors.awaited_handle(tag).inspect_err(|error| {
            self.logger
                .error(LogCategory::Interactor, format!("lookup of {:?}", tag), error)
        })
    }

    /// Drops every binding and interactor. Called when the destination leaves the graph.
    pub(crate) fn clear_bindings(&mut self) {
        self.interface_actions.clear();
        self.action_assistants.clear();
        self.interactor_assistants.clear();
        self.system_navigation_actions.clear();
        self.interactors.clear();
    }
}

impl<R: Routing> fmt::Debug for Destination<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination")
            .field("id", &self.id)
            .field("destination_type", &self.destination_type)
            .field("parent_id", &self.parent_id)
            .field("group", &self.group.as_ref().map(|group| group.kind()))
            .field("presented_sheet", &self.presented_sheet)
            .field("interactions", &self.interface_actions.len())
            .field("interactors", &self.interactors.len())
            .finish()
    }
}
