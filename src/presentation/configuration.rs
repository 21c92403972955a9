use super::{ActionType, PresentationKind, SplitColumn, SystemNavigationType};
use crate::error::NavigationError;
use crate::flow::Registry;
use crate::routing::{DestinationId, PresentationId, Routing};
use std::fmt;
use std::sync::Arc;

/// Called once per dispatch attempt with the outcome of the presentation.
///
/// The closure only sees the success flag. It is shared between copies of a
/// configuration, and the `Flow` guarantees a given dispatch fires it at most
/// once even when completion is delayed and activated from the outside.
pub type CompletionClosure = Arc<dyn Fn(bool) + Send + Sync>;

/// A user supplied topology change, run when a `Custom` presentation completes.
pub type CustomPresentation<R> =
    Arc<dyn Fn(&mut CustomPresentationContext<'_, R>) -> Result<bool, NavigationError> + Send + Sync>;

/// What a `Custom` presentation handler can see and touch.
pub struct CustomPresentationContext<'a, R: Routing> {
    pub registry: &'a mut Registry<R>,
    /// The destination built for this request, already registered but detached.
    pub target: Option<DestinationId>,
    /// The flow's current destination when the request was dispatched.
    pub current: Option<DestinationId>,
    /// Set by the handler to move the flow's focus once it returns.
    pub focus: Option<DestinationId>,
}

/// How a presentation should change the navigation graph.
pub enum PresentationType<R: Routing> {
    ReplaceCurrent,
    AddToCurrent,
    PushInStack,
    PopInStack,
    SelectTab(R::TabType),
    PresentTab(R::TabType),
    PresentSheet,
    DismissSheet,
    PresentInColumn(SplitColumn),
    PresentPath(Vec<PresentationConfiguration<R>>),
    Custom(CustomPresentation<R>),
}

impl<R: Routing> PresentationType<R> {
    pub fn kind(&self) -> PresentationKind {
        match self {
            PresentationType::ReplaceCurrent => PresentationKind::ReplaceCurrent,
            PresentationType::AddToCurrent => PresentationKind::AddToCurrent,
            PresentationType::PushInStack => PresentationKind::PushInStack,
            PresentationType::PopInStack => PresentationKind::PopInStack,
            PresentationType::SelectTab(_) => PresentationKind::SelectTab,
            PresentationType::PresentTab(_) => PresentationKind::PresentTab,
            PresentationType::PresentSheet => PresentationKind::PresentSheet,
            PresentationType::DismissSheet => PresentationKind::DismissSheet,
            PresentationType::PresentInColumn(_) => PresentationKind::PresentInColumn,
            PresentationType::PresentPath(_) => PresentationKind::PresentPath,
            PresentationType::Custom(_) => PresentationKind::Custom,
        }
    }
}

impl<R: Routing> Clone for PresentationType<R> {
    fn clone(&self) -> Self {
        match self {
            PresentationType::ReplaceCurrent => PresentationType::ReplaceCurrent,
            PresentationType::AddToCurrent => PresentationType::AddToCurrent,
            PresentationType::PushInStack => PresentationType::PushInStack,
            PresentationType::PopInStack => PresentationType::PopInStack,
            PresentationType::SelectTab(tab) => PresentationType::SelectTab(tab.clone()),
            PresentationType::PresentTab(tab) => PresentationType::PresentTab(tab.clone()),
            PresentationType::PresentSheet => PresentationType::PresentSheet,
            PresentationType::DismissSheet => PresentationType::DismissSheet,
            PresentationType::PresentInColumn(column) => PresentationType::PresentInColumn(*column),
            PresentationType::PresentPath(steps) => PresentationType::PresentPath(steps.clone()),
            PresentationType::Custom(handler) => PresentationType::Custom(Arc::clone(handler)),
        }
    }
}

impl<R: Routing> fmt::Debug for PresentationType<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentationType::SelectTab(tab) => write!(f, "SelectTab({:?})", tab),
            PresentationType::PresentTab(tab) => write!(f, "PresentTab({:?})", tab),
            PresentationType::PresentInColumn(column) => write!(f, "PresentInColumn({:?})", column),
            PresentationType::PresentPath(steps) => write!(f, "PresentPath({} steps)", steps.len()),
            other => write!(f, "{:?}", other.kind()),
        }
    }
}

/// A request to present (or remove) a destination.
///
/// Configurations are values: a destination's interaction binding owns its own
/// copy, and every invocation stamps ids onto a fresh copy of that, so mutating
/// one copy never affects another.
pub struct PresentationConfiguration<R: Routing> {
    pub id: PresentationId,
    /// `None` acts on the current destination, e.g. a bare tab switch.
    pub destination_type: Option<R::DestinationType>,
    pub presentation_type: PresentationType<R>,
    pub content: Option<R::ContentType>,
    pub action_type: ActionType,
    pub current_destination_id: Option<DestinationId>,
    pub parent_destination_id: Option<DestinationId>,
    pub action_target_id: Option<DestinationId>,
    /// Whether the presented destination takes focus in its group and the flow.
    pub should_set_as_current: bool,
    /// Hold the completion until `Flow::activate_completion_closure` is called.
    pub should_delay_completion_activation: bool,
    completion: Option<CompletionClosure>,
}

impl<R: Routing> PresentationConfiguration<R> {
    pub fn new(presentation_type: PresentationType<R>) -> Self {
        Self {
            id: PresentationId::new(),
            destination_type: None,
            presentation_type,
            content: None,
            action_type: ActionType::Presentation,
            current_destination_id: None,
            parent_destination_id: None,
            action_target_id: None,
            should_set_as_current: true,
            should_delay_completion_activation: false,
            completion: None,
        }
    }

    pub fn replace_current(destination_type: R::DestinationType) -> Self {
        Self::new(PresentationType::ReplaceCurrent).destination(destination_type)
    }

    pub fn add_to_current(destination_type: R::DestinationType) -> Self {
        Self::new(PresentationType::AddToCurrent).destination(destination_type)
    }

    pub fn push(destination_type: R::DestinationType) -> Self {
        Self::new(PresentationType::PushInStack).destination(destination_type)
    }

    pub fn pop() -> Self {
        Self::new(PresentationType::PopInStack)
    }

    pub fn select_tab(tab: R::TabType) -> Self {
        Self::new(PresentationType::SelectTab(tab))
    }

    pub fn present_tab(destination_type: R::DestinationType, tab: R::TabType) -> Self {
        Self::new(PresentationType::PresentTab(tab)).destination(destination_type)
    }

    pub fn sheet(destination_type: R::DestinationType) -> Self {
        Self::new(PresentationType::PresentSheet).destination(destination_type)
    }

    pub fn dismiss_sheet() -> Self {
        Self::new(PresentationType::DismissSheet)
    }

    pub fn column(destination_type: R::DestinationType, column: SplitColumn) -> Self {
        Self::new(PresentationType::PresentInColumn(column)).destination(destination_type)
    }

    pub fn path(steps: Vec<PresentationConfiguration<R>>) -> Self {
        Self::new(PresentationType::PresentPath(steps))
    }

    pub fn custom(destination_type: Option<R::DestinationType>, handler: CustomPresentation<R>) -> Self {
        let mut configuration = Self::new(PresentationType::Custom(handler));
        configuration.destination_type = destination_type;
        configuration
    }

    /// The configuration a system event (back, dismiss) dispatches on behalf of `destination`.
    pub fn system_navigation(navigation_type: SystemNavigationType, destination: DestinationId) -> Self {
        let presentation_type = match navigation_type {
            SystemNavigationType::NavigateBackInStack => PresentationType::PopInStack,
            SystemNavigationType::DismissSheet => PresentationType::DismissSheet,
        };
        let mut configuration = Self::new(presentation_type);
        configuration.action_type = ActionType::SystemNavigation(navigation_type);
        configuration.action_target_id = Some(destination);
        configuration.current_destination_id = Some(destination);
        configuration
    }

    pub fn destination(mut self, destination_type: R::DestinationType) -> Self {
        self.destination_type = Some(destination_type);
        self
    }

    pub fn with_content(mut self, content: R::ContentType) -> Self {
        self.content = Some(content);
        self
    }

    pub fn set_as_current(mut self, should_set_as_current: bool) -> Self {
        self.should_set_as_current = should_set_as_current;
        self
    }

    pub fn delay_completion(mut self, delay: bool) -> Self {
        self.should_delay_completion_activation = delay;
        self
    }

    pub fn target(mut self, id: DestinationId) -> Self {
        self.action_target_id = Some(id);
        self
    }

    pub fn on_completion<F>(mut self, completion: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.completion = Some(Arc::new(completion));
        self
    }

    pub fn kind(&self) -> PresentationKind {
        self.presentation_type.kind()
    }

    pub fn completion(&self) -> Option<&CompletionClosure> {
        self.completion.as_ref()
    }

    /// A copy of this configuration carrying a fresh request id.
    pub fn fork(&self) -> Self {
        let mut copy = self.clone();
        copy.id = PresentationId::new();
        copy
    }

    /// The destination topology should be resolved from, if the request names one.
    pub fn anchor(&self) -> Option<DestinationId> {
        self.action_target_id.or(self.current_destination_id)
    }

    pub(crate) fn complete(&self, success: bool) {
        if let Some(completion) = &self.completion {
            completion(success);
        }
    }
}

impl<R: Routing> Clone for PresentationConfiguration<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            destination_type: self.destination_type.clone(),
            presentation_type: self.presentation_type.clone(),
            content: self.content.clone(),
            action_type: self.action_type,
            current_destination_id: self.current_destination_id,
            parent_destination_id: self.parent_destination_id,
            action_target_id: self.action_target_id,
            should_set_as_current: self.should_set_as_current,
            should_delay_completion_activation: self.should_delay_completion_activation,
            completion: self.completion.clone(),
        }
    }
}

impl<R: Routing> fmt::Debug for PresentationConfiguration<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationConfiguration")
            .field("id", &self.id)
            .field("destination_type", &self.destination_type)
            .field("presentation_type", &self.presentation_type)
            .field("content", &self.content)
            .field("action_type", &self.action_type)
            .field("current_destination_id", &self.current_destination_id)
            .field("parent_destination_id", &self.parent_destination_id)
            .field("action_target_id", &self.action_target_id)
            .field("should_set_as_current", &self.should_set_as_current)
            .field(
                "should_delay_completion_activation",
                &self.should_delay_completion_activation,
            )
            .field("has_completion", &self.completion.is_some())
            .finish()
    }
}
