use crate::presentation::PresentationConfiguration;
use crate::routing::Routing;
use std::fmt;
use std::sync::Arc;

/// Which assistant prepares an interaction binding before it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssistantKind {
    /// `DefaultActionAssistant`.
    #[default]
    Default,
    /// The presentation assistant registered on the destination for the interaction.
    Custom,
    /// The interactor assistant registered on the destination for the interaction.
    Interactor,
}

/// A side effect bound directly to an interaction.
pub type InteractionClosure<R> =
    Arc<dyn Fn(&<R as Routing>::InteractionType, Option<<R as Routing>::ContentType>) + Send + Sync>;

pub enum InterfaceActionKind<R: Routing> {
    Presentation(PresentationConfiguration<R>),
    Interactor,
    Closure(InteractionClosure<R>),
}

impl<R: Routing> Clone for InterfaceActionKind<R> {
    fn clone(&self) -> Self {
        match self {
            InterfaceActionKind::Presentation(configuration) => {
                InterfaceActionKind::Presentation(configuration.clone())
            }
            InterfaceActionKind::Interactor => InterfaceActionKind::Interactor,
            InterfaceActionKind::Closure(closure) => InterfaceActionKind::Closure(Arc::clone(closure)),
        }
    }
}

/// An action bound to a user interaction on a destination.
pub struct InterfaceAction<R: Routing> {
    interaction: R::InteractionType,
    assistant: AssistantKind,
    kind: InterfaceActionKind<R>,
}

impl<R: Routing> InterfaceAction<R> {
    /// Presents `configuration` (stamped by the default assistant) when the interaction fires.
    pub fn presentation(interaction: R::InteractionType, configuration: PresentationConfiguration<R>) -> Self {
        Self {
            interaction,
            assistant: AssistantKind::Default,
            kind: InterfaceActionKind::Presentation(configuration),
        }
    }

    /// Hands the interaction to the destination's interactor assistant.
    pub fn interactor(interaction: R::InteractionType) -> Self {
        Self {
            interaction,
            assistant: AssistantKind::Interactor,
            kind: InterfaceActionKind::Interactor,
        }
    }

    pub fn closure<F>(interaction: R::InteractionType, closure: F) -> Self
    where
        F: Fn(&R::InteractionType, Option<R::ContentType>) + Send + Sync + 'static,
    {
        Self {
            interaction,
            assistant: AssistantKind::Default,
            kind: InterfaceActionKind::Closure(Arc::new(closure)),
        }
    }

    /// Prepare the configuration with the destination's custom assistant instead.
    pub fn with_custom_assistant(mut self) -> Self {
        if matches!(self.kind, InterfaceActionKind::Presentation(_)) {
            self.assistant = AssistantKind::Custom;
        }
        self
    }

    pub fn interaction(&self) -> &R::InteractionType {
        &self.interaction
    }

    pub fn assistant(&self) -> AssistantKind {
        self.assistant
    }

    pub fn kind(&self) -> &InterfaceActionKind<R> {
        &self.kind
    }
}

impl<R: Routing> Clone for InterfaceAction<R> {
    fn clone(&self) -> Self {
        Self {
            interaction: self.interaction.clone(),
            assistant: self.assistant,
            kind: self.kind.clone(),
        }
    }
}

impl<R: Routing> fmt::Debug for InterfaceAction<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            InterfaceActionKind::Presentation(configuration) => format!("presentation({})", configuration.kind()),
            InterfaceActionKind::Interactor => "interactor".to_string(),
            InterfaceActionKind::Closure(_) => "closure".to_string(),
        };
        f.debug_struct("InterfaceAction")
            .field("interaction", &self.interaction)
            .field("assistant", &self.assistant)
            .field("kind", &kind)
            .finish()
    }
}

/// What running an interface action produced.
pub enum InterfaceOutcome<R: Routing> {
    /// A stamped configuration the flow should present.
    Present(PresentationConfiguration<R>),
    /// The action ran in place; nothing to present.
    Handled,
}

impl<R: Routing> fmt::Debug for InterfaceOutcome<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceOutcome::Present(configuration) => {
                f.debug_tuple("Present").field(configuration).finish()
            }
            InterfaceOutcome::Handled => write!(f, "Handled"),
        }
    }
}
