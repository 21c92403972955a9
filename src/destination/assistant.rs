use super::Destination;
use crate::error::NavigationError;
use crate::presentation::PresentationConfiguration;
use crate::routing::Routing;

/// Customizes the configuration an interaction binding dispatches.
///
/// `configure` receives the binding's stored configuration and must return a
/// new copy. The stored one is never mutated, which is what lets a single
/// binding be invoked again with different runtime content.
pub trait InterfaceActionAssistant<R: Routing>: Send + Sync {
    fn configure(
        &self,
        configuration: &PresentationConfiguration<R>,
        interaction: &R::InteractionType,
        destination: &Destination<R>,
        content: Option<R::ContentType>,
    ) -> PresentationConfiguration<R>;
}

/// Wires an interaction straight to a data request instead of a new presentation.
pub trait InteractorAssistant<R: Routing>: Send + Sync {
    fn handle(
        &self,
        destination: &mut Destination<R>,
        content: Option<R::ContentType>,
    ) -> Result<(), NavigationError>;
}

/// Stamps the invoking destination's ids and the runtime content onto a fresh copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultActionAssistant;

impl<R: Routing> InterfaceActionAssistant<R> for DefaultActionAssistant {
    fn configure(
        &self,
        configuration: &PresentationConfiguration<R>,
        _interaction: &R::InteractionType,
        destination: &Destination<R>,
        content: Option<R::ContentType>,
    ) -> PresentationConfiguration<R> {
        let mut configured = configuration.fork();
        configured.current_destination_id = Some(destination.id());
        configured.parent_destination_id = destination.parent_id();
        configured.action_target_id = Some(destination.id());
        if content.is_some() {
            configured.content = content;
        }
        configured
    }
}

impl<R, F> InterfaceActionAssistant<R> for F
where
    R: Routing,
    F: Fn(
            &PresentationConfiguration<R>,
            &R::InteractionType,
            &Destination<R>,
            Option<R::ContentType>,
        ) -> PresentationConfiguration<R>
        + Send
        + Sync,
{
    fn configure(
        &self,
        configuration: &PresentationConfiguration<R>,
        interaction: &R::InteractionType,
        destination: &Destination<R>,
        content: Option<R::ContentType>,
    ) -> PresentationConfiguration<R> {
        self(configuration, interaction, destination, content)
    }
}
