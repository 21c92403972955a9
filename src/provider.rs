use crate::destination::Destination;
use crate::error::NavigationError;
use crate::logging::NavigationLogger;
use crate::presentation::PresentationConfiguration;
use crate::routing::Routing;

/// Builds destinations on behalf of a `Flow`. The flow never constructs one itself.
///
/// The logger handed in is the flow's own; passing it to `Destination::new`
/// keeps every node of one flow reporting under the same label.
pub trait Provider<R: Routing>: Send + Sync {
    fn build_destination(
        &self,
        configuration: &PresentationConfiguration<R>,
        logger: &NavigationLogger,
    ) -> Result<Destination<R>, NavigationError>;
}

impl<R, F> Provider<R> for F
where
    R: Routing,
    F: Fn(&PresentationConfiguration<R>, &NavigationLogger) -> Result<Destination<R>, NavigationError>
        + Send
        + Sync,
{
    fn build_destination(
        &self,
        configuration: &PresentationConfiguration<R>,
        logger: &NavigationLogger,
    ) -> Result<Destination<R>, NavigationError> {
        self(configuration, logger)
    }
}

/// A provider that builds a plain destination of the requested type with the request's content.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewProvider;

impl<R: Routing> Provider<R> for ViewProvider {
    fn build_destination(
        &self,
        configuration: &PresentationConfiguration<R>,
        logger: &NavigationLogger,
    ) -> Result<Destination<R>, NavigationError> {
        let destination_type = configuration
            .destination_type
            .clone()
            .ok_or_else(|| NavigationError::IncompatibleType {
                operation: "build destination".to_string(),
                expected: "a configuration with a destination type".to_string(),
            })?;
        Ok(Destination::new(destination_type, logger.clone()).with_content(configuration.content.clone()))
    }
}
