use super::model::{BindingDefinition, DefinitionKind, DestinationDefinition, ScriptSlot};
use super::ScriptRouting;
use crate::destination::{ChildSlot, Destination, InterfaceAction};
use crate::error::{ConfigError, NavigationError};
use crate::group::{ColumnGroup, StackGroup, TabGroup};
use crate::logging::NavigationLogger;
use crate::presentation::PresentationConfiguration;
use crate::provider::Provider;
use ahash::AHashMap;
use serde_json::Value;

struct Prepared {
    definition: DestinationDefinition,
    bindings: Vec<(String, PresentationConfiguration<ScriptRouting>)>,
}

/// Builds destinations from the definitions of a `NavigationScript`.
pub struct ScriptProvider {
    definitions: AHashMap<String, Prepared>,
}

impl ScriptProvider {
    /// Checks every definition up front: names are unique, children exist, no
    /// definition contains itself, and every binding converts.
    pub fn new(definitions: Vec<DestinationDefinition>) -> Result<Self, ConfigError> {
        let mut prepared = AHashMap::new();
        for definition in definitions {
            let bindings = definition
                .bindings
                .iter()
                .map(|BindingDefinition { interaction, presentation }| {
                    Ok((interaction.clone(), presentation.to_configuration()?))
                })
                .collect::<Result<Vec<_>, ConfigError>>()?;
            let name = definition.name.clone();
            if prepared
                .insert(name.clone(), Prepared { definition, bindings })
                .is_some()
            {
                return Err(ConfigError::InvalidScript(format!(
                    "destination '{}' is defined twice",
                    name
                )));
            }
        }
        let provider = Self { definitions: prepared };
        for name in provider.definitions.keys() {
            provider.check_children(name, &mut Vec::new())?;
        }
        Ok(provider)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    fn check_children(&self, name: &str, trail: &mut Vec<String>) -> Result<(), ConfigError> {
        if trail.iter().any(|seen| seen == name) {
            return Err(ConfigError::InvalidScript(format!(
                "destination '{}' contains itself",
                name
            )));
        }
        let prepared = self
            .definitions
            .get(name)
            .ok_or_else(|| ConfigError::InvalidScript(format!("unknown destination '{}'", name)))?;
        trail.push(name.to_string());
        for child in &prepared.definition.children {
            self.check_children(&child.destination, trail)?;
        }
        trail.pop();
        Ok(())
    }

    fn build(
        &self,
        name: &str,
        content: Option<Value>,
        logger: &NavigationLogger,
    ) -> Result<Destination<ScriptRouting>, NavigationError> {
        let prepared = self
            .definitions
            .get(name)
            .ok_or_else(|| NavigationError::MissingProvider(name.to_string()))?;
        let definition = &prepared.definition;
        let destination_type = definition.name.clone();

        let mut destination = match definition.kind {
            DefinitionKind::View => Destination::new(destination_type, logger.clone()),
            DefinitionKind::Stack => Destination::new(destination_type, logger.clone()).with_group(StackGroup::new()),
            DefinitionKind::Tabs => {
                let selected = definition
                    .selected
                    .clone()
                    .or_else(|| definition.tabs.first().cloned())
                    .ok_or_else(|| NavigationError::TabNotFound("<no tabs>".to_string()))?;
                let tabs = TabGroup::new(definition.tabs.clone(), selected)?;
                Destination::new(destination_type, logger.clone()).with_group(tabs)
            }
            DefinitionKind::Columns => {
                let columns = if definition.columns.is_empty() {
                    ColumnGroup::two_column()
                } else {
                    ColumnGroup::with_columns(definition.columns.clone())
                };
                Destination::new(destination_type, logger.clone()).with_group(columns)
            }
        }
        .with_content(content);

        for (interaction, configuration) in &prepared.bindings {
            destination.add_interface_action(InterfaceAction::presentation(
                interaction.clone(),
                configuration.fork(),
            ))?;
        }

        for child in &definition.children {
            let slot = match &child.slot {
                ScriptSlot::Stack => ChildSlot::Stack,
                ScriptSlot::Tab(tab) => ChildSlot::Tab(tab.clone()),
                ScriptSlot::Column(column) => ChildSlot::Column(*column),
            };
            destination = destination.with_child(slot, self.build(&child.destination, None, logger)?);
        }
        Ok(destination)
    }
}

impl Provider<ScriptRouting> for ScriptProvider {
    fn build_destination(
        &self,
        configuration: &PresentationConfiguration<ScriptRouting>,
        logger: &NavigationLogger,
    ) -> Result<Destination<ScriptRouting>, NavigationError> {
        let name = configuration
            .destination_type
            .as_deref()
            .ok_or_else(|| NavigationError::MissingProvider("<unnamed>".to_string()))?;
        self.build(name, configuration.content.clone(), logger)
    }
}
