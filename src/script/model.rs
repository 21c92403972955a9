use super::ScriptRouting;
use crate::error::ConfigError;
use crate::presentation::{PresentationConfiguration, PresentationKind, SplitColumn, SystemNavigationType};
use serde::Deserialize;
use serde_json::Value;

fn default_true() -> bool {
    true
}

/// A navigation script: the destinations it can build, where it starts and what it does.
#[derive(Debug, Clone, Deserialize)]
pub struct NavigationScript {
    pub destinations: Vec<DestinationDefinition>,
    pub start: ScriptPresentation,
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
    /// Leave every transition pending until a `complete` step finishes it.
    #[serde(default)]
    pub defer_transitions: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefinitionKind {
    #[default]
    View,
    Stack,
    Tabs,
    Columns,
}

/// How a scripted destination type is built.
#[derive(Debug, Clone, Deserialize)]
pub struct DestinationDefinition {
    pub name: String,
    #[serde(default)]
    pub kind: DefinitionKind,
    #[serde(default)]
    pub tabs: Vec<String>,
    #[serde(default)]
    pub selected: Option<String>,
    #[serde(default)]
    pub columns: Vec<SplitColumn>,
    #[serde(default)]
    pub children: Vec<ChildDefinition>,
    #[serde(default)]
    pub bindings: Vec<BindingDefinition>,
}

/// A child built together with its parent.
#[derive(Debug, Clone, Deserialize)]
pub struct ChildDefinition {
    pub slot: ScriptSlot,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptSlot {
    Stack,
    Tab(String),
    Column(SplitColumn),
}

/// An interaction bound to a presentation on every destination of a definition.
#[derive(Debug, Clone, Deserialize)]
pub struct BindingDefinition {
    pub interaction: String,
    pub presentation: ScriptPresentation,
}

/// The JSON form of a `PresentationConfiguration`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptPresentation {
    pub presentation: PresentationKind,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub tab: Option<String>,
    #[serde(default)]
    pub column: Option<SplitColumn>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default = "default_true")]
    pub set_as_current: bool,
    #[serde(default)]
    pub delay_completion: bool,
    /// The steps of a `present-path`.
    #[serde(default)]
    pub steps: Vec<ScriptPresentation>,
}

impl ScriptPresentation {
    pub fn to_configuration(&self) -> Result<PresentationConfiguration<ScriptRouting>, ConfigError> {
        use crate::presentation::PresentationType as P;

        let presentation_type = match self.presentation {
            PresentationKind::ReplaceCurrent => P::ReplaceCurrent,
            PresentationKind::AddToCurrent => P::AddToCurrent,
            PresentationKind::PushInStack => P::PushInStack,
            PresentationKind::PopInStack => P::PopInStack,
            PresentationKind::SelectTab => P::SelectTab(self.require_tab()?),
            PresentationKind::PresentTab => P::PresentTab(self.require_tab()?),
            PresentationKind::PresentSheet => P::PresentSheet,
            PresentationKind::DismissSheet => P::DismissSheet,
            PresentationKind::PresentInColumn => P::PresentInColumn(self.column.ok_or_else(|| {
                ConfigError::InvalidScript("present-in-column needs a 'column'".to_string())
            })?),
            PresentationKind::PresentPath => {
                if self.steps.is_empty() {
                    return Err(ConfigError::InvalidScript(
                        "present-path needs at least one step".to_string(),
                    ));
                }
                P::PresentPath(
                    self.steps
                        .iter()
                        .map(ScriptPresentation::to_configuration)
                        .collect::<Result<_, _>>()?,
                )
            }
            PresentationKind::Custom => {
                return Err(ConfigError::InvalidScript(
                    "custom presentations cannot be scripted".to_string(),
                ));
            }
        };

        let needs_destination = matches!(
            self.presentation,
            PresentationKind::ReplaceCurrent
                | PresentationKind::AddToCurrent
                | PresentationKind::PushInStack
                | PresentationKind::PresentTab
                | PresentationKind::PresentSheet
                | PresentationKind::PresentInColumn
        );
        if needs_destination && self.destination.is_none() {
            return Err(ConfigError::InvalidScript(format!(
                "{} needs a 'destination'",
                self.presentation
            )));
        }

        let mut configuration = PresentationConfiguration::new(presentation_type)
            .set_as_current(self.set_as_current)
            .delay_completion(self.delay_completion);
        configuration.destination_type = self.destination.clone();
        configuration.content = self.content.clone();
        Ok(configuration)
    }

    fn require_tab(&self) -> Result<String, ConfigError> {
        self.tab
            .clone()
            .ok_or_else(|| ConfigError::InvalidScript(format!("{} needs a 'tab'", self.presentation)))
    }
}

/// One scripted action, tagged by `action`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ScriptStep {
    Present(ScriptPresentation),
    Path {
        steps: Vec<ScriptPresentation>,
    },
    /// Fires an interaction on the most recent active destination of type `destination`.
    Interact {
        destination: String,
        interaction: String,
        #[serde(default)]
        content: Option<Value>,
    },
    SystemNavigation {
        destination: String,
        navigation: SystemNavigationType,
    },
    /// Finishes the oldest pending presentation.
    Complete {
        #[serde(default = "default_true")]
        success: bool,
    },
    Remove {
        destination: String,
    },
}

impl ScriptStep {
    pub fn describe(&self) -> String {
        match self {
            ScriptStep::Present(presentation) => match &presentation.destination {
                Some(destination) => format!("present {} {}", presentation.presentation, destination),
                None => format!("present {}", presentation.presentation),
            },
            ScriptStep::Path { steps } => format!("path of {} steps", steps.len()),
            ScriptStep::Interact {
                destination,
                interaction,
                ..
            } => format!("interact {} on {}", interaction, destination),
            ScriptStep::SystemNavigation {
                destination,
                navigation,
            } => format!("system {} on {}", navigation, destination),
            ScriptStep::Complete { success } => format!("complete ({})", success),
            ScriptStep::Remove { destination } => format!("remove {}", destination),
        }
    }
}

impl NavigationScript {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content)
    }
}
