use super::model::{NavigationScript, ScriptStep};
use super::provider::ScriptProvider;
use super::ScriptRouting;
use crate::adapter::{RecordingAdapter, TransitionRecord};
use crate::config::FlowOptions;
use crate::destination::SystemNavigationOptions;
use crate::error::{ConfigError, NavigationError};
use crate::flow::Flow;
use crate::routing::DestinationId;
use serde::Serialize;

/// What one script step did.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub action: String,
    /// The destination the step put in front, if any.
    pub destination: Option<String>,
    pub error: Option<String>,
}

/// Replays a `NavigationScript` through a flow and records every transition.
pub struct ScriptRunner {
    flow: Flow<ScriptRouting>,
    adapter: RecordingAdapter,
    steps: Vec<ScriptStep>,
}

impl ScriptRunner {
    pub fn new(script: NavigationScript, options: FlowOptions) -> Result<Self, ConfigError> {
        let provider = ScriptProvider::new(script.destinations)?;
        let starting = script.start.to_configuration()?;
        for step in &script.steps {
            validate(step)?;
        }
        let adapter = if script.defer_transitions {
            RecordingAdapter::deferring()
        } else {
            RecordingAdapter::new()
        };
        let flow = Flow::builder()
            .with_fallback_provider(provider)
            .with_adapter(adapter.clone())
            .with_options(options)
            .start_with(starting)
            .build();
        Ok(Self {
            flow,
            adapter,
            steps: script.steps,
        })
    }

    pub fn from_json(json: &str, options: FlowOptions) -> Result<Self, ConfigError> {
        Self::new(NavigationScript::from_json(json)?, options)
    }

    pub fn from_file(path: &str, options: FlowOptions) -> Result<Self, ConfigError> {
        Self::new(NavigationScript::from_file(path)?, options)
    }

    /// Starts the flow and runs every step. Failed steps are reported, not fatal.
    pub fn run(&mut self) -> Vec<StepReport> {
        let mut reports = Vec::with_capacity(self.steps.len() + 1);
        let started = self.flow.start();
        reports.push(StepReport {
            index: 0,
            action: "start".to_string(),
            destination: started.map(|id| id.to_string()),
            error: started.is_none().then(|| "nothing to show".to_string()),
        });
        let steps = std::mem::take(&mut self.steps);
        for (index, step) in steps.iter().enumerate() {
            let outcome = self.run_step(step);
            reports.push(StepReport {
                index: index + 1,
                action: step.describe(),
                destination: outcome.as_ref().ok().copied().flatten().map(|id| id.to_string()),
                error: outcome.err().map(|error| error.to_string()),
            });
        }
        self.steps = steps;
        reports
    }

    fn run_step(&mut self, step: &ScriptStep) -> Result<Option<DestinationId>, NavigationError> {
        match step {
            ScriptStep::Present(presentation) => {
                let configuration = presentation
                    .to_configuration()
                    .map_err(|error| NavigationError::IncompatibleType {
                        operation: "script step".to_string(),
                        expected: error.to_string(),
                    })?;
                Ok(self.flow.present_destination(configuration))
            }
            ScriptStep::Path { steps } => {
                let steps = steps
                    .iter()
                    .map(|step| step.to_configuration())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|error| NavigationError::IncompatibleType {
                        operation: "script path".to_string(),
                        expected: error.to_string(),
                    })?;
                Ok(self.flow.present_destination_path(steps))
            }
            ScriptStep::Interact {
                destination,
                interaction,
                content,
            } => {
                let id = self.find(destination)?;
                self.flow
                    .perform_interface_action(id, interaction, content.clone())
            }
            ScriptStep::SystemNavigation {
                destination,
                navigation,
            } => {
                let id = self.find(destination)?;
                self.flow
                    .perform_system_navigation(id, *navigation, SystemNavigationOptions::default())?;
                Ok(self.flow.current_destination_id())
            }
            ScriptStep::Complete { success } => {
                let Some(presentation_id) = self.flow.pending_presentations().first().copied() else {
                    return Ok(None);
                };
                let Some(transition) = self.flow.pending_transition(presentation_id) else {
                    return Ok(None);
                };
                let destination = transition
                    .target
                    .or(transition.source)
                    .or(transition.host)
                    .ok_or_else(|| NavigationError::NoHostGroup {
                        presentation: transition.kind.to_string(),
                    })?;
                self.flow.activate_completion_closure(
                    destination,
                    presentation_id,
                    *success,
                    transition.action_type.is_system_navigation(),
                );
                Ok(self.flow.current_destination_id())
            }
            ScriptStep::Remove { destination } => {
                let id = self.find(destination)?;
                self.flow.remove_destination(id);
                Ok(self.flow.current_destination_id())
            }
        }
    }

    /// The current destination if it has type `name`, otherwise the most recently activated one.
    fn find(&self, name: &str) -> Result<DestinationId, NavigationError> {
        let matches = |id: &DestinationId| {
            self.flow
                .destination(*id)
                .is_some_and(|destination| destination.destination_type() == name)
        };
        self.flow
            .current_destination_id()
            .filter(matches)
            .or_else(|| self.flow.active_destinations().iter().rev().copied().find(matches))
            .ok_or_else(|| NavigationError::IncompatibleType {
                operation: format!("find '{}'", name),
                expected: "an active destination of that type".to_string(),
            })
    }

    pub fn flow(&self) -> &Flow<ScriptRouting> {
        &self.flow
    }

    pub fn flow_mut(&mut self) -> &mut Flow<ScriptRouting> {
        &mut self.flow
    }

    pub fn transitions(&self) -> Vec<TransitionRecord> {
        self.adapter.records()
    }
}

fn validate(step: &ScriptStep) -> Result<(), ConfigError> {
    match step {
        ScriptStep::Present(presentation) => presentation.to_configuration().map(|_| ()),
        ScriptStep::Path { steps } => {
            if steps.is_empty() {
                return Err(ConfigError::InvalidScript("a path step needs at least one step".to_string()));
            }
            steps.iter().try_for_each(|step| step.to_configuration().map(|_| ()))
        }
        _ => Ok(()),
    }
}
