//! Data-driven navigation.
//!
//! `ScriptRouting` uses plain strings for every tag and JSON values for
//! content, so a whole navigation graph can be described in a JSON document
//! and replayed by `ScriptRunner`:
//!
//! ```json
//! {
//!   "destinations": [
//!     { "name": "main", "kind": "stack",
//!       "children": [{ "slot": "stack", "destination": "home" }] },
//!     { "name": "home",
//!       "bindings": [{ "interaction": "open",
//!                      "presentation": { "presentation": "push-in-stack", "destination": "detail" } }] },
//!     { "name": "detail" }
//!   ],
//!   "start": { "presentation": "replace-current", "destination": "main" },
//!   "steps": [
//!     { "action": "interact", "destination": "home", "interaction": "open" },
//!     { "action": "present", "presentation": "pop-in-stack" }
//!   ]
//! }
//! ```

mod model;
mod provider;
mod runner;

pub use model::{
    BindingDefinition, ChildDefinition, DefinitionKind, DestinationDefinition, NavigationScript,
    ScriptPresentation, ScriptSlot, ScriptStep,
};
pub use provider::ScriptProvider;
pub use runner::{ScriptRunner, StepReport};

use crate::routing::Routing;
use serde_json::Value;

/// A routing family with string tags and JSON content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRouting;

impl Routing for ScriptRouting {
    type DestinationType = String;
    type ContentType = Value;
    type InteractionType = String;
    type TabType = String;
    type InteractorType = String;
}
