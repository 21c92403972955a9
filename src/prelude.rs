//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the navflow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use navflow::prelude::*;
//! use navflow::script::ScriptRunner;
//!
//! # fn run_example() -> Result<()> {
//! let options = FlowOptions::from_file("path/to/options.json")?;
//! let mut runner = ScriptRunner::from_file("path/to/script.json", options)?;
//! runner.run();
//!
//! println!("{}", GraphFormatter::new(runner.flow()));
//! # Ok(())
//! # }
//! ```

// Core coordination
pub use crate::flow::{Flow, FlowBuilder, Registry};
pub use crate::routing::{DestinationId, PresentationId, Routing};

// Destinations and their bindings
pub use crate::destination::{
    AsyncRequestHandler, ChildSlot, Destination, Interactor, InteractorAssistant, InterfaceAction,
    InterfaceActionAssistant, InterfaceOutcome, RequestHandler, SystemNavigationOptions,
};

// Presentations
pub use crate::presentation::{
    ActionType, CustomPresentationContext, PresentationConfiguration, PresentationKind,
    PresentationType, SplitColumn, SystemNavigationType,
};

// Groups
pub use crate::group::{ColumnGroup, Group, GroupCoordinator, GroupKind, StackGroup, TabGroup};
pub use crate::navigator::Navigator;

// Boundaries
pub use crate::adapter::{
    ImmediateAdapter, PresentationAdapter, RecordingAdapter, Transition, TransitionOutcome,
};
pub use crate::provider::{Provider, ViewProvider};

// Configuration and logging
pub use crate::config::{FlowOptions, LoggingOptions};
pub use crate::logging::{LogCategory, NavigationLogger};

// Error types
pub use crate::error::{ConfigError, NavigationError};

// Inspection
pub use crate::inspect::{FlowSnapshot, GraphFormatter};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
