//! # Navflow - Navigation Coordination Engine
//!
//! **Navflow** keeps track of a graph of navigable *destinations* and turns
//! declarative presentation requests into changes of that graph. It decides
//! which destination is current, maintains parent/child grouping (stacks, tab
//! sets and split columns), sequences multi-step navigation paths and reports
//! completion. Rendering stays outside: the engine only talks to a
//! `PresentationAdapter`.
//!
//! ## Core Workflow
//!
//! 1.  **Describe Your Routes**: Implement `Routing` on a marker type to name your destination, content, interaction, tab and interactor types.
//! 2.  **Provide Destinations**: Register a `Provider` per destination type. Providers build `Destination`s, optionally with a group and nested children.
//! 3.  **Build a Flow**: Use `Flow::builder` to combine providers, an adapter, `FlowOptions` and a starting presentation.
//! 4.  **Navigate**: Dispatch `PresentationConfiguration`s, fire interactions bound on destinations, and complete deferred transitions as the UI finishes them.
//!
//! ## Quick Start
//!
//! ```rust
//! use navflow::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! enum Screen { Main, Home, Detail }
//!
//! #[derive(Debug, Clone)]
//! struct AppRoutes;
//!
//! impl Routing for AppRoutes {
//!     type DestinationType = Screen;
//!     type ContentType = String;
//!     type InteractionType = &'static str;
//!     type TabType = &'static str;
//!     type InteractorType = &'static str;
//! }
//!
//! // A stack that starts out with the home screen on it.
//! fn build_main(
//!     _: &PresentationConfiguration<AppRoutes>,
//!     logger: &NavigationLogger,
//! ) -> std::result::Result<Destination<AppRoutes>, NavigationError> {
//!     Ok(Destination::stack(Screen::Main, logger.clone())
//!         .with_child(ChildSlot::Stack, Destination::new(Screen::Home, logger.clone())))
//! }
//!
//! let mut flow = Flow::<AppRoutes>::builder()
//!     .with_provider(Screen::Main, build_main)
//!     .with_fallback_provider(ViewProvider)
//!     .start_with(PresentationConfiguration::replace_current(Screen::Main))
//!     .build();
//!
//! flow.start();
//! let detail = flow.present_destination(PresentationConfiguration::push(Screen::Detail).with_content("42".into()));
//! assert_eq!(flow.current_destination_id(), detail);
//!
//! flow.present_destination(PresentationConfiguration::pop());
//! let home = flow.current_destination().map(|destination| destination.destination_type().clone());
//! assert_eq!(home, Some(Screen::Home));
//! ```

pub mod adapter;
pub mod config;
pub mod destination;
pub mod error;
pub mod flow;
pub mod group;
pub mod inspect;
pub mod logging;
pub mod navigator;
pub mod prelude;
pub mod presentation;
pub mod provider;
pub mod routing;
pub mod script;
