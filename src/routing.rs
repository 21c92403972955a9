use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::hash::Hash;
use uuid::Uuid;

/// Bound shared by every tag type a `Routing` family names.
pub trait RouteTag: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> RouteTag for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// The family of types a navigation graph is parameterized by.
///
/// An application implements this once on a marker type and every
/// `Flow`, `Destination` and `PresentationConfiguration` it creates is
/// generic over that marker.
///
/// ```rust
/// use navflow::routing::Routing;
///
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// enum Screen { Home, Detail }
///
/// #[derive(Debug, Clone)]
/// struct AppRoutes;
///
/// impl Routing for AppRoutes {
///     type DestinationType = Screen;
///     type ContentType = String;
///     type InteractionType = &'static str;
///     type TabType = &'static str;
///     type InteractorType = &'static str;
/// }
/// ```
pub trait Routing: Clone + Debug + Send + Sync + 'static {
    /// Identifies the routable kind of a destination. Providers are keyed by it.
    type DestinationType: RouteTag;
    /// Payload handed to a newly presented destination.
    type ContentType: Clone + Debug + Send + Sync + 'static;
    /// Names a user interaction a destination can bind an action to.
    type InteractionType: RouteTag;
    /// Names a tab inside a tab-set group.
    type TabType: RouteTag;
    /// Names an interactor registered on a destination.
    type InteractorType: RouteTag;
}

/// Opaque identifier of a destination, generated at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DestinationId(Uuid);

impl DestinationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DestinationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The first block is plenty to tell destinations apart in logs.
        let simple = self.0.simple().to_string();
        write!(f, "{}", &simple[..8])
    }
}

/// Identifier of a single presentation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresentationId(Uuid);

impl PresentationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PresentationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PresentationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let simple = self.0.simple().to_string();
        write!(f, "{}", &simple[..8])
    }
}
