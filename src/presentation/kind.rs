use serde::{Deserialize, Serialize};
use std::fmt;

/// Fieldless mirror of `PresentationType`, used for logging, adapters and scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresentationKind {
    ReplaceCurrent,
    AddToCurrent,
    PushInStack,
    PopInStack,
    SelectTab,
    PresentTab,
    PresentSheet,
    DismissSheet,
    PresentInColumn,
    PresentPath,
    Custom,
}

impl PresentationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresentationKind::ReplaceCurrent => "replace-current",
            PresentationKind::AddToCurrent => "add-to-current",
            PresentationKind::PushInStack => "push-in-stack",
            PresentationKind::PopInStack => "pop-in-stack",
            PresentationKind::SelectTab => "select-tab",
            PresentationKind::PresentTab => "present-tab",
            PresentationKind::PresentSheet => "present-sheet",
            PresentationKind::DismissSheet => "dismiss-sheet",
            PresentationKind::PresentInColumn => "present-in-column",
            PresentationKind::PresentPath => "present-path",
            PresentationKind::Custom => "custom",
        }
    }

    /// Kinds that take a destination away instead of adding one.
    pub fn is_removal(&self) -> bool {
        matches!(self, PresentationKind::PopInStack | PresentationKind::DismissSheet)
    }
}

impl fmt::Display for PresentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The columns of a split-column group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitColumn {
    Sidebar,
    Content,
    Detail,
}

impl SplitColumn {
    pub const ALL: [SplitColumn; 3] = [SplitColumn::Sidebar, SplitColumn::Content, SplitColumn::Detail];
}

impl fmt::Display for SplitColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitColumn::Sidebar => write!(f, "sidebar"),
            SplitColumn::Content => write!(f, "content"),
            SplitColumn::Detail => write!(f, "detail"),
        }
    }
}

/// System events a destination can bind a navigation action to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SystemNavigationType {
    /// The platform back gesture or button inside a stack.
    NavigateBackInStack,
    /// The platform gesture that dismisses a sheet.
    DismissSheet,
}

impl fmt::Display for SystemNavigationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemNavigationType::NavigateBackInStack => write!(f, "back"),
            SystemNavigationType::DismissSheet => write!(f, "dismiss"),
        }
    }
}

/// Whether a request came from an interface action or from the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionType {
    #[default]
    Presentation,
    SystemNavigation(SystemNavigationType),
}

impl ActionType {
    pub fn is_system_navigation(&self) -> bool {
        matches!(self, ActionType::SystemNavigation(_))
    }
}
