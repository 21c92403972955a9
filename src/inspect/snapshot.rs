use crate::flow::Flow;
use crate::group::{Group, GroupCoordinator, GroupKind};
use crate::routing::{DestinationId, Routing};
use serde::Serialize;

/// A serializable picture of a flow's live graph.
#[derive(Debug, Clone, Serialize)]
pub struct FlowSnapshot {
    pub root: Option<String>,
    pub current: Option<String>,
    /// Active destinations in activation order.
    pub destinations: Vec<DestinationSnapshot>,
    pub pending_presentations: usize,
    pub queued_path_steps: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DestinationSnapshot {
    pub id: String,
    pub destination_type: String,
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presented_sheet: Option<String>,
    pub is_current: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSnapshot {
    pub kind: GroupKind,
    pub children: Vec<String>,
    pub current_child: Option<String>,
    /// The selected tab of a tab set, or the focused column of a split view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
}

fn label(id: DestinationId) -> String {
    id.to_string()
}

impl FlowSnapshot {
    pub fn capture<R: Routing>(flow: &Flow<R>) -> Self {
        let current = flow.current_destination_id();
        let destinations = flow
            .active_destinations()
            .iter()
            .filter_map(|id| flow.destination(*id))
            .map(|destination| DestinationSnapshot {
                id: label(destination.id()),
                destination_type: format!("{:?}", destination.destination_type()),
                parent: destination.parent_id().map(label),
                content: destination.content().map(|content| format!("{:?}", content)),
                group: destination.group().map(GroupSnapshot::capture),
                presented_sheet: destination.presented_sheet().map(label),
                is_current: current == Some(destination.id()),
            })
            .collect();
        Self {
            root: flow.root_destination_id().map(label),
            current: current.map(label),
            destinations,
            pending_presentations: flow.pending_presentations().len(),
            queued_path_steps: flow.queued_path_steps(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl GroupSnapshot {
    fn capture<R: Routing>(group: &Group<R>) -> Self {
        let selection = match group {
            Group::Stack(_) => None,
            Group::Tabs(tabs) => Some(format!("{:?}", tabs.selected_tab())),
            Group::Columns(columns) => columns.focused_column().map(|column| column.to_string()),
        };
        Self {
            kind: group.kind(),
            children: group.children().iter().copied().map(label).collect(),
            current_child: group.current_child().map(label),
            selection,
        }
    }
}
