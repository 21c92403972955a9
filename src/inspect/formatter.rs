use crate::destination::Destination;
use crate::flow::Flow;
use crate::group::{Group, GroupCoordinator};
use crate::routing::{DestinationId, Routing};
use itertools::Itertools;
use std::fmt::{self, Write};

/// Renders the live graph of a flow as a tree.
///
/// Group children come first, each labelled with its tab or column, then
/// plain children, then the presented sheet. The current destination is
/// marked with `*`.
pub struct GraphFormatter<'a, R: Routing> {
    flow: &'a Flow<R>,
}

impl<'a, R: Routing> GraphFormatter<'a, R> {
    pub fn new(flow: &'a Flow<R>) -> Self {
        Self { flow }
    }

    pub fn format(&self) -> String {
        let mut out = String::new();
        match self.flow.root_destination_id() {
            Some(root) => {
                // Writing into a String cannot fail.
                let _ = self.fmt_node(&mut out, root, "", true, None);
            }
            None => out.push_str("<empty flow>\n"),
        }
        out
    }

    fn fmt_node(
        &self,
        out: &mut String,
        id: DestinationId,
        prefix: &str,
        is_last: bool,
        slot: Option<String>,
    ) -> fmt::Result {
        let Some(destination) = self.flow.destination(id) else {
            return writeln!(out, "{}└── <missing {}>", prefix, id);
        };
        let is_root = self.flow.root_destination_id() == Some(id);
        let node_marker = match (is_root, is_last) {
            (true, _) => "",
            (false, true) => "└── ",
            (false, false) => "├── ",
        };
        write!(out, "{}{}", prefix, node_marker)?;
        if let Some(slot) = slot {
            write!(out, "{}: ", slot)?;
        }
        writeln!(out, "{}", self.describe(destination))?;

        let child_prefix = if is_root {
            String::new()
        } else {
            format!("{}{}", prefix, if is_last { "    " } else { "│   " })
        };
        let children = self.children(destination);
        let count = children.len();
        for (index, (child, slot)) in children.into_iter().enumerate() {
            self.fmt_node(out, child, &child_prefix, index + 1 == count, slot)?;
        }
        Ok(())
    }

    fn describe(&self, destination: &Destination<R>) -> String {
        let mut line = format!("{:?} ({})", destination.destination_type(), destination.id());
        if let Some(group) = destination.group() {
            let detail = match group {
                Group::Stack(stack) => format!("stack, depth {}", stack.len()),
                Group::Tabs(tabs) => format!(
                    "tabs [{}], selected {:?}",
                    tabs.tabs().iter().map(|slot| format!("{:?}", slot.tab)).join(", "),
                    tabs.selected_tab()
                ),
                Group::Columns(columns) => format!(
                    "columns [{}]",
                    columns.columns().iter().join(", ")
                ),
            };
            line.push_str(&format!(" <{}>", detail));
        }
        if !self.flow.is_active(destination.id()) {
            line.push_str(" (inactive)");
        }
        if self.flow.current_destination_id() == Some(destination.id()) {
            line.push_str(" *");
        }
        line
    }

    fn children(&self, destination: &Destination<R>) -> Vec<(DestinationId, Option<String>)> {
        let mut children: Vec<(DestinationId, Option<String>)> = Vec::new();
        if let Some(group) = destination.group() {
            for child in group.children() {
                let slot = match group {
                    Group::Stack(_) => None,
                    Group::Tabs(tabs) => tabs.tab_for_child(*child).map(|tab| format!("{:?}", tab)),
                    Group::Columns(columns) => columns.column_for_child(*child).map(|c| c.to_string()),
                };
                children.push((*child, slot));
            }
        }
        let sheet = destination.presented_sheet();
        for child in self.flow.registry().children_of(destination.id()) {
            let listed = children.iter().any(|(id, _)| *id == child);
            if !listed && Some(child) != sheet {
                children.push((child, None));
            }
        }
        if let Some(sheet) = sheet {
            children.push((sheet, Some("sheet".to_string())));
        }
        children
    }
}

impl<R: Routing> fmt::Display for GraphFormatter<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}
