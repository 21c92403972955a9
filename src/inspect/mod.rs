//! Read-only views of a flow, for debugging and tooling.

mod formatter;
mod snapshot;

pub use formatter::GraphFormatter;
pub use snapshot::{DestinationSnapshot, FlowSnapshot, GroupSnapshot};
