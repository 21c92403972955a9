//! The boundary between the engine and whatever renders destinations.
//!
//! A `Flow` describes each graph change as a `Transition` and hands it to its
//! `PresentationAdapter`. The adapter either reports the outcome right away or
//! defers it, in which case the host calls `Flow::activate_completion_closure`
//! once the real transition finishes.

use crate::presentation::{ActionType, PresentationKind};
use crate::routing::{DestinationId, PresentationId, Routing};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex};

/// One requested UI transition.
#[derive(Clone)]
pub struct Transition<R: Routing> {
    pub presentation_id: PresentationId,
    pub kind: PresentationKind,
    pub action_type: ActionType,
    /// The destination the request was issued from.
    pub source: Option<DestinationId>,
    /// The destination being presented, or the one revealed by a removal.
    pub target: Option<DestinationId>,
    /// The group or parent that hosts the change.
    pub host: Option<DestinationId>,
    pub destination_type: Option<R::DestinationType>,
}

impl<R: Routing> fmt::Debug for Transition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("presentation_id", &self.presentation_id)
            .field("kind", &self.kind)
            .field("action_type", &self.action_type)
            .field("source", &self.source)
            .field("target", &self.target)
            .field("host", &self.host)
            .field("destination_type", &self.destination_type)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The transition is over; the flag says whether it succeeded.
    Finished(bool),
    /// The adapter will report back through `Flow::activate_completion_closure`.
    Deferred,
}

pub trait PresentationAdapter<R: Routing>: Send {
    fn perform_transition(&mut self, transition: &Transition<R>) -> TransitionOutcome;
}

/// Finishes every transition successfully on the spot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateAdapter;

impl<R: Routing> PresentationAdapter<R> for ImmediateAdapter {
    fn perform_transition(&mut self, _transition: &Transition<R>) -> TransitionOutcome {
        TransitionOutcome::Finished(true)
    }
}

/// A transition as seen by a `RecordingAdapter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionRecord {
    pub presentation_id: String,
    pub kind: PresentationKind,
    pub system_navigation: bool,
    pub source: Option<String>,
    pub target: Option<String>,
    pub host: Option<String>,
    pub destination_type: Option<String>,
}

impl fmt::Display for TransitionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let or_dash = |id: &Option<String>| id.clone().unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "[{}] {:<18} {} -> {}",
            self.presentation_id,
            self.kind.as_str(),
            or_dash(&self.source),
            or_dash(&self.target)
        )?;
        if let Some(destination_type) = &self.destination_type {
            write!(f, " ({})", destination_type)?;
        }
        if self.system_navigation {
            write!(f, " [system]")?;
        }
        Ok(())
    }
}

/// Logs every transition into a shared list. Clones share the same log.
///
/// With `deferring` set, every transition is left for the host to complete.
#[derive(Debug, Clone, Default)]
pub struct RecordingAdapter {
    records: Arc<Mutex<Vec<TransitionRecord>>>,
    deferring: bool,
}

impl RecordingAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deferring() -> Self {
        Self {
            records: Arc::default(),
            deferring: true,
        }
    }

    pub fn records(&self) -> Vec<TransitionRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn kinds(&self) -> Vec<PresentationKind> {
        self.records().into_iter().map(|record| record.kind).collect()
    }

    pub fn clear(&self) {
        match self.records.lock() {
            Ok(mut records) => records.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl<R: Routing> PresentationAdapter<R> for RecordingAdapter {
    fn perform_transition(&mut self, transition: &Transition<R>) -> TransitionOutcome {
        let record = TransitionRecord {
            presentation_id: transition.presentation_id.to_string(),
            kind: transition.kind,
            system_navigation: transition.action_type.is_system_navigation(),
            source: transition.source.map(|id| id.to_string()),
            target: transition.target.map(|id| id.to_string()),
            host: transition.host.map(|id| id.to_string()),
            destination_type: transition.destination_type.as_ref().map(|t| format!("{:?}", t)),
        };
        match self.records.lock() {
            Ok(mut records) => records.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
        if self.deferring {
            TransitionOutcome::Deferred
        } else {
            TransitionOutcome::Finished(true)
        }
    }
}
