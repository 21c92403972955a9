use crate::presentation::PresentationConfiguration;
use crate::routing::{PresentationId, Routing};
use std::collections::VecDeque;

/// Serial queue for multi-step presentations.
///
/// At most one step is in flight. The next step leaves the queue only once
/// the step in flight has finalized.
pub(crate) struct PathQueue<R: Routing> {
    steps: VecDeque<PresentationConfiguration<R>>,
    in_flight: Option<PresentationId>,
    /// Requests that arrived while the path was running.
    held: VecDeque<PresentationConfiguration<R>>,
}

impl<R: Routing> Default for PathQueue<R> {
    fn default() -> Self {
        Self {
            steps: VecDeque::new(),
            in_flight: None,
            held: VecDeque::new(),
        }
    }
}

impl<R: Routing> PathQueue<R> {
    pub(crate) fn is_active(&self) -> bool {
        self.in_flight.is_some() || !self.steps.is_empty()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.steps.len()
    }

    pub(crate) fn held(&self) -> usize {
        self.held.len()
    }

    pub(crate) fn in_flight(&self) -> Option<PresentationId> {
        self.in_flight
    }

    pub(crate) fn extend(&mut self, steps: impl IntoIterator<Item = PresentationConfiguration<R>>) {
        self.steps.extend(steps);
    }

    pub(crate) fn hold(&mut self, configuration: PresentationConfiguration<R>) {
        self.held.push_back(configuration);
    }

    /// Takes the next step and marks it in flight. `None` while another step is running.
    pub(crate) fn next_step(&mut self) -> Option<PresentationConfiguration<R>> {
        if self.in_flight.is_some() {
            return None;
        }
        let step = self.steps.pop_front()?;
        self.in_flight = Some(step.id);
        Some(step)
    }

    /// Releases a held request once the path has drained.
    pub(crate) fn next_held(&mut self) -> Option<PresentationConfiguration<R>> {
        if self.is_active() {
            return None;
        }
        self.held.pop_front()
    }

    /// Records that `id` finalized. Returns `true` if it was the step in flight.
    pub(crate) fn settle(&mut self, id: PresentationId) -> bool {
        if self.in_flight == Some(id) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Drops every queued step, returning how many were discarded.
    pub(crate) fn abort(&mut self) -> usize {
        let dropped = self.steps.len();
        self.steps.clear();
        dropped
    }
}
