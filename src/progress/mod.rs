//! Progress reporting for overlap searches.
//!
//! A search reports every [`Attempt`] and a single terminal
//! [`SearchEvent::Exhausted`] through a [`ProgressSink`], strictly in
//! candidate order and, within a candidate, in increasing depth. Sinks
//! return nothing to the search, so a slow or disconnected consumer can
//! never change its result.

use crate::search::CandidateOffset;
use std::sync::mpsc::Sender;

pub mod worker;

/// Snapshot of the contiguous match depth reached for one candidate.
///
/// `lines` is the depth at the moment of emission, not necessarily the
/// final depth of the candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Attempt {
    /// Horizontal displacement of the bottom image from centered alignment.
    pub x_offset: isize,
    /// Rows of the bottom image overlapping the top image's bottom edge.
    pub y_offset: usize,
    /// Contiguous matching rows so far.
    pub lines: usize,
}

impl Attempt {
    pub(crate) fn new(candidate: CandidateOffset, lines: usize) -> Self {
        Self {
            x_offset: candidate.x_offset,
            y_offset: candidate.y_offset,
            lines,
        }
    }

    /// Returns the candidate this attempt belongs to.
    pub fn candidate(&self) -> CandidateOffset {
        CandidateOffset {
            x_offset: self.x_offset,
            y_offset: self.y_offset,
        }
    }
}

/// Message in the ordered response stream of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "camelCase")
)]
pub enum SearchEvent {
    /// Progress for one candidate.
    Attempt(Attempt),
    /// The whole bounded candidate space has been evaluated.
    Exhausted,
}

impl SearchEvent {
    /// Returns the attempt carried by this event, if any.
    pub fn attempt(&self) -> Option<&Attempt> {
        match self {
            SearchEvent::Attempt(attempt) => Some(attempt),
            SearchEvent::Exhausted => None,
        }
    }

    /// Returns true for the terminal event.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, SearchEvent::Exhausted)
    }
}

/// One-way, ordered consumer of search progress.
pub trait ProgressSink {
    /// Receives the next event of the stream.
    fn emit(&mut self, event: SearchEvent);
}

impl<S: ProgressSink + ?Sized> ProgressSink for &mut S {
    fn emit(&mut self, event: SearchEvent) {
        (**self).emit(event);
    }
}

impl<S: ProgressSink + ?Sized> ProgressSink for Box<S> {
    fn emit(&mut self, event: SearchEvent) {
        (**self).emit(event);
    }
}

/// Sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl ProgressSink for Discard {
    fn emit(&mut self, _event: SearchEvent) {}
}

/// Sink that records the full stream in memory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<SearchEvent>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events in emission order.
    pub fn events(&self) -> &[SearchEvent] {
        &self.events
    }

    /// Iterates over the recorded attempts, skipping the terminal event.
    pub fn attempts(&self) -> impl Iterator<Item = &Attempt> + '_ {
        self.events.iter().filter_map(SearchEvent::attempt)
    }

    /// Returns the attempts emitted for one candidate.
    pub fn attempts_for(&self, candidate: CandidateOffset) -> Vec<Attempt> {
        self.attempts()
            .filter(|a| a.candidate() == candidate)
            .copied()
            .collect()
    }

    /// Counts terminal events seen so far.
    pub fn exhausted_count(&self) -> usize {
        self.events.iter().filter(|e| e.is_exhausted()).count()
    }

    /// Consumes the log and returns the events.
    pub fn into_events(self) -> Vec<SearchEvent> {
        self.events
    }
}

impl ProgressSink for EventLog {
    fn emit(&mut self, event: SearchEvent) {
        self.events.push(event);
    }
}

/// Sink forwarding events over an unbounded channel.
///
/// Sending never blocks. Once the receiver hangs up, further events are
/// dropped and the search runs to completion regardless.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: Sender<SearchEvent>,
    disconnected: bool,
}

impl ChannelSink {
    /// Wraps the sending half of a channel.
    pub fn new(tx: Sender<SearchEvent>) -> Self {
        Self {
            tx,
            disconnected: false,
        }
    }

    /// Returns true once a send failed because the receiver was dropped.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&mut self, event: SearchEvent) {
        if self.disconnected {
            return;
        }
        if self.tx.send(event).is_err() {
            self.disconnected = true;
        }
    }
}

/// Sink adapter around a closure, see [`from_fn`].
#[derive(Clone, Debug)]
pub struct FnSink<F> {
    f: F,
}

impl<F: FnMut(SearchEvent)> ProgressSink for FnSink<F> {
    fn emit(&mut self, event: SearchEvent) {
        (self.f)(event);
    }
}

/// Creates a sink that calls `f` for every event.
pub fn from_fn<F: FnMut(SearchEvent)>(f: F) -> FnSink<F> {
    FnSink { f }
}

#[cfg(test)]
mod tests {
    use super::{from_fn, Attempt, ChannelSink, EventLog, ProgressSink, SearchEvent};
    use std::sync::mpsc;

    fn attempt(lines: usize) -> SearchEvent {
        SearchEvent::Attempt(Attempt {
            x_offset: -1,
            y_offset: 3,
            lines,
        })
    }

    #[test]
    fn event_log_keeps_emission_order() {
        let mut log = EventLog::new();
        log.emit(attempt(0));
        log.emit(attempt(1));
        log.emit(SearchEvent::Exhausted);
        assert_eq!(log.events().len(), 3);
        let lines: Vec<usize> = log.attempts().map(|a| a.lines).collect();
        assert_eq!(lines, vec![0, 1]);
        assert_eq!(log.exhausted_count(), 1);
    }

    #[test]
    fn channel_sink_survives_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        let mut sink = ChannelSink::new(tx);
        sink.emit(attempt(0));
        assert_eq!(rx.recv().unwrap(), attempt(0));
        drop(rx);
        sink.emit(attempt(1));
        assert!(sink.is_disconnected());
        sink.emit(SearchEvent::Exhausted);
    }

    #[test]
    fn closure_sink_sees_every_event() {
        let mut count = 0usize;
        {
            let mut sink = from_fn(|_| count += 1);
            let sink_ref: &mut dyn ProgressSink = &mut sink;
            sink_ref.emit(attempt(0));
            sink_ref.emit(SearchEvent::Exhausted);
        }
        assert_eq!(count, 2);
    }
}
