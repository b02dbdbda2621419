//! Background search worker.
//!
//! Inputs are validated on the caller's thread; the search itself runs on a
//! dedicated thread that owns both images and reports through an ordered
//! channel. There are no cancellation points: a caller that needs a deadline
//! uses [`SearchWorker::recv_timeout`] and drops the worker when it expires.

use crate::image::RasterImage;
use crate::progress::{ChannelSink, SearchEvent};
use crate::search::{MatchConfig, OverlapSearch, SearchOutcome};
use crate::trace::trace_span;
use crate::util::{StitchMatchError, StitchMatchResult};
use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Handle to a search running on its own thread.
#[derive(Debug)]
pub struct SearchWorker {
    events: Receiver<SearchEvent>,
    handle: JoinHandle<SearchOutcome>,
}

/// Validates the inputs and starts the search on a new thread.
pub fn spawn_search(
    top: RasterImage,
    bottom: RasterImage,
    cfg: MatchConfig,
) -> StitchMatchResult<SearchWorker> {
    let search = OverlapSearch::new(cfg);
    let space = search.prepare(top.view(), bottom.view())?;
    let (tx, rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        let _span = trace_span!("worker", candidates = space.len()).entered();
        let mut sink = ChannelSink::new(tx);
        search.run_prepared(top.view(), bottom.view(), space, &mut sink)
    });

    Ok(SearchWorker { events: rx, handle })
}

impl SearchWorker {
    /// Blocks for the next event.
    ///
    /// Fails once the stream has ended and every event was received.
    pub fn recv(&self) -> Result<SearchEvent, RecvError> {
        self.events.recv()
    }

    /// Blocks for the next event, giving up after `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<SearchEvent, RecvTimeoutError> {
        self.events.recv_timeout(timeout)
    }

    /// Iterates over events until the stream ends.
    pub fn events(&self) -> impl Iterator<Item = SearchEvent> + '_ {
        self.events.iter()
    }

    /// Waits for the search thread and returns its outcome.
    ///
    /// Events not yet received are discarded.
    pub fn join(self) -> StitchMatchResult<SearchOutcome> {
        drop(self.events);
        self.handle.join().map_err(|_| StitchMatchError::WorkerPanicked)
    }
}
