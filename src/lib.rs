//! StitchMatch finds where two successive scrolling screen captures overlap.
//!
//! The bottom image is slid up over the top image's bottom edge and, for each
//! candidate offset, centered row windows are compared byte for byte. The
//! deepest run of identical rows wins. Progress is streamed through a
//! [`ProgressSink`] or, with [`spawn_search`], over a channel from a worker
//! thread. Optional features add parallel best-only search (`rayon`), file
//! decoding (`image-io`), instrumentation (`tracing`) and a JSON wire format
//! (`serde`).

pub mod image;
pub mod lowlevel;
pub mod progress;
pub mod search;
pub mod stack;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use image::io;
pub use image::{RasterImage, RasterView};
pub use progress::worker::{spawn_search, SearchWorker};
pub use progress::{from_fn, Attempt, ChannelSink, Discard, EventLog, ProgressSink, SearchEvent};
pub use search::{CandidateOffset, MatchConfig, OverlapSearch, SearchOutcome};
#[cfg(feature = "serde")]
pub use search::MatchRequest;
pub use stack::{ImageId, ImageStack, OrderChange, StackedImage};
pub use util::{StitchMatchError, StitchMatchResult};
