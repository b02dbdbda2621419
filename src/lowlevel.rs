//! Building blocks of the overlap search.
//!
//! These expose the candidate space, the row comparator and the per-candidate
//! evaluator for callers that drive the enumeration themselves, for example
//! to evaluate only a subset of offsets. Most users should prefer
//! [`OverlapSearch`](crate::OverlapSearch).

pub use crate::search::overlay::Evaluation;
pub use crate::search::{
    Candidates, LineMatcher, OffsetSearchSpace, OverlayEvaluator, SearchState, FIRST_Y_OFFSET,
};
