use std::{hash::Hash, io};

use thiserror::Error;

/// Failure while reading from a sorted source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("read failed: {0}")]
    Read(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Forward-only cursor over one sorted sequence of (element, score) pairs.
///
/// The cursor is created already positioned on its first element (or
/// exhausted, when the sequence is empty). Its direction is fixed at creation
/// and is judged on weighted scores: they must not increase for a forward
/// merge and must not decrease for a reverse merge.
pub trait SortedCursor {
    type Element: Clone + Eq + Hash;

    /// The element under the cursor, `None` once exhausted.
    fn current(&self) -> Option<(&Self::Element, f64)>;

    /// Moves to the next element. Returns `Ok(false)` when there is none, after
    /// which `current` returns `None`.
    fn advance(&mut self) -> Result<bool, SourceError>;

    /// Releases whatever the cursor holds on to. Called exactly once by the
    /// merge engine, whether the source ran dry or the merge stopped early.
    fn close(&mut self);
}

/// A cursor paired with the weight its raw scores are multiplied by.
///
/// A negative weight reverses the order of the raw scores, so such a cursor
/// has to read its sequence the other way round; see `Direction::for_weight`.
pub struct WeightedSource<C> {
    pub cursor: C,
    pub weight: f64,
}

impl<C: SortedCursor> WeightedSource<C> {
    pub fn new(cursor: C) -> Self {
        Self::with_weight(cursor, 1.0)
    }

    pub fn with_weight(cursor: C, weight: f64) -> Self {
        Self { cursor, weight }
    }
}

impl<C: SortedCursor> From<C> for WeightedSource<C> {
    fn from(cursor: C) -> Self {
        Self::new(cursor)
    }
}
