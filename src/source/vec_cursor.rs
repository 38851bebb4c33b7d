use std::hash::Hash;

use crate::{
    merge::Direction,
    source::cursor::{SortedCursor, SourceError},
};

// Cursor over an owned list of (element, score) pairs that is already in the
// order the merge expects.
pub struct VecCursor<E> {
    items: Vec<(E, f64)>,
    position: usize,
    closed: bool,
}

impl<E> VecCursor<E> {
    /// `items` must already be ordered for the merge direction.
    pub fn new(items: Vec<(E, f64)>) -> Self {
        Self {
            items,
            position: 0,
            closed: false,
        }
    }

    /// Sorts `items` into the order a merge in `direction` reads them:
    /// descending scores for forward, ascending for reverse.
    pub fn sorted(mut items: Vec<(E, f64)>, direction: Direction) -> Self {
        match direction {
            Direction::Forward => items.sort_by(|a, b| b.1.total_cmp(&a.1)),
            Direction::Reverse => items.sort_by(|a, b| a.1.total_cmp(&b.1)),
        }
        Self::new(items)
    }
}

impl<E: Clone + Eq + Hash> SortedCursor for VecCursor<E> {
    type Element = E;

    fn current(&self) -> Option<(&E, f64)> {
        if self.closed {
            return None;
        }
        self.items
            .get(self.position)
            .map(|(element, score)| (element, *score))
    }

    fn advance(&mut self) -> Result<bool, SourceError> {
        if self.closed || self.position >= self.items.len() {
            return Ok(false);
        }
        self.position += 1;
        Ok(self.position < self.items.len())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
