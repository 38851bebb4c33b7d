use std::cmp::Ordering;

use crate::merge::options::{Direction, TieBreak};

/// One live candidate in the merge frontier: the element currently under a
/// source's cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontierEntry<E> {
    pub source_index: usize,
    pub element: E,
    pub raw_score: f64,
    pub weight: f64,
}

impl<E> FrontierEntry<E> {
    pub fn weighted_score(&self) -> f64 {
        self.raw_score * self.weight
    }
}

/// Ranks frontier entries for the array heap, built once per merge from the
/// requested direction.
///
/// `compare(a, b) == Ordering::Less` means `a` should come out after `b`.
#[derive(Debug, Clone, Copy)]
pub struct Comparator {
    direction: Direction,
    tie_break: TieBreak,
}

impl Comparator {
    pub fn new(direction: Direction, tie_break: TieBreak) -> Self {
        Self {
            direction,
            tie_break,
        }
    }

    pub fn compare<E>(&self, a: &FrontierEntry<E>, b: &FrontierEntry<E>) -> Ordering {
        let by_score = a.weighted_score().total_cmp(&b.weighted_score());
        let by_score = match self.direction {
            Direction::Forward => by_score,
            Direction::Reverse => by_score.reverse(),
        };

        match self.tie_break {
            TieBreak::Unspecified => by_score,
            TieBreak::SourceOrder => {
                by_score.then_with(|| b.source_index.cmp(&a.source_index))
            }
        }
    }
}
