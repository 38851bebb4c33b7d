use serde::{Deserialize, Serialize};

use crate::merge::error::MergeError;

/// Which end of the weighted score range the merge returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Highest weighted scores first.
    #[default]
    Forward,
    /// Lowest weighted scores first.
    Reverse,
}

impl Direction {
    pub fn flip(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// The order a source with `weight` has to be read in so that its
    /// weighted scores come out in this direction. A negative weight turns
    /// the raw order around.
    pub fn for_weight(self, weight: f64) -> Self {
        if weight.is_sign_negative() {
            self.flip()
        } else {
            self
        }
    }
}

/// How frontier entries with equal weighted scores are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Only the weighted score is compared; equal entries come out in whatever
    /// order the heap leaves them.
    #[default]
    Unspecified,
    /// Equal weighted scores rank the lower source index first.
    SourceOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    pub k: usize,
    pub direction: Direction,
    pub with_scores: bool,
    /// Emit an element that shows up in several sources only once, and count
    /// it once toward `k`.
    pub dedup: bool,
    pub tie_break: TieBreak,
}

impl Default for MergeOptions {
    fn default() -> Self {
        MergeOptions {
            k: 10,
            direction: Direction::Forward,
            with_scores: false,
            dedup: true,
            tie_break: TieBreak::Unspecified,
        }
    }
}

impl MergeOptions {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_scores(mut self, with_scores: bool) -> Self {
        self.with_scores = with_scores;
        self
    }

    pub fn dedup(mut self, dedup: bool) -> Self {
        self.dedup = dedup;
        self
    }

    pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn validate(&self) -> Result<(), MergeError> {
        if self.k < 1 {
            return Err(MergeError::InvalidK(self.k.to_string()));
        }
        Ok(())
    }
}
