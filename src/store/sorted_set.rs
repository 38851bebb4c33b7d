use std::{
    cmp::Ordering,
    collections::{BTreeSet, btree_set},
    iter::Rev,
};

use rustc_hash::FxHashMap;

use crate::{
    merge::Direction,
    source::{SortedCursor, SourceError},
};

// --- f64 wrapper so scores can live in a BTreeSet ---

#[derive(Debug, Clone, Copy)]
struct Score(f64);

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Ordered by score, then member, like a sorted set's rank order
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ScoredMember {
    score: Score,
    member: String,
}

/// In-memory sorted set: unique members, each with a score, iterable by rank.
#[derive(Debug, Clone, Default)]
pub struct SortedSet {
    scores: FxHashMap<String, f64>,
    ordered: BTreeSet<ScoredMember>,
}

impl SortedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `member` or updates its score. Returns true if the member is new.
    pub fn add(&mut self, member: impl Into<String>, score: f64) -> bool {
        let member = member.into();
        let is_new = match self.scores.insert(member.clone(), score) {
            Some(old_score) => {
                self.ordered.remove(&ScoredMember {
                    score: Score(old_score),
                    member: member.clone(),
                });
                false
            }
            None => true,
        };
        self.ordered.insert(ScoredMember {
            score: Score(score),
            member,
        });
        is_new
    }

    pub fn remove(&mut self, member: &str) -> bool {
        match self.scores.remove(member) {
            Some(score) => {
                self.ordered.remove(&ScoredMember {
                    score: Score(score),
                    member: member.to_string(),
                });
                true
            }
            None => false,
        }
    }

    pub fn score(&self, member: &str) -> Option<f64> {
        self.scores.get(member).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Cursor over the members in merge order for `direction`: highest score
    /// first for forward, lowest first for reverse.
    pub fn cursor(&self, direction: Direction) -> SortedSetCursor<'_> {
        let mut members = match direction {
            Direction::Forward => Members::Descending(self.ordered.iter().rev()),
            Direction::Reverse => Members::Ascending(self.ordered.iter()),
        };
        let current = members.next();
        SortedSetCursor { members, current }
    }
}

enum Members<'a> {
    Ascending(btree_set::Iter<'a, ScoredMember>),
    Descending(Rev<btree_set::Iter<'a, ScoredMember>>),
}

impl<'a> Iterator for Members<'a> {
    type Item = &'a ScoredMember;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Members::Ascending(iter) => iter.next(),
            Members::Descending(iter) => iter.next(),
        }
    }
}

/// Borrowing cursor over a [`SortedSet`].
pub struct SortedSetCursor<'a> {
    members: Members<'a>,
    current: Option<&'a ScoredMember>,
}

impl SortedCursor for SortedSetCursor<'_> {
    type Element = String;

    fn current(&self) -> Option<(&String, f64)> {
        self.current.map(|entry| (&entry.member, entry.score.0))
    }

    fn advance(&mut self) -> Result<bool, SourceError> {
        if self.current.is_none() {
            return Ok(false);
        }
        self.current = self.members.next();
        Ok(self.current.is_some())
    }

    fn close(&mut self) {
        self.current = None;
    }
}
