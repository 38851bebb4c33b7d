use std::iter::FusedIterator;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::{
    heap::{is_heap, make_heap, pop_heap, push_heap},
    merge::{
        comparator::{Comparator, FrontierEntry},
        error::MergeError,
        options::MergeOptions,
    },
    source::{SortedCursor, WeightedSource},
};

/// One ranked result. `score` is the weighted score, present only when the
/// merge was asked for scores.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<E> {
    pub element: E,
    pub score: Option<f64>,
}

/// Lazy K-way merge of weighted sorted sources.
///
/// The frontier holds one entry per source that still has data. Its first
/// `active_count` slots form a heap under the direction comparator. Popping
/// moves the best entry just past the heap, where it waits until the consumer
/// asks for the next result; only then is its source advanced and the entry
/// pushed back. Nothing is read ahead of what the consumer has pulled.
pub struct TopKMerge<C: SortedCursor> {
    // `None` once the source is exhausted and closed
    cursors: Vec<Option<C>>,
    frontier: Vec<FrontierEntry<C::Element>>,
    active_count: usize,
    comparator: Comparator,
    options: MergeOptions,
    seen: FxHashSet<C::Element>,
    emitted: usize,
    // the entry at `frontier[active_count]` was handed out and its source
    // has not been advanced yet
    pending_advance: bool,
    failed: bool,
}

impl<C: SortedCursor> TopKMerge<C> {
    /// Validates the options and weights, then seeds and heapifies the
    /// frontier. Nothing is read from a cursor if validation fails.
    pub fn new(
        sources: Vec<WeightedSource<C>>,
        options: MergeOptions,
    ) -> Result<Self, MergeError> {
        options.validate()?;
        if let Some(source) = sources.iter().find(|source| !source.weight.is_finite()) {
            return Err(MergeError::InvalidWeight(source.weight.to_string()));
        }

        let comparator = Comparator::new(options.direction, options.tie_break);
        let mut cursors = Vec::with_capacity(sources.len());
        let mut frontier = Vec::with_capacity(sources.len());

        for (source_index, source) in sources.into_iter().enumerate() {
            let WeightedSource { mut cursor, weight } = source;
            let head = cursor
                .current()
                .map(|(element, raw_score)| (element.clone(), raw_score));

            match head {
                Some((element, raw_score)) => {
                    frontier.push(FrontierEntry {
                        source_index,
                        element,
                        raw_score,
                        weight,
                    });
                    cursors.push(Some(cursor));
                }
                None => {
                    cursor.close();
                    cursors.push(None);
                }
            }
        }

        let active_count = frontier.len();
        make_heap(&mut frontier, 0, active_count, |a, b| comparator.compare(a, b));
        debug!(
            sources = cursors.len(),
            seeded = active_count,
            k = options.k,
            direction = ?options.direction,
            "seeded merge frontier"
        );

        Ok(Self {
            cursors,
            frontier,
            active_count,
            comparator,
            options,
            seen: FxHashSet::default(),
            emitted: 0,
            pending_advance: false,
            failed: false,
        })
    }

    /// Number of sources that still have an entry in the heap.
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Number of results handed out so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn pop_candidate(&mut self) {
        let comparator = self.comparator;
        pop_heap(&mut self.frontier, 0, self.active_count, |a, b| {
            comparator.compare(a, b)
        });
        self.active_count -= 1;
    }

    // Advances the source of the entry parked at `frontier[active_count]` and
    // either pushes its next element back into the heap or retires the source.
    fn advance_candidate(&mut self) -> Result<(), MergeError> {
        let slot = self.active_count;
        let source_index = self.frontier[slot].source_index;
        // a source is only retired once its parked entry has been dropped
        let cursor = self.cursors[source_index]
            .as_mut()
            .expect("parked entry's source is still open");

        let has_next = cursor
            .advance()
            .map_err(|source| MergeError::Source {
                source_index,
                source,
            })?;

        if has_next {
            if let Some((element, raw_score)) = cursor.current() {
                let entry = &mut self.frontier[slot];
                entry.element = element.clone();
                entry.raw_score = raw_score;
                self.active_count += 1;

                let comparator = self.comparator;
                push_heap(&mut self.frontier, 0, self.active_count, |a, b| {
                    comparator.compare(a, b)
                });
                debug_assert!(is_heap(&self.frontier, 0, self.active_count, |a, b| {
                    comparator.compare(a, b)
                }));
                return Ok(());
            }
        }

        self.retire(source_index);
        Ok(())
    }

    fn retire(&mut self, source_index: usize) {
        if let Some(mut cursor) = self.cursors[source_index].take() {
            cursor.close();
        }
        debug!(
            source_index,
            remaining = self.active_count,
            "source exhausted"
        );
    }

    fn fail(&mut self, err: MergeError) -> Option<Result<Ranked<C::Element>, MergeError>> {
        self.failed = true;
        Some(Err(err))
    }
}

impl<C: SortedCursor> Iterator for TopKMerge<C> {
    type Item = Result<Ranked<C::Element>, MergeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.emitted >= self.options.k {
            return None;
        }
        if self.pending_advance {
            self.pending_advance = false;
            if let Err(err) = self.advance_candidate() {
                return self.fail(err);
            }
        }

        while self.emitted < self.options.k && self.active_count > 0 {
            self.pop_candidate();
            let candidate = &self.frontier[self.active_count];

            if self.options.dedup && !self.seen.insert(candidate.element.clone()) {
                // already emitted from another source, doesn't count toward k
                if let Err(err) = self.advance_candidate() {
                    return self.fail(err);
                }
                continue;
            }

            let ranked = Ranked {
                element: candidate.element.clone(),
                score: self
                    .options
                    .with_scores
                    .then(|| candidate.weighted_score()),
            };
            self.emitted += 1;
            self.pending_advance = true;
            return Some(Ok(ranked));
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        (0, Some(self.options.k - self.emitted))
    }
}

impl<C: SortedCursor> FusedIterator for TopKMerge<C> {}

impl<C: SortedCursor> Drop for TopKMerge<C> {
    fn drop(&mut self) {
        for mut cursor in self.cursors.iter_mut().filter_map(Option::take) {
            cursor.close();
        }
    }
}

/// Runs a merge to completion and collects the results.
pub fn merge_top_k<C: SortedCursor>(
    sources: Vec<WeightedSource<C>>,
    options: MergeOptions,
) -> Result<Vec<Ranked<C::Element>>, MergeError> {
    TopKMerge::new(sources, options)?.collect()
}
