//! Coalescing of per-phase query output.
//!
//! Only phases marked `keep`, plus the last phase, get a slot in the result
//! table. With at most one kept phase the report is that phase's output as
//! a flat list; with several it is one list per tracked phase in phase
//! order.

use crate::error::{QueryError, Result};
use crate::phase::Phase;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Final shape of a query's output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Report<T> {
    Flat(Vec<T>),
    Nested(Vec<Vec<T>>),
}

impl<T> Report<T> {
    pub fn is_nested(&self) -> bool {
        matches!(self, Report::Nested(_))
    }

    /// All items in phase order, regardless of shape.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Report::Flat(items) => items,
            Report::Nested(phases) => phases.into_iter().flatten().collect(),
        }
    }
}

/// Result table for one query run.
///
/// Each tracked phase has its own lock, so workers feeding different phases
/// never contend while feeds into the same phase are applied one at a time.
#[derive(Debug)]
pub struct PhaseResults<T> {
    keep_count: usize,
    table: BTreeMap<usize, Mutex<Vec<T>>>,
}

impl<T> PhaseResults<T> {
    /// Build the table for `phases`, counting kept phases.
    pub fn new(phases: &[Phase]) -> Self {
        let keep_count = phases.iter().filter(|phase| phase.keep).count();
        Self::with_keep_count(phases, keep_count)
    }

    /// Build the table with an externally computed keep count.
    ///
    /// A query without phases tracks a single implicit phase 0.
    pub fn with_keep_count(phases: &[Phase], keep_count: usize) -> Self {
        let table = if phases.is_empty() {
            BTreeMap::from([(0, Mutex::new(Vec::new()))])
        } else {
            let last = phases.len() - 1;
            phases
                .iter()
                .enumerate()
                .filter(|(index, phase)| phase.keep || *index == last)
                .map(|(index, _)| (index, Mutex::new(Vec::new())))
                .collect()
        };

        Self { keep_count, table }
    }

    pub fn keep_count(&self) -> usize {
        self.keep_count
    }

    pub fn is_tracked(&self, phase: usize) -> bool {
        self.table.contains_key(&phase)
    }

    /// Tracked phase indices in ascending order.
    pub fn tracked_phases(&self) -> Vec<usize> {
        self.table.keys().copied().collect()
    }

    /// Append `items` to the output of `phase`.
    ///
    /// Adding to a phase that is not tracked is an error and leaves the
    /// table unchanged.
    pub fn add<I>(&self, phase: usize, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let Some(slot) = self.table.get(&phase) else {
            tracing::warn!(phase, "result for untracked phase");
            return Err(QueryError::UntrackedPhase {
                phase,
                tracked: self.tracked_phases(),
            });
        };

        let mut slot = slot.lock();
        let before = slot.len();
        slot.extend(items);
        tracing::trace!(phase, added = slot.len() - before, "phase results added");
        Ok(())
    }

    /// Consume the table and produce the final report.
    pub fn into_report(self) -> Report<T> {
        let nested = self.keep_count > 1;
        let mut phases = self.table.into_values().map(|slot| slot.into_inner());

        if nested {
            Report::Nested(phases.collect())
        } else {
            Report::Flat(phases.next().unwrap_or_default())
        }
    }
}

impl<T: Clone> PhaseResults<T> {
    /// Snapshot of the report so far.
    pub fn report(&self) -> Report<T> {
        if self.keep_count > 1 {
            Report::Nested(self.table.values().map(|slot| slot.lock().clone()).collect())
        } else {
            Report::Flat(
                self.table
                    .values()
                    .next()
                    .map(|slot| slot.lock().clone())
                    .unwrap_or_default(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_keep_is_flat() {
        let phases = [Phase::map("a"), Phase::reduce("b").keep(true)];
        let results = PhaseResults::new(&phases);
        results.add(1, ["x", "y"]).unwrap();

        assert_eq!(results.report(), Report::Flat(vec!["x", "y"]));
    }

    #[test]
    fn test_multi_keep_ordered_by_phase() {
        let phases = [Phase::map("a").keep(true), Phase::reduce("b").keep(true)];
        let results = PhaseResults::new(&phases);
        results.add(1, ["b"]).unwrap();
        results.add(0, ["a"]).unwrap();

        assert_eq!(
            results.report(),
            Report::Nested(vec![vec!["a"], vec!["b"]])
        );
    }

    #[test]
    fn test_empty_query_tracks_phase_zero() {
        let results: PhaseResults<u32> = PhaseResults::new(&[]);
        assert_eq!(results.tracked_phases(), vec![0]);
        assert_eq!(results.keep_count(), 0);
        assert_eq!(results.report(), Report::Flat(vec![]));
    }

    #[test]
    fn test_last_phase_is_implicitly_kept() {
        let phases = [Phase::map("a"), Phase::map("b"), Phase::reduce("c")];
        let results: PhaseResults<u8> = PhaseResults::new(&phases);
        assert_eq!(results.tracked_phases(), vec![2]);
        assert!(!results.is_tracked(0));
    }

    #[test]
    fn test_add_to_untracked_phase_fails() {
        let phases = [Phase::map("a"), Phase::reduce("b")];
        let results = PhaseResults::new(&phases);

        assert_eq!(
            results.add(0, [1]),
            Err(QueryError::UntrackedPhase {
                phase: 0,
                tracked: vec![1]
            })
        );
        assert_eq!(results.into_report(), Report::Flat(vec![]));
    }

    #[test]
    fn test_adds_accumulate() {
        let results = PhaseResults::new(&[Phase::map("a").keep(true)]);
        results.add(0, [1, 2]).unwrap();
        results.add(0, [3]).unwrap();
        assert_eq!(results.into_report(), Report::Flat(vec![1, 2, 3]));
    }

    #[test]
    fn test_single_keep_not_last_reports_lowest_phase() {
        let phases = [Phase::map("a").keep(true), Phase::reduce("b")];
        let results = PhaseResults::new(&phases);
        assert_eq!(results.keep_count(), 1);
        results.add(0, ["kept"]).unwrap();
        results.add(1, ["last"]).unwrap();

        assert_eq!(results.report(), Report::Flat(vec!["kept"]));
    }

    #[test]
    fn test_report_serializes_untagged() {
        let flat: Report<u8> = Report::Flat(vec![1, 2]);
        let nested: Report<u8> = Report::Nested(vec![vec![1], vec![2]]);
        assert_eq!(serde_json::to_string(&flat).unwrap(), "[1,2]");
        assert_eq!(serde_json::to_string(&nested).unwrap(), "[[1],[2]]");
        assert_eq!(nested.into_items(), vec![1, 2]);
    }
}
