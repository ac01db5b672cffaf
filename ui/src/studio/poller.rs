//! Supervision of the per-prediction poll timers.
//!
//! Each pending prediction gets an independent one-shot timer chain. The
//! supervisor does not own the timers themselves (they are spawned futures
//! that cannot be killed); instead it tracks which generation of the pending
//! set is live. Every tick carries the generation it was scheduled under, and
//! a tick from a stale generation is dropped without being rescheduled, which
//! drains the chain.

use std::collections::HashSet;

/// Fixed poll period for still-pending predictions.
pub const POLL_INTERVAL_MS: u64 = 3000;

#[derive(Debug, Default, Clone)]
pub struct PollSupervisor {
    generation: u64,
    active: HashSet<String>,
}

impl PollSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the supervised set with the current pending predictions and
    /// invalidates every previously issued timer. Returns the new generation
    /// for the caller to stamp onto fresh timers.
    pub fn reschedule<I>(&mut self, pending: I) -> u64
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.generation += 1;
        self.active = pending.into_iter().map(Into::into).collect();
        self.generation
    }

    /// Whether a tick stamped with `generation` for `prediction_id` is still
    /// authoritative.
    pub fn is_current(&self, generation: u64, prediction_id: &str) -> bool {
        generation == self.generation && self.active.contains(prediction_id)
    }

    /// A prediction that reached a terminal state stops being supervised
    /// without disturbing its siblings' timers.
    pub fn retire(&mut self, prediction_id: &str) {
        self.active.remove(prediction_id);
    }

    pub fn supervised_count(&self) -> usize {
        self.active.len()
    }

    /// Tears everything down (component unmount).
    pub fn clear(&mut self) {
        self.generation += 1;
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reschedule_invalidates_previous_generations() {
        let mut supervisor = PollSupervisor::new();
        let first = supervisor.reschedule(["p-1", "p-2"]);
        assert!(supervisor.is_current(first, "p-1"));

        let second = supervisor.reschedule(["p-1"]);
        assert!(supervisor.is_current(second, "p-1"));
        assert!(!supervisor.is_current(first, "p-1"));
        assert!(!supervisor.is_current(second, "p-2"));
    }

    #[test]
    fn retiring_one_prediction_leaves_siblings_supervised() {
        let mut supervisor = PollSupervisor::new();
        let generation = supervisor.reschedule(["p-1", "p-2", "p-3"]);

        supervisor.retire("p-2");
        assert!(!supervisor.is_current(generation, "p-2"));
        assert!(supervisor.is_current(generation, "p-1"));
        assert!(supervisor.is_current(generation, "p-3"));
        assert_eq!(supervisor.supervised_count(), 2);
    }

    #[test]
    fn clear_drops_every_timer() {
        let mut supervisor = PollSupervisor::new();
        let generation = supervisor.reschedule(["p-1"]);
        supervisor.clear();
        assert!(!supervisor.is_current(generation, "p-1"));
        assert_eq!(supervisor.supervised_count(), 0);
    }

    #[test]
    fn a_prediction_with_no_result_stays_supervised_across_reschedules() {
        // There is no timeout or give-up bound: a hung request simply keeps
        // its prediction in the supervised set for as long as it is pending.
        let mut supervisor = PollSupervisor::new();
        for _ in 0..100 {
            let generation = supervisor.reschedule(["p-hung"]);
            assert!(supervisor.is_current(generation, "p-hung"));
        }
        assert_eq!(supervisor.supervised_count(), 1);
    }
}
