//! Deferred transitions
//!
//! Delayed state changes (next round, restart, game over, unit complete) are
//! queued here instead of firing from ad hoc timers. Every task carries the
//! generation, round epoch, and unit epoch it was scheduled under; a task
//! whose stamp no longer matches when it comes due is dropped instead of
//! applied.
//!
//! Round transitions are exclusive: scheduling one supersedes any other
//! pending round transition, so there is a single authoritative restart.

/// A deferred state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Correct answer: bump sub-level and start the next round
    AdvanceRound,
    /// Miss: start the same sub-level again
    RestartRound,
    /// Explosion finished: report game over
    GameOver,
    /// Boss defeat celebration finished: report unit complete
    UnitComplete,
}

impl Deferred {
    /// Round transitions are epoch-scoped and mutually exclusive
    pub fn is_round_transition(self) -> bool {
        matches!(self, Deferred::AdvanceRound | Deferred::RestartRound)
    }

    /// Unit completion belongs to the unit it was scheduled in
    pub fn is_unit_scoped(self) -> bool {
        self == Deferred::UnitComplete
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp {
    generation: u32,
    epoch: u32,
    unit: u32,
}

#[derive(Debug, Clone, Copy)]
struct Task {
    due: f64,
    stamp: Stamp,
    action: Deferred,
}

/// Engine-owned scheduler driven by simulation time
#[derive(Debug, Clone)]
pub struct Scheduler {
    now: f64,
    generation: u32,
    epoch: u32,
    unit: u32,
    tasks: Vec<Task>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now: 0.0,
            generation: 0,
            epoch: 0,
            unit: 0,
            tasks: Vec::with_capacity(8),
        }
    }

    fn stamp(&self) -> Stamp {
        Stamp {
            generation: self.generation,
            epoch: self.epoch,
            unit: self.unit,
        }
    }

    fn is_current(&self, task: &Task) -> bool {
        if task.stamp.generation != self.generation {
            return false;
        }
        if task.action.is_unit_scoped() && task.stamp.unit != self.unit {
            return false;
        }
        !task.action.is_round_transition() || task.stamp.epoch == self.epoch
    }

    /// Queue `action` to fire after `delay` seconds
    pub fn schedule(&mut self, delay: f32, action: Deferred) {
        if action.is_round_transition() {
            // Supersede whatever round transition was pending
            self.invalidate_rounds();
        }
        let task = Task {
            due: self.now + f64::from(delay.max(0.0)),
            stamp: self.stamp(),
            action,
        };
        self.tasks.push(task);
    }

    /// Make every pending round transition stale
    pub fn invalidate_rounds(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Make every pending unit completion stale
    pub fn invalidate_unit(&mut self) {
        self.unit = self.unit.wrapping_add(1);
    }

    /// Drop everything; used when the engine is abandoned
    pub fn cancel_all(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.tasks.clear();
    }

    /// True if a still-valid round transition is waiting
    pub fn has_pending_round_transition(&self) -> bool {
        self.tasks
            .iter()
            .any(|t| t.action.is_round_transition() && self.is_current(t))
    }

    /// True if a still-valid task of this kind is waiting
    pub fn is_pending(&self, action: Deferred) -> bool {
        self.tasks
            .iter()
            .any(|t| t.action == action && self.is_current(t))
    }

    /// Advance the clock and move due, still-valid actions into `due`
    /// (in due-time order). Stale actions are discarded.
    pub fn advance(&mut self, dt: f32, due: &mut Vec<Deferred>) {
        self.now += f64::from(dt);

        // Stable order: earliest first, ties in scheduling order
        self.tasks
            .sort_by(|a, b| a.due.partial_cmp(&b.due).unwrap_or(std::cmp::Ordering::Equal));

        let now = self.now;
        let ready = self.tasks.iter().take_while(|t| t.due <= now).count();
        for i in 0..ready {
            let task = self.tasks[i];
            if self.is_current(&task) {
                due.push(task.action);
            } else {
                log::debug!("Discarding stale {:?} (scheduled at epoch {})", task.action, task.stamp.epoch);
            }
        }
        self.tasks.drain(..ready);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(scheduler: &mut Scheduler, dt: f32) -> Vec<Deferred> {
        let mut due = Vec::new();
        scheduler.advance(dt, &mut due);
        due
    }

    #[test]
    fn test_fires_after_delay() {
        let mut s = Scheduler::new();
        s.schedule(1.0, Deferred::GameOver);
        assert!(run(&mut s, 0.5).is_empty());
        assert_eq!(run(&mut s, 0.6), vec![Deferred::GameOver]);
        assert!(run(&mut s, 5.0).is_empty());
    }

    #[test]
    fn test_round_transition_supersedes_previous() {
        let mut s = Scheduler::new();
        s.schedule(0.6, Deferred::AdvanceRound);
        s.schedule(1.0, Deferred::RestartRound);
        assert!(s.has_pending_round_transition());
        // Only the latest transition survives
        assert_eq!(run(&mut s, 2.0), vec![Deferred::RestartRound]);
        assert!(!s.has_pending_round_transition());
    }

    #[test]
    fn test_invalidate_rounds_keeps_run_tasks() {
        let mut s = Scheduler::new();
        s.schedule(1.0, Deferred::RestartRound);
        s.schedule(1.0, Deferred::UnitComplete);
        s.invalidate_rounds();
        assert!(!s.has_pending_round_transition());
        assert!(s.is_pending(Deferred::UnitComplete));
        assert_eq!(run(&mut s, 1.5), vec![Deferred::UnitComplete]);
    }

    #[test]
    fn test_invalidate_unit_drops_unit_complete_only() {
        let mut s = Scheduler::new();
        s.schedule(1.0, Deferred::UnitComplete);
        s.schedule(1.0, Deferred::GameOver);
        s.invalidate_unit();
        assert!(!s.is_pending(Deferred::UnitComplete));
        assert_eq!(run(&mut s, 1.5), vec![Deferred::GameOver]);
    }

    #[test]
    fn test_cancel_all_drops_everything() {
        let mut s = Scheduler::new();
        s.schedule(0.1, Deferred::GameOver);
        s.schedule(0.1, Deferred::AdvanceRound);
        s.cancel_all();
        assert!(run(&mut s, 1.0).is_empty());
    }

    #[test]
    fn test_due_order() {
        let mut s = Scheduler::new();
        s.schedule(2.0, Deferred::UnitComplete);
        s.schedule(1.0, Deferred::GameOver);
        assert_eq!(run(&mut s, 3.0), vec![Deferred::GameOver, Deferred::UnitComplete]);
    }
}
