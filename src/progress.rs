// Simulated extraction progress shown while a recipe request is in flight

use std::time::{Duration, Instant};

use crate::models::Task;

/// Interval between simulated task completions.
pub const TASK_INTERVAL: Duration = Duration::from_millis(2500);

const TASK_NAMES: [&str; 5] = [
    "Loading recipe URL",
    "Extracting raw recipe information",
    "Identifying recipe components",
    "Cleaning recipe information",
    "Finalizing recipe data",
];

/// Fixed task list driven by a timer, not by backend state.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    tasks: Vec<Task>,
    next_tick: Option<Instant>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        let tasks = TASK_NAMES
            .into_iter()
            .zip(1u8..)
            .map(|(name, id)| Task {
                id,
                name,
                completed: false,
            })
            .collect();

        Self {
            tasks,
            next_tick: None,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    /// Percentage of completed tasks, rounded to the nearest integer.
    #[allow(clippy::cast_possible_truncation)]
    pub fn percent(&self) -> u16 {
        if self.tasks.is_empty() {
            return 0;
        }
        ((self.completed_count() * 100 + self.tasks.len() / 2) / self.tasks.len()) as u16
    }

    pub const fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Reset all tasks and arm the timer at `now`.
    pub fn start(&mut self, now: Instant) {
        self.reset();
        self.next_tick = Some(now + TASK_INTERVAL);
    }

    /// Advance the timer to `now`, completing one task per elapsed interval.
    /// Returns the number of tasks completed by this call.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut completed = 0;
        while let Some(due) = self.next_tick {
            if now < due {
                break;
            }
            match self.tasks.iter_mut().find(|task| !task.completed) {
                Some(task) => {
                    task.completed = true;
                    completed += 1;
                    self.next_tick = Some(due + TASK_INTERVAL);
                }
                None => self.next_tick = None,
            }
        }
        if self.completed_count() == self.tasks.len() {
            self.next_tick = None;
        }
        completed
    }

    /// Stop the timer and mark every task complete.
    pub fn complete_all(&mut self) {
        self.next_tick = None;
        for task in &mut self.tasks {
            task.completed = true;
        }
    }

    /// Stop the timer and mark every task incomplete.
    pub fn reset(&mut self) {
        self.next_tick = None;
        for task in &mut self.tasks {
            task.completed = false;
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tracker_is_idle() {
        let tracker = ProgressTracker::new();
        assert_eq!(tracker.tasks().len(), 5);
        assert_eq!(tracker.percent(), 0);
        assert!(!tracker.is_running());
        assert_eq!(tracker.tasks()[0].name, "Loading recipe URL");
        assert_eq!(tracker.tasks()[4].id, 5);
    }

    #[test]
    fn test_tick_before_interval_does_nothing() {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new();
        tracker.start(start);

        assert_eq!(tracker.tick(start + Duration::from_millis(2499)), 0);
        assert_eq!(tracker.percent(), 0);
    }

    #[test]
    fn test_each_interval_completes_one_task() {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new();
        tracker.start(start);

        assert_eq!(tracker.tick(start + TASK_INTERVAL), 1);
        assert_eq!(tracker.percent(), 20);
        assert!(tracker.tasks()[0].completed);
        assert!(!tracker.tasks()[1].completed);

        assert_eq!(tracker.tick(start + TASK_INTERVAL * 2), 1);
        assert_eq!(tracker.percent(), 40);
    }

    #[test]
    fn test_late_tick_catches_up() {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new();
        tracker.start(start);

        assert_eq!(tracker.tick(start + TASK_INTERVAL * 3), 3);
        assert_eq!(tracker.percent(), 60);
    }

    #[test]
    fn test_timer_stops_after_last_task() {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new();
        tracker.start(start);

        assert_eq!(tracker.tick(start + TASK_INTERVAL * 5), 5);
        assert_eq!(tracker.percent(), 100);
        assert!(!tracker.is_running());
        assert_eq!(tracker.tick(start + TASK_INTERVAL * 9), 0);
    }

    #[test]
    fn test_complete_all_and_reset() {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new();
        tracker.start(start);
        tracker.tick(start + TASK_INTERVAL);

        tracker.complete_all();
        assert_eq!(tracker.percent(), 100);
        assert!(!tracker.is_running());

        tracker.reset();
        assert_eq!(tracker.completed_count(), 0);
        assert_eq!(tracker.percent(), 0);
    }

    #[test]
    fn test_restart_clears_previous_progress() {
        let start = Instant::now();
        let mut tracker = ProgressTracker::new();
        tracker.complete_all();

        tracker.start(start);
        assert_eq!(tracker.completed_count(), 0);
        assert!(tracker.is_running());
    }
}
