//! In-memory mirror of the user's task collection.
//!
//! The store never talks to the record service. Callers perform the remote
//! call first and only apply the matching mutation once it has succeeded.

use serde::{Deserialize, Serialize};

use crate::domain::{Task, TaskId};

/// Aggregate counts over the collection.
///
/// Maintained as a materialised view: [`TaskStats::recount`] rebuilds it from
/// a full collection, the `record_*` methods patch it after point mutations.
/// Both paths keep `total == completed + pending`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TaskStats {
    pub fn recount(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.is_completed).count();
        Self {
            total: tasks.len(),
            completed,
            pending: tasks.len() - completed,
        }
    }

    pub fn record_added(&mut self, is_completed: bool) {
        self.total += 1;
        if is_completed {
            self.completed += 1;
        } else {
            self.pending += 1;
        }
    }

    pub fn record_removed(&mut self, was_completed: bool) {
        self.total -= 1;
        if was_completed {
            self.completed -= 1;
        } else {
            self.pending -= 1;
        }
    }

    pub fn record_completion_change(&mut self, was_completed: bool, is_completed: bool) {
        match (was_completed, is_completed) {
            (false, true) => {
                self.completed += 1;
                self.pending -= 1;
            }
            (true, false) => {
                self.completed -= 1;
                self.pending += 1;
            }
            _ => {}
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.total == self.completed + self.pending
    }
}

/// Task state container
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
    current: Option<Task>,
    stats: TaskStats,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the collection with a freshly fetched result set.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.stats = TaskStats::recount(&tasks);
        self.tasks = tasks;
        self.loading = false;
        self.error = None;
    }

    /// Appends a task the record service has just created.
    pub fn add(&mut self, task: Task) {
        self.stats.record_added(task.is_completed);
        self.tasks.push(task);
    }

    /// Replaces the entry with the same id in place.
    ///
    /// Returns `false` and leaves everything untouched when the id is unknown.
    pub fn apply_update(&mut self, task: Task) -> bool {
        let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) else {
            return false;
        };
        self.stats
            .record_completion_change(slot.is_completed, task.is_completed);
        *slot = task;
        true
    }

    /// Removes the entry with `id`, returning it when present.
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        let removed = self.tasks.remove(index);
        self.stats.record_removed(removed.is_completed);
        Some(removed)
    }

    pub fn set_current(&mut self, task: Option<Task>) {
        self.current = task;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn stats(&self) -> TaskStats {
        self.stats
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current(&self) -> Option<&Task> {
        self.current.as_ref()
    }
}
