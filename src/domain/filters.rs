//! Task list filters and dashboard breakdowns.
//!
//! `TaskQuery` is sent to the record service as equality predicates;
//! `TaskListFilter` narrows the already loaded collection for the list view.

use serde::{Deserialize, Serialize};

use super::tasks::{Task, TaskCategory, TaskPriority, TaskStatus};

/// Remote filter applied by the record service on fetch-all.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

/// Which side of the completion flag the list view shows.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompletionView {
    #[default]
    All,
    Active,
    Completed,
}

/// Local list filter over the store's collection
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TaskListFilter {
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub category: Option<TaskCategory>,
    #[serde(default)]
    pub completion: CompletionView,
}

impl TaskListFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|s| s != task.status) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        if self.category.is_some_and(|c| c != task.category) {
            return false;
        }
        match self.completion {
            CompletionView::All => true,
            CompletionView::Active => !task.is_completed,
            CompletionView::Completed => task.is_completed,
        }
    }

    /// Matching tasks, in collection order.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

/// One slice of a dashboard chart.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BreakdownEntry {
    pub name: &'static str,
    pub count: usize,
}

/// Counts tasks per key, keeping the order in which keys first appear.
fn breakdown_by(tasks: &[Task], key: impl Fn(&Task) -> &'static str) -> Vec<BreakdownEntry> {
    let mut entries: Vec<BreakdownEntry> = Vec::new();
    for task in tasks {
        let name = key(task);
        match entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.count += 1,
            None => entries.push(BreakdownEntry { name, count: 1 }),
        }
    }
    entries
}

pub fn by_category(tasks: &[Task]) -> Vec<BreakdownEntry> {
    breakdown_by(tasks, |t| t.category.as_str())
}

pub fn by_priority(tasks: &[Task]) -> Vec<BreakdownEntry> {
    breakdown_by(tasks, |t| t.priority.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tasks::fixtures::task;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Task> {
        let mut work = task(1, false);
        work.category = TaskCategory::Work;
        work.priority = TaskPriority::High;

        let mut done = task(2, true);
        done.category = TaskCategory::Health;

        let mut doing = task(3, false);
        doing.status = TaskStatus::InProgress;
        doing.category = TaskCategory::Work;

        vec![work, done, doing]
    }

    #[test]
    fn default_filter_keeps_everything_in_order() {
        let tasks = sample();
        let ids: Vec<_> = TaskListFilter::default()
            .apply(&tasks)
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn filters_combine() {
        let tasks = sample();
        let filter = TaskListFilter {
            category: Some(TaskCategory::Work),
            completion: CompletionView::Active,
            ..TaskListFilter::default()
        };
        let ids: Vec<_> = filter.apply(&tasks).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let filter = TaskListFilter {
            status: Some(TaskStatus::InProgress),
            ..TaskListFilter::default()
        };
        assert_eq!(filter.apply(&tasks).len(), 1);
    }

    #[test]
    fn completed_view_only_shows_flagged_tasks() {
        let tasks = sample();
        let filter = TaskListFilter {
            completion: CompletionView::Completed,
            ..TaskListFilter::default()
        };
        let ids: Vec<_> = filter.apply(&tasks).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn breakdowns_count_in_first_seen_order() {
        let tasks = sample();
        assert_eq!(
            by_category(&tasks),
            vec![
                BreakdownEntry { name: "Work", count: 2 },
                BreakdownEntry { name: "Health", count: 1 },
            ]
        );
        assert_eq!(
            by_priority(&tasks),
            vec![
                BreakdownEntry { name: "High", count: 1 },
                BreakdownEntry { name: "Medium", count: 2 },
            ]
        );
        assert!(by_category(&[]).is_empty());
    }
}
