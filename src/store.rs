// Task list state machine: mutations, derived views, change notification

use crate::models::{Filter, Task};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Hook invoked with the full task list after every committed mutation of it
pub type OnChange = Box<dyn FnMut(&[Task])>;

/// Owned todo-list store.
///
/// Holds the task list, the uncommitted new-task text and the active view
/// filter. All mutations are infallible: missing ids and empty trimmed
/// titles are defined no-ops (or, for [`update_task_title`], a delete),
/// never errors.
///
/// Persistence is decoupled: callers register an on-change hook via
/// [`set_on_change`] and the store invokes it after each mutation that
/// changes the task list. The hook's outcome never affects the in-memory
/// state.
///
/// [`update_task_title`]: TaskListStore::update_task_title
/// [`set_on_change`]: TaskListStore::set_on_change
pub struct TaskListStore {
    tasks: Vec<Task>,
    pending_title: String,
    filter: Filter,
    next_id: u64,
    on_change: Option<OnChange>,
}

impl Default for TaskListStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskListStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::from_tasks(Vec::new())
    }

    /// Create a store seeded from previously persisted tasks.
    ///
    /// Entries that would violate store invariants are dropped: a duplicate
    /// id keeps its first occurrence, a title that is empty after trimming
    /// is skipped entirely. The id counter resumes past the largest
    /// restored id.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut seen = HashSet::new();
        let mut restored = Vec::with_capacity(tasks.len());

        for task in tasks {
            if task.title.trim().is_empty() {
                warn!(id = task.id, "Skipping restored task with blank title");
                continue;
            }
            if !seen.insert(task.id) {
                warn!(id = task.id, "Skipping restored task with duplicate id");
                continue;
            }
            restored.push(task);
        }

        let next_id = restored.iter().map(|t| t.id).max().map_or(1, |max| max + 1);
        debug!(count = restored.len(), next_id, "Restored task list");

        Self {
            tasks: restored,
            pending_title: String::new(),
            filter: Filter::default(),
            next_id,
            on_change: None,
        }
    }

    /// Register the hook called after every committed task-list mutation.
    ///
    /// Pending-title and filter changes are not persisted state and do not
    /// notify.
    pub fn set_on_change(&mut self, hook: OnChange) {
        self.on_change = Some(hook);
    }

    // ========================================================================
    // Derived queries
    // ========================================================================

    /// All tasks, insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The uncommitted new-task text
    pub fn pending_title(&self) -> &str {
        &self.pending_title
    }

    /// The active view filter
    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Count of tasks not yet completed
    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }

    /// Count of completed tasks
    pub fn completed_count(&self) -> usize {
        self.tasks.len() - self.active_count()
    }

    /// True iff the list is non-empty and every task is completed
    pub fn all_completed(&self) -> bool {
        !self.tasks.is_empty() && self.active_count() == 0
    }

    /// Tasks visible under the current filter, insertion order preserved
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| self.filter.matches(t)).collect()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Replace the pending-title buffer verbatim (no trimming)
    pub fn set_pending_title(&mut self, text: impl Into<String>) {
        self.pending_title = text.into();
    }

    /// Commit the pending title as a new task.
    ///
    /// If the trimmed buffer is empty this is a no-op and the buffer is
    /// kept. Otherwise a new active task is appended and the buffer is
    /// cleared.
    pub fn submit_new_task(&mut self) {
        let trimmed = self.pending_title.trim().to_string();
        if trimmed.is_empty() {
            return;
        }

        let task = Task::new(self.alloc_id(), trimmed);
        debug!(id = task.id, title = %task.title, "Adding task");
        self.tasks.push(task);
        self.pending_title.clear();
        self.notify();
    }

    /// Remove the task with the given id; no-op if absent
    pub fn delete_task(&mut self, id: u64) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() != before {
            debug!(id, "Deleted task");
            self.notify();
        }
    }

    /// Flip the completed flag of the task with the given id; no-op if absent
    pub fn toggle_task(&mut self, id: u64) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.completed = !task.completed;
            debug!(id, completed = task.completed, "Toggled task");
            self.notify();
        }
    }

    /// Set every task's completed flag to the negation of [`all_completed`]
    /// as observed at call time: mark everything completed unless
    /// everything already is, in which case mark everything active.
    ///
    /// [`all_completed`]: TaskListStore::all_completed
    pub fn toggle_all(&mut self) {
        if self.tasks.is_empty() {
            return;
        }

        let target = !self.all_completed();
        for task in &mut self.tasks {
            task.completed = target;
        }
        debug!(completed = target, "Toggled all tasks");
        self.notify();
    }

    /// Remove every completed task
    pub fn clear_completed(&mut self) {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        if self.tasks.len() != before {
            debug!(removed = before - self.tasks.len(), "Cleared completed tasks");
            self.notify();
        }
    }

    /// Replace the title of the task with the given id.
    ///
    /// The new title is trimmed first. An empty result deletes the task
    /// instead of rejecting the edit. No-op if the id is absent.
    pub fn update_task_title(&mut self, id: u64, new_title: &str) {
        let trimmed = new_title.trim();
        if trimmed.is_empty() {
            self.delete_task(id);
            return;
        }

        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.title = trimmed.to_string();
            debug!(id, title = trimmed, "Updated task title");
            self.notify();
        }
    }

    /// Replace the active view filter
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn notify(&mut self) {
        if let Some(hook) = &mut self.on_change {
            hook(&self.tasks);
        }
    }
}
