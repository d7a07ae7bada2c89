//! Task collection persistence.
//!
//! The collection for a user is read and written as a whole on every
//! mutation; there is no partial in-place update.

use std::collections::HashMap;

use crate::error::{Result, ScheduleError};
use crate::task::{Task, TaskUpdate};

/// Load/save access to a user's task collection.
pub trait TaskStore {
    fn load(&self, user: &str) -> Result<Vec<Task>>;

    fn save(&mut self, user: &str, tasks: &[Task]) -> Result<()>;

    fn find(&self, user: &str, id: &str) -> Result<Option<Task>> {
        Ok(self.load(user)?.into_iter().find(|t| t.id == id))
    }

    fn insert(&mut self, user: &str, task: Task) -> Result<()> {
        let mut tasks = self.load(user)?;
        tasks.push(task);
        self.save(user, &tasks)
    }

    /// Apply `update` to the task with `id` and persist the collection.
    fn update_by_id(&mut self, user: &str, id: &str, update: &TaskUpdate) -> Result<Task> {
        let mut tasks = self.load(user)?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ScheduleError::TaskNotFound(id.to_string()))?;
        update.apply(task);
        let updated = task.clone();
        self.save(user, &tasks)?;
        Ok(updated)
    }

    /// Remove the task with `id`. Returns whether it existed.
    fn delete(&mut self, user: &str, id: &str) -> Result<bool> {
        let mut tasks = self.load(user)?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Ok(false);
        }
        self.save(user, &tasks)?;
        Ok(true)
    }
}

/// In-memory store, mainly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    tasks: HashMap<String, Vec<Task>>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(user: &str, tasks: Vec<Task>) -> Self {
        let mut store = Self::new();
        store.tasks.insert(user.to_string(), tasks);
        store
    }
}

impl TaskStore for MemoryTaskStore {
    fn load(&self, user: &str) -> Result<Vec<Task>> {
        Ok(self.tasks.get(user).cloned().unwrap_or_default())
    }

    fn save(&mut self, user: &str, tasks: &[Task]) -> Result<()> {
        self.tasks.insert(user.to_string(), tasks.to_vec());
        Ok(())
    }
}
