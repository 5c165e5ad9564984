// Todo model - Represents a single todo item

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: usize,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Due date as entered, kept textual; the overdue module decides what it
    /// means. Absent means no deadline.
    pub due_date: Option<String>,
}

impl Todo {
    pub fn new(id: usize, title: String, due_date: Option<String>) -> Self {
        Self {
            id,
            title,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
            due_date,
        }
    }

    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
        self.completed_at = if self.completed {
            Some(Utc::now())
        } else {
            None
        };
    }

    /// One-line list form: checkbox marker, title, stored due text.
    pub fn list_label(&self) -> String {
        let mark = if self.completed { "[x]" } else { "[ ]" };
        match &self.due_date {
            Some(due) => format!("{mark} {} (due {due})", self.title),
            None => format!("{mark} {}", self.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_todo_starts_incomplete() {
        let todo = Todo::new(1, "Water plants".to_string(), None);
        assert!(!todo.completed);
        assert_eq!(todo.completed_at, None);
        assert_eq!(todo.due_date, None);
    }

    #[test]
    fn toggle_tracks_completion_time() {
        let mut todo = Todo::new(1, "Water plants".to_string(), None);

        todo.toggle_completed();
        assert!(todo.completed);
        assert!(todo.completed_at.is_some());

        todo.toggle_completed();
        assert!(!todo.completed);
        assert_eq!(todo.completed_at, None);
    }

    #[test]
    fn list_label_shows_checkbox_and_due_text() {
        let mut todo = Todo::new(3, "File taxes".to_string(), Some("2025-12-04".to_string()));
        assert_eq!(todo.list_label(), "[ ] File taxes (due 2025-12-04)");

        todo.toggle_completed();
        assert_eq!(todo.list_label(), "[x] File taxes (due 2025-12-04)");

        todo.due_date = None;
        assert_eq!(todo.list_label(), "[x] File taxes");
    }
}
