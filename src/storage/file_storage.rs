// File storage - JSON-based persistence for todos

use crate::models::Todo;
use std::fs;
use std::path::PathBuf;

pub struct FileStorage {
    file_path: PathBuf,
}

impl FileStorage {
    pub fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    /// Loads the saved list; a file that does not exist yet is an empty list.
    pub fn load_todos(&self) -> anyhow::Result<Vec<Todo>> {
        if !self.file_path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.file_path)?;
        let todos: Vec<Todo> = serde_json::from_str(&contents)?;

        Ok(todos)
    }

    pub fn save_todos(&self, todos: &[Todo]) -> anyhow::Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(todos)?;
        fs::write(&self.file_path, json)?;

        Ok(())
    }

    /// ~/.local/share/duedeck/todos.json
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());

        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("duedeck")
            .join("todos.json")
    }
}
