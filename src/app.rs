// App module - Main application state and logic
// Holds the todo list, the selection, the input-mode state machine, and the
// key handling that drives everything.

use crate::models::Todo;
use crate::overdue;
use crate::storage::FileStorage;
use chrono::Local;
use crossterm::event::{self, Event, KeyCode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::Stdout;

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    EditingTitle,
    EditingDate,
    DeletePanel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    List,
    Card,
}

impl Panel {
    pub fn next(&self) -> Self {
        match self {
            Panel::List => Panel::Card,
            Panel::Card => Panel::List,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub todos: Vec<Todo>,
    pub input_mode: InputMode,
    pub focused_panel: Panel,
    pub selected_todo_index: Option<usize>,
    pub show_task_editor: bool,
    pub editing_todo_id: Option<usize>,
    pub title_input: String,
    pub date_input: String,
    pub show_delete_panel: bool,
    pub delete_panel_yes_selected: bool,
    pub deleting_todo_id: Option<usize>,
    storage: FileStorage,
}

impl App {
    pub fn new(storage: FileStorage) -> Self {
        // A broken or missing file starts us off empty; the UI must come up
        // regardless
        let todos = storage.load_todos().unwrap_or_else(|_| Vec::new());
        let selected_todo_index = if todos.is_empty() { None } else { Some(0) };

        let mut app = Self {
            should_quit: false,
            todos,
            input_mode: InputMode::Normal,
            focused_panel: Panel::List,
            selected_todo_index,
            show_task_editor: false,
            editing_todo_id: None,
            title_input: String::new(),
            date_input: String::new(),
            show_delete_panel: false,
            delete_panel_yes_selected: true,
            deleting_todo_id: None,
            storage,
        };

        app.sort_todos();
        app
    }

    pub fn next_panel(&mut self) {
        self.focused_panel = self.focused_panel.next();
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        self.selected_todo_index
            .and_then(|index| self.todos.get(index))
    }

    fn sort_todos(&mut self) {
        let now = Local::now();
        self.todos.sort_by(|a, b| {
            let day_a = a.due_date.as_deref().and_then(|raw| overdue::due_day(raw, &now));
            let day_b = b.due_date.as_deref().and_then(|raw| overdue::due_day(raw, &now));
            match (day_a, day_b) {
                // Both have a due day: earliest first, ties by creation time
                (Some(day_a), Some(day_b)) => day_a
                    .cmp(&day_b)
                    .then_with(|| a.created_at.cmp(&b.created_at)),
                // Tasks with a readable due day come first; absent and
                // unparsable due dates go last
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.created_at.cmp(&b.created_at),
            }
        });
    }

    pub fn select_previous_todo(&mut self) {
        if self.todos.is_empty() {
            self.selected_todo_index = None;
            return;
        }

        self.selected_todo_index = Some(match self.selected_todo_index {
            Some(i) if i > 0 => i - 1,
            Some(_) => self.todos.len() - 1,
            None => 0,
        });
    }

    pub fn select_next_todo(&mut self) {
        if self.todos.is_empty() {
            self.selected_todo_index = None;
            return;
        }

        self.selected_todo_index = Some(match self.selected_todo_index {
            Some(i) if i < self.todos.len() - 1 => i + 1,
            Some(_) => 0,
            None => 0,
        });
    }

    pub fn open_task_editor(&mut self) {
        self.show_task_editor = true;
        self.input_mode = InputMode::EditingTitle;
        self.editing_todo_id = None;
        self.title_input.clear();
        self.date_input.clear();
    }

    pub fn open_edit_task_editor(&mut self) {
        if let Some(todo) = self.selected_todo() {
            let id = todo.id;
            let title = todo.title.clone();
            let date = todo.due_date.clone().unwrap_or_default();

            self.show_task_editor = true;
            self.input_mode = InputMode::EditingTitle;
            self.editing_todo_id = Some(id);
            self.title_input = title;
            self.date_input = date;
        }
    }

    pub fn close_task_editor(&mut self) {
        self.show_task_editor = false;
        self.input_mode = InputMode::Normal;
        self.editing_todo_id = None;
        self.title_input.clear();
        self.date_input.clear();
    }

    /// Saves the editor buffers as a new or edited task. The due-date field
    /// is free text: trimmed empty means no deadline, anything else is kept
    /// verbatim. The overdue calculator tolerates whatever ends up stored.
    pub fn save_task(&mut self) {
        let title = self.title_input.trim().to_string();
        if !title.is_empty() {
            let raw_date = self.date_input.trim();
            let due_date = if raw_date.is_empty() {
                None
            } else {
                Some(raw_date.to_string())
            };

            let task_id = if let Some(editing_id) = self.editing_todo_id {
                // Edit existing todo
                if let Some(todo) = self.todos.iter_mut().find(|t| t.id == editing_id) {
                    todo.title = title;
                    todo.due_date = due_date;
                }
                editing_id
            } else {
                // Create new todo
                let new_id = self.todos.iter().map(|t| t.id).max().unwrap_or(0) + 1;
                self.todos.push(Todo::new(new_id, title, due_date));
                new_id
            };

            // Keep the edited/added task selected after sorting
            self.sort_todos();
            self.selected_todo_index = self.todos.iter().position(|t| t.id == task_id);

            // Persist to file
            let _ = self.storage.save_todos(&self.todos);
        }
        self.close_task_editor();
    }

    /// Checkbox semantics: completion flips in place and the item stays in
    /// the list. Overdue status is never stored, so nothing else changes.
    pub fn toggle_selected_done(&mut self) {
        if let Some(index) = self.selected_todo_index {
            if let Some(todo) = self.todos.get_mut(index) {
                todo.toggle_completed();
                let _ = self.storage.save_todos(&self.todos);
            }
        }
    }

    pub fn open_delete_panel(&mut self) {
        if let Some(todo) = self.selected_todo() {
            let id = todo.id;
            self.show_delete_panel = true;
            self.deleting_todo_id = Some(id);
            self.delete_panel_yes_selected = true;
            self.input_mode = InputMode::DeletePanel;
        }
    }

    pub fn close_delete_panel(&mut self) {
        self.show_delete_panel = false;
        self.deleting_todo_id = None;
        self.delete_panel_yes_selected = true;
        self.input_mode = InputMode::Normal;
    }

    pub fn toggle_delete_button(&mut self) {
        self.delete_panel_yes_selected = !self.delete_panel_yes_selected;
    }

    pub fn delete_confirmed(&mut self) {
        if let Some(deleting_id) = self.deleting_todo_id {
            self.todos.retain(|t| t.id != deleting_id);
            let _ = self.storage.save_todos(&self.todos);

            // Adjust selected index if needed
            if self.todos.is_empty() {
                self.selected_todo_index = None;
            } else if let Some(index) = self.selected_todo_index {
                if index >= self.todos.len() {
                    self.selected_todo_index = Some(self.todos.len() - 1);
                }
            }
        }
        self.close_delete_panel();
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
        loop {
            // Render the UI
            terminal.draw(|frame| crate::ui::render(frame, self))?;

            // Handle events
            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key_event(key);
                }
            }

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: crossterm::event::KeyEvent) {
        match self.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('+') => self.open_task_editor(),
                KeyCode::Tab => self.next_panel(),
                KeyCode::Up => self.select_previous_todo(),
                KeyCode::Down => self.select_next_todo(),
                KeyCode::Enter => {
                    if self.selected_todo_index.is_some() {
                        self.open_edit_task_editor();
                    }
                }
                KeyCode::Char('d') => self.toggle_selected_done(),
                KeyCode::Char('-') => {
                    if self.selected_todo_index.is_some() {
                        self.open_delete_panel();
                    }
                }
                _ => {}
            },
            InputMode::EditingTitle => match key.code {
                KeyCode::Char(c) => {
                    self.title_input.push(c);
                }
                KeyCode::Backspace => {
                    self.title_input.pop();
                }
                KeyCode::Tab => {
                    // Switch to date input
                    self.input_mode = InputMode::EditingDate;
                }
                KeyCode::Enter => {
                    self.save_task();
                }
                KeyCode::Esc => {
                    self.close_task_editor();
                }
                _ => {}
            },
            InputMode::EditingDate => match key.code {
                KeyCode::Char(c) => {
                    self.date_input.push(c);
                }
                KeyCode::Backspace => {
                    self.date_input.pop();
                }
                KeyCode::Tab => {
                    // Switch back to title input
                    self.input_mode = InputMode::EditingTitle;
                }
                KeyCode::Enter => {
                    self.save_task();
                }
                KeyCode::Esc => {
                    self.close_task_editor();
                }
                _ => {}
            },
            InputMode::DeletePanel => match key.code {
                KeyCode::Tab | KeyCode::Left | KeyCode::Right => {
                    self.toggle_delete_button();
                }
                KeyCode::Enter => {
                    if self.delete_panel_yes_selected {
                        self.delete_confirmed();
                    } else {
                        self.close_delete_panel();
                    }
                }
                KeyCode::Esc => {
                    self.close_delete_panel();
                }
                _ => {}
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    fn scratch_app() -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(FileStorage::new(dir.path().join("todos.json")));
        (app, dir)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn empty_storage_starts_with_no_selection() {
        let (app, _dir) = scratch_app();
        assert!(app.todos.is_empty());
        assert_eq!(app.selected_todo_index, None);
    }

    #[test]
    fn typed_task_is_saved_and_persisted() {
        let (mut app, dir) = scratch_app();

        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.input_mode, InputMode::EditingTitle);
        type_text(&mut app, "Pay rent");
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.input_mode, InputMode::EditingDate);
        type_text(&mut app, "2025-12-01");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.todos.len(), 1);
        assert_eq!(app.todos[0].title, "Pay rent");
        assert_eq!(app.todos[0].due_date.as_deref(), Some("2025-12-01"));
        assert_eq!(app.selected_todo_index, Some(0));
        assert!(!app.show_task_editor);

        // The same list comes back from disk
        let reloaded = FileStorage::new(dir.path().join("todos.json"))
            .load_todos()
            .unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].title, "Pay rent");
    }

    #[test]
    fn editor_without_a_title_saves_nothing() {
        let (mut app, _dir) = scratch_app();

        app.open_task_editor();
        app.date_input.push_str("2025-12-01");
        app.save_task();

        assert!(app.todos.is_empty());
        assert!(!app.show_task_editor);
    }

    #[test]
    fn blank_date_field_means_no_deadline() {
        let (mut app, _dir) = scratch_app();

        app.open_task_editor();
        app.title_input.push_str("Sharpen pencils");
        app.date_input.push_str("   ");
        app.save_task();

        assert_eq!(app.todos[0].due_date, None);
    }

    #[test]
    fn free_text_due_date_is_stored_verbatim() {
        let (mut app, _dir) = scratch_app();

        app.open_task_editor();
        app.title_input.push_str("Clean gutters");
        app.date_input.push_str("someday soon");
        app.save_task();

        // Kept as typed; the calculator treats it as not overdue
        assert_eq!(app.todos[0].due_date.as_deref(), Some("someday soon"));
        assert!(!overdue::is_overdue(
            app.todos[0].due_date.as_deref(),
            &Local::now()
        ));
    }

    #[test]
    fn toggling_done_keeps_the_item_listed() {
        let (mut app, dir) = scratch_app();

        app.open_task_editor();
        app.title_input.push_str("Water plants");
        app.save_task();

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.todos.len(), 1);
        assert!(app.todos[0].completed);

        let reloaded = FileStorage::new(dir.path().join("todos.json"))
            .load_todos()
            .unwrap();
        assert!(reloaded[0].completed);

        press(&mut app, KeyCode::Char('d'));
        assert!(!app.todos[0].completed);
    }

    #[test]
    fn deleting_needs_confirmation() {
        let (mut app, _dir) = scratch_app();

        app.open_task_editor();
        app.title_input.push_str("Old chore");
        app.save_task();

        // Backing out with No keeps the task
        press(&mut app, KeyCode::Char('-'));
        assert_eq!(app.input_mode, InputMode::DeletePanel);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.todos.len(), 1);

        // Confirming with Yes removes it
        press(&mut app, KeyCode::Char('-'));
        press(&mut app, KeyCode::Enter);
        assert!(app.todos.is_empty());
        assert_eq!(app.selected_todo_index, None);
    }

    #[test]
    fn due_days_sort_first_in_ascending_order() {
        let (mut app, _dir) = scratch_app();
        app.todos = vec![
            Todo::new(1, "No deadline".to_string(), None),
            Todo::new(2, "Later".to_string(), Some("2025-12-10".to_string())),
            Todo::new(3, "Soonest".to_string(), Some("2025-12-01".to_string())),
            Todo::new(4, "Unreadable".to_string(), Some("whenever".to_string())),
        ];
        app.sort_todos();

        let order: Vec<&str> = app.todos.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(order, ["Soonest", "Later", "No deadline", "Unreadable"]);
    }

    #[test]
    fn selection_wraps_around() {
        let (mut app, _dir) = scratch_app();
        app.todos = vec![
            Todo::new(1, "a".to_string(), None),
            Todo::new(2, "b".to_string(), None),
        ];
        app.selected_todo_index = Some(0);

        app.select_previous_todo();
        assert_eq!(app.selected_todo_index, Some(1));
        app.select_next_todo();
        assert_eq!(app.selected_todo_index, Some(0));
        app.select_next_todo();
        assert_eq!(app.selected_todo_index, Some(1));
    }

    #[test]
    fn editing_prefills_the_buffers() {
        let (mut app, _dir) = scratch_app();

        app.open_task_editor();
        app.title_input.push_str("Call the bank");
        app.date_input.push_str("2025-12-08");
        app.save_task();

        press(&mut app, KeyCode::Enter);
        assert!(app.show_task_editor);
        assert_eq!(app.editing_todo_id, Some(1));
        assert_eq!(app.title_input, "Call the bank");
        assert_eq!(app.date_input, "2025-12-08");

        // Saving with a changed date replaces the stored text
        app.date_input = "2025-12-09".to_string();
        app.save_task();
        assert_eq!(app.todos[0].due_date.as_deref(), Some("2025-12-09"));
        assert_eq!(app.todos.len(), 1);
    }
}
