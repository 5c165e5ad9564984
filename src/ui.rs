// UI module - Rendering logic for the TUI
// Two consumers of the overdue calculator live here: the list panel
// (aggregate overdue count in the header) and the card panel (per-item
// overdue annotation and danger styling). Both gate on the completion flag
// themselves; the calculator does not.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, InputMode, Panel};
use crate::models::Todo;
use crate::overdue;
use chrono::{DateTime, Local, TimeZone};

const EMPTY_STATE_MESSAGE: &str = "No todos yet. Add one to get started! 👻";

/// Helper function to get border style based on whether a panel is focused
fn get_border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Header for the list panel. Counts items that are both incomplete and
/// overdue; completion is ANDed in here, not in the calculator.
pub fn list_header<Tz: TimeZone>(todos: &[Todo], now: &DateTime<Tz>) -> String {
    let overdue_count = todos
        .iter()
        .filter(|todo| !todo.completed && overdue::is_overdue(todo.due_date.as_deref(), now))
        .count();

    if overdue_count > 0 {
        format!("My Todos ({overdue_count} overdue)")
    } else {
        "My Todos".to_string()
    }
}

/// Overdue annotation for one item, gated on its completion flag: a
/// completed item never shows overdue text no matter what the calculator
/// alone would say. `Some` exactly when the item should get the danger
/// styling.
pub fn overdue_note<Tz: TimeZone>(todo: &Todo, now: &DateTime<Tz>) -> Option<String> {
    if todo.completed {
        return None;
    }

    let note = overdue::format_days_overdue(overdue::days_overdue(todo.due_date.as_deref(), now));
    if note.is_empty() { None } else { Some(note) }
}

/// Long display form of a due date ("December 25, 2025"). Text the
/// calculator cannot read is shown as stored.
pub fn due_label<Tz: TimeZone>(raw: &str, now: &DateTime<Tz>) -> String {
    match overdue::due_day(raw, now) {
        Some(day) => day.format("%B %-d, %Y").to_string(),
        None => raw.to_string(),
    }
}

pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.area();
    let now = Local::now();

    // Split the screen into the main area and a footer
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Main content area
            Constraint::Length(1), // Footer
        ])
        .split(size);

    // Main area: list on the left, card on the right
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // List
            Constraint::Percentage(60), // Card
        ])
        .split(main_layout[0]);

    render_todo_list(frame, app, &now, columns[0]);
    render_card(frame, app, &now, columns[1]);
    render_footer(frame, main_layout[1]);

    // Render the task editor if it's open
    if app.show_task_editor {
        render_task_editor(frame, app);
    }

    // Render the delete confirmation if it's open
    if app.show_delete_panel {
        render_delete_panel(frame, app);
    }
}

fn render_todo_list(frame: &mut Frame, app: &App, now: &DateTime<Local>, area: Rect) {
    let border_style = get_border_style(app.focused_panel == Panel::List);
    let block = Block::default()
        .title(list_header(&app.todos, now))
        .borders(Borders::ALL)
        .border_style(border_style);

    if app.todos.is_empty() {
        let inner_area = block.inner(area);
        frame.render_widget(block, area);

        let empty = Paragraph::new(EMPTY_STATE_MESSAGE)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, inner_area);
        return;
    }

    let today = now.date_naive();
    let items: Vec<ListItem> = app
        .todos
        .iter()
        .map(|todo| {
            let content = todo.list_label();

            if todo.completed {
                // Completed rows stay listed, dimmed and crossed out
                ListItem::new(content).style(
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT),
                )
            } else if overdue::is_overdue(todo.due_date.as_deref(), now) {
                // Danger styling for overdue rows
                ListItem::new(content).style(Style::default().fg(Color::Red))
            } else if todo.due_date.as_deref().and_then(|raw| overdue::due_day(raw, now))
                == Some(today)
            {
                // Due today in yellow
                ListItem::new(content).style(Style::default().fg(Color::Yellow))
            } else {
                ListItem::new(content)
            }
        })
        .collect();

    let todo_list = List::new(items)
        .block(block)
        .style(Style::default())
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol(">> ");

    let mut list_state = ListState::default();
    list_state.select(app.selected_todo_index);

    frame.render_stateful_widget(todo_list, area, &mut list_state);
}

fn render_card(frame: &mut Frame, app: &App, now: &DateTime<Local>, area: Rect) {
    let focused = app.focused_panel == Panel::Card;

    let Some(todo) = app.selected_todo() else {
        // Nothing selected - show an empty card
        let block = Block::default()
            .title("Card")
            .borders(Borders::ALL)
            .border_style(get_border_style(focused));
        let inner_area = block.inner(area);
        frame.render_widget(block, area);

        let empty = Paragraph::new("No todo selected")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner_area);
        return;
    };

    let note = overdue_note(todo, now);

    // Danger variant: red border and an explicit marker in the title
    let card_title = if note.is_some() { "Card (overdue)" } else { "Card" };
    let mut border_style = if note.is_some() {
        Style::default().fg(Color::Red)
    } else if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    if focused {
        border_style = border_style.add_modifier(Modifier::BOLD);
    }

    let block = Block::default()
        .title(card_title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Title: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(&todo.title),
        ]),
        Line::default(),
    ];

    // The due line is omitted entirely when there is no deadline
    if let Some(raw) = &todo.due_date {
        let mut due_spans = vec![
            Span::styled("Due: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(due_label(raw, now)),
        ];
        if let Some(note) = &note {
            due_spans.push(Span::styled(
                format!("  ({note})"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }
        lines.push(Line::from(due_spans));
        lines.push(Line::default());
    }

    let status_line = if todo.completed {
        let text = match todo.completed_at {
            Some(completed_at) => {
                format!("✓ Completed on {}", completed_at.format("%Y-%m-%d %H:%M"))
            }
            None => "✓ Completed".to_string(),
        };
        Line::from(vec![
            Span::styled(
                "Status: ",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            Span::styled(text, Style::default().fg(Color::Green)),
        ])
    } else {
        Line::from(vec![
            Span::styled(
                "Status: ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled("○ Pending", Style::default().fg(Color::Yellow)),
        ])
    };
    lines.push(status_line);
    lines.push(Line::default());

    lines.push(Line::from(vec![
        Span::styled(
            "Created: ",
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            todo.created_at.format("%Y-%m-%d %H:%M").to_string(),
            Style::default().fg(Color::Gray),
        ),
    ]));

    let card = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(card, inner_area);
}

fn render_task_editor(frame: &mut Frame, app: &App) {
    // Create a centered rectangle for the popup
    let popup_area = centered_rect(60, 40, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let title = if app.editing_todo_id.is_some() {
        "Edit Todo"
    } else {
        "New Todo"
    };
    let popup_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Black));

    let inner_area = popup_block.inner(popup_area);
    frame.render_widget(popup_block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // Title field
            Constraint::Length(2), // Date field
            Constraint::Length(1), // Instructions
        ])
        .split(inner_area);

    let title_style = if app.input_mode == InputMode::EditingTitle {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let title_para = Paragraph::new(format!("Title: {}", app.title_input)).style(title_style);
    frame.render_widget(title_para, chunks[0]);

    // Free text on purpose: the calculator treats unreadable dates as "no
    // deadline yet passed", so nothing is validated here
    let date_style = if app.input_mode == InputMode::EditingDate {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let date_para = Paragraph::new(format!("Due date: {}", app.date_input)).style(date_style);
    frame.render_widget(date_para, chunks[1]);

    let instructions = Paragraph::new("Tab: Switch | Enter: Save | Esc: Cancel")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
    frame.render_widget(instructions, chunks[2]);

    // Set cursor position based on which field is being edited
    match app.input_mode {
        InputMode::EditingTitle => {
            let cursor_x = chunks[0].x + 7 + app.title_input.len() as u16; // "Title: " is 7 chars
            if cursor_x < chunks[0].x + chunks[0].width {
                frame.set_cursor_position((cursor_x, chunks[0].y));
            }
        }
        InputMode::EditingDate => {
            let cursor_x = chunks[1].x + 10 + app.date_input.len() as u16; // "Due date: " is 10 chars
            if cursor_x < chunks[1].x + chunks[1].width {
                frame.set_cursor_position((cursor_x, chunks[1].y));
            }
        }
        _ => {}
    }
}

fn render_delete_panel(frame: &mut Frame, app: &App) {
    // Create a centered rectangle for the popup
    let popup_area = centered_rect(50, 40, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let popup_block = Block::default()
        .title("Delete?")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Black));

    let inner_area = popup_block.inner(popup_area);
    frame.render_widget(popup_block, popup_area);

    if let Some(deleting_id) = app.deleting_todo_id {
        if let Some(todo) = app.todos.iter().find(|t| t.id == deleting_id) {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(2), // Title
                    Constraint::Length(2), // Due date
                    Constraint::Length(3), // Buttons
                    Constraint::Length(1), // Instructions
                ])
                .split(inner_area);

            let title_para = Paragraph::new(format!("Title: {}", todo.title))
                .style(Style::default().add_modifier(Modifier::BOLD));
            frame.render_widget(title_para, chunks[0]);

            let date_text = match &todo.due_date {
                Some(due) => format!("Due: {due}"),
                None => "Due: not set".to_string(),
            };
            frame.render_widget(Paragraph::new(date_text), chunks[1]);

            // Yes / No buttons
            let button_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[2]);

            let yes_style = if app.delete_panel_yes_selected {
                Style::default()
                    .bg(Color::Green)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green)
            };
            let yes_button = Paragraph::new("[ Yes ]")
                .style(yes_style)
                .alignment(Alignment::Center);
            frame.render_widget(yes_button, button_chunks[0]);

            let no_style = if !app.delete_panel_yes_selected {
                Style::default()
                    .bg(Color::Red)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Red)
            };
            let no_button = Paragraph::new("[ No ]")
                .style(no_style)
                .alignment(Alignment::Center);
            frame.render_widget(no_button, button_chunks[1]);

            let instructions =
                Paragraph::new("Tab/Left/Right: Switch buttons | Enter: Confirm | Esc: Cancel")
                    .style(Style::default().fg(Color::Gray))
                    .alignment(Alignment::Center);
            frame.render_widget(instructions, chunks[3]);
        }
    }
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer_text = Line::from(vec![
        Span::styled(" + ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(": new  "),
        Span::styled("enter ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(": edit  "),
        Span::styled("d ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(": done  "),
        Span::styled("- ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(": delete  "),
        Span::styled("tab ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(": panels  "),
        Span::styled("q ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(": quit"),
    ]);

    let footer = Paragraph::new(footer_text);

    frame.render_widget(footer, area);
}

/// Helper function to create a centered rectangle
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    // December 5, 2025, noon UTC
    fn dec5() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 5, 12, 0, 0).unwrap()
    }

    fn todo(id: usize, title: &str, due: Option<&str>, completed: bool) -> Todo {
        let mut todo = Todo::new(id, title.to_string(), due.map(|s| s.to_string()));
        if completed {
            todo.toggle_completed();
        }
        todo
    }

    #[test]
    fn header_counts_incomplete_overdue_items() {
        let todos = vec![
            todo(1, "Overdue 1", Some("2025-11-30"), false),
            todo(2, "Overdue 2", Some("2025-12-01"), false),
            todo(3, "Overdue 3", Some("2025-12-02"), false),
            todo(4, "On time", Some("2025-12-25"), false),
        ];

        assert_eq!(list_header(&todos, &dec5()), "My Todos (3 overdue)");
    }

    #[test]
    fn header_is_plain_without_overdue_items() {
        let todos = vec![
            todo(1, "On time", Some("2025-12-25"), false),
            todo(2, "Also on time", Some("2025-12-31"), false),
        ];

        assert_eq!(list_header(&todos, &dec5()), "My Todos");
        assert_eq!(list_header(&[], &dec5()), "My Todos");
    }

    #[test]
    fn header_excludes_completed_items() {
        let todos = vec![
            todo(1, "Done late", Some("2025-11-30"), true),
            todo(2, "Still open", Some("2025-12-04"), false),
        ];

        assert_eq!(list_header(&todos, &dec5()), "My Todos (1 overdue)");
    }

    #[test]
    fn header_ignores_items_without_due_dates() {
        let todos = vec![
            todo(1, "No deadline", None, false),
            todo(2, "Late", Some("2025-11-30"), false),
        ];

        assert_eq!(list_header(&todos, &dec5()), "My Todos (1 overdue)");
    }

    #[test]
    fn note_spells_out_the_day_count() {
        let five_late = todo(1, "Late", Some("2025-11-30"), false);
        assert_eq!(
            overdue_note(&five_late, &dec5()).as_deref(),
            Some("5 days overdue")
        );

        let one_late = todo(2, "Late", Some("2025-12-04"), false);
        assert_eq!(
            overdue_note(&one_late, &dec5()).as_deref(),
            Some("1 day overdue")
        );
    }

    #[test]
    fn note_is_absent_for_completed_items() {
        let done_late = todo(1, "Done late", Some("2025-11-30"), true);
        assert_eq!(overdue_note(&done_late, &dec5()), None);
    }

    #[test]
    fn note_is_absent_when_not_overdue() {
        assert_eq!(overdue_note(&todo(1, "Today", Some("2025-12-05"), false), &dec5()), None);
        assert_eq!(overdue_note(&todo(2, "Future", Some("2026-12-25"), false), &dec5()), None);
        assert_eq!(overdue_note(&todo(3, "No deadline", None, false), &dec5()), None);
        assert_eq!(overdue_note(&todo(4, "Garbled", Some("invalid-date"), false), &dec5()), None);
    }

    #[test]
    fn due_label_renders_long_form() {
        assert_eq!(due_label("2025-12-25", &dec5()), "December 25, 2025");
        assert_eq!(due_label("2025-11-30T10:00:00Z", &dec5()), "November 30, 2025");
    }

    #[test]
    fn due_label_falls_back_to_stored_text() {
        assert_eq!(due_label("whenever", &dec5()), "whenever");
    }
}
