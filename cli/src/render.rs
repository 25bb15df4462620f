//! Plain-text rendering of a `TodoState` snapshot.

use std::fmt::Write;

use todo_core::TodoState;

pub const UNCONFIGURED_HINT: &str = "Please configure your API endpoint to start using the application.";

pub fn render(state: &TodoState, configured: bool) -> String {
    let mut out = String::new();

    if let Some(message) = &state.success_message {
        let _ = writeln!(out, "OK: {message}");
    }
    if !configured {
        let _ = writeln!(out, "{UNCONFIGURED_HINT}");
    }
    if let Some(error) = &state.error {
        let _ = writeln!(out, "Error: {error}");
    }

    if state.loading {
        let _ = writeln!(out, "Loading...");
    } else if state.todos.is_empty() && configured {
        let _ = writeln!(out, "No tasks yet. Add your first task!");
    }

    for todo in &state.todos {
        let mark = if todo.completed { 'x' } else { ' ' };
        let _ = writeln!(out, "[{mark}] {:>4}  {}", todo.id, todo.title);
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use todo_core::Todo;

    use super::*;

    fn todo(id: i64, title: &str, completed: bool) -> Todo {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        Todo {
            id,
            title: title.to_string(),
            completed,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn renders_one_line_per_todo() {
        let state = TodoState::default().with_todos(vec![todo(2, "Walk dog", false), todo(1, "Buy milk", true)]);
        assert_eq!(render(&state, true), "[ ]    2  Walk dog\n[x]    1  Buy milk\n");
    }

    #[test]
    fn empty_configured_list_gets_a_hint() {
        assert_eq!(render(&TodoState::default(), true), "No tasks yet. Add your first task!\n");
    }

    #[test]
    fn unconfigured_shows_the_setup_prompt() {
        let out = render(&TodoState::default(), false);
        assert_eq!(out, format!("{UNCONFIGURED_HINT}\n"));
    }

    #[test]
    fn banners_come_first() {
        let state = TodoState::default()
            .with_todos(vec![todo(1, "A", false)])
            .with_error("Failed to delete todo")
            .with_success_message("saved");
        let out = render(&state, true);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["OK: saved", "Error: Failed to delete todo", "[ ]    1  A"]);
    }
}
