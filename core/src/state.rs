//! Immutable view-state snapshots.
//!
//! Every transition takes `&self` and returns a new `TodoState`; the list is
//! only ever replaced wholesale, prepended to, or changed at a single `id`.

use crate::types::{Todo, TodoId};

/// An in-progress inline rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: TodoId,
    pub text: String,
}

/// Everything a rendering layer needs to draw the todo view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoState {
    pub todos: Vec<Todo>,
    pub loading: bool,
    pub error: Option<String>,
    pub success_message: Option<String>,
    pub draft: String,
    pub editing: Option<EditSession>,
}

impl TodoState {
    pub fn find(&self, id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn with_todos(&self, todos: Vec<Todo>) -> Self {
        Self {
            todos,
            ..self.clone()
        }
    }

    pub fn with_prepended(&self, todo: Todo) -> Self {
        let mut todos = Vec::with_capacity(self.todos.len() + 1);
        todos.push(todo);
        todos.extend(self.todos.iter().cloned());
        self.with_todos(todos)
    }

    /// Swap in `todo` wherever an item with `id` sits. Unknown ids leave the
    /// list as it was.
    pub fn with_replaced(&self, id: TodoId, todo: Todo) -> Self {
        let todos = self
            .todos
            .iter()
            .map(|t| if t.id == id { todo.clone() } else { t.clone() })
            .collect();
        self.with_todos(todos)
    }

    pub fn without(&self, id: TodoId) -> Self {
        let todos = self.todos.iter().filter(|t| t.id != id).cloned().collect();
        self.with_todos(todos)
    }

    pub fn with_loading(&self, loading: bool) -> Self {
        Self {
            loading,
            ..self.clone()
        }
    }

    pub fn with_error(&self, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..self.clone()
        }
    }

    pub fn without_error(&self) -> Self {
        Self {
            error: None,
            ..self.clone()
        }
    }

    pub fn with_success_message(&self, message: impl Into<String>) -> Self {
        Self {
            success_message: Some(message.into()),
            ..self.clone()
        }
    }

    pub fn without_success_message(&self) -> Self {
        Self {
            success_message: None,
            ..self.clone()
        }
    }

    pub fn with_draft(&self, draft: impl Into<String>) -> Self {
        Self {
            draft: draft.into(),
            ..self.clone()
        }
    }

    pub fn editing(&self, id: TodoId, text: impl Into<String>) -> Self {
        Self {
            editing: Some(EditSession { id, text: text.into() }),
            ..self.clone()
        }
    }

    /// Update the edit buffer; a no-op when nothing is being edited.
    pub fn with_edit_text(&self, text: impl Into<String>) -> Self {
        match &self.editing {
            Some(session) => self.editing(session.id, text),
            None => self.clone(),
        }
    }

    pub fn without_editing(&self) -> Self {
        Self {
            editing: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    pub(crate) fn todo(id: TodoId, title: &str, completed: bool) -> Todo {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        Todo {
            id,
            title: title.to_string(),
            completed,
            created_at: at,
            updated_at: at,
        }
    }

    fn abc() -> TodoState {
        TodoState::default().with_todos(vec![todo(1, "A", false), todo(2, "B", false), todo(3, "C", true)])
    }

    #[test]
    fn prepend_puts_new_item_first() {
        let state = abc().with_prepended(todo(4, "D", false));
        let ids: Vec<_> = state.todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 1, 2, 3]);
    }

    #[test]
    fn replace_touches_only_the_matching_item() {
        let before = abc();
        let after = before.with_replaced(2, todo(2, "B2", true));
        assert_eq!(after.todos[0], before.todos[0]);
        assert_eq!(after.todos[1], todo(2, "B2", true));
        assert_eq!(after.todos[2], before.todos[2]);
    }

    #[test]
    fn replace_with_unknown_id_changes_nothing() {
        let before = abc();
        assert_eq!(before.with_replaced(99, todo(99, "X", false)), before);
    }

    #[test]
    fn without_removes_by_id_and_keeps_order() {
        let state = abc().without(2);
        let ids: Vec<_> = state.todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn transitions_leave_the_source_untouched() {
        let before = abc();
        let _ = before.without(1).with_error("boom").with_loading(true);
        assert_eq!(before.todos.len(), 3);
        assert!(before.error.is_none());
        assert!(!before.loading);
    }

    #[test]
    fn edit_text_requires_an_edit_session() {
        let idle = TodoState::default().with_edit_text("ignored");
        assert!(idle.editing.is_none());

        let editing = abc().editing(1, "A").with_edit_text("A!");
        assert_eq!(editing.editing, Some(EditSession { id: 1, text: "A!".to_string() }));
        assert!(editing.without_editing().editing.is_none());
    }
}
