//! Plain-text rendering of the todo list.

use lazytodo_core::Todo;

pub const EMPTY_LIST_MESSAGE: &str = "Empty list";
pub const LIST_COMPLETED_MESSAGE: &str = "Todo list is completed";

/// Renders one todo as a single line.
pub fn render_todo(todo: &Todo, expired: bool) -> String {
    let mark = if todo.completed { "[x]" } else { "[ ]" };
    let mut line = format!(
        "{mark} {}  {}: {}  due {}",
        todo.id, todo.title, todo.description, todo.deadline
    );
    if expired {
        line.push_str(" (expired)");
    }
    if todo.disabled {
        line.push_str(" [disabled]");
    }
    line
}

/// Renders the whole list plus the status message the list warrants.
pub fn render_list(
    todos: &[Todo],
    all_completed: bool,
    is_expired: impl Fn(&Todo) -> bool,
) -> Vec<String> {
    if todos.is_empty() {
        return vec![EMPTY_LIST_MESSAGE.to_string()];
    }

    let mut lines: Vec<String> = todos
        .iter()
        .map(|todo| render_todo(todo, is_expired(todo)))
        .collect();
    if all_completed {
        lines.push(LIST_COMPLETED_MESSAGE.to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{render_list, render_todo, EMPTY_LIST_MESSAGE, LIST_COMPLETED_MESSAGE};
    use lazytodo_core::TodoFactory;

    #[test]
    fn render_todo_marks_state() {
        let mut todo = TodoFactory::create_with_id("1", "Todo1", "description1", "2023-12-19")
            .unwrap();
        assert_eq!(
            render_todo(&todo, false),
            "[ ] 1  Todo1: description1  due 2023-12-19"
        );

        todo.completed = true;
        todo.disabled = true;
        assert_eq!(
            render_todo(&todo, true),
            "[x] 1  Todo1: description1  due 2023-12-19 (expired) [disabled]"
        );
    }

    #[test]
    fn render_list_reports_empty_and_completed_lists() {
        assert_eq!(render_list(&[], false, |_| false), vec![EMPTY_LIST_MESSAGE]);

        let todo = TodoFactory::create_with_id("1", "T", "D", "2099-01-01").unwrap();
        let lines = render_list(&[todo], true, |_| false);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], LIST_COMPLETED_MESSAGE);
    }
}
