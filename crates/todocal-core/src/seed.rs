use chrono::NaiveDate;

use crate::model::TodoList;

/// List selected when a session starts.
pub const DEFAULT_LIST_ID: &str = "my-day";

/// The six lists every session starts with, in sidebar order.
pub fn builtin_lists() -> Vec<TodoList> {
  vec![
    TodoList::builtin("my-day", "My Day", "☀️", "my-day-gradient"),
    TodoList::builtin("groceries", "Groceries", "🛒", "groceries-gradient"),
    TodoList::builtin("work", "Work", "💼", "work-gradient"),
    TodoList::builtin("personal", "Personal", "👤", "personal-gradient"),
    TodoList::builtin("fitness", "Fitness", "🏃", "fitness-gradient"),
    TodoList::builtin(
      "getting-started",
      "Getting Started",
      "🚀",
      "getting-started-gradient",
    ),
  ]
}

#[derive(Debug, Clone)]
pub struct DemoTask {
  pub text: &'static str,
  pub list_id: &'static str,
  pub completed: bool,
  pub important: bool,
  pub due: Option<NaiveDate>,
}

pub fn demo_tasks() -> Vec<DemoTask> {
  vec![
    DemoTask {
      text: "Clean my room",
      list_id: "my-day",
      completed: false,
      important: true,
      due: NaiveDate::from_ymd_opt(2025, 6, 5),
    },
    DemoTask {
      text: "TPS reports",
      list_id: "work",
      completed: false,
      important: false,
      due: None,
    },
    DemoTask {
      text: "Buy milk",
      list_id: "groceries",
      completed: false,
      important: false,
      due: None,
    },
    DemoTask {
      text: "Morning workout",
      list_id: "fitness",
      completed: true,
      important: false,
      due: None,
    },
    DemoTask {
      text: "Set up todo app",
      list_id: "getting-started",
      completed: false,
      important: true,
      due: None,
    },
  ]
}
