use std::collections::HashSet;

use proptest::prelude::*;
use todocal_core::{Action, AppState, ListId, Rejection, Screen, TaskId, TaskStore};

fn signed_in() -> AppState {
  let mut state = AppState::default();
  state
    .apply(Action::SubmitCredentials {
      email: "me@example.com".to_string(),
      password: "secret".to_string(),
    })
    .expect("sign in");
  state
}

fn count(state: &AppState, list: &str) -> usize {
  state.store().count_for(&ListId::new(list))
}

#[test]
fn seed_scenario() {
  let state = signed_in();
  let store = state.store();

  assert_eq!(store.tasks().len(), 5);
  for list in ["my-day", "work", "groceries", "fitness", "getting-started"] {
    assert_eq!(
      store.tasks_in(&ListId::new(list)).count(),
      1,
      "one demo task in {list}"
    );
  }
  assert_eq!(store.tasks_in(&ListId::new("personal")).count(), 0);
  assert_eq!(count(&state, "my-day"), 1);
  assert_eq!(count(&state, "fitness"), 0);
}

#[test]
fn add_scenario() {
  let mut state = signed_in();
  state
    .apply(Action::SelectList(ListId::new("groceries")))
    .expect("select");
  let before = count(&state, "groceries");

  state
    .apply(Action::AddTask("Buy eggs".to_string()))
    .expect("add");

  let store = state.store();
  assert_eq!(store.tasks().len(), 6);
  let task = store.tasks().last().expect("new task");
  assert_eq!(task.text, "Buy eggs");
  assert!(!task.completed);
  assert!(!task.important);
  assert_eq!(task.list_id, "groceries");
  assert_eq!(count(&state, "groceries"), before + 1);
}

#[test]
fn blank_add_is_rejected() {
  let mut state = signed_in();
  let before = state.clone();
  assert_eq!(
    state.apply(Action::AddTask("   ".to_string())),
    Err(Rejection::EmptyInput { field: "task text" })
  );
  assert_eq!(state, before);
}

#[test]
fn delete_scenario() {
  let mut state = signed_in();

  // "TPS reports" is open.
  assert_eq!(count(&state, "work"), 1);
  state
    .apply(Action::DeleteTask(TaskId::new(2)))
    .expect("delete open task");
  assert_eq!(count(&state, "work"), 0);

  // "Morning workout" is already done.
  assert_eq!(count(&state, "fitness"), 0);
  state
    .apply(Action::DeleteTask(TaskId::new(4)))
    .expect("delete completed task");
  assert_eq!(count(&state, "fitness"), 0);
  assert_eq!(state.store().tasks().len(), 3);
}

#[test]
fn edit_commit_scenario() {
  let mut state = signed_in();
  let id = TaskId::new(5);
  let before = state.store().task(id).cloned().expect("task");

  state.apply(Action::BeginEdit(id)).expect("begin edit");
  assert_eq!(
    state.store().editing().map(|draft| draft.buffer.as_str()),
    Some("Set up todo app")
  );
  state
    .apply(Action::CommitEdit {
      id,
      text: "New text".to_string(),
    })
    .expect("commit");

  let after = state.store().task(id).expect("task");
  assert_eq!(after.text, "New text");
  assert_eq!(after.completed, before.completed);
  assert_eq!(after.important, before.important);
  assert_eq!(after.list_id, before.list_id);
  assert!(state.store().editing().is_none());
}

#[test]
fn list_creation_scenario() {
  let mut state = signed_in();
  state
    .apply(Action::SetNewListDraft("Home Projects".to_string()))
    .expect("draft");
  state
    .apply(Action::CreateList("Home Projects".to_string()))
    .expect("create");

  let list = state.store().lists().last().expect("new list");
  assert_eq!(list.id, "home-projects");
  assert_eq!(list.name, "Home Projects");
  assert!(state.drafts().new_list.is_empty());
  assert_eq!(count(&state, "home-projects"), 0);

  assert_eq!(
    state.apply(Action::CreateList("   ".to_string())),
    Err(Rejection::EmptyInput { field: "list name" })
  );
}

#[test]
fn session_round_trip() {
  let mut state = AppState::default();
  assert_eq!(state.screen(), Screen::SignIn);
  assert_eq!(
    state.apply(Action::SubmitCredentials {
      email: String::new(),
      password: "x".to_string(),
    }),
    Err(Rejection::InvalidCredentials)
  );

  state.apply(Action::ToggleAuthMode).expect("toggle");
  state
    .apply(Action::SubmitCredentials {
      email: "new@example.com".to_string(),
      password: "x".to_string(),
    })
    .expect("sign up");
  assert_eq!(state.screen(), Screen::Tasks);

  state.apply(Action::SignOut).expect("sign out");
  assert_eq!(state.screen(), Screen::SignIn);
  assert_eq!(state.store().tasks().len(), 5);
}

#[derive(Debug, Clone)]
enum Op {
  Select(usize),
  Add(String),
  Toggle(u64),
  Star(u64),
  Delete(u64),
  CreateList(String),
  Edit(u64, String),
}

fn op_strategy() -> impl Strategy<Value = Op> {
  prop_oneof![
    (0usize..10).prop_map(Op::Select),
    "[a-z ]{0,6}".prop_map(Op::Add),
    (0u64..16).prop_map(Op::Toggle),
    (0u64..16).prop_map(Op::Star),
    (0u64..16).prop_map(Op::Delete),
    "[A-Za-z ]{0,6}".prop_map(Op::CreateList),
    (0u64..16, "[a-z ]{0,6}").prop_map(|(id, text)| Op::Edit(id, text)),
  ]
}

/// Expected (id, list, completed) triples in insertion order.
fn model_of(store: &TaskStore) -> Vec<(TaskId, ListId, bool)> {
  store
    .tasks()
    .iter()
    .map(|t| (t.id, t.list_id.clone(), t.completed))
    .collect()
}

proptest! {
  #[test]
  fn counts_and_filters_track_every_mutation(ops in prop::collection::vec(op_strategy(), 0..40)) {
    let mut state = signed_in();
    let mut model = model_of(state.store());
    let mut seen_ids: HashSet<TaskId> = model.iter().map(|(id, _, _)| *id).collect();

    for op in ops {
      match op {
        Op::Select(idx) => {
          let lists = state.store().lists();
          let id = lists[idx % lists.len()].id.clone();
          state.apply(Action::SelectList(id)).expect("select existing list");
        }
        Op::Add(text) => {
          let selected = state.store().selected().clone();
          match state.apply(Action::AddTask(text.clone())) {
            Ok(_) => {
              prop_assert!(!text.trim().is_empty());
              let task = state.store().tasks().last().expect("added");
              prop_assert!(seen_ids.insert(task.id), "task ids must never repeat");
              model.push((task.id, selected, false));
            }
            Err(_) => prop_assert!(text.trim().is_empty()),
          }
        }
        Op::Toggle(raw) => {
          let id = TaskId::new(raw);
          let result = state.apply(Action::ToggleCompleted(id));
          match model.iter_mut().find(|(tid, _, _)| *tid == id) {
            Some(entry) => {
              prop_assert!(result.is_ok());
              entry.2 = !entry.2;
            }
            None => prop_assert_eq!(result, Err(Rejection::TaskNotFound(id))),
          }
        }
        Op::Star(raw) => {
          let id = TaskId::new(raw);
          let exists = model.iter().any(|(tid, _, _)| *tid == id);
          prop_assert_eq!(state.apply(Action::ToggleImportant(id)).is_ok(), exists);
        }
        Op::Delete(raw) => {
          let id = TaskId::new(raw);
          let result = state.apply(Action::DeleteTask(id));
          match model.iter().position(|(tid, _, _)| *tid == id) {
            Some(idx) => {
              prop_assert!(result.is_ok());
              model.remove(idx);
            }
            None => prop_assert!(result.is_err()),
          }
        }
        Op::CreateList(name) => {
          let _ = state.apply(Action::CreateList(name));
        }
        Op::Edit(raw, text) => {
          let id = TaskId::new(raw);
          let exists = model.iter().any(|(tid, _, _)| *tid == id);
          prop_assert_eq!(state.apply(Action::BeginEdit(id)).is_ok(), exists);
          let result = state.apply(Action::CommitEdit { id, text: text.clone() });
          if !exists {
            prop_assert_eq!(result, Err(Rejection::NotEditing(id)));
          } else if text.trim().is_empty() {
            prop_assert!(result.is_err());
            prop_assert_eq!(state.store().editing().map(|draft| draft.task_id), Some(id));
          } else {
            prop_assert!(result.is_ok());
            prop_assert!(state.store().editing().is_none());
            let task = state.store().task(id).expect("edited task");
            prop_assert_eq!(&task.text, &text);
          }
        }
      }

      prop_assert_eq!(&model_of(state.store()), &model);

      // An edit draft always points at a task that still exists.
      if let Some(draft) = state.store().editing() {
        prop_assert!(state.store().task(draft.task_id).is_some());
      }

      for list in state.store().lists() {
        let expected = model
          .iter()
          .filter(|(_, lid, done)| lid == &list.id && !done)
          .count();
        prop_assert_eq!(state.store().count_for(&list.id), expected);
      }

      let selected = state.store().selected().clone();
      let visible: Vec<TaskId> = state.store().visible_tasks().map(|t| t.id).collect();
      let expected: Vec<TaskId> = model
        .iter()
        .filter(|(_, lid, _)| *lid == selected)
        .map(|(id, _, _)| *id)
        .collect();
      prop_assert_eq!(visible, expected);
    }
  }

  #[test]
  fn double_toggle_is_identity(raw in 1u64..=5) {
    let mut state = signed_in();
    let before = state.clone();
    let id = TaskId::new(raw);

    state.apply(Action::ToggleCompleted(id)).expect("toggle");
    state.apply(Action::ToggleCompleted(id)).expect("toggle back");
    state.apply(Action::ToggleImportant(id)).expect("star");
    state.apply(Action::ToggleImportant(id)).expect("unstar");

    prop_assert_eq!(state, before);
  }
}
