use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use crate::error::Rejection;
use crate::model::{ListId, Task, TaskId, TodoList};
use crate::seed;

/// The one task whose text is being edited, and its in-progress text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
  pub task_id: TaskId,
  pub buffer: String,
}

/// In-memory owner of every list and task in the session.
///
/// Lists and tasks keep insertion order. Open-task counts are not stored;
/// [`TaskStore::count_for`] recomputes them from the task collection on
/// every call, so they cannot drift from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStore {
  lists: Vec<TodoList>,
  tasks: Vec<Task>,
  selected: ListId,
  editing: Option<EditDraft>,
  next_id: u64,
}

impl Default for TaskStore {
  fn default() -> Self {
    Self::new()
  }
}

impl TaskStore {
  /// Built-in lists and no tasks.
  pub fn new() -> Self {
    Self {
      lists: seed::builtin_lists(),
      tasks: vec![],
      selected: ListId::new(seed::DEFAULT_LIST_ID),
      editing: None,
      next_id: 0,
    }
  }

  /// Built-in lists plus the five demo tasks.
  pub fn with_demo_data() -> Self {
    let mut store = Self::new();
    for demo in seed::demo_tasks() {
      let id = store.allocate_id();
      let mut task = Task::new(id, demo.text.to_string(), ListId::new(demo.list_id));
      task.completed = demo.completed;
      task.important = demo.important;
      task.due = demo.due;
      store.tasks.push(task);
    }
    info!(tasks = store.tasks.len(), "installed demo data");
    store
  }

  pub fn lists(&self) -> &[TodoList] {
    &self.lists
  }

  pub fn tasks(&self) -> &[Task] {
    &self.tasks
  }

  pub fn list(&self, id: &ListId) -> Option<&TodoList> {
    self.lists.iter().find(|list| &list.id == id)
  }

  pub fn task(&self, id: TaskId) -> Option<&Task> {
    self.tasks.iter().find(|task| task.id == id)
  }

  pub fn selected(&self) -> &ListId {
    &self.selected
  }

  pub fn editing(&self) -> Option<&EditDraft> {
    self.editing.as_ref()
  }

  /// The selected list, if the selection still names one.
  pub fn current_list(&self) -> Option<&TodoList> {
    self.list(&self.selected)
  }

  /// Number of incomplete tasks in `list_id`.
  pub fn count_for(&self, list_id: &ListId) -> usize {
    self.tasks_in(list_id).filter(|task| !task.completed).count()
  }

  /// Tasks of `list_id` in insertion order. The iterator borrows the
  /// collection and can be cloned to walk it again.
  pub fn tasks_in<'a>(
    &'a self,
    list_id: &'a ListId,
  ) -> impl Iterator<Item = &'a Task> + Clone + 'a {
    self.tasks
      .iter()
      .filter(move |task| &task.list_id == list_id)
  }

  pub fn visible_tasks(&self) -> impl Iterator<Item = &Task> + Clone + '_ {
    self.tasks_in(&self.selected)
  }

  #[instrument(skip(self))]
  pub fn create_list(&mut self, name: &str) -> Result<ListId, Rejection> {
    if name.trim().is_empty() {
      return Err(Rejection::EmptyInput { field: "list name" });
    }

    let list = TodoList::user(name);
    if self.list(&list.id).is_some() {
      debug!(list = %list.id, "list slug already taken");
      return Err(Rejection::DuplicateList(list.id));
    }

    let id = list.id.clone();
    info!(list = %id, name = %list.name, "created list");
    self.lists.push(list);
    Ok(id)
  }

  pub fn select_list(&mut self, id: &ListId) -> Result<(), Rejection> {
    if self.list(id).is_none() {
      return Err(Rejection::ListNotFound(id.clone()));
    }
    debug!(list = %id, "selected list");
    self.selected = id.clone();
    Ok(())
  }

  /// Appends a task to the selected list.
  #[instrument(skip(self))]
  pub fn add_task(&mut self, text: &str) -> Result<TaskId, Rejection> {
    if text.trim().is_empty() {
      return Err(Rejection::EmptyInput { field: "task text" });
    }
    if self.current_list().is_none() {
      return Err(Rejection::ListNotFound(self.selected.clone()));
    }

    let id = self.allocate_id();
    self.tasks
      .push(Task::new(id, text.to_string(), self.selected.clone()));
    info!(task = %id, list = %self.selected, "added task");
    Ok(id)
  }

  /// Flips the completed flag and returns its new value.
  pub fn toggle_completed(&mut self, id: TaskId) -> Result<bool, Rejection> {
    let task = self.task_mut(id)?;
    task.completed = !task.completed;
    debug!(task = %id, completed = task.completed, "toggled completed");
    Ok(task.completed)
  }

  /// Flips the important flag and returns its new value.
  pub fn toggle_important(&mut self, id: TaskId) -> Result<bool, Rejection> {
    let task = self.task_mut(id)?;
    task.important = !task.important;
    debug!(task = %id, important = task.important, "toggled important");
    Ok(task.important)
  }

  /// Puts `id` under edit with its current text as the draft. Any other
  /// draft in progress is dropped.
  pub fn begin_edit(&mut self, id: TaskId) -> Result<(), Rejection> {
    let text = self
      .task(id)
      .map(|task| task.text.clone())
      .ok_or(Rejection::TaskNotFound(id))?;

    if let Some(previous) = &self.editing
      && previous.task_id != id
    {
      debug!(abandoned = %previous.task_id, "discarding uncommitted edit");
    }

    self.editing = Some(EditDraft {
      task_id: id,
      buffer: text,
    });
    Ok(())
  }

  pub fn set_edit_buffer(&mut self, text: String) -> Result<TaskId, Rejection> {
    let draft = self.editing.as_mut().ok_or(Rejection::NoActiveEdit)?;
    draft.buffer = text;
    Ok(draft.task_id)
  }

  /// Writes `text` to the task under edit and leaves edit mode. A blank
  /// `text` keeps edit mode active.
  #[instrument(skip(self))]
  pub fn commit_edit(&mut self, id: TaskId, text: &str) -> Result<(), Rejection> {
    if !self
      .editing
      .as_ref()
      .is_some_and(|draft| draft.task_id == id)
    {
      return Err(Rejection::NotEditing(id));
    }
    if text.trim().is_empty() {
      return Err(Rejection::EmptyInput { field: "task text" });
    }

    let task = self.task_mut(id)?;
    task.text = text.to_string();
    self.editing = None;
    info!(task = %id, "updated task text");
    Ok(())
  }

  #[instrument(skip(self))]
  pub fn delete_task(&mut self, id: TaskId) -> Result<Task, Rejection> {
    let idx = self
      .tasks
      .iter()
      .position(|task| task.id == id)
      .ok_or(Rejection::TaskNotFound(id))?;

    let task = self.tasks.remove(idx);
    if self
      .editing
      .as_ref()
      .is_some_and(|draft| draft.task_id == id)
    {
      self.editing = None;
    }
    info!(task = %id, list = %task.list_id, "deleted task");
    Ok(task)
  }

  pub fn set_due(&mut self, id: TaskId, due: Option<NaiveDate>) -> Result<(), Rejection> {
    let task = self.task_mut(id)?;
    task.due = due;
    debug!(task = %id, ?due, "set due date");
    Ok(())
  }

  /// Blank notes clear the field.
  pub fn set_notes(&mut self, id: TaskId, notes: Option<String>) -> Result<(), Rejection> {
    let task = self.task_mut(id)?;
    task.notes = notes.filter(|text| !text.trim().is_empty());
    debug!(task = %id, has_notes = task.notes.is_some(), "set notes");
    Ok(())
  }

  fn task_mut(&mut self, id: TaskId) -> Result<&mut Task, Rejection> {
    self.tasks
      .iter_mut()
      .find(|task| task.id == id)
      .ok_or(Rejection::TaskNotFound(id))
  }

  fn allocate_id(&mut self) -> TaskId {
    self.next_id += 1;
    TaskId::new(self.next_id)
  }
}
