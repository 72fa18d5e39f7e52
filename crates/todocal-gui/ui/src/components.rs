use todocal_core::session::AuthMode;
use todocal_core::view::{self, APP_TAGLINE, APP_TITLE, DEMO_HINT};
use todocal_core::{Action, Notification, SettingChange, Settings, Task, Theme, TodoList};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::{Callback, Html, Properties, TargetCast, classes, function_component, html};

/// Sidebar row data, owned so it can cross the props boundary.
#[derive(Clone, PartialEq)]
pub struct ListItem {
  pub list: TodoList,
  pub badge: Option<usize>,
  pub selected: bool,
}

#[derive(Clone, PartialEq)]
pub struct RowData {
  pub task: Task,
  pub draft: Option<String>,
}

fn input_value(e: &yew::InputEvent) -> String {
  let input: HtmlInputElement = e.target_unchecked_into();
  input.value()
}

#[derive(Properties, PartialEq)]
pub struct SignInPageProps {
  pub mode: AuthMode,
  pub email: String,
  pub password: String,
  pub on_action: Callback<Action>,
}

#[function_component(SignInPage)]
pub fn sign_in_page(props: &SignInPageProps) -> Html {
  let on_submit = {
    let on_action = props.on_action.clone();
    let email = props.email.clone();
    let password = props.password.clone();
    Callback::from(move |e: yew::SubmitEvent| {
      e.prevent_default();
      on_action.emit(Action::SubmitCredentials {
        email: email.clone(),
        password: password.clone(),
      });
    })
  };
  let on_email = {
    let on_action = props.on_action.clone();
    Callback::from(move |e: yew::InputEvent| {
      on_action.emit(Action::SetEmailDraft(input_value(&e)));
    })
  };
  let on_password = {
    let on_action = props.on_action.clone();
    Callback::from(move |e: yew::InputEvent| {
      on_action.emit(Action::SetPasswordDraft(input_value(&e)));
    })
  };
  let on_toggle = {
    let on_action = props.on_action.clone();
    Callback::from(move |_: yew::MouseEvent| on_action.emit(Action::ToggleAuthMode))
  };

  html! {
    <div class="signin">
      <div class="signin-brand">
        <div class="signin-logo">{ "✓" }</div>
        <h1>{ APP_TITLE }</h1>
        <p>{ APP_TAGLINE }</p>
      </div>
      <div class="card">
        <div class="header">{ props.mode.title() }</div>
        <p class="muted">{ props.mode.description() }</p>
        <form onsubmit={on_submit}>
          <div class="field">
            <label for="email">{ "Email" }</label>
            <input
              id="email"
              type="email"
              placeholder="Enter your email"
              value={props.email.clone()}
              oninput={on_email}
            />
          </div>
          <div class="field">
            <label for="password">{ "Password" }</label>
            <input
              id="password"
              type="password"
              placeholder="Enter your password"
              value={props.password.clone()}
              oninput={on_password}
            />
          </div>
          <button type="submit" class="btn primary wide">{ props.mode.title() }</button>
        </form>
        <button type="button" class="link" onclick={on_toggle}>
          { props.mode.toggle_label() }
        </button>
        <div class="demo-hint">{ DEMO_HINT }</div>
      </div>
    </div>
  }
}

#[derive(Properties, PartialEq)]
pub struct SidebarProps {
  pub lists: Vec<ListItem>,
  pub new_list: String,
  pub on_action: Callback<Action>,
  pub on_open_settings: Callback<yew::MouseEvent>,
}

#[function_component(Sidebar)]
pub fn sidebar(props: &SidebarProps) -> Html {
  let on_sign_out = {
    let on_action = props.on_action.clone();
    Callback::from(move |_: yew::MouseEvent| on_action.emit(Action::SignOut))
  };
  let on_new_list_input = {
    let on_action = props.on_action.clone();
    Callback::from(move |e: yew::InputEvent| {
      on_action.emit(Action::SetNewListDraft(input_value(&e)));
    })
  };
  let on_new_list_submit = {
    let on_action = props.on_action.clone();
    let name = props.new_list.clone();
    Callback::from(move |e: yew::SubmitEvent| {
      e.prevent_default();
      on_action.emit(Action::CreateList(name.clone()));
    })
  };

  html! {
    <div class="panel sidebar">
      <div class="header sidebar-header">
        <button class="btn ghost" onclick={on_sign_out}>{ "Sign Out" }</button>
        <button class="btn ghost" title="Settings" onclick={props.on_open_settings.clone()}>{ "⚙" }</button>
      </div>
      <div class="lists">
        {
          for props.lists.iter().map(|item| {
            let class = if item.selected { "item active" } else { "item" };
            let on_select = {
              let on_action = props.on_action.clone();
              let id = item.list.id.clone();
              Callback::from(move |_: yew::MouseEvent| {
                on_action.emit(Action::SelectList(id.clone()));
              })
            };
            html! {
              <div class={class} onclick={on_select}>
                <span class="icon">{ &item.list.icon }</span>
                <span class="name">{ &item.list.name }</span>
                {
                  match item.badge {
                    Some(count) => html! { <span class="badge">{ count }</span> },
                    None => html! {},
                  }
                }
              </div>
            }
          })
        }
      </div>
      <form class="new-list" onsubmit={on_new_list_submit}>
        <input
          placeholder="New list name"
          value={props.new_list.clone()}
          oninput={on_new_list_input}
        />
        <button type="submit" class="btn">{ "+" }</button>
      </form>
    </div>
  }
}

#[derive(Properties, PartialEq)]
pub struct TaskPanelProps {
  pub list: Option<TodoList>,
  pub date_label: String,
  pub rows: Vec<RowData>,
  pub new_task: String,
  pub on_action: Callback<Action>,
  pub on_open_settings: Callback<yew::MouseEvent>,
}

#[function_component(TaskPanel)]
pub fn task_panel(props: &TaskPanelProps) -> Html {
  let (icon, name, gradient) = props
    .list
    .as_ref()
    .map(|list| (list.icon.clone(), list.name.clone(), list.gradient.clone()))
    .unwrap_or_default();

  let on_task_input = {
    let on_action = props.on_action.clone();
    Callback::from(move |e: yew::InputEvent| {
      on_action.emit(Action::SetNewTaskDraft(input_value(&e)));
    })
  };
  let on_task_submit = {
    let on_action = props.on_action.clone();
    let text = props.new_task.clone();
    Callback::from(move |e: yew::SubmitEvent| {
      e.prevent_default();
      on_action.emit(Action::AddTask(text.clone()));
    })
  };

  html! {
    <div class="panel main">
      <div class={classes!("list-header", gradient)}>
        <div>
          <h1><span class="icon">{ icon }</span>{ name }</h1>
          <p class="date">{ &props.date_label }</p>
        </div>
        <button class="btn ghost" title="Settings" onclick={props.on_open_settings.clone()}>{ "⚙" }</button>
      </div>
      <form class="add-task" onsubmit={on_task_submit}>
        <input
          placeholder="Add a task"
          value={props.new_task.clone()}
          oninput={on_task_input}
        />
        <button type="submit" class="btn primary">{ "+" }</button>
      </form>
      <div class="tasks">
        {
          if props.rows.is_empty() {
            html! {
              <div class="empty-state">
                <p class="empty-title">{ view::EMPTY_STATE_TITLE }</p>
                <p>{ view::EMPTY_STATE_HINT }</p>
              </div>
            }
          } else {
            html! {
              <>{
                for props.rows.iter().map(|row| html! {
                  <TaskRowView
                    key={row.task.id.get()}
                    row={row.clone()}
                    on_action={props.on_action.clone()}
                  />
                })
              }</>
            }
          }
        }
      </div>
    </div>
  }
}

#[derive(Properties, PartialEq)]
pub struct TaskRowProps {
  pub row: RowData,
  pub on_action: Callback<Action>,
}

#[function_component(TaskRowView)]
pub fn task_row_view(props: &TaskRowProps) -> Html {
  let task = &props.row.task;
  let id = task.id;

  let emit = |action: Action| {
    let on_action = props.on_action.clone();
    Callback::from(move |_: yew::MouseEvent| on_action.emit(action.clone()))
  };

  let body = match &props.row.draft {
    Some(draft) => {
      let on_draft = {
        let on_action = props.on_action.clone();
        Callback::from(move |e: yew::InputEvent| {
          on_action.emit(Action::SetEditDraft(input_value(&e)));
        })
      };
      let on_save = {
        let on_action = props.on_action.clone();
        let text = draft.clone();
        Callback::from(move |e: yew::SubmitEvent| {
          e.prevent_default();
          on_action.emit(Action::CommitEdit {
            id,
            text: text.clone(),
          });
        })
      };
      html! {
        <form class="edit" onsubmit={on_save}>
          <input value={draft.clone()} oninput={on_draft} />
          <button type="submit" class="btn">{ "Save" }</button>
        </form>
      }
    }
    None => html! {
      <span class={classes!("text", task.completed.then_some("done"))}>{ &task.text }</span>
    },
  };

  html! {
    <div class={classes!("task", task.completed.then_some("completed"))}>
      <div class="task-line">
        <button class="check" onclick={emit(Action::ToggleCompleted(id))}>
          { if task.completed { "●" } else { "○" } }
        </button>
        { body }
        <button
          class={classes!("star", task.important.then_some("on"))}
          onclick={emit(Action::ToggleImportant(id))}
        >
          { if task.important { "★" } else { "☆" } }
        </button>
        <button class="icon-btn" title="Edit" onclick={emit(Action::BeginEdit(id))}>{ "✎" }</button>
        <button class="icon-btn" title="Delete" onclick={emit(Action::DeleteTask(id))}>{ "🗑" }</button>
      </div>
      {
        match task.due {
          Some(due) => html! { <div class="due">{ view::due_label(due) }</div> },
          None => html! {},
        }
      }
      {
        match &task.notes {
          Some(notes) => html! { <div class="notes">{ notes }</div> },
          None => html! {},
        }
      }
    </div>
  }
}

#[derive(Properties, PartialEq)]
pub struct SettingsModalProps {
  pub open: bool,
  pub settings: Settings,
  pub on_action: Callback<Action>,
  pub on_close: Callback<yew::MouseEvent>,
}

#[function_component(SettingsModal)]
pub fn settings_modal(props: &SettingsModalProps) -> Html {
  if !props.open {
    return html! {};
  }

  let on_switch = |make: fn(bool) -> SettingChange| {
    let on_action = props.on_action.clone();
    Callback::from(move |e: yew::Event| {
      let input: HtmlInputElement = e.target_unchecked_into();
      on_action.emit(Action::ChangeSetting(make(input.checked())));
    })
  };
  let on_theme = {
    let on_action = props.on_action.clone();
    Callback::from(move |e: yew::Event| {
      let select: HtmlSelectElement = e.target_unchecked_into();
      match Theme::from_key(&select.value()) {
        Some(theme) => on_action.emit(Action::ChangeSetting(SettingChange::Theme(theme))),
        None => tracing::warn!(value = %select.value(), "unknown theme selected"),
      }
    })
  };

  html! {
    <div class="modal-backdrop" onclick={props.on_close.clone()}>
      <div class="modal modal-sm" onclick={Callback::from(|e: yew::MouseEvent| e.stop_propagation())}>
        <div class="header">{ "Settings" }</div>
        <div class="content">
          <label class="switch-row">
            <span>{ "Enable Notifications" }</span>
            <input
              type="checkbox"
              checked={props.settings.notifications}
              onchange={on_switch(SettingChange::Notifications)}
            />
          </label>
          <label class="switch-row">
            <span>{ "Auto Sort Tasks" }</span>
            <input
              type="checkbox"
              checked={props.settings.auto_sort}
              onchange={on_switch(SettingChange::AutoSort)}
            />
          </label>
          <div class="field">
            <label for="theme">{ "Theme" }</label>
            <select id="theme" onchange={on_theme}>
              {
                for Theme::all().into_iter().map(|theme| html! {
                  <option
                    value={theme.as_key()}
                    selected={theme == props.settings.theme}
                  >
                    { theme.label() }
                  </option>
                })
              }
            </select>
          </div>
          <div class="footer">
            <button type="button" class="btn" onclick={props.on_close.clone()}>{ "Close" }</button>
          </div>
        </div>
      </div>
    </div>
  }
}

#[derive(Properties, PartialEq)]
pub struct ToastsProps {
  /// The notifications setting; when off nothing is drawn.
  pub enabled: bool,
  pub notifications: Vec<Notification>,
  pub on_action: Callback<Action>,
}

#[function_component(Toasts)]
pub fn toasts(props: &ToastsProps) -> Html {
  if !props.enabled {
    return html! {};
  }

  html! {
    <div class="toasts">
      {
        for props.notifications.iter().map(|note| {
          let seq = note.seq;
          let on_action = props.on_action.clone();
          html! {
            <div
              key={seq}
              class="toast"
              onclick={Callback::from(move |_: yew::MouseEvent| {
                on_action.emit(Action::DismissNotification(seq));
              })}
            >
              { &note.message }
            </div>
          }
        })
      }
    </div>
  }
}
