use std::rc::Rc;

use gloo::console::log;
use gloo::timers::future::TimeoutFuture;
use todocal_core::view::{self, PanelBody};
use todocal_core::{Action, AppState, Screen};
use yew::{
  Callback, Html, MouseEvent, Reducible, classes, function_component, html, use_effect_with,
  use_mut_ref, use_reducer, use_state,
};

use crate::components::{
  ListItem, RowData, SettingsModal, Sidebar, SignInPage, TaskPanel, Toasts,
};

/// How long a toast stays up before it dismisses itself.
const TOAST_MS: u32 = 3_000;

/// Reducer wrapper so every UI event goes through `AppState::apply`.
#[derive(Clone, PartialEq, Default)]
pub struct Model {
  pub state: AppState,
}

impl Reducible for Model {
  type Action = Action;

  fn reduce(self: Rc<Self>, action: Action) -> Rc<Self> {
    if let Action::DismissNotification(seq) = action
      && !self.state.notifications().iter().any(|note| note.seq == seq)
    {
      return self;
    }

    let mut next = (*self).clone();
    match next.state.apply(action) {
      Ok(change) => {
        tracing::debug!(?change, "state changed");
        Rc::new(next)
      }
      Err(rejection) => {
        ui_debug("action.rejected", &rejection.to_string());
        self
      }
    }
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let model = use_reducer(Model::default);
  let settings_open = use_state(|| false);
  // Highest notification seq that already has a dismiss timer.
  let scheduled = use_mut_ref(|| 0_u64);

  {
    use_effect_with((), move |_| {
      ui_debug("app.mounted", "frontend mounted with demo data");
      || ()
    });
  }

  {
    let model = model.clone();
    let scheduled = scheduled.clone();
    let newest = model
      .state
      .notifications()
      .last()
      .map(|note| note.seq)
      .unwrap_or_default();
    use_effect_with(newest, move |_| {
      let pending: Vec<u64> = model
        .state
        .notifications()
        .iter()
        .map(|note| note.seq)
        .filter(|seq| *seq > *scheduled.borrow())
        .collect();
      if let Some(last) = pending.last() {
        *scheduled.borrow_mut() = *last;
      }
      for seq in pending {
        let model = model.clone();
        wasm_bindgen_futures::spawn_local(async move {
          TimeoutFuture::new(TOAST_MS).await;
          model.dispatch(Action::DismissNotification(seq));
        });
      }
      || ()
    });
  }

  let on_action = {
    let model = model.clone();
    Callback::from(move |action: Action| model.dispatch(action))
  };
  let on_open_settings = {
    let settings_open = settings_open.clone();
    Callback::from(move |_: MouseEvent| settings_open.set(true))
  };
  let on_close_settings = {
    let settings_open = settings_open.clone();
    Callback::from(move |_: MouseEvent| settings_open.set(false))
  };

  let state = &model.state;
  let theme_class = format!("theme-{}", state.settings().theme.as_key());

  if state.screen() == Screen::SignIn {
    let drafts = state.drafts();
    return html! {
      <div class={classes!("app", theme_class)}>
        <SignInPage
          mode={state.session().mode()}
          email={drafts.email.clone()}
          password={drafts.password.clone()}
          on_action={on_action}
        />
      </div>
    };
  }

  let lists: Vec<ListItem> = view::sidebar(state)
    .into_iter()
    .map(|entry| ListItem {
      list: entry.list.clone(),
      badge: entry.badge(),
      selected: entry.selected,
    })
    .collect();

  let today = chrono::Local::now().date_naive();
  let panel = view::panel(state, today);
  let rows: Vec<RowData> = match panel.body {
    PanelBody::Empty => vec![],
    PanelBody::Tasks(rows) => rows
      .into_iter()
      .map(|row| RowData {
        task: row.task.clone(),
        draft: row.draft.map(str::to_string),
      })
      .collect(),
  };

  html! {
    <div class={classes!("app", "layout", theme_class)}>
      <Sidebar
        lists={lists}
        new_list={state.drafts().new_list.clone()}
        on_action={on_action.clone()}
        on_open_settings={on_open_settings.clone()}
      />
      <TaskPanel
        list={panel.list.cloned()}
        date_label={panel.date_label.clone()}
        rows={rows}
        new_task={state.drafts().new_task.clone()}
        on_action={on_action.clone()}
        on_open_settings={on_open_settings}
      />
      <SettingsModal
        open={*settings_open}
        settings={*state.settings()}
        on_action={on_action.clone()}
        on_close={on_close_settings}
      />
      <Toasts
        enabled={state.settings().notifications}
        notifications={state.notifications().to_vec()}
        on_action={on_action}
      />
    </div>
  }
}

pub fn ui_debug(event: &str, detail: &str) {
  tracing::debug!(event, detail, "ui-debug");
  log!(format!("[ui-debug] {event}: {detail}"));
}
