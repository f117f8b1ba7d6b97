// File: src/tui/state.rs
use crate::filter::{CategorySelection, FilterOptions};
use crate::model::{Event, Id};
use crate::service::Notification;
use crate::store::Snapshot;
use crate::tui::action::{Action, AppEvent, Ticket};
use crate::tui::form::{EventForm, FormKind};
use ratatui::widgets::ListState;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Detail(Id),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Searching,
    CategoryMenu,
    Form,
    ConfirmDelete,
}

pub struct AppState {
    pub snapshot: Arc<Snapshot>,
    pub route: Route,
    pub mode: InputMode,

    // Filters
    pub search_query: String,
    pub selected_category: Option<String>,

    // Widgets
    pub list_state: ListState,
    pub menu_state: ListState,
    pub form: Option<EventForm>,
    next_ticket: Ticket,

    // System
    pub loading: bool,
    pub author_id: Option<Id>,
    pub notification: Option<(Notification, Instant)>,
    pub notification_ttl: Duration,
    pub show_help: bool,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(author_id: Option<Id>, notification_ttl: Duration) -> Self {
        Self {
            snapshot: Arc::new(Snapshot::default()),
            route: Route::List,
            mode: InputMode::Normal,
            search_query: String::new(),
            selected_category: None,
            list_state: ListState::default(),
            menu_state: ListState::default(),
            form: None,
            next_ticket: 0,
            loading: true,
            author_id,
            notification: None,
            notification_ttl,
            show_help: false,
            should_quit: false,
        }
    }

    pub fn filter_options(&self) -> FilterOptions<'_> {
        FilterOptions {
            search_term: &self.search_query,
            selected_category: self.selected_category.as_deref(),
        }
    }

    pub fn visible_events(&self) -> Vec<&Event> {
        self.snapshot.filter(self.filter_options())
    }

    /// Highlighted card in the list, or the event shown in the detail view.
    pub fn current_event(&self) -> Option<&Event> {
        match &self.route {
            Route::List => {
                let idx = self.list_state.selected()?;
                self.visible_events().get(idx).copied()
            }
            Route::Detail(id) => self.snapshot.find_event(id),
        }
    }

    pub fn selected_category_name(&self) -> Option<String> {
        let raw = self.selected_category.as_deref()?;
        let name = raw
            .parse::<u64>()
            .ok()
            .and_then(|id| self.snapshot.category_name(id))
            .unwrap_or(raw);
        Some(name.to_string())
    }

    pub fn apply_snapshot(&mut self, snapshot: Arc<Snapshot>) {
        self.snapshot = snapshot;
        self.clamp_selection();
    }

    /// Keeps the list highlight on an existing row after the visible set changes.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_events().len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            let idx = self.list_state.selected().unwrap_or(0).min(len - 1);
            self.list_state.select(Some(idx));
        }
    }

    pub fn next(&mut self) {
        let len = self.visible_events().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.visible_events().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    // --- Search & category filter ---

    pub fn push_search_char(&mut self, c: char) {
        self.search_query.push(c);
        self.clamp_selection();
    }

    pub fn pop_search_char(&mut self) {
        self.search_query.pop();
        self.clamp_selection();
    }

    /// Menu rows: "Reset Filters" first, then every loaded category.
    pub fn category_menu_entries(&self) -> Vec<(String, CategorySelection)> {
        let mut entries = vec![("Reset Filters".to_string(), CategorySelection::Reset)];
        entries.extend(self.snapshot.categories().iter().map(|c| {
            (
                c.name.clone(),
                CategorySelection::Category(c.id.as_text()),
            )
        }));
        entries
    }

    pub fn open_category_menu(&mut self) {
        self.mode = InputMode::CategoryMenu;
        self.menu_state.select(Some(0));
    }

    pub fn menu_next(&mut self) {
        let len = self.category_menu_entries().len();
        let i = self.menu_state.selected().map_or(0, |i| (i + 1) % len);
        self.menu_state.select(Some(i));
    }

    pub fn menu_previous(&mut self) {
        let len = self.category_menu_entries().len();
        let i = self
            .menu_state
            .selected()
            .map_or(0, |i| (i + len - 1) % len);
        self.menu_state.select(Some(i));
    }

    pub fn choose_menu_entry(&mut self) {
        let idx = self.menu_state.selected().unwrap_or(0);
        if let Some((_, selection)) = self.category_menu_entries().into_iter().nth(idx) {
            self.select_category(selection);
        }
        self.mode = InputMode::Normal;
    }

    pub fn select_category(&mut self, selection: CategorySelection) {
        self.selected_category = selection.into_selected();
        self.clamp_selection();
    }

    // --- Routing ---

    pub fn open_detail(&mut self) {
        if let Some(id) = self.current_event().map(|e| e.id.clone()) {
            self.route = Route::Detail(id);
        }
    }

    pub fn back_to_list(&mut self) {
        self.route = Route::List;
        self.mode = InputMode::Normal;
        self.clamp_selection();
    }

    // --- Forms ---

    pub fn start_create(&mut self) {
        self.form = Some(EventForm::create(self.snapshot.categories()));
        self.mode = InputMode::Form;
    }

    pub fn start_edit(&mut self) {
        if let Some(form) = self.current_event().map(EventForm::edit) {
            self.form = Some(form);
            self.mode = InputMode::Form;
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.mode = InputMode::Normal;
    }

    /// Marks the open form as submitted and builds its request, tagged with a
    /// fresh ticket.
    pub fn submit_form(&mut self) -> Option<Action> {
        let form = self.form.as_mut()?;
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        form.pending = Some(ticket);
        let action = match &form.kind {
            FormKind::Create => Action::CreateEvent {
                ticket,
                draft: form.to_new_event(self.author_id.clone()),
            },
            FormKind::Edit(original) => Action::UpdateEvent {
                ticket,
                original: original.clone(),
                edit: form.to_edit(),
            },
        };
        Some(action)
    }

    /// Closes the form even if a save is still running; the result then only
    /// shows up as a notification.
    pub fn abandon_form(&mut self) {
        if self.form.as_ref().is_some_and(EventForm::is_submitting) {
            self.notify(Notification::info(
                "Saving",
                "Request still in progress, the result will show here",
            ));
        }
        self.close_form();
    }

    // --- Notifications ---

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some((notification, Instant::now()));
    }

    /// Drops the notification once it has been shown for the configured time.
    pub fn tick(&mut self, now: Instant) {
        if let Some((_, shown_at)) = &self.notification
            && now.duration_since(*shown_at) >= self.notification_ttl
        {
            self.notification = None;
        }
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Loaded => {
                self.loading = false;
            }
            AppEvent::Created {
                ticket,
                notification,
            }
            | AppEvent::Updated {
                ticket,
                notification,
            } => {
                self.finish_form(ticket, &notification);
                self.notify(notification);
            }
            AppEvent::Deleted { id, notification } => {
                if notification.is_success() && self.route == Route::Detail(id) {
                    self.back_to_list();
                }
                self.notify(notification);
            }
        }
    }

    /// Success closes the form that sent `ticket`; failure keeps it open for
    /// another try. Any other form is left alone.
    fn finish_form(&mut self, ticket: Ticket, notification: &Notification) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        if form.pending != Some(ticket) {
            return;
        }
        if notification.is_success() {
            self.close_form();
        } else {
            form.pending = None;
        }
    }
}
