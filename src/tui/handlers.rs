// File: src/tui/handlers.rs
use crate::tui::action::Action;
use crate::tui::state::{AppState, InputMode, Route};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Applies a key press to the state. Returns the network work it triggers, if any.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return Some(Action::Quit);
    }

    match state.mode {
        InputMode::Normal => handle_normal(state, key),
        InputMode::Searching => {
            handle_search(state, key);
            None
        }
        InputMode::CategoryMenu => {
            handle_menu(state, key);
            None
        }
        InputMode::Form => handle_form(state, key),
        InputMode::ConfirmDelete => handle_confirm(state, key),
    }
}

fn handle_normal(state: &mut AppState, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => {
            state.should_quit = true;
            return Some(Action::Quit);
        }
        KeyCode::Char('?') => state.show_help = !state.show_help,
        KeyCode::Char('r') => {
            state.loading = true;
            return Some(Action::Reload);
        }
        KeyCode::Char('a') => state.start_create(),
        KeyCode::Char('e') => state.start_edit(),
        _ => {}
    }

    match state.route {
        Route::List => match key.code {
            KeyCode::Down | KeyCode::Char('j') => state.next(),
            KeyCode::Up | KeyCode::Char('k') => state.previous(),
            KeyCode::Enter => state.open_detail(),
            KeyCode::Char('/') => state.mode = InputMode::Searching,
            KeyCode::Char('f') => state.open_category_menu(),
            KeyCode::Esc => {
                state.search_query.clear();
                state.clamp_selection();
            }
            _ => {}
        },
        Route::Detail(_) => match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => {
                state.back_to_list()
            }
            KeyCode::Char('d') if state.current_event().is_some() => {
                state.mode = InputMode::ConfirmDelete;
            }
            _ => {}
        },
    }
    None
}

fn handle_search(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => state.mode = InputMode::Normal,
        KeyCode::Backspace => state.pop_search_char(),
        KeyCode::Char(c) => state.push_search_char(c),
        _ => {}
    }
}

fn handle_menu(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('f') => state.mode = InputMode::Normal,
        KeyCode::Down | KeyCode::Char('j') => state.menu_next(),
        KeyCode::Up | KeyCode::Char('k') => state.menu_previous(),
        KeyCode::Enter => state.choose_menu_entry(),
        _ => {}
    }
}

fn handle_form(state: &mut AppState, key: KeyEvent) -> Option<Action> {
    let form = state.form.as_mut()?;
    if form.is_submitting() {
        if key.code == KeyCode::Esc {
            state.abandon_form();
        }
        return None;
    }

    match key.code {
        KeyCode::Esc => state.close_form(),
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Left => form.move_left(),
        KeyCode::Right => form.move_right(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.insert_char(c),
        KeyCode::Enter => return state.submit_form(),
        _ => {}
    }
    None
}

fn handle_confirm(state: &mut AppState, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            state.mode = InputMode::Normal;
            state.current_event().map(|e| Action::DeleteEvent(e.id.clone()))
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = InputMode::Normal;
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Id;
    use crate::service::{Notification, NotificationLevel};
    use crate::store::Snapshot;
    use crate::tui::action::{AppEvent, Ticket};
    use crate::tui::form::FormKind;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(state: &mut AppState, s: &str) {
        for c in s.chars() {
            handle_key(state, key(KeyCode::Char(c)));
        }
    }

    fn loaded_state() -> AppState {
        let snapshot: Snapshot = Snapshot {
            users: Some(serde_json::from_value(json!([{"id": "1", "name": "Ada", "image": ""}])).unwrap()),
            events: Some(
                serde_json::from_value(json!([
                    {"id": "1", "title": "Rust Meetup", "createdBy": 1, "categoryIds": [1]},
                    {"id": "5", "title": "Meetup", "createdBy": 1, "categoryIds": [2]},
                    {"id": "6", "title": "Cooking", "createdBy": 1, "categoryIds": [2]}
                ]))
                .unwrap(),
            ),
            categories: Some(
                serde_json::from_value(json!([
                    {"id": 1, "name": "tech"},
                    {"id": 2, "name": "social"}
                ]))
                .unwrap(),
            ),
        };
        let mut state = AppState::new(Some(Id::from("1")), Duration::from_secs(5));
        state.apply_snapshot(Arc::new(snapshot));
        state
    }

    #[test]
    fn search_filters_on_every_keystroke() {
        let mut state = loaded_state();
        handle_key(&mut state, key(KeyCode::Char('/')));
        assert_eq!(state.mode, InputMode::Searching);
        type_str(&mut state, "meet");
        assert_eq!(state.visible_events().len(), 2);
        handle_key(&mut state, key(KeyCode::Backspace));
        assert_eq!(state.search_query, "mee");
        handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.mode, InputMode::Normal);
    }

    #[test]
    fn category_menu_selects_and_resets() {
        let mut state = loaded_state();
        handle_key(&mut state, key(KeyCode::Char('f')));
        handle_key(&mut state, key(KeyCode::Down));
        handle_key(&mut state, key(KeyCode::Down));
        handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.selected_category.as_deref(), Some("2"));
        assert_eq!(state.selected_category_name().as_deref(), Some("social"));
        assert_eq!(state.visible_events().len(), 2);

        handle_key(&mut state, key(KeyCode::Char('f')));
        handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.selected_category, None);
        assert_eq!(state.visible_events().len(), 3);
    }

    #[test]
    fn delete_needs_confirmation_and_returns_to_list() {
        let mut state = loaded_state();
        handle_key(&mut state, key(KeyCode::Down));
        handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.route, Route::Detail(Id::from("5")));

        assert!(handle_key(&mut state, key(KeyCode::Char('d'))).is_none());
        assert_eq!(state.mode, InputMode::ConfirmDelete);
        assert!(handle_key(&mut state, key(KeyCode::Char('n'))).is_none());

        handle_key(&mut state, key(KeyCode::Char('d')));
        let action = handle_key(&mut state, key(KeyCode::Char('y')));
        assert!(matches!(action, Some(Action::DeleteEvent(ref id)) if *id == Id::from("5")));

        state.handle_app_event(AppEvent::Deleted {
            id: Id::from("5"),
            notification: Notification::success("Event Deleted", "Event deleted successfully"),
        });
        assert_eq!(state.route, Route::List);
        assert!(state.notification.is_some());
    }

    #[test]
    fn failed_delete_stays_on_detail() {
        let mut state = loaded_state();
        handle_key(&mut state, key(KeyCode::Enter));
        state.handle_app_event(AppEvent::Deleted {
            id: Id::from("1"),
            notification: Notification::error("Error", "Failed to delete event"),
        });
        assert_eq!(state.route, Route::Detail(Id::from("1")));
    }

    fn submitted_ticket(action: Option<Action>) -> Ticket {
        match action {
            Some(Action::CreateEvent { ticket, .. }) | Some(Action::UpdateEvent { ticket, .. }) => {
                ticket
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn create_form_submits_draft_and_stays_open_on_failure() {
        let mut state = loaded_state();
        handle_key(&mut state, key(KeyCode::Char('a')));
        assert_eq!(state.mode, InputMode::Form);
        type_str(&mut state, "Picnic");
        let action = handle_key(&mut state, key(KeyCode::Enter));
        let ticket = match action {
            Some(Action::CreateEvent { ticket, draft }) => {
                assert_eq!(draft.title, "Picnic");
                assert_eq!(draft.category_ids, vec![1]);
                assert_eq!(draft.created_by, Some(Id::from("1")));
                ticket
            }
            other => panic!("unexpected action: {other:?}"),
        };
        // A second Enter while the request is in flight does nothing.
        assert!(handle_key(&mut state, key(KeyCode::Enter)).is_none());

        state.handle_app_event(AppEvent::Created {
            ticket,
            notification: Notification::error("Error", "Failed to add new event"),
        });
        assert_eq!(state.mode, InputMode::Form);
        assert!(state.form.as_ref().is_some_and(|f| !f.is_submitting()));

        let retry = submitted_ticket(handle_key(&mut state, key(KeyCode::Enter)));
        assert_ne!(retry, ticket);
        state.handle_app_event(AppEvent::Created {
            ticket: retry,
            notification: Notification::success("Event Added", "New Event Added Successfully"),
        });
        assert!(state.form.is_none());
        assert_eq!(state.mode, InputMode::Normal);
    }

    #[test]
    fn late_create_result_leaves_newer_edit_form_open() {
        let mut state = loaded_state();
        handle_key(&mut state, key(KeyCode::Char('a')));
        type_str(&mut state, "A");
        let ticket = submitted_ticket(handle_key(&mut state, key(KeyCode::Enter)));
        handle_key(&mut state, key(KeyCode::Esc));
        assert!(state.form.is_none());

        handle_key(&mut state, key(KeyCode::Char('e')));
        type_str(&mut state, "!");
        state.handle_app_event(AppEvent::Created {
            ticket,
            notification: Notification::success("Event Added", "New Event Added Successfully"),
        });

        assert_eq!(state.mode, InputMode::Form);
        let form = state.form.as_ref().unwrap();
        assert!(matches!(form.kind, FormKind::Edit(_)));
        assert_eq!(form.fields[0].value, "Rust Meetup!");
        let (shown, _) = state.notification.as_ref().unwrap();
        assert_eq!(shown.title, "Event Added");
    }

    #[test]
    fn late_result_does_not_interrupt_search() {
        let mut state = loaded_state();
        handle_key(&mut state, key(KeyCode::Char('a')));
        let ticket = submitted_ticket(handle_key(&mut state, key(KeyCode::Enter)));
        handle_key(&mut state, key(KeyCode::Esc));
        handle_key(&mut state, key(KeyCode::Char('/')));

        state.handle_app_event(AppEvent::Created {
            ticket,
            notification: Notification::error("Error", "Failed to add new event"),
        });
        assert_eq!(state.mode, InputMode::Searching);
        type_str(&mut state, "meet");
        assert_eq!(state.search_query, "meet");
    }

    #[test]
    fn closing_a_saving_form_says_the_request_is_still_running() {
        let mut state = loaded_state();
        handle_key(&mut state, key(KeyCode::Char('a')));
        submitted_ticket(handle_key(&mut state, key(KeyCode::Enter)));
        handle_key(&mut state, key(KeyCode::Esc));

        assert!(state.form.is_none());
        let (shown, _) = state.notification.as_ref().unwrap();
        assert_eq!(shown.level, NotificationLevel::Info);
        assert!(shown.description.contains("still in progress"));
    }

    #[test]
    fn closing_an_idle_form_is_silent() {
        let mut state = loaded_state();
        handle_key(&mut state, key(KeyCode::Char('a')));
        handle_key(&mut state, key(KeyCode::Esc));
        assert!(state.form.is_none());
        assert!(state.notification.is_none());
    }

    #[test]
    fn edit_from_list_carries_original_event() {
        let mut state = loaded_state();
        handle_key(&mut state, key(KeyCode::Char('e')));
        type_str(&mut state, "!");
        match handle_key(&mut state, key(KeyCode::Enter)) {
            Some(Action::UpdateEvent { original, edit, .. }) => {
                assert_eq!(original.id, Id::from("1"));
                assert_eq!(edit.title, "Rust Meetup!");
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn notifications_expire() {
        let mut state = loaded_state();
        state.notify(Notification::success("Event Updated", "ok"));
        let shown = state.notification.as_ref().map(|(_, at)| *at).unwrap();
        state.tick(shown + Duration::from_secs(1));
        assert!(state.notification.is_some());
        state.tick(shown + Duration::from_secs(5));
        assert!(state.notification.is_none());
    }
}
