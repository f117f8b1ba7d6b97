use crate::model::{Event, EventEdit, Id, NewEvent};
use crate::service::Notification;

/// Tags one form submission so its result can find the form that sent it.
pub type Ticket = u64;

/// Work requested by the UI, handled by the network task.
#[derive(Debug)]
pub enum Action {
    // Loading
    Reload,

    // CRUD
    CreateEvent {
        ticket: Ticket,
        draft: NewEvent,
    },
    UpdateEvent {
        ticket: Ticket,
        original: Event,
        edit: EventEdit,
    },
    DeleteEvent(Id),

    // Lifecycle
    Quit,
}

/// Results reported back to the UI. New data itself arrives through the
/// snapshot channel.
#[derive(Debug)]
pub enum AppEvent {
    Loaded,
    Created {
        ticket: Ticket,
        notification: Notification,
    },
    Updated {
        ticket: Ticket,
        notification: Notification,
    },
    Deleted { id: Id, notification: Notification },
}
