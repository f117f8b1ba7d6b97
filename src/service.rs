// File: src/service.rs
// Mutations against the backend, each followed by a re-fetch of the events
use crate::model::{Event, EventEdit, Id, NewEvent};
use crate::store::DataProvider;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// Transient message shown after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: &str, description: &str) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn error(title: &str, description: &str) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn info(title: &str, description: &str) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NotificationLevel::Success
    }
}

#[derive(Clone)]
pub struct EventService {
    provider: Arc<DataProvider>,
}

impl EventService {
    pub fn new(provider: Arc<DataProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &DataProvider {
        &self.provider
    }

    /// POSTs a new event. Returns the created record on success so the
    /// caller can close its form.
    pub async fn create(&self, draft: NewEvent) -> (Notification, Option<Event>) {
        let event = draft.into_event();
        match self.provider.client().create_event(&event).await {
            Ok(()) => {
                log::info!("Created event {}", event.id);
                self.refresh().await;
                (
                    Notification::success("Event Added", "New Event Added Successfully"),
                    Some(event),
                )
            }
            Err(e) => {
                log::warn!("Create failed: {}", e);
                (
                    Notification::error("Error", "Failed to add new event"),
                    None,
                )
            }
        }
    }

    /// PUTs `original` with the edited fields applied.
    pub async fn update(&self, original: &Event, edit: &EventEdit) -> (Notification, Option<Event>) {
        let updated = original.with_edit(edit);
        match self.provider.client().update_event(&updated).await {
            Ok(()) => {
                log::info!("Updated event {}", updated.id);
                self.refresh().await;
                (
                    Notification::success("Event Updated", "Event data updated successfully"),
                    Some(updated),
                )
            }
            Err(e) => {
                log::warn!("Update of {} failed: {}", original.id, e);
                (
                    Notification::error("Error", "Failed to update event data"),
                    None,
                )
            }
        }
    }

    /// DELETEs the event. Confirmation is the caller's job.
    pub async fn delete(&self, id: &Id) -> Notification {
        match self.provider.client().delete_event(id).await {
            Ok(()) => {
                log::info!("Deleted event {}", id);
                self.refresh().await;
                Notification::success("Event Deleted", "Event deleted successfully")
            }
            Err(e) => {
                log::warn!("Delete of {} failed: {}", id, e);
                Notification::error("Error", "Failed to delete event")
            }
        }
    }

    async fn refresh(&self) {
        if let Err(e) = self.provider.refresh_events().await {
            log::warn!("Refresh after mutation failed: {}", e);
        }
    }
}
