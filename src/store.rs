// File: src/store.rs
use crate::client::{ClientError, RestClient};
use crate::filter::{FilterOptions, filter_events};
use crate::model::{Category, Event, Id, User};
use std::sync::Arc;
use tokio::sync::watch;

/// Point-in-time copy of the three backend collections.
///
/// `None` marks a collection that was never loaded or whose fetch failed.
/// Views read it as empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub users: Option<Vec<User>>,
    pub events: Option<Vec<Event>>,
    pub categories: Option<Vec<Category>>,
}

impl Snapshot {
    pub fn users(&self) -> &[User] {
        self.users.as_deref().unwrap_or_default()
    }

    pub fn events(&self) -> &[Event] {
        self.events.as_deref().unwrap_or_default()
    }

    pub fn categories(&self) -> &[Category] {
        self.categories.as_deref().unwrap_or_default()
    }

    pub fn find_event(&self, id: &Id) -> Option<&Event> {
        self.events().iter().find(|e| e.id == *id)
    }

    pub fn find_user(&self, id: &Id) -> Option<&User> {
        self.users().iter().find(|u| u.id == *id)
    }

    pub fn creator_of(&self, event: &Event) -> Option<&User> {
        event.created_by.as_ref().and_then(|id| self.find_user(id))
    }

    pub fn category_name(&self, category_id: u64) -> Option<&str> {
        self.categories()
            .iter()
            .find(|c| c.numeric_id() == Some(category_id))
            .map(|c| c.name.as_str())
    }

    /// Categories of an event that resolve; dangling ids are skipped.
    pub fn categories_of<'a>(&'a self, event: &'a Event) -> impl Iterator<Item = &'a Category> {
        event.category_ids.iter().filter_map(move |id| {
            self.categories()
                .iter()
                .find(|c| c.numeric_id() == Some(*id))
        })
    }

    pub fn filter(&self, options: FilterOptions<'_>) -> Vec<&Event> {
        filter_events(self.events(), options)
    }
}

/// Loads the collections and publishes each new [`Snapshot`] to subscribers.
pub struct DataProvider {
    client: RestClient,
    tx: watch::Sender<Arc<Snapshot>>,
}

impl DataProvider {
    pub fn new(client: RestClient) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Snapshot::default()));
        Self { client, tx }
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.tx.borrow().clone()
    }

    /// Full pass: users, then events, then categories, one after the other.
    ///
    /// The first failure ends the pass. Whatever loaded before it is
    /// published; the rest stays unset. Errors are logged, never returned.
    pub async fn load(&self) -> Arc<Snapshot> {
        let mut snapshot = Snapshot::default();
        if let Err(e) = self.fill(&mut snapshot).await {
            log::warn!("Initial load stopped: {}", e);
        }
        log::info!(
            "Loaded {} users, {} events, {} categories",
            snapshot.users().len(),
            snapshot.events().len(),
            snapshot.categories().len()
        );
        self.publish(snapshot)
    }

    async fn fill(&self, snapshot: &mut Snapshot) -> Result<(), ClientError> {
        snapshot.users = Some(self.client.get_users().await?);
        snapshot.events = Some(self.client.get_events().await?);
        snapshot.categories = Some(self.client.get_categories().await?);
        Ok(())
    }

    /// Re-fetches only the events, keeping users and categories as they are.
    /// On failure the published snapshot is left alone.
    pub async fn refresh_events(&self) -> Result<Arc<Snapshot>, ClientError> {
        let events = self.client.get_events().await?;
        let mut next = (*self.current()).clone();
        next.events = Some(events);
        Ok(self.publish(next))
    }

    fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.tx.send_replace(snapshot.clone());
        snapshot
    }
}
