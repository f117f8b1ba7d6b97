// File: ./src/model/item.rs
use crate::model::adapter;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Opaque record identifier.
///
/// json-server style backends hand out ids as numbers or strings depending on
/// how the record was created, so both are accepted. Any JSON number is kept
/// (negative and fractional ones included) so one odd record does not reject
/// the whole collection. The original shape is kept for the round trip;
/// comparison goes through the textual form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(Number),
    Text(String),
}

impl Id {
    pub fn as_text(&self) -> String {
        match self {
            Id::Number(n) => n.to_string(),
            Id::Text(s) => s.clone(),
        }
    }

    /// Numeric form of the id, if it has one (`"3"` and `3` both give `3`).
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Id::Number(n) => n.as_u64(),
            Id::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Id::Number(a), Id::Number(b)) => a == b,
            (Id::Text(a), Id::Text(b)) => a == b,
            _ => self.as_text() == other.as_text(),
        }
    }
}

impl Eq for Id {}

impl Hash for Id {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_text().hash(state);
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::Text(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::Text(s)
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Id::Number(n.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Id,
    #[serde(default, deserialize_with = "adapter::string_or_null")]
    pub title: String,
    #[serde(default, deserialize_with = "adapter::string_or_null")]
    pub description: String,
    #[serde(default, deserialize_with = "adapter::string_or_null")]
    pub start_time: String,
    #[serde(default, deserialize_with = "adapter::string_or_null")]
    pub end_time: String,
    #[serde(default, deserialize_with = "adapter::string_or_null")]
    pub location: String,
    #[serde(default, deserialize_with = "adapter::string_or_null")]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Id>,
    #[serde(default, deserialize_with = "adapter::category_ids")]
    pub category_ids: Vec<u64>,
    /// Fields this client does not model. A PUT replaces the whole resource,
    /// so they are written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    pub fn in_category(&self, category_id: u64) -> bool {
        self.category_ids.contains(&category_id)
    }

    /// Returns a copy with the editable fields replaced.
    pub fn with_edit(&self, edit: &EventEdit) -> Event {
        let mut updated = self.clone();
        updated.title = edit.title.clone();
        updated.description = edit.description.clone();
        updated.start_time = edit.start_time.clone();
        updated.end_time = edit.end_time.clone();
        updated
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    #[serde(default, deserialize_with = "adapter::string_or_null")]
    pub name: String,
    #[serde(default, deserialize_with = "adapter::string_or_null")]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    #[serde(default, deserialize_with = "adapter::string_or_null")]
    pub name: String,
}

impl Category {
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.as_number()
    }
}

/// Fields collected by the "Add Event" form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub image: String,
    pub start_time: String,
    pub end_time: String,
    pub created_by: Option<Id>,
    pub category_ids: Vec<u64>,
}

impl NewEvent {
    /// Assigns a fresh v4 UUID as the record id.
    pub fn into_event(self) -> Event {
        Event {
            id: Id::Text(Uuid::new_v4().to_string()),
            title: self.title,
            description: self.description,
            start_time: self.start_time,
            end_time: self.end_time,
            location: self.location,
            image: self.image,
            created_by: self.created_by,
            category_ids: self.category_ids,
            extra: Map::new(),
        }
    }
}

/// The four fields the edit forms can change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventEdit {
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
}

impl From<&Event> for EventEdit {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            start_time: event.start_time.clone(),
            end_time: event.end_time.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ids_compare_by_text() {
        assert_eq!(Id::from(1), Id::from("1"));
        assert_ne!(Id::from(1), Id::from("01"));
        assert_eq!(Id::from("abc").as_number(), None);
        assert_eq!(Id::from("7").as_number(), Some(7));
    }

    #[test]
    fn event_keeps_unknown_fields_and_id_shape() {
        let raw = json!({
            "id": 5,
            "title": "Meetup",
            "description": "Rust meetup",
            "startTime": "2024-03-10T19:00",
            "endTime": "2024-03-10T21:00",
            "location": "Library",
            "image": "https://example.com/meetup.jpg",
            "createdBy": 2,
            "categoryIds": [2, "3"],
            "attendees": 12
        });
        let event: Event = serde_json::from_value(raw).unwrap();
        assert_eq!(event.category_ids, vec![2, 3]);
        assert_eq!(event.created_by, Some(Id::from("2")));

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["id"], json!(5));
        assert_eq!(back["attendees"], json!(12));
        assert_eq!(back["categoryIds"], json!([2, 3]));
        assert_eq!(back["startTime"], json!("2024-03-10T19:00"));
    }

    #[test]
    fn odd_numeric_ids_do_not_reject_the_collection() {
        let events: Vec<Event> = serde_json::from_value(json!([
            {"id": -3, "title": "Negative", "createdBy": 1.5},
            {"id": 2.5, "title": "Fractional"},
            {"id": 4, "title": "Plain", "createdBy": 1}
        ]))
        .unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].id, Id::from("-3"));
        assert_eq!(events[0].id.as_number(), None);
        assert_eq!(events[0].created_by, Some(Id::from("1.5")));
        assert_eq!(events[1].id.as_text(), "2.5");
        assert_eq!(events[2].id.as_number(), Some(4));
        assert_eq!(serde_json::to_value(&events[0].id).unwrap(), json!(-3));
    }

    #[test]
    fn missing_and_null_text_fields_become_empty() {
        let event: Event =
            serde_json::from_value(json!({"id": "9", "title": null})).unwrap();
        assert!(event.title.is_empty());
        assert!(event.description.is_empty());
        assert!(event.category_ids.is_empty());
        assert!(event.created_by.is_none());
    }

    #[test]
    fn edit_replaces_only_editable_fields() {
        let event: Event = serde_json::from_value(json!({
            "id": "5",
            "title": "Old",
            "description": "Old desc",
            "startTime": "a",
            "endTime": "b",
            "location": "Hall",
            "categoryIds": [1]
        }))
        .unwrap();
        let edit = EventEdit {
            title: "New".into(),
            description: "New desc".into(),
            start_time: "c".into(),
            end_time: "d".into(),
        };
        let updated = event.with_edit(&edit);
        assert_eq!(updated.title, "New");
        assert_eq!(updated.end_time, "d");
        assert_eq!(updated.location, "Hall");
        assert_eq!(updated.category_ids, vec![1]);
        assert_eq!(event.title, "Old");
    }

    #[test]
    fn new_events_get_distinct_ids() {
        let a = NewEvent::default().into_event();
        let b = NewEvent::default().into_event();
        assert_ne!(a.id, b.id);
    }
}
