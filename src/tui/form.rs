// File: src/tui/form.rs
use crate::model::{Category, Event, EventEdit, Id, NewEvent};
use crate::tui::action::Ticket;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Title,
    Description,
    Location,
    Image,
    StartTime,
    EndTime,
    Category,
}

impl FieldKind {
    pub fn label(self) -> &'static str {
        match self {
            FieldKind::Title => "Title",
            FieldKind::Description => "Description",
            FieldKind::Location => "Location",
            FieldKind::Image => "Image URL",
            FieldKind::StartTime => "Start Time",
            FieldKind::EndTime => "End Time",
            FieldKind::Category => "Category",
        }
    }

    pub fn hint(self) -> Option<&'static str> {
        match self {
            FieldKind::StartTime | FieldKind::EndTime => Some("YYYY-MM-DDTHH:MM"),
            FieldKind::Category => Some("Left/Right to change"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub kind: FieldKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormKind {
    Create,
    /// Holds the event as it was when the form opened.
    Edit(Event),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventForm {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focus: usize,
    /// Char offset inside the focused text field.
    pub cursor: usize,
    /// (numeric id, name) pairs offered by the category picker.
    pub category_choices: Vec<(u64, String)>,
    pub category_index: usize,
    /// Ticket of the request in flight; cleared if it fails.
    pub pending: Option<Ticket>,
}

fn field(kind: FieldKind, value: &str) -> FormField {
    FormField {
        kind,
        value: value.to_string(),
    }
}

impl EventForm {
    pub fn create(categories: &[Category]) -> Self {
        let category_choices: Vec<(u64, String)> = categories
            .iter()
            .filter_map(|c| c.numeric_id().map(|id| (id, c.name.clone())))
            .collect();
        let mut fields = vec![
            field(FieldKind::Title, ""),
            field(FieldKind::Description, ""),
            field(FieldKind::Location, ""),
            field(FieldKind::Image, ""),
            field(FieldKind::StartTime, ""),
            field(FieldKind::EndTime, ""),
        ];
        if !category_choices.is_empty() {
            fields.push(field(FieldKind::Category, ""));
        }
        Self {
            kind: FormKind::Create,
            fields,
            focus: 0,
            cursor: 0,
            category_choices,
            category_index: 0,
            pending: None,
        }
    }

    pub fn edit(event: &Event) -> Self {
        let fields = vec![
            field(FieldKind::Title, &event.title),
            field(FieldKind::Description, &event.description),
            field(FieldKind::StartTime, &event.start_time),
            field(FieldKind::EndTime, &event.end_time),
        ];
        let cursor = event.title.chars().count();
        Self {
            kind: FormKind::Edit(event.clone()),
            fields,
            focus: 0,
            cursor,
            category_choices: Vec::new(),
            category_index: 0,
            pending: None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::Create => " Add New Event ",
            FormKind::Edit(_) => " Edit Event ",
        }
    }

    pub fn value(&self, kind: FieldKind) -> &str {
        self.fields
            .iter()
            .find(|f| f.kind == kind)
            .map(|f| f.value.as_str())
            .unwrap_or_default()
    }

    pub fn focused_kind(&self) -> FieldKind {
        self.fields[self.focus].kind
    }

    pub fn selected_category(&self) -> Option<&(u64, String)> {
        self.category_choices.get(self.category_index)
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
        self.cursor = self.fields[self.focus].value.chars().count();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        self.cursor = self.fields[self.focus].value.chars().count();
    }

    fn byte_offset(value: &str, cursor: usize) -> usize {
        value
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        if self.focused_kind() == FieldKind::Category {
            return;
        }
        let value = &mut self.fields[self.focus].value;
        let at = Self::byte_offset(value, self.cursor);
        value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 || self.focused_kind() == FieldKind::Category {
            return;
        }
        let value = &mut self.fields[self.focus].value;
        let at = Self::byte_offset(value, self.cursor - 1);
        value.remove(at);
        self.cursor -= 1;
    }

    pub fn move_left(&mut self) {
        if self.focused_kind() == FieldKind::Category {
            let len = self.category_choices.len();
            if len > 0 {
                self.category_index = (self.category_index + len - 1) % len;
            }
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    pub fn move_right(&mut self) {
        if self.focused_kind() == FieldKind::Category {
            let len = self.category_choices.len();
            if len > 0 {
                self.category_index = (self.category_index + 1) % len;
            }
        } else {
            let len = self.fields[self.focus].value.chars().count();
            self.cursor = (self.cursor + 1).min(len);
        }
    }

    pub fn to_new_event(&self, author: Option<Id>) -> NewEvent {
        NewEvent {
            title: self.value(FieldKind::Title).to_string(),
            description: self.value(FieldKind::Description).to_string(),
            location: self.value(FieldKind::Location).to_string(),
            image: self.value(FieldKind::Image).to_string(),
            start_time: self.value(FieldKind::StartTime).to_string(),
            end_time: self.value(FieldKind::EndTime).to_string(),
            created_by: author,
            category_ids: self.selected_category().map(|(id, _)| *id).into_iter().collect(),
        }
    }

    pub fn to_edit(&self) -> EventEdit {
        EventEdit {
            title: self.value(FieldKind::Title).to_string(),
            description: self.value(FieldKind::Description).to_string(),
            start_time: self.value(FieldKind::StartTime).to_string(),
            end_time: self.value(FieldKind::EndTime).to_string(),
        }
    }
}
