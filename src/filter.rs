// File: src/filter.rs
use crate::model::Event;

/// Choice made in the category menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySelection {
    Reset,
    Category(String),
}

impl CategorySelection {
    /// The selected category id after applying this choice.
    pub fn into_selected(self) -> Option<String> {
        match self {
            CategorySelection::Reset => None,
            CategorySelection::Category(id) => Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FilterOptions<'a> {
    pub search_term: &'a str,
    pub selected_category: Option<&'a str>,
}

impl FilterOptions<'_> {
    pub fn matches(&self, event: &Event) -> bool {
        let matches_search = event
            .title
            .to_lowercase()
            .contains(&self.search_term.to_lowercase());

        // Selected ids compare numerically against categoryIds; a non-numeric
        // selection matches nothing.
        let matches_category = match self.selected_category {
            None => true,
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .is_ok_and(|id| event.in_category(id)),
        };

        matches_search && matches_category
    }
}

pub fn filter_events<'e>(events: &'e [Event], options: FilterOptions<'_>) -> Vec<&'e Event> {
    events.iter().filter(|e| options.matches(e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(id: &str, title: &str, categories: &[u64]) -> Event {
        serde_json::from_value(json!({
            "id": id,
            "title": title,
            "categoryIds": categories,
        }))
        .unwrap()
    }

    fn sample() -> Vec<Event> {
        vec![
            event("1", "Rust Meetup", &[1, 2]),
            event("2", "Cooking class", &[3]),
            event("5", "Meetup", &[2]),
            event("7", "Board games night", &[]),
        ]
    }

    fn ids(events: &[&Event]) -> Vec<String> {
        events.iter().map(|e| e.id.as_text()).collect()
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let events = sample();
        let found = filter_events(
            &events,
            FilterOptions {
                search_term: "MEET",
                ..Default::default()
            },
        );
        assert_eq!(ids(&found), vec!["1", "5"]);
        for e in found {
            assert!(e.title.to_lowercase().contains("meet"));
        }
    }

    #[test]
    fn empty_search_and_no_category_returns_everything() {
        let events = sample();
        let found = filter_events(&events, FilterOptions::default());
        assert_eq!(found.len(), events.len());
    }

    #[test]
    fn category_membership_is_numeric() {
        let events = sample();
        let found = filter_events(
            &events,
            FilterOptions {
                search_term: "",
                selected_category: Some("2"),
            },
        );
        assert_eq!(ids(&found), vec!["1", "5"]);
        assert!(found.iter().all(|e| e.category_ids.contains(&2)));
    }

    #[test]
    fn meetup_example() {
        let events = vec![event("5", "Meetup", &[2])];
        let with = |cat| FilterOptions {
            search_term: "meet",
            selected_category: Some(cat),
        };
        assert_eq!(filter_events(&events, with("2")).len(), 1);
        assert!(filter_events(&events, with("3")).is_empty());
    }

    #[test]
    fn non_numeric_category_matches_nothing() {
        let events = sample();
        let found = filter_events(
            &events,
            FilterOptions {
                search_term: "",
                selected_category: Some("music"),
            },
        );
        assert!(found.is_empty());
    }

    #[test]
    fn reset_clears_the_selection() {
        let events = sample();
        let mut selected = CategorySelection::Category("3".into()).into_selected();
        assert_eq!(
            filter_events(
                &events,
                FilterOptions {
                    search_term: "",
                    selected_category: selected.as_deref(),
                }
            )
            .len(),
            1
        );
        selected = CategorySelection::Reset.into_selected();
        let all = filter_events(
            &events,
            FilterOptions {
                search_term: "",
                selected_category: selected.as_deref(),
            },
        );
        assert_eq!(all.len(), events.len());
    }

    #[test]
    fn result_preserves_input_order() {
        let events = sample();
        let found = filter_events(
            &events,
            FilterOptions {
                search_term: "o",
                ..Default::default()
            },
        );
        assert_eq!(ids(&found), vec!["2", "7"]);
    }
}
