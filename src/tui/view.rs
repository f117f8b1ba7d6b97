// File: src/tui/view.rs
use crate::color_utils;
use crate::model::{Event, display_timestamp};
use crate::service::NotificationLevel;
use crate::store::Snapshot;
use crate::text_utils::truncate_text;
use crate::tui::form::{EventForm, FieldKind};
use crate::tui::state::{AppState, InputMode, Route};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

const DESCRIPTION_PREVIEW: usize = 40;
const NO_IMAGE: &str = "(default placeholder)";

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let help_text = vec![
        Line::from(vec![
            Span::styled(
                " GLOBAL ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ?:Toggle Help  r:Reload  q:Quit"),
        ]),
        Line::from(vec![
            Span::styled(
                " LIST ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" j/k:Up/Down  Enter:Details  /:Search  f:Filters  a:Add  e:Edit"),
        ]),
        Line::from(vec![
            Span::styled(
                " DETAILS ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" e:Edit  d:Delete  Esc:Back"),
        ]),
    ];

    let footer_height = if state.show_help {
        Constraint::Length(help_text.len() as u16 + 2)
    } else {
        Constraint::Length(3)
    };

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), footer_height])
        .split(f.area());

    draw_filter_bar(f, state, v_chunks[0]);

    match state.route.clone() {
        Route::List => draw_list(f, state, v_chunks[1]),
        Route::Detail(_) => draw_detail(f, state, v_chunks[1]),
    }

    draw_footer(f, state, v_chunks[2], help_text);

    // --- Popups ---
    match state.mode {
        InputMode::CategoryMenu => draw_category_menu(f, state),
        InputMode::Form => {
            if let Some(form) = &state.form {
                draw_form(f, form);
            }
        }
        InputMode::ConfirmDelete => draw_confirm(f),
        InputMode::Normal | InputMode::Searching => {}
    }
}

fn draw_filter_bar(f: &mut Frame, state: &AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let searching = state.mode == InputMode::Searching;
    let search_text = if state.search_query.is_empty() && !searching {
        Span::styled("Search by event title", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(format!("/ {}", state.search_query))
    };
    let search_style = if searching {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let search = Paragraph::new(Line::from(search_text)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .border_style(search_style),
    );
    f.render_widget(search, chunks[0]);

    if searching {
        let offset = 3 + state.search_query.chars().count();
        if let Some(pos) = cursor_in(chunks[0], offset) {
            f.set_cursor_position(pos);
        }
    }

    let filter_label = state
        .selected_category_name()
        .unwrap_or_else(|| "All categories".to_string());
    let filter = Paragraph::new(filter_label).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Filters [f] "),
    );
    f.render_widget(filter, chunks[1]);
}

fn category_spans<'a>(snapshot: &'a Snapshot, event: &'a Event) -> Vec<Span<'a>> {
    snapshot
        .categories_of(event)
        .map(|c| {
            let (r, g, b) = color_utils::category_color(&c.id.as_text());
            Span::styled(format!(" #{}", c.name), Style::default().fg(Color::Rgb(r, g, b)))
        })
        .collect()
}

fn event_card<'a>(snapshot: &'a Snapshot, event: &'a Event) -> ListItem<'a> {
    let title = if event.title.is_empty() {
        "No title provided".to_string()
    } else {
        event.title.clone()
    };
    let description = if event.description.is_empty() {
        "No description provided".to_string()
    } else {
        truncate_text(&event.description, DESCRIPTION_PREVIEW)
    };
    let creator = snapshot
        .creator_of(event)
        .map(|u| u.name.clone())
        .unwrap_or_default();

    let mut title_line = vec![Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    )];
    title_line.extend(category_spans(snapshot, event));

    let label = Style::default().fg(Color::DarkGray);
    ListItem::new(vec![
        Line::from(title_line),
        Line::from(vec![Span::styled("  Description: ", label), Span::raw(description)]),
        Line::from(vec![Span::styled("  Created By:  ", label), Span::raw(creator)]),
        Line::from(vec![
            Span::styled("  Start time:  ", label),
            Span::raw(display_timestamp(&event.start_time)),
            Span::styled(" To ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(display_timestamp(&event.end_time)),
        ]),
        Line::from(""),
    ])
}

fn draw_list(f: &mut Frame, state: &mut AppState, area: Rect) {
    // Items borrow the cloned handle, leaving `state.list_state` free.
    let snapshot = state.snapshot.clone();
    let events = snapshot.filter(state.filter_options());
    let count = events.len();
    let items: Vec<ListItem> = events.into_iter().map(|e| event_card(&snapshot, e)).collect();

    let title = if state.loading {
        " Events (Loading...) ".to_string()
    } else if snapshot.events.is_none() {
        " Events (not loaded) ".to_string()
    } else {
        format!(" Events ({}) ", count)
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Blue),
        );
    f.render_stateful_widget(list, area, &mut state.list_state);
}

fn draw_detail(f: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Event Details ")
        .title_alignment(Alignment::Center);

    let Some(event) = state.current_event() else {
        let p = Paragraph::new("Event not found!")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(p, area);
        return;
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{}: ", name), bold), Span::raw(value)])
    };
    let or_placeholder = |s: &str| {
        if s.is_empty() {
            NO_IMAGE.to_string()
        } else {
            s.to_string()
        }
    };

    let creator = state.snapshot.creator_of(event);
    let mut lines = vec![
        Line::from(Span::styled(
            creator.map(|u| u.name.clone()).unwrap_or_default(),
            bold.fg(Color::Cyan),
        )),
        field(
            "User Image",
            creator.map(|u| u.image.as_str()).map(or_placeholder).unwrap_or_default(),
        ),
        Line::from(""),
        field("Event Image", or_placeholder(&event.image)),
        field("Title", event.title.clone()),
        field("Description", event.description.clone()),
        field("Location", event.location.clone()),
        field("Start Time", display_timestamp(&event.start_time)),
        field("End Time", display_timestamp(&event.end_time)),
    ];

    let mut categories = vec![Span::styled("Categories: ", bold)];
    categories.extend(category_spans(&state.snapshot, event));
    lines.push(Line::from(categories));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(p, area);
}

fn draw_footer(f: &mut Frame, state: &AppState, area: Rect, help_text: Vec<Line<'static>>) {
    f.render_widget(Clear, area);

    let (status_text, status_color) = match &state.notification {
        Some((n, _)) => {
            let color = match n.level {
                NotificationLevel::Success => Color::Green,
                NotificationLevel::Error => Color::Red,
                NotificationLevel::Info => Color::Cyan,
            };
            (format!("{}: {}", n.title, n.description), color)
        }
        None if state.loading => ("Loading...".to_string(), Color::Cyan),
        None => (String::new(), Color::Cyan),
    };

    if state.show_help {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Keyboard Shortcuts (Press ? to minimize) ")
            .border_style(Style::default().fg(Color::Cyan));
        let p = Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(p, h_chunks[0]);
        let status = Paragraph::new(status_text)
            .style(Style::default().fg(status_color))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(" Status "));
        f.render_widget(status, h_chunks[1]);
        return;
    }

    let f_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let status = Paragraph::new(status_text)
        .style(Style::default().fg(status_color))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                .title(" Status "),
        );
    let help_str = match (&state.route, state.mode) {
        (_, InputMode::Searching) => "Type to filter  Enter/Esc:Done",
        (_, InputMode::CategoryMenu) => "j/k:Move  Enter:Apply  Esc:Close",
        (_, InputMode::Form) => "Tab:Next  S-Tab:Prev  Enter:Save  Esc:Cancel",
        (_, InputMode::ConfirmDelete) => "y:Delete  n:Keep",
        (Route::List, _) => "a:Add e:Edit Ret:Open /:Find f:Filter ?:Help",
        (Route::Detail(_), _) => "e:Edit d:Delete Esc:Back ?:Help",
    };
    let help = Paragraph::new(help_str)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                .title(" Actions "),
        );
    f.render_widget(status, f_chunks[0]);
    f.render_widget(help, f_chunks[1]);
}

fn draw_category_menu(f: &mut Frame, state: &mut AppState) {
    let area = centered_rect(40, 50, f.area());
    let items: Vec<ListItem> = state
        .category_menu_entries()
        .into_iter()
        .map(|(name, _)| ListItem::new(name))
        .collect();
    let menu = List::new(items)
        .block(
            Block::default()
                .title(" Filters ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::Blue),
        );
    f.render_widget(Clear, area);
    f.render_stateful_widget(menu, area, &mut state.menu_state);
}

fn draw_form(f: &mut Frame, form: &EventForm) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .title(form.title())
        .border_style(Style::default().fg(Color::Magenta));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let mut constraints: Vec<Constraint> = form.fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (idx, field) in form.fields.iter().enumerate() {
        let focused = idx == form.focus;
        let mut title = format!(" {} ", field.kind.label());
        if let Some(hint) = field.kind.hint() {
            title.push_str(&format!("({}) ", hint));
        }
        let border = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let value = if field.kind == FieldKind::Category {
            form.selected_category()
                .map(|(_, name)| format!("< {} >", name))
                .unwrap_or_default()
        } else {
            field.value.clone()
        };
        let input = Paragraph::new(value).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border),
        );
        f.render_widget(input, rows[idx]);

        if focused && field.kind != FieldKind::Category {
            if let Some(pos) = cursor_in(rows[idx], 1 + form.cursor) {
                f.set_cursor_position(pos);
            }
        }
    }

    if form.is_submitting() {
        let saving = Paragraph::new("Saving...")
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center);
        f.render_widget(saving, rows[form.fields.len()]);
    }
}

fn draw_confirm(f: &mut Frame) {
    let area = centered_rect(40, 20, f.area());
    let p = Paragraph::new(vec![
        Line::from("Are you sure you want to delete this event?"),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(": Delete   "),
            Span::styled("n", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(": Cancel"),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(" Delete Event ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(Clear, area);
    f.render_widget(p, area);
}

/// Cursor cell `offset` columns into a bordered one-line input, if it fits
/// inside the right border.
fn cursor_in(area: Rect, offset: usize) -> Option<(u16, u16)> {
    let offset = u16::try_from(offset).ok()?;
    let x = area.x.checked_add(offset)?;
    let limit = area.x.saturating_add(area.width).saturating_sub(1);
    (x < limit).then(|| (x, area.y.saturating_add(1)))
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
