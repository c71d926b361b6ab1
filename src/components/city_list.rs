use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph},
};
use tui_dispatch::EventKind;

use super::Component;
use crate::action::Action;
use crate::state::{City, CityId};

pub const EMPTY_HINT: &str = "Add your first city by pressing n";

pub struct CityListProps<'a> {
    pub cities: &'a [City],
    pub selected: usize,
    pub current_id: Option<&'a CityId>,
    pub is_loading: bool,
    pub error: &'a str,
    pub is_focused: bool,
}

/// Visited cities, one row each
#[derive(Default)]
pub struct CityList;

impl CityList {
    fn row(city: &City, is_current: bool) -> ListItem<'static> {
        let marker = if is_current { "\u{25cf} " } else { "  " };
        ListItem::new(Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Green)),
            Span::raw(format!("{} ", city.emoji)),
            Span::styled(
                city.city_name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", short_date(&city.date)),
                Style::default().fg(Color::DarkGray),
            ),
        ]))
    }
}

/// `2027-10-31T15:59:59.138Z` -> `2027-10-31`
pub fn short_date(date: &str) -> &str {
    date.split('T').next().unwrap_or(date)
}

impl Component<Action> for CityList {
    type Props<'a> = CityListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        let EventKind::Key(key) = event else {
            return None;
        };

        let selected = props.cities.get(props.selected);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                Some(Action::UiSelect(props.selected.saturating_sub(1)))
            }
            KeyCode::Down | KeyCode::Char('j') => Some(Action::UiSelect(props.selected + 1)),
            KeyCode::Enter => selected.map(|city| Action::CityFetch(city.id.clone())),
            KeyCode::Char('d') | KeyCode::Delete => {
                selected.map(|city| Action::CityDelete(city.id.clone()))
            }
            KeyCode::Char('n') => Some(Action::FormOpen),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let mut title = format!(" Cities ({}) ", props.cities.len());
        if props.is_loading {
            title.push_str("\u{2026}loading ");
        }
        let border_color = if props.is_focused {
            Color::Green
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Min(1),    // List
            Constraint::Length(1), // Error line
        ])
        .split(inner);

        if props.cities.is_empty() && !props.is_loading {
            let hint = Paragraph::new(Line::from(Span::styled(
                EMPTY_HINT,
                Style::default().fg(Color::DarkGray),
            )));
            frame.render_widget(hint, chunks[0]);
        } else {
            let items: Vec<ListItem> = props
                .cities
                .iter()
                .map(|city| Self::row(city, props.current_id == Some(&city.id)))
                .collect();
            let list = List::new(items).highlight_style(
                Style::default()
                    .bg(Color::Rgb(40, 60, 44))
                    .add_modifier(Modifier::BOLD),
            );
            let mut list_state = ListState::default().with_selected(Some(props.selected));
            frame.render_stateful_widget(list, chunks[0], &mut list_state);
        }

        if !props.error.is_empty() {
            let error = Paragraph::new(Line::from(Span::styled(
                format!("\u{26a0} {}", props.error),
                Style::default().fg(Color::Red),
            )));
            frame.render_widget(error, chunks[1]);
        }
    }
}
