use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use super::Component;
use super::city_list::short_date;
use crate::action::Action;
use crate::state::City;

pub struct CityDetailsProps<'a> {
    pub city: Option<&'a City>,
    pub is_loading: bool,
}

/// Details of the current city
#[derive(Default)]
pub struct CityDetails;

fn label(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    ))
}

fn details(city: &City) -> Vec<Line<'static>> {
    let mut lines = vec![
        label("CITY NAME"),
        Line::from(vec![
            Span::raw(format!("{} ", city.emoji)),
            Span::styled(
                city.city_name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::default(),
    ];

    if !city.country.is_empty() {
        lines.push(label("COUNTRY"));
        lines.push(Line::from(city.country.clone()));
        lines.push(Line::default());
    }

    lines.push(label("VISITED ON"));
    lines.push(Line::from(short_date(&city.date).to_string()));
    lines.push(Line::default());

    if !city.notes.is_empty() {
        lines.push(label("YOUR NOTES"));
        lines.push(Line::from(city.notes.clone()));
        lines.push(Line::default());
    }

    lines.push(label("POSITION"));
    lines.push(Line::from(format!(
        "{:.2}, {:.2}",
        city.position.lat, city.position.lng
    )));
    lines
}

impl Component<Action> for CityDetails {
    type Props<'a> = CityDetailsProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = Block::default()
            .title(" Details ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let lines = match props.city {
            Some(city) => details(city),
            None if props.is_loading => vec![Line::from("Loading\u{2026}")],
            None => vec![Line::from(Span::styled(
                "Select a city and press Enter",
                Style::default().fg(Color::DarkGray),
            ))],
        };

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}
