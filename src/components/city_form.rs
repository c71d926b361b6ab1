use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tui_dispatch::EventKind;

use super::Component;
use crate::action::Action;
use crate::state::{CityForm, FormField};

pub struct CityFormProps<'a> {
    pub form: &'a CityForm,
    pub is_focused: bool,
}

/// Modal form for adding a city
#[derive(Default)]
pub struct CityFormOverlay;

const LABEL_WIDTH: usize = 12;
const MODAL_WIDTH: u16 = 56;
// One row per field, spacer, message line, two borders.
const MODAL_HEIGHT: u16 = FormField::ALL.len() as u16 + 4;

fn modal_area(area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(MODAL_HEIGHT)])
        .flex(Flex::Center)
        .areas(area);
    let [modal] = Layout::horizontal([Constraint::Length(MODAL_WIDTH)])
        .flex(Flex::Center)
        .areas(row);
    modal
}

impl Component<Action> for CityFormOverlay {
    type Props<'a> = CityFormProps<'a>;

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

        match key.code {
            KeyCode::Esc => Some(Action::FormClose),
            KeyCode::Enter => Some(Action::FormSubmit),
            KeyCode::BackTab => Some(Action::FormFocusPrev),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                Some(Action::FormFocusPrev)
            }
            KeyCode::Tab | KeyCode::Down => Some(Action::FormFocusNext),
            KeyCode::Up => Some(Action::FormFocusPrev),
            KeyCode::Backspace => Some(Action::FormBackspace),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::FormInput(c))
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let modal = modal_area(area);
        frame.render_widget(Clear, modal);

        let focused = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);
        let idle = Style::default().fg(Color::Gray);

        let mut lines: Vec<Line> = FormField::ALL
            .iter()
            .map(|&field| {
                let is_focused = field == props.form.focus;
                let mut value = props.form.value(field).to_string();
                if is_focused {
                    value.push('\u{258f}');
                }
                Line::from(vec![
                    Span::styled(
                        format!("{:<width$}", field.label(), width = LABEL_WIDTH),
                        if is_focused { focused } else { idle },
                    ),
                    Span::raw(value),
                ])
            })
            .collect();

        lines.push(Line::default());
        match props.form.error.as_deref() {
            Some(error) => lines.push(Line::from(Span::styled(
                format!("\u{26a0} {error}"),
                Style::default().fg(Color::Red),
            ))),
            None => lines.push(Line::from(Span::styled(
                "Tab next field \u{b7} Enter add \u{b7} Esc back",
                Style::default().fg(Color::DarkGray),
            ))),
        }

        let block = Block::default()
            .title(" New city ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Green));
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}
