use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;

pub const LOGO: &str = "\u{1f30d} WorldWise";

/// Static links shown in the navigation bar; the last one is the call to action.
pub const NAV_LINKS: [&str; 3] = ["Pricing", "Product", "Login"];

/// Top navigation bar. Stateless: it never reads the city store.
#[derive(Default)]
pub struct PageNav;

impl Component<Action> for PageNav {
    type Props<'a> = ();

    fn render(&mut self, frame: &mut Frame, area: Rect, _props: Self::Props<'_>) {
        let chunks = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

        let logo = Line::from(Span::styled(
            LOGO,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(logo), chunks[0]);

        let link_style = Style::default().fg(Color::Gray);
        let cta_style = Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD);

        let mut spans = Vec::with_capacity(NAV_LINKS.len() * 2);
        for (i, link) in NAV_LINKS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("   "));
            }
            let style = if i == NAV_LINKS.len() - 1 {
                cta_style
            } else {
                link_style
            };
            spans.push(Span::styled(format!(" {} ", link.to_uppercase()), style));
        }
        frame.render_widget(Paragraph::new(Line::from(spans).right_aligned()), chunks[1]);
    }
}
