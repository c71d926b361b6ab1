//! Screen layout and event routing

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
};
use tui_dispatch::{EventKind, EventOutcome, RenderContext};
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use crate::action::Action;
use crate::components::{
    CityDetails, CityDetailsProps, CityFormOverlay, CityFormProps, CityList, CityListProps,
    Component, PageNav,
};
use crate::state::AppState;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState, _ctx: RenderContext) {
    let rows = Layout::vertical([
        Constraint::Length(1), // Navigation
        Constraint::Min(1),    // Main content
        Constraint::Length(1), // Help bar
    ])
    .split(area);

    let mut nav = PageNav;
    nav.render(frame, rows[0], ());

    let panes = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[1]);
    let mut list = CityList;
    list.render(frame, panes[0], list_props(state, state.form.is_none()));
    let mut details = CityDetails;
    details.render(
        frame,
        panes[1],
        CityDetailsProps {
            city: state.current_city.as_ref(),
            is_loading: state.is_loading,
        },
    );

    if let Some(form) = state.form.as_ref() {
        let mut overlay = CityFormOverlay;
        overlay.render(
            frame,
            rows[1],
            CityFormProps {
                form,
                is_focused: true,
            },
        );
    }

    let hints = if state.form.is_some() {
        vec![
            StatusBarHint::new("tab", "next field"),
            StatusBarHint::new("enter", "add"),
            StatusBarHint::new("esc", "back"),
        ]
    } else {
        vec![
            StatusBarHint::new("\u{2191}\u{2193}", "select"),
            StatusBarHint::new("enter", "open"),
            StatusBarHint::new("n", "new"),
            StatusBarHint::new("d", "delete"),
            StatusBarHint::new("q", "quit"),
        ]
    };
    let mut status_bar = StatusBar::new();
    <StatusBar as Component<Action>>::render(
        &mut status_bar,
        frame,
        rows[2],
        StatusBarProps {
            left: StatusBarSection::empty(),
            center: StatusBarSection::hints(&hints),
            right: StatusBarSection::empty(),
            style: StatusBarStyle::default(),
            is_focused: false,
        },
    );
}

fn list_props(state: &AppState, is_focused: bool) -> CityListProps<'_> {
    CityListProps {
        cities: &state.cities,
        selected: state.selected,
        current_id: state.current_city_id(),
        is_loading: state.is_loading,
        error: &state.error,
        is_focused,
    }
}

pub fn handle_event(event: &EventKind, state: &AppState) -> EventOutcome<Action> {
    if let EventKind::Resize(_, _) = event {
        return EventOutcome::action(Action::Render);
    }
    EventOutcome::from(route_event(event, state))
}

/// Route an event to the form when it is open, otherwise to the city list.
fn route_event(event: &EventKind, state: &AppState) -> Option<Action> {
    match state.form.as_ref() {
        Some(form) => {
            let mut overlay = CityFormOverlay;
            let props = CityFormProps {
                form,
                is_focused: true,
            };
            let action = overlay.handle_event(event, props).into_iter().next();
            action
        }
        None => {
            let mut list = CityList;
            let action = list
                .handle_event(event, list_props(state, true))
                .into_iter()
                .next();
            action
        }
    }
}
