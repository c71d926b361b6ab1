//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, City, CityForm};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Store intents =====
        Action::CitiesFetch => start(state, Effect::LoadCities),

        Action::CityFetch(id) => {
            if state.current_city_id() == Some(&id) {
                return DispatchResult::unchanged();
            }
            start(state, Effect::LoadCity { id })
        }

        Action::CityCreate(city) => start(state, Effect::CreateCity { city }),

        Action::CityDelete(id) => start(state, Effect::DeleteCity { id }),

        // ===== Store results =====
        Action::CitiesDidLoad(cities) => {
            state.cities = dedup_by_id(cities);
            state.clamp_selection();
            settle(state)
        }

        Action::CityDidLoad(city) => {
            state.current_city = Some(city);
            settle(state)
        }

        Action::CityDidCreate(city) => {
            state.cities.retain(|existing| existing.id != city.id);
            state.cities.push(city.clone());
            state.selected = state.cities.len() - 1;
            state.current_city = Some(city);
            settle(state)
        }

        Action::CityDidDelete(id) => {
            state.cities.retain(|city| city.id != id);
            state.current_city = None;
            state.clamp_selection();
            settle(state)
        }

        Action::CityDidError(message) => {
            state.error = message;
            state.is_loading = false;
            DispatchResult::changed()
        }

        // ===== UI actions =====
        Action::UiSelect(index) => {
            if index < state.cities.len() && index != state.selected {
                state.selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Form actions =====
        Action::FormOpen => {
            if state.form.is_some() {
                return DispatchResult::unchanged();
            }
            state.form = Some(CityForm::default());
            DispatchResult::changed()
        }

        Action::FormClose => match state.form.take() {
            Some(_) => DispatchResult::changed(),
            None => DispatchResult::unchanged(),
        },

        Action::FormFocusNext => edit_form(state, |form| form.focus = form.focus.next()),

        Action::FormFocusPrev => edit_form(state, |form| form.focus = form.focus.prev()),

        Action::FormInput(c) => edit_form(state, |form| {
            form.value_mut(form.focus).push(c);
            form.error = None;
        }),

        Action::FormBackspace => edit_form(state, |form| {
            form.value_mut(form.focus).pop();
        }),

        Action::FormSubmit => {
            let Some(form) = state.form.as_mut() else {
                return DispatchResult::unchanged();
            };
            match form.to_new_city() {
                Ok(city) => {
                    state.form = None;
                    start(state, Effect::CreateCity { city })
                }
                Err(message) => {
                    form.error = Some(message);
                    DispatchResult::changed()
                }
            }
        }

        // ===== Global actions =====
        Action::Render => DispatchResult::changed(),

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// The `loading` transition shared by every store intent.
fn start(state: &mut AppState, effect: Effect) -> DispatchResult<Effect> {
    state.is_loading = true;
    DispatchResult::changed_with(effect)
}

/// Success path of every request.
fn settle(state: &mut AppState) -> DispatchResult<Effect> {
    state.is_loading = false;
    state.error.clear();
    DispatchResult::changed()
}

fn edit_form(state: &mut AppState, edit: impl FnOnce(&mut CityForm)) -> DispatchResult<Effect> {
    match state.form.as_mut() {
        Some(form) => {
            edit(form);
            DispatchResult::changed()
        }
        None => DispatchResult::unchanged(),
    }
}

/// Keep the first occurrence of each id, preserving server order.
fn dedup_by_id(cities: Vec<City>) -> Vec<City> {
    let mut unique: Vec<City> = Vec::with_capacity(cities.len());
    for city in cities {
        if !unique.iter().any(|seen| seen.id == city.id) {
            unique.push(city);
        }
    }
    unique
}
