//! Actions: intents from the UI and results from effect tasks
//!
//! Every action has a tagged wire form, `{"type": "<tag>", "payload": ...}`,
//! used by recorded action logs and by [`Action::decode`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{City, CityId, NewCity};

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
#[serde(tag = "type", content = "payload")]
pub enum Action {
    // ===== Store intents (each marks the store as loading) =====
    /// Intent: load the full city list
    #[serde(rename = "cities/fetch")]
    CitiesFetch,

    /// Intent: load one city; no-op when it is already the current city
    #[serde(rename = "city/fetch")]
    CityFetch(CityId),

    /// Intent: create a city from a draft
    #[serde(rename = "city/create")]
    CityCreate(NewCity),

    /// Intent: delete a city by id
    #[serde(rename = "city/delete")]
    CityDelete(CityId),

    // ===== Store results =====
    /// Result: city list loaded
    #[serde(rename = "cities/loaded")]
    CitiesDidLoad(Vec<City>),

    /// Result: single city loaded
    #[serde(rename = "city/loaded")]
    CityDidLoad(City),

    /// Result: server echoed the created city
    #[serde(rename = "city/created")]
    CityDidCreate(City),

    /// Result: city deleted
    #[serde(rename = "city/deleted")]
    CityDidDelete(CityId),

    /// Result: any request failed
    #[serde(rename = "rejected")]
    CityDidError(String),

    // ===== UI category =====
    /// Highlight a row in the city list
    #[serde(rename = "ui/select")]
    UiSelect(usize),

    // ===== Form category =====
    #[serde(rename = "form/open")]
    FormOpen,

    #[serde(rename = "form/close")]
    FormClose,

    #[serde(rename = "form/focus_next")]
    FormFocusNext,

    #[serde(rename = "form/focus_prev")]
    FormFocusPrev,

    /// Type a character into the focused field
    #[serde(rename = "form/input")]
    FormInput(char),

    #[serde(rename = "form/backspace")]
    FormBackspace,

    /// Validate the draft and create the city
    #[serde(rename = "form/submit")]
    FormSubmit,

    // ===== Uncategorized (global) =====
    /// Force a re-render (terminal resize)
    #[serde(rename = "render")]
    Render,

    /// Exit the application
    #[serde(rename = "quit")]
    Quit,
}

/// Every tag [`Action`] serializes to.
pub const ACTION_TAGS: &[&str] = &[
    "cities/fetch",
    "city/fetch",
    "city/create",
    "city/delete",
    "cities/loaded",
    "city/loaded",
    "city/created",
    "city/deleted",
    "rejected",
    "ui/select",
    "form/open",
    "form/close",
    "form/focus_next",
    "form/focus_prev",
    "form/input",
    "form/backspace",
    "form/submit",
    "render",
    "quit",
];

#[derive(thiserror::Error, Debug)]
pub enum ActionError {
    #[error("action has no \"type\" tag")]
    MissingTag,
    #[error("unknown action tag `{0}`")]
    UnknownTag(String),
    #[error("malformed action: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl Action {
    /// Decode a tagged action; an unrecognized tag is [`ActionError::UnknownTag`].
    pub fn decode(json: &str) -> Result<Self, ActionError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let tag = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or(ActionError::MissingTag)?;
        if !ACTION_TAGS.contains(&tag) {
            return Err(ActionError::UnknownTag(tag.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// True for actions that end a request (success or failure).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Action::CitiesDidLoad(_)
                | Action::CityDidLoad(_)
                | Action::CityDidCreate(_)
                | Action::CityDidDelete(_)
                | Action::CityDidError(_)
        )
    }
}
