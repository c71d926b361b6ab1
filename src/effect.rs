//! Effects - side effects declared by the reducer
//!
//! Effects are returned from the reducer and run as async tasks, either by
//! the terminal runtime or by the headless [`CityStore`](crate::store::CityStore).
//! Every effect resolves to exactly one result action; failures are never
//! returned as errors past this point.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::action::Action;
use crate::api::CityApi;
use crate::state::{CityId, NewCity};

pub const LOAD_CITIES_ERROR: &str = "There was an error loading data...";
pub const LOAD_CITY_ERROR: &str = "There was an error loading city...";
pub const CREATE_CITY_ERROR: &str = "There was an error creating the city...";
pub const DELETE_CITY_ERROR: &str = "There was an error deleting the data...";

/// Suffix for write task keys; writes must never supersede each other.
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// `GET /cities`
    LoadCities,
    /// `GET /cities/{id}`
    LoadCity { id: CityId },
    /// `POST /cities`
    CreateCity { city: NewCity },
    /// `DELETE /cities/{id}`
    DeleteCity { id: CityId },
}

fn next_write_seq() -> u64 {
    WRITE_SEQ.fetch_add(1, Ordering::Relaxed)
}

impl Effect {
    /// Task key; a newer task with the same key replaces a pending one.
    ///
    /// Reads share a key per resource. Create and delete keys are unique per
    /// call, so a request already sent always has its result applied.
    pub fn task_key(&self) -> String {
        match self {
            Effect::LoadCities => "cities".to_string(),
            Effect::LoadCity { .. } => "city".to_string(),
            Effect::CreateCity { .. } => format!("create_city_{}", next_write_seq()),
            Effect::DeleteCity { id } => format!("delete_city_{id}_{}", next_write_seq()),
        }
    }

    /// Message stored in `AppState::error` when this effect fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Effect::LoadCities => LOAD_CITIES_ERROR,
            Effect::LoadCity { .. } => LOAD_CITY_ERROR,
            Effect::CreateCity { .. } => CREATE_CITY_ERROR,
            Effect::DeleteCity { .. } => DELETE_CITY_ERROR,
        }
    }

    /// Run the request and turn its outcome into the result action.
    pub async fn perform(self, api: Arc<dyn CityApi>) -> Action {
        let failure = self.failure_message();
        let result = match self {
            Effect::LoadCities => api.list_cities().await.map(Action::CitiesDidLoad),
            Effect::LoadCity { id } => api.get_city(&id).await.map(Action::CityDidLoad),
            Effect::CreateCity { city } => {
                api.create_city(&city).await.map(Action::CityDidCreate)
            }
            Effect::DeleteCity { id } => {
                let deleted = api.delete_city(&id).await;
                deleted.map(|()| Action::CityDidDelete(id))
            }
        };

        result.unwrap_or_else(|error| {
            warn!(%error, "{failure}");
            Action::CityDidError(failure.to_string())
        })
    }
}
