//! Headless city store
//!
//! [`CityStore`] is the explicitly constructed owner of [`AppState`]: it
//! applies actions through the reducer, runs the declared effects as tokio
//! tasks and publishes every changed state to its [`CitiesHandle`]s.
//! Pending requests are tied to the store's lifetime: shutting it down (or
//! dropping it) cancels them, so a late response never lands on a
//! torn-down store.
//!
//! Overlapping requests are not sequenced. Results are applied in the order
//! they arrive, so the last response to settle decides `is_loading` and
//! `error`.
//!
//! Settlement is pulled, not pushed: a finished request only reaches the
//! state when the owner awaits [`CityStore::next_settled`] or
//! [`CityStore::settle`]. Until then `is_loading` stays set and handles see
//! no change.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::debug;

use crate::action::{Action, ActionError};
use crate::api::CityApi;
use crate::effect::Effect;
use crate::reducer::reducer;
use crate::state::{AppState, CityId, NewCity};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("city store read outside of a live CityStore; pass a handle from CityStore::handle")]
    OutsideProvider,
}

/// Owner of the city state.
///
/// Results of spawned requests are applied only while the owner drives
/// [`next_settled`](Self::next_settled) or [`settle`](Self::settle).
pub struct CityStore {
    state: AppState,
    api: Arc<dyn CityApi>,
    cancel: CancellationToken,
    tracker: TaskTracker,
    settled_tx: mpsc::UnboundedSender<Action>,
    settled_rx: mpsc::UnboundedReceiver<Action>,
    in_flight: usize,
    published: watch::Sender<AppState>,
}

impl CityStore {
    /// Create the store and start the initial city list load.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(api: Arc<dyn CityApi>) -> Self {
        let state = AppState::new();
        let (published, _) = watch::channel(state.clone());
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();

        let mut store = Self {
            state,
            api,
            cancel: CancellationToken::new(),
            tracker: TaskTracker::new(),
            settled_tx,
            settled_rx,
            in_flight: 0,
            published,
        };
        store.dispatch(Action::CitiesFetch);
        store
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Read access for consumers; stops working once the store is gone.
    pub fn handle(&self) -> CitiesHandle {
        CitiesHandle {
            receiver: Some(self.published.subscribe()),
        }
    }

    /// Requests started but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Load a city unless it is already the current one.
    ///
    /// Returns `false` when the call was a no-op.
    pub fn get_city(&mut self, id: impl Into<CityId>) -> bool {
        self.dispatch(Action::CityFetch(id.into()))
    }

    pub fn create_city(&mut self, city: NewCity) {
        self.dispatch(Action::CityCreate(city));
    }

    pub fn delete_city(&mut self, id: impl Into<CityId>) {
        self.dispatch(Action::CityDelete(id.into()));
    }

    /// Apply an action and spawn the effects it declares.
    ///
    /// Returns whether the state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let result = reducer(&mut self.state, action);
        for effect in result.effects {
            self.spawn(effect);
        }
        if result.changed {
            self.published.send_replace(self.state.clone());
        }
        result.changed
    }

    /// Dispatch an action given in its tagged JSON form.
    pub fn dispatch_encoded(&mut self, json: &str) -> Result<bool, ActionError> {
        let action = Action::decode(json)?;
        Ok(self.dispatch(action))
    }

    fn spawn(&mut self, effect: Effect) {
        let api = Arc::clone(&self.api);
        let settled = self.settled_tx.clone();
        let cancel = self.cancel.clone();
        let key = effect.task_key();
        debug!(%key, "spawning store task");

        self.in_flight += 1;
        self.tracker.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => debug!(%key, "store task cancelled"),
                action = effect.perform(api) => {
                    if settled.send(action).is_err() {
                        debug!(%key, "store gone, result dropped");
                    }
                }
            }
        });
    }

    /// Wait for the next in-flight request and apply its result action.
    ///
    /// Returns `None` when nothing is pending.
    pub async fn next_settled(&mut self) -> Option<Action> {
        if self.in_flight == 0 {
            return None;
        }
        let action = self.settled_rx.recv().await?;
        self.in_flight -= 1;
        debug_assert!(action.is_terminal());
        self.dispatch(action.clone());
        Some(action)
    }

    /// Apply results until no request is in flight.
    pub async fn settle(&mut self) {
        while self.next_settled().await.is_some() {}
    }

    /// Cancel pending requests and wait for their tasks to finish.
    ///
    /// Handles taken from this store report [`StoreError::OutsideProvider`]
    /// afterwards.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
        debug!(dropped = self.in_flight, "city store shut down");
    }
}

impl Drop for CityStore {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Read-only view of a [`CityStore`]'s state.
///
/// A handle only yields state while its store is alive; a detached handle or
/// one that outlived its store fails with [`StoreError::OutsideProvider`].
#[derive(Clone, Debug, Default)]
pub struct CitiesHandle {
    receiver: Option<watch::Receiver<AppState>>,
}

impl CitiesHandle {
    /// A handle not attached to any store.
    pub fn detached() -> Self {
        Self::default()
    }

    fn live(&self) -> Result<&watch::Receiver<AppState>, StoreError> {
        match &self.receiver {
            // `has_changed` errors once the store's sender is gone.
            Some(receiver) if receiver.has_changed().is_ok() => Ok(receiver),
            _ => Err(StoreError::OutsideProvider),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> Result<R, StoreError> {
        let receiver = self.live()?;
        let state = receiver.borrow();
        Ok(f(&state))
    }

    pub fn snapshot(&self) -> Result<AppState, StoreError> {
        self.read(AppState::clone)
    }

    /// Wait until the store publishes a new state.
    ///
    /// Request results are published only when the store's owner settles
    /// them, so this never resolves for a store nobody drives.
    pub async fn changed(&mut self) -> Result<(), StoreError> {
        let receiver = self.receiver.as_mut().ok_or(StoreError::OutsideProvider)?;
        receiver
            .changed()
            .await
            .map_err(|_| StoreError::OutsideProvider)
    }
}
