// ABOUTME: In-memory wizard sessions keyed by UUID with idle eviction
// ABOUTME: Sharded concurrent map of stores; service calls run on a snapshot and merge back their result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 SoulFit

use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::flow::begin;
use super::{WizardState, WizardStore};
use crate::errors::{AppError, AppResult};

/// One session and the last time it was used
#[derive(Debug)]
struct SessionSlot {
    store: WizardStore,
    last_seen: Instant,
}

impl SessionSlot {
    fn is_idle(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() >= timeout
    }
}

/// Wizard stores for every live session
///
/// Nothing is persisted: sessions are lost when the process stops, and a
/// session untouched for `idle_timeout` is dropped on its next access or
/// by [`WizardSessions::evict_idle`]. Map guards are never held across an
/// `.await`.
#[derive(Debug, Clone)]
pub struct WizardSessions {
    slots: Arc<DashMap<Uuid, SessionSlot>>,
    idle_timeout: Duration,
}

fn not_found(id: Uuid) -> AppError {
    AppError::not_found(format!("Wizard session {id}"))
}

impl WizardSessions {
    /// Empty session map dropping sessions idle for `idle_timeout`
    #[must_use]
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
            idle_timeout,
        }
    }

    /// Start a session with the initial state
    #[must_use]
    pub fn create(&self) -> (Uuid, WizardState) {
        let id = Uuid::new_v4();
        let store = WizardStore::for_session(id.to_string());
        let state = store.state().clone();
        self.slots.insert(
            id,
            SessionSlot {
                store,
                last_seen: Instant::now(),
            },
        );
        info!(session = %id, "Wizard session created");
        (id, state)
    }

    /// Live slot for `id`, refreshed; an idle slot is dropped instead
    fn touch(&self, id: Uuid) -> AppResult<RefMut<'_, Uuid, SessionSlot>> {
        let mut slot = self.slots.get_mut(&id).ok_or_else(|| not_found(id))?;
        if slot.is_idle(self.idle_timeout) {
            drop(slot);
            if self
                .slots
                .remove_if(&id, |_, slot| slot.is_idle(self.idle_timeout))
                .is_some()
            {
                info!(session = %id, "Idle wizard session expired");
            }
            return Err(not_found(id));
        }
        slot.last_seen = Instant::now();
        Ok(slot)
    }

    /// Snapshot of a session's state
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown or expired id
    pub fn state(&self, id: Uuid) -> AppResult<WizardState> {
        Ok(self.touch(id)?.store.state().clone())
    }

    /// Drop a session
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown id
    pub fn remove(&self, id: Uuid) -> AppResult<()> {
        if self.slots.remove(&id).is_none() {
            return Err(not_found(id));
        }
        info!(session = %id, "Wizard session removed");
        Ok(())
    }

    /// Mutate a session in place
    ///
    /// `f` must not block; the session's shard is locked while it runs.
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown or expired id
    pub fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut WizardStore) -> R) -> AppResult<R> {
        let mut slot = self.touch(id)?;
        Ok(f(&mut slot.store))
    }

    /// Start a service call on a session
    ///
    /// `prepare` runs on the live store first, then the loading flag is
    /// raised and a snapshot is taken for the call. Other updates keep
    /// landing on the live store while the call runs.
    ///
    /// # Errors
    ///
    /// Returns not-found for an unknown id, or locked while another call
    /// on the same session is still in flight
    pub fn begin_call(
        &self,
        id: Uuid,
        prepare: impl FnOnce(&mut WizardStore),
    ) -> AppResult<SessionCall> {
        let snapshot = {
            let mut slot = self.touch(id)?;
            if slot.store.state().is_loading {
                return Err(AppError::locked(format!(
                    "Wizard session {id} is busy with another call"
                )));
            }
            prepare(&mut slot.store);
            begin(&mut slot.store);
            slot.store.state().clone()
        };
        debug!(session = %id, "Wizard call started");
        Ok(SessionCall {
            sessions: self.clone(),
            id,
            snapshot,
            open: true,
        })
    }

    /// Drop every session idle for longer than the timeout
    pub fn evict_idle(&self) -> usize {
        let mut evicted = 0;
        self.slots.retain(|id, slot| {
            let keep = !slot.is_idle(self.idle_timeout);
            if !keep {
                debug!(session = %id, "Evicting idle wizard session");
                evicted += 1;
            }
            keep
        });
        if evicted > 0 {
            info!(evicted, remaining = self.slots.len(), "Idle wizard sessions evicted");
        }
        evicted
    }

    /// Run [`Self::evict_idle`] every `every` on the current runtime
    #[must_use]
    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let sessions = self.clone();
        tokio::spawn(async move {
            let mut interval = time::interval(every);
            loop {
                interval.tick().await;
                sessions.evict_idle();
            }
        })
    }

    /// Number of live sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no live sessions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// One service call in flight on a session
///
/// Dropping it without [`SessionCall::finish`] lowers the loading flag so
/// an abandoned request never leaves the session locked.
#[derive(Debug)]
#[must_use]
pub struct SessionCall {
    sessions: WizardSessions,
    id: Uuid,
    snapshot: WizardState,
    open: bool,
}

impl SessionCall {
    /// State as it was when the call started
    pub const fn state(&self) -> &WizardState {
        &self.snapshot
    }

    /// Apply the call's outcome to the live store
    ///
    /// # Errors
    ///
    /// Returns not-found if the session was removed or expired meanwhile
    pub fn finish(mut self, record: impl FnOnce(&mut WizardStore)) -> AppResult<WizardState> {
        self.open = false;
        self.sessions.update(self.id, |store| {
            record(store);
            store.state().clone()
        })
    }
}

impl Drop for SessionCall {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        warn!(session = %self.id, "Wizard call abandoned before completion");
        if self
            .sessions
            .update(self.id, |store| store.set_loading(false))
            .is_err()
        {
            debug!(session = %self.id, "Abandoned call's session is gone");
        }
    }
}
