//! Registry of update callbacks.
//!
//! Callbacks run in registration order. A panicking callback is logged and
//! does not stop the ones registered after it.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use crate::webhook::types::{Update, UpdateType};

/// Callback invoked for each matching update.
pub type UpdateCallback = Arc<dyn Fn(&Update) + Send + Sync>;

/// Callbacks keyed by update type. Clones share the same registry.
#[derive(Clone, Default)]
pub struct UpdateHandlers {
    callbacks: Arc<RwLock<HashMap<UpdateType, Vec<UpdateCallback>>>>,
}

impl std::fmt::Debug for UpdateHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let callbacks = self.callbacks.read().unwrap_or_else(PoisonError::into_inner);
        let counts: HashMap<&str, usize> = callbacks
            .iter()
            .map(|(update_type, list)| (update_type.as_str(), list.len()))
            .collect();
        f.debug_struct("UpdateHandlers").field("callbacks", &counts).finish()
    }
}

impl UpdateHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for `update_type`.
    pub fn on<F>(&self, update_type: UpdateType, callback: F)
    where
        F: Fn(&Update) + Send + Sync + 'static,
    {
        let mut callbacks = self.callbacks.write().unwrap_or_else(PoisonError::into_inner);
        callbacks
            .entry(update_type)
            .or_default()
            .push(Arc::new(callback));
    }

    /// Number of callbacks registered for `update_type`.
    pub fn count(&self, update_type: &UpdateType) -> usize {
        let callbacks = self.callbacks.read().unwrap_or_else(PoisonError::into_inner);
        callbacks.get(update_type).map_or(0, Vec::len)
    }

    /// Invoke every callback registered for the update's type.
    ///
    /// Returns how many callbacks completed without panicking.
    pub fn dispatch(&self, update: &Update) -> usize {
        // Snapshot so callbacks may register more handlers without deadlocking.
        let snapshot: Vec<UpdateCallback> = {
            let callbacks = self.callbacks.read().unwrap_or_else(PoisonError::into_inner);
            callbacks
                .get(&update.update_type)
                .cloned()
                .unwrap_or_default()
        };

        if snapshot.is_empty() {
            tracing::debug!(
                update_id = update.update_id,
                update_type = %update.update_type,
                "No callbacks registered for update"
            );
            return 0;
        }

        let mut completed = 0;
        for (index, callback) in snapshot.iter().enumerate() {
            match panic::catch_unwind(AssertUnwindSafe(|| callback(update))) {
                Ok(()) => completed += 1,
                Err(cause) => {
                    let message = cause
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| cause.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    tracing::error!(
                        update_id = update.update_id,
                        update_type = %update.update_type,
                        callback = index,
                        panic = %message,
                        "Update callback panicked"
                    );
                }
            }
        }
        completed
    }
}
