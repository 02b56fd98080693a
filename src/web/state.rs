//! Shared application state.

use std::sync::Arc;

use crate::notifier::Notifier;
use crate::pipeline::Pipeline;
use crate::storage::LeadStore;

/// Handles shared by every request.  Both are internally synchronised, so
/// the state itself needs no lock.
pub struct AppState {
    pub store: LeadStore,
    pub pipeline: Pipeline,
}

impl AppState {
    pub fn new(store: LeadStore, notifier: Notifier) -> SharedState {
        let pipeline = Pipeline::new(store.clone(), Arc::new(notifier));
        Arc::new(Self { store, pipeline })
    }
}

pub type SharedState = Arc<AppState>;
