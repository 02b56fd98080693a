//! Submission pipeline: validate, then fork storage and notification.
//!
//! An accepted submission spawns two independent tasks and returns at once.
//! Neither task is awaited by the request; their outcomes only reach the
//! operational log.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::notifier::Notifier;
use crate::storage::LeadStore;
use crate::submission::{parse_submission, ContactSubmission, SubmissionError};

/// Handles to the side effects of one accepted submission.
///
/// HTTP handlers drop these; tests await them.
pub struct Dispatched {
    pub store: JoinHandle<Option<i64>>,
    pub notify: JoinHandle<bool>,
}

#[derive(Clone)]
pub struct Pipeline {
    store: LeadStore,
    notifier: Arc<Notifier>,
}

impl Pipeline {
    pub fn new(store: LeadStore, notifier: Arc<Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Decode and validate `body`; on success dispatch both side effects.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, body: &[u8]) -> Result<Dispatched, SubmissionError> {
        let submission = parse_submission(body)?;
        Ok(self.dispatch(submission))
    }

    /// Spawn the store-insert and notify tasks for an accepted submission.
    pub fn dispatch(&self, submission: ContactSubmission) -> Dispatched {
        let submission = Arc::new(submission);

        let store = self.store.clone();
        let to_store = Arc::clone(&submission);
        let store_task = tokio::task::spawn_blocking(move || match store.insert(&to_store) {
            Ok(id) => {
                crate::tlog!(
                    "{} stored (source: {})",
                    crate::logging::lead_id(id),
                    to_store.source
                );
                Some(id)
            }
            Err(e) => {
                crate::tlog!(
                    "failed to store lead from {}: {}",
                    to_store.email,
                    e
                );
                None
            }
        });

        let notifier = Arc::clone(&self.notifier);
        let notify_task = tokio::task::spawn_blocking(move || notifier.notify(&submission));

        Dispatched {
            store: store_task,
            notify: notify_task,
        }
    }
}
