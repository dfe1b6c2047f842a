//! confgrid-service — the save and poll paths of ConfGrid.
//!
//! [`ConfigService`] owns a [`RecordStore`](confgrid_state::RecordStore) and
//! an immutable [`ServerConfig`](confgrid_core::ServerConfig).
//!
//! - **Save** decodes a submitted document, splits the shared route table
//!   out of gateway documents, then creates, merges or overwrites the stored
//!   record according to the document's update policy.
//! - **Poll** flattens a stored document, overlays the shared route table
//!   for gateway-class services and appends the static additions.
//!
//! Each call is a self-contained unit of work. The read-then-write sequence
//! of a save is not atomic against the store: concurrent saves to the same
//! record race and the last write wins.

pub mod error;
pub mod poll;
pub mod save;

use std::sync::Arc;

use confgrid_core::ServerConfig;
use confgrid_state::RecordStore;

pub use error::{ServiceError, ServiceResult};
pub use save::SaveOutcome;

/// Save and poll operations over a record store.
#[derive(Clone)]
pub struct ConfigService<S> {
    store: S,
    config: Arc<ServerConfig>,
}

impl<S: RecordStore> ConfigService<S> {
    pub fn new(store: S, config: Arc<ServerConfig>) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

#[cfg(test)]
mod test_support;
