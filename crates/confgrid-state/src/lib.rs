//! confgrid-state — record store for ConfGrid.
//!
//! Backed by [redb](https://docs.rs/redb). Each service's configuration lives
//! in one [`StoredRecord`] keyed by `{namespace}/{name}`, holding one YAML
//! blob per profile key plus a version annotation.
//!
//! The service layer talks to storage only through the [`RecordStore`]
//! trait; [`StateStore`] is the redb implementation, with on-disk and
//! in-memory backends. It is `Clone` + `Send` + `Sync` (backed by
//! `Arc<Database>`).

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::{RecordStore, StateStore};
pub use types::*;
