//! confgrid-core — domain types and the configuration synthesis transforms.
//!
//! The transforms operate on decoded YAML (`serde_yaml::Value`) and never on
//! raw text:
//!
//! - [`flatten`] turns a nested mapping into dotted-path properties.
//! - [`merge`] additively merges a submitted document into a stored one.
//! - [`route`] splits the shared route table out of a gateway document.

pub mod config;
pub mod error;
pub mod flatten;
pub mod merge;
pub mod route;
pub mod types;

pub use config::ServerConfig;
pub use error::{CoreError, CoreResult};
pub use flatten::flatten;
pub use merge::merge_add;
pub use route::{separate_route, SeparatedRoute};
pub use types::*;
