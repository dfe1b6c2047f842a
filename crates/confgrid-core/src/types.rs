//! Domain types shared by the store, the service layer, and the API.
//!
//! Documents travel as raw YAML text on the wire and in the store; the
//! transforms work on the decoded `serde_yaml::Mapping` form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{CoreError, CoreResult};

/// Profile name that selects the un-suffixed `application.yml` blob.
pub const DEFAULT_PROFILE: &str = "default";

/// Reserved service name under which the shared route table is stored.
pub const ROUTE_SERVICE: &str = "zuul-route";

/// Top-level key of a gateway document that holds routing settings.
pub const ROUTE_ROOT_KEY: &str = "zuul";

/// Sub-key of [`ROUTE_ROOT_KEY`] holding the route table itself.
pub const ROUTE_SUB_KEY: &str = "routes";

/// Flattened-key prefix of every route entry.
pub const ROUTE_KEY_PREFIX: &str = "zuul.routes.";

/// Annotation key carrying a record's version tag.
pub const VERSION_ANNOTATION: &str = "confgrid.io/version";

/// Single-level property map produced by flattening.
pub type FlattenedProperties = BTreeMap<String, serde_json::Value>;

// ── Update policy ──────────────────────────────────────────────────

/// What a save does when a record for the service already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdatePolicy {
    /// Leave the stored record alone and report a conflict.
    #[serde(rename = "not")]
    RejectIfExists,
    /// Add keys the stored document lacks; never overwrite existing values.
    #[serde(rename = "add")]
    MergeIfExists,
    /// Replace the stored blob for the profile with the submitted one.
    #[serde(rename = "cover")]
    Overwrite,
}

impl UpdatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RejectIfExists => "not",
            Self::MergeIfExists => "add",
            Self::Overwrite => "cover",
        }
    }
}

// ── Documents ──────────────────────────────────────────────────────

/// A configuration document submitted for one service/profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigDocument {
    pub service: String,
    /// Version tag written to the record's annotations.
    pub version: String,
    /// Profile selecting which blob of the record this document fills.
    pub profile: String,
    pub namespace: String,
    pub update_policy: UpdatePolicy,
    /// Raw YAML text of the document body.
    pub yaml: String,
}

impl ConfigDocument {
    /// Key of the record's data map this document is stored under.
    pub fn profile_key(&self) -> String {
        profile_key(&self.profile)
    }
}

/// Name of the data entry holding the blob for `profile`.
///
/// `application.yml` for the default profile, `application-<profile>.yml`
/// for every other one.
pub fn profile_key(profile: &str) -> String {
    if profile == DEFAULT_PROFILE {
        "application.yml".to_string()
    } else {
        format!("application-{profile}.yml")
    }
}

// ── Poll response ─────────────────────────────────────────────────

/// Fully resolved configuration handed to a polling consumer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub name: String,
    pub version: String,
    pub profiles: Vec<String>,
    pub property_sources: Vec<PropertySource>,
}

/// One named layer of flattened properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertySource {
    pub name: String,
    pub source: FlattenedProperties,
}

// ── YAML codec ────────────────────────────────────────────────────

/// Decode YAML text into a mapping. Blank text decodes to an empty mapping.
pub fn decode_mapping(text: &str) -> CoreResult<Mapping> {
    if text.trim().is_empty() {
        return Ok(Mapping::new());
    }
    let value: Value = serde_yaml::from_str(text).map_err(|e| CoreError::Decode(e.to_string()))?;
    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            Err(CoreError::NotAMapping("scalar"))
        }
        Value::Sequence(_) => Err(CoreError::NotAMapping("sequence")),
        Value::Tagged(_) => Err(CoreError::NotAMapping("tagged value")),
    }
}

/// Encode a mapping back to YAML text.
pub fn encode_mapping(map: &Mapping) -> CoreResult<String> {
    serde_yaml::to_string(map).map_err(|e| CoreError::Encode(e.to_string()))
}
