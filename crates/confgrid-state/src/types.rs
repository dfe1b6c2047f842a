//! Persisted record type.

use std::collections::BTreeMap;

use confgrid_core::{ConfigDocument, VERSION_ANNOTATION};
use serde::{Deserialize, Serialize};

/// One service's stored configuration within a namespace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StoredRecord {
    pub name: String,
    pub namespace: String,
    /// Raw YAML blobs keyed by profile key (`application.yml`, ...).
    pub data: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
}

impl StoredRecord {
    /// Build a fresh record holding only `doc`'s blob.
    pub fn from_document(doc: &ConfigDocument) -> Self {
        let mut record = Self {
            name: doc.service.clone(),
            namespace: doc.namespace.clone(),
            ..Self::default()
        };
        record.apply(doc);
        record
    }

    /// Write `doc`'s blob into its profile slot and refresh the version tag.
    pub fn apply(&mut self, doc: &ConfigDocument) {
        self.data.insert(doc.profile_key(), doc.yaml.clone());
        self.annotations
            .insert(VERSION_ANNOTATION.to_string(), doc.version.clone());
    }

    /// The blob stored for `profile_key`, or `""` when there is none.
    pub fn blob(&self, profile_key: &str) -> &str {
        self.data.get(profile_key).map(String::as_str).unwrap_or("")
    }

    /// The version tag, or `""` when the record was never annotated.
    pub fn version(&self) -> &str {
        self.annotations
            .get(VERSION_ANNOTATION)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Build the composite key for the records table.
    pub fn table_key(&self) -> String {
        record_key(&self.namespace, &self.name)
    }
}

/// Composite `{namespace}/{name}` key.
pub fn record_key(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}

/// Whether `segment` can be used as a namespace or name in a record key.
///
/// A `/` inside either part would let two different (namespace, name)
/// pairs share one key.
pub fn is_valid_key_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains('/')
}
