//! Fixtures shared by the service tests.

use confgrid_core::{ConfigDocument, UpdatePolicy, DEFAULT_PROFILE};
use confgrid_state::{RecordStore, StateError, StateResult, StoredRecord};

pub fn document(service: &str, policy: UpdatePolicy, yaml: &str) -> ConfigDocument {
    ConfigDocument {
        service: service.to_string(),
        version: "1.0.0".to_string(),
        profile: DEFAULT_PROFILE.to_string(),
        namespace: "default".to_string(),
        update_policy: policy,
        yaml: yaml.to_string(),
    }
}

/// Store whose every call fails.
pub struct FailingStore;

impl RecordStore for FailingStore {
    fn query_record(&self, _service: &str, _namespace: &str) -> StateResult<Option<StoredRecord>> {
        Err(StateError::Read("store unavailable".to_string()))
    }

    fn query_record_by_name(&self, _service: &str) -> StateResult<Option<StoredRecord>> {
        Err(StateError::Read("store unavailable".to_string()))
    }

    fn create_record(&self, _doc: &ConfigDocument) -> StateResult<StoredRecord> {
        Err(StateError::Write("store unavailable".to_string()))
    }

    fn update_record(&self, _doc: &ConfigDocument) -> StateResult<StoredRecord> {
        Err(StateError::Write("store unavailable".to_string()))
    }
}
