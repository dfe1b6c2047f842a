//! Save path: route separation and update-policy resolution.

use confgrid_core::merge::merge_into_yaml;
use confgrid_core::{
    decode_mapping, separate_route, ConfigDocument, UpdatePolicy, DEFAULT_PROFILE, ROUTE_SERVICE,
};
use confgrid_state::RecordStore;
use serde_yaml::Mapping;
use tracing::{debug, info};

use crate::error::{ServiceError, ServiceResult};
use crate::ConfigService;

/// How a successful save changed the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new record was created by this save.
    Created,
    /// An existing record was merged into or overwritten.
    Updated,
}

impl<S: RecordStore> ConfigService<S> {
    /// Persist a submitted document.
    ///
    /// For gateway-class services the route table is split out first and
    /// saved under [`ROUTE_SERVICE`]; a conflict there is tolerated, any
    /// other failure aborts before the gateway's own document is written.
    pub fn save(&self, mut doc: ConfigDocument) -> ServiceResult<SaveOutcome> {
        let mut source = decode_mapping(&doc.yaml).map_err(ServiceError::InvalidYaml)?;

        if self.config.is_gateway(&doc.service) {
            let split = separate_route(&mut source).map_err(ServiceError::Transform)?;
            doc.yaml = split.remainder;

            let route_doc = ConfigDocument {
                service: ROUTE_SERVICE.to_string(),
                version: doc.version.clone(),
                profile: DEFAULT_PROFILE.to_string(),
                namespace: doc.namespace.clone(),
                update_policy: doc.update_policy,
                yaml: split.routes,
            };
            match self.create_or_update(route_doc, split.routes_mapping) {
                Ok(outcome) => debug!(gateway = %doc.service, ?outcome, "route table saved"),
                Err(ServiceError::AlreadyExists(_)) => {
                    info!(gateway = %doc.service, "route table already exists, left unchanged")
                }
                Err(e) => return Err(e),
            }
        }

        self.create_or_update(doc, source)
    }

    /// Resolve `doc.update_policy` against the store and write.
    ///
    /// A missing record is always created first. Unless the policy is
    /// reject-if-exists the document is then written again through the
    /// update path, so a first save under merge or overwrite both creates
    /// and updates.
    fn create_or_update(&self, mut doc: ConfigDocument, source: Mapping) -> ServiceResult<SaveOutcome> {
        let existing = self.store.query_record(&doc.service, &doc.namespace)?;
        let created = existing.is_none();
        if created {
            self.store.create_record(&doc)?;
            info!(service = %doc.service, namespace = %doc.namespace, "config record created");
        }

        match (existing, doc.update_policy) {
            (Some(_), UpdatePolicy::RejectIfExists) => {
                info!(service = %doc.service, namespace = %doc.namespace, "config record already exists");
                return Err(ServiceError::AlreadyExists(doc.service));
            }
            (None, UpdatePolicy::RejectIfExists) => return Ok(SaveOutcome::Created),
            (Some(record), UpdatePolicy::MergeIfExists) => {
                let stored = record.blob(&doc.profile_key());
                if !stored.is_empty() {
                    doc.yaml = merge_into_yaml(stored, &source).map_err(ServiceError::Transform)?;
                }
            }
            _ => {}
        }

        self.store.update_record(&doc)?;
        info!(
            service = %doc.service,
            namespace = %doc.namespace,
            profile = %doc.profile,
            policy = doc.update_policy.as_str(),
            "config record updated"
        );

        Ok(if created {
            SaveOutcome::Created
        } else {
            SaveOutcome::Updated
        })
    }
}
