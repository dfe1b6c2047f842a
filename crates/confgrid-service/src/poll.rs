//! Poll path: assemble the resolved property set for a consumer.

use confgrid_core::{
    decode_mapping, flatten, profile_key, Environment, FlattenedProperties, PropertySource,
    ROUTE_KEY_PREFIX, ROUTE_SERVICE,
};
use confgrid_state::RecordStore;
use tracing::info;

use crate::error::{ServiceError, ServiceResult};
use crate::ConfigService;

impl<S: RecordStore> ConfigService<S> {
    /// Resolve the configuration `service` sees for `version`.
    ///
    /// Gateway-class services never see their own `zuul.routes.*` keys; the
    /// shared route table stored for the same version replaces them. A
    /// missing route table fails the whole poll.
    pub fn poll(&self, service: &str, version: &str) -> ServiceResult<Environment> {
        let (mut properties, version_tag) = self.load_properties(service, version)?;

        if self.config.is_gateway(service) {
            let (routes, _) = self.load_properties(ROUTE_SERVICE, version)?;
            properties.retain(|key, _| !key.starts_with(ROUTE_KEY_PREFIX));
            properties.extend(routes);
        }

        self.config.append_additions(&mut properties);

        if self.config.log_properties {
            let printed = serde_json::to_string_pretty(&properties).unwrap_or_default();
            info!(%service, %version, "pulled config: {printed}");
        } else {
            info!(%service, %version, "pulled config");
        }

        Ok(Environment {
            name: service.to_string(),
            version: version_tag.clone(),
            profiles: vec![version.to_string()],
            property_sources: vec![PropertySource {
                name: format!("{service}-{version}-{version_tag}"),
                source: properties,
            }],
        })
    }

    /// Flatten the blob `service` stores for `version`, with its version tag.
    fn load_properties(
        &self,
        service: &str,
        version: &str,
    ) -> ServiceResult<(FlattenedProperties, String)> {
        let record = self
            .store
            .query_record_by_name(service)?
            .ok_or_else(|| ServiceError::NotFound(service.to_string()))?;
        let document = decode_mapping(record.blob(&profile_key(version))).map_err(ServiceError::Decode)?;
        Ok((flatten(&document), record.version().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use confgrid_core::{ServerConfig, UpdatePolicy, DEFAULT_PROFILE};
    use confgrid_state::{StateStore, StoredRecord};
    use serde_json::json;

    use super::*;
    use crate::test_support::{document, FailingStore};

    fn service_with(config: ServerConfig) -> ConfigService<StateStore> {
        ConfigService::new(StateStore::open_in_memory().unwrap(), Arc::new(config))
    }

    fn put_raw(svc: &ConfigService<StateStore>, name: &str, profile_key: &str, yaml: &str) {
        let mut record = svc
            .store()
            .query_record(name, "default")
            .unwrap()
            .unwrap_or_else(|| StoredRecord {
                name: name.to_string(),
                namespace: "default".to_string(),
                ..StoredRecord::default()
            });
        record.data.insert(profile_key.to_string(), yaml.to_string());
        svc.store().put_record(&record).unwrap();
    }

    #[test]
    fn poll_flattens_default_profile() {
        let svc = service_with(ServerConfig::default());
        svc.save(document(
            "order",
            UpdatePolicy::Overwrite,
            "server:\n  port: 8080\nhosts: [a, b]\n",
        ))
        .unwrap();

        let env = svc.poll("order", DEFAULT_PROFILE).unwrap();

        assert_eq!(env.name, "order");
        assert_eq!(env.version, "1.0.0");
        assert_eq!(env.profiles, vec![DEFAULT_PROFILE.to_string()]);
        assert_eq!(env.property_sources.len(), 1);
        let source = &env.property_sources[0];
        assert_eq!(source.name, "order-default-1.0.0");
        assert_eq!(source.source["server.port"], json!(8080));
        assert_eq!(source.source["hosts.1"], json!("b"));
    }

    #[test]
    fn poll_selects_named_profile() {
        let svc = service_with(ServerConfig::default());
        svc.save(document("order", UpdatePolicy::Overwrite, "env: base\n"))
            .unwrap();
        let mut dev = document("order", UpdatePolicy::Overwrite, "env: dev\n");
        dev.profile = "dev".to_string();
        svc.save(dev).unwrap();

        let env = svc.poll("order", "dev").unwrap();
        assert_eq!(env.property_sources[0].source["env"], json!("dev"));
        assert_eq!(env.profiles, vec!["dev".to_string()]);
    }

    #[test]
    fn poll_missing_record_is_not_found() {
        let svc = service_with(ServerConfig::default());
        let err = svc.poll("ghost", DEFAULT_PROFILE).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref s) if s == "ghost"));
    }

    #[test]
    fn poll_missing_profile_blob_yields_only_additions() {
        let mut config = ServerConfig::default();
        config
            .additions
            .insert("config.server.name".to_string(), json!("confgrid"));
        let svc = service_with(config);
        svc.save(document("order", UpdatePolicy::Overwrite, "a: 1\n"))
            .unwrap();

        let env = svc.poll("order", "staging").unwrap();
        let source = &env.property_sources[0].source;
        assert_eq!(source.len(), 1);
        assert_eq!(source["config.server.name"], json!("confgrid"));
    }

    #[test]
    fn poll_malformed_blob_is_decode_error() {
        let svc = service_with(ServerConfig::default());
        put_raw(&svc, "order", "application.yml", "a: [1,");

        let err = svc.poll("order", DEFAULT_PROFILE).unwrap_err();
        assert!(matches!(err, ServiceError::Decode(_)));
    }

    #[test]
    fn poll_store_failure_surfaces() {
        let svc = ConfigService::new(FailingStore, Arc::new(ServerConfig::default()));
        let err = svc.poll("order", DEFAULT_PROFILE).unwrap_err();
        assert!(matches!(err, ServiceError::Store(_)));
    }

    #[test]
    fn gateway_poll_replaces_local_routes_with_shared_table() {
        let svc = service_with(ServerConfig::default());
        put_raw(
            &svc,
            "api-gateway",
            "application.yml",
            "zuul:\n  routes:\n    a: 1\n  host:\n    timeout: 5\n",
        );
        put_raw(&svc, ROUTE_SERVICE, "application.yml", "zuul:\n  routes:\n    b: 2\n");

        let env = svc.poll("api-gateway", DEFAULT_PROFILE).unwrap();
        let source = &env.property_sources[0].source;

        assert!(!source.contains_key("zuul.routes.a"));
        assert_eq!(source["zuul.routes.b"], json!(2));
        assert_eq!(source["zuul.host.timeout"], json!(5));
    }

    #[test]
    fn gateway_poll_without_route_table_is_not_found() {
        let svc = service_with(ServerConfig::default());
        svc.save(document("order", UpdatePolicy::Overwrite, "a: 1\n"))
            .unwrap();
        put_raw(&svc, "gateway-helper", "application.yml", "name: helper\n");

        let err = svc.poll("gateway-helper", DEFAULT_PROFILE).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref s) if s == ROUTE_SERVICE));
    }

    #[test]
    fn non_gateway_poll_keeps_route_keys() {
        let svc = service_with(ServerConfig::default());
        put_raw(&svc, "order", "application.yml", "zuul:\n  routes:\n    a: 1\n");

        let env = svc.poll("order", DEFAULT_PROFILE).unwrap();
        assert_eq!(env.property_sources[0].source["zuul.routes.a"], json!(1));
    }

    #[test]
    fn save_then_poll_gateway_round_trip() {
        let svc = service_with(ServerConfig::default());
        svc.save(document(
            "api-gateway",
            UpdatePolicy::Overwrite,
            "zuul:\n  routes:\n    iam:\n      path: /iam/**\nserver:\n  port: 8080\n",
        ))
        .unwrap();

        let env = svc.poll("api-gateway", DEFAULT_PROFILE).unwrap();
        let source = &env.property_sources[0].source;
        assert_eq!(source["zuul.routes.iam.path"], json!("/iam/**"));
        assert_eq!(source["server.port"], json!(8080));
    }

    #[test]
    fn additions_override_document_values() {
        let mut config = ServerConfig::default();
        config
            .additions
            .insert("spring.cloud.config.allow-override".to_string(), json!(true));
        let svc = service_with(config);
        svc.save(document(
            "order",
            UpdatePolicy::Overwrite,
            "spring:\n  cloud:\n    config:\n      allow-override: false\n",
        ))
        .unwrap();

        let env = svc.poll("order", DEFAULT_PROFILE).unwrap();
        assert_eq!(
            env.property_sources[0].source["spring.cloud.config.allow-override"],
            json!(true)
        );
    }
}
