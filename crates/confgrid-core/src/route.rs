//! Splitting the shared route table out of a gateway document.
//!
//! A gateway document may carry its routes under `zuul.routes`. Those routes
//! are stored once, under the reserved route service, and shared by every
//! gateway-class consumer; the gateway's own document keeps everything else.

use serde_yaml::{Mapping, Value};

use crate::error::CoreResult;
use crate::types::{encode_mapping, ROUTE_ROOT_KEY, ROUTE_SUB_KEY};

/// Result of [`separate_route`].
#[derive(Debug, Clone, PartialEq)]
pub struct SeparatedRoute {
    /// The gateway document without its routes, as YAML.
    pub remainder: String,
    /// `{zuul: {routes: ...}}`, as YAML.
    pub routes: String,
    /// Decoded form of `routes`.
    pub routes_mapping: Mapping,
}

/// Remove `zuul.routes` from `gateway` in place and return both halves.
///
/// If removing the routes leaves `zuul` empty, `zuul` is removed as well.
/// Without routes the route half is `{zuul: {}}`. Both halves are encoded
/// before the caller writes anything.
pub fn separate_route(gateway: &mut Mapping) -> CoreResult<SeparatedRoute> {
    let root_key = Value::String(ROUTE_ROOT_KEY.to_string());
    let sub_key = Value::String(ROUTE_SUB_KEY.to_string());

    let mut route_root = Mapping::new();
    let mut drop_root = false;
    if let Some(Value::Mapping(zuul)) = gateway.get_mut(&root_key) {
        if let Some(routes) = zuul.remove(&sub_key) {
            route_root.insert(sub_key, routes);
            drop_root = zuul.is_empty();
        }
    }
    if drop_root {
        gateway.remove(&root_key);
    }

    let mut routes_mapping = Mapping::new();
    routes_mapping.insert(root_key, Value::Mapping(route_root));

    let remainder = encode_mapping(gateway)?;
    let routes = encode_mapping(&routes_mapping)?;
    Ok(SeparatedRoute {
        remainder,
        routes,
        routes_mapping,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Mapping {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn routes_split_and_siblings_kept() {
        let mut gateway = yaml("zuul:\n  routes:\n    r1: /foo\n  other: keep\nserver:\n  port: 8080\n");
        let split = separate_route(&mut gateway).unwrap();

        assert_eq!(gateway, yaml("zuul:\n  other: keep\nserver:\n  port: 8080\n"));
        assert_eq!(yaml(&split.remainder), gateway);
        assert_eq!(split.routes_mapping, yaml("zuul:\n  routes:\n    r1: /foo\n"));
        assert_eq!(yaml(&split.routes), split.routes_mapping);
    }

    #[test]
    fn root_dropped_when_only_routes() {
        let mut gateway = yaml("zuul:\n  routes:\n    r1: /foo\nother: keep\n");
        let split = separate_route(&mut gateway).unwrap();
        assert_eq!(yaml(&split.remainder), yaml("other: keep\n"));
    }

    #[test]
    fn no_route_key_passes_through() {
        let mut gateway = yaml("server:\n  port: 8080\n");
        let split = separate_route(&mut gateway).unwrap();
        assert_eq!(gateway, yaml("server:\n  port: 8080\n"));
        assert_eq!(split.routes_mapping, yaml("zuul: {}\n"));
    }

    #[test]
    fn scalar_root_is_left_alone() {
        let mut gateway = yaml("zuul: disabled\n");
        let split = separate_route(&mut gateway).unwrap();
        assert_eq!(gateway, yaml("zuul: disabled\n"));
        assert_eq!(split.routes_mapping, yaml("zuul: {}\n"));
    }

    #[test]
    fn zuul_without_routes_is_untouched() {
        let mut gateway = yaml("zuul:\n  sensitive-headers: Cookie\n");
        separate_route(&mut gateway).unwrap();
        assert_eq!(gateway, yaml("zuul:\n  sensitive-headers: Cookie\n"));
    }
}
