//! Additive merge of a submitted document into a stored one.
//!
//! Keys missing from the stored document are inserted verbatim. Keys present
//! on both sides are merged recursively only when both values are mappings;
//! in every other case the stored value is kept and the submitted one is
//! dropped. A stored scalar or sequence is never overwritten.

use serde_yaml::{Mapping, Value};

use crate::error::CoreResult;
use crate::types::{decode_mapping, encode_mapping};

/// Merge `incoming` into `existing` in place.
pub fn merge_add(existing: &mut Mapping, incoming: Mapping) {
    for (key, new_value) in incoming {
        match existing.get_mut(&key) {
            None => {
                existing.insert(key, new_value);
            }
            Some(Value::Mapping(old_map)) => {
                if let Value::Mapping(new_map) = new_value {
                    merge_add(old_map, new_map);
                }
            }
            Some(_) => {}
        }
    }
}

/// Decode a stored blob, merge `incoming` into it and re-encode.
pub fn merge_into_yaml(stored: &str, incoming: &Mapping) -> CoreResult<String> {
    let mut existing = decode_mapping(stored)?;
    merge_add(&mut existing, incoming.clone());
    encode_mapping(&existing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Mapping {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn recursive_merge_adds_sibling() {
        let mut existing = yaml("a:\n  x: 1\n");
        merge_add(&mut existing, yaml("a:\n  y: 2\n"));
        assert_eq!(existing, yaml("a:\n  x: 1\n  y: 2\n"));
    }

    #[test]
    fn existing_scalars_and_sequences_win() {
        let mut existing = yaml("port: 8080\nhosts: [a, b]\nname: old\n");
        merge_add(
            &mut existing,
            yaml("port: 9090\nhosts: [c]\nname:\n  nested: true\nextra: new\n"),
        );
        assert_eq!(existing, yaml("port: 8080\nhosts: [a, b]\nname: old\nextra: new\n"));
    }

    #[test]
    fn mapping_is_not_replaced_by_scalar() {
        let mut existing = yaml("db:\n  url: x\n");
        merge_add(&mut existing, yaml("db: plain\n"));
        assert_eq!(existing, yaml("db:\n  url: x\n"));
    }

    #[test]
    fn new_subtree_inserted_unflattened() {
        let mut existing = yaml("a: 1\n");
        merge_add(&mut existing, yaml("b:\n  c:\n    d: [1, 2]\n"));
        assert_eq!(existing, yaml("a: 1\nb:\n  c:\n    d: [1, 2]\n"));
    }

    #[test]
    fn null_on_either_side_discards_incoming() {
        let mut existing = yaml("a: ~\nb:\n  x: 1\n");
        merge_add(&mut existing, yaml("a:\n  y: 2\nb: ~\n"));
        assert_eq!(existing, yaml("a: ~\nb:\n  x: 1\n"));
    }

    #[test]
    fn merge_into_empty_blob_takes_incoming() {
        let incoming = yaml("a:\n  b: 1\n");
        let merged = merge_into_yaml("", &incoming).unwrap();
        assert_eq!(yaml(&merged), incoming);
    }

    #[test]
    fn merge_into_yaml_rejects_broken_blob() {
        assert!(merge_into_yaml("a: [", &yaml("b: 1\n")).is_err());
    }
}
