//! Lookup of free-form resource metadata
//!
//! Each metering source stores resource metadata its own way:
//!
//! | Source         | Shape                                                     |
//! |----------------|-----------------------------------------------------------|
//! | compute        | flat `metadata.<name>` keys                               |
//! | image          | flat `properties.<name>` keys                             |
//! | snapshots      | a `metadata` key holding `{'<name>': value, ...}`         |
//! | block storage  | a `metadata` key holding `[{'key': .., 'value': ..}, ..]` |
//! | object storage | HTTP header style `X-Container-Meta-<name>` keys          |
//!
//! [`metadata_field`] tries them in that order and returns the first non-empty match. All key
//! comparisons ignore case.

use super::literal::{self, Literal};
use crate::usage::{FieldValue, Metadata, Reading};
use strum::Display;

const LOG_TARGET: &str = "  metadata";

/// Metadata key holding a serialized nested structure
const NESTED_KEY: &str = "metadata";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum MetadataNamespace {
    /// `metadata:<name>`, resolved through every source convention
    Metadata,

    /// `image_metadata:<name>`, resolved from `image_meta.<name>` only
    ImageMetadata,
}

/// A `namespace:name` field key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataKey<'a> {
    pub namespace: MetadataNamespace,
    pub name: &'a str,
}

impl<'a> MetadataKey<'a> {
    /// Split a field key on its first `:`.
    ///
    /// Returns `None` for bare field names and for namespaces other than `metadata` and
    /// `image_metadata`. The namespace is matched without regard to case.
    #[must_use]
    pub fn parse(key: &'a str) -> Option<Self> {
        let (namespace, name) = key.split_once(':')?;

        let namespace = if namespace.eq_ignore_ascii_case("metadata") {
            MetadataNamespace::Metadata
        } else if namespace.eq_ignore_ascii_case("image_metadata") {
            MetadataNamespace::ImageMetadata
        } else {
            return None;
        };

        Some(Self { namespace, name })
    }
}

/// Name part of a `namespace:name` key. The namespace itself is not checked here, routing
/// on it is the registry's job.
fn field_name(key: &str) -> Option<&str> {
    key.split_once(':').map(|(_, name)| name)
}

/// Resolve a `metadata:<name>` key against the reading's metadata.
///
/// Returns `None` when no convention yields a non-empty value, including when a nested blob
/// cannot be parsed.
#[must_use]
pub fn metadata_field(key: &str, reading: &Reading) -> Option<FieldValue> {
    let name = field_name(key)?;
    let metadata = &reading.metadata;

    flat(metadata, "metadata.", name)
        .or_else(|| flat(metadata, "properties.", name))
        .or_else(|| nested(metadata, name, &reading.resource_id))
        .or_else(|| flat(metadata, "x-container-meta-", name))
}

/// Resolve an `image_metadata:<name>` key against the reading's metadata.
#[must_use]
pub fn image_metadata_field(key: &str, reading: &Reading) -> Option<FieldValue> {
    let name = field_name(key)?;
    flat(&reading.metadata, "image_meta.", name)
}

fn non_blank(value: &FieldValue) -> Option<FieldValue> {
    (!value.is_blank()).then(|| value.clone())
}

fn flat(metadata: &Metadata, prefix: &str, name: &str) -> Option<FieldValue> {
    metadata.get_ignore_case(&format!("{prefix}{name}")).and_then(non_blank)
}

/// Covers both nested conventions, since a blob is either a dict or a list of pairs.
fn nested(metadata: &Metadata, name: &str, resource_id: &str) -> Option<FieldValue> {
    let text = metadata.get(NESTED_KEY)?.as_str()?;

    let Some(parsed) = literal::parse(text) else {
        log::debug!(target: LOG_TARGET, "Ignoring unparseable nested metadata of resource '{resource_id}'");
        return None;
    };

    let found = match &parsed {
        Literal::Dict(_) => parsed.get_ignore_case(name),
        Literal::List(pairs) => pair_value(pairs, name),
        _ => None,
    };

    found.and_then(Literal::to_field_value).as_ref().and_then(non_blank)
}

/// Value of the first `{'key': .., 'value': ..}` entry whose key matches `name`.
fn pair_value<'a>(pairs: &'a [Literal], name: &str) -> Option<&'a Literal> {
    let wanted = name.to_lowercase();
    pairs
        .iter()
        .find(|pair| {
            pair.get("key")
                .and_then(Literal::as_str)
                .is_some_and(|key| key.to_lowercase() == wanted)
        })
        .and_then(|pair| pair.get("value"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_support::reading_with_metadata;

    fn s(value: &str) -> Option<FieldValue> {
        Some(FieldValue::from(value))
    }

    fn lookup(entries: &[(&str, &str)], key: &str) -> Option<FieldValue> {
        let metadata: Metadata = entries.iter().copied().collect();
        metadata_field(key, &reading_with_metadata(metadata))
    }

    #[test]
    fn test_parse_key() {
        let key = MetadataKey::parse("metadata:owner").unwrap();
        assert_eq!(key.namespace, MetadataNamespace::Metadata);
        assert_eq!(key.name, "owner");

        let key = MetadataKey::parse("IMAGE_Metadata:os:type").unwrap();
        assert_eq!(key.namespace, MetadataNamespace::ImageMetadata);
        assert_eq!(key.name, "os:type");

        assert_eq!(MetadataKey::parse("project_id"), None);
        assert_eq!(MetadataKey::parse("tags:owner"), None);
    }

    #[test]
    fn test_namespace_display() {
        assert_eq!(MetadataNamespace::Metadata.to_string(), "metadata");
        assert_eq!(MetadataNamespace::ImageMetadata.to_string(), "image_metadata");
    }

    #[test]
    fn test_compute_convention() {
        let entries = [("metadata.test", "nova")];
        assert_eq!(lookup(&entries, "metadata:test"), s("nova"));
        assert_eq!(lookup(&entries, "metadata:TEST"), s("nova"));
    }

    #[test]
    fn test_image_convention() {
        let entries = [("properties.test", "glance")];
        assert_eq!(lookup(&entries, "metadata:test"), s("glance"));
        assert_eq!(lookup(&entries, "metadata:TEST"), s("glance"));
    }

    #[test]
    fn test_nested_dict_convention() {
        let entries = [("metadata", "{'test': u'snapshot'}")];
        assert_eq!(lookup(&entries, "metadata:test"), s("snapshot"));
        assert_eq!(lookup(&entries, "metadata:TEST"), s("snapshot"));

        let entries = [("metadata", "{u'TeSt': 'snapshot'}")];
        assert_eq!(lookup(&entries, "metadata:test"), s("snapshot"));
    }

    #[test]
    fn test_nested_list_convention() {
        let entries = [("metadata", "[{'key': 'test', 'value': 'cinder'}]")];
        assert_eq!(lookup(&entries, "metadata:test"), s("cinder"));
        assert_eq!(lookup(&entries, "metadata:TEST"), s("cinder"));

        let entries = [("metadata", "[{'key': 'other', 'value': 'x'}, {'key': 'Test', 'value': 'cinder'}]")];
        assert_eq!(lookup(&entries, "metadata:test"), s("cinder"));
    }

    #[test]
    fn test_header_convention() {
        let entries = [("x-container-meta-test", "swift")];
        assert_eq!(lookup(&entries, "metadata:test"), s("swift"));
        assert_eq!(lookup(&entries, "metadata:TEST"), s("swift"));

        let entries = [("X-Container-Meta-Test", "swift")];
        assert_eq!(lookup(&entries, "metadata:test"), s("swift"));
    }

    #[test]
    fn test_priority_order() {
        let entries = [
            ("metadata.test", "nova"),
            ("properties.test", "glance"),
            ("metadata", "{'test': 'snapshot'}"),
            ("x-container-meta-test", "swift"),
        ];
        assert_eq!(lookup(&entries, "metadata:test"), s("nova"));
        assert_eq!(lookup(&entries[1..], "metadata:test"), s("glance"));
        assert_eq!(lookup(&entries[2..], "metadata:test"), s("snapshot"));
        assert_eq!(lookup(&entries[3..], "metadata:test"), s("swift"));
    }

    #[test]
    fn test_empty_value_falls_through() {
        let entries = [("metadata.test", ""), ("properties.test", "glance")];
        assert_eq!(lookup(&entries, "metadata:test"), s("glance"));
    }

    #[test]
    fn test_absent() {
        assert_eq!(lookup(&[], "metadata:test"), None);
        assert_eq!(lookup(&[("metadata.other", "x")], "metadata:test"), None);
        assert_eq!(lookup(&[("metadata.test", "x")], "test"), None);
    }

    #[test]
    fn test_malformed_blob_is_absent() {
        for blob in ["{'test': ", "[{'key': 'test', 'value': 'x'}", "not a literal", "{'test' 'x'}"] {
            assert_eq!(lookup(&[("metadata", blob)], "metadata:test"), None, "blob {blob:?} should not resolve");
        }
    }

    #[test]
    fn test_malformed_blob_still_reaches_headers() {
        let entries = [("metadata", "{broken"), ("x-container-meta-test", "swift")];
        assert_eq!(lookup(&entries, "metadata:test"), s("swift"));
    }

    #[test]
    fn test_nested_containers_are_absent() {
        let entries = [("metadata", "{'test': ['a', 'b']}")];
        assert_eq!(lookup(&entries, "metadata:test"), None);

        let entries = [("metadata", "[{'key': 'test', 'value': None}]")];
        assert_eq!(lookup(&entries, "metadata:test"), None);
    }

    #[test]
    fn test_nested_list_skips_odd_entries() {
        let entries = [("metadata", "['junk', {'value': 'x'}, {'key': 'test', 'value': 3}]")];
        assert_eq!(lookup(&entries, "metadata:test"), Some(FieldValue::Integer(3)));
    }

    #[test]
    fn test_oversized_sibling_integer_does_not_hide_tags() {
        let entries = [("metadata", "{'size': 123456789012345678901234567890, 'test': 'snap'}")];
        assert_eq!(lookup(&entries, "metadata:test"), s("snap"));

        let entries = [(
            "metadata",
            "[{'key': 'size', 'value': 99999999999999999999L}, {'key': 'test', 'value': 'cinder'}]",
        )];
        assert_eq!(lookup(&entries, "metadata:test"), s("cinder"));
        assert_eq!(lookup(&entries, "metadata:size"), Some(FieldValue::Float(1e20)));
    }

    #[test]
    fn test_non_literal_sibling_hides_the_blob() {
        let entries = [("metadata", "{'created': datetime.datetime(2024, 1, 1), 'test': 'snap'}")];
        assert_eq!(lookup(&entries, "metadata:test"), None);
    }

    #[test]
    fn test_non_string_nested_key_is_ignored() {
        let mut metadata = Metadata::new();
        let _ = metadata.insert("metadata", 42_i64);
        assert_eq!(metadata_field("metadata:test", &reading_with_metadata(metadata)), None);
    }

    #[test]
    fn test_image_metadata_field() {
        let entries: Metadata = [("image_meta.os_type", "linux"), ("properties.base", "x")].into_iter().collect();
        let reading = reading_with_metadata(entries);

        assert_eq!(image_metadata_field("image_metadata:os_type", &reading), s("linux"));
        assert_eq!(image_metadata_field("image_metadata:OS_TYPE", &reading), s("linux"));
        assert_eq!(image_metadata_field("image_metadata:base", &reading), None);
        assert_eq!(image_metadata_field("os_type", &reading), None);
    }
}
