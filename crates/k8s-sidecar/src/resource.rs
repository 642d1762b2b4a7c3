//! Kubernetes resource shapes consumed by the materializer.
//!
//! Only the fields the sidecar needs are modelled: identity, annotations and
//! the two payload maps. Both kinds deserialize from the API server's JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The kind of resource whose payload is projected to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    ConfigMap,
    Secret,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::ConfigMap => write!(f, "ConfigMap"),
            ResourceKind::Secret => write!(f, "Secret"),
        }
    }
}

/// Metadata for a resource, following K8s conventions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    /// Namespace the resource lives in. Absent for objects built by hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// The name of the resource within its namespace.
    #[serde(default)]
    pub name: String,

    /// Key-value annotations; one of them may override the target folder.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Creates a new ObjectMeta with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Adds an annotation to the metadata.
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// `namespace/name`, or just `name` for cluster-less objects.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}/{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

/// The payload of one resource event.
///
/// `binary` values are still base64 encoded; decoding happens per key in the
/// materializer so one bad value cannot spoil its siblings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadSet {
    pub text: BTreeMap<String, String>,
    pub binary: BTreeMap<String, String>,
}

impl PayloadSet {
    pub fn new(text: BTreeMap<String, String>, binary: BTreeMap<String, String>) -> Self {
        Self { text, binary }
    }

    pub fn with_text(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.text.insert(key.into(), value.into());
        self
    }

    pub fn with_binary(mut self, key: impl Into<String>, encoded: impl Into<String>) -> Self {
        self.binary.insert(key.into(), encoded.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.binary.is_empty()
    }

    /// Every key of both maps, text keys first.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.text.keys().chain(self.binary.keys()).map(String::as_str)
    }
}

/// A ConfigMap as delivered by the API server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMap {
    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,

    /// Base64 encoded on the wire.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub binary_data: BTreeMap<String, String>,
}

/// A Secret as delivered by the API server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    #[serde(default)]
    pub metadata: ObjectMeta,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub string_data: BTreeMap<String, String>,

    /// Base64 encoded on the wire.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::ConfigMap {}
    impl Sealed for super::Secret {}
}

/// A resource kind the sidecar knows how to project. Implemented by
/// [`ConfigMap`] and [`Secret`] only.
pub trait Resource: sealed::Sealed {
    const KIND: ResourceKind;

    fn metadata(&self) -> &ObjectMeta;

    /// Splits the kind-specific fields into the text and binary maps.
    fn payload(&self) -> PayloadSet;
}

impl Resource for ConfigMap {
    const KIND: ResourceKind = ResourceKind::ConfigMap;

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn payload(&self) -> PayloadSet {
        PayloadSet::new(self.data.clone(), self.binary_data.clone())
    }
}

impl Resource for Secret {
    const KIND: ResourceKind = ResourceKind::Secret;

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn payload(&self) -> PayloadSet {
        PayloadSet::new(self.string_data.clone(), self.data.clone())
    }
}
