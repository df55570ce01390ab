// Declared resource leaves
//
// A Resource is the synthesized description of one cloud resource:
// a CloudFormation type name, a JSON property bag, an optional
// deletion policy and optional metadata for out-of-process tooling.

use serde_json::{Map, Value};

/// Retention behavior applied when a resource declaration is removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionPolicy {
    Delete,
    Retain,
}

impl DeletionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionPolicy::Delete => "Delete",
            DeletionPolicy::Retain => "Retain",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Resource {
    type_name: String,
    properties: Map<String, Value>,
    deletion_policy: Option<DeletionPolicy>,
    metadata: Option<Value>,
}

impl Resource {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Map::new(),
            deletion_policy: None,
            metadata: None,
        }
    }

    /// Build a resource from a JSON object of properties
    pub fn with_properties(type_name: impl Into<String>, properties: Value) -> Self {
        let mut resource = Self::new(type_name);
        if let Value::Object(map) = properties {
            resource.properties = map;
        }
        resource
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn set_property(&mut self, key: &str, value: Value) {
        self.properties.insert(key.to_string(), value);
    }

    /// Set a property after creation, creating intermediate objects along
    /// a dotted path. Mirrors the post-creation raw overrides the compute
    /// construct needs for its custom runtime identifier.
    pub fn add_property_override(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = segments.split_last() else {
            return;
        };
        let mut current = &mut self.properties;
        for segment in parents {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            match entry {
                Value::Object(map) => current = map,
                _ => return,
            }
        }
        current.insert(last.to_string(), value);
    }

    pub fn deletion_policy(&self) -> Option<DeletionPolicy> {
        self.deletion_policy
    }

    pub fn set_deletion_policy(&mut self, policy: DeletionPolicy) {
        self.deletion_policy = Some(policy);
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    pub fn set_metadata(&mut self, metadata: Value) {
        self.metadata = Some(metadata);
    }
}
