// CloudFormation-shaped template rendering
//
// Resources and outputs are keyed by sanitized logical IDs in BTreeMap
// order, so rendering the same tree twice produces byte-identical JSON.

use crate::resource::Resource;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Derive an alphanumeric logical ID from a slash-joined node path.
/// Each segment keeps its alphanumeric characters and is capitalized,
/// then segments are concatenated: `Stateful-dev/Bucket` becomes
/// `StatefulDevBucket`.
pub fn logical_id(path: &str) -> String {
    let mut id = String::new();
    for segment in path.split(['/', '-', '_', '.']) {
        let mut chars = segment.chars().filter(|c| c.is_ascii_alphanumeric());
        if let Some(first) = chars.next() {
            id.extend(first.to_uppercase());
            id.extend(chars);
        }
    }
    id
}

/// A named, exported stack output
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Output {
    #[serde(rename = "Value")]
    pub value: Value,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Export", skip_serializing_if = "Option::is_none")]
    pub export: Option<Export>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Export {
    #[serde(rename = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateResource {
    #[serde(rename = "Type")]
    pub type_name: String,
    #[serde(rename = "Properties")]
    pub properties: Value,
    #[serde(rename = "DeletionPolicy", skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<&'static str>,
    #[serde(rename = "Metadata", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// One deployable template: the rendered form of a single stack
#[derive(Debug, Serialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    format_version: &'static str,
    #[serde(rename = "Description", skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "Metadata", skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
    #[serde(rename = "Resources")]
    resources: BTreeMap<String, TemplateResource>,
    #[serde(rename = "Outputs", skip_serializing_if = "BTreeMap::is_empty")]
    outputs: BTreeMap<String, Output>,
}

impl Template {
    pub fn new(description: Option<String>) -> Self {
        Self {
            format_version: "2010-09-09",
            description,
            metadata: None,
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    pub fn set_metadata(&mut self, metadata: Value) {
        self.metadata = Some(metadata);
    }

    pub fn add_resource(&mut self, logical_id: String, resource: &Resource) {
        self.resources.insert(
            logical_id,
            TemplateResource {
                type_name: resource.type_name().to_string(),
                properties: Value::Object(resource.properties().clone()),
                deletion_policy: resource.deletion_policy().map(|p| p.as_str()),
                metadata: resource.metadata().cloned(),
            },
        );
    }

    pub fn add_output(&mut self, name: impl Into<String>, output: Output) {
        self.outputs.insert(name.into(), output);
    }

    pub fn resource(&self, logical_id: &str) -> Option<&TemplateResource> {
        self.resources.get(logical_id)
    }

    pub fn resources(&self) -> &BTreeMap<String, TemplateResource> {
        &self.resources
    }

    pub fn output(&self, name: &str) -> Option<&Output> {
        self.outputs.get(name)
    }

    pub fn outputs(&self) -> &BTreeMap<String, Output> {
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn logical_ids_are_alphanumeric() {
        assert_eq!(logical_id("Stateful-dev/Bucket"), "StatefulDevBucket");
        assert_eq!(logical_id("Gateway/Route0"), "GatewayRoute0");
        assert_eq!(
            logical_id("Stateless-dev/llrt-lambda/Resource"),
            "StatelessDevLlrtLambdaResource"
        );
    }

    #[test]
    fn template_serializes_cloudformation_shape() {
        let mut template = Template::new(Some("demo".to_string()));
        let mut resource =
            Resource::with_properties("AWS::S3::Bucket", json!({"BucketName": "b"}));
        resource.set_deletion_policy(crate::resource::DeletionPolicy::Retain);
        template.add_resource("Bucket".to_string(), &resource);
        template.add_output(
            "BucketName",
            Output {
                value: json!("b"),
                description: None,
                export: Some(Export {
                    name: "BucketName-dev".to_string(),
                }),
            },
        );

        let rendered = serde_json::to_value(&template).unwrap();
        assert_eq!(rendered["AWSTemplateFormatVersion"], "2010-09-09");
        assert_eq!(rendered["Resources"]["Bucket"]["Type"], "AWS::S3::Bucket");
        assert_eq!(rendered["Resources"]["Bucket"]["DeletionPolicy"], "Retain");
        assert_eq!(
            rendered["Outputs"]["BucketName"]["Export"]["Name"],
            "BucketName-dev"
        );
    }
}
