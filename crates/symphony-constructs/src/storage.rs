// Persistent storage constructs
//
// A bucket and a key-value table, each created exactly once by the
// stateful resource group and referenced by stable name everywhere
// else. Retention is environment-driven through the removal policy.

use crate::error::ConstructError;
use serde_json::json;
use symphony_config::RemovalPolicy;
use symphony_core::{ConstructKind, ConstructTree, DeletionPolicy, NodeId, Resource};

const BUCKET_RESOURCE_TYPE: &str = "AWS::S3::Bucket";
const TABLE_RESOURCE_TYPE: &str = "AWS::DynamoDB::Table";

fn deletion_policy(policy: RemovalPolicy) -> DeletionPolicy {
    match policy {
        RemovalPolicy::Destroy => DeletionPolicy::Delete,
        RemovalPolicy::Retain => DeletionPolicy::Retain,
    }
}

#[derive(Debug, Clone)]
pub struct BucketProps {
    pub name: String,
    pub removal_policy: RemovalPolicy,
    pub auto_delete_objects: bool,
}

/// Object store with environment-driven retention
pub struct Bucket {
    node: NodeId,
    resource: NodeId,
    name: String,
}

impl Bucket {
    pub fn new(
        tree: &mut ConstructTree,
        scope: NodeId,
        id: &str,
        props: BucketProps,
    ) -> Result<Self, ConstructError> {
        if props.name.is_empty() {
            return Err(ConstructError::invalid_props(id, "name must not be empty"));
        }

        let node = tree.add_construct(scope, id, ConstructKind::Bucket)?;
        let mut resource = Resource::with_properties(
            BUCKET_RESOURCE_TYPE,
            json!({ "BucketName": props.name }),
        );
        resource.set_deletion_policy(deletion_policy(props.removal_policy));
        if props.auto_delete_objects {
            // Picked up by the deployment tooling that empties the bucket
            // before deletion; not a provider-native property.
            resource.set_metadata(json!({ "symphony:auto-delete-objects": true }));
        }
        let resource = tree.add_resource(node, "Resource", resource)?;

        Ok(Self {
            node,
            resource,
            name: props.name,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn resource(&self) -> NodeId {
        self.resource
    }

    pub fn bucket_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone)]
pub struct TableProps {
    pub name: String,
    pub removal_policy: RemovalPolicy,
}

/// Key-value table with a fixed pk/sk schema
pub struct Table {
    node: NodeId,
    resource: NodeId,
    name: String,
}

impl Table {
    pub fn new(
        tree: &mut ConstructTree,
        scope: NodeId,
        id: &str,
        props: TableProps,
    ) -> Result<Self, ConstructError> {
        if props.name.is_empty() {
            return Err(ConstructError::invalid_props(id, "name must not be empty"));
        }

        let node = tree.add_construct(scope, id, ConstructKind::Table)?;
        let mut resource = Resource::with_properties(
            TABLE_RESOURCE_TYPE,
            json!({
                "TableName": props.name,
                "BillingMode": "PAY_PER_REQUEST",
                "AttributeDefinitions": [
                    { "AttributeName": "pk", "AttributeType": "S" },
                    { "AttributeName": "sk", "AttributeType": "S" },
                ],
                "KeySchema": [
                    { "AttributeName": "pk", "KeyType": "HASH" },
                    { "AttributeName": "sk", "KeyType": "RANGE" },
                ],
            }),
        );
        resource.set_deletion_policy(deletion_policy(props.removal_policy));
        let resource = tree.add_resource(node, "Resource", resource)?;

        Ok(Self {
            node,
            resource,
            name: props.name,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn resource(&self) -> NodeId {
        self.resource
    }

    pub fn table_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(tree: &mut ConstructTree) -> NodeId {
        let root = tree.root();
        tree.add_construct(root, "Stack", ConstructKind::Stack)
            .unwrap()
    }

    #[test]
    fn destroy_maps_to_delete() {
        let mut tree = ConstructTree::new();
        let stack = stack(&mut tree);
        let bucket = Bucket::new(
            &mut tree,
            stack,
            "Bucket",
            BucketProps {
                name: "dev-symphony-bucket".to_string(),
                removal_policy: RemovalPolicy::Destroy,
                auto_delete_objects: true,
            },
        )
        .unwrap();

        let resource = tree.resource(bucket.resource()).unwrap();
        assert_eq!(resource.deletion_policy(), Some(DeletionPolicy::Delete));
        assert_eq!(
            resource.metadata().unwrap()["symphony:auto-delete-objects"],
            true
        );
    }

    #[test]
    fn retain_maps_to_retain() {
        let mut tree = ConstructTree::new();
        let stack = stack(&mut tree);
        let table = Table::new(
            &mut tree,
            stack,
            "Table",
            TableProps {
                name: "prod-symphony-table".to_string(),
                removal_policy: RemovalPolicy::Retain,
            },
        )
        .unwrap();

        let resource = tree.resource(table.resource()).unwrap();
        assert_eq!(resource.deletion_policy(), Some(DeletionPolicy::Retain));
        assert_eq!(resource.property("BillingMode"), Some(&json!("PAY_PER_REQUEST")));
    }

    #[test]
    fn table_schema_has_pk_and_sk() {
        let mut tree = ConstructTree::new();
        let stack = stack(&mut tree);
        let table = Table::new(
            &mut tree,
            stack,
            "Table",
            TableProps {
                name: "dev-symphony-table".to_string(),
                removal_policy: RemovalPolicy::Destroy,
            },
        )
        .unwrap();

        let resource = tree.resource(table.resource()).unwrap();
        let schema = resource.property("KeySchema").unwrap();
        assert_eq!(schema[0]["AttributeName"], "pk");
        assert_eq!(schema[0]["KeyType"], "HASH");
        assert_eq!(schema[1]["AttributeName"], "sk");
        assert_eq!(schema[1]["KeyType"], "RANGE");
    }
}
