// GraphQL API and its lambda data source
//
// The stateful stack owns the API and exports its identifiers; the
// stateless stack attaches a function as a data source by importing
// the exported API id, never re-creating the API.

use crate::error::ConstructError;
use serde_json::{json, Value};
use symphony_core::{logical_id, ConstructKind, ConstructTree, NodeId, Resource};

const API_RESOURCE_TYPE: &str = "AWS::AppSync::GraphQLApi";
const API_KEY_RESOURCE_TYPE: &str = "AWS::AppSync::ApiKey";
const DATA_SOURCE_RESOURCE_TYPE: &str = "AWS::AppSync::DataSource";

/// Managed GraphQL API with field-level logging and tracing enabled
pub struct GraphqlApi {
    node: NodeId,
    api: NodeId,
    api_key: NodeId,
}

impl GraphqlApi {
    pub fn new(
        tree: &mut ConstructTree,
        scope: NodeId,
        id: &str,
        name: &str,
    ) -> Result<Self, ConstructError> {
        if name.is_empty() {
            return Err(ConstructError::invalid_props(id, "name must not be empty"));
        }

        let node = tree.add_construct(scope, id, ConstructKind::GraphqlApi)?;
        let api = tree.add_resource(
            node,
            "Resource",
            Resource::with_properties(
                API_RESOURCE_TYPE,
                json!({
                    "Name": name,
                    "AuthenticationType": "API_KEY",
                    "XrayEnabled": true,
                    "LogConfig": {
                        "FieldLogLevel": "ALL",
                        "ExcludeVerboseContent": false,
                    },
                }),
            ),
        )?;
        let api_ref = Self::get_att(tree, api, "ApiId");
        let api_key = tree.add_resource(
            node,
            "ApiKey",
            Resource::with_properties(API_KEY_RESOURCE_TYPE, json!({ "ApiId": api_ref })),
        )?;

        Ok(Self { node, api, api_key })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn api(&self) -> NodeId {
        self.api
    }

    pub fn api_id(&self, tree: &ConstructTree) -> Value {
        Self::get_att(tree, self.api, "ApiId")
    }

    pub fn url(&self, tree: &ConstructTree) -> Value {
        Self::get_att(tree, self.api, "GraphQLUrl")
    }

    pub fn api_key(&self, tree: &ConstructTree) -> Value {
        Self::get_att(tree, self.api_key, "ApiKey")
    }

    fn get_att(tree: &ConstructTree, node: NodeId, attribute: &str) -> Value {
        json!({ "Fn::GetAtt": [logical_id(&tree.path(node)), attribute] })
    }
}

/// Attaches an existing function to a GraphQL API declared elsewhere.
/// `api_id` is an unresolved reference, typically an import of the
/// owning stack's exported id.
pub struct LambdaDataSource {
    node: NodeId,
    resource: NodeId,
}

impl LambdaDataSource {
    pub fn new(
        tree: &mut ConstructTree,
        scope: NodeId,
        id: &str,
        api_id: Value,
        function_logical_id: &str,
    ) -> Result<Self, ConstructError> {
        if function_logical_id.is_empty() {
            return Err(ConstructError::invalid_props(
                id,
                "function_logical_id must not be empty",
            ));
        }

        let node = tree.add_construct(scope, id, ConstructKind::DataSource)?;
        let resource = tree.add_resource(
            node,
            "Resource",
            Resource::with_properties(
                DATA_SOURCE_RESOURCE_TYPE,
                json!({
                    "ApiId": api_id,
                    "Name": id,
                    "Type": "AWS_LAMBDA",
                    "LambdaConfig": {
                        "LambdaFunctionArn": { "Fn::GetAtt": [function_logical_id, "Arn"] },
                    },
                }),
            ),
        )?;

        Ok(Self { node, resource })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn resource(&self) -> NodeId {
        self.resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symphony_core::import_value;

    fn stack(tree: &mut ConstructTree) -> NodeId {
        let root = tree.root();
        tree.add_construct(root, "Stack", ConstructKind::Stack)
            .unwrap()
    }

    #[test]
    fn api_enables_xray_and_field_logging() {
        let mut tree = ConstructTree::new();
        let stack = stack(&mut tree);
        let gql = GraphqlApi::new(&mut tree, stack, "GQLApi", "dev-GQLApi").unwrap();

        let resource = tree.resource(gql.api()).unwrap();
        assert_eq!(resource.property("XrayEnabled"), Some(&json!(true)));
        assert_eq!(
            resource.property("LogConfig").unwrap()["FieldLogLevel"],
            "ALL"
        );
    }

    #[test]
    fn identifiers_are_unresolved_references() {
        let mut tree = ConstructTree::new();
        let stack = stack(&mut tree);
        let gql = GraphqlApi::new(&mut tree, stack, "GQLApi", "dev-GQLApi").unwrap();

        let api_id = gql.api_id(&tree);
        assert_eq!(api_id["Fn::GetAtt"][1], "ApiId");
        let url = gql.url(&tree);
        assert_eq!(url["Fn::GetAtt"][1], "GraphQLUrl");
    }

    #[test]
    fn data_source_imports_the_api_id() {
        let mut tree = ConstructTree::new();
        let stack = stack(&mut tree);
        let source = LambdaDataSource::new(
            &mut tree,
            stack,
            "NodeDataSource",
            import_value("GQLApiId-dev"),
            "StatelessDevNodeLambdaResource",
        )
        .unwrap();

        let resource = tree.resource(source.resource()).unwrap();
        assert_eq!(
            resource.property("ApiId"),
            Some(&json!({"Fn::ImportValue": "GQLApiId-dev"}))
        );
        assert_eq!(resource.property("Type"), Some(&json!("AWS_LAMBDA")));
    }
}
