// Stateful resource group: bucket, table, GraphQL API

use anyhow::Result;
use serde_json::json;
use symphony_config::{EnvironmentConfig, Tags};
use symphony_constructs::{Bucket, BucketProps, GraphqlApi, Table, TableProps};
use symphony_core::{App, Export, NodeId, Output};
use tracing::info;

/// Identifiers the stateless stack is allowed to read
#[derive(Debug, Clone)]
pub struct StatefulRefs {
    pub bucket_name: String,
    pub table_name: String,
    /// Export name carrying the GraphQL API id across stacks
    pub gql_api_id_export: String,
}

pub struct StatefulStack {
    node: NodeId,
    refs: StatefulRefs,
}

impl StatefulStack {
    pub fn new(app: &mut App, config: &EnvironmentConfig, tags: &Tags) -> Result<Self> {
        let stage = config.env.stage.clone();
        let stack = app.add_stack(&format!("Stateful-{stage}"))?;
        app.set_stack_tags(stack, tags.clone());

        let bucket = Bucket::new(
            app.tree_mut(),
            stack,
            "Bucket",
            BucketProps {
                name: config.persistence.bucket.name.clone(),
                removal_policy: config.persistence.bucket.removal_policy,
                auto_delete_objects: config.persistence.bucket.auto_delete_objects,
            },
        )?;

        let table = Table::new(
            app.tree_mut(),
            stack,
            "Table",
            TableProps {
                name: config.persistence.table.name.clone(),
                removal_policy: config.persistence.table.removal_policy,
            },
        )?;

        let gql = GraphqlApi::new(app.tree_mut(), stack, "GQLApi", &format!("{stage}-GQLApi"))?;

        app.add_output(
            stack,
            "TableName",
            Output {
                value: json!(table.table_name()),
                description: Some("The name of the dynamo table".to_string()),
                export: Some(Export {
                    name: format!("TableName-{stage}"),
                }),
            },
        );
        app.add_output(
            stack,
            "BucketName",
            Output {
                value: json!(bucket.bucket_name()),
                description: Some("The name of the bucket".to_string()),
                export: Some(Export {
                    name: format!("BucketName-{stage}"),
                }),
            },
        );
        app.add_output(
            stack,
            "GQLApiUrl",
            Output {
                value: gql.url(app.tree()),
                description: Some("The url of the graphql api".to_string()),
                export: Some(Export {
                    name: format!("GQLApiUrl-{stage}"),
                }),
            },
        );
        let gql_api_id_export = format!("GQLApiId-{stage}");
        app.add_output(
            stack,
            "GQLApiId",
            Output {
                value: gql.api_id(app.tree()),
                description: Some("The id of the graphql api".to_string()),
                export: Some(Export {
                    name: gql_api_id_export.clone(),
                }),
            },
        );
        app.add_output(
            stack,
            "GQLApiKey",
            Output {
                value: gql.api_key(app.tree()),
                description: Some("The api key of the graphql api".to_string()),
                export: Some(Export {
                    name: format!("GQLApiKey-{stage}"),
                }),
            },
        );

        info!(stack = %format!("Stateful-{stage}"), "declared stateful resources");

        Ok(Self {
            node: stack,
            refs: StatefulRefs {
                bucket_name: bucket.bucket_name().to_string(),
                table_name: table.table_name().to_string(),
                gql_api_id_export,
            },
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn refs(&self) -> &StatefulRefs {
        &self.refs
    }
}
