// Stateless resource group: compute and routing
//
// Reads the bucket/table identifiers and the exported GraphQL API id
// produced by the stateful stack. Functions are only ever created
// through EnhancedLambda; the LambdaRule aspect enforces this at
// synthesis time.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use symphony_config::{EnvironmentConfig, LambdaProfile, Tags};
use symphony_constructs::{
    Architecture, EnhancedLambda, EnhancedLambdaProps, Gateway, GatewayProps, HttpMethod,
    LambdaDataSource, Route, RouteGroup,
};
use symphony_core::{import_value, App, Export, NodeId, Output};
use tracing::info;

use super::stateful::StatefulRefs;

const DEMO_ENTRY: &str = "./functions/demo/index.ts";
const DEMO_HANDLER: &str = "index.handler";

pub struct StatelessStack {
    node: NodeId,
}

impl StatelessStack {
    pub fn new(
        app: &mut App,
        config: &EnvironmentConfig,
        tags: &Tags,
        refs: &StatefulRefs,
    ) -> Result<Self> {
        let stage = config.env.stage.clone();
        let stack = app.add_stack(&format!("Stateless-{stage}"))?;
        app.set_stack_tags(stack, tags.clone());

        let mut environment = BTreeMap::new();
        environment.insert("BUCKET_NAME".to_string(), refs.bucket_name.clone());

        // Routed function on the environment's default profile
        let routed = EnhancedLambda::new(
            app.tree_mut(),
            stack,
            "llrt-lambda",
            EnhancedLambdaProps {
                entry: DEMO_ENTRY.to_string(),
                handler: DEMO_HANDLER.to_string(),
                lambda_definition: "llrt-lambda".to_string(),
                profile: config.compute.lambda.profile,
                timeout: config.compute.lambda.timeout(),
                environment: environment.clone(),
                http_integration: true,
                llrt_version: None,
                architecture: Architecture::Arm64,
            },
        )?;

        // Compatibility function backing the GraphQL data source
        let node_lambda = EnhancedLambda::new(
            app.tree_mut(),
            stack,
            "node-lambda",
            EnhancedLambdaProps {
                entry: DEMO_ENTRY.to_string(),
                handler: DEMO_HANDLER.to_string(),
                lambda_definition: "node-lambda".to_string(),
                profile: LambdaProfile::Compatibility,
                timeout: config.compute.lambda.timeout(),
                environment,
                http_integration: false,
                llrt_version: None,
                architecture: Architecture::Arm64,
            },
        )?;

        let routed_integration = routed
            .integration()
            .context("routed function was built without an http integration")?
            .clone();
        let gateway = Gateway::new(
            app.tree_mut(),
            stack,
            "Gateway",
            GatewayProps {
                route_groups: vec![RouteGroup {
                    api_version: Some("v1".to_string()),
                    routes: vec![
                        Route {
                            methods: vec![HttpMethod::Get],
                            path: "/demo".to_string(),
                            draft: false,
                            integration: routed_integration.clone(),
                        },
                        // Not ready for the live surface yet
                        Route {
                            methods: vec![HttpMethod::Post],
                            path: "/experimental".to_string(),
                            draft: true,
                            integration: routed_integration,
                        },
                    ],
                }],
                cors_preflight: config
                    .network
                    .apigw
                    .as_ref()
                    .map(|apigw| apigw.cors_preflight.clone()),
            },
        )?;

        let node_logical = node_lambda.function_logical_id(app.tree());
        LambdaDataSource::new(
            app.tree_mut(),
            stack,
            "NodeDataSource",
            import_value(&refs.gql_api_id_export),
            &node_logical,
        )?;

        let endpoint = gateway.endpoint(app.tree());
        app.add_output(
            stack,
            "HttpApiGateway",
            Output {
                value: endpoint,
                description: Some("The http api endpoint".to_string()),
                export: Some(Export {
                    name: format!("HttpApiGateway-{stage}"),
                }),
            },
        );

        info!(
            stack = %format!("Stateless-{stage}"),
            routes = gateway.route_keys().len(),
            "declared stateless resources"
        );

        Ok(Self { node: stack })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

#[cfg(test)]
mod tests {
    use super::super::stateful::StatefulStack;
    use super::*;
    use symphony_config::{load_config, tags_for};

    fn synth_dev() -> symphony_core::Assembly {
        let config = load_config("dev").unwrap();
        let tags = tags_for("dev");
        let mut app = App::new();
        app.add_aspect(symphony_constructs::LambdaRule);
        let stateful = StatefulStack::new(&mut app, &config, &tags).unwrap();
        StatelessStack::new(&mut app, &config, &tags, stateful.refs()).unwrap();
        app.synth().unwrap()
    }

    #[test]
    fn only_non_draft_routes_are_registered() {
        let assembly = synth_dev();
        let stateless = &assembly.stacks[1].template;
        let routes: Vec<_> = stateless
            .resources()
            .values()
            .filter(|r| r.type_name == "AWS::ApiGatewayV2::Route")
            .collect();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].properties["RouteKey"], "GET /v1/demo");
    }

    #[test]
    fn bucket_name_is_injected_into_compute() {
        let assembly = synth_dev();
        let stateless = &assembly.stacks[1].template;
        let functions: Vec<_> = stateless
            .resources()
            .values()
            .filter(|r| r.type_name == "AWS::Lambda::Function")
            .collect();
        assert_eq!(functions.len(), 2);
        for function in functions {
            assert_eq!(
                function.properties["Environment"]["Variables"]["BUCKET_NAME"],
                "dev-symphony-bucket"
            );
        }
    }

    #[test]
    fn data_source_imports_the_stateful_api_id() {
        let assembly = synth_dev();
        let stateless = &assembly.stacks[1].template;
        let source = stateless
            .resources()
            .values()
            .find(|r| r.type_name == "AWS::AppSync::DataSource")
            .unwrap();
        assert_eq!(
            source.properties["ApiId"]["Fn::ImportValue"],
            "GQLApiId-dev"
        );
    }

    #[test]
    fn stateless_passes_the_lambda_rule() {
        // synth_dev() would return Err on violations; reaching here
        // means both functions went through EnhancedLambda
        let assembly = synth_dev();
        assert_eq!(assembly.stacks.len(), 2);
    }
}
