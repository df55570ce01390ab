// HTTP entry point and route registration
//
// Composes versioned route groups into one HTTP API. Draft routes are
// skipped entirely: no registration, no error. Identical resolved paths
// are emitted as-is; deciding what that means is the routing provider's
// problem, not ours.

use crate::error::ConstructError;
use crate::function::HttpIntegration;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use symphony_config::CorsPreflight;
use symphony_core::{logical_id, ConstructKind, ConstructTree, NodeId, Resource};
use tracing::debug;

const API_RESOURCE_TYPE: &str = "AWS::ApiGatewayV2::Api";
const ROUTE_RESOURCE_TYPE: &str = "AWS::ApiGatewayV2::Route";
const INTEGRATION_RESOURCE_TYPE: &str = "AWS::ApiGatewayV2::Integration";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Route {
    pub methods: Vec<HttpMethod>,
    pub path: String,
    /// Draft routes never reach the live API surface
    pub draft: bool,
    pub integration: HttpIntegration,
}

#[derive(Debug, Clone, Default)]
pub struct RouteGroup {
    /// Path prefix segment; `None` registers under `/default`
    pub api_version: Option<String>,
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Default)]
pub struct GatewayProps {
    pub route_groups: Vec<RouteGroup>,
    pub cors_preflight: Option<CorsPreflight>,
}

/// The single HTTP entry point for a stack
pub struct Gateway {
    node: NodeId,
    api: NodeId,
    route_keys: Vec<String>,
}

impl Gateway {
    pub fn new(
        tree: &mut ConstructTree,
        scope: NodeId,
        id: &str,
        props: GatewayProps,
    ) -> Result<Self, ConstructError> {
        let node = tree.add_construct(scope, id, ConstructKind::Gateway)?;

        let mut api_resource = Resource::with_properties(
            API_RESOURCE_TYPE,
            json!({
                "Name": id,
                "ProtocolType": "HTTP",
            }),
        );
        if let Some(cors) = &props.cors_preflight {
            api_resource.set_property(
                "CorsConfiguration",
                json!({
                    "AllowOrigins": cors.allow_origins,
                    "AllowHeaders": cors.allow_headers,
                    "AllowMethods": cors.allow_methods,
                }),
            );
        }
        let api = tree.add_resource(node, "Resource", api_resource)?;
        let api_ref = json!({ "Ref": logical_id(&tree.path(api)) });

        // One integration resource per distinct compute target
        let mut integrations: BTreeMap<String, String> = BTreeMap::new();
        let mut route_keys = Vec::new();
        let mut route_index = 0usize;

        for group in &props.route_groups {
            let version = group.api_version.as_deref().unwrap_or("default");
            for route in &group.routes {
                if route.draft {
                    debug!(path = %route.path, "skipping draft route");
                    continue;
                }
                let resolved = format!("/{version}{}", route.path);
                let integration_id = match integrations.get(route.integration.function_name()) {
                    Some(existing) => existing.clone(),
                    None => {
                        let child = tree.add_resource(
                            node,
                            route.integration.id(),
                            Resource::with_properties(
                                INTEGRATION_RESOURCE_TYPE,
                                json!({
                                    "ApiId": api_ref.clone(),
                                    "IntegrationType": "AWS_PROXY",
                                    "PayloadFormatVersion": "2.0",
                                    "IntegrationUri": {
                                        "Fn::GetAtt": [route.integration.function_logical_id(), "Arn"]
                                    },
                                }),
                            ),
                        )?;
                        let integration_logical = logical_id(&tree.path(child));
                        integrations.insert(
                            route.integration.function_name().to_string(),
                            integration_logical.clone(),
                        );
                        integration_logical
                    }
                };

                for method in &route.methods {
                    let route_key = format!("{method} {resolved}");
                    tree.add_resource(
                        node,
                        &format!("Route{route_index}"),
                        Resource::with_properties(
                            ROUTE_RESOURCE_TYPE,
                            json!({
                                "ApiId": api_ref.clone(),
                                "RouteKey": route_key,
                                "Target": { "Fn::Sub": format!("integrations/${{{integration_id}}}") },
                            }),
                        ),
                    )?;
                    route_index += 1;
                    route_keys.push(route_key);
                }
            }
        }

        debug!(routes = route_keys.len(), "registered routes");
        Ok(Self {
            node,
            api,
            route_keys,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn api(&self) -> NodeId {
        self.api
    }

    /// Every registered `METHOD /path` binding, in registration order
    pub fn route_keys(&self) -> &[String] {
        &self.route_keys
    }

    /// Unresolved endpoint reference, suitable for a stack output
    pub fn endpoint(&self, tree: &ConstructTree) -> serde_json::Value {
        json!({ "Fn::GetAtt": [logical_id(&tree.path(self.api)), "ApiEndpoint"] })
    }
}
