// Profile-based function builder
//
// One construct, one function resource. The profile enum picks the
// runtime family: Performance swaps in the LLRT custom runtime (binary
// fetched and cached by the out-of-process build step), Compatibility
// stays on the managed Node.js runtime. Each variant carries its own
// fixed bundling policy; there is no boolean-flag dispatch.

use crate::error::ConstructError;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use symphony_config::LambdaProfile;
use symphony_core::{logical_id, ConstructKind, ConstructTree, NodeId, Resource};
use tracing::debug;

pub const LAMBDA_RESOURCE_TYPE: &str = "AWS::Lambda::Function";

const LLRT_RELEASES: &str = "https://github.com/awslabs/llrt/releases";
const MANAGED_RUNTIME: &str = "nodejs20.x";
const CUSTOM_RUNTIME: &str = "provided.al2023";
const DEFAULT_MEMORY_MB: u64 = 1024;
const ESM_BANNER: &str =
    "import { createRequire } from 'module';const require = createRequire(import.meta.url);";

/// SDK clients the LLRT runtime ships with; bundling them would only
/// bloat the artifact and shadow the runtime's copies.
pub const LLRT_EXTERNAL_MODULES: &[&str] = &[
    "@aws-sdk/client-dynamodb",
    "@aws-sdk/lib-dynamodb",
    "@aws-sdk/client-kms",
    "@aws-sdk/client-lambda",
    "@aws-sdk/client-s3",
    "@aws-sdk/client-secrets-manager",
    "@aws-sdk/client-ses",
    "@aws-sdk/client-sns",
    "@aws-sdk/client-sqs",
    "@aws-sdk/client-sts",
    "@aws-sdk/client-ssm",
    "@aws-sdk/client-cloudwatch-logs",
    "@aws-sdk/client-cloudwatch-events",
    "@aws-sdk/client-eventbridge",
    "@aws-sdk/client-sfn",
    "@aws-sdk/client-xray",
    "@aws-sdk/client-cognito-identity",
    "@aws-sdk/util-dynamodb",
    "@aws-sdk/credential-providers",
    "@smithy/signature-v4",
];

/// Externalized namespace for the managed-runtime profile
const SDK_NAMESPACE: &str = "@aws-sdk/*";

/// Target instruction-set architecture for the function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Architecture {
    #[default]
    Arm64,
    X64,
}

impl Architecture {
    /// Short name used in LLRT release artifacts and cache paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::Arm64 => "arm64",
            Architecture::X64 => "x64",
        }
    }

    /// Value expected by the deployed resource
    pub fn cfn_value(&self) -> &'static str {
        match self {
            Architecture::Arm64 => "arm64",
            Architecture::X64 => "x86_64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Download URL for a prebuilt LLRT bootstrap matching (version, arch).
/// `None` and `"latest"` both resolve to the latest release.
pub fn llrt_binary_url(version: Option<&str>, arch: Architecture) -> String {
    match version {
        None | Some("latest") => format!(
            "{LLRT_RELEASES}/latest/download/llrt-lambda-{}.zip",
            arch.as_str()
        ),
        Some(version) => format!(
            "{LLRT_RELEASES}/download/{version}/llrt-lambda-{}.zip",
            arch.as_str()
        ),
    }
}

/// Fixed bundling policy carried by each profile variant. Recorded in
/// the function resource's metadata for the external build pipeline;
/// nothing here executes during synthesis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundlingSpec {
    pub minify: bool,
    pub tree_shaking: bool,
    pub format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<&'static str>,
    pub source_map: bool,
    pub banner: &'static str,
    pub external_modules: Vec<String>,
    /// Shell steps run after bundling, with $INPUT_DIR/$OUTPUT_DIR
    /// substituted by the build pipeline
    pub after_bundling: Vec<String>,
}

impl BundlingSpec {
    fn compatibility() -> Self {
        Self {
            minify: true,
            tree_shaking: true,
            format: "esm",
            target: None,
            source_map: true,
            banner: ESM_BANNER,
            external_modules: vec![SDK_NAMESPACE.to_string()],
            after_bundling: Vec::new(),
        }
    }

    fn performance(arch: Architecture, binary_url: &str) -> Self {
        Self {
            minify: true,
            tree_shaking: true,
            format: "esm",
            target: Some("es2020"),
            source_map: false,
            banner: ESM_BANNER,
            external_modules: LLRT_EXTERNAL_MODULES
                .iter()
                .map(|m| m.to_string())
                .collect(),
            after_bundling: fetch_bootstrap_commands(arch, binary_url),
        }
    }
}

/// Download-and-cache the runtime bootstrap, then copy it into the
/// artifact. The cache check makes a repeat build skip the fetch; a
/// failed download is not retried.
fn fetch_bootstrap_commands(arch: Architecture, binary_url: &str) -> Vec<String> {
    let cache = format!("$INPUT_DIR/.tmp/{arch}");
    vec![
        format!(
            "if [ ! -e {cache}/bootstrap ]; then mkdir -p {cache} && cd {cache} && \
             curl -L -o llrt_temp.zip {binary_url} && unzip llrt_temp.zip && \
             rm -rf llrt_temp.zip; fi"
        ),
        format!("cp {cache}/bootstrap $OUTPUT_DIR/"),
    ]
}

#[derive(Debug, Clone)]
pub struct EnhancedLambdaProps {
    /// Source entry point handed to the bundler
    pub entry: String,
    /// Qualified handler symbol, e.g. `index.handler`
    pub handler: String,
    /// Custom name stem; the profile is appended to it
    pub lambda_definition: String,
    pub profile: LambdaProfile,
    pub timeout: Duration,
    pub environment: BTreeMap<String, String>,
    /// When true an HTTP integration handle is built and exposed
    pub http_integration: bool,
    /// LLRT release to pin; `None` means latest
    pub llrt_version: Option<String>,
    pub architecture: Architecture,
}

/// Opaque handle binding a routed request to a specific function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpIntegration {
    id: String,
    function_name: String,
    function_logical_id: String,
}

impl HttpIntegration {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn function_logical_id(&self) -> &str {
        &self.function_logical_id
    }
}

/// A bundled function with the runtime family chosen by profile
#[derive(Debug)]
pub struct EnhancedLambda {
    node: NodeId,
    function: NodeId,
    function_name: String,
    bundling: BundlingSpec,
    integration: Option<HttpIntegration>,
}

impl EnhancedLambda {
    pub fn new(
        tree: &mut ConstructTree,
        scope: NodeId,
        id: &str,
        props: EnhancedLambdaProps,
    ) -> Result<Self, ConstructError> {
        validate_props(id, &props)?;

        let node = tree.add_construct(scope, id, ConstructKind::EnhancedLambda)?;
        let function_name = format!("{}-{}", props.lambda_definition, props.profile);

        let (runtime, bundling) = match props.profile {
            LambdaProfile::Performance => {
                let url = llrt_binary_url(props.llrt_version.as_deref(), props.architecture);
                (
                    CUSTOM_RUNTIME,
                    BundlingSpec::performance(props.architecture, &url),
                )
            }
            LambdaProfile::Compatibility => (MANAGED_RUNTIME, BundlingSpec::compatibility()),
        };

        let mut resource = Resource::with_properties(
            LAMBDA_RESOURCE_TYPE,
            json!({
                "FunctionName": function_name,
                "Handler": props.handler,
                "MemorySize": DEFAULT_MEMORY_MB,
                "Timeout": props.timeout.as_secs(),
                "Architectures": [props.architecture.cfn_value()],
                "Runtime": MANAGED_RUNTIME,
            }),
        );
        if !props.environment.is_empty() {
            resource.set_property("Environment", json!({ "Variables": props.environment }));
        }
        resource.set_metadata(json!({
            "symphony:entry": props.entry,
            "symphony:bundling": serde_json::to_value(&bundling).unwrap_or(Value::Null),
        }));

        let function = tree.add_resource(node, "Resource", resource)?;
        if runtime != MANAGED_RUNTIME {
            // The resource is declared against the managed runtime, then
            // re-pointed at the custom one after creation, matching how
            // the custom-runtime override is applied downstream.
            if let Some(resource) = tree.resource_mut(function) {
                resource.add_property_override("Runtime", json!(runtime));
            }
        }

        let integration = props.http_integration.then(|| HttpIntegration {
            id: format!("{}-integration", props.lambda_definition),
            function_name: function_name.clone(),
            function_logical_id: logical_id(&tree.path(function)),
        });

        debug!(
            function = %function_name,
            profile = %props.profile,
            http_integration = integration.is_some(),
            "declared function"
        );

        Ok(Self {
            node,
            function,
            function_name,
            bundling,
            integration,
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn function(&self) -> NodeId {
        self.function
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn function_logical_id(&self, tree: &ConstructTree) -> String {
        logical_id(&tree.path(self.function))
    }

    pub fn bundling(&self) -> &BundlingSpec {
        &self.bundling
    }

    /// Present only when `http_integration` was requested; callers must
    /// not assume it exists otherwise.
    pub fn integration(&self) -> Option<&HttpIntegration> {
        self.integration.as_ref()
    }
}

fn validate_props(id: &str, props: &EnhancedLambdaProps) -> Result<(), ConstructError> {
    if props.entry.is_empty() {
        return Err(ConstructError::invalid_props(id, "entry must not be empty"));
    }
    if props.handler.is_empty() {
        return Err(ConstructError::invalid_props(
            id,
            "handler must not be empty",
        ));
    }
    if props.lambda_definition.is_empty() {
        return Err(ConstructError::invalid_props(
            id,
            "lambda_definition must not be empty",
        ));
    }
    if props.timeout.is_zero() {
        return Err(ConstructError::invalid_props(
            id,
            "timeout must be greater than zero",
        ));
    }
    Ok(())
}
