// Synthesis entry point
//
// An App owns the construct tree, the registered aspects and the
// per-stack outputs. `synth` runs one aspect pass over the whole tree,
// then renders each stack subtree into a template. Policy violations
// block rendering entirely: there is no partial assembly.

use crate::aspect::{apply_aspects, Aspect};
use crate::error::{CoreError, SynthError};
use crate::template::{logical_id, Output, Template};
use crate::tree::{ConstructKind, ConstructTree, NodeId};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// The rendered form of one stack
#[derive(Debug)]
pub struct StackArtifact {
    pub name: String,
    pub template: Template,
}

/// Everything one synthesis run produced, in stack declaration order
#[derive(Debug)]
pub struct Assembly {
    pub stacks: Vec<StackArtifact>,
}

pub struct App {
    tree: ConstructTree,
    aspects: Vec<Box<dyn Aspect>>,
    stacks: Vec<NodeId>,
    outputs: BTreeMap<NodeId, Vec<(String, Output)>>,
    stack_tags: BTreeMap<NodeId, BTreeMap<String, String>>,
}

impl App {
    pub fn new() -> Self {
        Self {
            tree: ConstructTree::new(),
            aspects: Vec::new(),
            stacks: Vec::new(),
            outputs: BTreeMap::new(),
            stack_tags: BTreeMap::new(),
        }
    }

    pub fn tree(&self) -> &ConstructTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut ConstructTree {
        &mut self.tree
    }

    /// Declare a stack directly under the root
    pub fn add_stack(&mut self, name: &str) -> Result<NodeId, CoreError> {
        let root = self.tree.root();
        let stack = self.tree.add_construct(root, name, ConstructKind::Stack)?;
        self.stacks.push(stack);
        Ok(stack)
    }

    pub fn add_aspect(&mut self, aspect: impl Aspect + 'static) {
        self.aspects.push(Box::new(aspect));
    }

    /// Register a named output on a stack
    pub fn add_output(&mut self, stack: NodeId, name: &str, output: Output) {
        self.outputs
            .entry(stack)
            .or_default()
            .push((name.to_string(), output));
    }

    /// Attach metadata tags to a stack's template
    pub fn set_stack_tags(&mut self, stack: NodeId, tags: BTreeMap<String, String>) {
        self.stack_tags.insert(stack, tags);
    }

    /// Walk the tree once, then render every stack.
    pub fn synth(&self) -> Result<Assembly, SynthError> {
        let annotations = apply_aspects(&self.tree, &self.aspects);
        if !annotations.is_clean() {
            return Err(SynthError::PolicyViolations(annotations.into_errors()));
        }

        let mut stacks = Vec::with_capacity(self.stacks.len());
        for &stack in &self.stacks {
            let name = self.tree.local_id(stack).to_string();
            let mut template = Template::new(None);
            if let Some(tags) = self.stack_tags.get(&stack) {
                template.set_metadata(serde_json::json!({ "symphony:tags": tags }));
            }
            for node in self.tree.descendants(stack) {
                if let Some(resource) = self.tree.resource(node) {
                    template.add_resource(logical_id(&self.tree.path(node)), resource);
                }
            }
            for (output_name, output) in self.outputs.get(&stack).into_iter().flatten() {
                template.add_output(output_name.clone(), output.clone());
            }
            debug!(stack = %name, resources = template.resources().len(), "rendered stack");
            stacks.push(StackArtifact { name, template });
        }

        info!(stacks = stacks.len(), "synthesis complete");
        Ok(Assembly { stacks })
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience for `Fn::ImportValue` references to another stack's export
pub fn import_value(export_name: &str) -> Value {
    serde_json::json!({ "Fn::ImportValue": export_name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::Annotations;
    use crate::resource::Resource;
    use crate::template::Export;
    use serde_json::json;

    #[test]
    fn stacks_render_their_own_subtrees() {
        let mut app = App::new();
        let stateful = app.add_stack("Stateful-dev").unwrap();
        let stateless = app.add_stack("Stateless-dev").unwrap();
        app.tree_mut()
            .add_resource(
                stateful,
                "Bucket",
                Resource::with_properties("AWS::S3::Bucket", json!({})),
            )
            .unwrap();
        app.tree_mut()
            .add_resource(
                stateless,
                "Api",
                Resource::with_properties("AWS::ApiGatewayV2::Api", json!({})),
            )
            .unwrap();

        let assembly = app.synth().unwrap();
        assert_eq!(assembly.stacks.len(), 2);
        assert!(assembly.stacks[0]
            .template
            .resource("StatefulDevBucket")
            .is_some());
        assert!(assembly.stacks[0]
            .template
            .resource("StatelessDevApi")
            .is_none());
        assert!(assembly.stacks[1]
            .template
            .resource("StatelessDevApi")
            .is_some());
    }

    #[test]
    fn outputs_land_on_their_stack() {
        let mut app = App::new();
        let stack = app.add_stack("Stateful-dev").unwrap();
        app.add_output(
            stack,
            "TableName",
            Output {
                value: json!("dev-table"),
                description: Some("The name of the dynamo table".to_string()),
                export: Some(Export {
                    name: "TableName-dev".to_string(),
                }),
            },
        );

        let assembly = app.synth().unwrap();
        let output = assembly.stacks[0].template.output("TableName").unwrap();
        assert_eq!(output.value, json!("dev-table"));
        assert_eq!(output.export.as_ref().unwrap().name, "TableName-dev");
    }

    struct RejectEverything;

    impl Aspect for RejectEverything {
        fn visit(&self, tree: &ConstructTree, node: NodeId, annotations: &mut Annotations) {
            if tree.resource(node).is_some() {
                annotations.add_error(tree, node, "nope");
            }
        }
    }

    #[test]
    fn violations_block_the_whole_assembly() {
        let mut app = App::new();
        let stack = app.add_stack("Stack").unwrap();
        app.tree_mut()
            .add_resource(
                stack,
                "Bucket",
                Resource::with_properties("AWS::S3::Bucket", json!({})),
            )
            .unwrap();
        app.add_aspect(RejectEverything);

        match app.synth() {
            Err(SynthError::PolicyViolations(violations)) => {
                assert_eq!(violations.len(), 1);
                assert_eq!(violations[0].path, "Stack/Bucket");
            }
            other => panic!("expected policy violations, got {other:?}"),
        }
    }

    #[test]
    fn stack_tags_land_in_template_metadata() {
        let mut app = App::new();
        let stack = app.add_stack("Stack").unwrap();
        let mut tags = BTreeMap::new();
        tags.insert("Environment".to_string(), "Development".to_string());
        app.set_stack_tags(stack, tags);

        let assembly = app.synth().unwrap();
        let rendered = serde_json::to_value(&assembly.stacks[0].template).unwrap();
        assert_eq!(
            rendered["Metadata"]["symphony:tags"]["Environment"],
            "Development"
        );
    }
}
