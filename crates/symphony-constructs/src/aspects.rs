// Compute-construct provenance rule
//
// Every function resource must be created through EnhancedLambda. The
// rule checks the node's immediate creating scope; violations are
// recorded and traversal continues, so one pass reports them all.

use crate::function::LAMBDA_RESOURCE_TYPE;
use symphony_core::{Annotations, Aspect, ConstructKind, ConstructTree, NodeId};

#[derive(Debug, Default)]
pub struct LambdaRule;

impl Aspect for LambdaRule {
    fn visit(&self, tree: &ConstructTree, node: NodeId, annotations: &mut Annotations) {
        let Some(resource) = tree.resource(node) else {
            return;
        };
        if resource.type_name() != LAMBDA_RESOURCE_TYPE {
            return;
        }
        let creating_scope = tree.parent(node).and_then(|parent| tree.kind(parent));
        if creating_scope != Some(ConstructKind::EnhancedLambda) {
            annotations.add_error(
                tree,
                node,
                "Lambda construct used directly. Please use the EnhancedLambda construct instead",
            );
        }
    }
}
